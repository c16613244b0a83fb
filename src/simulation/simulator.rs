//! Synchronous simulation core
//!
//! Owns the live snapshot, the step state machine, the trace, the log and
//! the lessons for one job. [`Simulator::tick`] is the only mutation path;
//! pacing belongs to the clock.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::event_log::{EventLog, TickContext};
use super::lessons::{restriction_warning, LessonGenerator};
use super::report::JobReport;
use super::trace::TraceBuffer;
use crate::config::SimulatorConfig;
use crate::physics_engine::{
    DeviationLookup, EnvelopeSummary, KinematicsModel, Restriction, RestrictionIndex,
    TensionModel,
};
use crate::procedure::{ProcedureStateMachine, ProcedureStep, StepTransition};
use crate::types::{
    ConveyanceType, LiveData, LogEntry, Procedure, TfaModel, TraceSample, WeightUnit, Well,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Job did not finish within {0} ticks")]
    TickBudgetExhausted(u64),

    #[error("Simulation clock has stopped")]
    ClockStopped,
}

/// What a single mutating tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub tick: u64,
    /// Sample appended to the trace
    pub sample: TraceSample,
    pub reached_target: bool,
    /// Step transition applied at the end of the tick
    pub transition: Option<StepTransition>,
    /// Restriction ids in contact this tick
    pub contacts: Vec<usize>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct Simulator {
    job_id: Uuid,
    well_id: String,
    well_name: String,
    procedure_name: String,
    conveyance: ConveyanceType,
    unit: WeightUnit,
    tfa_model: TfaModel,

    deviation: DeviationLookup,
    restrictions: RestrictionIndex,
    kinematics: KinematicsModel,
    tension: TensionModel,
    machine: ProcedureStateMachine,

    live: LiveData,
    trace: TraceBuffer,
    log: EventLog,
    lessons: LessonGenerator,

    tick_seconds: f64,
    max_ticks: u64,
    tick_period: Option<std::time::Duration>,
    ticks: u64,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Simulator {
    /// Set up a job for `procedure` on `well`.
    ///
    /// Logs the job start and the first step. A well without a survey runs
    /// as vertical; a well without a completion runs without restrictions.
    ///
    /// `config` must already have passed [`SimulatorConfig::validate`]; a zero
    /// slow-down radius, for one, makes the damping factor NaN.
    pub fn new(well: &Well, procedure: &Procedure, config: &SimulatorConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "Simulator built from an invalid config");
        let job_id = Uuid::new_v4();
        let params = config.conveyance_params(procedure.conveyance);
        let restrictions = RestrictionIndex::from_completion(well.completion.as_ref());
        let machine = ProcedureStateMachine::new(&procedure.steps);

        info!(
            job_id = %job_id,
            well = %well.id,
            procedure = %procedure.name,
            conveyance = %procedure.conveyance,
            steps = procedure.steps.len(),
            restrictions = restrictions.len(),
            "Job set up"
        );

        let mut sim = Self {
            job_id,
            well_id: well.id.clone(),
            well_name: well.name.clone(),
            procedure_name: procedure.name.clone(),
            conveyance: procedure.conveyance,
            unit: params.unit,
            tfa_model: procedure.tfa_model.clone(),
            deviation: DeviationLookup::new(well.survey()),
            restrictions,
            kinematics: KinematicsModel::new(procedure.conveyance, config),
            tension: TensionModel::new(procedure, config),
            machine,
            live: LiveData::default(),
            trace: TraceBuffer::new(config.simulation.trace_capacity),
            log: EventLog::new(job_id),
            lessons: LessonGenerator::new(config.restrictions.encounter_policy),
            tick_seconds: config.simulation.tick_seconds,
            max_ticks: config.simulation.max_ticks,
            tick_period: config.tick_period(),
            ticks: 0,
            started_at: Utc::now(),
            finished_at: None,
        };

        let ctx = sim.context();
        sim.log.info("Job initiated.", ctx);
        if let Some(step) = sim.machine.active_step() {
            let text = format!("Starting Step {}: {}", step.number(), step.text);
            sim.log.info(text, ctx);
        }
        sim
    }

    fn context(&self) -> TickContext {
        TickContext {
            tick: self.ticks,
            elapsed_secs: self.live.op_time,
            depth: self.live.depth,
        }
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the job by one tick.
    ///
    /// Returns `None` without touching any state once the job has finished.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.live.job_running {
            return None;
        }

        self.ticks += 1;
        self.live.op_time += self.tick_seconds;

        let directive = self
            .machine
            .active_step()
            .map(|s| s.directive)
            .unwrap_or_default();

        let update = self
            .kinematics
            .advance(self.live.depth, &directive, &self.restrictions);
        let reading = self.tension.tension_at(
            update.depth,
            update.direction(),
            &self.deviation,
            &self.restrictions,
        );

        self.live.depth = update.depth;
        self.live.speed = update.speed;
        self.live.weight = round2(reading.weight);

        let ctx = self.context();
        let contacts: Vec<&Restriction> = reading
            .encounters
            .iter()
            .filter_map(|id| self.restrictions.get(*id))
            .collect();
        for restriction in self.lessons.observe_contacts(&contacts) {
            self.log.warning(restriction_warning(restriction), ctx);
        }

        let sample = TraceSample {
            depth: self.live.depth,
            weight: self.live.weight,
        };
        self.trace.push(sample);

        debug!(
            tick = self.ticks,
            depth = self.live.depth,
            weight = self.live.weight,
            speed = self.live.speed,
            motion = directive.motion.short_code(),
            "Tick"
        );

        let transition = update.reached_target.then(|| self.apply_transition(ctx));

        Some(TickOutcome {
            tick: self.ticks,
            sample,
            reached_target: update.reached_target,
            transition,
            contacts: reading.encounters,
        })
    }

    fn apply_transition(&mut self, ctx: TickContext) -> StepTransition {
        let transition = self.machine.advance();
        match transition {
            StepTransition::Advanced { index } => {
                self.live.current_step = index;
                if let Some(step) = self.machine.active_step() {
                    let text = format!("Starting Step {}: {}", step.number(), step.text);
                    self.log.info(text, ctx);
                }
            }
            StepTransition::Finished => {
                self.live.job_running = false;
                self.live.speed = 0.0;
                self.log.info("Job procedure complete.", ctx);
                self.lessons.record_success();
                self.finished_at = Some(Utc::now());
                info!(
                    job_id = %self.job_id,
                    ticks = self.ticks,
                    op_time_s = self.live.op_time,
                    depth = self.live.depth,
                    "Job finished"
                );
            }
        }
        transition
    }

    /// Tick until the procedure is exhausted.
    pub fn run_to_completion(&mut self) -> Result<JobReport, SimulationError> {
        while self.live.job_running {
            if self.ticks >= self.max_ticks {
                return Err(SimulationError::TickBudgetExhausted(self.max_ticks));
            }
            self.tick();
        }
        Ok(self.report())
    }

    pub fn report(&self) -> JobReport {
        JobReport {
            job_id: self.job_id,
            well_id: self.well_id.clone(),
            well_name: self.well_name.clone(),
            procedure_name: self.procedure_name.clone(),
            conveyance: self.conveyance,
            weight_unit: self.unit,
            final_state: self.live.clone(),
            lessons: self.lessons.lessons().to_vec(),
            log: self.log.entries().to_vec(),
            trace: self.trace.to_vec(),
            envelope: EnvelopeSummary::evaluate(self.trace.iter(), &self.tfa_model),
            ticks: self.ticks,
            started_at: self.started_at,
            finished_at: self.finished_at.unwrap_or_else(Utc::now),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub const fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub const fn live(&self) -> &LiveData {
        &self.live
    }

    pub const fn is_finished(&self) -> bool {
        !self.live.job_running
    }

    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Wall-clock period between ticks, `None` when unpaced.
    pub const fn tick_period(&self) -> Option<std::time::Duration> {
        self.tick_period
    }

    pub const fn weight_unit(&self) -> WeightUnit {
        self.unit
    }

    pub fn steps(&self) -> &[ProcedureStep] {
        self.machine.steps()
    }

    pub fn active_step(&self) -> Option<&ProcedureStep> {
        self.machine.active_step()
    }

    pub const fn trace(&self) -> &TraceBuffer {
        &self.trace
    }

    pub fn recent_log(&self, limit: usize) -> Vec<LogEntry> {
        self.log.recent(limit)
    }

    pub fn log_entries(&self) -> &[LogEntry] {
        self.log.entries()
    }

    pub fn lessons(&self) -> &[String] {
        self.lessons.lessons()
    }

    pub const fn restrictions(&self) -> &RestrictionIndex {
        &self.restrictions
    }

    pub const fn tfa_model(&self) -> &TfaModel {
        &self.tfa_model
    }
}
