//! Simulation Clock - paces the simulator and answers queries between ticks
//!
//! One task owns the [`Simulator`]. A `select!` loop waits on either the next
//! tick or a [`ClockCommand`], so ticks never overlap and every query sees a
//! consistent snapshot. The loop ends when the procedure is exhausted.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::report::JobReport;
use super::simulator::{SimulationError, Simulator};
use crate::procedure::ProcedureStep;
use crate::types::{LiveData, LogEntry, TraceSample};

// ============================================================================
// Observer
// ============================================================================

/// Receives the live feed of a running job.
#[async_trait]
pub trait JobObserver: Send + 'static {
    /// Called after every tick that changed the snapshot.
    async fn on_snapshot(&mut self, live: &LiveData, sample: &TraceSample);

    /// Called exactly once, when the procedure is exhausted.
    async fn on_complete(&mut self, report: &JobReport);
}

/// No-op observer.
#[async_trait]
impl JobObserver for () {
    async fn on_snapshot(&mut self, _live: &LiveData, _sample: &TraceSample) {}

    async fn on_complete(&mut self, _report: &JobReport) {}
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug)]
pub enum ClockCommand {
    Snapshot {
        response_tx: oneshot::Sender<LiveData>,
    },
    /// Most recent log entries, newest first
    RecentLog {
        limit: usize,
        response_tx: oneshot::Sender<Vec<LogEntry>>,
    },
    Trace {
        response_tx: oneshot::Sender<Vec<TraceSample>>,
    },
    Lessons {
        response_tx: oneshot::Sender<Vec<String>>,
    },
    Steps {
        response_tx: oneshot::Sender<Vec<ProcedureStep>>,
    },
}

// ============================================================================
// Clock Handle
// ============================================================================

/// Handle for querying a running clock.
#[derive(Clone)]
pub struct ClockHandle {
    tx: mpsc::Sender<ClockCommand>,
}

impl ClockHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> ClockCommand,
    ) -> Result<T, SimulationError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.tx
            .send(make(response_tx))
            .await
            .map_err(|_| SimulationError::ClockStopped)?;
        response_rx.await.map_err(|_| SimulationError::ClockStopped)
    }

    pub async fn snapshot(&self) -> Result<LiveData, SimulationError> {
        self.request(|response_tx| ClockCommand::Snapshot { response_tx })
            .await
    }

    pub async fn recent_log(&self, limit: usize) -> Result<Vec<LogEntry>, SimulationError> {
        self.request(|response_tx| ClockCommand::RecentLog { limit, response_tx })
            .await
    }

    pub async fn trace(&self) -> Result<Vec<TraceSample>, SimulationError> {
        self.request(|response_tx| ClockCommand::Trace { response_tx })
            .await
    }

    pub async fn lessons(&self) -> Result<Vec<String>, SimulationError> {
        self.request(|response_tx| ClockCommand::Lessons { response_tx })
            .await
    }

    pub async fn steps(&self) -> Result<Vec<ProcedureStep>, SimulationError> {
        self.request(|response_tx| ClockCommand::Steps { response_tx })
            .await
    }
}

// ============================================================================
// Simulation Clock
// ============================================================================

pub struct SimulationClock<O: JobObserver> {
    simulator: Simulator,
    observer: O,
    rx: mpsc::Receiver<ClockCommand>,
}

impl<O: JobObserver> SimulationClock<O> {
    pub fn new(simulator: Simulator, observer: O) -> (Self, ClockHandle) {
        let (tx, rx) = mpsc::channel(32);
        let clock = Self {
            simulator,
            observer,
            rx,
        };
        (clock, ClockHandle { tx })
    }

    /// Run until the procedure is exhausted and return the post-job report.
    ///
    /// The first tick fires one period after start. Without a tick period
    /// (pacing disabled) ticks run back to back, yielding between ticks so
    /// queries are still served.
    pub async fn run(self) -> Result<JobReport, SimulationError> {
        let Self {
            mut simulator,
            mut observer,
            mut rx,
        } = self;

        info!(
            job_id = %simulator.job_id(),
            period = ?simulator.tick_period(),
            "SimulationClock starting"
        );

        let mut interval = simulator.tick_period().map(|period| {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        while !simulator.is_finished() {
            if simulator.ticks() >= simulator.max_ticks() {
                return Err(SimulationError::TickBudgetExhausted(simulator.max_ticks()));
            }

            match interval.as_mut() {
                Some(interval) => {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::tick_once(&mut simulator, &mut observer).await;
                        }
                        Some(cmd) = rx.recv() => {
                            Self::handle_command(&simulator, cmd);
                        }
                    }
                }
                None => {
                    while let Ok(cmd) = rx.try_recv() {
                        Self::handle_command(&simulator, cmd);
                    }
                    Self::tick_once(&mut simulator, &mut observer).await;
                    tokio::task::yield_now().await;
                }
            }
        }

        let report = simulator.report();
        observer.on_complete(&report).await;
        info!(
            job_id = %report.job_id,
            ticks = report.ticks,
            op_time_h = report.op_time_hours(),
            "SimulationClock stopped"
        );
        Ok(report)
    }

    async fn tick_once(simulator: &mut Simulator, observer: &mut O) {
        if let Some(outcome) = simulator.tick() {
            observer.on_snapshot(simulator.live(), &outcome.sample).await;
        }
    }

    fn handle_command(simulator: &Simulator, cmd: ClockCommand) {
        debug!(?cmd, "Clock command");
        match cmd {
            ClockCommand::Snapshot { response_tx } => {
                let _ = response_tx.send(simulator.live().clone());
            }
            ClockCommand::RecentLog { limit, response_tx } => {
                let _ = response_tx.send(simulator.recent_log(limit));
            }
            ClockCommand::Trace { response_tx } => {
                let _ = response_tx.send(simulator.trace().to_vec());
            }
            ClockCommand::Lessons { response_tx } => {
                let _ = response_tx.send(simulator.lessons().to_vec());
            }
            ClockCommand::Steps { response_tx } => {
                let _ = response_tx.send(simulator.steps().to_vec());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulatorConfig;
    use crate::types::{ConveyanceType, Procedure, SurveyStation, TfaModel, Well};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Recorder {
        snapshots: Arc<Mutex<Vec<LiveData>>>,
        completions: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl JobObserver for Recorder {
        async fn on_snapshot(&mut self, live: &LiveData, _sample: &TraceSample) {
            self.snapshots.lock().unwrap().push(live.clone());
        }

        async fn on_complete(&mut self, _report: &JobReport) {
            *self.completions.lock().unwrap() += 1;
        }
    }

    fn simulator(steps: &[&str], speed_multiplier: f64) -> Simulator {
        let well = Well {
            id: "T-1".to_string(),
            name: "Test Well".to_string(),
            field: "Test".to_string(),
            region: None,
            well_type: None,
            depth: None,
            status: "Shut-in".to_string(),
            issue: "None".to_string(),
            history: Vec::new(),
            deviation: Some(vec![SurveyStation::new(0.0, 0.0)]),
            completion: None,
        };
        let procedure = Procedure {
            name: "Clock test".to_string(),
            conveyance: ConveyanceType::Slickline,
            tool_weight: 150.0,
            friction_coefficient: 0.15,
            steps: steps.iter().map(ToString::to_string).collect(),
            tfa_model: TfaModel::default(),
        };
        let mut config = SimulatorConfig::default();
        config.simulation.speed_multiplier = speed_multiplier;
        Simulator::new(&well, &procedure, &config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_run_completes_once() {
        let recorder = Recorder::default();
        let (clock, handle) = SimulationClock::new(
            simulator(&["RIH to 100ft", "POOH."], 1.0),
            recorder.clone(),
        );

        let started = Instant::now();
        let report = clock.run().await.unwrap();

        // 8 ticks in, 8 ticks out, 2 s apart
        assert_eq!(report.ticks, 16);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(32) && elapsed < Duration::from_secs(33));
        assert!(report.is_complete());
        assert_eq!(recorder.snapshots.lock().unwrap().len(), 16);
        assert_eq!(*recorder.completions.lock().unwrap(), 1);

        assert_eq!(handle.snapshot().await, Err(SimulationError::ClockStopped));
    }

    #[tokio::test(start_paused = true)]
    async fn test_queries_answered_between_ticks() {
        let (clock, handle) = SimulationClock::new(simulator(&["RIH to 1,000ft"], 1.0), ());
        let job = tokio::spawn(clock.run());

        time::sleep(Duration::from_secs(5)).await;
        let live = handle.snapshot().await.unwrap();
        assert!(live.job_running);
        assert!(live.depth > 0.0);

        let log = handle.recent_log(10).await.unwrap();
        assert_eq!(log[0].text, "Starting Step 1: RIH to 1,000ft");
        assert_eq!(log[1].text, "Job initiated.");

        let steps = handle.steps().await.unwrap();
        assert!(steps[0].is_active());
        assert!(!handle.trace().await.unwrap().is_empty());
        assert!(handle.lessons().await.unwrap().is_empty());

        let report = job.await.unwrap().unwrap();
        assert!((report.final_state.depth - 1000.0).abs() < f64::EPSILON);
        assert_eq!(report.lessons.len(), 1);
    }

    #[tokio::test]
    async fn test_unpaced_run() {
        let (clock, _handle) = SimulationClock::new(simulator(&["RIH to 500ft", "POOH."], 0.0), ());
        let report = clock.run().await.unwrap();
        assert!(report.is_complete());
        assert!(report.final_state.depth.abs() < f64::EPSILON);
    }
}
