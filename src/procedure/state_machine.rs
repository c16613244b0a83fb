//! Procedure step state machine
//!
//! Steps move `Pending -> Active -> Completed` strictly in order; the machine
//! moves `Running -> Finished` once, when the last step completes.

use serde::{Deserialize, Serialize};

use super::directive::StepDirective;

// ============================================================================
// Step State
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    Active,
    Completed,
}

/// One procedure step at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureStep {
    pub index: usize,
    pub text: String,
    /// Parsed once when the machine is built
    pub directive: StepDirective,
    pub status: StepStatus,
}

impl ProcedureStep {
    pub fn is_active(&self) -> bool {
        self.status == StepStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }

    /// 1-based step number used in log text.
    pub const fn number(&self) -> usize {
        self.index + 1
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    Running,
    Finished,
}

/// Outcome of completing the active step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepTransition {
    /// The step at `index` is now active
    Advanced { index: usize },
    /// The last step completed; the machine is finished
    Finished,
}

// ============================================================================
// State Machine
// ============================================================================

#[derive(Debug, Clone)]
pub struct ProcedureStateMachine {
    steps: Vec<ProcedureStep>,
    active: Option<usize>,
    state: MachineState,
}

impl ProcedureStateMachine {
    /// Build the machine with step 0 active.
    ///
    /// An empty step list starts `Running` with no active step and finishes
    /// on the first call to [`advance`](Self::advance).
    pub fn new<S: AsRef<str>>(texts: &[S]) -> Self {
        let steps: Vec<ProcedureStep> = texts
            .iter()
            .enumerate()
            .map(|(index, text)| ProcedureStep {
                index,
                text: text.as_ref().to_string(),
                directive: StepDirective::parse(text.as_ref()),
                status: if index == 0 {
                    StepStatus::Active
                } else {
                    StepStatus::Pending
                },
            })
            .collect();
        let active = if steps.is_empty() { None } else { Some(0) };

        Self {
            steps,
            active,
            state: MachineState::Running,
        }
    }

    pub fn steps(&self) -> &[ProcedureStep] {
        &self.steps
    }

    pub fn active_step(&self) -> Option<&ProcedureStep> {
        self.active.and_then(|i| self.steps.get(i))
    }

    pub const fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub const fn state(&self) -> MachineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == MachineState::Finished
    }

    /// Complete the active step and activate the next one.
    ///
    /// Calling this on a finished machine is a no-op that reports `Finished`.
    pub fn advance(&mut self) -> StepTransition {
        if self.is_finished() {
            return StepTransition::Finished;
        }

        let next = match self.active {
            Some(i) => {
                if let Some(step) = self.steps.get_mut(i) {
                    step.status = StepStatus::Completed;
                }
                i + 1
            }
            None => 0,
        };

        match self.steps.get_mut(next) {
            Some(step) => {
                step.status = StepStatus::Active;
                self.active = Some(next);
                StepTransition::Advanced { index: next }
            }
            None => {
                self.active = None;
                self.state = MachineState::Finished;
                StepTransition::Finished
            }
        }
    }
}
