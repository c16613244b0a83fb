//! Procedure execution
//!
//! Step texts are turned into [`StepDirective`]s once, when the
//! [`ProcedureStateMachine`] is built. The tick loop only reads the
//! directive of the active step.

mod directive;
mod state_machine;

pub use directive::{parse_target_depth, Motion, StepDirective};
pub use state_machine::{
    MachineState, ProcedureStateMachine, ProcedureStep, StepStatus, StepTransition,
};
