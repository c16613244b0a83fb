//! Live operation simulation
//!
//! [`Simulator`] is the synchronous tick core: kinematics, tension,
//! restriction encounters, trace, log and step transitions for one job.
//! [`SimulationClock`] paces it on a tokio interval and serves read-only
//! queries through a [`ClockHandle`].

pub mod clock;
pub mod event_log;
pub mod lessons;
pub mod report;
pub mod simulator;
pub mod trace;

pub use clock::{ClockCommand, ClockHandle, JobObserver, SimulationClock};
pub use event_log::{EventLog, TickContext, SYSTEM_USER};
pub use lessons::{EncounterTracker, LessonGenerator, SUCCESS_LESSON};
pub use report::JobReport;
pub use simulator::{SimulationError, Simulator, TickOutcome};
pub use trace::TraceBuffer;
