//! Shared data structures for well intervention planning and simulation
//!
//! - `well`: static well reference data (survey, completion, history)
//! - `procedure`: conveyance types, TFA envelope curves, planning records
//! - `live`: the per-tick `LiveData` snapshot, trace samples, log entries

mod live;
mod procedure;
mod well;

pub use live::*;
pub use procedure::*;
pub use well::*;
