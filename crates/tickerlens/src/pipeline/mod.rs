//! Analysis pipeline
//!
//! Fixed graph: router, conditional analyst fan-out, investment synthesis,
//! report aggregation. Stage progress is published over an event channel
//! owned by the caller; the pipeline is the only writer.

pub mod events;
pub mod orchestrator;

pub use events::{Progress, Stage, StageEvent, StageStatus};
pub use orchestrator::Analyzer;
