pub mod turn;
pub mod worker;

pub use turn::{process_capture, TurnOutcome};
pub use worker::{Pipeline, PipelineCommand, PipelineEvent, PipelineHandle};
