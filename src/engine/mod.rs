//! Execution phase: replays a plan against live filesystem state.

mod execute;

pub use execute::execute;
