mod machine;
mod state;

pub use machine::{SessionMachine, Transition};
pub use state::{SessionConfig, SessionState, BREAK_DURATION, WORK_DURATION};
