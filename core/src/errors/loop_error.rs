use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum LoopError {
    #[error("event loop exceeded {limit} steps")]
    #[diagnostic(help(
        "a job keeps scheduling more work; raise the limit with Engine::with_max_steps"
    ))]
    StepLimitExceeded { limit: usize },

    #[error("promise #{id} is still pending after the event loop went idle")]
    StillPending { id: u64 },
}
