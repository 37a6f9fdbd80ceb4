#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("Reconciliation round limit reached after {rounds} rounds without approval")]
    RoundLimitExceeded { rounds: u32 },

    #[error("Cycle aborted by operator before approval")]
    CycleAborted,

    #[error("Invalid section '{0}': expected accomplishments, blockers, or plans")]
    InvalidSection(String),

    #[error("Project root not found")]
    ProjectRootNotFound,

    #[error("No finalized standup snapshot for {date}")]
    SnapshotNotFound { date: String },
}
