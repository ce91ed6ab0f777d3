use thiserror::Error;

// The two ways a run can be misconfigured. Both fire before any lap is
// simulated; the core never retries and never substitutes a default.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("unknown compound \"{0}\"")]
    UnknownCompound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
