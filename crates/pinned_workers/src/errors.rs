use thiserror::Error;

/// Errors that can occur when configuring or using a worker pool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The builder was given missing or contradictory inputs.
    #[error("invalid worker pool configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// Shutdown has begun; the pool no longer accepts tasks.
    #[error("the worker pool is no longer accepting tasks")]
    Stopped,
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
