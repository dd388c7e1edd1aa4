use std::io;

use thiserror::Error;

/// Errors that can occur when querying processor topology or applying
/// thread affinity.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The build target has no processor topology backend. Every operation
    /// of [`Processor`][crate::Processor] reports this on such platforms.
    #[error("processor topology operations are not supported on this platform")]
    UnsupportedPlatform,

    /// The operating system rejected an affinity query or update.
    #[error("thread affinity operation failed: {0}")]
    Affinity(#[from] io::Error),

    /// The platform handed us a malformed cpulist string.
    #[error("invalid cpulist syntax: '{invalid_value}': {problem}")]
    InvalidCpulist {
        /// The fragment that failed to parse.
        invalid_value: String,
        /// What was wrong with it.
        problem: String,
    },
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
