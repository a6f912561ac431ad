//! Pipeline error taxonomy.
//!
//! Every stage reports failures as a typed variant so the build log names the
//! stage that broke, not just an errno. The orchestrator never recovers from
//! any of these; the first failure aborts the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A required build setting was not present in the environment.
    #[error("missing required environment variable '{0}'")]
    MissingConfiguration(String),

    /// Copying the bundle into the build products directory failed.
    #[error("failed to copy framework: {0}")]
    CopyFailed(String),

    /// `lipo -info` failed or produced output we could not parse.
    #[error("failed to read architectures: {0}")]
    InspectionFailed(String),

    /// Removing one architecture slice failed.
    #[error("failed to strip {architecture}: {reason}")]
    StripFailed {
        architecture: String,
        reason: String,
    },

    /// `codesign` rejected the bundle or the identity.
    #[error("failed to sign framework: {0}")]
    SigningFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
