//! Process exit codes
//!
//! Stable numeric codes so scripts can branch on failure classes without
//! parsing error text.

use dc_core::Error;

/// Exit codes returned by every subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    UsageError = 2,
    NetworkError = 3,
    IoError = 4,
    NotFound = 5,
}

impl ExitCode {
    /// Classify a core error into the exit code for its failure class
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::InvalidPath(_) => ExitCode::UsageError,
            Error::NotFound { .. } | Error::ProfileNotFound(_) => ExitCode::NotFound,
            Error::Service { status: 404, .. } => ExitCode::NotFound,
            Error::Transient { .. } | Error::Service { .. } | Error::Network(_) => {
                ExitCode::NetworkError
            }
            Error::Io(_) => ExitCode::IoError,
            Error::Ambiguous { .. } | Error::Auth(_) | Error::Config(_) => ExitCode::GeneralError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}
