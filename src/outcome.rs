//! The tagged result of a dispatch run.

use reqwest::StatusCode;

use crate::error::{DispatchError, ErrorKind};

/// The terminal result of a dispatch run.
#[non_exhaustive]
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The dispatch call returned without an error.
    Success {
        /// The status code of the dispatch response, reported but not interpreted.
        status: StatusCode,
    },
    /// The run stopped at the first error.
    Failure {
        /// The category of the error.
        kind: ErrorKind,
        /// The user-visible failure message.
        message: String,
    },
}

impl From<Result<StatusCode, DispatchError>> for Outcome {
    fn from(result: Result<StatusCode, DispatchError>) -> Self {
        match result {
            Ok(status) => Self::Success { status },
            Err(err) => Self::Failure {
                kind: err.kind(),
                message: err.to_string(),
            },
        }
    }
}
