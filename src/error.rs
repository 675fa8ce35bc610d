//! Errors raised while resolving and dispatching a workflow.

use reqwest::StatusCode;

/// An error returned by a GitHub REST API call.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum GitHubError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with a failure status.
    #[error("{message}")]
    Status {
        /// The HTTP status of the response.
        status: StatusCode,
        /// The `message` field of the response body, or the canonical reason when there is none.
        message: String,
    },

    /// The response body could not be parsed.
    #[error("failed to parse response: {0}")]
    Decode(#[source] reqwest::Error),

    /// A `Link` header pointed at a page that must not be followed.
    #[error("refusing to follow next page {url}: {reason}")]
    Pagination {
        /// The rejected next-page URL.
        url: String,
        /// Why the URL was rejected.
        reason: &'static str,
    },
}

/// The single error that terminates a dispatch run.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A required input is missing or malformed.
    #[error("{0}")]
    Configuration(String),

    /// The `inputs` value is not a JSON object.
    #[error("inputs must be a JSON object: {0}")]
    InvalidInputs(#[source] serde_json::Error),

    /// Listing the repository workflows failed.
    #[error("{0}")]
    RemoteList(#[source] GitHubError),

    /// No listed workflow matched the requested name or id.
    #[error("Unable to find workflow '{workflow}' in {owner}/{repo}")]
    WorkflowNotFound {
        /// The requested workflow name or id.
        workflow: String,
        /// The owner of the searched repository.
        owner: String,
        /// The name of the searched repository.
        repo: String,
    },

    /// Triggering the resolved workflow failed.
    #[error("{0}")]
    RemoteDispatch(#[source] GitHubError),
}

/// The category of a [`DispatchError`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected before any network access.
    Configuration,
    /// The workflow listing failed.
    RemoteList,
    /// The listing succeeded without a match.
    WorkflowNotFound,
    /// The dispatch call failed.
    RemoteDispatch,
}

impl DispatchError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) | Self::InvalidInputs(_) => ErrorKind::Configuration,
            Self::RemoteList(_) => ErrorKind::RemoteList,
            Self::WorkflowNotFound { .. } => ErrorKind::WorkflowNotFound,
            Self::RemoteDispatch(_) => ErrorKind::RemoteDispatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_reference_and_repository() {
        let err = DispatchError::WorkflowNotFound {
            workflow: "Missing".into(),
            owner: "octo".into(),
            repo: "hello".into(),
        };
        let message = err.to_string();
        assert!(message.contains("'Missing'"));
        assert!(message.contains("octo/hello"));
        assert_eq!(err.kind(), ErrorKind::WorkflowNotFound);
    }

    #[test]
    fn invalid_inputs_are_configuration_errors() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert_eq!(
            DispatchError::InvalidInputs(source).kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn status_errors_forward_the_platform_message() {
        let err = DispatchError::RemoteDispatch(GitHubError::Status {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "Workflow does not have 'workflow_dispatch' trigger".into(),
        });
        assert_eq!(
            err.to_string(),
            "Workflow does not have 'workflow_dispatch' trigger"
        );
    }
}
