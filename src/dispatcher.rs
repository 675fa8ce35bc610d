//! Resolves a workflow reference against the repository listing and dispatches it.

use reqwest::StatusCode;
use tracing::{Level, debug, enabled, error, info};

use crate::{
    config::{AmbientContext, DispatchConfig, RawInputs},
    error::DispatchError,
    github::{
        GitHubClient,
        workflow::{DispatchRequest, Workflow, dispatch_workflow, list_workflows},
    },
    outcome::Outcome,
};

/// Finds the first workflow in listing order whose name or decimal id equals `reference`.
///
/// Comparison is exact and case-sensitive. A workflow named with digits that collide with another
/// workflow's id is resolved by listing order alone.
pub fn resolve_workflow<'a>(workflows: &'a [Workflow], reference: &str) -> Option<&'a Workflow> {
    workflows.iter().find(|workflow| workflow.matches(reference))
}

/// Lists, resolves and dispatches workflows through one [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: GitHubClient,
}

impl Dispatcher {
    /// Creates a [`Dispatcher`] on top of an existing client.
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    /// Creates a [`Dispatcher`] authenticated for the API root of `config`.
    pub fn for_config(config: &DispatchConfig) -> Self {
        Self::new(GitHubClient::new(&config.api_url, &config.token))
    }

    /// Resolves the configured workflow and triggers it exactly once.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered. The dispatch call is never issued unless the
    /// complete listing produced a match.
    pub async fn dispatch(&self, config: DispatchConfig) -> Result<StatusCode, DispatchError> {
        let DispatchConfig {
            owner,
            repo,
            workflow,
            git_ref,
            inputs,
            ..
        } = config;

        let workflows = list_workflows(&self.client, &owner, &repo)
            .await
            .map_err(DispatchError::RemoteList)?;

        if enabled!(Level::DEBUG) {
            match serde_json::to_string_pretty(&workflows) {
                Ok(json) => {
                    debug!("### START List Workflows response data");
                    debug!("{json}");
                    debug!("### END:  List Workflows response data");
                }
                Err(err) => debug!("failed to serialize workflows: {err}"),
            }
        }

        let Some(found) = resolve_workflow(&workflows, &workflow) else {
            error!("no workflow matches '{workflow}' in {owner}/{repo}");
            return Err(DispatchError::WorkflowNotFound {
                workflow,
                owner,
                repo,
            });
        };
        info!("workflow id is: {}", found.id);

        dispatch_workflow(
            &self.client,
            DispatchRequest {
                owner,
                repo,
                workflow_id: found.id,
                git_ref,
                inputs,
            },
        )
        .await
        .map_err(DispatchError::RemoteDispatch)
    }
}

/// Runs one dispatch from raw inputs, collapsing every failure into a single [`Outcome::Failure`].
///
/// Configuration is resolved completely before any network access.
pub async fn run(raw: RawInputs, ambient: &AmbientContext) -> Outcome {
    Outcome::from(try_run(raw, ambient).await)
}

async fn try_run(raw: RawInputs, ambient: &AmbientContext) -> Result<StatusCode, DispatchError> {
    let config = DispatchConfig::resolve(raw, ambient)?;
    debug!("resolved configuration: {config:?}");

    Dispatcher::for_config(&config).dispatch(config).await
}
