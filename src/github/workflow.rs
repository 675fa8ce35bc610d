//! Workflows from GitHub REST API and related functions.

use std::collections::HashSet;

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{
    error::GitHubError,
    github::{GitHubClient, next_page},
};

/// The largest page size the listing endpoint accepts.
pub const PER_PAGE: u8 = 100;

/// Represents one page of workflows from GitHub REST API.
#[derive(Debug, Deserialize, Clone)]
pub struct Workflows {
    /// The number of workflows across all pages.
    pub total_count: u64,
    /// The workflows on this page.
    pub workflows: Vec<Workflow>,
}

/// Represents a workflow from GitHub REST API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Workflow {
    /// The numeric id, unique within a repository.
    pub id: u64,
    /// The display name, unique within a repository.
    pub name: String,
    /// Fields not used for matching, kept for diagnostics.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workflow {
    /// Checks if this workflow is named `reference` or has `reference` as its decimal id.
    pub fn matches(&self, reference: &str) -> bool {
        self.name == reference || self.id.to_string() == reference
    }
}

/// The parameters of a single `workflow_dispatch` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    /// The owner of the repository hosting the workflow.
    pub owner: String,
    /// The name of the repository hosting the workflow.
    pub repo: String,
    /// The resolved workflow id.
    pub workflow_id: u64,
    /// The git ref to run the workflow on.
    pub git_ref: String,
    /// The workflow inputs, forwarded verbatim.
    pub inputs: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct DispatchBody<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
    inputs: &'a Map<String, Value>,
}

/// Fetches every workflow of a repository, following pagination until the last page.
///
/// Next-page links are only followed below the API root of `client`, and each page is fetched at
/// most once.
///
/// # Errors
///
/// Returns a [`GitHubError`] if any page fails to load or parse, or if a next-page link leaves the
/// API root or revisits a page. No partial listing is returned.
pub async fn list_workflows(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
) -> Result<Vec<Workflow>, GitHubError> {
    let mut url = Some(format!(
        "{}/repos/{owner}/{repo}/actions/workflows?per_page={PER_PAGE}",
        client.api_url()
    ));
    let mut visited = HashSet::new();
    let mut workflows = Vec::new();
    let mut total_count = 0;

    while let Some(page_url) = url.take() {
        if !client.owns(&page_url) {
            return Err(GitHubError::Pagination {
                url: page_url,
                reason: "outside the API root",
            });
        }
        if !visited.insert(page_url.clone()) {
            return Err(GitHubError::Pagination {
                url: page_url,
                reason: "already fetched",
            });
        }
        debug!("fetching workflows from {page_url}…");

        let response = client
            .send(client.request(Method::GET, &page_url))
            .await?;
        url = next_page(response.headers());

        let page = response
            .json::<Workflows>()
            .await
            .map_err(GitHubError::Decode)?;
        total_count = page.total_count;
        workflows.extend(page.workflows);
    }

    if workflows.len() as u64 != total_count {
        warn!(
            "fetched {} workflows from {owner}/{repo}, but {total_count} were reported",
            workflows.len()
        );
    }
    match workflows.len() {
        1 => info!("fetched 1 workflow from {owner}/{repo}"),
        count => info!("fetched {count} workflows from {owner}/{repo}"),
    }
    Ok(workflows)
}

/// Triggers a `workflow_dispatch` event for the requested workflow.
///
/// # Errors
///
/// Returns a [`GitHubError`] if the request fails or GitHub rejects it.
pub async fn dispatch_workflow(
    client: &GitHubClient,
    request: DispatchRequest,
) -> Result<StatusCode, GitHubError> {
    let DispatchRequest {
        owner,
        repo,
        workflow_id,
        git_ref,
        inputs,
    } = request;
    let url = format!(
        "{}/repos/{owner}/{repo}/actions/workflows/{workflow_id}/dispatches",
        client.api_url()
    );
    debug!("dispatching workflow {workflow_id} on {git_ref} via {url}…");

    let response = client
        .send(client.request(Method::POST, &url).json(&DispatchBody {
            git_ref: &git_ref,
            inputs: &inputs,
        }))
        .await?;

    info!("dispatched workflow {workflow_id} on {git_ref}");
    Ok(response.status())
}
