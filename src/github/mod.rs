//! A minimal client for the GitHub REST API.

use std::fmt::Debug;

use reqwest::{Method, RequestBuilder, Response, header};
use serde::Deserialize;
use tracing::error;

use crate::error::GitHubError;

pub mod workflow;

/// Sends authenticated requests to one GitHub REST API root.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GitHubClient {
    /// Creates a client for the given API root, authenticating with `token`.
    pub fn new(api_url: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.to_owned(),
            token: token.to_owned(),
        }
    }

    /// The API root every endpoint is resolved against.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Checks if `url` points below the API root, so the token may be sent to it.
    pub fn owns(&self, url: &str) -> bool {
        url.strip_prefix(self.api_url.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Builds a request for GitHub REST API.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .bearer_auth(&self.token)
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header(
                header::USER_AGENT,
                concat!("workflow-dispatch/", env!("CARGO_PKG_VERSION")),
            )
    }

    /// Sends a request, turning transport failures and failure statuses into a [`GitHubError`].
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Transport`] if no response arrives, or [`GitHubError::Status`] if the
    /// response status is a client or server error.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, GitHubError> {
        let response = request.send().await.map_err(|err| {
            error!("request failed: {err}");
            GitHubError::Transport(err)
        })?;

        let status = response.status();
        if !(status.is_client_error() || status.is_server_error()) {
            return Ok(response);
        }

        let url = response.url().to_string();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .map(str::to_owned)
                .unwrap_or_else(|| status.as_u16().to_string()),
        };
        error!("request to {url} failed: {} {message}", status.as_u16());

        Err(GitHubError::Status { status, message })
    }
}

/// Extracts the `rel="next"` target from a `Link` response header.
pub fn next_page(headers: &header::HeaderMap) -> Option<String> {
    let link = headers.get(header::LINK)?.to_str().ok()?;

    parse_link_header::parse_with_rel(link)
        .ok()?
        .remove("next")
        .map(|next| next.raw_uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn link(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::LINK, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn finds_the_next_page() {
        let headers = link(
            r#"<https://api.github.com/repositories/1/actions/workflows?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/actions/workflows?per_page=100&page=3>; rel="last""#,
        );
        assert_eq!(
            next_page(&headers).as_deref(),
            Some("https://api.github.com/repositories/1/actions/workflows?per_page=100&page=2")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let headers = link(
            r#"<https://api.github.com/repositories/1/actions/workflows?page=1>; rel="prev", <https://api.github.com/repositories/1/actions/workflows?page=1>; rel="first""#,
        );
        assert_eq!(next_page(&headers), None);
        assert_eq!(next_page(&HeaderMap::new()), None);
    }

    #[test]
    fn only_urls_below_the_api_root_are_owned() {
        let client = GitHubClient::new("https://api.github.com", "t0ken");
        assert!(client.owns("https://api.github.com/repos/octo/hello/actions/workflows"));
        assert!(!client.owns("https://api.github.com.evil.test/repos/octo/hello"));
        assert!(!client.owns("https://evil.test/repos/octo/hello"));
    }

    #[test]
    fn debug_output_hides_the_token() {
        let client = GitHubClient::new("https://api.github.com", "s3cret");
        assert!(!format!("{client:?}").contains("s3cret"));
    }
}
