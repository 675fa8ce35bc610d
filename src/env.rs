//! Defines the ambient environment variables provided by the GitHub Actions runner.
//!
//! Every value is read once, on first access, and never re-queried.

use crate::static_lazy_lock;

use std::env;

/// The REST API root used when `GITHUB_API_URL` is not provided.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Parses an environment variable from [`String`] to something else, wrapping any error in [`anyhow::Error`].
#[macro_export]
macro_rules! parse_env {
    ($key:expr => |$var:ident| $expr:expr) => {
        std::env::var($key)
            .map_err(|e| anyhow::anyhow!(e))
            .and_then(|$var| $expr)
    };
    ($key:expr => |$var:ident| $expr:expr; anyhow) => {
        $crate::parse_env!($key => |$var| $expr.map_err(|e| anyhow::anyhow!(e)))
    };
}

/// Reads an environment variable, treating a blank value the same as an absent one.
pub fn non_blank(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

static_lazy_lock! {
    /// The REST API root, which differs from [`DEFAULT_API_URL`] on GitHub Enterprise Server.
    pub GITHUB_API_URL: String = non_blank("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
}

static_lazy_lock! {
    /// The `owner/name` of the repository that triggered the current run.
    pub GITHUB_REPOSITORY: Option<String> = non_blank("GITHUB_REPOSITORY");
}

static_lazy_lock! {
    /// The git ref that triggered the current run.
    pub GITHUB_REF: Option<String> = non_blank("GITHUB_REF");
}

/// Decides whether step debug logging is on.
///
/// Either `RUNNER_DEBUG=1` or `ACTIONS_STEP_DEBUG=true` turns it on.
pub fn step_debug_enabled(runner_debug: Option<u8>, actions_step_debug: Option<bool>) -> bool {
    runner_debug == Some(1) || actions_step_debug == Some(true)
}

static_lazy_lock! {
    /// Whether step debug logging is enabled for the current run.
    pub STEP_DEBUG: bool = step_debug_enabled(
        parse_env!("RUNNER_DEBUG" => |s| s.trim().parse::<u8>(); anyhow).ok(),
        parse_env!("ACTIONS_STEP_DEBUG" => |s| s.trim().parse::<bool>(); anyhow).ok(),
    );
}
