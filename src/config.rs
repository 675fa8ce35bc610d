//! Resolves the run configuration from explicit inputs and the ambient runner context.

use std::fmt::Debug;

use clap::Parser;
use serde_json::{Map, Value};

use crate::{
    env::{GITHUB_API_URL, GITHUB_REF, GITHUB_REPOSITORY},
    error::DispatchError,
};

/// The explicit inputs of a run, read from flags or from `INPUT_*` variables set by the runner.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "workflow-dispatch", version, about)]
pub struct RawInputs {
    /// The token used to authenticate against the GitHub REST API.
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// The name or numeric id of the workflow to trigger.
    #[arg(long, env = "INPUT_WORKFLOW")]
    pub workflow: Option<String>,

    /// The `owner/name` of the repository hosting the workflow.
    #[arg(long, env = "INPUT_REPO")]
    pub repo: Option<String>,

    /// The branch, tag or SHA to run the workflow on.
    #[arg(long = "ref", env = "INPUT_REF")]
    pub git_ref: Option<String>,

    /// The workflow inputs as a JSON object.
    #[arg(long, env = "INPUT_INPUTS")]
    pub inputs: Option<String>,
}

/// Values supplied implicitly by the runner, used when an explicit input is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbientContext {
    /// The `owner/name` of the repository that triggered the run.
    pub repository: Option<String>,
    /// The git ref that triggered the run.
    pub git_ref: Option<String>,
    /// The REST API root.
    pub api_url: String,
}

impl AmbientContext {
    /// Captures the ambient context of the current process.
    pub fn current() -> Self {
        Self {
            repository: GITHUB_REPOSITORY.clone(),
            git_ref: GITHUB_REF.clone(),
            api_url: GITHUB_API_URL.clone(),
        }
    }
}

/// The fully resolved parameters of one dispatch run.
#[derive(Clone, PartialEq)]
pub struct DispatchConfig {
    /// The token used to authenticate against the GitHub REST API.
    pub token: String,
    /// The owner of the target repository.
    pub owner: String,
    /// The name of the target repository.
    pub repo: String,
    /// The requested workflow name or id, matched verbatim.
    pub workflow: String,
    /// The git ref to run the workflow on.
    pub git_ref: String,
    /// The workflow inputs, forwarded verbatim.
    pub inputs: Map<String, Value>,
    /// The REST API root.
    pub api_url: String,
}

impl Debug for DispatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchConfig")
            .field("token", &"***")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("workflow", &self.workflow)
            .field("git_ref", &self.git_ref)
            .field("inputs", &self.inputs)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl DispatchConfig {
    /// Resolves each value through the chain `explicit input → ambient context`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required value is missing, if `repo` is not in the
    /// `owner/name` format, or if `inputs` is not a JSON object.
    pub fn resolve(raw: RawInputs, ambient: &AmbientContext) -> Result<Self, DispatchError> {
        let token = required(raw.token, "token")?;
        let workflow = required(raw.workflow, "workflow")?;

        let git_ref = present(raw.git_ref)
            .or_else(|| ambient.git_ref.clone())
            .ok_or_else(|| {
                DispatchError::Configuration(
                    "no ref supplied and GITHUB_REF is not set".to_owned(),
                )
            })?;

        let repository = present(raw.repo)
            .or_else(|| ambient.repository.clone())
            .ok_or_else(|| {
                DispatchError::Configuration(
                    "no repo supplied and GITHUB_REPOSITORY is not set".to_owned(),
                )
            })?;
        let (owner, repo) = split_repository(&repository)?;

        let inputs = parse_inputs(raw.inputs.as_deref())?;

        Ok(Self {
            token,
            owner,
            repo,
            workflow,
            git_ref,
            inputs,
            api_url: ambient.api_url.trim_end_matches('/').to_owned(),
        })
    }
}

/// Parses the workflow inputs. A blank value yields an empty object.
///
/// # Errors
///
/// Returns [`DispatchError::InvalidInputs`] if the value is not a JSON object.
pub fn parse_inputs(inputs: Option<&str>) -> Result<Map<String, Value>, DispatchError> {
    match inputs.map(str::trim) {
        None | Some("") => Ok(Map::new()),
        Some(json) => serde_json::from_str(json).map_err(DispatchError::InvalidInputs),
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String, DispatchError> {
    present(value).ok_or_else(|| {
        DispatchError::Configuration(format!("Input required and not supplied: {name}"))
    })
}

fn split_repository(repository: &str) -> Result<(String, String), DispatchError> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_owned(), repo.to_owned()))
        }
        _ => Err(DispatchError::Configuration(format!(
            "repo must be in the format owner/name, got '{repository}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{env::DEFAULT_API_URL, error::ErrorKind};

    fn ambient() -> AmbientContext {
        AmbientContext {
            repository: Some("octo/ambient".into()),
            git_ref: Some("refs/heads/main".into()),
            api_url: DEFAULT_API_URL.into(),
        }
    }

    fn raw() -> RawInputs {
        RawInputs {
            token: Some("t0ken".into()),
            workflow: Some("Deploy".into()),
            ..Default::default()
        }
    }

    #[test]
    fn falls_back_to_the_ambient_context() {
        let config = DispatchConfig::resolve(raw(), &ambient()).unwrap();
        assert_eq!(config.owner, "octo");
        assert_eq!(config.repo, "ambient");
        assert_eq!(config.git_ref, "refs/heads/main");
        assert!(config.inputs.is_empty());
    }

    #[test]
    fn explicit_inputs_win_over_ambient_ones() {
        let config = DispatchConfig::resolve(
            RawInputs {
                repo: Some("other/place".into()),
                git_ref: Some("v1.2.0".into()),
                inputs: Some(r#"{"env": "prod", "count": "3"}"#.into()),
                ..raw()
            },
            &ambient(),
        )
        .unwrap();
        assert_eq!((config.owner.as_str(), config.repo.as_str()), ("other", "place"));
        assert_eq!(config.git_ref, "v1.2.0");
        assert_eq!(config.inputs["env"], "prod");
    }

    #[test]
    fn blank_values_count_as_absent() {
        let config = DispatchConfig::resolve(
            RawInputs {
                repo: Some("  ".into()),
                git_ref: Some(String::new()),
                inputs: Some(" ".into()),
                ..raw()
            },
            &ambient(),
        )
        .unwrap();
        assert_eq!(config.repo, "ambient");
        assert_eq!(config.git_ref, "refs/heads/main");
    }

    #[test]
    fn missing_workflow_is_reported() {
        let err = DispatchConfig::resolve(
            RawInputs {
                workflow: None,
                ..raw()
            },
            &ambient(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("workflow"));
    }

    #[test]
    fn malformed_repo_is_rejected() {
        for repo in ["no-slash", "/name", "owner/", "a/b/c"] {
            let err = DispatchConfig::resolve(
                RawInputs {
                    repo: Some(repo.into()),
                    ..raw()
                },
                &ambient(),
            )
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration, "{repo}");
        }
    }

    #[test]
    fn inputs_must_be_a_json_object() {
        assert!(matches!(
            parse_inputs(Some("{not json")),
            Err(DispatchError::InvalidInputs(_))
        ));
        assert!(matches!(
            parse_inputs(Some(r#"["a", "b"]"#)),
            Err(DispatchError::InvalidInputs(_))
        ));
        assert!(parse_inputs(None).unwrap().is_empty());
    }

    #[test]
    fn api_url_trailing_slash_is_trimmed() {
        let config = DispatchConfig::resolve(
            raw(),
            &AmbientContext {
                api_url: "https://ghe.example.com/api/v3/".into(),
                ..ambient()
            },
        )
        .unwrap();
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn debug_output_hides_the_token() {
        let config = DispatchConfig::resolve(raw(), &ambient()).unwrap();
        assert!(!format!("{config:?}").contains("t0ken"));
    }

    #[test]
    fn flags_are_parsed() {
        let raw = RawInputs::try_parse_from([
            "workflow-dispatch",
            "--token",
            "abc",
            "--workflow",
            "42",
            "--ref",
            "main",
        ])
        .unwrap();
        assert_eq!(raw.workflow.as_deref(), Some("42"));
        assert_eq!(raw.git_ref.as_deref(), Some("main"));
    }
}
