//! Commit records and deployment classification results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

pub mod matcher;

pub use matcher::{
    classify, classify_title, is_deployment_commit, template_names, MatchedTemplate,
};

/// A single commit as handed over by the host runner or read from git.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Opaque reference to the change, usually a web URL.
    pub url: String,
    /// Author handle, possibly empty.
    pub author_username: String,
    /// Author email, possibly empty.
    pub author_email: String,
    /// Full commit message, possibly multi-line.
    pub commit_message: String,
}

impl Commit {
    /// Returns the first line of the commit message.
    ///
    /// A trailing carriage return is dropped so CRLF messages produce the same
    /// title as LF ones.
    pub fn title(&self) -> &str {
        let first = self
            .commit_message
            .split('\n')
            .next()
            .unwrap_or_default();
        first.strip_suffix('\r').unwrap_or(first)
    }

    /// Returns the lines after the title, re-joined and trimmed.
    ///
    /// `None` when the message is a single line or the remainder is blank.
    pub fn body(&self) -> Option<String> {
        let (_, rest) = self.commit_message.split_once('\n')?;
        let body = rest.trim();
        (!body.is_empty()).then(|| body.to_string())
    }
}

/// Kind of deployment a commit announces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    /// A single service deployed at a specific version.
    Version,
    /// Configuration-only change.
    #[default]
    Config,
    /// Several services, domains or environments at once.
    Multiple,
}

impl CommitType {
    /// Returns the lower-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Config => "config",
            Self::Multiple => "multiple",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment target tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production.
    Prod,
    /// Staging.
    Sta,
    /// Development.
    Dev,
}

impl Environment {
    /// Returns the lower-case token used in channel names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prod => "prod",
            Self::Sta => "sta",
            Self::Dev => "dev",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prod" => Ok(Self::Prod),
            "sta" => Ok(Self::Sta),
            "dev" => Ok(Self::Dev),
            other => Err(anyhow::anyhow!("Unknown environment: {other}")),
        }
    }
}

/// Version slot of a deployment.
///
/// Aggregate deployments carry no single version; their variants render as the
/// fixed strings `config`, `multiple` and `multiple-envs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeployVersion {
    /// Semantic-version-like string as written in the title, e.g. `v1.37.0-RC.2`.
    Exact(String),
    /// Configuration-only change.
    Config,
    /// Several services in one environment.
    Multiple,
    /// Several environments at once.
    MultipleEnvs,
}

impl fmt::Display for DeployVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(version) => f.write_str(version),
            Self::Config => f.write_str("config"),
            Self::Multiple => f.write_str("multiple"),
            Self::MultipleEnvs => f.write_str("multiple-envs"),
        }
    }
}

impl Serialize for DeployVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fields extracted from a deployment commit title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentDetails {
    /// Logical product area, or `multiple`.
    pub domain: String,
    /// Deployment kind.
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    /// Deployed service, or `services` / `config` for aggregate deployments.
    pub service: String,
    /// Deployed version or aggregate marker.
    pub version: DeployVersion,
    /// Target environment. For multi-environment titles only the first one.
    pub environment: Environment,
}

/// Flat string form of a classification result.
///
/// The `Default` value is the placeholder returned for non-deployment commits:
/// every string is empty and `commit_type` is [`CommitType::Config`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMessageDetails {
    /// Domain name.
    pub domain: String,
    /// Deployment kind.
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    /// Service name.
    pub service: String,
    /// Version string or aggregate marker.
    pub version: String,
    /// Lower-case environment.
    pub environment: String,
}

impl From<&DeploymentDetails> for CommitMessageDetails {
    fn from(details: &DeploymentDetails) -> Self {
        Self {
            domain: details.domain.clone(),
            commit_type: details.commit_type,
            service: details.service.clone(),
            version: details.version.to_string(),
            environment: details.environment.to_string(),
        }
    }
}

/// Outcome of classifying one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Whether the commit announces a deployment.
    pub ok: bool,
    /// Name of the template that matched, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matcher: Option<&'static str>,
    /// Extracted fields, or the empty placeholder when `ok` is false.
    pub commit_message: CommitMessageDetails,
}

impl Classification {
    /// Returns the outcome for a commit that matched no template.
    pub fn not_deployment() -> Self {
        Self::default()
    }

    /// Returns the outcome for a successful match.
    pub fn deployment(matched: &MatchedTemplate) -> Self {
        Self {
            ok: true,
            matcher: Some(matched.name),
            commit_message: CommitMessageDetails::from(&matched.details),
        }
    }
}
