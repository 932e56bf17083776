//! Common types for release metadata

use std::fmt;

use serde::Deserialize;

/// A repository hosted on GitHub, identified by owner and name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Latest release as reported by the releases API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseInfo {
    /// Release tag, conventionally prefixed with "v" (e.g., "v1.3.0")
    #[serde(default)]
    pub tag_name: String,
    /// Human-readable release page
    #[serde(default)]
    pub html_url: String,
    /// Provider-generated archive of the repository at this tag
    #[serde(default)]
    pub zipball_url: String,
    /// Release notes in markdown
    #[serde(default)]
    pub body: Option<String>,
}
