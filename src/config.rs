use std::path::PathBuf;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use thiserror::Error;

use crate::release::RepositoryRef;

/// Name of the host transient holding pending plugin updates
pub const UPDATE_TRANSIENT: &str = "update_plugins";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for header {0}")]
    InvalidHeader(&'static str),
}

/// Settings for one plugin updated from one GitHub repository
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    plugin_file: String,
    plugin_slug: String,
    plugin: String,
    repository: RepositoryRef,
    headers: HeaderMap,
}

impl UpdaterConfig {
    /// Builds a config from raw settings.
    ///
    /// Every value is sanitized first. All settings except `access_token` are
    /// required, and an empty token is the same as no token.
    pub fn new(
        plugin_file: &str,
        plugin_slug: &str,
        owner: &str,
        repository: &str,
        access_token: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let plugin_file = required("plugin_file", plugin_file)?;
        let plugin_slug = required("plugin_slug", plugin_slug)?;
        let owner = required("github_author", owner)?;
        let repository = required("github_repository", repository)?;
        let access_token = access_token.map(sanitize).filter(|t| !t.is_empty());

        let headers = client_headers(&plugin_slug, access_token.as_deref())?;

        Ok(Self {
            plugin: format!("{}/{}.php", plugin_file, plugin_slug),
            plugin_file,
            plugin_slug,
            repository: RepositoryRef::new(owner, repository),
            headers,
        })
    }

    /// Directory name of the installed plugin
    pub fn plugin_file(&self) -> &str {
        &self.plugin_file
    }

    pub fn plugin_slug(&self) -> &str {
        &self.plugin_slug
    }

    /// Host plugin identifier (`{plugin_file}/{plugin_slug}.php`)
    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    /// Headers identifying this client to GitHub, including the token if configured
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = sanitize(value);
    if value.is_empty() {
        return Err(ConfigError::MissingField(field));
    }
    Ok(value)
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

fn client_headers(plugin_slug: &str, access_token: Option<&str>) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();

    let user_agent = HeaderValue::from_str(&format!("{} updater", plugin_slug))
        .map_err(|_| ConfigError::InvalidHeader("User-Agent"))?;
    headers.insert(USER_AGENT, user_agent);

    if let Some(token) = access_token {
        let mut authorization = HeaderValue::from_str(&format!("token {}", token))
            .map_err(|_| ConfigError::InvalidHeader("Authorization"))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);
    }

    Ok(headers)
}

/// Returns the path to the data directory for release-updater.
/// Uses $XDG_DATA_HOME/release-updater if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-updater,
/// or ./release-updater if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the update transient database.
pub fn db_path() -> PathBuf {
    data_dir().join("updates.db")
}

/// Returns the directory log files are written to.
pub fn log_dir() -> PathBuf {
    data_dir()
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("release-updater")
}
