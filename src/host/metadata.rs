//! Installed plugin metadata
//!
//! Plugins declare their name and version in a comment header at the top of
//! their main file:
//!
//! ```text
//! <?php
//! /**
//!  * Plugin Name: Toolkit
//!  * Version: 1.2.9
//!  */
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Only the start of the file is scanned for headers
const HEADER_SCAN_BYTES: u64 = 8 * 1024;

static NAME_HEADER: LazyLock<Regex> = LazyLock::new(|| header_regex("Plugin Name"));
static VERSION_HEADER: LazyLock<Regex> = LazyLock::new(|| header_regex("Version"));

fn header_regex(field: &str) -> Regex {
    Regex::new(&format!(
        r"(?mi)^(?:[ \t]*<\?php)?[ \t/*#@]*{}:(.*)$",
        regex::escape(field)
    ))
    .expect("header pattern is valid")
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read plugin file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Plugin file {0} has no Version header")]
    MissingVersion(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMetadata {
    pub name: String,
    pub version: String,
}

/// Reads metadata of an installed plugin by its host identifier
pub trait PluginMetadataReader: Send + Sync {
    fn read(&self, plugin: &str) -> Result<PluginMetadata, MetadataError>;
}

/// Reads the comment header of `{plugins_dir}/{plugin}`
pub struct HeaderMetadataReader {
    plugins_dir: PathBuf,
}

impl HeaderMetadataReader {
    pub fn new(plugins_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
        }
    }

    fn read_header(path: &Path) -> io::Result<String> {
        let mut buf = Vec::new();
        File::open(path)?
            .take(HEADER_SCAN_BYTES)
            .read_to_end(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).replace('\r', "\n"))
    }
}

impl PluginMetadataReader for HeaderMetadataReader {
    fn read(&self, plugin: &str) -> Result<PluginMetadata, MetadataError> {
        let path = self.plugins_dir.join(plugin);
        debug!("Reading plugin header from {:?}", path);

        let header = Self::read_header(&path).map_err(|source| MetadataError::Io {
            path: path.clone(),
            source,
        })?;

        let version = header_value(&VERSION_HEADER, &header)
            .ok_or_else(|| MetadataError::MissingVersion(path.clone()))?;
        let name = header_value(&NAME_HEADER, &header).unwrap_or_default();

        Ok(PluginMetadata { name, version })
    }
}

fn header_value(pattern: &Regex, header: &str) -> Option<String> {
    let raw = pattern.captures(header)?.get(1)?.as_str();
    let value = cleanup_header_comment(raw);
    (!value.is_empty()).then(|| value.to_string())
}

/// Strips a trailing comment or PHP close tag left on the header line
fn cleanup_header_comment(value: &str) -> &str {
    let value = value.trim();
    let value = value.find("*/").map_or(value, |end| &value[..end]);
    let value = value.find("?>").map_or(value, |end| &value[..end]);
    value.trim()
}
