//! Output types consumed by the host's update UI

use serde::{Deserialize, Serialize};

use crate::config::UpdaterConfig;
use crate::release::ReleaseInfo;

/// Pending update for a plugin, stored in the host's update transient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDescriptor {
    pub slug: String,
    /// Host plugin identifier (e.g., "toolkit/toolkit.php")
    pub plugin: String,
    /// Release tag as published, including any "v" prefix
    pub new_version: String,
    /// Release page
    pub url: String,
    /// Archive the host downloads to install the update
    pub package: String,
    pub sections: DescriptionSections,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionSections {
    #[serde(default)]
    pub description: String,
}

impl UpdateDescriptor {
    pub fn from_release(config: &UpdaterConfig, release: ReleaseInfo) -> Self {
        Self {
            slug: config.plugin_slug().to_string(),
            plugin: config.plugin().to_string(),
            new_version: release.tag_name,
            url: release.html_url,
            package: release.zipball_url,
            sections: DescriptionSections {
                description: release.body.unwrap_or_default(),
            },
        }
    }
}

/// Update details shown when the user opens the plugin's "view details" dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInformation {
    pub name: String,
    pub slug: String,
    pub version: String,
    pub sections: ChangelogSections,
    pub download_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogSections {
    pub changelog: String,
}

impl PluginInformation {
    /// Builds the details view, with empty version fields when no update is pending
    pub fn new(name: &str, slug: &str, pending: Option<&UpdateDescriptor>) -> Self {
        Self {
            name: name.to_string(),
            slug: slug.to_string(),
            version: pending.map(|d| d.new_version.clone()).unwrap_or_default(),
            sections: ChangelogSections {
                changelog: pending
                    .map(|d| d.sections.description.clone())
                    .unwrap_or_default(),
            },
            download_link: pending.map(|d| d.package.clone()).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> UpdaterConfig {
        UpdaterConfig::new("toolkit", "toolkit", "softtent", "toolkit", None).unwrap()
    }

    fn release() -> ReleaseInfo {
        ReleaseInfo {
            tag_name: "v1.3.0".to_string(),
            html_url: "https://github.com/softtent/toolkit/releases/tag/v1.3.0".to_string(),
            zipball_url: "https://api.github.com/repos/softtent/toolkit/zipball/v1.3.0".to_string(),
            body: Some("- Fixed settings page".to_string()),
        }
    }

    #[test]
    fn from_release_serializes_to_host_field_names() {
        let descriptor = UpdateDescriptor::from_release(&config(), release());
        let json = serde_json::to_value(&descriptor).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "slug": "toolkit",
                "plugin": "toolkit/toolkit.php",
                "new_version": "v1.3.0",
                "url": "https://github.com/softtent/toolkit/releases/tag/v1.3.0",
                "package": "https://api.github.com/repos/softtent/toolkit/zipball/v1.3.0",
                "sections": { "description": "- Fixed settings page" }
            })
        );
    }

    #[test]
    fn plugin_information_uses_pending_update() {
        let descriptor = UpdateDescriptor::from_release(&config(), release());
        let info = PluginInformation::new("Toolkit", "toolkit", Some(&descriptor));

        assert_eq!(info.version, "v1.3.0");
        assert_eq!(info.sections.changelog, "- Fixed settings page");
        assert_eq!(info.download_link, descriptor.package);
    }

    #[test]
    fn plugin_information_is_blank_without_pending_update() {
        let info = PluginInformation::new("Toolkit", "toolkit", None);

        assert_eq!(info.name, "Toolkit");
        assert!(info.version.is_empty());
        assert!(info.sections.changelog.is_empty());
        assert!(info.download_link.is_empty());
    }
}
