//! Update check against the latest release

use reqwest::header::HeaderMap;
use tracing::{debug, info, warn};

use crate::config::UpdaterConfig;
use crate::release::{ReleaseError, ReleaseSource};
use crate::update::descriptor::UpdateDescriptor;
use crate::update::semver::{self, CompareResult};

/// Decides whether the configured repository has a newer release than the installed plugin
pub struct UpdateResolver<S> {
    source: S,
    config: UpdaterConfig,
}

impl<S: ReleaseSource> UpdateResolver<S> {
    pub fn new(source: S, config: UpdaterConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Returns an update descriptor if the latest release is newer than `installed_version`.
    ///
    /// Failures to reach or read the releases API count as "no update". The host
    /// runs the check again on its next scheduled cycle.
    pub async fn check_for_update(&self, installed_version: &str) -> Option<UpdateDescriptor> {
        let repo = self.config.repository();

        let release = match self.source.latest_release(repo).await {
            Ok(release) => release,
            Err(ReleaseError::NotFound(_)) => {
                debug!("No published release for {}", repo);
                return None;
            }
            Err(e) => {
                warn!("Update check for {} failed: {}", repo, e);
                return None;
            }
        };

        match semver::compare(&release.tag_name, installed_version) {
            CompareResult::Newer => {
                info!(
                    "Update available for {}: {} -> {}",
                    self.config.plugin(),
                    installed_version,
                    release.tag_name
                );
                Some(UpdateDescriptor::from_release(&self.config, release))
            }
            CompareResult::Invalid => {
                warn!(
                    "Cannot compare release tag {:?} with installed version {:?}",
                    release.tag_name, installed_version
                );
                None
            }
            CompareResult::Same | CompareResult::Older => {
                debug!(
                    "{} is up to date ({} installed, {} released)",
                    self.config.plugin(),
                    installed_version,
                    release.tag_name
                );
                None
            }
        }
    }

    /// Adds the client headers to a request only if it downloads the pending release archive.
    ///
    /// Any other URL, including the archive of a different version, gets
    /// `base_headers` back unchanged so the token never leaks to other hosts.
    pub fn authorize_request(
        &self,
        url: &str,
        mut base_headers: HeaderMap,
        pending_version: &str,
    ) -> HeaderMap {
        let expected = self
            .source
            .download_url(self.config.repository(), pending_version);

        if url != expected {
            return base_headers;
        }

        debug!("Authorizing archive download: {}", url);
        for (name, value) in self.config.headers() {
            base_headers.insert(name.clone(), value.clone());
        }
        base_headers
    }
}
