//! Source trait for fetching release metadata

use crate::release::error::ReleaseError;
use crate::release::types::{ReleaseInfo, RepositoryRef};

/// Trait for fetching releases of a repository
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetches the latest published release of `repo`
    ///
    /// # Returns
    /// * `Ok(ReleaseInfo)` - Release with a non-empty tag
    /// * `Err(ReleaseError)` - If the request fails or the release has no tag
    async fn latest_release(&self, repo: &RepositoryRef) -> Result<ReleaseInfo, ReleaseError>;

    /// Returns the archive download URL for `repo` at `version`
    fn download_url(&self, repo: &RepositoryRef, version: &str) -> String;
}
