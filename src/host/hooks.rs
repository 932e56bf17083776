//! Callbacks for the host's plugin update lifecycle
//!
//! The host calls these at four points:
//! - before saving its update transient ([`PluginUpdater::check_update`])
//! - before every outbound HTTP request ([`PluginUpdater::http_request_headers`])
//! - after extracting a downloaded package ([`PluginUpdater::source_selection`])
//! - when showing update details ([`PluginUpdater::plugin_information`])

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::header::HeaderMap;
use tracing::{debug, warn};

use crate::config::UpdaterConfig;
use crate::host::metadata::PluginMetadataReader;
use crate::host::store::{StoreError, UpdateStore, UpdateTransient};
use crate::release::ReleaseSource;
use crate::update::{
    PluginInformation, RelocationError, SourceRelocator, UpdateDescriptor, UpdateResolver,
};

/// Action name the host uses when requesting update details
pub const PLUGIN_INFORMATION_ACTION: &str = "plugin_information";

pub struct PluginUpdater<S> {
    resolver: UpdateResolver<S>,
    relocator: SourceRelocator,
    store: Arc<dyn UpdateStore>,
    metadata: Box<dyn PluginMetadataReader>,
}

impl<S: ReleaseSource> PluginUpdater<S> {
    pub fn new(
        config: UpdaterConfig,
        source: S,
        store: Arc<dyn UpdateStore>,
        metadata: Box<dyn PluginMetadataReader>,
    ) -> Self {
        Self {
            resolver: UpdateResolver::new(source, config),
            relocator: SourceRelocator::default(),
            store,
            metadata,
        }
    }

    pub fn with_relocator(mut self, relocator: SourceRelocator) -> Self {
        self.relocator = relocator;
        self
    }

    pub fn config(&self) -> &UpdaterConfig {
        self.resolver.config()
    }

    /// Records a pending update in `transient` when a newer release exists.
    ///
    /// A transient the host has not filled with installed versions yet is
    /// returned untouched.
    pub async fn check_update(&self, mut transient: UpdateTransient) -> UpdateTransient {
        if transient.checked.is_empty() {
            debug!("Transient has no checked plugins, skipping update check");
            return transient;
        }

        let plugin = self.config().plugin();
        let installed = match self.metadata.read(plugin) {
            Ok(metadata) => metadata.version,
            Err(e) => {
                warn!("Cannot read installed version of {}: {}", plugin, e);
                return transient;
            }
        };

        if let Some(descriptor) = self.resolver.check_for_update(&installed).await {
            transient.response.insert(plugin.to_string(), descriptor);
        }

        transient
    }

    /// Runs a full check cycle against the store, the way the host's scheduled check does.
    ///
    /// Installed versions carry over from the stored transient, pending
    /// updates do not, so an update that has since been installed disappears.
    pub async fn run_check(&self, installed_version: &str) -> Result<UpdateTransient, StoreError> {
        let mut checked = self
            .store
            .load()?
            .map(|previous| previous.checked)
            .unwrap_or_default();
        checked.insert(
            self.config().plugin().to_string(),
            installed_version.to_string(),
        );

        let transient = self
            .check_update(UpdateTransient::begin_cycle(checked))
            .await;
        self.store.save(&transient)?;

        Ok(transient)
    }

    /// Returns the headers for an outbound request, authorized only for the pending archive
    pub fn http_request_headers(&self, url: &str, headers: HeaderMap) -> HeaderMap {
        let Some(pending) = self.pending_update() else {
            return headers;
        };

        self.resolver
            .authorize_request(url, headers, &pending.new_version)
    }

    /// Moves an extracted package of this plugin to `remote_source/{plugin_file}`.
    ///
    /// Packages of other plugins pass through untouched.
    pub fn source_selection(
        &self,
        source: &Path,
        remote_source: &Path,
        hook_plugin: Option<&str>,
    ) -> Result<PathBuf, RelocationError> {
        if hook_plugin != Some(self.config().plugin()) {
            return Ok(source.to_path_buf());
        }

        let expected = remote_source.join(self.config().plugin_file());
        self.relocator.relocate(source, &expected)
    }

    /// Builds the update details view, or `None` to leave the host's own result in place
    pub fn plugin_information(&self, action: &str, slug: &str) -> Option<PluginInformation> {
        if action != PLUGIN_INFORMATION_ACTION || slug != self.config().plugin_slug() {
            return None;
        }

        let pending = self.pending_update();
        let name = match self.metadata.read(self.config().plugin()) {
            Ok(metadata) if !metadata.name.is_empty() => metadata.name,
            Ok(_) => slug.to_string(),
            Err(e) => {
                warn!("Cannot read plugin metadata for details view: {}", e);
                slug.to_string()
            }
        };

        Some(PluginInformation::new(
            &name,
            self.config().plugin_slug(),
            pending.as_ref(),
        ))
    }

    fn pending_update(&self) -> Option<UpdateDescriptor> {
        let transient = self
            .store
            .load()
            .inspect_err(|e| warn!("Failed to load update transient: {}", e))
            .ok()??;

        transient.response.get(self.config().plugin()).cloned()
    }
}
