use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use reqwest::header::HeaderMap;
use serde::Serialize;
use tracing::info;

use release_updater::config::{self, UpdaterConfig};
use release_updater::host::hooks::PLUGIN_INFORMATION_ACTION;
use release_updater::host::{
    HeaderMetadataReader, PluginMetadataReader, PluginUpdater, SqliteUpdateStore,
};
use release_updater::release::GitHubReleaseSource;
use release_updater::release::github::DEFAULT_BASE_URL;

#[derive(Parser)]
#[command(name = "release-updater", version, about = "Update a CMS plugin from GitHub releases")]
struct Cli {
    #[command(flatten)]
    plugin: PluginArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct PluginArgs {
    /// Directory name of the installed plugin
    #[arg(long)]
    plugin_file: String,

    /// Slug of the plugin's main file
    #[arg(long)]
    plugin_slug: String,

    /// GitHub owner of the release repository
    #[arg(long)]
    owner: String,

    /// GitHub repository name
    #[arg(long)]
    repo: String,

    /// Access token for private repositories
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Directory containing installed plugins
    #[arg(long, default_value = ".")]
    plugins_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_base_url: String,

    /// Update transient database (defaults to the data directory)
    #[arg(long)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Check for a newer release and record it as a pending update
    Check,
    /// Show the headers that would be sent with a request to URL
    Headers { url: String },
    /// Move an extracted package folder to the plugin directory
    Relocate {
        source: PathBuf,
        remote_source: PathBuf,
    },
    /// Show update details for the plugin
    Info {
        #[arg(long, default_value = PLUGIN_INFORMATION_ACTION)]
        action: String,
        /// Defaults to the configured plugin slug
        #[arg(long)]
        slug: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    release_updater::log::init()?;

    let args = cli.plugin;

    let config = UpdaterConfig::new(
        &args.plugin_file,
        &args.plugin_slug,
        &args.owner,
        &args.repo,
        args.token.as_deref(),
    )
    .context("Invalid updater settings")?;

    let db_path = args.db.unwrap_or_else(config::db_path);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let store = Arc::new(
        SqliteUpdateStore::new(&db_path).context("Failed to open update store")?,
    );

    let source = GitHubReleaseSource::new(&args.api_base_url, config.headers().clone())
        .context("Failed to create HTTP client")?;
    let metadata = HeaderMetadataReader::new(&args.plugins_dir);
    let installed_version = metadata.read(config.plugin()).map(|m| m.version);

    let updater = PluginUpdater::new(config, source, store, Box::new(metadata));

    match cli.command {
        Command::Check => {
            let installed = installed_version.context("Failed to read installed plugin")?;
            let transient = updater.run_check(&installed).await?;

            let pending = transient.pending(updater.config().plugin());
            info!("Update check finished, pending update: {}", pending.is_some());
            print_json(&pending)?;
        }
        Command::Headers { url } => {
            let headers = updater.http_request_headers(&url, HeaderMap::new());
            print_json(&redacted(&headers))?;
        }
        Command::Relocate {
            source,
            remote_source,
        } => {
            let plugin = updater.config().plugin().to_string();
            let path = updater.source_selection(&source, &remote_source, Some(plugin.as_str()))?;
            println!("{}", path.display());
        }
        Command::Info { action, slug } => {
            let slug = slug.unwrap_or_else(|| updater.config().plugin_slug().to_string());
            print_json(&updater.plugin_information(&action, &slug))?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn redacted(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if value.is_sensitive() {
                "<redacted>".to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.to_string(), value)
        })
        .collect()
}
