//! Host collaborators and lifecycle hooks
//! - store.rs: UpdateStore trait, UpdateTransient and in-memory store
//! - sqlite.rs: SQLite-backed UpdateStore
//! - metadata.rs: Installed plugin header reader
//! - hooks.rs: PluginUpdater, the four update lifecycle callbacks

pub mod hooks;
pub mod metadata;
pub mod sqlite;
pub mod store;

pub use hooks::PluginUpdater;
pub use metadata::{HeaderMetadataReader, MetadataError, PluginMetadata, PluginMetadataReader};
pub use sqlite::SqliteUpdateStore;
pub use store::{MemoryUpdateStore, StoreError, UpdateStore, UpdateTransient};
