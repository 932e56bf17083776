//! Update decision layer
//! - semver.rs: Tag normalization and version comparison
//! - descriptor.rs: UpdateDescriptor and PluginInformation
//! - resolver.rs: Update check and request authorization
//! - relocator.rs: Renaming the extracted archive folder

pub mod descriptor;
pub mod relocator;
pub mod resolver;
pub mod semver;

pub use descriptor::{PluginInformation, UpdateDescriptor};
pub use relocator::{FileMover, FsMover, RelocationError, SourceRelocator};
pub use resolver::UpdateResolver;
