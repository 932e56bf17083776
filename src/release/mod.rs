//! Release metadata layer
//! - types.rs: RepositoryRef and ReleaseInfo
//! - error.rs: ReleaseError
//! - source.rs: ReleaseSource trait definition
//! - github.rs: GitHub Releases API

pub mod error;
pub mod github;
pub mod source;
pub mod types;

pub use error::ReleaseError;
pub use github::GitHubReleaseSource;
pub use source::ReleaseSource;
pub use types::{ReleaseInfo, RepositoryRef};
