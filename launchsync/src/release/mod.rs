//! Release index access.
//!
//! Resolves the latest published release and the two assets every release
//! must carry: the tree manifest and the data archive.

mod manifest;
mod resolver;

pub use manifest::{AssetRef, ReleaseManifest};
pub use resolver::{
    default_user_agent, GitHubReleaseResolver, ReleaseResolver, ReleaseSource, DEFAULT_API_URL,
    DEFAULT_OWNER, DEFAULT_REPO,
};
