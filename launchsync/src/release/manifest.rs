//! Release metadata as returned by the release index.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::manager::error::{ManagerError, ManagerResult};

/// Where to fetch one asset and how large it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Download URL.
    pub locator: String,
    /// Advertised size in bytes; 0 when unknown.
    pub size_bytes: u64,
}

/// The latest published release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseManifest {
    /// Opaque release identifier.
    pub tag: String,
    /// Assets keyed by file name.
    pub assets: BTreeMap<String, AssetRef>,
}

impl ReleaseManifest {
    /// Build a manifest from `(name, asset)` pairs.
    ///
    /// If a name repeats, the first occurrence wins.
    pub fn new(
        tag: impl Into<String>,
        assets: impl IntoIterator<Item = (String, AssetRef)>,
    ) -> Self {
        let mut map = BTreeMap::new();
        for (name, asset) in assets {
            map.entry(name).or_insert(asset);
        }
        Self {
            tag: tag.into(),
            assets: map,
        }
    }

    /// Look up an asset by exact name.
    pub fn asset(&self, name: &str) -> Option<&AssetRef> {
        self.assets.get(name)
    }

    /// Look up an asset that must be present.
    pub fn require(&self, name: &str) -> ManagerResult<&AssetRef> {
        self.asset(name).ok_or_else(|| ManagerError::AssetNotFound {
            asset: name.to_string(),
            tag: self.tag.clone(),
        })
    }
}

/// Release object from the GitHub REST API.
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

/// Asset entry from the GitHub REST API.
#[derive(Debug, Deserialize)]
pub(crate) struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

impl From<GitHubRelease> for ReleaseManifest {
    fn from(release: GitHubRelease) -> Self {
        let assets = release.assets.into_iter().map(|a| {
            (
                a.name,
                AssetRef {
                    locator: a.browser_download_url,
                    size_bytes: a.size,
                },
            )
        });
        ReleaseManifest::new(release.tag_name, assets)
    }
}
