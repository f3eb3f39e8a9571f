//! Sync engine for a release-backed installation.
//!
//! This module keeps a local installation directory in agreement with the
//! latest published release:
//!
//! - Downloading release assets (`download`)
//! - Extracting the data archive (`extractor`)
//! - Persisting the installed release tag (`state`)
//! - Comparing, repairing and committing (`reconciler`)
//!
//! # Architecture
//!
//! ```text
//! Reconciler
//!     │
//!     ├── ReleaseResolver (trait)      latest release + asset locators
//!     │       └── GitHubReleaseResolver
//!     │
//!     ├── AssetDownloader (trait)      archive and tree manifest transfer
//!     │       └── HttpDownloader
//!     │
//!     ├── ArchiveExtractor (trait)     unpack into the installation root
//!     │       └── ZipExtractor
//!     │
//!     └── StateStore                   installed tag under .launcher/
//! ```

mod config;
pub mod download;
pub(crate) mod error;
mod extractor;
mod reconciler;
mod state;
mod traits;

pub use config::{
    SyncConfig, DEFAULT_ARCHIVE_ASSET, DEFAULT_TREE_ASSET, METADATA_DIR_NAME, STATE_FILE_NAME,
};
pub use download::{
    calculate_file_checksum, verify_checksum, ChannelProgress, HttpDownloader, NullProgress,
    Progress, ProgressEvent, ProgressSink,
};
pub use error::{ErrorKind, ManagerError, ManagerResult};
pub use extractor::ZipExtractor;
pub use reconciler::{Reconciler, SyncOutcome, SyncReport, SyncState};
pub use state::{is_first_launch, StateStore};
pub use traits::{ArchiveExtractor, AssetDownloader};
