//! LaunchSync - keeps a launcher installation in sync with a published release
//!
//! This library resolves the latest release of a repository, downloads and
//! extracts its data archive, and verifies the installation against the
//! release's tree listing, repairing it once when the two disagree.
//!
//! - [`release`]: release index access
//! - [`manager`]: transfer, extraction, state and the reconciler
//! - [`tree`]: expected and actual file trees
//! - [`config`]: the user configuration file
//! - [`launch`]: launch gating after a sync
//! - [`app`]: production wiring

pub mod app;
pub mod config;
pub mod launch;
pub mod manager;
pub mod release;
pub mod tree;
