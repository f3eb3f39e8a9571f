//! Platform-dependent default locations.

use std::path::{Path, PathBuf};

/// Directory name shared by every platform layout.
const VENDOR_DIR: &str = "breachinthecontainment";

/// Leaf directory of the installation.
const LAUNCHER_DIR: &str = "launcher";

/// Host platform family, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    /// Linux and every other Unix-like system.
    Linux,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// Get a human-readable name for the platform.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "macos",
            Self::Linux => "linux",
        }
    }

    /// Default installation directory below `home`.
    pub fn install_dir_in(&self, home: &Path) -> PathBuf {
        match self {
            Self::Windows => home.join(VENDOR_DIR).join(LAUNCHER_DIR),
            Self::MacOs => home
                .join("Library")
                .join("Application Support")
                .join(VENDOR_DIR)
                .join(LAUNCHER_DIR),
            Self::Linux => home.join(format!(".{}", VENDOR_DIR)).join(LAUNCHER_DIR),
        }
    }
}

/// Default installation directory for the current user and platform.
///
/// Falls back to a relative `launcher` directory when no home directory can
/// be determined.
pub fn default_install_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => Platform::current().install_dir_in(&home),
        None => PathBuf::from(LAUNCHER_DIR),
    }
}
