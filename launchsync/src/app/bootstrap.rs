//! Application bootstrap implementation.
//!
//! `LauncherApp` wires the production engine (GitHub resolver, HTTP
//! downloader, zip extractor) and runs it off the caller's thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::launch::{self, LaunchDecision, Session};
use crate::manager::{
    is_first_launch, ChannelProgress, HttpDownloader, ManagerResult, ProgressSink, Reconciler,
    SyncOutcome, SyncReport, ZipExtractor,
};
use crate::release::{GitHubReleaseResolver, ReleaseManifest, ReleaseResolver};
use crate::tree::TreeDiff;

/// Name of the worker thread running sync jobs.
const WORKER_THREAD_NAME: &str = "launchsync-sync";

/// The reconciler with its production collaborators.
pub type ProductionReconciler = Reconciler<GitHubReleaseResolver, HttpDownloader, ZipExtractor>;

/// Snapshot of the local installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStatus {
    pub install_dir: PathBuf,
    pub installed_tag: Option<String>,
    pub first_launch: bool,
}

/// Latest release compared with what is installed.
#[derive(Debug, Clone)]
pub struct UpdateCheck {
    /// Release index endpoint that was queried.
    pub release_url: String,
    pub latest: ReleaseManifest,
    pub installed_tag: Option<String>,
}

impl UpdateCheck {
    /// Whether the next sync will download the archive.
    pub fn update_pending(&self) -> bool {
        self.installed_tag.as_deref() != Some(self.latest.tag.as_str())
    }
}

/// Launcher application with its sync engine.
///
/// # Example
///
/// ```ignore
/// use launchsync::app::{AppConfig, LauncherApp};
/// use launchsync::manager::ChannelProgress;
///
/// let app = LauncherApp::new(AppConfig::new(install_dir))?;
/// let (progress, mut events) = ChannelProgress::channel();
/// let worker = app.spawn_sync(progress)?;
///
/// while let Some(event) = events.blocking_recv() {
///     // render event
/// }
/// let report = worker.join();
/// ```
pub struct LauncherApp {
    config: AppConfig,
    reconciler: Arc<ProductionReconciler>,
}

impl LauncherApp {
    /// Build the production engine from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let sync = config.sync.clone();
        let resolver = GitHubReleaseResolver::new(
            config.source.clone(),
            sync.required_assets(),
            sync.timeout,
        )?;
        let downloader = HttpDownloader::new(&config.source.user_agent, sync.timeout)?;

        info!(
            install_dir = %sync.install_dir.display(),
            owner = %config.source.owner,
            repo = %config.source.repo,
            "Launcher engine ready"
        );

        Ok(Self {
            reconciler: Arc::new(Reconciler::new(sync, resolver, downloader, ZipExtractor::new())),
            config,
        })
    }

    /// Application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Installation root.
    pub fn install_dir(&self) -> &Path {
        &self.config.sync.install_dir
    }

    /// Run a sync on the calling thread.
    pub fn run_sync(&self, progress: &dyn ProgressSink) -> SyncReport {
        self.reconciler.run(progress)
    }

    /// Run a sync on a dedicated worker thread.
    ///
    /// Progress flows through `progress`; the channel closes when the worker
    /// finishes, so a receive loop ends on its own.
    pub fn spawn_sync(
        &self,
        progress: ChannelProgress,
    ) -> Result<JoinHandle<SyncReport>, AppError> {
        let reconciler = Arc::clone(&self.reconciler);
        thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || reconciler.run(&progress))
            .map_err(AppError::WorkerSpawn)
    }

    /// Compare the installation with the latest manifest, without repairing.
    pub fn verify(&self, progress: &dyn ProgressSink) -> ManagerResult<TreeDiff> {
        self.reconciler.verify(progress)
    }

    /// Resolve the latest release and compare it with the installed tag.
    pub fn check(&self) -> ManagerResult<UpdateCheck> {
        let resolver = self.reconciler.resolver();
        let latest = resolver.resolve()?;
        Ok(UpdateCheck {
            release_url: resolver.source().latest_release_url(),
            latest,
            installed_tag: self.reconciler.state_store().read()?,
        })
    }

    /// Drop the installed tag so the next sync downloads the archive again.
    pub fn forget_installed_release(&self) -> ManagerResult<()> {
        self.reconciler.state_store().clear()?;
        info!(install_dir = %self.install_dir().display(), "Installed tag cleared");
        Ok(())
    }

    /// Describe the local installation without touching the network.
    pub fn status(&self) -> ManagerResult<InstallStatus> {
        Ok(InstallStatus {
            install_dir: self.install_dir().to_path_buf(),
            installed_tag: self.reconciler.state_store().read()?,
            first_launch: is_first_launch(self.install_dir()),
        })
    }

    /// Decide whether to start the game after a run.
    pub fn launch_decision(&self, outcome: SyncOutcome, session: &Session) -> LaunchDecision {
        launch::decide(outcome, session, self.config.proceed_on_miscount)
    }
}
