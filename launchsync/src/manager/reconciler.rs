//! Installation reconciler.
//!
//! Orchestrates a full sync run:
//! 1. Resolve the latest release
//! 2. Compare its tag with the installed one
//! 3. Download and extract the archive when the tag differs
//! 4. Fetch the tree manifest and compare it with the files on disk
//! 5. On mismatch, delete the listed files, re-download, re-extract and
//!    compare once more
//! 6. Commit the tag once the installation verifies
//!
//! A matching tag never skips step 4.

use std::fs;
use std::io;
use std::path::{Component, Path};
use std::sync::Mutex;

use tempfile::TempDir;
use tracing::{debug, error, info, warn};

use super::config::SyncConfig;
use super::download::{partial_path, verify_checksum, Progress, ProgressSink};
use super::error::{ManagerError, ManagerResult};
use super::state::StateStore;
use super::traits::{ArchiveExtractor, AssetDownloader};
use crate::release::{AssetRef, ReleaseManifest, ReleaseResolver};
use crate::tree::{self, ActualTree, ExpectedTree, TreeDiff};

/// Prefix of the per-run staging directory inside the metadata directory.
const STAGING_PREFIX: &str = "download_";

/// States of a sync run, in the order they can be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Init,
    ManifestResolved,
    UpToDate,
    NeedsDownload,
    Downloaded,
    Extracted,
    Verifying,
    Verified,
    NeedsResync,
    CleanedUp,
    ReDownloaded,
    ReExtracted,
    ReVerifying,
    MiscountError,
    Success,
    Failure,
}

impl SyncState {
    /// Get a human-readable name for the state.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::ManifestResolved => "manifest resolved",
            Self::UpToDate => "up to date",
            Self::NeedsDownload => "needs download",
            Self::Downloaded => "downloaded",
            Self::Extracted => "extracted",
            Self::Verifying => "verifying",
            Self::Verified => "verified",
            Self::NeedsResync => "needs resync",
            Self::CleanedUp => "cleaned up",
            Self::ReDownloaded => "re-downloaded",
            Self::ReExtracted => "re-extracted",
            Self::ReVerifying => "re-verifying",
            Self::MiscountError => "miscount error",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Terminal classification of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The installation is verified and the tag committed.
    Success,
    /// A step failed; see [`SyncReport::error`].
    Failure,
    /// The file set still disagrees after one repair cycle.
    ///
    /// Not fatal to the caller, which may choose to proceed.
    MiscountError,
}

impl SyncOutcome {
    /// Get a human-readable name for the outcome.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::MiscountError => "miscount error",
        }
    }
}

/// Everything a caller needs to know about a finished run.
#[derive(Debug)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    /// Tag of the resolved release, if resolution succeeded.
    pub release_tag: Option<String>,
    /// States entered, in order, ending with the terminal state.
    pub transitions: Vec<SyncState>,
    /// How many times the archive was downloaded.
    pub archive_downloads: usize,
    /// Last status text sent to the progress sink.
    pub last_message: String,
    /// Result of the last comparison, if one ran.
    pub diff: Option<TreeDiff>,
    /// Cause of a `Failure`.
    pub error: Option<ManagerError>,
}

impl SyncReport {
    /// Whether the run ended in `Success`.
    pub fn is_success(&self) -> bool {
        self.outcome == SyncOutcome::Success
    }
}

/// Forwards to the caller's sink and remembers the latest status text.
struct MirroredSink<'a> {
    inner: &'a dyn ProgressSink,
    last_text: Mutex<String>,
}

impl<'a> MirroredSink<'a> {
    fn new(inner: &'a dyn ProgressSink) -> Self {
        Self {
            inner,
            last_text: Mutex::new(String::new()),
        }
    }

    fn into_last_text(self) -> String {
        self.last_text
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProgressSink for MirroredSink<'_> {
    fn text(&self, message: &str) {
        self.inner.text(message);
        let mut last = self
            .last_text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *last = message.to_string();
    }

    fn progress(&self, progress: Progress) {
        self.inner.progress(progress);
    }
}

/// Bookkeeping for one run.
struct RunLog<'a> {
    sink: MirroredSink<'a>,
    transitions: Vec<SyncState>,
    archive_downloads: usize,
    release_tag: Option<String>,
    diff: Option<TreeDiff>,
}

impl<'a> RunLog<'a> {
    fn new(progress: &'a dyn ProgressSink) -> Self {
        Self {
            sink: MirroredSink::new(progress),
            transitions: Vec::new(),
            archive_downloads: 0,
            release_tag: None,
            diff: None,
        }
    }

    fn enter(&mut self, state: SyncState) {
        let from = self.transitions.last().map(SyncState::name).unwrap_or("-");
        debug!(from, to = state.name(), "Sync state transition");
        self.transitions.push(state);
    }

    fn say(&self, message: impl AsRef<str>) {
        self.sink.text(message.as_ref());
    }

    fn finish(self, outcome: SyncOutcome, error: Option<ManagerError>) -> SyncReport {
        SyncReport {
            outcome,
            release_tag: self.release_tag,
            transitions: self.transitions,
            archive_downloads: self.archive_downloads,
            last_message: self.sink.into_last_text(),
            diff: self.diff,
            error,
        }
    }
}

/// True when `relative` stays inside the root it is joined to.
fn is_contained(relative: &str) -> bool {
    let path = Path::new(relative);
    !relative.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Remove a file or directory, treating absence as success.
fn remove_path(path: &Path) -> io::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(true)
}

/// Keeps an installation root in agreement with the latest release.
pub struct Reconciler<R, D, X> {
    config: SyncConfig,
    resolver: R,
    downloader: D,
    extractor: X,
    state: StateStore,
}

impl<R, D, X> Reconciler<R, D, X>
where
    R: ReleaseResolver,
    D: AssetDownloader,
    X: ArchiveExtractor,
{
    /// Create a reconciler for `config.install_dir`.
    pub fn new(config: SyncConfig, resolver: R, downloader: D, extractor: X) -> Self {
        let state = StateStore::new(&config.install_dir);
        Self {
            config,
            resolver,
            downloader,
            extractor,
            state,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The installed-tag store.
    pub fn state_store(&self) -> &StateStore {
        &self.state
    }

    /// The release resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Run a full sync to a terminal state.
    ///
    /// Never panics on I/O or network faults; every error becomes
    /// `SyncOutcome::Failure` with the cause attached.
    pub fn run(&self, progress: &dyn ProgressSink) -> SyncReport {
        let mut run = RunLog::new(progress);
        run.enter(SyncState::Init);
        run.say("Starting setup...");

        match self.reconcile(&mut run) {
            Ok(outcome) => {
                info!(
                    outcome = outcome.name(),
                    tag = run.release_tag.as_deref().unwrap_or("-"),
                    archive_downloads = run.archive_downloads,
                    "Sync finished"
                );
                run.finish(outcome, None)
            }
            Err(e) => {
                error!(kind = e.kind().label(), error = %e, "Sync failed");
                run.enter(SyncState::Failure);
                run.say(format!("Setup failed: {}", e));
                run.finish(SyncOutcome::Failure, Some(e))
            }
        }
    }

    /// Compare the installation with the latest tree manifest.
    ///
    /// Performs no repair and never touches the installed tag.
    pub fn verify(&self, progress: &dyn ProgressSink) -> ManagerResult<TreeDiff> {
        let mut run = RunLog::new(progress);
        let manifest = self.resolver.resolve()?;
        let tree_asset = manifest.require(&self.config.tree_asset)?.clone();

        let staging = self.create_staging()?;
        let expected = self.fetch_expected_tree(&tree_asset, staging.path(), &mut run)?;
        self.compare(&expected)
    }

    fn reconcile(&self, run: &mut RunLog<'_>) -> ManagerResult<SyncOutcome> {
        run.say("Checking for updates...");
        let manifest = self.resolver.resolve()?;
        run.release_tag = Some(manifest.tag.clone());
        run.enter(SyncState::ManifestResolved);

        let (tree_asset, archive_asset) = self.required_assets(&manifest)?;
        let installed = self.installed_tag();

        fs::create_dir_all(&self.config.install_dir).map_err(|e| {
            ManagerError::CreateDirFailed {
                path: self.config.install_dir.clone(),
                source: e,
            }
        })?;
        let staging = self.create_staging()?;

        if installed.as_deref() == Some(manifest.tag.as_str()) {
            info!(tag = %manifest.tag, "Installed release is current");
            run.enter(SyncState::UpToDate);
            run.say("Release is up-to-date. Verifying files...");
        } else {
            info!(
                installed = installed.as_deref().unwrap_or("-"),
                latest = %manifest.tag,
                "New release available"
            );
            run.enter(SyncState::NeedsDownload);
            run.say(format!(
                "New release found: {}. Preparing download...",
                manifest.tag
            ));
            self.fetch_archive(&archive_asset, staging.path(), run)?;
            run.enter(SyncState::Downloaded);
            self.extract_archive(staging.path(), run)?;
            run.enter(SyncState::Extracted);
        }

        run.enter(SyncState::Verifying);
        run.say("Verifying files...");
        let expected = self.fetch_expected_tree(&tree_asset, staging.path(), run)?;

        let diff = self.compare(&expected)?;
        let clean = diff.is_clean();
        run.diff = Some(diff);
        if clean {
            return self.commit(&manifest.tag, run);
        }

        if let Some(diff) = &run.diff {
            warn!(summary = %diff.summary(), "Installation does not match manifest");
        }
        run.enter(SyncState::NeedsResync);
        run.say("File integrity check failed. Re-downloading and re-extracting data.");

        run.say("Cleaning old files...");
        self.remove_expected(&expected);
        run.enter(SyncState::CleanedUp);

        self.fetch_archive(&archive_asset, staging.path(), run)?;
        run.enter(SyncState::ReDownloaded);
        self.extract_archive(staging.path(), run)?;
        run.enter(SyncState::ReExtracted);

        run.enter(SyncState::ReVerifying);
        run.say("Verifying files...");
        let diff = self.compare(&expected)?;
        let clean = diff.is_clean();
        if !clean {
            warn!(summary = %diff.summary(), "Installation still inconsistent after resync");
        }
        run.diff = Some(diff);

        if clean {
            self.commit(&manifest.tag, run)
        } else {
            run.enter(SyncState::MiscountError);
            run.say("File count mismatch after re-download. Installation may be incomplete.");
            Ok(SyncOutcome::MiscountError)
        }
    }

    /// Both required assets, checked before any transfer starts.
    fn required_assets(
        &self,
        manifest: &ReleaseManifest,
    ) -> ManagerResult<(AssetRef, AssetRef)> {
        let tree = manifest.require(&self.config.tree_asset)?.clone();
        let archive = manifest.require(&self.config.archive_asset)?.clone();
        Ok((tree, archive))
    }

    fn installed_tag(&self) -> Option<String> {
        match self.state.read() {
            Ok(tag) => tag,
            Err(e) => {
                warn!(error = %e, "Could not read installed tag, treating as absent");
                None
            }
        }
    }

    fn create_staging(&self) -> ManagerResult<TempDir> {
        let metadata_dir = self.config.metadata_dir();
        fs::create_dir_all(&metadata_dir).map_err(|e| ManagerError::CreateDirFailed {
            path: metadata_dir.clone(),
            source: e,
        })?;
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&metadata_dir)
            .map_err(|e| ManagerError::CreateDirFailed {
                path: metadata_dir,
                source: e,
            })
    }

    /// Download `asset` into `staging`, replacing leftovers of earlier attempts.
    fn download(
        &self,
        asset: &AssetRef,
        name: &str,
        staging: &Path,
        run: &mut RunLog<'_>,
    ) -> ManagerResult<()> {
        let dest = staging.join(name);
        for stale in [dest.clone(), partial_path(&dest)] {
            remove_path(&stale).map_err(|e| ManagerError::RemoveFailed {
                path: stale.clone(),
                source: e,
            })?;
        }

        self.downloader
            .download(&asset.locator, &dest, asset.size_bytes, &run.sink)?;
        Ok(())
    }

    fn fetch_archive(
        &self,
        asset: &AssetRef,
        staging: &Path,
        run: &mut RunLog<'_>,
    ) -> ManagerResult<()> {
        run.archive_downloads += 1;
        let name = self.config.archive_asset.clone();
        self.download(asset, &name, staging, run)
    }

    fn extract_archive(&self, staging: &Path, run: &mut RunLog<'_>) -> ManagerResult<()> {
        let archive = staging.join(&self.config.archive_asset);

        if let Some(expected) = &self.config.archive_sha256 {
            run.say("Verifying archive checksum...");
            verify_checksum(&archive, expected)?;
            debug!(archive = %archive.display(), "Archive checksum verified");
        }

        run.say(format!("Extracting {}...", self.config.archive_asset));
        let files = self
            .extractor
            .extract(&archive, &self.config.install_dir, &run.sink)?;
        info!(files, "Archive extracted");
        run.say("Extraction complete!");
        Ok(())
    }

    fn fetch_expected_tree(
        &self,
        asset: &AssetRef,
        staging: &Path,
        run: &mut RunLog<'_>,
    ) -> ManagerResult<ExpectedTree> {
        let name = self.config.tree_asset.clone();
        self.download(asset, &name, staging, run)?;

        run.say("Parsing file list...");
        let expected = tree::parse_file(&staging.join(&name))?;
        if expected.is_empty() {
            return Err(ManagerError::EmptyTreeManifest { asset: name });
        }

        debug!(
            files = expected.paths.len(),
            entries = expected.total_entry_count,
            "Tree manifest parsed"
        );
        Ok(expected)
    }

    fn compare(&self, expected: &ExpectedTree) -> ManagerResult<TreeDiff> {
        let actual = ActualTree::scan(&self.config.install_dir)?;
        let diff = TreeDiff::compute(expected, &actual);
        debug!(summary = %diff.summary(), "Installation compared");
        Ok(diff)
    }

    /// Delete every listed path under the root, leaving unlisted files alone.
    ///
    /// Failures are logged and skipped.
    fn remove_expected(&self, expected: &ExpectedTree) {
        let mut removed = 0usize;
        for relative in &expected.paths {
            if !is_contained(relative) {
                warn!(path = %relative, "Skipping path outside the installation root");
                continue;
            }

            let path = self.config.install_dir.join(relative);
            match remove_path(&path) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete file"),
            }
        }
        info!(removed, "Removed listed files before resync");
    }

    fn commit(&self, tag: &str, run: &mut RunLog<'_>) -> ManagerResult<SyncOutcome> {
        run.enter(SyncState::Verified);
        run.say("All files verified.");

        self.state.write(tag)?;
        info!(tag, "Installed tag committed");

        run.enter(SyncState::Success);
        run.say("Setup complete!");
        Ok(SyncOutcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::download::progress::RecordingProgress;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Resolver returning a fixed manifest.
    struct FixedResolver(ManagerResult<ReleaseManifest>);

    impl ReleaseResolver for FixedResolver {
        fn resolve(&self) -> ManagerResult<ReleaseManifest> {
            match &self.0 {
                Ok(m) => Ok(m.clone()),
                Err(_) => Err(ManagerError::HttpStatus {
                    url: "https://api/releases/latest".to_string(),
                    status: 503,
                }),
            }
        }
    }

    /// Downloader serving in-memory bodies keyed by locator.
    #[derive(Default)]
    struct MapDownloader {
        bodies: BTreeMap<String, Vec<u8>>,
        calls: Mutex<Vec<String>>,
        /// Also write `<dest>.part`, as an interrupted transfer would.
        leave_partial: bool,
        /// Locators whose destination or partial file existed on entry.
        leftovers: Mutex<Vec<String>>,
    }

    impl AssetDownloader for MapDownloader {
        fn download(
            &self,
            locator: &str,
            dest: &Path,
            _expected_size: u64,
            progress: &dyn ProgressSink,
        ) -> ManagerResult<u64> {
            self.calls.lock().unwrap().push(locator.to_string());
            if dest.exists() || partial_path(dest).exists() {
                self.leftovers.lock().unwrap().push(locator.to_string());
            }
            let body = self.bodies.get(locator).ok_or_else(|| ManagerError::HttpStatus {
                url: locator.to_string(),
                status: 404,
            })?;
            fs::write(dest, body).unwrap();
            if self.leave_partial {
                fs::write(partial_path(dest), &body[..body.len() / 2]).unwrap();
            }
            progress.text(&format!("Downloaded {}", locator));
            Ok(body.len() as u64)
        }
    }

    /// Extractor that writes a fixed file list, ignoring the archive bytes.
    struct ListExtractor(Vec<&'static str>);

    impl ArchiveExtractor for ListExtractor {
        fn extract(
            &self,
            _archive_path: &Path,
            target_dir: &Path,
            _progress: &dyn ProgressSink,
        ) -> ManagerResult<usize> {
            for name in &self.0 {
                let path = target_dir.join(name);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, b"data").unwrap();
            }
            Ok(self.0.len())
        }
    }

    /// Extractor writing `first` on its first call and `full` afterwards.
    struct RepairingExtractor {
        first: Vec<&'static str>,
        full: Vec<&'static str>,
        calls: Mutex<usize>,
    }

    impl ArchiveExtractor for RepairingExtractor {
        fn extract(
            &self,
            archive_path: &Path,
            target_dir: &Path,
            progress: &dyn ProgressSink,
        ) -> ManagerResult<usize> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            let names = if *calls == 1 { &self.first } else { &self.full };
            ListExtractor(names.clone()).extract(archive_path, target_dir, progress)
        }
    }

    /// Extractor that always fails after announcing itself.
    struct FailingExtractor;

    impl ArchiveExtractor for FailingExtractor {
        fn extract(
            &self,
            archive_path: &Path,
            _target_dir: &Path,
            progress: &dyn ProgressSink,
        ) -> ManagerResult<usize> {
            progress.text("Opening archive");
            Err(ManagerError::CorruptArchive {
                path: archive_path.to_path_buf(),
                reason: "truncated central directory".to_string(),
            })
        }
    }

    fn manifest(tag: &str) -> ReleaseManifest {
        ReleaseManifest::new(
            tag,
            vec![
                (
                    "tree.txt".to_string(),
                    AssetRef {
                        locator: "mem://tree".to_string(),
                        size_bytes: 0,
                    },
                ),
                (
                    "data.zip".to_string(),
                    AssetRef {
                        locator: "mem://data".to_string(),
                        size_bytes: 4,
                    },
                ),
            ],
        )
    }

    fn downloader(tree: &str) -> MapDownloader {
        let mut bodies = BTreeMap::new();
        bodies.insert("mem://tree".to_string(), tree.as_bytes().to_vec());
        bodies.insert("mem://data".to_string(), b"data".to_vec());
        MapDownloader {
            bodies,
            ..Default::default()
        }
    }

    const TREE: &str = ".\n├── a.txt\n└── mods\n    └── b.jar\n";

    fn reconciler(
        root: &Path,
        tree: &str,
        files: Vec<&'static str>,
    ) -> Reconciler<FixedResolver, MapDownloader, ListExtractor> {
        Reconciler::new(
            SyncConfig::new(root.to_path_buf()),
            FixedResolver(Ok(manifest("v1"))),
            downloader(tree),
            ListExtractor(files),
        )
    }

    #[test]
    fn test_fresh_install_succeeds() {
        let temp = tempfile::TempDir::new().unwrap();
        let r = reconciler(temp.path(), TREE, vec!["a.txt", "mods/b.jar"]);
        let sink = RecordingProgress::default();

        let report = r.run(&sink);

        assert_eq!(report.outcome, SyncOutcome::Success, "{:?}", report.error);
        assert_eq!(
            report.transitions,
            vec![
                SyncState::Init,
                SyncState::ManifestResolved,
                SyncState::NeedsDownload,
                SyncState::Downloaded,
                SyncState::Extracted,
                SyncState::Verifying,
                SyncState::Verified,
                SyncState::Success,
            ]
        );
        assert_eq!(report.archive_downloads, 1);
        assert_eq!(report.release_tag.as_deref(), Some("v1"));
        assert_eq!(r.state_store().read().unwrap(), Some("v1".to_string()));
        assert_eq!(report.last_message, "Setup complete!");
        assert_eq!(sink.texts().last().map(String::as_str), Some("Setup complete!"));
    }

    #[test]
    fn test_up_to_date_still_verifies() {
        let temp = tempfile::TempDir::new().unwrap();
        let r = reconciler(temp.path(), TREE, vec!["a.txt", "mods/b.jar"]);
        assert!(r.run(&RecordingProgress::default()).is_success());

        let report = r.run(&RecordingProgress::default());
        assert!(report.is_success());
        assert_eq!(report.archive_downloads, 0);
        assert_eq!(report.transitions[2], SyncState::UpToDate);
        assert!(report.transitions.contains(&SyncState::Verifying));
    }

    #[test]
    fn test_staging_directory_is_removed() {
        let temp = tempfile::TempDir::new().unwrap();
        let r = reconciler(temp.path(), TREE, vec!["a.txt", "mods/b.jar"]);
        r.run(&RecordingProgress::default());

        let leftovers: Vec<_> = fs::read_dir(temp.path().join(".launcher"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(STAGING_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_resolve_failure_is_terminal() {
        let temp = tempfile::TempDir::new().unwrap();
        let r = Reconciler::new(
            SyncConfig::new(temp.path().to_path_buf()),
            FixedResolver(Err(ManagerError::InvalidPath(String::new()))),
            downloader(TREE),
            ListExtractor(vec![]),
        );

        let report = r.run(&RecordingProgress::default());
        assert_eq!(report.outcome, SyncOutcome::Failure);
        assert_eq!(report.transitions, vec![SyncState::Init, SyncState::Failure]);
        assert!(report.release_tag.is_none());
        assert!(report.last_message.starts_with("Setup failed:"));
        assert!(r.downloader.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_asset_fails_before_download() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut partial = manifest("v1");
        partial.assets.remove("tree.txt");
        let r = Reconciler::new(
            SyncConfig::new(temp.path().to_path_buf()),
            FixedResolver(Ok(partial)),
            downloader(TREE),
            ListExtractor(vec!["a.txt"]),
        );

        let report = r.run(&RecordingProgress::default());
        assert_eq!(report.outcome, SyncOutcome::Failure);
        assert_eq!(
            report.error.as_ref().map(ManagerError::kind),
            Some(crate::manager::ErrorKind::NotFound)
        );
        assert!(r.downloader.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_empty_tree_manifest_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let r = reconciler(temp.path(), ".\n\n", vec!["a.txt"]);

        let report = r.run(&RecordingProgress::default());
        assert_eq!(report.outcome, SyncOutcome::Failure);
        assert!(matches!(
            report.error,
            Some(ManagerError::EmptyTreeManifest { .. })
        ));
        assert_eq!(r.state_store().read().unwrap(), None);
    }

    #[test]
    fn test_persistent_mismatch_is_miscount() {
        let temp = tempfile::TempDir::new().unwrap();
        // The archive never provides mods/b.jar.
        let r = reconciler(temp.path(), TREE, vec!["a.txt"]);

        let report = r.run(&RecordingProgress::default());
        assert_eq!(report.outcome, SyncOutcome::MiscountError);
        assert_eq!(report.archive_downloads, 2);
        assert_eq!(report.transitions.last(), Some(&SyncState::MiscountError));
        assert!(report.transitions.contains(&SyncState::CleanedUp));
        assert_eq!(report.diff.unwrap().missing, vec!["mods/b.jar"]);
        assert_eq!(r.state_store().read().unwrap(), None);
    }

    #[test]
    fn test_corrupt_state_file_treated_as_absent() {
        let temp = tempfile::TempDir::new().unwrap();
        let r = reconciler(temp.path(), TREE, vec!["a.txt", "mods/b.jar"]);
        fs::create_dir_all(r.state_store().path()).unwrap();

        let report = r.run(&RecordingProgress::default());
        // Reading failed so a download happened; committing onto a directory then fails.
        assert_eq!(report.archive_downloads, 1);
        assert_eq!(report.outcome, SyncOutcome::Failure);
        assert!(report.transitions.contains(&SyncState::Verified));
    }

    #[test]
    fn test_verify_reports_without_repair() {
        let temp = tempfile::TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"x").unwrap();
        let r = reconciler(temp.path(), TREE, vec!["a.txt", "mods/b.jar"]);

        let diff = r.verify(&RecordingProgress::default()).unwrap();
        assert_eq!(diff.missing, vec!["mods/b.jar"]);
        assert!(!temp.path().join("mods/b.jar").exists());
        assert_eq!(r.state_store().read().unwrap(), None);
    }

    #[test]
    fn test_is_contained() {
        assert!(is_contained("mods/b.jar"));
        assert!(is_contained("./a.txt"));
        assert!(!is_contained("../escape.txt"));
        assert!(!is_contained("/etc/passwd"));
        assert!(!is_contained(""));
    }

    #[test]
    fn test_remove_path_handles_files_dirs_and_absence() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("f.txt");
        let dir = temp.path().join("d");
        fs::write(&file, b"x").unwrap();
        fs::create_dir_all(dir.join("inner")).unwrap();

        assert!(remove_path(&file).unwrap());
        assert!(remove_path(&dir).unwrap());
        assert!(!remove_path(&file).unwrap());
        assert!(!dir.exists());
    }

    #[test]
    fn test_resync_replaces_stale_partial_download() {
        let temp = tempfile::TempDir::new().unwrap();
        let r = Reconciler::new(
            SyncConfig::new(temp.path().to_path_buf()),
            FixedResolver(Ok(manifest("v1"))),
            MapDownloader {
                leave_partial: true,
                ..downloader(TREE)
            },
            RepairingExtractor {
                first: vec!["a.txt"],
                full: vec!["a.txt", "mods/b.jar"],
                calls: Mutex::new(0),
            },
        );

        let report = r.run(&RecordingProgress::default());

        assert_eq!(report.outcome, SyncOutcome::Success, "{:?}", report.error);
        assert_eq!(report.archive_downloads, 2);
        assert!(report.transitions.contains(&SyncState::ReDownloaded));
        assert!(r.downloader.leftovers.lock().unwrap().is_empty());
        assert_eq!(r.state_store().read().unwrap(), Some("v1".to_string()));
    }

    #[test]
    fn test_last_message_is_last_text_shown() {
        let temp = tempfile::TempDir::new().unwrap();
        let r = Reconciler::new(
            SyncConfig::new(temp.path().to_path_buf()),
            FixedResolver(Ok(manifest("v1"))),
            downloader(TREE),
            FailingExtractor,
        );
        let sink = RecordingProgress::default();

        let report = r.run(&sink);
        let texts = sink.texts();

        assert_eq!(report.outcome, SyncOutcome::Failure);
        assert!(texts.iter().any(|t| t == "Downloaded mem://data"));
        assert!(texts.iter().any(|t| t == "Opening archive"));
        assert!(report.last_message.starts_with("Setup failed:"));
        assert_eq!(texts.last(), Some(&report.last_message));
    }

    #[test]
    fn test_mirrored_sink_keeps_collaborator_text() {
        let inner = RecordingProgress::default();
        let sink = MirroredSink::new(&inner);

        sink.text("Starting setup...");
        sink.progress(Progress::of(10, 100));
        sink.text("Downloading data.zip...");

        assert_eq!(
            inner.texts(),
            vec!["Starting setup...", "Downloading data.zip..."]
        );
        assert_eq!(sink.into_last_text(), "Downloading data.zip...");
    }
}
