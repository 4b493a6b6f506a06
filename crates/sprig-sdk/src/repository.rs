use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use sprig_diff::diff_snapshot;
use sprig_graph::{Commit, CommitGraph, FsCommitStore};
use sprig_index::{normalize_path, IndexFile, StagingArea, StagingEntry};
use sprig_refs::{validate_branch_name, FsRefStore, Ref, RefStore};
use sprig_store::{FsObjectStore, ObjectStore};
use tracing::{debug, info, warn};

use crate::config::RepoConfig;
use crate::error::{SdkError, SdkResult};
use crate::report::{CommitDetails, FileSummary, FsckReport, MissingObject, RepoStatus};
use crate::worktree::{self, WorkPath};

/// Name of the control directory at the repository root.
pub const CONTROL_DIR: &str = ".sprig";

const CONFIG_FILE: &str = "config.toml";
const OBJECTS_DIR: &str = "objects";
const COMMITS_DIR: &str = "commits";
const INDEX_FILE: &str = "index.json";

/// A sprig repository: one working directory and its control directory.
///
/// Staging and committing are serialized by an internal lock, so a shared
/// `&Repository` (or `Arc<Repository>`) can be used from several threads
/// and every commit observes a consistent staging area and HEAD.
pub struct Repository {
    root: PathBuf,
    control: PathBuf,
    config: RepoConfig,
    objects: Arc<FsObjectStore>,
    refs: Arc<FsRefStore>,
    graph: CommitGraph,
    index: IndexFile,
    staging: Mutex<StagingArea>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .field("branch", &self.config.default_branch)
            .finish_non_exhaustive()
    }
}

impl Repository {
    // ---- Lifecycle ----

    /// Create a repository in `root` with default settings.
    pub fn init(root: impl AsRef<Path>) -> SdkResult<Self> {
        Self::init_with_config(root, RepoConfig::default())
    }

    /// Create a repository in `root`, which is created if needed.
    ///
    /// The control directory is assembled under a temporary name and renamed
    /// into place, so a failed init leaves nothing behind.
    pub fn init_with_config(root: impl AsRef<Path>, config: RepoConfig) -> SdkResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        let root = root.canonicalize()?;
        let control = root.join(CONTROL_DIR);
        if control.exists() {
            return Err(SdkError::AlreadyInitialized(root));
        }
        validate_branch_name(&config.default_branch)?;

        let scratch = tempfile::Builder::new()
            .prefix(".sprig-init")
            .tempdir_in(&root)?;
        let base = scratch.path();
        config.save(&base.join(CONFIG_FILE))?;
        FsObjectStore::open(base.join(OBJECTS_DIR))?;
        FsCommitStore::open(base.join(COMMITS_DIR))?;
        let refs = FsRefStore::open(base)?;
        refs.write_ref(&Ref::unborn(config.default_branch.as_str()))?;
        refs.set_head(&config.default_branch)?;
        IndexFile::new(base.join(INDEX_FILE)).save(&[])?;

        fs::rename(base, &control).map_err(|e| {
            if control.exists() {
                SdkError::AlreadyInitialized(root.clone())
            } else {
                e.into()
            }
        })?;
        info!(root = %root.display(), branch = %config.default_branch, "repository initialized");
        Self::open(&root)
    }

    /// Open the repository whose root is exactly `root`.
    pub fn open(root: impl AsRef<Path>) -> SdkResult<Self> {
        let given = root.as_ref();
        let root = match given.canonicalize() {
            Ok(root) => root,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SdkError::NotARepository(given.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        let control = root.join(CONTROL_DIR);
        if !control.is_dir() {
            return Err(SdkError::NotARepository(root));
        }

        let config = RepoConfig::load(&control.join(CONFIG_FILE))?;
        let objects = Arc::new(FsObjectStore::open(control.join(OBJECTS_DIR))?);
        let commits = Arc::new(FsCommitStore::open(control.join(COMMITS_DIR))?);
        let refs = Arc::new(FsRefStore::open(&control)?);
        let graph = CommitGraph::new(objects.clone(), commits, refs.clone());

        let index = IndexFile::new(control.join(INDEX_FILE));
        let staging = StagingArea::with_entries(objects.clone(), index.load()?);
        debug!(root = %root.display(), staged = staging.len(), "repository opened");

        Ok(Self {
            root,
            control,
            config,
            objects,
            refs,
            graph,
            index,
            staging: Mutex::new(staging),
        })
    }

    /// Open the repository containing `start`, searching parent
    /// directories.
    pub fn discover(start: impl AsRef<Path>) -> SdkResult<Self> {
        let start = start.as_ref();
        let canonical = start
            .canonicalize()
            .map_err(|_| SdkError::NotARepository(start.to_path_buf()))?;
        for dir in canonical.ancestors() {
            if dir.join(CONTROL_DIR).is_dir() {
                return Self::open(dir);
            }
        }
        Err(SdkError::NotARepository(canonical))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn control_dir(&self) -> &Path {
        &self.control
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    // ---- Staging ----

    /// Stage `content` under `path` without touching the working copy.
    pub fn stage(&self, path: &str, content: &[u8]) -> SdkResult<StagingEntry> {
        let target = self.resolve(path)?;
        self.with_staging(|staging| Ok(staging.stage(&target.rel, content)?))
    }

    /// Stage the current working copy of `path`.
    pub fn stage_file(&self, path: &str) -> SdkResult<StagingEntry> {
        let target = self.resolve(path)?;
        let content = worktree::read_working_file(&target)?;
        self.with_staging(|staging| Ok(staging.stage(&target.rel, &content)?))
    }

    /// Write `content` to the working copy of `path`, then stage it.
    pub fn write_and_stage(&self, path: &str, content: &[u8]) -> SdkResult<StagingEntry> {
        let target = self.resolve(path)?;
        worktree::write_working_file(&target, content)?;
        self.with_staging(|staging| Ok(staging.stage(&target.rel, content)?))
    }

    /// Drop `path` from the staging area. Returns whether it was staged; a
    /// path that was not (or cannot be) staged is not an error.
    pub fn unstage(&self, path: &str) -> SdkResult<bool> {
        let Ok(target) = self.resolve(path) else {
            return Ok(false);
        };
        self.with_staging(|staging| Ok(staging.unstage(&target.rel)))
    }

    /// Delete the working copy of `path` and drop it from staging.
    pub fn remove_file(&self, path: &str) -> SdkResult<()> {
        let target = self.resolve(path)?;
        worktree::remove_working_file(&target)?;
        self.with_staging(|staging| {
            staging.unstage(&target.rel);
            Ok(())
        })
    }

    /// Staged entries in staging order.
    pub fn staged(&self) -> SdkResult<Vec<StagingEntry>> {
        Ok(self.lock_staging()?.list())
    }

    // ---- Commits ----

    /// Commit the staging area. `author` falls back to the configured
    /// default.
    pub fn commit(&self, message: &str, author: Option<&str>) -> SdkResult<Commit> {
        let author = author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(self.config.default_author.as_str());
        let mut staging = self.lock_staging()?;
        let commit = self.graph.commit(&mut *staging, message, author)?;
        if let Err(e) = self.index.save(staging.entries()) {
            warn!(id = %commit.id.short_hex(), error = %e, "commit published but staging file not cleared");
        }
        Ok(commit)
    }

    /// Look up a commit by `HEAD`, full id or unique prefix.
    pub fn get_commit(&self, rev: &str) -> SdkResult<Commit> {
        Ok(self.graph.find(rev)?)
    }

    /// Commits from HEAD backwards, newest first. `None` walks the whole
    /// chain.
    pub fn history(&self, limit: Option<usize>) -> SdkResult<Vec<Commit>> {
        Ok(self.graph.history(limit)?)
    }

    pub fn head(&self) -> SdkResult<Option<Commit>> {
        Ok(self.graph.head()?)
    }

    /// A commit plus the size of each file it records.
    pub fn show(&self, rev: &str) -> SdkResult<CommitDetails> {
        let commit = self.graph.find(rev)?;
        let mut files = Vec::with_capacity(commit.files.len());
        for (path, id) in &commit.files {
            let blob = self
                .objects
                .read(id)?
                .ok_or(SdkError::ObjectNotFound(*id))?;
            files.push(FileSummary {
                path: path.clone(),
                id: *id,
                size: blob.size(),
            });
        }
        Ok(CommitDetails { commit, files })
    }

    /// Content of `path` as recorded in the commit `rev` names.
    pub fn read_committed(&self, rev: &str, path: &str) -> SdkResult<Vec<u8>> {
        let commit = self.graph.find(rev)?;
        let path = normalize_path(path)?;
        Ok(self.graph.file_at(&commit, &path)?)
    }

    // ---- Inspection ----

    /// Unified diff of the working copy of `path` against HEAD. A path HEAD
    /// does not contain diffs against empty content.
    pub fn diff(&self, path: &str) -> SdkResult<String> {
        let target = self.resolve(path)?;
        let working = worktree::read_working_file(&target)?;
        let head = self.graph.head()?;
        let committed = head.as_ref().and_then(|c| c.file(&target.rel));
        let diff = diff_snapshot(&*self.objects, &target.rel, committed, &working)?;
        Ok(diff.render())
    }

    pub fn status(&self) -> SdkResult<RepoStatus> {
        let current = self.graph.current_ref()?;
        Ok(RepoStatus {
            initialized: true,
            current_ref: Some(current.canonical_name()),
            head: current.target,
            total_commits: self.graph.count()?,
            staged_paths: self.lock_staging()?.paths(),
        })
    }

    /// Status of `root`, reporting `initialized: false` rather than failing
    /// when there is no repository.
    pub fn status_at(root: impl AsRef<Path>) -> SdkResult<RepoStatus> {
        match Self::open(root) {
            Ok(repo) => repo.status(),
            Err(SdkError::NotARepository(_)) => Ok(RepoStatus::uninitialized()),
            Err(e) => Err(e),
        }
    }

    /// Working files that are neither staged nor in the HEAD commit.
    pub fn untracked(&self) -> SdkResult<Vec<String>> {
        let head = self.graph.head()?;
        let staging = self.lock_staging()?;
        let files = worktree::list_working_files(&self.root)?;
        Ok(files
            .into_iter()
            .filter(|p| staging.get(p).is_none())
            .filter(|p| head.as_ref().map_or(true, |c| c.file(p).is_none()))
            .collect())
    }

    /// Discard corrupt objects and check every commit reachable from HEAD
    /// still has its blobs.
    pub fn fsck(&self) -> SdkResult<FsckReport> {
        let _guard = self.lock_staging()?;
        let discarded_objects = self.objects.verify_all()?;
        let history = self.graph.history(None)?;
        let mut missing_objects = Vec::new();
        for commit in &history {
            for (path, id) in &commit.files {
                if !self.objects.exists(id)? {
                    missing_objects.push(MissingObject {
                        commit: commit.id,
                        path: path.clone(),
                        id: *id,
                    });
                }
            }
        }
        let report = FsckReport {
            discarded_objects,
            commits_checked: history.len(),
            missing_objects,
        };
        if !report.is_clean() {
            warn!(
                discarded = report.discarded_objects.len(),
                missing = report.missing_objects.len(),
                "integrity problems found"
            );
        }
        Ok(report)
    }

    // ---- Internals ----

    fn resolve(&self, path: &str) -> SdkResult<WorkPath> {
        worktree::resolve(&self.root, path)
    }

    fn lock_staging(&self) -> SdkResult<MutexGuard<'_, StagingArea>> {
        self.staging.lock().map_err(|_| SdkError::LockPoisoned)
    }

    /// Apply `op` to the staging area and persist the result. If the table
    /// cannot be saved the in-memory change is undone.
    fn with_staging<T>(
        &self,
        op: impl FnOnce(&mut StagingArea) -> SdkResult<T>,
    ) -> SdkResult<T> {
        let mut staging = self.lock_staging()?;
        let before = staging.list();
        let out = op(&mut *staging)?;
        if let Err(e) = self.index.save(staging.entries()) {
            *staging = StagingArea::with_entries(self.objects.clone(), before);
            return Err(e.into());
        }
        Ok(out)
    }
}
