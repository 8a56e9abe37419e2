use crate::error::RenameError;
use crate::formatter::format_filename;
use crate::metadata::MetadataExtractor;
use crate::normalizer::parse_filename;
use crate::report::{BatchSummary, ProcessingOutcome, ProgressEvent, Reporter, SkipReason};
use crate::resolver::{needs_embedded, resolve};
use crate::scanner::Scanner;
use anyhow::Result;
use futures::future::join_all;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Maximum number of files processed at once.
    pub concurrency: usize,
    /// Target extension without the leading dot.
    pub extension: String,
    pub dry_run: bool,
    /// Read embedded metadata when the filename names no author.
    pub use_embedded: bool,
}

/// Source and destination for one file, consumed by a single rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Applies the naming pipeline to every matching file under a directory.
pub struct ConcurrentRenamer {
    options: RenameOptions,
    extractor: Arc<dyn MetadataExtractor>,
    reporter: Arc<dyn Reporter>,
    cancel: Arc<AtomicBool>,
}

/// State shared by the workers of one batch. Everything per-file stays in the worker.
struct Batch {
    options: RenameOptions,
    extractor: Arc<dyn MetadataExtractor>,
    reporter: Arc<dyn Reporter>,
    cancel: Arc<AtomicBool>,
    limiter: Semaphore,
    completed: AtomicUsize,
    claimed_targets: Mutex<HashSet<PathBuf>>,
    total: usize,
}

impl ConcurrentRenamer {
    pub fn new(
        options: RenameOptions,
        extractor: Arc<dyn MetadataExtractor>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            options,
            extractor,
            reporter,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Setting the flag makes every file not yet started finish as cancelled.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub async fn run(&self, root: &Path) -> Result<BatchSummary> {
        let scanner = Scanner::new(root, &self.options.extension, self.options.concurrency)?;
        let files = scanner.scan().await?;
        info!("Found {} files to process under {:?}", files.len(), scanner.root());
        Ok(self.process_files(files).await)
    }

    /// Processes the given files under the concurrency limit. Completion order is unspecified.
    pub async fn process_files(&self, files: Vec<PathBuf>) -> BatchSummary {
        let batch = Arc::new(Batch {
            options: self.options.clone(),
            extractor: Arc::clone(&self.extractor),
            reporter: Arc::clone(&self.reporter),
            cancel: Arc::clone(&self.cancel),
            limiter: Semaphore::new(self.options.concurrency.max(1)),
            completed: AtomicUsize::new(0),
            claimed_targets: Mutex::new(HashSet::new()),
            total: files.len(),
        });

        let handles: Vec<_> = files
            .into_iter()
            .map(|path| {
                let batch = Arc::clone(&batch);
                tokio::spawn(async move { batch.run_file(path).await })
            })
            .collect();

        let mut summary = BatchSummary {
            total: batch.total,
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        for joined in join_all(handles).await {
            match joined {
                Ok(outcome) => summary.record(&outcome),
                Err(e) => {
                    error!("Worker task failed: {}", e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Batch finished: {} renamed, {} skipped, {} failed",
            summary.renamed, summary.skipped, summary.failed
        );
        summary
    }
}

impl Batch {
    async fn run_file(&self, path: PathBuf) -> ProcessingOutcome {
        let outcome = match self.limiter.acquire().await {
            Ok(_permit) if !self.cancel.load(Ordering::SeqCst) => self.process(&path).await,
            _ => ProcessingOutcome::Skipped(SkipReason::Cancelled),
        };

        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        let event = ProgressEvent {
            path: &path,
            outcome: &outcome,
            completed,
            total: self.total,
            dry_run: self.options.dry_run,
        };
        if let Err(e) = self.reporter.report(&event) {
            warn!("Progress reporter failed for {:?}: {}", path, e);
        }

        outcome
    }

    async fn process(&self, path: &Path) -> ProcessingOutcome {
        match self.plan(path).await {
            Ok(plan) => self.apply(plan).await,
            Err(reason) => {
                debug!("Skipping {:?}: {}", path, reason);
                ProcessingOutcome::Skipped(reason)
            }
        }
    }

    async fn plan(&self, path: &Path) -> Result<RenamePlan, SkipReason> {
        let (Some(file_name), Some(stem)) = (
            path.file_name().and_then(|n| n.to_str()),
            path.file_stem().and_then(|s| s.to_str()),
        ) else {
            return Err(SkipReason::NonUtf8Name);
        };
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        let parsed = parse_filename(stem);

        let embedded = if self.options.use_embedded && needs_embedded(&parsed) {
            match self.extractor.extract(path).await {
                Ok(metadata) => Some(metadata),
                Err(e) => {
                    warn!("Using filename metadata only for {:?}: {}", path, e);
                    None
                }
            }
        } else {
            None
        };

        let resolved = resolve(parsed, embedded).ok_or(SkipReason::NoTitle)?;
        if resolved.author.is_none() && resolved.year.is_none() {
            return Err(SkipReason::NothingToRename);
        }

        let new_name = format_filename(&resolved, &extension).ok_or(SkipReason::NoTitle)?;
        if new_name == file_name {
            return Err(SkipReason::AlreadyCanonical);
        }

        Ok(RenamePlan {
            source: path.to_path_buf(),
            target: path.with_file_name(new_name),
        })
    }

    async fn apply(&self, plan: RenamePlan) -> ProcessingOutcome {
        let RenamePlan { source, target } = plan;

        if !self.claim(&target) || target_taken(&source, &target).await {
            info!("Target exists, skipping {:?} -> {:?}", source, target);
            return ProcessingOutcome::Skipped(SkipReason::Collision { target });
        }

        if self.options.dry_run {
            debug!("Would rename: {:?} -> {:?}", source, target);
            return ProcessingOutcome::Renamed {
                from: source,
                to: target,
            };
        }

        match tokio::fs::rename(&source, &target).await {
            Ok(()) => {
                info!("Renamed: {:?} -> {:?}", source, target);
                ProcessingOutcome::Renamed {
                    from: source,
                    to: target,
                }
            }
            Err(e) => {
                let err = RenameError {
                    from: source,
                    to: target,
                    source: e,
                };
                error!("{}", err);
                ProcessingOutcome::Failed(err)
            }
        }
    }

    /// Reserves `target` for this batch. Only the first claimant gets `true`.
    fn claim(&self, target: &Path) -> bool {
        self.claimed_targets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(target.to_path_buf())
    }
}

/// True when `target` exists and is not `source` itself (a case-only rename
/// on a case-insensitive filesystem points both paths at one file).
async fn target_taken(source: &Path, target: &Path) -> bool {
    if tokio::fs::symlink_metadata(target).await.is_err() {
        return false;
    }
    !same_file(source, target).await
}

async fn same_file(a: &Path, b: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let (Ok(ma), Ok(mb)) = (tokio::fs::metadata(a).await, tokio::fs::metadata(b).await) {
            return ma.dev() == mb.dev() && ma.ino() == mb.ino();
        }
    }

    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}
