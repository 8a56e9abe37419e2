use crate::report::{prettify_path, BatchSummary, ProcessingOutcome, ProgressEvent, Reporter};
use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameOperation {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedFile {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct OperationsOutput {
    pub generated_at: String,
    pub summary: BatchSummary,
    pub renames: Vec<RenameOperation>,
    pub skipped: Vec<SkippedFile>,
    pub failures: Vec<FailedFile>,
}

impl OperationsOutput {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Default)]
struct Collected {
    renames: Vec<RenameOperation>,
    skipped: Vec<SkippedFile>,
    failures: Vec<FailedFile>,
}

/// Reporter that buffers every outcome for a single JSON document at the end.
pub struct JsonCollector {
    target_dir: PathBuf,
    collected: Mutex<Collected>,
}

impl JsonCollector {
    pub fn new(target_dir: &Path) -> Self {
        Self {
            target_dir: target_dir.canonicalize().unwrap_or_else(|_| target_dir.to_path_buf()),
            collected: Mutex::new(Collected::default()),
        }
    }

    /// Snapshot of everything reported so far, sorted by path for deterministic output.
    pub fn output(&self, summary: BatchSummary) -> OperationsOutput {
        let collected = self
            .collected
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut renames = collected.renames.clone();
        renames.sort_by(|a, b| a.from.cmp(&b.from));
        let mut skipped = collected.skipped.clone();
        skipped.sort_by(|a, b| a.path.cmp(&b.path));
        let mut failures = collected.failures.clone();
        failures.sort_by(|a, b| a.path.cmp(&b.path));

        OperationsOutput {
            generated_at: Local::now().to_rfc3339(),
            summary,
            renames,
            skipped,
            failures,
        }
    }

    fn relative(&self, path: &Path) -> String {
        prettify_path(path, &self.target_dir)
    }
}

impl Reporter for JsonCollector {
    fn report(&self, event: &ProgressEvent<'_>) -> Result<()> {
        let mut collected = self
            .collected
            .lock()
            .map_err(|_| anyhow::anyhow!("JSON collector lock poisoned"))?;

        match event.outcome {
            ProcessingOutcome::Renamed { from, to } => collected.renames.push(RenameOperation {
                from: self.relative(from),
                to: self.relative(to),
            }),
            ProcessingOutcome::Skipped(reason) => collected.skipped.push(SkippedFile {
                path: self.relative(event.path),
                reason: reason.slug().to_string(),
                detail: reason.to_string(),
            }),
            ProcessingOutcome::Failed(err) => collected.failures.push(FailedFile {
                path: self.relative(event.path),
                error: err.source.to_string(),
            }),
        }

        Ok(())
    }
}
