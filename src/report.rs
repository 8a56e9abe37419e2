use crate::error::RenameError;
use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NonUtf8Name,
    NoTitle,
    NothingToRename,
    AlreadyCanonical,
    Collision { target: PathBuf },
    Cancelled,
}

impl SkipReason {
    pub fn slug(&self) -> &'static str {
        match self {
            SkipReason::NonUtf8Name => "non_utf8_name",
            SkipReason::NoTitle => "no_title",
            SkipReason::NothingToRename => "nothing_to_rename",
            SkipReason::AlreadyCanonical => "already_canonical",
            SkipReason::Collision { .. } => "collision",
            SkipReason::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NonUtf8Name => write!(f, "filename is not valid UTF-8"),
            SkipReason::NoTitle => write!(f, "no title could be determined"),
            SkipReason::NothingToRename => write!(f, "no author or year found"),
            SkipReason::AlreadyCanonical => write!(f, "already named canonically"),
            SkipReason::Collision { target } => write!(f, "target already taken: {:?}", target),
            SkipReason::Cancelled => write!(f, "batch cancelled"),
        }
    }
}

/// What happened to one file.
#[derive(Debug)]
pub enum ProcessingOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    Skipped(SkipReason),
    Failed(RenameError),
}

/// Emitted once per file, after its outcome is final.
#[derive(Debug)]
pub struct ProgressEvent<'a> {
    pub path: &'a Path,
    pub outcome: &'a ProcessingOutcome,
    pub completed: usize,
    pub total: usize,
    pub dry_run: bool,
}

/// Receives progress events. Errors are logged by the caller and otherwise ignored.
pub trait Reporter: Send + Sync {
    fn report(&self, event: &ProgressEvent<'_>) -> Result<()>;
}

/// Prints renames, collisions and failures as they happen.
pub struct ConsoleReporter {
    root: PathBuf,
}

impl ConsoleReporter {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &ProgressEvent<'_>) -> Result<()> {
        let progress = format!("[{}/{}]", event.completed, event.total).bright_black();

        match event.outcome {
            ProcessingOutcome::Renamed { from, to } => {
                let label = if event.dry_run { "RENAME:" } else { "RENAMED:" };
                println!(
                    "{} {} {} {} {}",
                    progress,
                    label.green().bold(),
                    file_name(from).bright_white(),
                    "→".bright_blue().bold(),
                    file_name(to).bright_cyan()
                );
            }
            ProcessingOutcome::Skipped(reason @ SkipReason::Collision { .. }) => {
                println!(
                    "{} {} {} ({})",
                    progress,
                    "SKIP:".yellow().bold(),
                    prettify_path(event.path, &self.root).bright_black(),
                    reason
                );
            }
            ProcessingOutcome::Skipped(_) => {}
            ProcessingOutcome::Failed(err) => {
                println!(
                    "{} {} {} ({})",
                    progress,
                    "FAILED:".red().bold(),
                    prettify_path(event.path, &self.root).bright_black(),
                    err.source
                );
            }
        }

        Ok(())
    }
}

/// Totals for one batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub dry_run: bool,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &ProcessingOutcome) {
        match outcome {
            ProcessingOutcome::Renamed { .. } => self.renamed += 1,
            ProcessingOutcome::Skipped(_) => self.skipped += 1,
            ProcessingOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn print(&self) {
        let verb = if self.dry_run { "to rename" } else { "renamed" };
        println!(
            "\n{} {} of {} files {}, {} skipped, {} failed",
            "📝".bright_white(),
            self.renamed.to_string().bright_cyan().bold(),
            self.total.to_string().bright_white(),
            verb,
            self.skipped.to_string().yellow(),
            if self.failed > 0 {
                self.failed.to_string().red().bold()
            } else {
                self.failed.to_string().normal()
            }
        );
    }

    /// Closing line; only claims success when no file failed.
    pub fn completion_line(&self) -> String {
        if self.failed == 0 {
            format!(
                "{} {}",
                "✓".green().bold(),
                "Operation completed successfully!".bright_green().bold()
            )
        } else {
            format!(
                "{} {}",
                "⚠".yellow().bold(),
                format!("Completed with {} failed file(s)", self.failed)
                    .yellow()
                    .bold()
            )
        }
    }
}

pub fn prettify_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_outcomes() {
        let mut summary = BatchSummary {
            total: 3,
            ..Default::default()
        };
        summary.record(&ProcessingOutcome::Renamed {
            from: PathBuf::from("a.pdf"),
            to: PathBuf::from("b.pdf"),
        });
        summary.record(&ProcessingOutcome::Skipped(SkipReason::NoTitle));
        summary.record(&ProcessingOutcome::Failed(RenameError {
            from: PathBuf::from("c.pdf"),
            to: PathBuf::from("d.pdf"),
            source: std::io::Error::other("denied"),
        }));

        assert_eq!(summary.renamed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_prettify_path_strips_root() {
        let root = Path::new("/books");
        assert_eq!(prettify_path(Path::new("/books/a/b.pdf"), root), "a/b.pdf");
        assert_eq!(prettify_path(Path::new("/other/b.pdf"), root), "/other/b.pdf");
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::AlreadyCanonical.to_string(), "already named canonically");
        assert_eq!(SkipReason::Cancelled.slug(), "cancelled");
    }

    #[test]
    fn test_completion_line_reflects_failures() {
        let mut summary = BatchSummary {
            total: 3,
            renamed: 3,
            ..Default::default()
        };
        assert!(summary.completion_line().contains("completed successfully"));

        summary.renamed = 2;
        summary.failed = 1;
        let line = summary.completion_line();
        assert!(line.contains("1 failed file(s)"));
        assert!(!line.contains("successfully"));
    }
}
