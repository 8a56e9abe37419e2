use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::fs::FileType;
use std::path::{Path, PathBuf};

/// Tool and VCS directories that never hold books worth renaming.
const SKIP_DIRS: &[&str] = &[".git", "node_modules", "__pycache__"];

/// Finds every regular file with the target extension below a root directory.
pub struct Scanner {
    root_path: PathBuf,
    extension: String,
    listing_limit: usize,
}

impl Scanner {
    /// `extension` is given without the leading dot and matched case-insensitively.
    /// `listing_limit` bounds how many directories are listed at once.
    pub fn new(path: &Path, extension: &str, listing_limit: usize) -> Result<Self> {
        let root_path = path.canonicalize()?;
        if !root_path.is_dir() {
            return Err(anyhow!("Path is not a directory: {:?}", path));
        }
        Ok(Scanner {
            root_path,
            extension: extension.trim_start_matches('.').to_string(),
            listing_limit: listing_limit.max(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Walks the tree with an explicit stack. Each round lists all pending
    /// directories concurrently, then pushes the subdirectories it found.
    /// Symlinks are neither followed nor collected.
    pub async fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut stack = vec![self.root_path.clone()];

        while !stack.is_empty() {
            let round = std::mem::take(&mut stack);
            let listings: Vec<(PathBuf, std::io::Result<Vec<(PathBuf, FileType)>>)> =
                stream::iter(round)
                    .map(|dir| async move {
                        let listing = list_dir(&dir).await;
                        (dir, listing)
                    })
                    .buffer_unordered(self.listing_limit)
                    .collect()
                    .await;

            for (dir, listing) in listings {
                let entries = match listing {
                    Ok(entries) => entries,
                    Err(e) if dir == self.root_path => {
                        return Err(e).with_context(|| format!("Failed to list {:?}", dir));
                    }
                    Err(e) => {
                        warn!("Skipping unreadable directory {:?}: {}", dir, e);
                        continue;
                    }
                };

                for (path, file_type) in entries {
                    if file_type.is_dir() {
                        if !self.should_skip(&path) {
                            stack.push(path);
                        }
                    } else if file_type.is_file() && self.matches_extension(&path) {
                        files.push(path);
                    }
                }
            }
        }

        files.sort();
        debug!("Scanner found {} files", files.len());
        Ok(files)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }

    fn should_skip(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| SKIP_DIRS.contains(&name))
    }
}

async fn list_dir(dir: &Path) -> std::io::Result<Vec<(PathBuf, FileType)>> {
    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        // DirEntry::file_type does not traverse symlinks
        let file_type = entry.file_type().await?;
        entries.push((entry.path(), file_type));
    }
    Ok(entries)
}
