use crate::cli::Args;
use crate::error::ConfigError;
use crate::renamer::RenameOptions;
use std::path::PathBuf;

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RenamerConfig {
    pub source_dir: PathBuf,
    pub concurrency: usize,
    pub extension: String,
    pub dry_run: bool,
    pub use_embedded: bool,
}

impl RenamerConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let source_dir = args.path.clone().ok_or(ConfigError::MissingSourceDir)?;
        if !source_dir.is_dir() {
            return Err(ConfigError::InvalidSourceDir(source_dir));
        }

        let concurrency = match args.jobs {
            Some(0) => return Err(ConfigError::InvalidConcurrency(0)),
            Some(n) => n,
            None => default_concurrency(),
        };

        let extension = args.extension.trim().trim_start_matches('.').to_string();
        if extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }

        Ok(RenamerConfig {
            source_dir,
            concurrency,
            extension,
            dry_run: args.dry_run,
            use_embedded: !args.no_metadata,
        })
    }

    pub fn rename_options(&self) -> RenameOptions {
        RenameOptions {
            concurrency: self.concurrency,
            extension: self.extension.clone(),
            dry_run: self.dry_run,
            use_embedded: self.use_embedded,
        }
    }
}

/// Twice the number of logical CPUs; the work is I/O bound.
pub fn default_concurrency() -> usize {
    (num_cpus::get() * 2).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(path: Option<PathBuf>) -> Args {
        Args {
            path,
            jobs: None,
            extension: "pdf".to_string(),
            dry_run: false,
            no_metadata: false,
            json: false,
            verbose: false,
        }
    }

    #[test]
    fn test_missing_source_dir() {
        let err = RenamerConfig::from_args(&args(None)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSourceDir));
    }

    #[test]
    fn test_source_must_be_directory() {
        let tmp_dir = TempDir::new().unwrap();
        let file = tmp_dir.path().join("book.pdf");
        std::fs::write(&file, "x").unwrap();

        let err = RenamerConfig::from_args(&args(Some(file))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSourceDir(_)));

        let missing = tmp_dir.path().join("nope");
        let err = RenamerConfig::from_args(&args(Some(missing))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSourceDir(_)));
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let tmp_dir = TempDir::new().unwrap();
        let mut a = args(Some(tmp_dir.path().to_path_buf()));
        a.jobs = Some(0);
        let err = RenamerConfig::from_args(&a).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConcurrency(0)));
    }

    #[test]
    fn test_defaults_and_extension_normalization() {
        let tmp_dir = TempDir::new().unwrap();
        let mut a = args(Some(tmp_dir.path().to_path_buf()));
        a.extension = " .PDF ".to_string();
        a.no_metadata = true;

        let config = RenamerConfig::from_args(&a).unwrap();
        assert_eq!(config.concurrency, default_concurrency());
        assert!(config.concurrency >= 2);
        assert_eq!(config.extension, "PDF");
        assert!(!config.use_embedded);

        let options = config.rename_options();
        assert_eq!(options.extension, "PDF");
        assert!(!options.use_embedded);
    }

    #[test]
    fn test_empty_extension_rejected() {
        let tmp_dir = TempDir::new().unwrap();
        let mut a = args(Some(tmp_dir.path().to_path_buf()));
        a.extension = ".".to_string();
        let err = RenamerConfig::from_args(&a).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyExtension));
    }
}
