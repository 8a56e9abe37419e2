use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pdf-renamer",
    about = "Rename PDF files in a directory tree to `Title - Author [Year]`",
    version = "0.1.0"
)]
pub struct Args {
    /// Directory tree to organize
    #[arg(
        value_name = "PATH",
        env = "PDF_RENAMER_DIR",
        help = "Directory to process recursively (or set PDF_RENAMER_DIR)"
    )]
    pub path: Option<PathBuf>,

    /// Maximum number of files processed concurrently
    #[arg(
        long,
        short = 'j',
        value_name = "N",
        help = "Number of files processed concurrently (default: 2x CPU count)"
    )]
    pub jobs: Option<usize>,

    /// File extension to process
    #[arg(
        long,
        value_name = "EXT",
        default_value = "pdf",
        help = "Extension of files to rename, matched case-insensitively"
    )]
    pub extension: String,

    /// Only show what would be done, don't make changes
    #[arg(
        long,
        short = 'd',
        help = "Perform dry run: show renames without applying them"
    )]
    pub dry_run: bool,

    /// Skip embedded document metadata
    #[arg(
        long,
        help = "Infer names from filenames only, never open the documents"
    )]
    pub no_metadata: bool,

    /// Output results in JSON format
    #[arg(
        long,
        help = "Print a JSON report instead of human-readable progress"
    )]
    pub json: bool,

    /// Verbose output
    #[arg(long, short = 'v', help = "Enable verbose logging")]
    pub verbose: bool,
}
