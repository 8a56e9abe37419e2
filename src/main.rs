mod author;
mod cli;
mod config;
mod error;
mod formatter;
mod json_output;
mod metadata;
mod normalizer;
mod renamer;
mod report;
mod resolver;
mod scanner;
mod similarity;
mod text;

use anyhow::Result;
use clap::Parser;
use cli::Args;
use colored::*;
use config::RenamerConfig;
use json_output::JsonCollector;
use log::{info, warn};
use metadata::{MetadataExtractor, NoopExtractor, PdfInfoExtractor};
use renamer::ConcurrentRenamer;
use report::{ConsoleReporter, Reporter};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    info!("Starting pdf renamer with args: {:?}", args);

    let config = RenamerConfig::from_args(&args)?;
    info!(
        "Processing {:?} with {} workers (extension: .{})",
        config.source_dir, config.concurrency, config.extension
    );

    let extractor: Arc<dyn MetadataExtractor> = if config.use_embedded {
        Arc::new(PdfInfoExtractor)
    } else {
        Arc::new(NoopExtractor)
    };

    let collector = args
        .json
        .then(|| Arc::new(JsonCollector::new(&config.source_dir)));
    let reporter: Arc<dyn Reporter> = match &collector {
        Some(collector) => Arc::clone(collector) as Arc<dyn Reporter>,
        None => Arc::new(ConsoleReporter::new(&config.source_dir)),
    };

    let renamer = ConcurrentRenamer::new(config.rename_options(), extractor, reporter);

    let cancel = renamer.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing files already in progress");
            cancel.store(true, Ordering::SeqCst);
        }
    });

    if config.dry_run && !args.json {
        println!("\n{}", "═══ DRY RUN MODE ═══".bold().bright_blue());
    }

    let summary = renamer.run(&config.source_dir).await?;

    match collector {
        Some(collector) => println!("{}", collector.output(summary).to_json()?),
        None => {
            summary.print();
            println!("\n{}", summary.completion_line());
        }
    }

    Ok(())
}
