//! `skan-convert`: convert generated HTML docs into a hash-routed docs site.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use skan_engine::{LogSink, ManifestStore, RunReport, SyncConfig, SyncEngine};
use skan_logging::{skan_error, skan_info, skan_warn, LogDestination};

/// Convert a directory of generated HTML documentation into markdown pages
/// with hash-routed links, keeping the output directory in sync with its
/// manifest.
#[derive(Parser, Debug)]
#[command(name = "skan-convert", version, about, long_about = None)]
struct Cli {
    /// The root directory of files to be converted (default: current directory)
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    path: Option<PathBuf>,

    /// Where to put the converted docs (default: <PATH>/docs)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Create an empty manifest.json in the output directory if there is none
    #[arg(long)]
    init_manifest: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Also write the log to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    fn sync_config(&self) -> SyncConfig {
        let source = self.path.clone().unwrap_or_else(|| PathBuf::from("."));
        SyncConfig::new(source, self.output.clone())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    skan_logging::initialize(cli.log_destination(), cli.level());

    match run(&cli).await {
        Ok(report) if report.is_clean() => ExitCode::SUCCESS,
        Ok(report) => {
            skan_warn!("{} file(s) could not be converted", report.failures.len());
            ExitCode::from(2)
        }
        Err(err) => {
            skan_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<RunReport> {
    let config = cli.sync_config();
    skan_info!(
        "Converting {:?} into {:?}",
        config.source_dir,
        config.output_dir
    );

    if cli.init_manifest {
        ManifestStore::initialize(&config.output_dir).with_context(|| {
            format!("could not initialize manifest in {:?}", config.output_dir)
        })?;
    }

    let engine = SyncEngine::new(config);
    let report = engine.run(&LogSink).await.context("sync run aborted")?;
    for failure in &report.failures {
        skan_error!("{}: {}", failure.filename, failure.error);
    }
    Ok(report)
}
