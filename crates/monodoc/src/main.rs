// The CLI surface prints its summary and errors directly.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use monodoc::{config::Config, orchestrator::BundleOrchestrator};

#[derive(Debug, Parser)]
#[command(
    name = "monodoc",
    version,
    about = "Bundle a multi-script web app into one standalone HTML document"
)]
struct Args {
    /// Project directory holding the host document and auxiliary files
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Configuration file (overrides the discovered monodoc.toml layers)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the standalone document here instead of the derived sibling path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = Config::load(&args.project_dir, args.config.as_deref())
        .context("failed to resolve configuration")?;

    let summary = BundleOrchestrator::new(config, args.project_dir.clone())
        .with_output_override(args.output.clone())
        .run()?;

    println!(
        "Merged {} auxiliary files into {}",
        summary.files_merged,
        summary.output_path.display()
    );
    println!(
        "Inline main script: {}",
        if summary.main_script_found { "found" } else { "not found" }
    );
    match summary.stamped_timestamp {
        Some(timestamp) => println!("Build info stamped: {timestamp}"),
        None => println!("Build info annotation not present"),
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();
}
