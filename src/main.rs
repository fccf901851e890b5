//! The main entry point for the `diffex` command-line application.
//!
//! This file parses command-line arguments, merges them with the YAML config
//! and hands the resolved settings to the `diffex` library.

use chrono::{Datelike, Local};
use diffex::cli::{self, Args};
use diffex::config::{ConfigLoader, Settings};
use diffex::errors::{Error, Result};
use diffex::logger::initialize_logger;
use diffex::run_extract;
use std::env;
use std::process;

fn main() {
    // No arguments at all: show a quick start instead of a bare usage error.
    if env::args_os().len() == 1 {
        println!("Extract the files that differ between two folders\n");
        println!("QUICK START EXAMPLES:");
        println!("  diffex ./v1 ./v2                       # Original/ and Modified/ in ./MyDiffOutput");
        println!("  diffex ./v1 ./v2 -u -n                 # Also refresh copyright years (compact format)");
        println!("  diffex ./v1 ./v2 --config config.yaml  # Read exclusions and options from YAML");
        println!("  diffex ./v1 ./v2 -o out --no-cleanup   # Keep what is already in ./out\n");
        println!("Run 'diffex --help' for the full option list");
        process::exit(0);
    }

    let args = cli::parse_args();
    initialize_logger(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("\n[ERROR] {e}");
        if matches!(e, Error::OutputCleanup { .. }) {
            eprintln!(
                "        Please ensure no files are open or the folder is not being used by another program."
            );
        }
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let file_config = ConfigLoader::load(&args.config)?;
    let settings = Settings::resolve(&args, file_config, Local::now().year())?;

    run_extract(&settings)?;

    let output_root = std::path::absolute(&settings.output_root)?;
    println!("\n[SUCCESS] Comparison complete.");
    if settings.cleanup_output {
        println!(
            "          Output directory cleaned and updated: {}",
            output_root.display()
        );
    } else {
        println!("          Output directory updated: {}", output_root.display());
    }

    Ok(())
}
