// Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;

mod svd_gen;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Xtask {
    /// Log every skipped register and padding decision.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only report warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    xtask: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    /// Go package using unsafe.Pointer overlays.
    Go,
    /// Rust module using tock-registers.
    Rust,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate register bindings from every SVD file in a directory
    SvdGen {
        /// Directory containing *.svd descriptors
        #[arg(long)]
        input_dir: PathBuf,

        /// Directory receiving one generated file per descriptor
        #[arg(long)]
        output_dir: PathBuf,

        /// Output language
        #[arg(long, value_enum, default_value_t = Format::Go)]
        format: Format,

        /// Go package name (defaults to the output directory's name)
        #[arg(long)]
        package: Option<String>,

        /// Source URL recorded in generated headers
        #[arg(long)]
        source_url: Option<String>,

        /// Peripheral to leave out of the bindings (repeatable)
        #[arg(long = "exclude", value_name = "PERIPHERAL")]
        exclude: Vec<String>,

        /// Render everything but write nothing
        #[arg(long, default_value_t = false)]
        check: bool,
    },
}

fn main() {
    let cli = Xtask::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    // A logger can only be installed once per process.
    let _ = SimpleLogger::new().with_level(level).init();

    let result = match &cli.xtask {
        Commands::SvdGen {
            input_dir,
            output_dir,
            format,
            package,
            source_url,
            exclude,
            check,
        } => svd_gen::generate(&svd_gen::Options {
            input_dir,
            output_dir,
            format: *format,
            package: package.as_deref(),
            source_url: source_url.as_deref(),
            exclude,
            check: *check,
        }),
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(-1);
    });
}
