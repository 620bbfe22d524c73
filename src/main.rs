#![forbid(unsafe_code)]
//! # Text Profile CLI
//!
//! This is the command-line interface for the `text_profile` crate.
//! It profiles a single English or Chinese `.txt` document: language,
//! word frequencies, sentiment and keywords, without writing Rust code.
//!
//! ## Features
//! - Automatic language detection (Chinese as soon as a CJK ideograph appears).
//! - Sentiment score, polarity and adjective keywords.
//! - Top-10 word chart written as `analysis_result.svg`.
//! - Report export as CSV, TSV, JSON or PDF.
//!
//! ## Example
//! ```bash
//! cargo run --release -- path/to/review.txt --export-format pdf --out-dir out
//! ```
//!
//! Set `RUST_LOG=info` to see which artifacts were written, `RUST_LOG=warn`
//! to see sentiment model failures. See `--help` for all available options.

use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use text_profile::{AnalysisOptions, ExportFormat, LogSink, run};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Text file to analyze (UTF-8)
    path: PathBuf,

    /// Output format for the report (csv, tsv, json, pdf, none)
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    export_format: ExportFormat,

    /// Directory for the chart and the report
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Timeout for one sentiment model call in milliseconds (0 = no timeout)
    #[arg(long, default_value_t = 10_000)]
    model_timeout_ms: u64,

    /// Skip the chart (a PDF report still renders it)
    #[arg(long, default_value_t = false)]
    no_chart: bool,

    /// Add a timestamp to the report file name
    #[arg(long, default_value_t = false)]
    timestamped: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let options = AnalysisOptions {
        model_timeout: (cli.model_timeout_ms > 0).then(|| Duration::from_millis(cli.model_timeout_ms)),
        export_format: cli.export_format,
        out_dir: cli.out_dir,
        chart: !cli.no_chart,
        timestamped: cli.timestamped,
    };

    match run(&cli.path, &options, &mut LogSink) {
        Ok(report) => {
            print!("{}", report.result);
            if let Some(chart) = &report.chart {
                println!("Chart saved to: {}", chart.path.display());
            }
            if let Some(path) = &report.report {
                println!("Report exported: {}", path.display());
            }
        }
        Err(e) => {
            error!("Error analyzing {}: {}", cli.path.display(), e);
            process::exit(1);
        }
    }
}
