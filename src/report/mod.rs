//! Report export: tabular (CSV/TSV), JSON and paginated PDF.

mod pdf;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::prelude::*;
use clap::ValueEnum;
use csv::WriterBuilder;
use log::info;
use serde::{Deserialize, Serialize};

use crate::AnalysisResult;
use crate::chart::ChartArtifact;
use crate::error::{AnalysisError, Result};

pub use pdf::write_pdf;

/// Output format selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated table
    Csv,
    /// Tab-separated table
    Tsv,
    /// Full analysis record as JSON
    Json,
    /// Paginated document with the chart embedded
    Pdf,
    /// Skip export
    None,
}

impl ExportFormat {
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ExportFormat::Csv => Some("csv"),
            ExportFormat::Tsv => Some("tsv"),
            ExportFormat::Json => Some("json"),
            ExportFormat::Pdf => Some("pdf"),
            ExportFormat::None => None,
        }
    }

    pub fn is_paginated(self) -> bool {
        self == ExportFormat::Pdf
    }
}

/// Neutralizes spreadsheet formula injection: a cell starting with `=`, `+`,
/// `-`, `@`, tab or carriage return gets a leading `'`. Cells that already
/// start with `'` are left alone.
/// # Example
/// ```
/// use text_profile::csv_safe_cell;
/// assert_eq!(csv_safe_cell("=SUM(A1)".into()), "'=SUM(A1)");
/// assert_eq!(csv_safe_cell("plain".into()), "plain");
/// ```
pub fn csv_safe_cell(cell: String) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell,
    }
}

/// The summary rows shared by the tabular and document reports.
pub fn report_rows(result: &AnalysisResult) -> Vec<(&'static str, String)> {
    vec![
        ("File name", result.file_name.clone()),
        ("File size", format!("{} bytes", result.file_size_bytes)),
        ("Character count", result.char_count.to_string()),
        ("Line count", result.line_count.to_string()),
        ("Word count", result.token_count.to_string()),
        ("Sentiment score", format!("{:.2}", result.sentiment.score)),
        ("Sentiment polarity", result.sentiment.polarity.to_string()),
    ]
}

/// `report.<ext>`, or `report_YYYYMMDD_HHMMSS.<ext>` when timestamped.
pub fn report_path(out_dir: &Path, extension: &str, timestamped: bool) -> PathBuf {
    let stem = if timestamped {
        let local: DateTime<Local> = Local::now();
        format!("report_{}", local.format("%Y%m%d_%H%M%S"))
    } else {
        "report".to_string()
    };
    out_dir.join(format!("{stem}.{extension}"))
}

fn write_table(result: &AnalysisResult, path: &Path, delimiter: u8) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| AnalysisError::export(path, e))?;
    wtr.write_record(["item", "value"])
        .map_err(|e| AnalysisError::export(path, e))?;
    for (item, value) in report_rows(result) {
        wtr.write_record([item.to_string(), csv_safe_cell(value)])
            .map_err(|e| AnalysisError::export(path, e))?;
    }
    wtr.flush().map_err(|e| AnalysisError::export(path, e))?;
    Ok(())
}

fn write_json(result: &AnalysisResult, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| AnalysisError::export(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, result).map_err(|e| AnalysisError::export(path, e))?;
    writer.flush().map_err(|e| AnalysisError::export(path, e))
}

/// Writes the report for `result` in `format` into `out_dir`.
///
/// The PDF report embeds the chart from `chart`; pass the artifact returned
/// by [`generate_chart`](crate::chart::generate_chart). Returns the written
/// path, or `None` for [`ExportFormat::None`].
pub fn export_report(
    result: &AnalysisResult,
    format: ExportFormat,
    chart: Option<&ChartArtifact>,
    out_dir: &Path,
    timestamped: bool,
) -> Result<Option<PathBuf>> {
    let Some(extension) = format.extension() else {
        return Ok(None);
    };
    let path = report_path(out_dir, extension, timestamped);
    match format {
        ExportFormat::Csv => write_table(result, &path, b',')?,
        ExportFormat::Tsv => write_table(result, &path, b'\t')?,
        ExportFormat::Json => write_json(result, &path)?,
        ExportFormat::Pdf => write_pdf(result, chart.map(|c| &c.data), &path)?,
        ExportFormat::None => return Ok(None),
    }
    info!("{} report exported: {}", extension.to_uppercase(), path.display());
    Ok(Some(path))
}
