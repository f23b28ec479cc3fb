use crate::analyzer::{AnalysisResult, top_errors};
use crate::error::ExportError;
use crate::formatter::write_summary;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// File layout of an exported summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// The terminal summary without colors.
    Text,
    /// Rank, message and count columns with a header row.
    Csv,
}

impl ExportFormat {
    /// Pick the format from the output name: `.csv` means CSV, anything else text.
    pub fn from_path(path: &Path) -> Self {
        if path.to_string_lossy().ends_with(".csv") {
            ExportFormat::Csv
        } else {
            ExportFormat::Text
        }
    }
}

/// Write the summary to `path` in the format its name selects.
pub fn export_summary(
    result: &AnalysisResult,
    top_n: usize,
    path: &Path,
) -> Result<ExportFormat, ExportError> {
    let format = ExportFormat::from_path(path);
    match format {
        ExportFormat::Csv => {
            let file = File::create(path).map_err(|source| ExportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            write_csv(result, top_n, file).map_err(|source| ExportError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        }
        ExportFormat::Text => {
            let io_err = |source| ExportError::Io {
                path: path.to_path_buf(),
                source,
            };
            let file = File::create(path).map_err(io_err)?;
            let mut writer = BufWriter::new(file);
            write_summary(result, top_n, false, &mut writer).map_err(io_err)?;
            writer.flush().map_err(io_err)?;
        }
    }
    Ok(format)
}

/// Write the ranked errors as CSV: `Rank,Error Message,Count`.
pub fn write_csv<W: Write>(result: &AnalysisResult, top_n: usize, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Rank", "Error Message", "Count"])?;
    for (idx, (message, count)) in top_errors(result, top_n).into_iter().enumerate() {
        wtr.write_record([(idx + 1).to_string(), message, count.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
