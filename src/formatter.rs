use crate::analyzer::{AnalysisResult, top_errors};
use crate::diagnostics::Diagnostic;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::{self, Write};

// Structs for JSON output
#[derive(Serialize)]
struct JsonOutput<'a> {
    warning_count: usize,
    failed_login_count: usize,
    total_errors: usize,
    distinct_errors: usize,
    top_errors: Vec<ErrorEntry>,
    diagnostics: &'a [Diagnostic],
}

#[derive(Serialize)]
struct ErrorEntry {
    rank: usize,
    message: String,
    count: usize,
}

// Only colorize when asked; exported files and pipes get plain text
fn paint(text: &str, color: bool, style: fn(&str) -> String) -> String {
    if color { style(text) } else { text.to_string() }
}

/// Write the summary block: warning and failed-login totals, then the
/// ranked top `top_n` error messages.
pub fn write_summary<W: Write>(
    result: &AnalysisResult,
    top_n: usize,
    color: bool,
    writer: &mut W,
) -> io::Result<()> {
    let warnings = format!("Warnings Found: {}", result.warning_count);
    let failed = format!("Failed Logins Found: {}", result.failed_login_count);
    let heading = format!("Top {} Errors:", top_n);

    writeln!(writer, "{}", paint(&warnings, color, |s| s.yellow().to_string()))?;
    writeln!(writer, "{}", paint(&failed, color, |s| s.red().to_string()))?;
    writeln!(writer)?;
    writeln!(writer, "{}", paint(&heading, color, |s| s.cyan().to_string()))?;

    for (rank, (message, count)) in top_errors(result, top_n).iter().enumerate() {
        writeln!(writer, "{}. {} — {} times", rank + 1, message, count)?;
    }

    Ok(())
}

/// Print the summary to stdout.
pub fn print_summary(result: &AnalysisResult, top_n: usize, color: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_summary(result, top_n, color, &mut handle)
}

/// Render one diagnostic as a single human-readable line.
pub fn write_diagnostic<W: Write>(
    diagnostic: &Diagnostic,
    color: bool,
    writer: &mut W,
) -> io::Result<()> {
    if diagnostic.is_error() {
        let text = format!("Error: {}", diagnostic);
        writeln!(writer, "{}", paint(&text, color, |s| s.red().to_string()))
    } else {
        let text = format!("Warning: {}", diagnostic);
        writeln!(writer, "{}", paint(&text, color, |s| s.yellow().to_string()))
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_json<W: Write>(
    result: &AnalysisResult,
    top_n: usize,
    diagnostics: &[Diagnostic],
    writer: &mut W,
) -> io::Result<()> {
    let output = JsonOutput {
        warning_count: result.warning_count,
        failed_login_count: result.failed_login_count,
        total_errors: result.error_count(),
        distinct_errors: result.error_messages.len(),
        top_errors: top_errors(result, top_n)
            .into_iter()
            .enumerate()
            .map(|(idx, (message, count))| ErrorEntry {
                rank: idx + 1,
                message,
                count,
            })
            .collect(),
        diagnostics,
    };

    serde_json::to_writer_pretty(&mut *writer, &output)?;
    writeln!(writer)
}
