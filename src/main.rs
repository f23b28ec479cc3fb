use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;

use logtally::analyzer::LogAnalyzer;
use logtally::cli::Args;
use logtally::diagnostics::{Diagnostic, DiagnosticSink};
use logtally::export::export_summary;
use logtally::formatter::{print_summary, write_diagnostic, write_json};
use logtally::logging;

/// Prints progress and notices as the analyzer reports them, keeping a copy
/// for the JSON document.
struct TerminalSink {
    color: bool,
    progress: bool,
    collected: Vec<Diagnostic>,
}

impl DiagnosticSink for TerminalSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let stderr = io::stderr();
        if let Err(e) = write_diagnostic(&diagnostic, self.color, &mut stderr.lock()) {
            tracing::error!(error = %e, %diagnostic, "could not print diagnostic");
        }
        self.collected.push(diagnostic);
    }

    fn file_started(&mut self, path: &Path) {
        if self.progress {
            println!("Analyzing {}...", path.display());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose).context("failed to initialize logging")?;

    let color = !args.no_color && atty::is(atty::Stream::Stdout);
    let mut sink = TerminalSink {
        color: !args.no_color && atty::is(atty::Stream::Stderr),
        progress: !args.json,
        collected: Vec::new(),
    };

    if let Some(cutoff) = args.cutoff() {
        tracing::info!(%cutoff, "filtering lines by date");
    }

    let analyzer = LogAnalyzer::with_cutoff(args.cutoff());
    let result = analyzer.aggregate(&args.files, &mut sink);

    if args.json {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        write_json(&result, args.top_errors, &sink.collected, &mut handle)
            .context("failed to write JSON summary")?;
        handle.flush()?;
    } else {
        println!();
        print_summary(&result, args.top_errors, color).context("failed to print summary")?;
    }

    export_summary(&result, args.top_errors, &args.output)
        .with_context(|| format!("could not export summary to {}", args.output.display()))?;
    if !args.json {
        println!("\nSummary exported to {}", args.output.display());
    }

    Ok(())
}
