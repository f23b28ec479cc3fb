// Declare our modules
pub mod analyzer;
pub mod classifier;
pub mod cli;
pub mod counts;
pub mod date;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod formatter;
pub mod logging;

// Re-export key types for convenience
pub use analyzer::{AnalysisResult, CombinedResult, LogAnalyzer, PerFileResult, top_errors};
pub use classifier::{Classification, classify};
pub use cli::Args;
pub use counts::ErrorCounts;
pub use date::DateCutoff;
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use export::{ExportFormat, export_summary};
pub use formatter::print_summary;
