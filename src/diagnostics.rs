use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A non-fatal condition met while analyzing input. None of these stop a run;
/// they are handed to a [`DiagnosticSink`] as they happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The path does not exist or could not be opened.
    MissingFile { path: PathBuf, reason: String },
    /// The file opened but held no lines.
    EmptyFile { path: PathBuf },
    /// A cutoff is active and the line's first token is not a date.
    MalformedDate {
        path: PathBuf,
        line_number: usize,
        line: String,
    },
    /// Reading stopped part way through; earlier lines were kept.
    PartialRead {
        path: PathBuf,
        lines_read: usize,
        reason: String,
    },
}

impl Diagnostic {
    /// Whether this reports a failure to read, as opposed to a notice about content.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Diagnostic::MissingFile { .. } | Diagnostic::PartialRead { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingFile { path, reason } => {
                write!(f, "Cannot open {}: {}", path.display(), reason)
            }
            Diagnostic::EmptyFile { path } => {
                write!(f, "{} is empty, skipping.", path.display())
            }
            Diagnostic::MalformedDate { line, .. } => {
                write!(f, "Skipping line with malformed date: {}", line)
            }
            Diagnostic::PartialRead {
                path,
                lines_read,
                reason,
            } => write!(
                f,
                "Error reading file {} after {} line{}: {}",
                path.display(),
                lines_read,
                if *lines_read == 1 { "" } else { "s" },
                reason
            ),
        }
    }
}

/// Receives diagnostics from the analyzer while it runs.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    /// Called before each file is opened.
    fn file_started(&mut self, _path: &Path) {}
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }

    fn file_started(&mut self, path: &Path) {
        (**self).file_started(path);
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl DiagnosticSink for Discard {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let empty = Diagnostic::EmptyFile {
            path: PathBuf::from("empty.log"),
        };
        assert_eq!(empty.to_string(), "empty.log is empty, skipping.");

        let malformed = Diagnostic::MalformedDate {
            path: PathBuf::from("app.log"),
            line_number: 3,
            line: "notadate ERROR boom".to_string(),
        };
        assert_eq!(
            malformed.to_string(),
            "Skipping line with malformed date: notadate ERROR boom"
        );

        let partial = Diagnostic::PartialRead {
            path: PathBuf::from("app.log"),
            lines_read: 1,
            reason: "boom".to_string(),
        };
        assert_eq!(
            partial.to_string(),
            "Error reading file app.log after 1 line: boom"
        );
    }

    #[test]
    fn test_is_error_split() {
        let missing = Diagnostic::MissingFile {
            path: PathBuf::from("nope.log"),
            reason: "No such file or directory".to_string(),
        };
        assert!(missing.is_error());
        assert!(!Diagnostic::EmptyFile { path: PathBuf::from("e.log") }.is_error());
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let empty = Diagnostic::EmptyFile {
            path: PathBuf::from("e.log"),
        };
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["kind"], "empty_file");
        assert_eq!(json["path"], "e.log");
    }
}
