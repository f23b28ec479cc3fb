use crate::classifier::{Classification, classify};
use crate::counts::ErrorCounts;
use crate::date::{DateCheck, DateCutoff};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

/// Counts gathered from one file, or folded across several.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// Trimmed error lines and how often each occurred, in first-seen order.
    pub error_messages: ErrorCounts,
    pub warning_count: usize,
    pub failed_login_count: usize,
}

/// Result of a single file.
pub type PerFileResult = AnalysisResult;
/// Result of a whole run over every input file.
pub type CombinedResult = AnalysisResult;

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing at all was counted.
    pub fn is_empty(&self) -> bool {
        self.error_messages.is_empty() && self.warning_count == 0 && self.failed_login_count == 0
    }

    pub fn error_count(&self) -> usize {
        self.error_messages.total()
    }

    /// Fold another result into this one: counters add, error tables union
    /// with summed counts.
    pub fn merge(&mut self, other: &AnalysisResult) {
        self.error_messages.merge(&other.error_messages);
        self.warning_count += other.warning_count;
        self.failed_login_count += other.failed_login_count;
    }

    fn record(&mut self, line: &str, classification: Classification) {
        if classification.is_error {
            self.error_messages.increment(line.trim());
        }
        if classification.is_warning {
            self.warning_count += 1;
        }
        if classification.is_failed_login {
            self.failed_login_count += 1;
        }
    }
}

/// Drives line iteration over log files, applying the optional date cutoff
/// and classifying what passes it.
#[derive(Debug, Clone, Default)]
pub struct LogAnalyzer {
    cutoff: Option<DateCutoff>,
}

impl LogAnalyzer {
    pub fn new() -> Self {
        LogAnalyzer { cutoff: None }
    }

    pub fn with_cutoff(cutoff: Option<DateCutoff>) -> Self {
        LogAnalyzer { cutoff }
    }

    pub fn cutoff(&self) -> Option<DateCutoff> {
        self.cutoff
    }

    /// Decide whether a line should be classified at all.
    pub fn date_check(&self, line: &str) -> DateCheck {
        match &self.cutoff {
            Some(cutoff) => cutoff.check_line(line),
            None => DateCheck::Admit,
        }
    }

    /// Analyze one file. Open failures, empty files and read errors are
    /// reported to `sink`; the result is whatever was counted before that.
    pub fn analyze_file<P, S>(&self, path: P, sink: &mut S) -> PerFileResult
    where
        P: AsRef<Path>,
        S: DiagnosticSink + ?Sized,
    {
        let path = path.as_ref();
        debug!(path = %path.display(), "analyzing file");

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "could not open file");
                sink.report(Diagnostic::MissingFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                return AnalysisResult::new();
            }
        };

        // The reader owns the handle and drops it on return
        self.analyze_reader(path, BufReader::new(file), sink)
    }

    /// Analyze lines from any buffered reader. `path` is only used to label
    /// diagnostics.
    ///
    /// `\n`, `\r\n` and a lone `\r` all end a line. Lines are decoded as
    /// UTF-8 with invalid sequences replaced, so undecodable bytes never stop
    /// the read.
    pub fn analyze_reader<R, S>(&self, path: &Path, mut reader: R, sink: &mut S) -> PerFileResult
    where
        R: BufRead,
        S: DiagnosticSink + ?Sized,
    {
        let mut result = AnalysisResult::new();
        let mut buffer = Vec::with_capacity(256);
        let mut lines_read = 0usize;

        loop {
            buffer.clear();
            match reader.read_until(b'\n', &mut buffer) {
                Ok(0) => break,
                Ok(_) => {
                    for raw in split_lines(&buffer) {
                        lines_read += 1;
                        let line = String::from_utf8_lossy(raw);
                        self.process_line(path, lines_read, &line, &mut result, sink);
                    }
                }
                Err(e) => {
                    debug!(path = %path.display(), lines_read, error = %e, "read failed");
                    sink.report(Diagnostic::PartialRead {
                        path: path.to_path_buf(),
                        lines_read,
                        reason: e.to_string(),
                    });
                    return result;
                }
            }
        }

        if lines_read == 0 {
            sink.report(Diagnostic::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        debug!(
            path = %path.display(),
            lines_read,
            distinct_errors = result.error_messages.len(),
            warnings = result.warning_count,
            failed_logins = result.failed_login_count,
            "finished file"
        );
        result
    }

    fn process_line<S>(
        &self,
        path: &Path,
        line_number: usize,
        line: &str,
        result: &mut AnalysisResult,
        sink: &mut S,
    ) where
        S: DiagnosticSink + ?Sized,
    {
        match self.date_check(line) {
            DateCheck::Admit => result.record(line, classify(line)),
            DateCheck::BeforeCutoff => {
                trace!(line_number, "line predates cutoff");
            }
            DateCheck::Malformed => {
                trace!(line_number, "line has malformed date token");
                sink.report(Diagnostic::MalformedDate {
                    path: path.to_path_buf(),
                    line_number,
                    line: line.trim().to_string(),
                });
            }
        }
    }

    /// Analyze every path in order and fold the results together.
    ///
    /// Files that are missing, empty or fail mid-read contribute what they
    /// can and never abort the run.
    pub fn aggregate<P, S>(&self, paths: &[P], sink: &mut S) -> CombinedResult
    where
        P: AsRef<Path>,
        S: DiagnosticSink + ?Sized,
    {
        let mut combined = AnalysisResult::new();
        for path in paths {
            sink.file_started(path.as_ref());
            let file_result = self.analyze_file(path, sink);
            combined.merge(&file_result);
        }
        combined
    }

    /// Merge multiple results in the given order.
    pub fn merge_results(&self, results: Vec<AnalysisResult>) -> AnalysisResult {
        results
            .iter()
            .fold(AnalysisResult::new(), |mut merged, result| {
                merged.merge(result);
                merged
            })
    }
}

// Break one `\n`-terminated chunk into lines, treating a lone `\r` as a
// line end too. The chunk's own terminator is not part of any line.
fn split_lines(chunk: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = chunk
        .strip_suffix(b"\r\n")
        .or_else(|| chunk.strip_suffix(b"\n"))
        .or_else(|| chunk.strip_suffix(b"\r"))
        .unwrap_or(chunk);
    body.split(|&b| b == b'\r')
}

/// The `n` most frequent error messages, count descending. Equal counts keep
/// the order in which the messages were first seen.
pub fn top_errors(result: &AnalysisResult, n: usize) -> Vec<(String, usize)> {
    result.error_messages.most_common(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_date_token;
    use std::io::{self, Cursor, Read};

    fn analyze(analyzer: &LogAnalyzer, text: &str) -> (AnalysisResult, Vec<Diagnostic>) {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let result = analyzer.analyze_reader(
            Path::new("test.log"),
            Cursor::new(text.as_bytes().to_vec()),
            &mut diagnostics,
        );
        (result, diagnostics)
    }

    #[test]
    fn test_counts_each_category() {
        let (result, diagnostics) = analyze(
            &LogAnalyzer::new(),
            "ERROR: disk full\nWarning: low memory\nfailed login for bob\nall good\n",
        );

        assert_eq!(result.error_messages.get("ERROR: disk full"), Some(1));
        assert_eq!(result.warning_count, 1);
        assert_eq!(result.failed_login_count, 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_error_keys_are_trimmed() {
        let (result, _) = analyze(
            &LogAnalyzer::new(),
            "  Error: disk full  \r\nError: disk full\n",
        );
        assert_eq!(result.error_messages.get("Error: disk full"), Some(2));
        assert_eq!(result.error_messages.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let bytes: &[u8] = b"\xff\xfe ERROR bad bytes\nwarning \xc3\x28\n";
        let result = LogAnalyzer::new().analyze_reader(
            Path::new("bin.log"),
            Cursor::new(bytes.to_vec()),
            &mut diagnostics,
        );

        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count, 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_last_line_without_newline_is_counted() {
        let (result, _) = analyze(&LogAnalyzer::new(), "ok\nerror at end");
        assert_eq!(result.error_messages.get("error at end"), Some(1));
    }

    #[test]
    fn test_carriage_returns_end_lines() {
        let (result, diagnostics) = analyze(
            &LogAnalyzer::new(),
            "ERROR disk full\rERROR disk full\rwarning low mem\r",
        );

        assert_eq!(result.error_messages.get("ERROR disk full"), Some(2));
        assert_eq!(result.error_messages.len(), 1);
        assert_eq!(result.warning_count, 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_mixed_line_endings_number_lines() {
        let cutoff = DateCutoff::new(parse_date_token("2024-01-10").unwrap());
        let analyzer = LogAnalyzer::with_cutoff(Some(cutoff));
        let (result, diagnostics) = analyze(
            &analyzer,
            "2024-01-15 error a\r\n2024-01-05 error b\rjunk error\n\r2024-02-01 warning",
        );

        assert_eq!(result.error_messages.get("2024-01-15 error a"), Some(1));
        assert_eq!(result.error_messages.len(), 1);
        assert_eq!(result.warning_count, 1);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::MalformedDate {
                path: "test.log".into(),
                line_number: 3,
                line: "junk error".to_string(),
            }]
        );
    }

    #[test]
    fn test_split_lines_terminators() {
        let lines = |chunk: &[u8]| split_lines(chunk).map(|l| l.to_vec()).collect::<Vec<_>>();
        assert_eq!(lines(b"a\r\n"), vec![b"a".to_vec()]);
        assert_eq!(lines(b"a\rb\n"), vec![b"a".to_vec(), b"b".to_vec()]);
        assert_eq!(lines(b"a\r\rb"), vec![b"a".to_vec(), b"".to_vec(), b"b".to_vec()]);
        assert_eq!(lines(b"a\r"), vec![b"a".to_vec()]);
        assert_eq!(lines(b"\n"), vec![b"".to_vec()]);
    }

    #[test]
    fn test_empty_input_reports_empty_file() {
        let (result, diagnostics) = analyze(&LogAnalyzer::new(), "");
        assert!(result.is_empty());
        assert_eq!(
            diagnostics,
            vec![Diagnostic::EmptyFile {
                path: "test.log".into()
            }]
        );
    }

    #[test]
    fn test_single_blank_line_is_not_empty() {
        let (result, diagnostics) = analyze(&LogAnalyzer::new(), "\n");
        assert!(result.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_date_cutoff_filters_lines() {
        let cutoff = DateCutoff::new(parse_date_token("2024-01-10").unwrap());
        let analyzer = LogAnalyzer::with_cutoff(Some(cutoff));
        let (result, diagnostics) = analyze(
            &analyzer,
            "2024-01-05 ERROR old failure\n\
             2024-01-15 ERROR new failure\n\
             notadate ERROR unknown failure\n",
        );

        assert_eq!(result.error_messages.len(), 1);
        assert_eq!(result.error_messages.get("2024-01-15 ERROR new failure"), Some(1));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::MalformedDate {
                path: "test.log".into(),
                line_number: 3,
                line: "notadate ERROR unknown failure".to_string(),
            }]
        );
    }

    #[test]
    fn test_malformed_date_drops_all_categories() {
        let cutoff = DateCutoff::new(parse_date_token("2024-01-10").unwrap());
        let analyzer = LogAnalyzer::with_cutoff(Some(cutoff));
        let (result, diagnostics) = analyze(&analyzer, "[boot] warning: failed login\n");

        assert!(result.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.data.read(buf)?;
            if n == 0 {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            } else {
                Ok(n)
            }
        }
    }

    #[test]
    fn test_partial_read_keeps_earlier_lines() {
        let reader = io::BufReader::new(FailingReader {
            data: Cursor::new(b"error one\nwarning two\n".to_vec()),
        });
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let result = LogAnalyzer::new().analyze_reader(Path::new("p.log"), reader, &mut diagnostics);

        assert_eq!(result.error_messages.get("error one"), Some(1));
        assert_eq!(result.warning_count, 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0],
            Diagnostic::PartialRead { lines_read: 2, .. }
        ));
    }

    #[test]
    fn test_merge_results_preserves_order() {
        let analyzer = LogAnalyzer::new();
        let (first, _) = analyze(&analyzer, "error B\nwarning\n");
        let (second, _) = analyze(&analyzer, "error A\nerror B\nfailed login\n");

        let merged = analyzer.merge_results(vec![first, second]);
        assert_eq!(merged.error_messages.get("error B"), Some(2));
        assert_eq!(merged.warning_count, 1);
        assert_eq!(merged.failed_login_count, 1);
        let order: Vec<&str> = merged.error_messages.iter().map(|(m, _)| m).collect();
        assert_eq!(order, vec!["error B", "error A"]);
    }

    #[test]
    fn test_merge_results_of_nothing_is_zero() {
        assert_eq!(LogAnalyzer::new().merge_results(Vec::new()), AnalysisResult::new());
    }

    #[test]
    fn test_top_errors_ranking() {
        let (result, _) = analyze(
            &LogAnalyzer::new(),
            "error C\nerror A\nerror B\nerror A\nerror B\nerror A\nerror B\n",
        );
        assert_eq!(
            top_errors(&result, 2),
            vec![("error A".to_string(), 3), ("error B".to_string(), 3)]
        );
        assert!(top_errors(&result, 0).is_empty());
        assert_eq!(top_errors(&result, 9).len(), 3);
    }
}
