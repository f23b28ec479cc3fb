use lazy_static::lazy_static;
use memchr::memmem::Finder;
use std::borrow::Cow;

lazy_static! {
    static ref ERROR_FINDER: Finder<'static> = Finder::new("error");
    static ref WARNING_FINDER: Finder<'static> = Finder::new("warning");
    static ref FAILED_LOGIN_FINDER: Finder<'static> = Finder::new("failed login");
}

/// Outcome of classifying a single line. The three checks are independent,
/// so any combination of flags may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_error: bool,
    pub is_warning: bool,
    pub is_failed_login: bool,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        !(self.is_error || self.is_warning || self.is_failed_login)
    }
}

/// Classify one line using case-insensitive substring search.
///
/// Matching runs on the lowercased line, so the patterns are found anywhere
/// regardless of letter casing. "failed login" requires exactly one space
/// between the words.
pub fn classify(line: &str) -> Classification {
    let lowered = fold_case(line);
    let haystack = lowered.as_bytes();

    Classification {
        is_error: ERROR_FINDER.find(haystack).is_some(),
        is_warning: WARNING_FINDER.find(haystack).is_some(),
        is_failed_login: FAILED_LOGIN_FINDER.find(haystack).is_some(),
    }
}

// Lines are mostly ASCII; only pay for Unicode lowering when needed
fn fold_case(line: &str) -> Cow<'_, str> {
    if line.is_ascii() {
        if line.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(line.to_ascii_lowercase())
        } else {
            Cow::Borrowed(line)
        }
    } else {
        // Simple per-character mapping: 'İ' folds to 'i' rather than
        // 'i' plus a combining dot, so "FAİLED LOGİN" still matches
        Cow::Owned(
            line.chars()
                .map(|c| c.to_lowercase().next().unwrap_or(c))
                .collect(),
        )
    }
}
