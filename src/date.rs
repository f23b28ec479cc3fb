use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    // Fixed 4-2-2 digit shape; chrono alone would accept "2024-1-5"
    static ref DATE_TOKEN_REGEX: Regex =
        Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Earliest date (inclusive) a line must carry to be counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateCutoff(NaiveDate);

/// What the date gate decided for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCheck {
    /// The line carries an acceptable date, or has no token at all.
    Admit,
    /// The line's date is strictly earlier than the cutoff.
    BeforeCutoff,
    /// The first token is not a `YYYY-MM-DD` calendar date.
    Malformed,
}

impl DateCutoff {
    pub fn new(date: NaiveDate) -> Self {
        DateCutoff(date)
    }

    pub fn admits(&self, date: NaiveDate) -> bool {
        date >= self.0
    }

    /// Gate a line on its leading date token.
    pub fn check_line(&self, line: &str) -> DateCheck {
        let Some(token) = line.split_whitespace().next() else {
            return DateCheck::Admit;
        };

        match parse_date_token(token) {
            Some(date) if self.admits(date) => DateCheck::Admit,
            Some(_) => DateCheck::BeforeCutoff,
            None => DateCheck::Malformed,
        }
    }
}

impl fmt::Display for DateCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Parse a `YYYY-MM-DD` token into a calendar date.
pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    if !DATE_TOKEN_REGEX.is_match(token) {
        return None;
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}
