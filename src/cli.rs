use crate::date::{DateCutoff, parse_date_token};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "logtally")]
#[clap(about = "Tally errors, warnings and failed logins across log files", long_about = None)]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Log files to analyze, in order
    #[clap(long, required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Number of top error messages to show
    #[clap(long, default_value = "5")]
    pub top_errors: usize,

    /// Only count lines dated on or after this day (YYYY-MM-DD)
    #[clap(long, value_parser = parse_since)]
    pub since: Option<NaiveDate>,

    /// Summary file to write; a .csv suffix selects CSV, anything else plain text
    #[clap(long, default_value = "summary_report.txt")]
    pub output: PathBuf,

    /// Print the summary as JSON instead of text
    #[clap(long)]
    pub json: bool,

    /// Disable colored terminal output
    #[clap(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn cutoff(&self) -> Option<DateCutoff> {
        self.since.map(DateCutoff::new)
    }
}

fn parse_since(value: &str) -> Result<NaiveDate, String> {
    parse_date_token(value).ok_or_else(|| format!("expected a date as YYYY-MM-DD, got '{}'", value))
}
