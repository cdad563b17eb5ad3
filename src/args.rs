use crate::{
    DEFAULT_FALLBACK_FILE, FilterSelection, LocationAxis, SalesTable, SalesViewError,
    SalesViewResult,
};

use chrono::NaiveDate;
use clap::Parser;
use regex::Regex;
use std::{path::PathBuf, sync::LazyLock};

// https://stackoverflow.com/questions/74068168/clap-rs-not-printing-colors-during-help
fn get_styles() -> clap::builder::Styles {
    let cyan = anstyle::Color::Ansi(anstyle::AnsiColor::Cyan);
    let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
    let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);

    clap::builder::Styles::styled()
        .placeholder(anstyle::Style::new().fg_color(Some(yellow)))
        .usage(anstyle::Style::new().fg_color(Some(cyan)).bold())
        .header(
            anstyle::Style::new()
                .fg_color(Some(cyan))
                .bold()
                .underline(),
        )
        .literal(anstyle::Style::new().fg_color(Some(green)))
}

// https://docs.rs/clap/latest/clap/struct.Command.html#method.help_template
const APPLET_TEMPLATE: &str = "\
{before-help}
{about-with-newline}
{usage-heading} {usage}

{all-args}
{after-help}";

const EX1: &str = r#" superstore-view Superstore.xlsx"#;
const EX2: &str = r#" superstore-view data.csv --start 2016-01-01 --end 2016-12-31 -r East,West"#;
const EX3: &str = r#" superstore-view data.txt -s Ohio -s Texas -c Columbus -o ./exports"#;

/// Command-line arguments for the Superstore View application.
#[derive(Parser, Debug, Clone)]
#[command(
    // Read from `Cargo.toml`.
    author, version, about,
    long_about = None,
    next_line_help = true,
    help_template = APPLET_TEMPLATE,
    styles=get_styles(),
    after_help = format!("EXAMPLES:\n{EX1}\n{EX2}\n{EX3}")
)]
pub struct Arguments {
    /// Optional path to the dataset (CSV, TXT, XLS, XLSX).
    #[arg(
        value_name = "FILE_PATH",
        required = false,
        help = "Path to the sales dataset (CSV/TXT/XLS/XLSX) [Optional]",
        long_help = "Path to the input dataset.\n\
        CSV is comma-separated, TXT is tab-separated, XLS/XLSX use the first worksheet.\n\
        If omitted, the fallback dataset is loaded (see --fallback)."
    )]
    pub path: Option<PathBuf>,

    /// Dataset loaded when FILE_PATH is omitted. [Default: Superstore.csv]
    #[arg(
        short = 'f',
        long,
        value_name = "PATH",
        default_value = DEFAULT_FALLBACK_FILE,
        help = "Fallback dataset used when no FILE_PATH is given",
        long_help = "Dataset loaded when no FILE_PATH is given.\n\
        Also served by 'Download Sample File'. A missing fallback is an error."
    )]
    pub fallback: PathBuf,

    /// First order date of the window (inclusive). [Default: earliest order date]
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Start of the order-date window (inclusive)",
        value_parser = validate_start_date
    )]
    pub start: Option<NaiveDate>,

    /// Last order date of the window (inclusive). [Default: latest order date]
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "End of the order-date window (inclusive)",
        value_parser = validate_end_date
    )]
    pub end: Option<NaiveDate>,

    /// Regions to keep. Repeatable or comma-separated.
    #[arg(
        short = 'r',
        long = "region",
        value_name = "REGION",
        value_delimiter = ',',
        help = "Region(s) to keep, e.g. -r East,West"
    )]
    pub regions: Vec<String>,

    /// States to keep. Repeatable or comma-separated.
    #[arg(
        short = 's',
        long = "state",
        value_name = "STATE",
        value_delimiter = ',',
        help = "State(s) to keep, e.g. -s Ohio -s Texas"
    )]
    pub states: Vec<String>,

    /// Cities to keep. Repeatable or comma-separated.
    #[arg(
        short = 'c',
        long = "city",
        value_name = "CITY",
        value_delimiter = ',',
        help = "City(ies) to keep"
    )]
    pub cities: Vec<String>,

    /// Headless mode: write the CSV exports into this directory and exit.
    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Write Category/Region/TimeSeries/Data CSV files here and exit",
        long_help = "Runs the filters and aggregations once, writes\n\
        Category.csv, Region.csv, TimeSeries.csv and Data.csv into DIR,\n\
        and exits without opening a window."
    )]
    pub export_dir: Option<PathBuf>,
}

impl Arguments {
    /// Build `Arguments` struct.
    pub fn build() -> Arguments {
        Arguments::parse()
    }

    /// `true` when `--export-dir` was given.
    pub fn is_headless(&self) -> bool {
        self.export_dir.is_some()
    }

    /// The initial selection for `table`: the requested window, defaulting to the
    /// table's order-date bounds, plus the requested location values.
    pub fn selection(&self, table: &SalesTable) -> FilterSelection {
        let (min, max) = table.date_bounds();
        let start = self.start.unwrap_or(min);
        let end = self.end.unwrap_or(max);

        if start > end {
            tracing::warn!("Start date {start} is after end date {end}: the window is empty");
        }

        FilterSelection::for_table(table)
            .with_date_range(start, end)
            .with_values(LocationAxis::Region, self.regions.iter().map(|v| v.trim()))
            .with_values(LocationAxis::State, self.states.iter().map(|v| v.trim()))
            .with_values(LocationAxis::City, self.cities.iter().map(|v| v.trim()))
    }
}

// --- Date Validation Functions ---

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap_or_else(|e| panic!("invalid ISO date pattern: {e}"))
});

/// Validates a command-line date: must be `YYYY-MM-DD` AND a real calendar day.
fn validate_cli_date(value: &str, arg_name: &str) -> SalesViewResult<NaiveDate> {
    let value = value.trim();

    // 1. Check Format Constraint
    if !ISO_DATE.is_match(value) {
        return Err(SalesViewError::InvalidArgument {
            arg_name: arg_name.to_string(),
            reason: format!("'{value}' is not in YYYY-MM-DD format"),
        });
    }

    // 2. Check Calendar
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| SalesViewError::InvalidArgument {
        arg_name: arg_name.to_string(),
        reason: format!("'{value}' is not a valid date: {e}"),
    })
}

// --- Wrapper Validator Functions for specific arguments ---

/// clap validator specifically for the '--start' argument.
fn validate_start_date(s: &str) -> SalesViewResult<NaiveDate> {
    validate_cli_date(s, "--start")
}

/// clap validator specifically for the '--end' argument.
fn validate_end_date(s: &str) -> SalesViewResult<NaiveDate> {
    validate_cli_date(s, "--end")
}

//----------------------------------------------------------------------------//
//                                   Tests                                    //
//----------------------------------------------------------------------------//

/// Run tests with:
/// `cargo test -- --show-output tests_args`
#[cfg(test)]
mod tests_args {
    use super::*;
    use crate::table::fixtures::*;
    use std::collections::BTreeSet;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_args_no_path_uses_fallback() {
        let args = Arguments::parse_from(["superstore-view"]);

        assert_eq!(args.path, None);
        assert_eq!(args.fallback, PathBuf::from(DEFAULT_FALLBACK_FILE));
        assert_eq!(args.start, None);
        assert_eq!(args.end, None);
        assert!(args.regions.is_empty());
        assert!(!args.is_headless());
    }

    #[test]
    fn test_args_all_options_short() {
        let args = Arguments::parse_from([
            "superstore-view",
            "-f",
            "other.csv",
            "-r",
            "East,West",
            "-s",
            "Ohio",
            "-s",
            "Texas",
            "-c",
            "Akron",
            "-o",
            "out",
            "data.xlsx",
        ]);

        assert_eq!(args.path, Some(PathBuf::from("data.xlsx")));
        assert_eq!(args.fallback, PathBuf::from("other.csv"));
        assert_eq!(args.regions, vec!["East", "West"]);
        assert_eq!(args.states, vec!["Ohio", "Texas"]);
        assert_eq!(args.cities, vec!["Akron"]);
        assert_eq!(args.export_dir, Some(PathBuf::from("out")));
        assert!(args.is_headless());
    }

    #[test]
    fn test_args_dates_long() {
        let args = Arguments::parse_from([
            "superstore-view",
            "--start",
            "2016-01-01",
            "--end",
            "2016-12-31",
        ]);

        assert_eq!(args.start, Some(ymd(2016, 1, 1)));
        assert_eq!(args.end, Some(ymd(2016, 12, 31)));
    }

    #[test]
    fn test_args_invalid_dates_are_rejected() {
        for bad in ["2016/01/01", "01-01-2016", "2016-02-30", "yesterday"] {
            let result = Arguments::try_parse_from(["superstore-view", "--start", bad]);
            assert!(result.is_err(), "accepted {bad}");
        }

        let err = validate_end_date("2016-13-01").unwrap_err();
        println!("err: {err}");
        assert!(matches!(
            err,
            SalesViewError::InvalidArgument { ref arg_name, .. } if arg_name == "--end"
        ));
    }

    #[test]
    fn test_selection_defaults_to_table_bounds() {
        let table = sample_table();
        let args = Arguments::parse_from(["superstore-view", "--end", "2015-12-31", "-c", " Akron "]);

        let selection = args.selection(&table);

        assert_eq!(selection.date_start, ymd(2015, 1, 5));
        assert_eq!(selection.date_end, ymd(2015, 12, 31));
        assert!(selection.regions.is_empty());
        assert_eq!(selection.cities, set(&["Akron"]));
    }
}
