//! Command-line harness around the golden window engine.
//!
//! Loads upstream data computed elsewhere, assembles the combined calendar
//! and exports it for the feed and publishing layers.

use anyhow::Result;
use chrono::{FixedOffset, NaiveDate};
use clap::{Parser, Subcommand};
use golden_window::calendar::{CalendarRequest, CombinedCalendarAssembler, DateRange};
use golden_window::config::EngineConfig;
use golden_window::output::{append_micro_bird_windows, print_json, print_pretty, write_json};
use golden_window::parser::load_upstream;
use golden_window::transits::classifier::classify_day;
use golden_window::transits::labels::{TransitLabel, parse_label};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "golden_window")]
#[command(about = "Classify transit days and compute Micro Bird posting windows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the combined calendar for a profile and date range
    Generate {
        /// Upstream JSON bundle (.json or .json.gz) or directory of CSV files
        #[arg(value_name = "FILE_OR_DIR")]
        input: PathBuf,

        /// First day of the range (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// UTC offset that defines calendar days (e.g. "-05:00")
        #[arg(long, default_value = "+00:00", allow_hyphen_values = true, value_parser = parse_offset)]
        utc_offset: FixedOffset,

        /// Profile or birth-data identifier
        #[arg(short, long, default_value = "default")]
        profile: String,

        /// Engine configuration JSON
        #[arg(short, long)]
        config: Option<String>,

        /// Write the combined calendar JSON here instead of logging it
        #[arg(short, long)]
        output: Option<String>,

        /// Gzip the JSON written to --output
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Append Micro Bird windows to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// Classify a single day from its three labels
    ClassifyDay {
        /// Day being classified, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        pti: String,

        #[arg(long)]
        vedic: String,

        #[arg(long)]
        personal: String,

        /// Engine configuration JSON
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/golden_window.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("golden_window.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            start,
            end,
            utc_offset,
            profile,
            config,
            output,
            gzip,
            csv,
        } => {
            let assembler = CombinedCalendarAssembler::new(load_config(config.as_deref())?)?;
            let upstream = load_upstream(&input)?;
            let request = CalendarRequest {
                profile_id: profile,
                range: DateRange::new(start, end),
                utc_offset,
            };

            let calendar = assembler.assemble(&request, &upstream)?;

            if calendar.has_no_precision_windows() {
                info!("No precision windows available for this range");
            }
            for warning in &calendar.warnings {
                warn!(?warning, "Upstream data warning");
            }

            match output {
                Some(path) => {
                    write_json(&path, &calendar, gzip)?;
                    info!(path = %path, gzip, "Combined calendar written");
                }
                None => {
                    print_pretty(&calendar);
                    print_json(&calendar)?;
                }
            }

            if let Some(path) = csv {
                let rows = append_micro_bird_windows(&path, &calendar)?;
                info!(path = %path, rows, "Micro Bird windows appended");
            }
        }
        Commands::ClassifyDay {
            date,
            pti,
            vedic,
            personal,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let day = date.unwrap_or_else(|| chrono::Local::now().date_naive());

            let verdict = classify_day(
                &config.classifier,
                day,
                label_or_neutral(&pti),
                label_or_neutral(&vedic),
                label_or_neutral(&personal),
            );

            info!(
                day = %day,
                classification = %verdict.classification,
                background = verdict.is_background(),
                reason = %verdict.reason,
                "{}",
                verdict.classification.description()
            );
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    }
}

fn label_or_neutral<L: TransitLabel>(raw: &str) -> L {
    parse_label(raw).unwrap_or_else(|| {
        warn!(system = %L::SYSTEM, raw, "Unrecognized label, treating as neutral");
        L::NEUTRAL
    })
}

/// Parses `+HH:MM` / `-HH:MM` with chrono, plus the `Z` and `UTC` aliases.
fn parse_offset(raw: &str) -> Result<FixedOffset, chrono::ParseError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return "+00:00".parse();
    }
    raw.parse()
}
