//! CLI entry point for the trip dashboard back end.
//!
//! Loads raw trip records and the zone lookup, cleans them once, and prints
//! the metrics summary or the full set of dashboard tables for a filter.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use trip_dashboard::{
    cleaner::{CleanedDataset, clean},
    config::Settings,
    filter::{DateRange, FilterSpec, HourRange},
    loader::{load_locations, load_trips},
    output::{log_stats, print_pretty, to_json, write_csv_tables, write_json},
    report::build_report,
    stats::TripStats,
    trips::PaymentType,
};

#[derive(Parser)]
#[command(name = "trip_dashboard")]
#[command(about = "Clean taxi trip records and summarize them for a dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log headline metrics over the whole cleaned dataset
    Summary {
        /// Trip CSV path or URL (defaults to TRIPS_SOURCE)
        #[arg(short, long)]
        trips: Option<String>,
    },
    /// Build every dashboard table for a filter
    Report {
        /// Trip CSV path or URL (defaults to TRIPS_SOURCE)
        #[arg(short, long)]
        trips: Option<String>,

        /// Zone lookup CSV path or URL (defaults to ZONES_SOURCE)
        #[arg(short, long)]
        zones: Option<String>,

        /// First pickup date to include (YYYY-MM-DD); defaults to the earliest in the data
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last pickup date to include (YYYY-MM-DD); defaults to the latest in the data
        #[arg(long)]
        end: Option<NaiveDate>,

        /// First pickup hour to include
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=23))]
        hour_start: u32,

        /// Last pickup hour to include
        #[arg(long, default_value_t = 23, value_parser = clap::value_parser!(u32).range(0..=23))]
        hour_end: u32,

        /// Payment label to include, e.g. "Credit Card" (repeatable; default all)
        #[arg(short, long = "payment", value_parser = parse_payment)]
        payments: Vec<PaymentType>,

        /// Allow no payment labels at all (yields an empty view)
        #[arg(long, conflicts_with = "payments")]
        no_payments: bool,

        /// Write the report JSON here instead of stdout
        #[arg(long)]
        json: Option<String>,

        /// Also write each table as CSV into this directory
        #[arg(long)]
        csv_dir: Option<String>,
    },
    /// Log zone counts per borough from the lookup table
    Zones {
        /// Zone lookup CSV path or URL (defaults to ZONES_SOURCE)
        #[arg(short, long)]
        zones: Option<String>,
    },
}

fn parse_payment(label: &str) -> Result<PaymentType, String> {
    PaymentType::from_label(label).ok_or_else(|| {
        let known: Vec<_> = PaymentType::ALL.iter().map(|p| p.label()).collect();
        format!("unknown payment label '{label}', expected one of: {}", known.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&settings.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&settings.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("trip_dashboard.log"));

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
        Commands::Summary { trips } => {
            let source = trips.unwrap_or(settings.trips_source);
            let dataset = load_dataset(&source).await?;

            log_stats("cleaned", &TripStats::from_trips(&dataset.trips));
            info!(
                raw = dataset.raw_count,
                cleaned = dataset.len(),
                dropped = dataset.dropped(),
                missing_field = dataset.drops.missing_field,
                invalid_distance = dataset.drops.invalid_distance,
                fare_out_of_range = dataset.drops.fare_out_of_range,
                negative_duration = dataset.drops.negative_duration,
                "Cleaning diagnostics"
            );
        }
        Commands::Report {
            trips,
            zones,
            start,
            end,
            hour_start,
            hour_end,
            payments,
            no_payments,
            json,
            csv_dir,
        } => {
            let trips_source = trips.unwrap_or(settings.trips_source);
            let zones_source = zones.unwrap_or(settings.zones_source);

            let dataset = load_dataset(&trips_source).await?;
            let locations = load_locations(&zones_source).await?;

            let mut spec = FilterSpec::covering(&dataset);
            spec.date_range = DateRange {
                start: start.unwrap_or(spec.date_range.start),
                end: end.unwrap_or(spec.date_range.end),
            };
            spec.hour_range = HourRange {
                start: hour_start,
                end: hour_end,
            };
            if no_payments {
                spec.allowed_payment_labels.clear();
            } else if !payments.is_empty() {
                spec.allowed_payment_labels = payments.into_iter().collect();
            }

            if spec.hour_range.start > spec.hour_range.end {
                warn!(
                    hour_start,
                    hour_end, "Hour range does not wrap around midnight; no trips will match"
                );
            }

            let report = build_report(&dataset, &locations, &spec);
            print_pretty(&report);
            log_stats("filtered", &report.filtered);

            match json {
                Some(path) => write_json(&path, &report)?,
                None => println!("{}", to_json(&report)?),
            }
            if let Some(dir) = csv_dir {
                write_csv_tables(&dir, &report)?;
            }
        }
        Commands::Zones { zones } => {
            let source = zones.unwrap_or(settings.zones_source);
            let locations = load_locations(&source).await?;

            for (borough, count) in locations.zones_per_borough() {
                info!(borough = %borough, zones = count, "Borough");
            }
            info!(total = locations.len(), "Zone lookup summary");
        }
    }

    Ok(())
}

/// Loads and cleans the trip table. A missing required column aborts here.
#[tracing::instrument]
async fn load_dataset(source: &str) -> Result<CleanedDataset> {
    let table = load_trips(source).await?;
    Ok(clean(&table)?)
}
