//! Output formatting and persistence for dashboard reports.
//!
//! Supports pretty-printing, JSON serialization, and per-table CSV export.

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::report::DashboardReport;
use crate::stats::TripStats;

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &DashboardReport) {
    debug!("{:#?}", report);
}

/// Logs the headline metrics as structured fields.
pub fn log_stats(label: &str, stats: &TripStats) {
    info!(
        rows = label,
        total_trips = stats.total_trips,
        mean_fare = %format!("${:.2}", stats.mean_fare),
        total_fare = %format!("${:.2}", stats.total_fare),
        mean_distance = %format!("{:.2} miles", stats.mean_distance),
        mean_duration = %format!("{:.2} min", stats.mean_duration_minutes),
        "Trip metrics"
    );
}

pub fn to_json(report: &DashboardReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes the report as pretty-printed JSON, creating parent directories.
pub fn write_json(path: &str, report: &DashboardReport) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_json(report)?)?;
    info!(path, "Report JSON written");
    Ok(())
}

fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "CSV table written");
    Ok(())
}

#[derive(Serialize)]
struct HistogramRow {
    lower: f64,
    upper: f64,
    count: usize,
    in_display_domain: bool,
}

/// Writes each summary table to its own CSV file under `dir`.
pub fn write_csv_tables(dir: &str, report: &DashboardReport) -> Result<()> {
    let dir = Path::new(dir);
    fs::create_dir_all(dir)?;

    write_table(&dir.join("top_locations.csv"), &report.top_pickup_locations)?;
    write_table(&dir.join("hourly_fare.csv"), &report.hourly_mean_fare)?;
    write_table(&dir.join("payment_share.csv"), &report.payment_share)?;
    write_table(&dir.join("weekday_hour_heatmap.csv"), &report.weekday_hour_heatmap)?;

    let (lo, hi) = report.distance_histogram.display_domain;
    let histogram: Vec<HistogramRow> = report
        .distance_histogram
        .bins
        .iter()
        .map(|b| HistogramRow {
            lower: b.lower,
            upper: b.upper,
            count: b.count,
            in_display_domain: b.upper > lo && b.lower < hi,
        })
        .collect();
    write_table(&dir.join("distance_histogram.csv"), &histogram)?;

    info!(dir = %dir.display(), "CSV tables written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::clean;
    use crate::filter::FilterSpec;
    use crate::locations::{Location, LocationTable};
    use crate::report::build_report;
    use crate::trips::{RawTrip, RawTripTable};
    use chrono::NaiveDate;
    use std::env;

    fn sample_report() -> DashboardReport {
        let pickup = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let dataset = clean(&RawTripTable::with_rows(vec![RawTrip {
            pickup_time: Some(pickup),
            dropoff_time: Some(pickup + chrono::Duration::minutes(10)),
            pickup_location_id: Some(5),
            dropoff_location_id: Some(7),
            trip_distance: Some(2.0),
            fare_amount: Some(10.0),
            payment_type: Some(1),
        }]))
        .unwrap();
        let zones = LocationTable::new(vec![Location {
            location_id: 5,
            borough: Some("Staten Island".to_string()),
            zone_name: Some("Arden Heights".to_string()),
            service_zone: Some("Boro Zone".to_string()),
        }]);
        build_report(&dataset, &zones, &FilterSpec::covering(&dataset))
    }

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_json_uses_display_labels() {
        let json = to_json(&sample_report()).unwrap();

        assert!(json.contains("\"Credit Card\""));
        assert!(json.contains("\"Monday\""));
        assert!(json.contains("\"Arden Heights\""));
    }

    #[test]
    fn test_write_json_creates_file() {
        let path = temp_path("trip_dashboard_test_report/report.json");
        let _ = fs::remove_file(&path);

        write_json(&path, &sample_report()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["rows"]["filtered"], 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_csv_tables() {
        let dir = temp_path("trip_dashboard_test_tables");
        let _ = fs::remove_dir_all(&dir);

        write_csv_tables(&dir, &sample_report()).unwrap();

        for name in [
            "top_locations.csv",
            "hourly_fare.csv",
            "distance_histogram.csv",
            "payment_share.csv",
            "weekday_hour_heatmap.csv",
        ] {
            assert!(Path::new(&dir).join(name).exists(), "{name} missing");
        }

        let top = fs::read_to_string(Path::new(&dir).join("top_locations.csv")).unwrap();
        let lines: Vec<_> = top.lines().collect();
        assert_eq!(lines, vec!["location_id,zone_name,trips", "5,Arden Heights,1"]);

        let heat = fs::read_to_string(Path::new(&dir).join("weekday_hour_heatmap.csv")).unwrap();
        assert!(heat.contains("Monday,8,1"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
