//! Environment-driven defaults for the CLI.
//!
//! Values come from the process environment, after `.env` has been loaded
//! by the binary. CLI flags take precedence over everything here.
//!
//! ```text
//! TRIPS_SOURCE=data/yellow_tripdata_2024-01.csv.gz
//! ZONES_SOURCE=https://d37ci6vzurychx.cloudfront.net/misc/taxi_zone_lookup.csv
//! LOG_FILE_PATH=logs/trip_dashboard.log
//! ```

pub const DEFAULT_TRIPS_SOURCE: &str = "data/yellow_tripdata.csv";
pub const DEFAULT_ZONES_SOURCE: &str = "data/taxi_zone_lookup.csv";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/trip_dashboard.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub trips_source: String,
    pub zones_source: String,
    pub log_file_path: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup, falling back to defaults for unset or blank keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Settings {
            trips_source: get("TRIPS_SOURCE", DEFAULT_TRIPS_SOURCE),
            zones_source: get("ZONES_SOURCE", DEFAULT_ZONES_SOURCE),
            log_file_path: get("LOG_FILE_PATH", DEFAULT_LOG_FILE_PATH),
        }
    }
}
