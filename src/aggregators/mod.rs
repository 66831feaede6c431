//! Summary tables for the dashboard charts.
//!
//! Every aggregator is a pure function over any iterator of cleaned trips,
//! so the same code serves the full cleaned dataset and a filtered view.
//! An empty row set always yields an empty table, never an error.

pub mod heatmap;
pub mod histogram;
pub mod hourly;
pub mod share;
pub mod top_locations;
pub mod types;
pub mod utility;

pub use heatmap::{dense_grid, weekday_hour_heatmap};
pub use histogram::{DISPLAY_DOMAIN, HISTOGRAM_BINS, distance_histogram};
pub use hourly::hourly_mean_fare;
pub use share::payment_share;
pub use top_locations::{TOP_N, top_pickup_locations};
