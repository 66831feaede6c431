//! Bundles every summary the dashboard needs for one filter setting.

use serde::Serialize;
use tracing::info;

use crate::aggregators::types::{DistanceHistogram, HeatmapCell, HourlyFare, LocationCount, PaymentShare};
use crate::aggregators::{
    TOP_N, distance_histogram, hourly_mean_fare, payment_share, top_pickup_locations,
    weekday_hour_heatmap,
};
use crate::cleaner::{CleanedDataset, DropCounts};
use crate::filter::{FilterSpec, filter};
use crate::locations::LocationTable;
use crate::stats::TripStats;

#[derive(Debug, Clone, Serialize)]
pub struct RowCounts {
    pub raw: usize,
    pub cleaned: usize,
    pub dropped: usize,
    pub filtered: usize,
    pub drop_reasons: DropCounts,
}

/// Everything the presentation layer renders for one view.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub filter: FilterSpec,
    pub rows: RowCounts,
    pub overall: TripStats,
    pub filtered: TripStats,
    pub top_pickup_locations: Vec<LocationCount>,
    pub hourly_mean_fare: Vec<HourlyFare>,
    pub distance_histogram: DistanceHistogram,
    pub payment_share: Vec<PaymentShare>,
    pub weekday_hour_heatmap: Vec<HeatmapCell>,
}

/// Filters the dataset and runs every aggregator over the result.
#[tracing::instrument(skip_all)]
pub fn build_report(
    dataset: &CleanedDataset,
    locations: &LocationTable,
    spec: &FilterSpec,
) -> DashboardReport {
    let view = filter(dataset, spec);

    let report = DashboardReport {
        filter: spec.clone(),
        rows: RowCounts {
            raw: dataset.raw_count,
            cleaned: dataset.len(),
            dropped: dataset.dropped(),
            filtered: view.len(),
            drop_reasons: dataset.drops,
        },
        overall: TripStats::from_trips(&dataset.trips),
        filtered: TripStats::from_trips(&view),
        top_pickup_locations: top_pickup_locations(&view, locations, TOP_N),
        hourly_mean_fare: hourly_mean_fare(&view),
        distance_histogram: distance_histogram(&view),
        payment_share: payment_share(&view),
        weekday_hour_heatmap: weekday_hour_heatmap(&view),
    };

    info!(
        filtered = report.rows.filtered,
        cleaned = report.rows.cleaned,
        "Report built"
    );
    report
}
