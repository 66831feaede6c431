//! Summary tables produced by the aggregators.

use chrono::Weekday;
use serde::Serialize;

use crate::trips::{PaymentType, serialize_weekday};

/// One bar of the top pickup locations chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCount {
    pub location_id: u32,
    pub zone_name: Option<String>,
    pub trips: usize,
}

/// Mean fare for one pickup hour that had at least one trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyFare {
    pub hour: u32,
    pub mean_fare: f64,
    pub trips: usize,
}

/// One linear bin of the distance histogram. `upper` is exclusive except on the last bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Binned trip distances plus the window the chart displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceHistogram {
    pub bins: Vec<HistogramBin>,
    pub display_domain: (f64, f64),
}

/// Trips per payment label present in the row set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentShare {
    pub payment_type: PaymentType,
    pub trips: usize,
    pub share: f64,
}

/// Trips starting in one (weekday, hour) slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub hour: u32,
    pub trips: usize,
}
