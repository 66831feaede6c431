use serde::Serialize;

use crate::trips::CleanTrip;

/// Headline metrics for the dashboard summary row.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TripStats {
    pub total_trips: usize,
    pub mean_fare: f64,
    pub total_fare: f64,
    pub mean_distance: f64,
    pub mean_duration_minutes: f64,
}

impl TripStats {
    /// Computes the metrics over whichever row set the caller passes: the
    /// cleaned dataset or a filtered view. Empty input yields all zeros.
    pub fn from_trips<'a>(trips: impl IntoIterator<Item = &'a CleanTrip>) -> Self {
        let mut s = TripStats::default();
        let mut distance_sum = 0.0;
        let mut duration_sum = 0.0;

        for t in trips {
            s.total_trips += 1;
            s.total_fare += t.fare_amount;
            distance_sum += t.trip_distance;
            duration_sum += t.duration_minutes;
        }

        if s.total_trips > 0 {
            let n = s.total_trips as f64;
            s.mean_fare = s.total_fare / n;
            s.mean_distance = distance_sum / n;
            s.mean_duration_minutes = duration_sum / n;
        }

        s
    }
}
