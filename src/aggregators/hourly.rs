use std::collections::BTreeMap;

use crate::aggregators::types::HourlyFare;
use crate::aggregators::utility::mean;
use crate::trips::CleanTrip;

/// Mean fare per pickup hour, ascending by hour.
///
/// Hours without trips are omitted rather than reported as zero.
pub fn hourly_mean_fare<'a>(trips: impl IntoIterator<Item = &'a CleanTrip>) -> Vec<HourlyFare> {
    let mut fares_by_hour: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for trip in trips {
        fares_by_hour
            .entry(trip.pickup_hour)
            .or_default()
            .push(trip.fare_amount);
    }

    fares_by_hour
        .into_iter()
        .map(|(hour, fares)| HourlyFare {
            hour,
            mean_fare: mean(&fares),
            trips: fares.len(),
        })
        .collect()
}
