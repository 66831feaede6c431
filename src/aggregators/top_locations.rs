use std::collections::HashMap;

use crate::aggregators::types::LocationCount;
use crate::locations::LocationTable;
use crate::trips::CleanTrip;

/// Bars shown in the top pickup locations chart.
pub const TOP_N: usize = 10;

/// The `n` busiest pickup locations, joined to their zone names.
///
/// Selection takes the highest counts with ties broken by ascending id. The
/// result is ordered by count ascending (ties by ascending id) so a
/// horizontal bar chart renders the busiest zone last, on top.
pub fn top_pickup_locations<'a>(
    trips: impl IntoIterator<Item = &'a CleanTrip>,
    locations: &LocationTable,
    n: usize,
) -> Vec<LocationCount> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for trip in trips {
        *counts.entry(trip.pickup_location_id).or_default() += 1;
    }

    let mut ranked: Vec<(u32, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

    ranked
        .into_iter()
        .map(|(location_id, trips)| LocationCount {
            location_id,
            zone_name: locations.zone_name(location_id).map(str::to_string),
            trips,
        })
        .collect()
}
