use std::collections::BTreeMap;

use crate::aggregators::types::HeatmapCell;
use crate::trips::{CleanTrip, WEEKDAYS};

/// Trip counts per (pickup weekday, pickup hour).
///
/// Sparse: only slots with trips are returned, Monday first and hours
/// ascending within a day. Use [`dense_grid`] for a full 7×24 matrix.
pub fn weekday_hour_heatmap<'a>(trips: impl IntoIterator<Item = &'a CleanTrip>) -> Vec<HeatmapCell> {
    let mut counts: BTreeMap<(u32, u32), usize> = BTreeMap::new();
    for trip in trips {
        let day = trip.pickup_weekday.num_days_from_monday();
        *counts.entry((day, trip.pickup_hour)).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|((day, hour), trips)| HeatmapCell {
            weekday: WEEKDAYS[day as usize],
            hour,
            trips,
        })
        .collect()
}

/// Expands sparse cells into `grid[day][hour]`, Monday first, absent slots zero.
///
/// Cells with an hour outside 0..24 have no slot and are skipped.
pub fn dense_grid(cells: &[HeatmapCell]) -> [[usize; 24]; 7] {
    let mut grid = [[0usize; 24]; 7];
    for cell in cells {
        let day = cell.weekday.num_days_from_monday() as usize;
        if let Some(slot) = grid[day].get_mut(cell.hour as usize) {
            *slot += cell.trips;
        }
    }
    grid
}
