//! Row validation and derived-field computation.
//!
//! Invalid rows are excluded, never repaired. Only a missing column is
//! fatal; everything else is counted and dropped.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SchemaError;
use crate::trips::{CleanTrip, PaymentType, REQUIRED_COLUMNS, RawTrip, RawTripTable};

/// Fares above this are treated as data-entry errors.
pub const MAX_FARE: f64 = 500.0;

/// Why rows were dropped. Each row is counted once, at the first failing check.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropCounts {
    pub missing_field: usize,
    pub invalid_distance: usize,
    pub fare_out_of_range: usize,
    pub negative_duration: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.missing_field + self.invalid_distance + self.fare_out_of_range + self.negative_duration
    }
}

/// The immutable result of cleaning. Filtering and aggregation borrow it.
#[derive(Debug, Clone, Default)]
pub struct CleanedDataset {
    pub trips: Vec<CleanTrip>,
    pub raw_count: usize,
    pub drops: DropCounts,
}

impl CleanedDataset {
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Rows excluded by cleaning.
    pub fn dropped(&self) -> usize {
        self.raw_count - self.trips.len()
    }

    /// Earliest and latest pickup calendar date, or `None` when empty.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.trips.iter().map(|t| t.pickup_time.date());
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Strips derived fields so the set can be fed back through [`clean`].
    pub fn to_raw_table(&self) -> RawTripTable {
        RawTripTable::with_rows(self.trips.iter().map(RawTrip::from).collect())
    }
}

enum Rejection {
    MissingField,
    InvalidDistance,
    FareOutOfRange,
    NegativeDuration,
}

/// Validates every raw row and derives computed fields for the survivors.
///
/// # Errors
///
/// Returns [`SchemaError::MissingColumns`] if the table lacks any required column.
#[tracing::instrument(skip(table), fields(rows = table.rows.len()))]
pub fn clean(table: &RawTripTable) -> Result<CleanedDataset, SchemaError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns(missing));
    }

    let mut drops = DropCounts::default();
    let mut trips = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        match clean_row(row) {
            Ok(trip) => trips.push(trip),
            Err(Rejection::MissingField) => drops.missing_field += 1,
            Err(Rejection::InvalidDistance) => drops.invalid_distance += 1,
            Err(Rejection::FareOutOfRange) => drops.fare_out_of_range += 1,
            Err(Rejection::NegativeDuration) => drops.negative_duration += 1,
        }
    }

    debug!(
        missing_field = drops.missing_field,
        invalid_distance = drops.invalid_distance,
        fare_out_of_range = drops.fare_out_of_range,
        negative_duration = drops.negative_duration,
        "Drop breakdown"
    );
    info!(kept = trips.len(), dropped = drops.total(), "Cleaning complete");

    Ok(CleanedDataset {
        trips,
        raw_count: table.rows.len(),
        drops,
    })
}

fn clean_row(row: &RawTrip) -> Result<CleanTrip, Rejection> {
    let (
        Some(pickup_time),
        Some(dropoff_time),
        Some(pickup_location_id),
        Some(dropoff_location_id),
        Some(fare_amount),
    ) = (
        row.pickup_time,
        row.dropoff_time,
        row.pickup_location_id,
        row.dropoff_location_id,
        row.fare_amount,
    )
    else {
        return Err(Rejection::MissingField);
    };

    let trip_distance = match row.trip_distance {
        Some(d) if d > 0.0 && d.is_finite() => d,
        _ => return Err(Rejection::InvalidDistance),
    };

    if !(fare_amount > 0.0 && fare_amount <= MAX_FARE) {
        return Err(Rejection::FareOutOfRange);
    }

    if dropoff_time < pickup_time {
        return Err(Rejection::NegativeDuration);
    }

    let duration_minutes = duration_minutes(pickup_time, dropoff_time);

    Ok(CleanTrip {
        pickup_time,
        dropoff_time,
        pickup_location_id,
        dropoff_location_id,
        trip_distance,
        fare_amount,
        payment_type: PaymentType::from_code(row.payment_type),
        duration_minutes,
        pickup_hour: pickup_time.hour(),
        pickup_weekday: pickup_time.weekday(),
        speed_mph: speed_mph(trip_distance, duration_minutes),
    })
}

/// Fractional minutes between two timestamps.
pub fn duration_minutes(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let delta = end - start;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 60_000_000.0,
        // only overflows beyond ~292k years
        None => delta.num_milliseconds() as f64 / 60_000.0,
    }
}

/// Miles per hour; zero-duration trips are defined to have zero speed.
pub fn speed_mph(distance: f64, duration_minutes: f64) -> f64 {
    if duration_minutes > 0.0 {
        distance * 60.0 / duration_minutes
    } else {
        0.0
    }
}
