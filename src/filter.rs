//! Date, hour and payment-label filtering over the cleaned dataset.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::cleaner::CleanedDataset;
use crate::trips::{CleanTrip, PaymentType};

/// Inclusive calendar-date window on pickup date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Inclusive pickup-hour window. No wraparound: `start > end` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub const ALL_DAY: HourRange = HourRange { start: 0, end: 23 };

    pub fn contains(&self, hour: u32) -> bool {
        self.start <= hour && hour <= self.end
    }
}

/// The active view. An empty `allowed_payment_labels` set excludes everything,
/// it is not "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub date_range: DateRange,
    pub hour_range: HourRange,
    pub allowed_payment_labels: BTreeSet<PaymentType>,
}

impl FilterSpec {
    /// Full date extent of the dataset, all hours, every payment label.
    ///
    /// An empty dataset has no extent; today's date stands in so the spec is still well-formed.
    pub fn covering(dataset: &CleanedDataset) -> Self {
        let (start, end) = dataset.date_bounds().unwrap_or_else(|| {
            let today = chrono::Local::now().date_naive();
            (today, today)
        });
        FilterSpec {
            date_range: DateRange { start, end },
            hour_range: HourRange::ALL_DAY,
            allowed_payment_labels: PaymentType::ALL.into_iter().collect(),
        }
    }

    pub fn matches(&self, trip: &CleanTrip) -> bool {
        self.date_range.contains(trip.pickup_time.date())
            && self.hour_range.contains(trip.pickup_hour)
            && self.allowed_payment_labels.contains(&trip.payment_type)
    }
}

/// Rows of a [`CleanedDataset`] that passed a [`FilterSpec`], borrowed in dataset order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    trips: Vec<&'a CleanTrip>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, &'a CleanTrip>> {
        self.trips.iter().copied()
    }
}

impl<'v, 'a> IntoIterator for &'v FilteredView<'a> {
    type Item = &'a CleanTrip;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a CleanTrip>>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter().copied()
    }
}

/// Applies `spec` to every cleaned trip. The dataset is left untouched.
#[tracing::instrument(skip_all, fields(
    start = %spec.date_range.start,
    end = %spec.date_range.end,
    hour_start = spec.hour_range.start,
    hour_end = spec.hour_range.end,
))]
pub fn filter<'a>(dataset: &'a CleanedDataset, spec: &FilterSpec) -> FilteredView<'a> {
    let trips: Vec<&CleanTrip> = dataset.trips.iter().filter(|t| spec.matches(t)).collect();
    debug!(kept = trips.len(), of = dataset.len(), "Filter applied");
    FilteredView { trips }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::clean;
    use crate::trips::{RawTrip, RawTripTable};
    use chrono::NaiveDateTime;

    fn ts(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn raw(d: u32, h: u32, payment: i64) -> RawTrip {
        RawTrip {
            pickup_time: Some(ts(d, h)),
            dropoff_time: Some(ts(d, h) + chrono::Duration::minutes(10)),
            pickup_location_id: Some(5),
            dropoff_location_id: Some(7),
            trip_distance: Some(2.0),
            fare_amount: Some(10.0),
            payment_type: Some(payment),
        }
    }

    fn dataset() -> CleanedDataset {
        clean(&RawTripTable::with_rows(vec![
            raw(1, 8, 1),
            raw(1, 23, 2),
            raw(2, 0, 1),
            raw(3, 12, 9),
            raw(5, 8, 4),
        ]))
        .unwrap()
    }

    fn spec(start: u32, end: u32, hours: (u32, u32), payments: &[PaymentType]) -> FilterSpec {
        FilterSpec {
            date_range: DateRange {
                start: date(start),
                end: date(end),
            },
            hour_range: HourRange {
                start: hours.0,
                end: hours.1,
            },
            allowed_payment_labels: payments.iter().copied().collect(),
        }
    }

    #[test]
    fn test_single_hour_range_keeps_matching_row() {
        let data = clean(&RawTripTable::with_rows(vec![raw(1, 8, 1)])).unwrap();

        let kept = filter(&data, &spec(1, 1, (8, 8), &PaymentType::ALL));
        assert_eq!(kept.len(), 1);

        let excluded = filter(&data, &spec(1, 1, (9, 23), &PaymentType::ALL));
        assert!(excluded.is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive_on_both_ends() {
        let data = dataset();

        let view = filter(&data, &spec(1, 3, (0, 23), &PaymentType::ALL));

        assert_eq!(view.len(), 4);
        assert!(view.iter().all(|t| t.pickup_time.date() <= date(3)));
    }

    #[test]
    fn test_covering_spec_keeps_everything() {
        let data = dataset();
        let view = filter(&data, &FilterSpec::covering(&data));
        assert_eq!(view.len(), data.len());
    }

    #[test]
    fn test_empty_payment_set_excludes_everything() {
        let data = dataset();
        let view = filter(&data, &spec(1, 31, (0, 23), &[]));
        assert!(view.is_empty());
    }

    #[test]
    fn test_unknown_payment_codes_filter_as_unknown_label() {
        let data = dataset();

        let view = filter(&data, &spec(1, 31, (0, 23), &[PaymentType::Unknown]));

        assert_eq!(view.len(), 1);
        assert_eq!(view.iter().next().unwrap().pickup_hour, 12);
    }

    #[test]
    fn test_inverted_ranges_match_nothing() {
        let data = dataset();
        assert!(filter(&data, &spec(1, 31, (22, 2), &PaymentType::ALL)).is_empty());
        assert!(filter(&data, &spec(5, 1, (0, 23), &PaymentType::ALL)).is_empty());
    }

    #[test]
    fn test_filter_result_is_subset_and_wider_spec_never_removes_rows() {
        let data = dataset();
        let narrow = spec(1, 2, (8, 23), &[PaymentType::CreditCard]);
        let wide = spec(1, 5, (0, 23), &[PaymentType::CreditCard, PaymentType::Cash]);

        let narrow_view = filter(&data, &narrow);
        let wide_view = filter(&data, &wide);

        assert!(narrow_view.len() <= wide_view.len());
        for t in &narrow_view {
            assert!(data.trips.contains(t));
            assert!(wide_view.iter().any(|w| std::ptr::eq(w, t)));
        }
    }

    #[test]
    fn test_filter_on_empty_dataset() {
        let data = CleanedDataset::default();
        let spec = FilterSpec::covering(&data);
        assert!(filter(&data, &spec).is_empty());
    }
}
