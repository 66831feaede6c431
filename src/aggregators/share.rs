use std::collections::BTreeMap;

use crate::aggregators::types::PaymentShare;
use crate::aggregators::utility::fraction;
use crate::trips::{CleanTrip, PaymentType};

/// Trip count and share per payment label.
///
/// Only labels present in the input appear. Ordered by count descending,
/// then by enumeration order.
pub fn payment_share<'a>(trips: impl IntoIterator<Item = &'a CleanTrip>) -> Vec<PaymentShare> {
    let mut counts: BTreeMap<PaymentType, usize> = BTreeMap::new();
    let mut total = 0;
    for trip in trips {
        *counts.entry(trip.payment_type).or_default() += 1;
        total += 1;
    }

    let mut shares: Vec<PaymentShare> = counts
        .into_iter()
        .map(|(payment_type, trips)| PaymentShare {
            payment_type,
            trips,
            share: fraction(trips, total),
        })
        .collect();
    // stable sort keeps enumeration order within equal counts
    shares.sort_by(|a, b| b.trips.cmp(&a.trips));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregators::fixtures::trip;

    #[test]
    fn test_counts_present_labels() {
        let trips = vec![
            trip(1, 8, 5, 10.0, 2.0, 1),
            trip(1, 9, 5, 10.0, 2.0, 1),
            trip(1, 10, 5, 10.0, 2.0, 2),
        ];

        let shares = payment_share(&trips);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].payment_type.label(), "Credit Card");
        assert_eq!(shares[0].trips, 2);
        assert_eq!(shares[1].payment_type.label(), "Cash");
        assert_eq!(shares[1].trips, 1);
        assert_eq!(shares.iter().map(|s| s.trips).sum::<usize>(), 3);
        assert!((shares.iter().map(|s| s.share).sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unmapped_codes_are_grouped_as_unknown() {
        let trips = vec![trip(1, 8, 5, 10.0, 2.0, 5), trip(1, 8, 5, 10.0, 2.0, 77)];

        let shares = payment_share(&trips);

        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].payment_type, PaymentType::Unknown);
        assert_eq!(shares[0].share, 1.0);
    }

    #[test]
    fn test_empty_input() {
        let trips: Vec<CleanTrip> = vec![];
        assert!(payment_share(&trips).is_empty());
    }
}
