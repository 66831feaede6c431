use crate::aggregators::types::{DistanceHistogram, HistogramBin};
use crate::trips::CleanTrip;

pub const HISTOGRAM_BINS: usize = 50;

/// Distance window (miles) the chart shows. Binning ignores it.
pub const DISPLAY_DOMAIN: (f64, f64) = (0.0, 20.0);

/// Bins trip distances into [`HISTOGRAM_BINS`] linear bins over the observed range.
///
/// Bin edges span the full `[min, max]` of the data, so trips beyond the
/// display domain are still counted. When every distance is identical the
/// range is widened by half a mile each side, never below zero.
pub fn distance_histogram<'a>(trips: impl IntoIterator<Item = &'a CleanTrip>) -> DistanceHistogram {
    let distances: Vec<f64> = trips.into_iter().map(|t| t.trip_distance).collect();
    DistanceHistogram {
        bins: linear_bins(&distances, HISTOGRAM_BINS),
        display_domain: DISPLAY_DOMAIN,
    }
}

fn linear_bins(values: &[f64], bin_count: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo == hi {
        lo = (lo - 0.5).max(0.0);
        hi += 0.5;
    }
    let edges = BinEdges {
        lo,
        hi,
        width: (hi - lo) / bin_count as f64,
        count: bin_count,
    };

    let mut counts = vec![0usize; bin_count];
    for &v in values {
        counts[edges.index_of(v)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: edges.edge(i),
            upper: edges.edge(i + 1),
            count,
        })
        .collect()
}

/// Linear bin edges. Both the reported edges and bin membership go through `edge`.
struct BinEdges {
    lo: f64,
    hi: f64,
    width: f64,
    count: usize,
}

impl BinEdges {
    fn edge(&self, i: usize) -> f64 {
        if i >= self.count { self.hi } else { self.lo + self.width * i as f64 }
    }

    /// Bin holding `v`: `edge(i) <= v < edge(i + 1)`, with the last bin closed on the right.
    fn index_of(&self, v: f64) -> usize {
        let last = self.count - 1;
        let mut idx = (((v - self.lo) / self.width).floor().max(0.0) as usize).min(last);
        // floor() can be off by one at an edge; settle on the edges themselves
        while idx > 0 && v < self.edge(idx) {
            idx -= 1;
        }
        while idx < last && v >= self.edge(idx + 1) {
            idx += 1;
        }
        idx
    }
}

impl DistanceHistogram {
    /// Bins that overlap the display domain. Counts are not adjusted.
    pub fn visible_bins(&self) -> impl Iterator<Item = &HistogramBin> {
        let (lo, hi) = self.display_domain;
        self.bins.iter().filter(move |b| b.upper > lo && b.lower < hi)
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregators::fixtures::trip;

    fn with_distances(distances: &[f64]) -> Vec<CleanTrip> {
        distances
            .iter()
            .map(|&d| trip(1, 8, 5, 10.0, d, 1))
            .collect()
    }

    #[test]
    fn test_fixed_bin_count_and_edges_span_data() {
        let trips = with_distances(&[1.0, 2.0, 51.0]);

        let hist = distance_histogram(&trips);

        assert_eq!(hist.bins.len(), HISTOGRAM_BINS);
        assert_eq!(hist.bins[0].lower, 1.0);
        assert_eq!(hist.bins[HISTOGRAM_BINS - 1].upper, 51.0);
        assert_eq!(hist.bins[0].count, 1);
        assert_eq!(hist.bins[1].count, 1);
        assert_eq!(hist.bins[HISTOGRAM_BINS - 1].count, 1);
    }

    #[test]
    fn test_out_of_domain_values_still_counted() {
        let trips = with_distances(&[0.5, 3.0, 45.0, 120.0]);

        let hist = distance_histogram(&trips);

        assert_eq!(hist.total(), 4);
        assert_eq!(hist.display_domain, (0.0, 20.0));
        let visible: usize = hist.visible_bins().map(|b| b.count).sum();
        assert_eq!(visible, 2);
    }

    #[test]
    fn test_single_distinct_value() {
        let trips = with_distances(&[4.0, 4.0, 4.0]);

        let hist = distance_histogram(&trips);

        assert_eq!(hist.bins.len(), HISTOGRAM_BINS);
        assert_eq!(hist.total(), 3);
        let bin = hist.bins.iter().find(|b| b.count == 3).unwrap();
        assert!(bin.lower - 1e-9 <= 4.0 && 4.0 <= bin.upper + 1e-9);
    }

    #[test]
    fn test_single_small_value_never_gets_negative_edge() {
        let trips = with_distances(&[0.3, 0.3]);

        let hist = distance_histogram(&trips);

        assert_eq!(hist.bins[0].lower, 0.0);
        assert!(hist.bins.iter().all(|b| b.lower >= 0.0));
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn test_values_on_edges_fall_inside_reported_bin() {
        let values: Vec<f64> = (0..=100).map(|i| i as f64 * 0.1).collect();

        let bins = linear_bins(&values, HISTOGRAM_BINS);

        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        let mut expected = vec![0usize; HISTOGRAM_BINS];
        for &v in &values {
            let i = bins
                .iter()
                .position(|b| b.lower <= v && v < b.upper)
                .unwrap_or(HISTOGRAM_BINS - 1);
            expected[i] += 1;
        }
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_empty_input() {
        let trips: Vec<CleanTrip> = vec![];
        let hist = distance_histogram(&trips);
        assert!(hist.bins.is_empty());
        assert_eq!(hist.total(), 0);
    }
}
