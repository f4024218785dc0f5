//! Numeric kernel for score statistics.
//!
//! Implements the exact rounding, median, and quartile rules the
//! rendering layer was built against. The quartile method is a
//! nearest-rank lookup with an averaging tie-break when the count is a
//! multiple of four; it is intentionally not a standard interpolated
//! percentile, and output compatibility depends on keeping it as is.

use crate::models::CourseSummary;
use std::cmp::Ordering;

/// Display floor applied to the box-plot minimum.
pub const MIN_DISPLAY_FLOOR: f64 = 50.0;

/// Box-plot placeholder reported for a course with no scores.
pub const EMPTY_COURSE_SUMMARY: [f64; 5] = [60.0, 68.0, 75.0, 82.0, 90.0];

/// Average reported for a major with no scores.
pub const DEFAULT_MAJOR_AVERAGE: f64 = 70.0;

/// Round to 1 decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

fn sorted_ascending(scores: &[f64]) -> Vec<f64> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Median of a non-empty ascending slice: the middle element for odd
/// counts, the average of the two middle elements for even counts.
fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Nearest-rank quartile of a non-empty ascending slice.
///
/// `pos` is the precomputed rank (`n / 4` for Q1, `3 * n / 4` for Q3).
/// When `n` is a multiple of four the rank falls exactly on a boundary
/// and the two straddling values are averaged.
fn quartile_sorted(sorted: &[f64], pos: usize) -> f64 {
    if sorted.len() % 4 != 0 {
        sorted[pos]
    } else {
        (sorted[pos - 1] + sorted[pos]) / 2.0
    }
}

/// Five-number summary `[min, q1, median, q3, max]` of a score slice.
///
/// The minimum is floored at [`MIN_DISPLAY_FLOOR`] for display; the
/// maximum is the true maximum. An empty slice yields
/// [`EMPTY_COURSE_SUMMARY`].
pub fn five_number_summary(scores: &[f64]) -> [f64; 5] {
    if scores.is_empty() {
        return EMPTY_COURSE_SUMMARY;
    }

    let sorted = sorted_ascending(scores);
    let n = sorted.len();

    let min = sorted[0].max(MIN_DISPLAY_FLOOR);
    let max = sorted[n - 1];
    let median = median_sorted(&sorted);
    let q1 = quartile_sorted(&sorted, n / 4);
    let q3 = quartile_sorted(&sorted, 3 * n / 4);

    [min, q1, median, q3, max]
}

/// Average (1 decimal) and five-number summary for one course's scores.
pub fn course_summary(scores: &[f64]) -> CourseSummary {
    CourseSummary {
        average: round1(mean(scores)),
        summary: five_number_summary(scores),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round1() {
        assert_eq!(round1(72.25), 72.3);
        assert_eq!(round1(72.24), 72.2);
        assert_eq!(round1(0.0), 0.0);
        assert_eq!(round1(69.999), 70.0);
    }

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[50.0, 60.0, 70.0, 80.0]), 65.0);
    }

    #[test]
    fn test_empty_course_gets_placeholder() {
        let summary = course_summary(&[]);
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.summary, [60.0, 68.0, 75.0, 82.0, 90.0]);
    }

    #[test]
    fn test_single_score_collapses() {
        let summary = course_summary(&[70.0]);
        assert_eq!(summary.average, 70.0);
        assert_eq!(summary.summary, [70.0, 70.0, 70.0, 70.0, 70.0]);
    }

    #[test]
    fn test_multiple_of_four_averages_ranks() {
        // n = 4: q1 = avg(50, 60), median = avg(60, 70), q3 = avg(70, 80).
        let summary = course_summary(&[50.0, 60.0, 70.0, 80.0]);
        assert_eq!(summary.average, 65.0);
        assert_eq!(summary.summary, [50.0, 55.0, 65.0, 75.0, 80.0]);
    }

    #[test]
    fn test_odd_count_direct_ranks() {
        // n = 5: q1 = sorted[1], median = sorted[2], q3 = sorted[3].
        let summary = five_number_summary(&[55.0, 65.0, 75.0, 85.0, 95.0]);
        assert_eq!(summary, [55.0, 65.0, 75.0, 85.0, 95.0]);
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        let summary = five_number_summary(&[80.0, 50.0, 70.0, 60.0]);
        assert_eq!(summary, [50.0, 55.0, 65.0, 75.0, 80.0]);
    }

    #[test]
    fn test_min_is_floored_at_50() {
        let summary = five_number_summary(&[30.0, 60.0, 70.0, 80.0, 90.0]);
        assert_eq!(summary[0], 50.0);
        // The true maximum is never clamped.
        assert_eq!(summary[4], 90.0);
    }

    #[test]
    fn test_min_floor_always_holds() {
        for scores in [
            vec![10.0],
            vec![49.9, 50.1],
            vec![0.0, 100.0, 55.0],
            vec![95.0, 92.0, 99.0, 90.0],
        ] {
            let summary = five_number_summary(&scores);
            assert!(summary[0] >= 50.0, "min {} below floor", summary[0]);
        }
    }

    #[test]
    fn test_even_but_not_multiple_of_four() {
        // n = 6: median = avg(sorted[2], sorted[3]), quartiles direct
        // at positions 1 and 4.
        let summary = five_number_summary(&[60.0, 62.0, 64.0, 66.0, 68.0, 70.0]);
        assert_eq!(summary, [60.0, 62.0, 65.0, 68.0, 70.0]);
    }
}
