//! Ground window selection and point merging.

use hashbrown::HashSet;
use nalgebra::Point3;
use tracing::debug;

use crate::params::GroundParams;
use crate::window::DepthWindow;

/// Which windows were taken as ground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundSelection {
    /// Indices into the window list, in window order.
    pub windows: Vec<usize>,
    /// True if too few windows passed the variance threshold and the
    /// flattest-by-rank fallback was used instead.
    pub fallback: bool,
}

/// Pick the windows that look like flat ground.
///
/// Windows with variance strictly below `params.variance_threshold` qualify.
/// When fewer than `max(min_ground_windows, ceil(min_ground_fraction * total))`
/// qualify, the flattest `ceil(min_ground_fraction * total)` windows (at
/// least one) are used instead, ranked by variance.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn select_ground_windows(windows: &[DepthWindow], params: &GroundParams) -> GroundSelection {
    let total = windows.len();
    if total == 0 {
        return GroundSelection {
            windows: Vec::new(),
            fallback: false,
        };
    }

    let qualifying: Vec<usize> = windows
        .iter()
        .enumerate()
        .filter(|(_, w)| w.variance < params.variance_threshold)
        .map(|(i, _)| i)
        .collect();

    let fraction_count = (params.min_ground_fraction * total as f64).ceil() as usize;
    let required = params.min_ground_windows.max(fraction_count);

    if qualifying.len() >= required {
        return GroundSelection {
            windows: qualifying,
            fallback: false,
        };
    }

    let keep = fraction_count.clamp(1, total);
    let mut ranked: Vec<usize> = (0..total).collect();
    ranked.sort_by(|&a, &b| windows[a].variance.total_cmp(&windows[b].variance));
    ranked.truncate(keep);
    ranked.sort_unstable();

    debug!(
        qualifying = qualifying.len(),
        required,
        kept = ranked.len(),
        "Too few flat windows, using flattest by rank"
    );

    GroundSelection {
        windows: ranked,
        fallback: true,
    }
}

/// Merge the members of the selected windows into one point set.
///
/// Overlapping windows share members, and distinct frames often land on the
/// same spot while the operator stands still. Points whose coordinates agree
/// after rounding to `decimals` places are kept once, first occurrence wins.
#[must_use]
pub fn merge_ground_points(
    positions: &[Point3<f64>],
    windows: &[DepthWindow],
    selection: &GroundSelection,
    decimals: u32,
) -> Vec<Point3<f64>> {
    let scale = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    let mut seen: HashSet<[u64; 3]> = HashSet::new();
    let mut merged = Vec::new();

    for window in selection.windows.iter().filter_map(|&i| windows.get(i)) {
        for point in window.members.iter().filter_map(|&m| positions.get(m)) {
            if seen.insert(quantize(point, scale)) {
                merged.push(*point);
            }
        }
    }

    merged
}

/// Bit patterns of the rounded coordinates. Never saturates.
fn quantize(point: &Point3<f64>, scale: f64) -> [u64; 3] {
    // Adding 0.0 folds -0.0 onto 0.0.
    let key = |c: f64| ((c * scale).round() + 0.0).to_bits();
    [key(point.x), key(point.y), key(point.z)]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::window::depth_windows;

    fn window(start: usize, variance: f64) -> DepthWindow {
        DepthWindow {
            start,
            members: vec![start],
            variance,
        }
    }

    #[test]
    fn all_flat_windows_qualify() {
        let windows: Vec<_> = (0..40).map(|i| window(i, 0.001)).collect();
        let sel = select_ground_windows(&windows, &GroundParams::default());
        assert!(!sel.fallback);
        assert_eq!(sel.windows.len(), 40);
    }

    #[test]
    fn fallback_keeps_flattest_quarter() {
        // 20 windows, only 3 below threshold: need max(10, 5) = 10.
        let variances = [
            0.9, 0.01, 0.8, 0.7, 0.02, 0.6, 0.5, 0.4, 0.03, 0.3, 0.2, 0.1, 0.11, 0.12, 0.13, 0.14,
            0.15, 0.16, 0.17, 0.18,
        ];
        let windows: Vec<_> = variances
            .iter()
            .enumerate()
            .map(|(i, &v)| window(i, v))
            .collect();
        let sel = select_ground_windows(&windows, &GroundParams::default());
        assert!(sel.fallback);
        // ceil(0.25 * 20) = 5 flattest: 0.01, 0.02, 0.03, 0.1, 0.11
        assert_eq!(sel.windows, vec![1, 4, 8, 11, 12]);
    }

    #[test]
    fn single_window_falls_back_to_itself() {
        let windows = vec![window(0, 3.0)];
        let sel = select_ground_windows(&windows, &GroundParams::default());
        assert!(sel.fallback);
        assert_eq!(sel.windows, vec![0]);
    }

    #[test]
    fn no_windows_no_selection() {
        let sel = select_ground_windows(&[], &GroundParams::default());
        assert!(sel.windows.is_empty());
        assert!(!sel.fallback);
    }

    #[test]
    fn identical_positions_merge_to_one_point() {
        let positions = vec![Point3::new(0.25, 1.5, -3.0); 80];
        let windows = depth_windows(&positions, 30, 1);
        let sel = select_ground_windows(&windows, &GroundParams::default());
        let merged = merge_ground_points(&positions, &windows, &sel, 3);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn dedup_uses_rounding_precision() {
        let positions = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0004, 0.0, 0.0),
            Point3::new(1.002, 0.0, 0.0),
        ];
        let windows = depth_windows(&positions, 30, 1);
        let sel = GroundSelection {
            windows: vec![0],
            fallback: false,
        };
        assert_eq!(merge_ground_points(&positions, &windows, &sel, 3).len(), 2);
        assert_eq!(merge_ground_points(&positions, &windows, &sel, 4).len(), 3);
    }

    #[test]
    fn far_points_stay_distinct_at_high_precision() {
        let positions = vec![
            Point3::new(1e7, 0.0, 0.0),
            Point3::new(2e7, 0.0, 0.0),
            Point3::new(-3e7, 0.0, 0.0),
        ];
        let windows = depth_windows(&positions, 30, 1);
        let sel = GroundSelection {
            windows: vec![0],
            fallback: false,
        };
        assert_eq!(merge_ground_points(&positions, &windows, &sel, 12).len(), 3);
    }

    #[test]
    fn signed_zero_merges() {
        let positions = vec![Point3::new(-0.0, 0.0, -0.0001), Point3::new(0.0, 0.0, 0.0)];
        let windows = depth_windows(&positions, 30, 1);
        let sel = GroundSelection {
            windows: vec![0],
            fallback: false,
        };
        assert_eq!(merge_ground_points(&positions, &windows, &sel, 3).len(), 1);
    }

    #[test]
    fn overlapping_windows_do_not_duplicate() {
        #[allow(clippy::cast_precision_loss)]
        let positions: Vec<_> = (0..50).map(|i| Point3::new(0.0, 0.0, i as f64)).collect();
        let windows = depth_windows(&positions, 30, 1);
        let sel = select_ground_windows(&windows, &GroundParams::default());
        let merged = merge_ground_points(&positions, &windows, &sel, 3);
        assert_eq!(merged.len(), 50);
    }
}
