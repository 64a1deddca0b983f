//! Depth-ordered sliding windows.

use nalgebra::Point3;
use trajectory_types::{DEPTH_AXIS, VERTICAL_AXIS};

/// A window of positions that are contiguous along the depth axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthWindow {
    /// Offset of the window in depth order.
    pub start: usize,
    /// Indices into the original position slice.
    pub members: Vec<usize>,
    /// Population variance of the members' vertical coordinate.
    pub variance: f64,
}

impl DepthWindow {
    /// Number of positions in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the window has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Split positions into overlapping windows ordered by depth (Z).
///
/// Ordering by depth instead of capture time groups spatially contiguous
/// stretches together even when the walk doubles back over them.
///
/// With fewer than `size` positions the whole set forms one window. Otherwise
/// windows start every `stride` samples; if the last regular window stops
/// short of the deepest sample, one more window is anchored at the end.
/// `size` and `stride` of zero are treated as one.
#[must_use]
pub fn depth_windows(positions: &[Point3<f64>], size: usize, stride: usize) -> Vec<DepthWindow> {
    if positions.is_empty() {
        return Vec::new();
    }
    let size = size.max(1);
    let stride = stride.max(1);

    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|&a, &b| positions[a][DEPTH_AXIS].total_cmp(&positions[b][DEPTH_AXIS]));

    if order.len() <= size {
        return vec![make_window(positions, 0, order)];
    }

    let last_start = order.len() - size;
    let mut starts: Vec<usize> = (0..=last_start).step_by(stride).collect();
    if starts.last() != Some(&last_start) {
        starts.push(last_start);
    }

    starts
        .into_iter()
        .map(|start| make_window(positions, start, order[start..start + size].to_vec()))
        .collect()
}

fn make_window(positions: &[Point3<f64>], start: usize, members: Vec<usize>) -> DepthWindow {
    let variance = vertical_variance(members.iter().map(|&i| positions[i][VERTICAL_AXIS]));
    DepthWindow {
        start,
        members,
        variance,
    }
}

/// Population variance of a sequence of values; zero for an empty sequence.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn vertical_variance<I>(values: I) -> f64
where
    I: Iterator<Item = f64> + Clone,
{
    let count = values.clone().count();
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    let mean = values.clone().sum::<f64>() / n;
    values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[allow(clippy::cast_precision_loss)]
    fn walk(n: usize) -> Vec<Point3<f64>> {
        (0..n).map(|i| Point3::new(0.0, 1.0, i as f64)).collect()
    }

    #[test]
    fn short_trajectory_is_one_window() {
        let windows = depth_windows(&walk(12), 30, 1);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].len(), 12);
        assert_eq!(windows[0].variance, 0.0);
    }

    #[test]
    fn sliding_window_count() {
        let windows = depth_windows(&walk(100), 30, 1);
        assert_eq!(windows.len(), 71);
        assert!(windows.iter().all(|w| w.len() == 30));
    }

    #[test]
    fn strided_windows_cover_the_tail() {
        let windows = depth_windows(&walk(100), 30, 20);
        let starts: Vec<usize> = windows.iter().map(|w| w.start).collect();
        assert_eq!(starts, vec![0, 20, 40, 60, 70]);
    }

    #[test]
    fn windows_follow_depth_not_time() {
        // Capture order alternates between the near and far ends of the walk.
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 5.0, 10.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 5.0, 11.0),
        ];
        let windows = depth_windows(&positions, 2, 2);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].members, vec![0, 2]);
        assert_eq!(windows[1].members, vec![1, 3]);
        assert_eq!(windows[0].variance, 0.0);
        assert_eq!(windows[1].variance, 0.0);
    }

    #[test]
    fn variance_is_population_variance() {
        let v = vertical_variance([1.0, 2.0, 3.0, 4.0].into_iter());
        assert_relative_eq!(v, 1.25);
        assert_eq!(vertical_variance(std::iter::empty()), 0.0);
    }

    #[test]
    fn empty_input_has_no_windows() {
        assert!(depth_windows(&[], 30, 1).is_empty());
    }
}
