//! Reconstructed point cloud.

use nalgebra::Point3;

/// A set of scene points with optional per-point RGB colour.
///
/// When `colors` is present it has exactly one entry per point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    /// Point positions.
    pub points: Vec<Point3<f64>>,
    /// Per-point colour, if the source carried one.
    pub colors: Option<Vec<[u8; 3]>>,
}

impl PointCloud {
    /// Creates an empty, uncoloured cloud.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            points: Vec::new(),
            colors: None,
        }
    }

    /// Creates an uncoloured cloud from positions.
    #[must_use]
    pub const fn from_points(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            colors: None,
        }
    }

    /// Creates a coloured cloud.
    ///
    /// Returns `None` if the colour count does not match the point count.
    #[must_use]
    pub fn with_colors(points: Vec<Point3<f64>>, colors: Vec<[u8; 3]>) -> Option<Self> {
        (points.len() == colors.len()).then_some(Self {
            points,
            colors: Some(colors),
        })
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the cloud has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns true if per-point colours are present.
    #[must_use]
    pub const fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }

    /// Returns a copy with `f` applied to every point; colours are kept.
    #[must_use]
    pub fn map_points<F>(&self, f: F) -> Self
    where
        F: Fn(&Point3<f64>) -> Point3<f64>,
    {
        Self {
            points: self.points.iter().map(f).collect(),
            colors: self.colors.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn colour_count_must_match() {
        let points = vec![Point3::origin(), Point3::new(1.0, 1.0, 1.0)];
        assert!(PointCloud::with_colors(points.clone(), vec![[0, 0, 0]]).is_none());
        let cloud = PointCloud::with_colors(points, vec![[0, 0, 0], [255, 0, 0]]).unwrap();
        assert!(cloud.has_colors());
        assert_eq!(cloud.len(), 2);
    }

    #[test]
    fn bounds_of_points() {
        let cloud = PointCloud::from_points(vec![
            Point3::new(-1.0, 2.0, 0.5),
            Point3::new(3.0, -2.0, 0.0),
            Point3::new(0.0, 0.0, 4.0),
        ]);
        let (lo, hi) = cloud.bounds().unwrap();
        assert_eq!(lo, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(hi, Point3::new(3.0, 2.0, 4.0));
        assert!(PointCloud::new().bounds().is_none());
    }

    #[test]
    fn map_points_keeps_colours() {
        let cloud =
            PointCloud::with_colors(vec![Point3::new(1.0, 0.0, 0.0)], vec![[1, 2, 3]]).unwrap();
        let moved = cloud.map_points(|p| Point3::new(p.x, p.y + 1.0, p.z));
        assert_eq!(moved.points[0], Point3::new(1.0, 1.0, 0.0));
        assert_eq!(moved.colors, Some(vec![[1, 2, 3]]));
    }
}
