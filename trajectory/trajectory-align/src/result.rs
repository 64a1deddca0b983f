//! Result types for ground alignment.

use std::fmt;

use nalgebra::Point3;

use crate::transform::GroundAlignment;

/// Diagnostics describing how the ground was found.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundReport {
    /// Number of depth-ordered windows examined.
    pub window_count: usize,
    /// Number of windows used as ground.
    pub ground_window_count: usize,
    /// Whether the flattest-by-rank fallback replaced the threshold test.
    pub used_fallback: bool,
    /// Unique ground points after de-duplication.
    pub ground_points: usize,
    /// Centroid of the ground points in the source frame.
    pub centroid: Point3<f64>,
    /// Mean squared distance of the ground points to the fitted plane.
    pub residual: f64,
}

impl GroundReport {
    /// Fraction of windows that were used as ground.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ground_fraction(&self) -> f64 {
        if self.window_count == 0 {
            return 0.0;
        }
        self.ground_window_count as f64 / self.window_count as f64
    }
}

impl fmt::Display for GroundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ground windows{}, {} unique points, residual {:.6}",
            self.ground_window_count,
            self.window_count,
            if self.used_fallback { " (fallback)" } else { "" },
            self.ground_points,
            self.residual,
        )
    }
}

/// A fitted ground alignment with its diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundFit {
    /// The transform to apply to every scene layer.
    pub alignment: GroundAlignment,
    /// How the fit was obtained.
    pub report: GroundReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(used_fallback: bool) -> GroundReport {
        GroundReport {
            window_count: 8,
            ground_window_count: 2,
            used_fallback,
            ground_points: 40,
            centroid: Point3::origin(),
            residual: 0.25,
        }
    }

    #[test]
    fn ground_fraction() {
        assert!((report(false).ground_fraction() - 0.25).abs() < f64::EPSILON);
        let empty = GroundReport {
            window_count: 0,
            ..report(false)
        };
        assert!(empty.ground_fraction().abs() < f64::EPSILON);
    }

    #[test]
    fn display_mentions_fallback() {
        assert!(report(true).to_string().contains("fallback"));
        assert!(!report(false).to_string().contains("fallback"));
        assert!(report(false).to_string().contains("2/8"));
    }
}
