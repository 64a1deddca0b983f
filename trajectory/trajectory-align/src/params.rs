//! Parameters for ground-plane detection.

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, AlignResult};

/// Plane fitting strategy for the merged ground points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PlaneFitMethod {
    /// Exhaustive search over unit normals on a polar/azimuth grid.
    ///
    /// The polar angle is measured from +Y and sampled over `[0, π]`; the
    /// azimuth over `[0, 2π)`. Both use a step of `π / steps`.
    AngularGrid {
        /// Number of divisions of π.
        steps: u32,
    },
    /// Closed-form fit: eigenvector of the smallest covariance eigenvalue.
    Eigen,
}

impl Default for PlaneFitMethod {
    fn default() -> Self {
        Self::AngularGrid { steps: 20 }
    }
}

/// Parameters for ground-plane detection.
///
/// The defaults assume the roughly consistent scene scale produced by a
/// COLMAP sparse reconstruction of a walking video. They are scale-dependent;
/// rescaled reconstructions should scale `variance_threshold` accordingly.
///
/// Missing fields in a deserialised config fall back to their defaults.
///
/// # Example
///
/// ```
/// use trajectory_align::{GroundParams, PlaneFitMethod};
///
/// let params = GroundParams::default();
/// assert_eq!(params.window_size, 30);
/// assert!((params.variance_threshold - 0.05).abs() < 1e-12);
///
/// let coarse = GroundParams::default()
///     .window_size(10)
///     .variance_threshold(0.2)
///     .fit(PlaneFitMethod::Eigen);
/// assert!(coarse.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundParams {
    /// Samples per depth-ordered window.
    pub window_size: usize,

    /// Step between consecutive window starts.
    pub window_stride: usize,

    /// Windows with vertical variance strictly below this count as ground.
    pub variance_threshold: f64,

    /// Absolute minimum number of qualifying windows before falling back.
    pub min_ground_windows: usize,

    /// Fraction of all windows that must qualify, and the fraction kept by
    /// the rank-based fallback.
    pub min_ground_fraction: f64,

    /// Decimal places used when de-duplicating merged ground points.
    pub dedup_decimals: u32,

    /// Plane fitting strategy.
    pub fit: PlaneFitMethod,
}

impl Default for GroundParams {
    fn default() -> Self {
        Self {
            window_size: 30,
            window_stride: 1,
            variance_threshold: 0.05,
            min_ground_windows: 10,
            min_ground_fraction: 0.25,
            dedup_decimals: 3,
            fit: PlaneFitMethod::default(),
        }
    }
}

impl GroundParams {
    /// Set the window size.
    #[must_use]
    pub const fn window_size(mut self, size: usize) -> Self {
        self.window_size = size;
        self
    }

    /// Set the window stride.
    #[must_use]
    pub const fn window_stride(mut self, stride: usize) -> Self {
        self.window_stride = stride;
        self
    }

    /// Set the variance threshold.
    #[must_use]
    pub const fn variance_threshold(mut self, threshold: f64) -> Self {
        self.variance_threshold = threshold;
        self
    }

    /// Set the absolute minimum ground window count.
    #[must_use]
    pub const fn min_ground_windows(mut self, count: usize) -> Self {
        self.min_ground_windows = count;
        self
    }

    /// Set the minimum ground fraction.
    #[must_use]
    pub const fn min_ground_fraction(mut self, fraction: f64) -> Self {
        self.min_ground_fraction = fraction;
        self
    }

    /// Set the fitting strategy.
    #[must_use]
    pub const fn fit(mut self, method: PlaneFitMethod) -> Self {
        self.fit = method;
        self
    }

    /// Check that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::InvalidParams`] naming the first bad field.
    pub fn validate(&self) -> AlignResult<()> {
        if self.window_size == 0 {
            return Err(AlignError::invalid_params("window_size must be > 0"));
        }
        if self.window_stride == 0 {
            return Err(AlignError::invalid_params("window_stride must be > 0"));
        }
        if !self.variance_threshold.is_finite() || self.variance_threshold < 0.0 {
            return Err(AlignError::invalid_params(format!(
                "variance_threshold must be finite and >= 0, got {}",
                self.variance_threshold
            )));
        }
        if !(self.min_ground_fraction > 0.0 && self.min_ground_fraction <= 1.0) {
            return Err(AlignError::invalid_params(format!(
                "min_ground_fraction must be in (0, 1], got {}",
                self.min_ground_fraction
            )));
        }
        if self.dedup_decimals > 12 {
            return Err(AlignError::invalid_params("dedup_decimals must be <= 12"));
        }
        if let PlaneFitMethod::AngularGrid { steps: 0 } = self.fit {
            return Err(AlignError::invalid_params("angular grid needs at least 1 step"));
        }
        Ok(())
    }
}
