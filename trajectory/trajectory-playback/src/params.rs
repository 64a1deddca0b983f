//! Viewer configuration.

use serde::{Deserialize, Serialize};
use trajectory_align::GroundParams;

use crate::error::{ViewerError, ViewerResult};

/// Parameters for building a [`Viewer`](crate::Viewer).
///
/// # Example
///
/// ```
/// use trajectory_playback::ViewerParams;
///
/// let params = ViewerParams::default().display_rate_hz(30.0);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerParams {
    /// Ground detection settings.
    pub ground: GroundParams,

    /// Whether to level the scene onto the fitted ground.
    ///
    /// Default: true
    pub align_ground: bool,

    /// Rate at which the render loop calls `on_frame`.
    ///
    /// One trajectory frame advances per call, so playback speed is
    /// `display_rate_hz / fps` times real time.
    ///
    /// Default: 60.0
    pub display_rate_hz: f64,

    /// Relative difference between display rate and capture fps above which
    /// a replay-rate warning is logged.
    ///
    /// Default: 0.05
    pub rate_tolerance: f64,
}

impl Default for ViewerParams {
    fn default() -> Self {
        Self {
            ground: GroundParams::default(),
            align_ground: true,
            display_rate_hz: 60.0,
            rate_tolerance: 0.05,
        }
    }
}

impl ViewerParams {
    /// Set the ground detection settings.
    #[must_use]
    pub fn ground(mut self, ground: GroundParams) -> Self {
        self.ground = ground;
        self
    }

    /// Enable or disable ground levelling.
    #[must_use]
    pub const fn align_ground(mut self, align: bool) -> Self {
        self.align_ground = align;
        self
    }

    /// Set the render-loop rate.
    #[must_use]
    pub const fn display_rate_hz(mut self, rate: f64) -> Self {
        self.display_rate_hz = rate;
        self
    }

    /// Validate all parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidParams`] for a non-positive display rate
    /// or tolerance, and [`ViewerError::Align`] for invalid ground settings.
    pub fn validate(&self) -> ViewerResult<()> {
        if !self.display_rate_hz.is_finite() || self.display_rate_hz <= 0.0 {
            return Err(ViewerError::invalid_params(
                "display_rate_hz must be finite and positive",
            ));
        }
        if !self.rate_tolerance.is_finite() || self.rate_tolerance < 0.0 {
            return Err(ViewerError::invalid_params(
                "rate_tolerance must be finite and non-negative",
            ));
        }
        self.ground.validate()?;
        Ok(())
    }
}
