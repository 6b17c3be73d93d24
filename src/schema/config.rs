//! Configuration types for curve-segment databases and net rasterization.

use serde::{Deserialize, Serialize};

/// Parameters controlling curve-segment database construction.
///
/// Both the target stencil and every candidate net boundary are indexed with
/// the same configuration, so segment spans of equal length are directly
/// comparable between the two databases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveDbConfig {
    /// Number of points the contour is resampled to (uniform arc length).
    pub resample_size: usize,
    /// Shortest segment span enumerated, in resampled points.
    pub min_segment_len: usize,
    /// Longest segment span enumerated, in resampled points.
    pub max_segment_len: usize,
    /// Step between consecutive segment start offsets.
    pub offset_step: usize,
}

impl Default for CurveDbConfig {
    fn default() -> Self {
        Self {
            resample_size: 100,
            min_segment_len: 70,
            max_segment_len: 99,
            offset_step: 2,
        }
    }
}

impl CurveDbConfig {
    /// Validate parameter consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resample_size < 4 {
            return Err(ConfigError::ResampleTooSmall(self.resample_size));
        }
        if self.min_segment_len < 2 {
            return Err(ConfigError::SegmentTooShort(self.min_segment_len));
        }
        if self.min_segment_len > self.max_segment_len {
            return Err(ConfigError::SegmentBoundsInverted {
                min: self.min_segment_len,
                max: self.max_segment_len,
            });
        }
        if self.max_segment_len >= self.resample_size {
            return Err(ConfigError::SegmentExceedsContour {
                max: self.max_segment_len,
                resample: self.resample_size,
            });
        }
        if self.offset_step == 0 {
            return Err(ConfigError::ZeroOffsetStep);
        }
        Ok(())
    }
}

/// Raster parameters handed to the external pixel overlap checker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnfoldConfig {
    /// Raster resolution (pixels along the longer net axis).
    pub raster_size: usize,
    /// Extra margin around the net bounding box, as a fraction of its size.
    pub raster_margin: f64,
}

impl Default for UnfoldConfig {
    fn default() -> Self {
        Self {
            raster_size: 1024,
            raster_margin: 0.05,
        }
    }
}

/// Curve database configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Resample size {0} is too small (need at least 4 points)")]
    ResampleTooSmall(usize),
    #[error("Minimum segment length {0} is too short (need at least 2 points)")]
    SegmentTooShort(usize),
    #[error("Minimum segment length {min} exceeds maximum {max}")]
    SegmentBoundsInverted { min: usize, max: usize },
    #[error("Maximum segment length {max} must be below resample size {resample}")]
    SegmentExceedsContour { max: usize, resample: usize },
    #[error("Offset step must be non-zero")]
    ZeroOffsetStep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(CurveDbConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let config = CurveDbConfig {
            min_segment_len: 50,
            max_segment_len: 10,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SegmentBoundsInverted { .. })
        ));
    }

    #[test]
    fn segment_must_fit_in_resampled_contour() {
        let config = CurveDbConfig {
            resample_size: 50,
            min_segment_len: 10,
            max_segment_len: 50,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SegmentExceedsContour { .. })
        ));
    }

    #[test]
    fn zero_offset_step_rejected() {
        let config = CurveDbConfig {
            offset_step: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroOffsetStep)));
    }
}
