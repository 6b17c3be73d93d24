//! Target shape index: decode a reference silhouette image, extract its
//! outline contour, and build the reusable curve-segment database.
//!
//! Built exactly once at evaluator construction. Everything that can fail
//! fails here, so the matching loop never sees a configuration error.

use std::path::Path;

use image::GrayImage;
use log::{debug, info};

use super::curve_db::CurveSegmentDatabase;
use crate::schema::{ConfigError, Contour, CurveDbConfig, Point};

/// Luma threshold separating silhouette foreground from background.
const FOREGROUND_THRESHOLD: u8 = 127;

/// Errors raised while building a [`TargetShapeIndex`].
#[derive(Debug, thiserror::Error)]
pub enum StencilError {
    #[error("No stencil image path given")]
    EmptyPath,
    #[error("Failed to read stencil image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Stencil image yields no usable contour")]
    NoContour,
    #[error("Invalid curve database configuration: {0}")]
    Config(#[from] ConfigError),
}

/// The fixed reference silhouette: its outline contour and the curve-segment
/// database candidate nets are matched against. Immutable after construction.
#[derive(Debug, Clone)]
pub struct TargetShapeIndex {
    contour: Contour,
    db: CurveSegmentDatabase,
}

impl TargetShapeIndex {
    /// Build the index from a silhouette image on disk.
    pub fn from_path(path: &Path, config: &CurveDbConfig) -> Result<Self, StencilError> {
        if path.as_os_str().is_empty() {
            return Err(StencilError::EmptyPath);
        }
        let img = image::open(path)
            .map_err(|source| StencilError::Image {
                path: path.display().to_string(),
                source,
            })?
            .to_luma8();
        info!(
            "loaded stencil {} ({}x{})",
            path.display(),
            img.width(),
            img.height()
        );
        Self::from_image(&img, config)
    }

    /// Build the index from an already decoded grayscale image.
    pub fn from_image(img: &GrayImage, config: &CurveDbConfig) -> Result<Self, StencilError> {
        config.validate()?;
        let contour = extract_outline(img).ok_or(StencilError::NoContour)?;
        debug!("stencil outline has {} points", contour.len());
        Self::from_contour(contour, config)
    }

    /// Build the index directly from a contour (used when the silhouette is
    /// already available as geometry).
    pub fn from_contour(contour: Contour, config: &CurveDbConfig) -> Result<Self, StencilError> {
        config.validate()?;
        let db = CurveSegmentDatabase::build(&contour, config).ok_or(StencilError::NoContour)?;
        Ok(Self { contour, db })
    }

    /// The extracted outline contour.
    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    /// The target's curve-segment database.
    pub fn db(&self) -> &CurveSegmentDatabase {
        &self.db
    }
}

/// Trace foreground contours and keep the outline: the contour with the
/// most points, which for a silhouette is the outer boundary.
fn extract_outline(img: &GrayImage) -> Option<Contour> {
    let mut binary = img.clone();
    for p in binary.pixels_mut() {
        p.0[0] = if p.0[0] > FOREGROUND_THRESHOLD { 255 } else { 0 };
    }

    let contours: Vec<imageproc::contours::Contour<u32>> =
        imageproc::contours::find_contours(&binary);

    contours
        .into_iter()
        .max_by_key(|c| c.points.len())
        .filter(|c| c.points.len() >= 3)
        .map(|c| {
            Contour::new(
                c.points
                    .into_iter()
                    .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                    .collect(),
            )
        })
}
