//! Frame coverage of a set of sparse models.
//!
//! When the mapper splits a capture, each model covers a range of frame
//! numbers. Sorting the ranges exposes frames no model registered (gaps) and
//! frames claimed by more than one model (overlaps).

use std::fmt;
use std::path::Path;

use tracing::warn;

use super::models::find_models;
use super::reader::{read_images, read_points3d};
use crate::error::IoResult;

/// Frame numbers covered by one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCoverage {
    /// Model directory name.
    pub name: String,
    /// Registered images.
    pub image_count: usize,
    /// Reconstructed points (zero when `points3D.bin` is absent).
    pub point_count: usize,
    /// Lowest frame number among the image names.
    pub first_frame: u64,
    /// Highest frame number among the image names.
    pub last_frame: u64,
}

/// A problem between two consecutive models in frame order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageIssue {
    /// Frames `from..=to` belong to no model.
    Gap {
        /// First missing frame.
        from: u64,
        /// Last missing frame.
        to: u64,
    },
    /// Frames `from..=to` belong to both neighbouring models.
    Overlap {
        /// First shared frame.
        from: u64,
        /// Last shared frame.
        to: u64,
    },
}

impl fmt::Display for CoverageIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Gap { from, to } => {
                write!(f, "gap: frames {from} to {to} ({} missing)", to - from + 1)
            }
            Self::Overlap { from, to } => write!(f, "overlap: frames {from} to {to}"),
        }
    }
}

/// Coverage of all models, sorted by first frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Per-model coverage in frame order.
    pub models: Vec<ModelCoverage>,
    /// `(index into models, issue with the previous model)`.
    pub issues: Vec<(usize, CoverageIssue)>,
}

impl CoverageReport {
    /// Sort models by first frame and compare neighbours.
    #[must_use]
    pub fn from_models(mut models: Vec<ModelCoverage>) -> Self {
        models.sort_by_key(|m| m.first_frame);

        let issues = models
            .windows(2)
            .enumerate()
            .filter_map(|(i, pair)| {
                let (prev_last, first) = (pair[0].last_frame, pair[1].first_frame);
                let issue = if first > prev_last.saturating_add(1) {
                    CoverageIssue::Gap {
                        from: prev_last + 1,
                        to: first - 1,
                    }
                } else if first <= prev_last {
                    CoverageIssue::Overlap {
                        from: first,
                        to: prev_last,
                    }
                } else {
                    return None;
                };
                Some((i + 1, issue))
            })
            .collect();

        Self { models, issues }
    }

    /// Total registered images over all models.
    #[must_use]
    pub fn total_images(&self) -> usize {
        self.models.iter().map(|m| m.image_count).sum()
    }
}

/// Frame number of an image named like `frame_000123.jpg`.
///
/// The number is the text after the last `_` of the file stem.
#[must_use]
pub fn frame_number(name: &str) -> Option<u64> {
    let stem = Path::new(name).file_stem()?.to_str()?;
    stem.rsplit('_').next()?.parse().ok()
}

/// Analyse every model under `sparse_dir`.
///
/// Models with no parseable frame numbers are left out of the report with a
/// warning.
///
/// # Errors
///
/// Same as [`find_models`](super::find_models), plus read errors of the
/// model files.
pub fn analyze_coverage<P: AsRef<Path>>(sparse_dir: P) -> IoResult<CoverageReport> {
    let mut coverage = Vec::new();

    for model in find_models(sparse_dir)? {
        let images = read_images(model.images_path())?;
        let points_path = model.points_path();
        let point_count = if points_path.is_file() {
            read_points3d(&points_path)?.len()
        } else {
            0
        };

        let frames = images.iter().filter_map(|im| frame_number(&im.name));
        let Some((first_frame, last_frame)) =
            frames.fold(None, |range: Option<(u64, u64)>, n| {
                Some(range.map_or((n, n), |(lo, hi)| (lo.min(n), hi.max(n))))
            })
        else {
            warn!(model = %model.path.display(), "No frame numbers in image names");
            continue;
        };

        coverage.push(ModelCoverage {
            name: model.name(),
            image_count: images.len(),
            point_count,
            first_frame,
            last_frame,
        });
    }

    Ok(CoverageReport::from_models(coverage))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::colmap::models::{IMAGES_FILE, POINTS_FILE};
    use crate::colmap::reader::{fixtures, ColmapPoint};
    use nalgebra::Point3;

    fn coverage(name: &str, first_frame: u64, last_frame: u64) -> ModelCoverage {
        ModelCoverage {
            name: name.to_string(),
            image_count: 1,
            point_count: 0,
            first_frame,
            last_frame,
        }
    }

    #[test]
    fn parses_frame_numbers() {
        assert_eq!(frame_number("frame_000123.jpg"), Some(123));
        assert_eq!(frame_number("clip_6_frame_000007.png"), Some(7));
        assert_eq!(frame_number("frame_abc.jpg"), None);
        assert_eq!(frame_number("42.jpg"), Some(42));
    }

    #[test]
    fn detects_gaps_and_overlaps() {
        let report = CoverageReport::from_models(vec![
            coverage("2", 200, 260),
            coverage("0", 0, 99),
            coverage("1", 100, 180),
            coverage("3", 250, 300),
        ]);

        let order: Vec<_> = report.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(order, ["0", "1", "2", "3"]);
        assert_eq!(
            report.issues,
            vec![
                (2, CoverageIssue::Gap { from: 181, to: 199 }),
                (3, CoverageIssue::Overlap { from: 250, to: 260 }),
            ]
        );
        assert!(report.issues[0].1.to_string().contains("19 missing"));
    }

    #[test]
    fn analyzes_workspace() {
        let dir = tempfile::tempdir().unwrap();
        for (model, frames) in [("0", 0..10u32), ("1", 15..20u32)] {
            let path = dir.path().join(model);
            std::fs::create_dir_all(&path).unwrap();
            let images: Vec<_> = frames
                .map(|f| fixtures::image(f, &format!("frame_{f:06}.jpg"), [1.0, 0.0, 0.0, 0.0], [0.0; 3]))
                .collect();
            std::fs::write(path.join(IMAGES_FILE), fixtures::images(&images)).unwrap();
        }
        let point = ColmapPoint {
            id: 1,
            position: Point3::origin(),
            rgb: [1, 2, 3],
            error: 0.0,
            track_length: 0,
        };
        std::fs::write(
            dir.path().join("0").join(POINTS_FILE),
            fixtures::points(&[point.clone(), point]),
        )
        .unwrap();

        let report = analyze_coverage(dir.path()).unwrap();
        assert_eq!(report.total_images(), 15);
        assert_eq!(report.models[0].point_count, 2);
        assert_eq!(report.models[1].point_count, 0);
        assert_eq!((report.models[1].first_frame, report.models[1].last_frame), (15, 19));
        assert_eq!(report.issues, vec![(1, CoverageIssue::Gap { from: 10, to: 14 })]);
    }
}
