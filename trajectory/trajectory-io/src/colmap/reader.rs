//! Readers for COLMAP sparse-model binaries.
//!
//! All three files start with a `u64` record count followed by packed
//! little-endian records. Per-image 2D observations and per-point tracks are
//! skipped; the viewer only needs poses, names and coloured points.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};

use super::binary::{capacity_hint, BinaryReader};
use crate::error::{IoError, IoResult};

/// Bytes per 2D observation in `images.bin`: `f64 x`, `f64 y`, `i64 point3D_id`.
const POINT2D_BYTES: u64 = 24;

/// Bytes per track element in `points3D.bin`: `i32 image_id`, `i32 point2D_idx`.
const TRACK_ELEMENT_BYTES: u64 = 8;

/// COLMAP camera models, keyed by their on-disk id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraModel {
    /// `f, cx, cy`
    SimplePinhole,
    /// `fx, fy, cx, cy`
    Pinhole,
    /// `f, cx, cy, k`
    SimpleRadial,
    /// `f, cx, cy, k1, k2`
    Radial,
    /// `fx, fy, cx, cy, k1, k2, p1, p2`
    OpenCv,
    /// `fx, fy, cx, cy, k1, k2, k3, k4`
    OpenCvFisheye,
    /// `fx, fy, cx, cy, k1, k2, p1, p2, k3, k4, k5, k6`
    FullOpenCv,
    /// `fx, fy, cx, cy, omega`
    Fov,
    /// `f, cx, cy, k`
    SimpleRadialFisheye,
    /// `f, cx, cy, k1, k2`
    RadialFisheye,
    /// `fx, fy, cx, cy, k1, k2, p1, p2, k3, k4, sx1, sy1`
    ThinPrismFisheye,
}

impl CameraModel {
    /// Look up a model by its COLMAP id.
    #[must_use]
    pub const fn from_id(id: i32) -> Option<Self> {
        Some(match id {
            0 => Self::SimplePinhole,
            1 => Self::Pinhole,
            2 => Self::SimpleRadial,
            3 => Self::Radial,
            4 => Self::OpenCv,
            5 => Self::OpenCvFisheye,
            6 => Self::FullOpenCv,
            7 => Self::Fov,
            8 => Self::SimpleRadialFisheye,
            9 => Self::RadialFisheye,
            10 => Self::ThinPrismFisheye,
            _ => return None,
        })
    }

    /// The model's COLMAP id.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::SimplePinhole => 0,
            Self::Pinhole => 1,
            Self::SimpleRadial => 2,
            Self::Radial => 3,
            Self::OpenCv => 4,
            Self::OpenCvFisheye => 5,
            Self::FullOpenCv => 6,
            Self::Fov => 7,
            Self::SimpleRadialFisheye => 8,
            Self::RadialFisheye => 9,
            Self::ThinPrismFisheye => 10,
        }
    }

    /// Number of intrinsic parameters stored for this model.
    #[must_use]
    pub const fn param_count(self) -> usize {
        match self {
            Self::SimplePinhole => 3,
            Self::Pinhole | Self::SimpleRadial | Self::SimpleRadialFisheye => 4,
            Self::Radial | Self::Fov | Self::RadialFisheye => 5,
            Self::OpenCv | Self::OpenCvFisheye => 8,
            Self::FullOpenCv | Self::ThinPrismFisheye => 12,
        }
    }
}

/// One camera from `cameras.bin`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapCamera {
    /// Camera id referenced by images.
    pub id: i32,
    /// Projection model.
    pub model: CameraModel,
    /// Image width in pixels.
    pub width: u64,
    /// Image height in pixels.
    pub height: u64,
    /// Model parameters, `model.param_count()` of them.
    pub params: Vec<f64>,
}

/// One registered image from `images.bin`.
///
/// `qvec`/`tvec` map world points into the camera frame:
/// `x_cam = R(qvec) · x_world + tvec`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapImage {
    /// Image id.
    pub id: u32,
    /// World-to-camera rotation as `[w, x, y, z]`.
    pub qvec: [f64; 4],
    /// World-to-camera translation.
    pub tvec: Vector3<f64>,
    /// Camera the image was taken with.
    pub camera_id: u32,
    /// Image file name, relative to the image directory.
    pub name: String,
    /// Number of 2D observations (not loaded).
    pub num_points2d: u64,
}

impl ColmapImage {
    /// World-to-camera rotation. A zero quaternion yields the identity.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        let [w, x, y, z] = self.qvec;
        UnitQuaternion::try_new(Quaternion::new(w, x, y, z), f64::EPSILON)
            .unwrap_or_else(UnitQuaternion::identity)
    }

    /// Camera centre in world coordinates, `C = -Rᵀ t`.
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        Point3::from(-(self.rotation().inverse() * self.tvec))
    }
}

/// One reconstructed point from `points3D.bin`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColmapPoint {
    /// Point id.
    pub id: u64,
    /// World position.
    pub position: Point3<f64>,
    /// Colour.
    pub rgb: [u8; 3],
    /// Mean reprojection error.
    pub error: f64,
    /// Number of observations (not loaded).
    pub track_length: u64,
}

fn open<P: AsRef<Path>>(path: P) -> IoResult<BufReader<File>> {
    let path = path.as_ref();
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| IoError::from_open(e, path))
}

/// Parse `cameras.bin` content.
///
/// # Errors
///
/// Returns [`IoError::UnknownCameraModel`] for an unrecognised model id and
/// [`IoError::UnexpectedEof`] for truncated input.
pub fn parse_cameras<R: Read>(reader: R) -> IoResult<Vec<ColmapCamera>> {
    let mut r = BinaryReader::new(reader);
    let count = r.count()?;
    let mut cameras = Vec::with_capacity(capacity_hint(count));

    for _ in 0..count {
        let id = r.i32()?;
        let model_id = r.i32()?;
        let model =
            CameraModel::from_id(model_id).ok_or(IoError::UnknownCameraModel { model_id })?;
        let width = r.u64()?;
        let height = r.u64()?;
        let params = (0..model.param_count())
            .map(|_| r.f64())
            .collect::<IoResult<Vec<_>>>()?;
        cameras.push(ColmapCamera {
            id,
            model,
            width,
            height,
            params,
        });
    }

    Ok(cameras)
}

/// Parse `images.bin` content.
///
/// # Errors
///
/// Returns [`IoError::UnexpectedEof`] for truncated input and
/// [`IoError::InvalidContent`] for a non-UTF-8 image name.
pub fn parse_images<R: Read>(reader: R) -> IoResult<Vec<ColmapImage>> {
    let mut r = BinaryReader::new(reader);
    let count = r.count()?;
    let mut images = Vec::with_capacity(capacity_hint(count));

    for _ in 0..count {
        let id = r.u32()?;
        let qvec = r.f64_array::<4>()?;
        let tvec = Vector3::from(r.f64_array::<3>()?);
        let camera_id = r.u32()?;
        let name = r.c_string()?;
        let num_points2d = r.u64()?;
        r.skip(num_points2d, POINT2D_BYTES)?;
        images.push(ColmapImage {
            id,
            qvec,
            tvec,
            camera_id,
            name,
            num_points2d,
        });
    }

    Ok(images)
}

/// Parse `points3D.bin` content.
///
/// # Errors
///
/// Returns [`IoError::UnexpectedEof`] for truncated input.
pub fn parse_points3d<R: Read>(reader: R) -> IoResult<Vec<ColmapPoint>> {
    let mut r = BinaryReader::new(reader);
    let count = r.count()?;
    let mut points = Vec::with_capacity(capacity_hint(count));

    for _ in 0..count {
        let id = r.u64()?;
        let [x, y, z] = r.f64_array::<3>()?;
        let rgb = [r.u8()?, r.u8()?, r.u8()?];
        let error = r.f64()?;
        let track_length = r.u64()?;
        r.skip(track_length, TRACK_ELEMENT_BYTES)?;
        points.push(ColmapPoint {
            id,
            position: Point3::new(x, y, z),
            rgb,
            error,
            track_length,
        });
    }

    Ok(points)
}

/// Read `cameras.bin`.
///
/// # Errors
///
/// See [`parse_cameras`]; also fails if the file cannot be opened.
pub fn read_cameras<P: AsRef<Path>>(path: P) -> IoResult<Vec<ColmapCamera>> {
    parse_cameras(open(path)?)
}

/// Read `images.bin`.
///
/// # Errors
///
/// See [`parse_images`]; also fails if the file cannot be opened.
pub fn read_images<P: AsRef<Path>>(path: P) -> IoResult<Vec<ColmapImage>> {
    parse_images(open(path)?)
}

/// Read `points3D.bin`.
///
/// # Errors
///
/// See [`parse_points3d`]; also fails if the file cannot be opened.
pub fn read_points3d<P: AsRef<Path>>(path: P) -> IoResult<Vec<ColmapPoint>> {
    parse_points3d(open(path)?)
}

/// Byte encoders for hand-built fixtures, shared by the colmap tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::{ColmapCamera, ColmapImage, ColmapPoint};

    pub fn cameras(cameras: &[ColmapCamera]) -> Vec<u8> {
        let mut out = (cameras.len() as u64).to_le_bytes().to_vec();
        for c in cameras {
            out.extend_from_slice(&c.id.to_le_bytes());
            out.extend_from_slice(&c.model.id().to_le_bytes());
            out.extend_from_slice(&c.width.to_le_bytes());
            out.extend_from_slice(&c.height.to_le_bytes());
            for p in &c.params {
                out.extend_from_slice(&p.to_le_bytes());
            }
        }
        out
    }

    pub fn images(images: &[ColmapImage]) -> Vec<u8> {
        let mut out = (images.len() as u64).to_le_bytes().to_vec();
        for im in images {
            out.extend_from_slice(&im.id.to_le_bytes());
            for q in im.qvec {
                out.extend_from_slice(&q.to_le_bytes());
            }
            for t in im.tvec.iter() {
                out.extend_from_slice(&t.to_le_bytes());
            }
            out.extend_from_slice(&im.camera_id.to_le_bytes());
            out.extend_from_slice(im.name.as_bytes());
            out.push(0);
            out.extend_from_slice(&im.num_points2d.to_le_bytes());
            for i in 0..im.num_points2d {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f64;
                out.extend_from_slice(&x.to_le_bytes());
                out.extend_from_slice(&(x + 0.5).to_le_bytes());
                out.extend_from_slice(&(-1i64).to_le_bytes());
            }
        }
        out
    }

    pub fn points(points: &[ColmapPoint]) -> Vec<u8> {
        let mut out = (points.len() as u64).to_le_bytes().to_vec();
        for p in points {
            out.extend_from_slice(&p.id.to_le_bytes());
            for c in p.position.iter() {
                out.extend_from_slice(&c.to_le_bytes());
            }
            out.extend_from_slice(&p.rgb);
            out.extend_from_slice(&p.error.to_le_bytes());
            out.extend_from_slice(&p.track_length.to_le_bytes());
            for i in 0..p.track_length {
                #[allow(clippy::cast_possible_truncation)]
                let idx = i as i32;
                out.extend_from_slice(&1i32.to_le_bytes());
                out.extend_from_slice(&idx.to_le_bytes());
            }
        }
        out
    }

    pub fn image(id: u32, name: &str, qvec: [f64; 4], tvec: [f64; 3]) -> ColmapImage {
        ColmapImage {
            id,
            qvec,
            tvec: tvec.into(),
            camera_id: 1,
            name: name.to_string(),
            num_points2d: 2,
        }
    }
}
