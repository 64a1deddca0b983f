//! PLY point-cloud support.
//!
//! Reconstructed scenes are stored as a single `vertex` element with float or
//! double `x y z` and, optionally, `red green blue` as `uchar`. Faces, if a
//! file carries any, are ignored.
//!
//! # Format Variants
//!
//! - **ASCII** - Human-readable, larger files
//! - **Binary Little Endian** - Compact, what the exporter writes by default
//! - **Binary Big Endian** - Read only
//!
//! # Example
//!
//! ```no_run
//! use trajectory_io::{load_point_cloud, save_point_cloud};
//!
//! let cloud = load_point_cloud("points3D.ply").unwrap();
//! save_point_cloud(&cloud, "copy.ply", true).unwrap();
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use trajectory_types::PointCloud;

use crate::error::{IoError, IoResult};

const COLOR_KEYS: [&str; 3] = ["red", "green", "blue"];

/// Load a point cloud from a PLY file.
///
/// Colours are kept only when every vertex carries all three `uchar`
/// channels.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file is not valid PLY format
/// - There is no `vertex` element, or a vertex lacks a numeric coordinate
pub fn load_point_cloud<P: AsRef<Path>>(path: P) -> IoResult<PointCloud> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(e, path))?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let header = parser
        .read_header(&mut reader)
        .map_err(|e| IoError::invalid_content(format!("failed to parse PLY header: {e}")))?;
    let payload = parser
        .read_payload(&mut reader, &header)
        .map_err(|e| IoError::invalid_content(format!("failed to read PLY payload: {e}")))?;

    let vertices = payload
        .get("vertex")
        .ok_or_else(|| IoError::invalid_content("PLY file has no vertex element"))?;

    let mut points = Vec::with_capacity(vertices.len());
    let mut colors = Vec::with_capacity(vertices.len());
    let mut colored = true;

    for (index, element) in vertices.iter().enumerate() {
        let coord = |key: &str| {
            get_float_property(element, key).ok_or_else(|| {
                IoError::invalid_content(format!("vertex {index} has no numeric '{key}'"))
            })
        };
        points.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));

        if colored {
            match get_color(element) {
                Some(rgb) => colors.push(rgb),
                None => colored = false,
            }
        }
    }

    if colored && !points.is_empty() {
        PointCloud::with_colors(points, colors)
            .ok_or_else(|| IoError::invalid_content("colour count does not match vertex count"))
    } else {
        Ok(PointCloud::from_points(points))
    }
}

/// Extract a float property from a PLY element.
fn get_float_property(element: &DefaultElement, key: &str) -> Option<f64> {
    match element.get(key)? {
        Property::Float(v) => Some(f64::from(*v)),
        Property::Double(v) => Some(*v),
        _ => None,
    }
}

fn get_color(element: &DefaultElement) -> Option<[u8; 3]> {
    let mut rgb = [0u8; 3];
    for (channel, key) in rgb.iter_mut().zip(COLOR_KEYS) {
        match element.get(key)? {
            Property::UChar(v) => *channel = *v,
            _ => return None,
        }
    }
    Some(rgb)
}

/// Save a point cloud to a PLY file.
///
/// * `binary` - If true, save as binary little-endian; if false, save as ASCII
///
/// Coordinates are written as `float`. Colours are written when present.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_point_cloud<P: AsRef<Path>>(cloud: &PointCloud, path: P, binary: bool) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    if binary {
        save_binary(cloud, &mut writer)?;
    } else {
        save_ascii(cloud, &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn save_binary<W: Write>(cloud: &PointCloud, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "comment Generated by trajectory-io")?;
    writeln!(writer, "element vertex {}", cloud.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    if cloud.has_colors() {
        for key in COLOR_KEYS {
            writeln!(writer, "property uchar {key}")?;
        }
    }
    writeln!(writer, "end_header")?;

    for (i, p) in cloud.points.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        {
            writer.write_all(&(p.x as f32).to_le_bytes())?;
            writer.write_all(&(p.y as f32).to_le_bytes())?;
            writer.write_all(&(p.z as f32).to_le_bytes())?;
        }
        if let Some(rgb) = cloud.colors.as_ref().and_then(|c| c.get(i)) {
            writer.write_all(rgb)?;
        }
    }

    Ok(())
}

fn save_ascii<W: Write>(cloud: &PointCloud, writer: &mut W) -> IoResult<()> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;
    ply.header
        .comments
        .push("Generated by trajectory-io".to_string());

    let mut vertex_def = ElementDef::new("vertex".to_string());
    for key in ["x", "y", "z"] {
        vertex_def.properties.add(PropertyDef::new(
            key.to_string(),
            PropertyType::Scalar(ScalarType::Float),
        ));
    }
    if cloud.has_colors() {
        for key in COLOR_KEYS {
            vertex_def.properties.add(PropertyDef::new(
                key.to_string(),
                PropertyType::Scalar(ScalarType::UChar),
            ));
        }
    }
    vertex_def.count = cloud.len();
    ply.header.elements.add(vertex_def);

    let mut elements = Vec::with_capacity(cloud.len());
    for (i, p) in cloud.points.iter().enumerate() {
        let mut element = DefaultElement::new();
        #[allow(clippy::cast_possible_truncation)]
        {
            element.insert("x".to_string(), Property::Float(p.x as f32));
            element.insert("y".to_string(), Property::Float(p.y as f32));
            element.insert("z".to_string(), Property::Float(p.z as f32));
        }
        if let Some(rgb) = cloud.colors.as_ref().and_then(|c| c.get(i)) {
            for (key, value) in COLOR_KEYS.into_iter().zip(rgb) {
                element.insert(key.to_string(), Property::UChar(*value));
            }
        }
        elements.push(element);
    }
    ply.payload.insert("vertex".to_string(), elements);

    Writer::new()
        .write_ply(writer, &mut ply)
        .map_err(|e| IoError::invalid_content(format!("failed to write PLY: {e}")))?;

    Ok(())
}
