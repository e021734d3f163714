//! XYZ point lists
//!
//! One point per line, whitespace separated. `.xyz` holds positions,
//! `.xyzn` adds a normal and `.xyzrgb` adds an 8-bit color.

use std::io::{BufRead, Write};

use crate::domain::entities::PointCloud;

use super::{parse_error, FormatResult};

/// Column layout of a point list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Positions,
    WithNormals,
    WithColors,
}

impl Layout {
    /// Layout implied by a (lowercase) extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "xyz" => Some(Layout::Positions),
            "xyzn" => Some(Layout::WithNormals),
            "xyzrgb" => Some(Layout::WithColors),
            _ => None,
        }
    }
}

pub fn read<R: BufRead>(reader: R, layout: Layout) -> FormatResult<PointCloud> {
    let mut cloud = PointCloud::default();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let values = line
            .split_whitespace()
            .map(|t| t.parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| parse_error(format!("line {}: {e}", number + 1)))?;
        if values.len() < 3 {
            return Err(parse_error(format!(
                "line {}: expected at least 3 values, found {}",
                number + 1,
                values.len()
            )));
        }
        cloud.points.push([values[0], values[1], values[2]]);

        let extra = match layout {
            Layout::Positions => continue,
            _ if values.len() < 6 => {
                return Err(parse_error(format!(
                    "line {}: expected 6 values, found {}",
                    number + 1,
                    values.len()
                )))
            }
            _ => [values[3], values[4], values[5]],
        };
        match layout {
            Layout::WithNormals => cloud.normals.push(extra),
            Layout::WithColors => cloud
                .colors
                .push(extra.map(|v| v.round().clamp(0.0, 255.0) as u8)),
            Layout::Positions => {}
        }
    }

    Ok(cloud)
}

/// Write `cloud` in `layout`; missing attributes are written as zeros
pub fn write<W: Write>(writer: &mut W, cloud: &PointCloud, layout: Layout) -> std::io::Result<()> {
    for (i, p) in cloud.points.iter().enumerate() {
        write!(writer, "{} {} {}", p[0], p[1], p[2])?;
        match layout {
            Layout::Positions => {}
            Layout::WithNormals => {
                let n = cloud.normals.get(i).copied().unwrap_or_default();
                write!(writer, " {} {} {}", n[0], n[1], n[2])?;
            }
            Layout::WithColors => {
                let c = cloud.colors.get(i).copied().unwrap_or_default();
                write!(writer, " {} {} {}", c[0], c[1], c[2])?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}
