//! PLY (Polygon File Format) I/O
//!
//! Reads ascii, binary little-endian and binary big-endian files with
//! arbitrary elements and scalar/list properties. Only vertex positions,
//! normals, colors and face indices are kept; everything else is skipped.
//! Polygons are fan-triangulated.

use std::io::{BufRead, Read, Write};
use std::str::SplitWhitespace;

use crate::domain::entities::{PointCloud, TriangleMesh};

use super::{parse_error, FormatError, FormatResult};

/// Body encoding of a PLY file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl Encoding {
    fn keyword(self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::BinaryLittleEndian => "binary_little_endian",
            Encoding::BinaryBigEndian => "binary_big_endian",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScalarType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ScalarType {
    fn parse(name: &str) -> FormatResult<Self> {
        Ok(match name {
            "char" | "int8" => ScalarType::I8,
            "uchar" | "uint8" => ScalarType::U8,
            "short" | "int16" => ScalarType::I16,
            "ushort" | "uint16" => ScalarType::U16,
            "int" | "int32" => ScalarType::I32,
            "uint" | "uint32" => ScalarType::U32,
            "float" | "float32" => ScalarType::F32,
            "double" | "float64" => ScalarType::F64,
            other => return Err(parse_error(format!("unknown PLY property type '{other}'"))),
        })
    }

    fn size(self) -> usize {
        match self {
            ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::F64 => 8,
        }
    }

    fn is_float(self) -> bool {
        matches!(self, ScalarType::F32 | ScalarType::F64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PropertyKind {
    Scalar(ScalarType),
    List { count: ScalarType, item: ScalarType },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Property {
    name: String,
    kind: PropertyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

impl Element {
    fn has(&self, names: &[&str]) -> bool {
        names
            .iter()
            .all(|n| self.properties.iter().any(|p| p.name == *n))
    }
}

/// Parsed PLY header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    encoding: Encoding,
    elements: Vec<Element>,
}

impl Header {
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Declared instance count of an element (0 when absent)
    pub fn element_count(&self, name: &str) -> usize {
        self.elements
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.count)
            .unwrap_or(0)
    }
}

/// Read the header, leaving `reader` at the first body byte
pub fn read_header<R: BufRead>(reader: &mut R) -> FormatResult<Header> {
    let mut line = String::new();
    let mut next_line = |reader: &mut R, line: &mut String| -> FormatResult<bool> {
        line.clear();
        Ok(reader.read_line(line)? > 0)
    };

    if !next_line(reader, &mut line)? || line.trim() != "ply" {
        return Err(parse_error("not a PLY file (missing 'ply' magic)"));
    }

    let mut encoding = None;
    let mut elements: Vec<Element> = Vec::new();

    loop {
        if !next_line(reader, &mut line)? {
            return Err(parse_error("unexpected end of file in PLY header"));
        }
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("format") => {
                encoding = Some(match tokens.next() {
                    Some("ascii") => Encoding::Ascii,
                    Some("binary_little_endian") => Encoding::BinaryLittleEndian,
                    Some("binary_big_endian") => Encoding::BinaryBigEndian,
                    other => {
                        return Err(FormatError::Unsupported(format!(
                            "PLY format '{}'",
                            other.unwrap_or("")
                        )))
                    }
                });
            }
            Some("element") => {
                let name = tokens
                    .next()
                    .ok_or_else(|| parse_error("PLY element without a name"))?;
                let count = tokens
                    .next()
                    .and_then(|c| c.parse::<usize>().ok())
                    .ok_or_else(|| parse_error(format!("invalid count for element '{name}'")))?;
                elements.push(Element {
                    name: name.to_string(),
                    count,
                    properties: Vec::new(),
                });
            }
            Some("property") => {
                let element = elements
                    .last_mut()
                    .ok_or_else(|| parse_error("PLY property before any element"))?;
                let first = tokens
                    .next()
                    .ok_or_else(|| parse_error("PLY property without a type"))?;
                let kind = if first == "list" {
                    let count = ScalarType::parse(tokens.next().unwrap_or(""))?;
                    let item = ScalarType::parse(tokens.next().unwrap_or(""))?;
                    PropertyKind::List { count, item }
                } else {
                    PropertyKind::Scalar(ScalarType::parse(first)?)
                };
                let name = tokens
                    .next()
                    .ok_or_else(|| parse_error("PLY property without a name"))?;
                element.properties.push(Property {
                    name: name.to_string(),
                    kind,
                });
            }
            Some("end_header") => break,
            Some("comment") | Some("obj_info") | None => {}
            Some(other) => return Err(parse_error(format!("unexpected PLY header line '{other}'"))),
        }
    }

    let encoding = encoding.ok_or_else(|| parse_error("PLY header has no format line"))?;
    Ok(Header { encoding, elements })
}

trait ValueSource {
    fn next_value(&mut self, ty: ScalarType) -> FormatResult<f64>;
}

struct AsciiSource<'a> {
    tokens: SplitWhitespace<'a>,
}

impl ValueSource for AsciiSource<'_> {
    fn next_value(&mut self, _ty: ScalarType) -> FormatResult<f64> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| parse_error("unexpected end of PLY data"))?;
        token
            .parse::<f64>()
            .map_err(|_| parse_error(format!("invalid number '{token}' in PLY data")))
    }
}

struct BinarySource<R> {
    reader: R,
    big_endian: bool,
}

impl<R: Read> ValueSource for BinarySource<R> {
    fn next_value(&mut self, ty: ScalarType) -> FormatResult<f64> {
        let mut buf = [0u8; 8];
        let bytes = &mut buf[..ty.size()];
        self.reader.read_exact(bytes).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                parse_error("unexpected end of PLY data")
            } else {
                FormatError::Io(e)
            }
        })?;

        macro_rules! decode {
            ($t:ty, $n:expr) => {{
                let mut raw = [0u8; $n];
                raw.copy_from_slice(&buf[..$n]);
                if self.big_endian {
                    <$t>::from_be_bytes(raw) as f64
                } else {
                    <$t>::from_le_bytes(raw) as f64
                }
            }};
        }

        Ok(match ty {
            ScalarType::I8 => buf[0] as i8 as f64,
            ScalarType::U8 => buf[0] as f64,
            ScalarType::I16 => decode!(i16, 2),
            ScalarType::U16 => decode!(u16, 2),
            ScalarType::I32 => decode!(i32, 4),
            ScalarType::U32 => decode!(u32, 4),
            ScalarType::F32 => decode!(f32, 4),
            ScalarType::F64 => decode!(f64, 8),
        })
    }
}

/// Read a PLY file into a mesh
///
/// Files without faces yield a mesh with no triangles.
pub fn read<R: BufRead>(mut reader: R) -> FormatResult<TriangleMesh> {
    let header = read_header(&mut reader)?;
    match header.encoding {
        Encoding::Ascii => {
            let mut text = String::new();
            reader.read_to_string(&mut text)?;
            read_body(
                &header,
                &mut AsciiSource {
                    tokens: text.split_whitespace(),
                },
            )
        }
        Encoding::BinaryLittleEndian | Encoding::BinaryBigEndian => read_body(
            &header,
            &mut BinarySource {
                reader,
                big_endian: header.encoding == Encoding::BinaryBigEndian,
            },
        ),
    }
}

/// Read a PLY file as a point cloud (faces are ignored)
pub fn read_point_cloud<R: BufRead>(reader: R) -> FormatResult<PointCloud> {
    let mesh = read(reader)?;
    Ok(PointCloud {
        points: mesh.vertices,
        normals: mesh.vertex_normals,
        colors: mesh.vertex_colors,
    })
}

fn read_body<S: ValueSource>(header: &Header, source: &mut S) -> FormatResult<TriangleMesh> {
    let mut mesh = TriangleMesh::default();

    for element in &header.elements {
        let is_vertex = element.name == "vertex";
        let is_face = element.name == "face";
        let with_normals = is_vertex && element.has(&["nx", "ny", "nz"]);
        let with_colors = is_vertex && element.has(&["red", "green", "blue"]);

        // records without properties consume no input, so nothing bounds the loop
        if element.properties.is_empty() && element.count > 0 {
            return Err(parse_error(format!(
                "PLY element '{}' declares {} records but no properties",
                element.name, element.count
            )));
        }

        if is_vertex {
            let capacity = element.count.min(1 << 16);
            mesh.vertices.reserve(capacity);
            if with_normals {
                mesh.vertex_normals.reserve(capacity);
            }
            if with_colors {
                mesh.vertex_colors.reserve(capacity);
            }
        }

        let mut indices: Vec<u32> = Vec::new();
        for _ in 0..element.count {
            let mut position = [0.0f32; 3];
            let mut normal = [0.0f32; 3];
            let mut color = [0u8; 3];

            for property in &element.properties {
                match property.kind {
                    PropertyKind::Scalar(ty) => {
                        let value = source.next_value(ty)?;
                        if !is_vertex {
                            continue;
                        }
                        match property.name.as_str() {
                            "x" => position[0] = value as f32,
                            "y" => position[1] = value as f32,
                            "z" => position[2] = value as f32,
                            "nx" => normal[0] = value as f32,
                            "ny" => normal[1] = value as f32,
                            "nz" => normal[2] = value as f32,
                            "red" => color[0] = to_color(value, ty),
                            "green" => color[1] = to_color(value, ty),
                            "blue" => color[2] = to_color(value, ty),
                            _ => {}
                        }
                    }
                    PropertyKind::List { count, item } => {
                        let n = source.next_value(count)?;
                        if !(0.0..=1024.0).contains(&n) {
                            return Err(parse_error(format!(
                                "implausible list length {n} in PLY element '{}'",
                                element.name
                            )));
                        }
                        indices.clear();
                        for _ in 0..n as usize {
                            let value = source.next_value(item)?;
                            if value < 0.0 || value > u32::MAX as f64 {
                                return Err(parse_error(format!("invalid vertex index {value}")));
                            }
                            indices.push(value as u32);
                        }
                        let is_indices =
                            matches!(property.name.as_str(), "vertex_indices" | "vertex_index");
                        if is_face && is_indices {
                            for i in 1..indices.len().saturating_sub(1) {
                                mesh.triangles.push([indices[0], indices[i], indices[i + 1]]);
                            }
                        }
                    }
                }
            }

            if is_vertex {
                mesh.vertices.push(position);
                if with_normals {
                    mesh.vertex_normals.push(normal);
                }
                if with_colors {
                    mesh.vertex_colors.push(color);
                }
            }
        }
    }

    let vertex_count = mesh.vertices.len();
    if let Some(bad) = mesh
        .triangles
        .iter()
        .flatten()
        .find(|&&i| i as usize >= vertex_count)
    {
        return Err(parse_error(format!(
            "face references vertex {bad} but only {vertex_count} vertices exist"
        )));
    }

    Ok(mesh)
}

fn to_color(value: f64, ty: ScalarType) -> u8 {
    let scaled = if ty.is_float() { value * 255.0 } else { value };
    scaled.round().clamp(0.0, 255.0) as u8
}

/// Write a mesh (vertices, optional normals/colors, triangles)
pub fn write_mesh<W: Write>(
    writer: &mut W,
    mesh: &TriangleMesh,
    encoding: Encoding,
) -> std::io::Result<()> {
    write_ply(
        writer,
        &mesh.vertices,
        mesh.has_vertex_normals().then_some(mesh.vertex_normals.as_slice()),
        mesh.has_vertex_colors().then_some(mesh.vertex_colors.as_slice()),
        Some(&mesh.triangles),
        encoding,
    )
}

/// Write a point cloud (no face element)
pub fn write_point_cloud<W: Write>(
    writer: &mut W,
    cloud: &PointCloud,
    encoding: Encoding,
) -> std::io::Result<()> {
    write_ply(
        writer,
        &cloud.points,
        cloud.has_normals().then_some(cloud.normals.as_slice()),
        cloud.has_colors().then_some(cloud.colors.as_slice()),
        None,
        encoding,
    )
}

fn write_ply<W: Write>(
    writer: &mut W,
    vertices: &[[f32; 3]],
    normals: Option<&[[f32; 3]]>,
    colors: Option<&[[u8; 3]]>,
    faces: Option<&[[u32; 3]]>,
    encoding: Encoding,
) -> std::io::Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format {} 1.0", encoding.keyword())?;
    writeln!(writer, "comment written by walkmesh")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    if normals.is_some() {
        writeln!(writer, "property float nx")?;
        writeln!(writer, "property float ny")?;
        writeln!(writer, "property float nz")?;
    }
    if colors.is_some() {
        writeln!(writer, "property uchar red")?;
        writeln!(writer, "property uchar green")?;
        writeln!(writer, "property uchar blue")?;
    }
    if let Some(faces) = faces {
        writeln!(writer, "element face {}", faces.len())?;
        writeln!(writer, "property list uchar int vertex_indices")?;
    }
    writeln!(writer, "end_header")?;

    let big_endian = encoding == Encoding::BinaryBigEndian;
    let put_f32 = |w: &mut W, v: f32| -> std::io::Result<()> {
        if big_endian {
            w.write_all(&v.to_be_bytes())
        } else {
            w.write_all(&v.to_le_bytes())
        }
    };
    let put_i32 = |w: &mut W, v: i32| -> std::io::Result<()> {
        if big_endian {
            w.write_all(&v.to_be_bytes())
        } else {
            w.write_all(&v.to_le_bytes())
        }
    };

    for (i, p) in vertices.iter().enumerate() {
        if encoding == Encoding::Ascii {
            write!(writer, "{} {} {}", p[0], p[1], p[2])?;
            if let Some(n) = normals.map(|n| n[i]) {
                write!(writer, " {} {} {}", n[0], n[1], n[2])?;
            }
            if let Some(c) = colors.map(|c| c[i]) {
                write!(writer, " {} {} {}", c[0], c[1], c[2])?;
            }
            writeln!(writer)?;
        } else {
            for v in p {
                put_f32(writer, *v)?;
            }
            if let Some(n) = normals.map(|n| n[i]) {
                for v in n {
                    put_f32(writer, v)?;
                }
            }
            if let Some(c) = colors.map(|c| c[i]) {
                writer.write_all(&c)?;
            }
        }
    }

    for face in faces.unwrap_or(&[]) {
        if encoding == Encoding::Ascii {
            writeln!(writer, "3 {} {} {}", face[0], face[1], face[2])?;
        } else {
            writer.write_all(&[3u8])?;
            for index in face {
                put_i32(writer, *index as i32)?;
            }
        }
    }

    Ok(())
}
