//! Binary glTF 2.0 I/O
//!
//! Writes a single-mesh, single-primitive GLB with POSITION, optional NORMAL
//! and COLOR_0 attributes and u32 indices. Reading accepts `.glb` and
//! `.gltf` through the `gltf` crate and merges all triangle primitives.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use serde_json::json;

use crate::domain::entities::TriangleMesh;

use super::{parse_error, FormatError, FormatResult};

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;
const TRIANGLES: u32 = 4;

/// Load every triangle primitive of every mesh in `path`
pub fn read(path: &Path) -> FormatResult<TriangleMesh> {
    let gltf = gltf::Gltf::open(path).map_err(gltf_error)?;
    let buffers = gltf::import_buffers(&gltf.document, path.parent(), gltf.blob.clone())
        .map_err(gltf_error)?;

    let mut mesh = TriangleMesh::default();
    let mut normals_complete = true;
    let mut colors_complete = true;

    for primitive in gltf.document.meshes().flat_map(|m| m.primitives()) {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            continue;
        }
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
        let Some(positions) = reader.read_positions() else {
            continue;
        };

        let offset = mesh.vertices.len() as u32;
        mesh.vertices.extend(positions);
        let added = mesh.vertices.len() - offset as usize;

        match reader.read_normals() {
            Some(normals) if normals_complete => mesh.vertex_normals.extend(normals),
            _ => normals_complete = false,
        }
        match reader.read_colors(0) {
            Some(colors) if colors_complete => mesh.vertex_colors.extend(colors.into_rgb_u8()),
            _ => colors_complete = false,
        }

        match reader.read_indices() {
            Some(indices) => {
                let indices: Vec<u32> = indices.into_u32().collect();
                mesh.triangles.extend(
                    indices
                        .chunks_exact(3)
                        .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
                );
            }
            None => {
                // non-indexed: consecutive vertex triples
                let added = added as u32;
                mesh.triangles.extend(
                    (0..added / 3).map(|i| [offset + 3 * i, offset + 3 * i + 1, offset + 3 * i + 2]),
                );
            }
        }
    }

    if !normals_complete {
        mesh.vertex_normals.clear();
    }
    if !colors_complete {
        mesh.vertex_colors.clear();
    }
    Ok(mesh)
}

fn gltf_error(error: gltf::Error) -> FormatError {
    match error {
        gltf::Error::Io(e) => FormatError::Io(e),
        other => parse_error(format!("glTF: {other}")),
    }
}

/// Write `mesh` as a self-contained GLB
pub fn write_mesh<W: Write>(writer: &mut W, mesh: &TriangleMesh) -> FormatResult<()> {
    let vertex_count = mesh.vertices.len();
    let mut bin: Vec<u8> = Vec::new();
    let mut views = Vec::new();
    let mut accessors = Vec::new();
    let mut attributes = serde_json::Map::new();

    let mut push_view = |bin: &mut Vec<u8>, bytes: Vec<u8>, target: u32| -> usize {
        let offset = bin.len();
        bin.extend_from_slice(&bytes);
        views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len(),
            "target": target,
        }));
        views.len() - 1
    };

    let (min, max) = match mesh.bounds() {
        Some(b) => (b.min, b.max),
        None => ([0.0; 3], [0.0; 3]),
    };
    let view = push_view(&mut bin, f32_bytes(&mesh.vertices), ARRAY_BUFFER);
    accessors.push(json!({
        "bufferView": view,
        "componentType": FLOAT,
        "count": vertex_count,
        "type": "VEC3",
        "min": min,
        "max": max,
    }));
    attributes.insert("POSITION".into(), json!(accessors.len() - 1));

    if mesh.has_vertex_normals() {
        let view = push_view(&mut bin, f32_bytes(&mesh.vertex_normals), ARRAY_BUFFER);
        accessors.push(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": vertex_count,
            "type": "VEC3",
        }));
        attributes.insert("NORMAL".into(), json!(accessors.len() - 1));
    }

    if mesh.has_vertex_colors() {
        let colors: Vec<[f32; 3]> = mesh
            .vertex_colors
            .iter()
            .map(|c| c.map(|v| v as f32 / 255.0))
            .collect();
        let view = push_view(&mut bin, f32_bytes(&colors), ARRAY_BUFFER);
        accessors.push(json!({
            "bufferView": view,
            "componentType": FLOAT,
            "count": vertex_count,
            "type": "VEC3",
        }));
        attributes.insert("COLOR_0".into(), json!(accessors.len() - 1));
    }

    let indices: Vec<u8> = mesh
        .triangles
        .iter()
        .flatten()
        .flat_map(|i| i.to_le_bytes())
        .collect();
    let view = push_view(&mut bin, indices, ELEMENT_ARRAY_BUFFER);
    accessors.push(json!({
        "bufferView": view,
        "componentType": UNSIGNED_INT,
        "count": mesh.triangles.len() * 3,
        "type": "SCALAR",
    }));
    let indices_accessor = accessors.len() - 1;

    let document = json!({
        "asset": { "version": "2.0", "generator": concat!("walkmesh ", env!("CARGO_PKG_VERSION")) },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0, "name": "room" }],
        "meshes": [{
            "name": "room",
            "primitives": [{
                "attributes": attributes,
                "indices": indices_accessor,
                "mode": TRIANGLES,
            }],
        }],
        "accessors": accessors,
        "bufferViews": views,
        "buffers": [{ "byteLength": bin.len() }],
    });

    let mut json_chunk = serde_json::to_vec(&document)
        .map_err(|e| parse_error(format!("glTF json: {e}")))?;
    pad_to_four(&mut json_chunk, b' ');
    pad_to_four(&mut bin, 0);

    // 12-byte file header plus an 8-byte header per chunk
    let length = 12 + 8 + json_chunk.len() + 8 + bin.len();
    let glb = gltf::binary::Glb {
        header: gltf::binary::Header {
            magic: *b"glTF",
            version: 2,
            length: length as u32,
        },
        json: Cow::Owned(json_chunk),
        bin: Some(Cow::Owned(bin)),
    };
    glb.to_writer(writer).map_err(gltf_error)
}

fn f32_bytes(values: &[[f32; 3]]) -> Vec<u8> {
    values
        .iter()
        .flatten()
        .flat_map(|v| v.to_le_bytes())
        .collect()
}

fn pad_to_four(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn colored_triangle() -> TriangleMesh {
        let mut mesh = TriangleMesh {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.5]],
            triangles: vec![[0, 1, 2]],
            vertex_colors: vec![[255, 0, 0], [0, 255, 0], [0, 0, 255]],
            ..TriangleMesh::default()
        };
        mesh.compute_vertex_normals();
        mesh
    }

    #[test]
    fn writes_valid_glb_container() {
        let mut bytes = Vec::new();
        write_mesh(&mut bytes, &colored_triangle()).unwrap();

        assert_eq!(&bytes[..4], b"glTF");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 2);
        assert_eq!(
            u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize,
            bytes.len()
        );
        assert_eq!(bytes.len() % 4, 0);
    }

    #[test]
    fn written_mesh_reads_back() {
        let mesh = colored_triangle();
        let dir = tempdir().unwrap();
        let path = dir.path().join("room.glb");
        let mut bytes = Vec::new();
        write_mesh(&mut bytes, &mesh).unwrap();
        fs::write(&path, bytes).unwrap();

        let back = read(&path).unwrap();

        assert_eq!(back.vertices, mesh.vertices);
        assert_eq!(back.triangles, mesh.triangles);
        assert_eq!(back.vertex_normals, mesh.vertex_normals);
        assert_eq!(back.vertex_colors, mesh.vertex_colors);
    }

    #[test]
    fn mesh_without_attributes_has_position_only() {
        let mesh = TriangleMesh {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            triangles: vec![[0, 1, 2]],
            ..TriangleMesh::default()
        };
        let dir = tempdir().unwrap();
        let path = dir.path().join("bare.glb");
        let mut bytes = Vec::new();
        write_mesh(&mut bytes, &mesh).unwrap();
        fs::write(&path, bytes).unwrap();

        let back = read(&path).unwrap();
        assert!(!back.has_vertex_normals());
        assert!(!back.has_vertex_colors());
        assert_eq!(back.triangles.len(), 1);
    }

    #[test]
    fn garbage_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.glb");
        fs::write(&path, b"definitely not gltf").unwrap();
        assert!(read(&path).is_err());
    }
}
