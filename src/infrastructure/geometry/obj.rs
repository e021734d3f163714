//! Wavefront OBJ I/O
//!
//! Reading goes through `tobj` (triangulated, single index); writing emits
//! plain text with optional per-vertex colors and normals.

use std::io::Write;
use std::path::Path;

use crate::domain::entities::TriangleMesh;

use super::{parse_error, FormatResult};

/// Load every model in `path` into one mesh
pub fn read(path: &Path) -> FormatResult<TriangleMesh> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    // Material libraries are irrelevant to geometry; a missing .mtl is not an error.
    let (models, _materials) = tobj::load_obj(path, &options)
        .map_err(|e| parse_error(format!("OBJ load failed: {e}")))?;

    let mut mesh = TriangleMesh::default();
    let mut all_have_normals = true;
    let mut all_have_colors = true;

    for model in &models {
        let m = &model.mesh;
        let count = m.positions.len() / 3;
        all_have_normals &= m.normals.len() == count * 3;
        all_have_colors &= m.vertex_color.len() == count * 3;
    }

    for model in models {
        let m = model.mesh;
        let offset = mesh.vertices.len() as u32;

        mesh.vertices
            .extend(m.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
        if all_have_normals {
            mesh.vertex_normals
                .extend(m.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
        }
        if all_have_colors {
            mesh.vertex_colors.extend(
                m.vertex_color
                    .chunks_exact(3)
                    .map(|c| [unit_to_u8(c[0]), unit_to_u8(c[1]), unit_to_u8(c[2])]),
            );
        }
        mesh.triangles.extend(
            m.indices
                .chunks_exact(3)
                .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
        );
    }

    Ok(mesh)
}

fn unit_to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Write `mesh` as OBJ text
pub fn write_mesh<W: Write>(writer: &mut W, mesh: &TriangleMesh) -> std::io::Result<()> {
    writeln!(writer, "# walkmesh")?;
    writeln!(
        writer,
        "# {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangles.len()
    )?;

    let colors = mesh.has_vertex_colors();
    for (i, v) in mesh.vertices.iter().enumerate() {
        if colors {
            let c = mesh.vertex_colors[i];
            writeln!(
                writer,
                "v {} {} {} {:.6} {:.6} {:.6}",
                v[0],
                v[1],
                v[2],
                c[0] as f32 / 255.0,
                c[1] as f32 / 255.0,
                c[2] as f32 / 255.0
            )?;
        } else {
            writeln!(writer, "v {} {} {}", v[0], v[1], v[2])?;
        }
    }

    let normals = mesh.has_vertex_normals();
    if normals {
        for n in &mesh.vertex_normals {
            writeln!(writer, "vn {} {} {}", n[0], n[1], n[2])?;
        }
    }

    for t in &mesh.triangles {
        let [a, b, c] = [t[0] + 1, t[1] + 1, t[2] + 1];
        if normals {
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        } else {
            writeln!(writer, "f {a} {b} {c}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_quad_and_triangulates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        fs::write(
            &path,
            "mtllib missing.mtl\no quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let mesh = read(&path).unwrap();

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangles.len(), 2);
        assert!(!mesh.has_vertex_normals());
    }

    #[test]
    fn merges_objects_with_offset_indices() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("two.obj");
        fs::write(
            &path,
            "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
             o b\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        )
        .unwrap();

        let mesh = read(&path).unwrap();

        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.triangles[1], [3, 4, 5]);
    }

    #[test]
    fn written_mesh_reads_back() {
        let mut mesh = TriangleMesh {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            triangles: vec![[0, 1, 2]],
            vertex_colors: vec![[255, 0, 0], [0, 255, 0], [0, 0, 255]],
            ..TriangleMesh::default()
        };
        mesh.compute_vertex_normals();

        let dir = tempdir().unwrap();
        let path = dir.path().join("room.obj");
        let mut file = fs::File::create(&path).unwrap();
        write_mesh(&mut file, &mesh).unwrap();
        drop(file);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("f 1//1 2//2 3//3"));

        let back = read(&path).unwrap();
        assert_eq!(back.vertices, mesh.vertices);
        assert_eq!(back.triangles, mesh.triangles);
        assert_eq!(back.vertex_normals, mesh.vertex_normals);
        assert_eq!(back.vertex_colors, mesh.vertex_colors);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(read(&dir.path().join("nope.obj")).is_err());
    }
}
