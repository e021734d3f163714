//! Property tests for the PLY reader.

use std::io::Cursor;

use proptest::prelude::*;

use walkmesh::infrastructure::geometry::ply;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: arbitrary bytes never panic the reader.
    #[test]
    fn property_arbitrary_bytes_never_panic(
        bytes in proptest::collection::vec(any::<u8>(), 0..512)
    ) {
        let _ = ply::read(Cursor::new(bytes));
    }

    /// PROPERTY: a valid header followed by garbage yields an error or a
    /// mesh whose faces only reference existing vertices.
    #[test]
    fn property_faces_reference_existing_vertices(
        vertices in 0usize..6,
        faces in 0usize..4,
        body in "[0-9 \n.-]{0,200}",
    ) {
        let text = format!(
            "ply\nformat ascii 1.0\nelement vertex {vertices}\n\
             property float x\nproperty float y\nproperty float z\n\
             element face {faces}\nproperty list uchar int vertex_indices\n\
             end_header\n{body}"
        );
        if let Ok(mesh) = ply::read(Cursor::new(text)) {
            prop_assert_eq!(mesh.vertices.len(), vertices);
            for index in mesh.triangles.iter().flatten() {
                prop_assert!((*index as usize) < vertices);
            }
        }
    }
}
