#![no_main]

use libfuzzer_sys::fuzz_target;
use walkmesh::infrastructure::geometry::ply;

fuzz_target!(|data: &[u8]| {
    // Header, ascii and binary bodies - this should never panic
    if let Ok(mesh) = ply::read(data) {
        let count = mesh.vertices.len();
        assert!(mesh.triangles.iter().flatten().all(|&i| (i as usize) < count));
    }
});
