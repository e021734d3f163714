#![no_main]

use libfuzzer_sys::fuzz_target;
use walkmesh::infrastructure::geometry::xyz::{self, Layout};

fuzz_target!(|data: &[u8]| {
    for layout in [Layout::Positions, Layout::WithNormals, Layout::WithColors] {
        let _ = xyz::read(data, layout);
    }
});
