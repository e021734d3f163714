//! In-memory Geometry
//!
//! Minimal triangle mesh and point cloud types shared by the geometry store,
//! the export adapter, and the viewer.

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    fn of(points: &[[f32; 3]]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            min: *first,
            max: *first,
        };
        for p in &points[1..] {
            for axis in 0..3 {
                bounds.min[axis] = bounds.min[axis].min(p[axis]);
                bounds.max[axis] = bounds.max[axis].max(p[axis]);
            }
        }
        Some(bounds)
    }

    /// Size along each axis
    pub fn extent(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u32; 3]>,
    /// Per-vertex normals; either empty or one per vertex
    pub vertex_normals: Vec<[f32; 3]>,
    /// Per-vertex colors; either empty or one per vertex
    pub vertex_colors: Vec<[u8; 3]>,
}

impl TriangleMesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn has_vertex_normals(&self) -> bool {
        !self.vertices.is_empty() && self.vertex_normals.len() == self.vertices.len()
    }

    pub fn has_vertex_colors(&self) -> bool {
        !self.vertices.is_empty() && self.vertex_colors.len() == self.vertices.len()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(&self.vertices)
    }

    /// Compute per-vertex normals from the triangles
    ///
    /// Each vertex normal is the normalized sum of the unit normals of its
    /// adjacent triangles. Vertices without a non-degenerate adjacent
    /// triangle get `[0, 0, 1]`. Triangles referencing out-of-range vertices
    /// are ignored.
    pub fn compute_vertex_normals(&mut self) {
        let mut sums = vec![[0.0f64; 3]; self.vertices.len()];

        for tri in &self.triangles {
            let [a, b, c] = tri.map(|i| i as usize);
            if a >= self.vertices.len() || b >= self.vertices.len() || c >= self.vertices.len() {
                continue;
            }
            let (pa, pb, pc) = (self.vertices[a], self.vertices[b], self.vertices[c]);
            let e1 = sub(pb, pa);
            let e2 = sub(pc, pa);
            let n = cross(e1, e2);
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            if len <= f64::EPSILON {
                continue;
            }
            let unit = [n[0] / len, n[1] / len, n[2] / len];
            for idx in [a, b, c] {
                for axis in 0..3 {
                    sums[idx][axis] += unit[axis];
                }
            }
        }

        self.vertex_normals = sums
            .into_iter()
            .map(|s| {
                let len = (s[0] * s[0] + s[1] * s[1] + s[2] * s[2]).sqrt();
                if len <= f64::EPSILON {
                    [0.0, 0.0, 1.0]
                } else {
                    [(s[0] / len) as f32, (s[1] / len) as f32, (s[2] / len) as f32]
                }
            })
            .collect();
    }
}

/// Point cloud with optional normals and colors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub points: Vec<[f32; 3]>,
    /// Either empty or one per point
    pub normals: Vec<[f32; 3]>,
    /// Either empty or one per point
    pub colors: Vec<[u8; 3]>,
}

impl PointCloud {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn has_normals(&self) -> bool {
        !self.points.is_empty() && self.normals.len() == self.points.len()
    }

    pub fn has_colors(&self) -> bool {
        !self.points.is_empty() && self.colors.len() == self.points.len()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of(&self.points)
    }
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f64; 3] {
    [
        f64::from(a[0]) - f64::from(b[0]),
        f64::from(a[1]) - f64::from(b[1]),
        f64::from(a[2]) - f64::from(b[2]),
    ]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
