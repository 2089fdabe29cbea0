//! Primitive Geometry
//!
//! Indexed triangle meshes for the editable primitives (box, cylinder,
//! icosphere, ground plane) and the gizmo parts (torus rings, cylinder shafts,
//! cone tips). All meshes are built around the local origin; cylinders, cones
//! and arrows run along +Y and rings lie in the XZ plane.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use std::f32::consts::PI;

// ============================================================================
// VERTEX / MESH
// ============================================================================

/// Vertex layout handed to a renderer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(Vertex, [u8; 32]);

impl Vertex {
    fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full size along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half size along each axis.
    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Axis-aligned box around this box after an affine transform.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self.corners().map(|c| matrix.transform_point3(c));
        // Eight corners, never empty
        Self::from_points(corners).unwrap_or(*self)
    }
}

/// A mesh with vertices and indices
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local-space bounds of the vertices.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from_array(v.position)))
    }

    /// Triangle corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(self.vertices[i as usize].position))
        })
    }

    /// Raw vertex bytes for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

/// Box centered on the origin.
pub fn generate_box(width: f32, height: f32, depth: f32) -> Mesh {
    let mut mesh = Mesh::new();
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    let corners = [
        Vec3::new(-hx, -hy, -hz),
        Vec3::new(hx, -hy, -hz),
        Vec3::new(hx, hy, -hz),
        Vec3::new(-hx, hy, -hz),
        Vec3::new(-hx, -hy, hz),
        Vec3::new(hx, -hy, hz),
        Vec3::new(hx, hy, hz),
        Vec3::new(-hx, hy, hz),
    ];

    let faces = [
        ([0, 1, 2, 3], Vec3::NEG_Z),
        ([5, 4, 7, 6], Vec3::Z),
        ([4, 0, 3, 7], Vec3::NEG_X),
        ([1, 5, 6, 2], Vec3::X),
        ([3, 2, 6, 7], Vec3::Y),
        ([4, 5, 1, 0], Vec3::NEG_Y),
    ];
    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    for (face_indices, normal) in &faces {
        let base = mesh.vertices.len() as u32;
        for (corner, uv) in face_indices.iter().zip(uvs) {
            mesh.vertices.push(Vertex::new(corners[*corner], *normal, uv));
        }
        mesh.push_quad(base, base + 1, base + 2, base + 3);
    }

    mesh
}

/// Cylinder (or cone when one diameter is zero) along Y, centered on the origin.
pub fn generate_cylinder(
    diameter_top: f32,
    diameter_bottom: f32,
    height: f32,
    tessellation: u32,
) -> Mesh {
    let mut mesh = Mesh::new();
    let segments = tessellation.max(3);
    let (r_top, r_bottom) = (diameter_top * 0.5, diameter_bottom * 0.5);
    let half = height * 0.5;

    // Side wall: one bottom/top vertex pair per segment edge
    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let angle = u * 2.0 * PI;
        let (sin, cos) = angle.sin_cos();
        let normal = Vec3::new(cos, 0.0, sin);
        mesh.vertices.push(Vertex::new(
            Vec3::new(cos * r_bottom, -half, sin * r_bottom),
            normal,
            [u, 0.0],
        ));
        mesh.vertices.push(Vertex::new(
            Vec3::new(cos * r_top, half, sin * r_top),
            normal,
            [u, 1.0],
        ));
    }
    for i in 0..segments {
        let b0 = i * 2;
        let t0 = b0 + 1;
        let b1 = b0 + 2;
        let t1 = b0 + 3;
        mesh.push_quad(b0, t0, t1, b1);
    }

    for (radius, y, normal) in [(r_top, half, Vec3::Y), (r_bottom, -half, Vec3::NEG_Y)] {
        if radius <= 0.0 {
            continue;
        }
        let center = mesh.vertices.len() as u32;
        mesh.vertices
            .push(Vertex::new(Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5]));
        for i in 0..=segments {
            let angle = i as f32 / segments as f32 * 2.0 * PI;
            let (sin, cos) = angle.sin_cos();
            mesh.vertices.push(Vertex::new(
                Vec3::new(cos * radius, y, sin * radius),
                normal,
                [0.5 + cos * 0.5, 0.5 + sin * 0.5],
            ));
        }
        for i in 0..segments {
            mesh.indices
                .extend_from_slice(&[center, center + 1 + i, center + 2 + i]);
        }
    }

    mesh
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn icosahedron_corners() -> [Vec3; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) * 0.5;
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .map(|c| c.normalize())
}

/// Icosphere: each icosahedron face is split into `subdivisions²` triangles
/// and every vertex is pushed out onto the sphere.
pub fn generate_icosphere(radius: f32, subdivisions: u32) -> Mesh {
    let mut mesh = Mesh::new();
    let n = subdivisions.max(1);
    let corners = icosahedron_corners();

    // Row i of a face grid holds n - i + 1 vertices
    let row_start: Vec<u32> = (0..=n)
        .scan(0u32, |start, i| {
            let current = *start;
            *start += n - i + 1;
            Some(current)
        })
        .collect();

    for face in ICOSAHEDRON_FACES {
        let [a, b, c] = face.map(|i| corners[i]);
        let base = mesh.vertices.len() as u32;
        for i in 0..=n {
            for j in 0..=(n - i) {
                let u = i as f32 / n as f32;
                let v = j as f32 / n as f32;
                let dir = (a + (b - a) * u + (c - a) * v).normalize();
                mesh.vertices.push(Vertex::new(dir * radius, dir, [u, v]));
            }
        }
        let at = |i: u32, j: u32| base + row_start[i as usize] + j;
        for i in 0..n {
            for j in 0..(n - i) {
                mesh.indices
                    .extend_from_slice(&[at(i, j), at(i + 1, j), at(i, j + 1)]);
                if j + 1 < n - i {
                    mesh.indices
                        .extend_from_slice(&[at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)]);
                }
            }
        }
    }

    mesh
}

/// Torus lying in the XZ plane.
pub fn generate_torus(diameter: f32, thickness: f32, tessellation: u32) -> Mesh {
    let mut mesh = Mesh::new();
    let segments = tessellation.max(3);
    let ring_radius = diameter * 0.5;
    let tube_radius = thickness * 0.5;
    let stride = segments + 1;

    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let (sin_u, cos_u) = (u * 2.0 * PI).sin_cos();
        let center = Vec3::new(cos_u * ring_radius, 0.0, sin_u * ring_radius);
        for j in 0..=segments {
            let v = j as f32 / segments as f32;
            let (sin_v, cos_v) = (v * 2.0 * PI).sin_cos();
            let normal = Vec3::new(cos_u * cos_v, sin_v, sin_u * cos_v);
            mesh.vertices
                .push(Vertex::new(center + normal * tube_radius, normal, [u, v]));
        }
    }
    for i in 0..segments {
        for j in 0..segments {
            let a = i * stride + j;
            let b = (i + 1) * stride + j;
            mesh.push_quad(a, b, b + 1, a + 1);
        }
    }

    mesh
}

/// Flat ground rectangle in the XZ plane facing +Y.
pub fn generate_ground(width: f32, height: f32) -> Mesh {
    let mut mesh = Mesh::new();
    let (hx, hz) = (width * 0.5, height * 0.5);
    let corners = [
        (Vec3::new(-hx, 0.0, -hz), [0.0, 0.0]),
        (Vec3::new(hx, 0.0, -hz), [1.0, 0.0]),
        (Vec3::new(hx, 0.0, hz), [1.0, 1.0]),
        (Vec3::new(-hx, 0.0, hz), [0.0, 1.0]),
    ];
    for (position, uv) in corners {
        mesh.vertices.push(Vertex::new(position, Vec3::Y, uv));
    }
    mesh.push_quad(0, 3, 2, 1);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!((a - b).abs().max_element() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_box_bounds_and_counts() {
        let mesh = generate_box(1.0, 2.0, 3.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        let bounds = mesh.bounds().unwrap();
        assert_vec_near(bounds.size(), Vec3::new(1.0, 2.0, 3.0));
        assert_vec_near(bounds.center(), Vec3::ZERO);
    }

    #[test]
    fn test_cylinder_bounds() {
        let mesh = generate_cylinder(1.0, 1.0, 2.0, 24);
        let bounds = mesh.bounds().unwrap();
        assert_vec_near(bounds.size(), Vec3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn test_cone_has_single_cap() {
        let cone = generate_cylinder(0.0, 0.1, 0.2, 12);
        let cylinder = generate_cylinder(0.1, 0.1, 0.2, 12);
        assert_eq!(cylinder.triangle_count() - cone.triangle_count(), 12);
    }

    #[test]
    fn test_icosphere_triangle_count_and_radius() {
        for n in 1..=4 {
            let mesh = generate_icosphere(0.75, n);
            assert_eq!(mesh.triangle_count() as u32, 20 * n * n);
            for v in &mesh.vertices {
                let len = Vec3::from_array(v.position).length();
                assert!((len - 0.75).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_icosphere_zero_subdivisions_treated_as_one() {
        assert_eq!(generate_icosphere(1.0, 0).triangle_count(), 20);
    }

    #[test]
    fn test_torus_lies_in_xz() {
        let mesh = generate_torus(1.0, 0.05, 30);
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.size().x - 1.05).abs() < 1e-3);
        assert!((bounds.size().y - 0.05).abs() < 1e-3);
    }

    #[test]
    fn test_ground_is_flat() {
        let bounds = generate_ground(10.0, 4.0).bounds().unwrap();
        assert_vec_near(bounds.size(), Vec3::new(10.0, 0.0, 4.0));
    }

    #[test]
    fn test_aabb_transformed_by_rotation() {
        let bounds = Aabb::new(Vec3::new(-1.0, -0.5, -0.25), Vec3::new(1.0, 0.5, 0.25));
        let rotated = bounds.transformed(&Mat4::from_rotation_z(PI / 2.0));
        assert_vec_near(rotated.size(), Vec3::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn test_vertex_bytes_length() {
        let mesh = generate_box(1.0, 1.0, 1.0);
        assert_eq!(mesh.vertex_bytes().len(), mesh.vertices.len() * 32);
    }
}
