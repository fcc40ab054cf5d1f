//! # Meshes and Procedural Geometry
//!
//! This module provides the [`Mesh`] container used by every entity in a
//! scene, plus utilities for refining and repairing geometry after it has
//! been generated or loaded.
//!
//! ## Supported Primitives
//!
//! See [`shapes`] for the full set of generators:
//!
//! - **Cube / Cuboid**: axis-aligned boxes with per-face normals
//! - **Sphere / Icosphere**: unit-radius spheres at configurable resolution
//! - **Platonic solids**: tetrahedron, octahedron, dodecahedron, icosahedron
//! - **Plane / Tessellated plane**: flat grids, normals facing +Y
//! - **Cylinder**: capped tube around the Y axis
//!
//! ## Usage
//!
//! ```rust
//! use cairn::geometry::shapes;
//!
//! // Unit-radius UV sphere with 32 sectors and 16 stacks
//! let sphere = shapes::sphere(32, 16);
//! assert!(sphere.has_normals());
//!
//! // Icosphere refined three times
//! let ball = shapes::icosphere(3);
//! assert_eq!(ball.triangle_count(), 20 * 4usize.pow(3));
//! ```

pub mod shapes;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cgmath::{InnerSpace, Matrix, Matrix4, SquareMatrix, Vector2, Vector3, Zero};

use crate::error::{Error, Result};

/// Shared handle to a mesh.
///
/// Entities hold their geometry through this handle, so several entities can
/// reference one mesh and see each other's geometry edits. Created with
/// [`Mesh::into_handle`] or by [`crate::scene::Entity::share`].
pub type MeshHandle = Rc<RefCell<Mesh>>;

/// Indexed triangle mesh.
///
/// Normals and texture coordinates are optional; when present they run
/// parallel to `positions`. Indices are triples of vertex indices, one
/// triple per triangle.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<Vector3<f32>>,
    /// Per-vertex normals, empty when the mesh has none
    pub normals: Vec<Vector3<f32>>,
    /// Per-vertex texture coordinates, empty when the mesh has none
    pub texcoords: Vec<Vector2<f32>>,
    /// Triangle indices into `positions`
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap this mesh in a shared handle
    pub fn into_handle(self) -> MeshHandle {
        Rc::new(RefCell::new(self))
    }

    /// Get the number of vertices in this mesh
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles in this mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether per-vertex normals are present
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Whether per-vertex texture coordinates are present
    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    /// Check that the mesh is internally consistent: indices come in
    /// triples, every index names an existing vertex, and optional
    /// attribute arrays match the vertex count.
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(Error::InvalidState(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let vertex_count = self.positions.len();
        if let Some(&out_of_range) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(Error::InvalidState(format!(
                "index {} out of range for {} vertices",
                out_of_range, vertex_count
            )));
        }
        if self.has_normals() && self.normals.len() != vertex_count {
            return Err(Error::InvalidState(format!(
                "{} normals for {} vertices",
                self.normals.len(),
                vertex_count
            )));
        }
        if self.has_texcoords() && self.texcoords.len() != vertex_count {
            return Err(Error::InvalidState(format!(
                "{} texture coordinates for {} vertices",
                self.texcoords.len(),
                vertex_count
            )));
        }
        Ok(())
    }

    /// Split every triangle into four by inserting edge midpoints.
    ///
    /// Midpoints are shared between the two triangles that meet at an edge,
    /// so the mesh stays watertight. Each iteration multiplies the triangle
    /// count by four. Normals and texture coordinates, when present, are
    /// averaged at the new vertices.
    pub fn subdivide_faces(&mut self, iterations: u32) {
        for _ in 0..iterations {
            self.subdivide_once();
        }
    }

    fn subdivide_once(&mut self) {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let old_indices = std::mem::take(&mut self.indices);
        let mut indices = Vec::with_capacity(old_indices.len() * 4);

        for tri in old_indices.chunks_exact(3) {
            let (a, b, c) = (tri[0], tri[1], tri[2]);
            let ab = self.midpoint(&mut midpoints, a, b);
            let bc = self.midpoint(&mut midpoints, b, c);
            let ca = self.midpoint(&mut midpoints, c, a);
            indices.extend_from_slice(&[a, ab, ca]);
            indices.extend_from_slice(&[b, bc, ab]);
            indices.extend_from_slice(&[c, ca, bc]);
            indices.extend_from_slice(&[ab, bc, ca]);
        }

        self.indices = indices;
    }

    /// Fetch or create the midpoint vertex of edge (a, b). The edge key is
    /// order-independent so both adjacent triangles reuse the same vertex.
    fn midpoint(&mut self, cache: &mut HashMap<(u32, u32), u32>, a: u32, b: u32) -> u32 {
        let key = (a.min(b), a.max(b));
        if let Some(&index) = cache.get(&key) {
            return index;
        }

        let index = self.positions.len() as u32;
        let mid = (self.positions[a as usize] + self.positions[b as usize]) * 0.5;
        self.positions.push(mid);
        if self.has_normals() {
            self.normals
                .push((self.normals[a as usize] + self.normals[b as usize]) * 0.5);
        }
        if self.has_texcoords() {
            self.texcoords
                .push((self.texcoords[a as usize] + self.texcoords[b as usize]) * 0.5);
        }

        cache.insert(key, index);
        index
    }

    /// Morph every vertex toward the unit sphere.
    ///
    /// With `t = 1.0` each vertex is projected fully onto the sphere, with
    /// `t = 0.0` the mesh is untouched, and values in between blend the two.
    /// Vertices at the origin are left in place.
    pub fn normalize_vertices(&mut self, t: f32) {
        for position in &mut self.positions {
            if position.magnitude2() > 0.0 {
                *position = position.normalize() * t + *position * (1.0 - t);
            }
        }
    }

    /// Generate normals pointing radially away from the mesh centroid.
    ///
    /// Good enough for convex shapes viewed from outside; for anything with
    /// concavities prefer [`Mesh::calc_face_normals`].
    pub fn calc_normals(&mut self) {
        let centroid = if self.positions.is_empty() {
            Vector3::zero()
        } else {
            self.positions
                .iter()
                .fold(Vector3::zero(), |sum, p| sum + p)
                / self.positions.len() as f32
        };

        self.normals = self
            .positions
            .iter()
            .map(|position| {
                let radial = position - centroid;
                if radial.magnitude2() > 0.0 {
                    radial.normalize()
                } else {
                    Vector3::unit_y()
                }
            })
            .collect();
    }

    /// Generate smooth normals by averaging the face normals around each
    /// vertex. Faces contribute proportionally to their area.
    pub fn calc_face_normals(&mut self) {
        self.normals = vec![Vector3::zero(); self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let edge1 = self.positions[b] - self.positions[a];
            let edge2 = self.positions[c] - self.positions[a];
            let face_normal = edge1.cross(edge2);
            self.normals[a] += face_normal;
            self.normals[b] += face_normal;
            self.normals[c] += face_normal;
        }

        for normal in &mut self.normals {
            *normal = if normal.magnitude2() > 0.0 {
                normal.normalize()
            } else {
                Vector3::unit_y()
            };
        }
    }

    /// Generate planar texture coordinates by projecting each position onto
    /// two axes: `u = dot(position, px)` and `v = dot(position, py)`.
    ///
    /// With `rescale` set, the result is shifted and scaled so both
    /// coordinates span `[0, 1]` over the mesh.
    pub fn calc_texture_coords(&mut self, px: Vector3<f32>, py: Vector3<f32>, rescale: bool) {
        self.texcoords = self
            .positions
            .iter()
            .map(|position| Vector2::new(position.dot(px), position.dot(py)))
            .collect();

        if rescale && !self.texcoords.is_empty() {
            let mut min = self.texcoords[0];
            let mut max = self.texcoords[0];
            for uv in &self.texcoords {
                min.x = min.x.min(uv.x);
                min.y = min.y.min(uv.y);
                max.x = max.x.max(uv.x);
                max.y = max.y.max(uv.y);
            }
            let span = max - min;
            for uv in &mut self.texcoords {
                uv.x = if span.x != 0.0 { (uv.x - min.x) / span.x } else { 0.0 };
                uv.y = if span.y != 0.0 { (uv.y - min.y) / span.y } else { 0.0 };
            }
        }
    }

    /// Bake a transform into the vertex data. Positions are multiplied by
    /// the matrix, normals by its inverse transpose.
    pub fn transform(&mut self, matrix: &Matrix4<f32>) {
        for position in &mut self.positions {
            *position = (matrix * position.extend(1.0)).truncate();
        }
        if self.has_normals() {
            let normal_mat = normal_matrix(matrix);
            for normal in &mut self.normals {
                let n = (normal_mat * normal.extend(0.0)).truncate();
                *normal = if n.magnitude2() > 0.0 { n.normalize() } else { n };
            }
        }
    }
}

/// Triangulate a convex polygon given as a loop of vertex indices.
///
/// Produces `n - 2` triangles that keep the winding of the input loop.
/// Each step cuts the ear at the front of the loop, then rotates so the
/// next cut starts two vertices along, walking the polygon in
/// alternating fashion.
pub fn triangulate_polygon(polygon: &[u32]) -> Vec<u32> {
    let mut remaining = polygon.to_vec();
    let mut indices = Vec::new();

    while remaining.len() > 2 {
        indices.extend_from_slice(&[remaining[0], remaining[1], remaining[2]]);
        remaining.remove(1);
        remaining.rotate_left(1);
    }

    indices
}

/// Inverse transpose of a transform, for carrying normals through it.
/// Falls back to the input when the matrix is singular.
pub(crate) fn normal_matrix(matrix: &Matrix4<f32>) -> Matrix4<f32> {
    matrix
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or(*matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subdivision_quadruples_faces() {
        let mut mesh = shapes::tetrahedron();
        let faces = mesh.triangle_count();

        mesh.subdivide_faces(2);

        assert_eq!(mesh.triangle_count(), faces * 16);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_subdivision_shares_edge_midpoints() {
        let mut mesh = shapes::tetrahedron();

        mesh.subdivide_faces(1);

        // 4 original vertices plus one midpoint per edge of the tetrahedron
        assert_eq!(mesh.vertex_count(), 4 + 6);
    }

    #[test]
    fn test_normalize_vertices_projects_onto_unit_sphere() {
        let mut mesh = shapes::cube();
        mesh.subdivide_faces(1);

        mesh.normalize_vertices(1.0);

        for position in &mesh.positions {
            assert!((position.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_normalize_vertices_half_morph() {
        let mut mesh = Mesh::new();
        mesh.positions.push(Vector3::new(2.0, 0.0, 0.0));

        mesh.normalize_vertices(0.5);

        assert!((mesh.positions[0].x - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_radial_normals_point_outward() {
        let mut mesh = shapes::cube();

        mesh.calc_normals();

        for (position, normal) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(position.dot(*normal) > 0.0);
            assert!((normal.magnitude() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_face_normals_on_flat_plane() {
        let mut mesh = shapes::plane(2.0, 2.0);
        mesh.normals.clear();

        mesh.calc_face_normals();

        for normal in &mesh.normals {
            assert!((normal.y - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_planar_texture_coords_rescaled() {
        let mut mesh = shapes::plane(4.0, 2.0);

        mesh.calc_texture_coords(Vector3::unit_x(), Vector3::unit_z(), true);

        for uv in &mesh.texcoords {
            assert!((0.0..=1.0).contains(&uv.x));
            assert!((0.0..=1.0).contains(&uv.y));
        }
    }

    #[test]
    fn test_triangulate_pentagon() {
        let triangles = triangulate_polygon(&[0, 1, 2, 3, 4]);

        assert_eq!(triangles, vec![0, 1, 2, 2, 3, 4, 4, 0, 2]);
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let mut mesh = shapes::cube();
        mesh.indices.push(99);
        mesh.indices.push(0);
        mesh.indices.push(1);

        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_transform_moves_positions_and_keeps_normals() {
        let mut mesh = shapes::plane(2.0, 2.0);

        mesh.transform(&Matrix4::from_translation(Vector3::new(0.0, 5.0, 0.0)));

        for position in &mesh.positions {
            assert!((position.y - 5.0).abs() < 1e-6);
        }
        for normal in &mesh.normals {
            assert!((normal.y - 1.0).abs() < 1e-6);
        }
    }
}
