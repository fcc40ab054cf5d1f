//! Procedural generators for common 3D shapes
//!
//! All generators return a plain [`Mesh`]. Shapes that have an obvious
//! smooth or flat normal (cube, sphere, plane, icosphere) come with
//! normals filled in; the raw polyhedra ship positions only, leaving the
//! choice between faceted and radial normals to the caller via
//! [`Mesh::calc_face_normals`] and [`Mesh::calc_normals`].

use std::f32::consts::PI;

use cgmath::{ElementWise, Vector3, Zero};

use super::{triangulate_polygon, Mesh};

/// The golden ratio, vertex coordinate of the regular dodecahedron and
/// icosahedron.
const PHI: f32 = 1.618_034;
/// Reciprocal of the golden ratio.
const INV_PHI: f32 = 0.618_034;

/// Generate a regular tetrahedron
///
/// Vertices sit on alternating corners of the 2x2x2 cube, so the edge
/// length is `2 * sqrt(2)`. No normals are generated.
pub fn tetrahedron() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.positions = vec![
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(1.0, -1.0, -1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(-1.0, -1.0, 1.0),
    ];
    mesh.indices = vec![0, 1, 2, 0, 2, 3, 0, 3, 1, 1, 3, 2];
    mesh
}

/// Generate an axis-aligned cube spanning -1.0 to 1.0 on every axis
///
/// Each corner is emitted three times, once per incident face, so the
/// normals stay flat across each face.
///
/// # Returns
/// `Mesh` with 24 vertices and 36 indices (12 triangles)
pub fn cube() -> Mesh {
    let corners = [
        Vector3::new(-1.0, -1.0, -1.0),
        Vector3::new(-1.0, -1.0, 1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(-1.0, 1.0, 1.0),
        Vector3::new(1.0, -1.0, -1.0),
        Vector3::new(1.0, -1.0, 1.0),
        Vector3::new(1.0, 1.0, -1.0),
        Vector3::new(1.0, 1.0, 1.0),
    ];

    // Corner indices for each pair of opposing faces, grouped by the axis
    // the faces are perpendicular to
    let face_groups: [[u32; 12]; 3] = [
        [0, 1, 2, 1, 3, 2, 4, 6, 5, 5, 6, 7], // left, right
        [0, 4, 1, 1, 4, 5, 3, 7, 6, 2, 3, 6], // bottom, top
        [0, 2, 4, 2, 6, 4, 1, 5, 3, 5, 7, 3], // back, front
    ];

    let mut mesh = Mesh::new();
    for corner in &corners {
        for axis in 0..3 {
            mesh.positions.push(*corner);
            let mut normal = Vector3::zero();
            normal[axis] = corner[axis];
            mesh.normals.push(normal);
        }
    }
    for (axis, group) in face_groups.iter().enumerate() {
        for &corner in group {
            mesh.indices.push(corner * 3 + axis as u32);
        }
    }
    mesh
}

/// Generate an axis-aligned box with the given edge lengths
///
/// # Arguments
/// * `x`, `y`, `z` - Full extent along each axis, centered at the origin
pub fn cuboid(x: f32, y: f32, z: f32) -> Mesh {
    let half_extent = Vector3::new(x, y, z) / 2.0;
    let mut mesh = cube();
    for position in &mut mesh.positions {
        *position = position.mul_element_wise(half_extent);
    }
    mesh
}

/// Generate a regular octahedron with vertices on the unit axes
///
/// No normals are generated.
pub fn octahedron() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.positions = vec![
        Vector3::new(-1.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, -1.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(0.0, 0.0, -1.0),
        Vector3::new(0.0, 0.0, 1.0),
    ];
    mesh.indices = vec![
        0, 4, 2, 1, 2, 4, 2, 5, 0, 1, 5, 2, //
        0, 3, 4, 1, 4, 3, 0, 5, 3, 1, 3, 5,
    ];
    mesh
}

/// Generate a regular dodecahedron
///
/// The twelve pentagonal faces are triangulated with
/// [`triangulate_polygon`], giving 36 triangles over 20 vertices.
/// No normals are generated.
pub fn dodecahedron() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.positions = vec![
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(1.0, 1.0, -1.0),
        Vector3::new(1.0, -1.0, 1.0),
        Vector3::new(1.0, -1.0, -1.0),
        Vector3::new(-1.0, 1.0, 1.0),
        Vector3::new(-1.0, 1.0, -1.0),
        Vector3::new(-1.0, -1.0, 1.0),
        Vector3::new(-1.0, -1.0, -1.0),
        Vector3::new(0.0, INV_PHI, PHI),
        Vector3::new(0.0, INV_PHI, -PHI),
        Vector3::new(0.0, -INV_PHI, PHI),
        Vector3::new(0.0, -INV_PHI, -PHI),
        Vector3::new(INV_PHI, PHI, 0.0),
        Vector3::new(INV_PHI, -PHI, 0.0),
        Vector3::new(-INV_PHI, PHI, 0.0),
        Vector3::new(-INV_PHI, -PHI, 0.0),
        Vector3::new(PHI, 0.0, INV_PHI),
        Vector3::new(PHI, 0.0, -INV_PHI),
        Vector3::new(-PHI, 0.0, INV_PHI),
        Vector3::new(-PHI, 0.0, -INV_PHI),
    ];

    let pentagons: [[u32; 5]; 12] = [
        [0, 16, 2, 10, 8],
        [0, 8, 4, 14, 12],
        [16, 17, 1, 12, 0],
        [1, 9, 11, 3, 17],
        [1, 12, 14, 5, 9],
        [2, 13, 15, 6, 10],
        [13, 3, 17, 16, 2],
        [3, 11, 7, 15, 13],
        [4, 8, 10, 6, 18],
        [14, 5, 19, 18, 4],
        [5, 19, 7, 11, 9],
        [15, 7, 19, 18, 6],
    ];
    for pentagon in &pentagons {
        mesh.indices.extend(triangulate_polygon(pentagon));
    }
    mesh
}

/// Generate a regular icosahedron
///
/// Vertices lie on three mutually perpendicular golden rectangles. The
/// circumradius is `sqrt(1 + PHI^2)`, about 1.902. No normals are
/// generated.
pub fn icosahedron() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.positions = vec![
        Vector3::new(0.0, PHI, 1.0),
        Vector3::new(0.0, PHI, -1.0),
        Vector3::new(0.0, -PHI, 1.0),
        Vector3::new(0.0, -PHI, -1.0),
        Vector3::new(1.0, 0.0, PHI),
        Vector3::new(-1.0, 0.0, PHI),
        Vector3::new(1.0, 0.0, -PHI),
        Vector3::new(-1.0, 0.0, -PHI),
        Vector3::new(PHI, 1.0, 0.0),
        Vector3::new(PHI, -1.0, 0.0),
        Vector3::new(-PHI, 1.0, 0.0),
        Vector3::new(-PHI, -1.0, 0.0),
    ];
    mesh.indices = vec![
        0, 1, 8, 0, 4, 5, 0, 5, 10, 0, 8, 4, 0, 10, 1, //
        1, 6, 8, 1, 7, 6, 1, 10, 7, 2, 3, 11, 2, 4, 9, //
        2, 5, 4, 2, 9, 3, 2, 11, 5, 3, 6, 7, 3, 7, 11, //
        3, 9, 6, 4, 8, 9, 5, 11, 10, 6, 9, 8, 7, 10, 11,
    ];
    mesh
}

/// Generate a unit-radius UV sphere with poles on the Z axis
///
/// # Arguments
/// * `sectors` - Number of longitudinal slices, clamped to at least 3
/// * `stacks` - Number of latitudinal rings, clamped to at least 2
///
/// # Returns
/// `Mesh` with `(sectors + 1) * (stacks + 1)` vertices and
/// `2 * sectors * (stacks - 1)` triangles. Normals equal the positions.
pub fn sphere(sectors: u32, stacks: u32) -> Mesh {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);
    let mut mesh = Mesh::new();

    // Generate vertices ring by ring, from the +Z pole down
    let sector_step = 2.0 * PI / sectors as f32;
    for i in 0..=stacks {
        let stack_angle = PI * (0.5 - i as f32 / stacks as f32);
        let ring_radius = stack_angle.cos();
        let z = stack_angle.sin();
        for j in 0..=sectors {
            let sector_angle = j as f32 * sector_step;
            let position = Vector3::new(
                ring_radius * sector_angle.cos(),
                ring_radius * sector_angle.sin(),
                z,
            );
            mesh.positions.push(position);
            mesh.normals.push(position);
        }
    }

    // Two triangles per quad, except at the poles where the quads collapse
    for i in 0..stacks {
        let mut k1 = i * (sectors + 1);
        let mut k2 = k1 + sectors + 1;
        for _ in 0..sectors {
            if i != 0 {
                mesh.indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            if i != stacks - 1 {
                mesh.indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
            k1 += 1;
            k2 += 1;
        }
    }
    mesh
}

/// Generate a unit-radius sphere by refining an icosahedron
///
/// Every iteration splits each triangle into four and reprojects the
/// vertices onto the sphere, so the triangle count is `20 * 4^iterations`.
/// Triangles are close to equilateral everywhere, unlike [`sphere`] which
/// crowds vertices at the poles. Normals equal the positions.
pub fn icosphere(iterations: u32) -> Mesh {
    let mut mesh = icosahedron();
    mesh.subdivide_faces(iterations);
    mesh.normalize_vertices(1.0);
    mesh.normals = mesh.positions.clone();
    mesh
}

/// Generate a capped cylinder around the Y axis
///
/// # Arguments
/// * `radius` - Radius of the tube and caps
/// * `height` - Full height, centered at the origin
/// * `sectors` - Number of side strips, clamped to at least 3
pub fn cylinder(radius: f32, height: f32, sectors: u32) -> Mesh {
    // TODO: generate side and cap normals
    let sectors = sectors.max(3);
    let mut mesh = Mesh::new();
    let step = 2.0 * PI / sectors as f32;
    let half_height = height / 2.0;
    let mut lower_rim = Vec::with_capacity(sectors as usize);
    let mut upper_rim = Vec::with_capacity(sectors as usize);

    for i in 0..sectors {
        let angle = i as f32 * step;
        let x = angle.cos() * radius;
        let z = angle.sin() * radius;
        mesh.positions.push(Vector3::new(x, -half_height, z));
        mesh.positions.push(Vector3::new(x, half_height, z));
        if i > 0 {
            mesh.indices.extend_from_slice(&[
                2 * (i - 1),
                2 * i + 1,
                2 * (i - 1) + 1,
                2 * (i - 1),
                2 * i,
                2 * i + 1,
            ]);
        }
        lower_rim.push(2 * i);
        upper_rim.push(2 * i + 1);
    }

    // Close the tube between the last strip and the first
    mesh.indices.extend_from_slice(&[
        2 * (sectors - 1),
        1,
        2 * (sectors - 1) + 1,
        2 * (sectors - 1),
        0,
        1,
    ]);

    mesh.indices.extend(triangulate_polygon(&lower_rim));
    mesh.indices.extend(triangulate_polygon(&upper_rim));
    mesh
}

/// Generate a flat rectangle in the XZ plane, facing +Y
///
/// # Arguments
/// * `x`, `z` - Full extent along each axis, centered at the origin
pub fn plane(x: f32, z: f32) -> Mesh {
    let half_x = x / 2.0;
    let half_z = z / 2.0;
    let mut mesh = Mesh::new();
    mesh.positions = vec![
        Vector3::new(-half_x, 0.0, -half_z),
        Vector3::new(-half_x, 0.0, half_z),
        Vector3::new(half_x, 0.0, -half_z),
        Vector3::new(half_x, 0.0, half_z),
    ];
    mesh.normals = vec![Vector3::unit_y(); 4];
    mesh.indices = vec![0, 1, 2, 1, 3, 2];
    mesh
}

/// Generate a subdivided plane in the XZ plane with unit-sized cells
///
/// Useful as a base mesh for heightfield-style vertex displacement.
/// No normals are generated.
///
/// # Arguments
/// * `columns` - Cell count along X, clamped to at least 1
/// * `rows` - Cell count along Z, clamped to at least 1
pub fn tessellated_plane(columns: u32, rows: u32) -> Mesh {
    let columns = columns.max(1);
    let rows = rows.max(1);
    let mut mesh = Mesh::new();
    let half_x = columns as f32 / 2.0;
    let half_z = rows as f32 / 2.0;

    for i in 0..=columns {
        for j in 0..=rows {
            mesh.positions
                .push(Vector3::new(i as f32 - half_x, 0.0, j as f32 - half_z));
        }
    }

    let row_stride = rows + 1;
    for i in 0..columns {
        for j in 0..rows {
            let a = i * row_stride + j;
            let b = a + 1;
            let c = (i + 1) * row_stride + j;
            let d = c + 1;
            mesh.indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    mesh
}
