//! Triangle rasterization
//!
//! Transforms mesh triangles through model and view-projection
//! matrices, clips them against the near plane and scan-converts them
//! with a depth test. Attributes are interpolated perspective-correct;
//! shading runs per fragment in world space.

use cgmath::{InnerSpace, Matrix4, Vector2, Vector3};

use crate::geometry::{normal_matrix, Mesh};
use crate::render::framebuffer::{rgba8, Framebuffer};
use crate::render::shading::shade;
use crate::scene::{Light, Material};

/// Vertex after the vertex stage, before the perspective divide
#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    clip: cgmath::Vector4<f32>,
    world: Vector3<f32>,
    normal: Vector3<f32>,
}

const NEAR_EPSILON: f32 = 1e-6;

/// Draws every triangle of a mesh into the framebuffer.
///
/// Lights and the camera position are expected in world space. Meshes
/// without normals are shaded with a per-face normal turned toward the
/// camera.
pub(crate) fn draw_mesh(
    fb: &mut Framebuffer,
    mesh: &Mesh,
    world: &Matrix4<f32>,
    view_projection: &Matrix4<f32>,
    material: &Material,
    lights: &[Light],
    camera_position: Vector3<f32>,
) {
    let mvp = view_projection * world;
    let normal_mat = normal_matrix(world);
    let has_normals = mesh.has_normals();

    let corner = |index: u32| {
        let position = mesh.positions[index as usize];
        let normal = if has_normals {
            (normal_mat * mesh.normals[index as usize].extend(0.0)).truncate()
        } else {
            Vector3::new(0.0, 0.0, 0.0)
        };
        ClipVertex {
            clip: mvp * position.extend(1.0),
            world: (world * position.extend(1.0)).truncate(),
            normal,
        }
    };

    for triangle in mesh.indices.chunks_exact(3) {
        let corners = [corner(triangle[0]), corner(triangle[1]), corner(triangle[2])];

        let face_normal = if has_normals {
            None
        } else {
            let cross = (corners[1].world - corners[0].world)
                .cross(corners[2].world - corners[0].world);
            let normal = if cross.magnitude2() > 0.0 {
                cross.normalize()
            } else {
                Vector3::unit_y()
            };
            // the face has no intrinsic orientation, so aim it at the viewer
            if normal.dot(camera_position - corners[0].world) < 0.0 {
                Some(-normal)
            } else {
                Some(normal)
            }
        };

        let clipped = clip_near(&corners);
        if clipped.len() < 3 {
            continue;
        }
        for i in 1..clipped.len() - 1 {
            rasterize_triangle(
                fb,
                material,
                lights,
                camera_position,
                [clipped[0], clipped[i], clipped[i + 1]],
                face_normal,
            );
        }
    }
}

/// Clips a triangle against the near plane `z + w > 0`, returning the
/// surviving polygon with up to four vertices
fn clip_near(corners: &[ClipVertex; 3]) -> Vec<ClipVertex> {
    let boundary = |v: &ClipVertex| v.clip.z + v.clip.w;
    if corners.iter().all(|v| boundary(v) > NEAR_EPSILON) {
        return corners.to_vec();
    }

    let mut polygon = Vec::with_capacity(4);
    for i in 0..3 {
        let current = &corners[i];
        let next = &corners[(i + 1) % 3];
        let current_inside = boundary(current) > NEAR_EPSILON;
        let next_inside = boundary(next) > NEAR_EPSILON;
        if current_inside {
            polygon.push(*current);
        }
        if current_inside != next_inside {
            let from = boundary(current);
            let to = boundary(next);
            polygon.push(lerp_vertex(current, next, from / (from - to)));
        }
    }
    polygon
}

fn lerp_vertex(a: &ClipVertex, b: &ClipVertex, t: f32) -> ClipVertex {
    ClipVertex {
        clip: a.clip + (b.clip - a.clip) * t,
        world: a.world + (b.world - a.world) * t,
        normal: a.normal + (b.normal - a.normal) * t,
    }
}

fn rasterize_triangle(
    fb: &mut Framebuffer,
    material: &Material,
    lights: &[Light],
    camera_position: Vector3<f32>,
    corners: [ClipVertex; 3],
    face_normal: Option<Vector3<f32>>,
) {
    let project = |v: &ClipVertex| {
        let inv_w = 1.0 / v.clip.w;
        let screen = Vector2::new(
            (v.clip.x * inv_w + 1.0) * 0.5 * fb.width() as f32,
            (1.0 - v.clip.y * inv_w) * 0.5 * fb.height() as f32,
        );
        (screen, v.clip.z * inv_w, inv_w)
    };
    let (p0, z0, w0) = project(&corners[0]);
    let (p1, z1, w1) = project(&corners[1]);
    let (p2, z2, w2) = project(&corners[2]);

    // Signed doubled area. Dividing the edge functions by it makes the
    // inside test hold for either winding.
    let area = edge(p0, p1, p2);
    if area.abs() < 1e-12 {
        return;
    }

    let min_x = p0.x.min(p1.x).min(p2.x).floor().max(0.0) as u32;
    let min_y = p0.y.min(p1.y).min(p2.y).floor().max(0.0) as u32;
    let max_x = (p0.x.max(p1.x).max(p2.x).ceil().max(0.0) as u32).min(fb.width());
    let max_y = (p0.y.max(p1.y).max(p2.y).ceil().max(0.0) as u32).min(fb.height());

    for y in min_y..max_y {
        for x in min_x..max_x {
            let sample = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
            let b0 = edge(p1, p2, sample) / area;
            let b1 = edge(p2, p0, sample) / area;
            let b2 = edge(p0, p1, sample) / area;
            if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                continue;
            }

            let depth = b0 * z0 + b1 * z1 + b2 * z2;
            if !(-1.0..=1.0).contains(&depth) {
                continue;
            }

            // attribute interpolation happens in 1/w space
            let q0 = b0 * w0;
            let q1 = b1 * w1;
            let q2 = b2 * w2;
            let inv_w = q0 + q1 + q2;
            if inv_w <= 0.0 {
                continue;
            }
            let world =
                (corners[0].world * q0 + corners[1].world * q1 + corners[2].world * q2) / inv_w;
            let normal = match face_normal {
                Some(normal) => normal,
                None => {
                    let n = (corners[0].normal * q0
                        + corners[1].normal * q1
                        + corners[2].normal * q2)
                        / inv_w;
                    if n.magnitude2() > 0.0 {
                        n.normalize()
                    } else {
                        Vector3::unit_y()
                    }
                }
            };

            let color = shade(material, world, normal, camera_position, lights);
            fb.test_write(x, y, depth, rgba8(color));
        }
    }
}

fn edge(a: Vector2<f32>, b: Vector2<f32>, c: Vector2<f32>) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}
