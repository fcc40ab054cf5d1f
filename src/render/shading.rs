//! Per-fragment lighting
//!
//! Evaluates the same Phong and Blinn-Phong model the generated shaders
//! describe, so CPU output matches what a GPU backend running those
//! shaders would produce. Lights are expected in world space, already
//! transformed by their carrier entity.

use cgmath::{ElementWise, InnerSpace, Vector3, Vector4};

use crate::scene::{Light, LightKind, LightingModel, Material};

fn safe_normalize(v: Vector3<f32>) -> Vector3<f32> {
    if v.magnitude2() > 0.0 {
        v.normalize()
    } else {
        v
    }
}

fn reflect(incident: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * incident.dot(normal))
}

/// Shades one fragment.
///
/// With lighting disabled (or no lights in range) the result is the
/// material emission alone. Otherwise each light contributes ambient,
/// diffuse and specular terms scaled by its spot cone and attenuation,
/// and the sum is added to the emission.
pub(crate) fn shade(
    material: &Material,
    position: Vector3<f32>,
    normal: Vector3<f32>,
    camera_position: Vector3<f32>,
    lights: &[Light],
) -> Vector4<f32> {
    if !material.lights_enabled || lights.is_empty() {
        return material.emission;
    }

    let view_dir = safe_normalize(camera_position - position);
    let mut result = Vector4::new(0.0, 0.0, 0.0, 0.0);

    for light in lights {
        // Positional lights aim from the fragment toward the light,
        // directional lights aim against their travel direction.
        let (light_dir, distance) = match light.kind {
            LightKind::Point => {
                let to_light = light.position - position;
                (safe_normalize(to_light), to_light.magnitude())
            }
            LightKind::Directional => (safe_normalize(-light.position), 0.0),
        };

        let mut strength = 1.0;
        if light.spot_cos_cutoff >= 0.0 {
            let spot_cos = light_dir.dot(safe_normalize(-light.spot_direction));
            strength = if spot_cos >= light.spot_cos_cutoff {
                spot_cos.powf(light.spot_exponent)
            } else {
                0.0
            };
        }
        if light.kind == LightKind::Point {
            let attenuation = light.constant_attenuation
                + distance * (light.linear_attenuation + distance * light.quadratic_attenuation);
            if attenuation > 0.0 {
                strength /= attenuation;
            }
        }

        let diffuse_angle = normal.dot(light_dir).max(0.0);
        let specular_angle = match material.lighting_model {
            LightingModel::Phong => view_dir.dot(reflect(-light_dir, normal)).max(0.0),
            LightingModel::BlinnPhong => {
                normal.dot(safe_normalize(light_dir + view_dir)).max(0.0)
            }
        };

        result += (light.ambient.mul_element_wise(material.ambient)
            + light.diffuse.mul_element_wise(material.diffuse) * diffuse_angle
            + light.specular.mul_element_wise(material.specular)
                * specular_angle.powf(material.shininess))
            * strength;
    }

    material.emission + result
}
