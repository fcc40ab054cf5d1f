//! WGSL source generation for the classic lighting model
//!
//! The generated module carries one uniform block with the matrices,
//! material channels and a fixed-size light array; the light count is
//! baked into the source, so scenes regenerate shaders when their light
//! census changes.

use crate::scene::LightingModel;

const LIGHT_STRUCT: &str = r#"struct Light {
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    position: vec4<f32>,
    spot_direction: vec4<f32>,
    attenuation: vec4<f32>,
}

"#;

const UNIFORMS_HEAD: &str = r#"struct Uniforms {
    mvp: mat4x4<f32>,
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    camera_position: vec4<f32>,
    emission: vec4<f32>,
"#;

const UNIFORMS_MATERIAL: &str = r#"    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
    params: vec4<f32>,
"#;

const VERTEX_STAGE: &str = r#"@group(0) @binding(0)
var<uniform> u: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = u.mvp * vec4<f32>(in.position, 1.0);
    out.world_position = (u.model * vec4<f32>(in.position, 1.0)).xyz;
    out.normal = (u.normal_matrix * vec4<f32>(in.normal, 0.0)).xyz;
    return out;
}

"#;

const FRAGMENT_UNLIT: &str = r#"@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return u.emission;
}
"#;

const FRAGMENT_LIT_HEAD: &str = r#"@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.normal);
    let view_dir = normalize(u.camera_position.xyz - in.world_position);
    var result = vec4<f32>(0.0);
"#;

const FRAGMENT_LIGHT_LOOP: &str = r#"        let light = u.lights[i];
        var light_dir: vec3<f32>;
        if light.position.w == 0.0 {
            light_dir = normalize(-light.position.xyz);
        } else {
            light_dir = normalize(light.position.xyz - in.world_position);
        }
        var spot = 1.0;
        if light.attenuation.w >= 0.0 {
            let spot_cos = dot(light_dir, -normalize(light.spot_direction.xyz));
            if spot_cos >= light.attenuation.w {
                spot = pow(spot_cos, light.spot_direction.w);
            } else {
                spot = 0.0;
            }
        }
        if light.position.w == 1.0 {
            let d = distance(light.position.xyz, in.world_position);
            spot = spot / (light.attenuation.x + d * (light.attenuation.y + d * light.attenuation.z));
        }
        let diffuse_angle = max(dot(normal, light_dir), 0.0);
"#;

const SPECULAR_PHONG: &str =
    "        let spec_angle = max(dot(view_dir, reflect(-light_dir, normal)), 0.0);\n";

const SPECULAR_BLINN: &str =
    "        let spec_angle = max(dot(normal, normalize(light_dir + view_dir)), 0.0);\n";

const FRAGMENT_LIT_TAIL: &str = r#"        result = result + spot * (light.ambient * u.ambient
            + diffuse_angle * light.diffuse * u.diffuse
            + pow(spec_angle, u.params.x) * light.specular * u.specular);
    }
    return u.emission + result;
}
"#;

/// Builds the WGSL source for a material's lighting setup.
///
/// With `lit` false or no lights the module reduces to the flat emission
/// shader; the light array and loop are only emitted when they will be
/// used. Uniform fields:
///
/// - `params.x` is the shininess exponent
/// - `Light.position.w` is 1 for point lights and 0 for directional ones
/// - `Light.spot_direction.w` is the spot exponent
/// - `Light.attenuation` packs the constant, linear and quadratic
///   coefficients with the spot cosine cutoff in `w`
pub fn lighting_source(model: LightingModel, lit: bool, light_count: usize) -> String {
    let mut source = String::new();

    if !lit || light_count == 0 {
        source.push_str(UNIFORMS_HEAD);
        source.push_str("}\n\n");
        source.push_str(VERTEX_STAGE);
        source.push_str(FRAGMENT_UNLIT);
        return source;
    }

    source.push_str(LIGHT_STRUCT);
    source.push_str(UNIFORMS_HEAD);
    source.push_str(UNIFORMS_MATERIAL);
    source.push_str(&format!("    lights: array<Light, {}>,\n}}\n\n", light_count));
    source.push_str(VERTEX_STAGE);
    source.push_str(FRAGMENT_LIT_HEAD);
    source.push_str(&format!(
        "    for (var i = 0; i < {}; i = i + 1) {{\n",
        light_count
    ));
    source.push_str(FRAGMENT_LIGHT_LOOP);
    source.push_str(match model {
        LightingModel::Phong => SPECULAR_PHONG,
        LightingModel::BlinnPhong => SPECULAR_BLINN,
    });
    source.push_str(FRAGMENT_LIT_TAIL);
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_count_is_baked_into_source() {
        let source = lighting_source(LightingModel::Phong, true, 4);

        assert!(source.contains("array<Light, 4>"));
        assert!(source.contains("i < 4"));
    }

    #[test]
    fn test_unlit_source_has_no_light_array() {
        let source = lighting_source(LightingModel::Phong, false, 4);

        assert!(!source.contains("struct Light"));
        assert!(source.contains("return u.emission;"));
    }

    #[test]
    fn test_specular_term_follows_lighting_model() {
        let phong = lighting_source(LightingModel::Phong, true, 1);
        let blinn = lighting_source(LightingModel::BlinnPhong, true, 1);

        assert!(phong.contains("reflect(-light_dir, normal)"));
        assert!(blinn.contains("normalize(light_dir + view_dir)"));
    }
}
