//! Shader programs and generated lighting shaders
//!
//! Shaders are written in WGSL. Sources are parsed and validated with
//! naga at load time, so a [`ShaderProgram`] in hand is known to be a
//! well-formed module with its entry points resolved. Scene preparation
//! uses [`generate_program`] to build a lighting shader matching each
//! material and the number of lights in the scene; hand-written programs
//! can be attached to a material instead via
//! [`crate::scene::Material::set_shader`].

mod codegen;

use std::rc::Rc;

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

pub use codegen::lighting_source;

use crate::error::{Error, Result};
use crate::scene::{LightingModel, Material};

/// A validated shader program.
///
/// Cheap to clone; clones share the underlying module data.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    inner: Rc<ProgramData>,
}

#[derive(Debug)]
struct ProgramData {
    label: String,
    source: String,
    entry_points: Vec<String>,
}

impl ShaderProgram {
    /// Parses and validates a WGSL module.
    ///
    /// The label only serves to identify the program in errors and logs.
    pub fn compile(label: &str, source: &str) -> Result<Self> {
        let module = wgsl::parse_str(source).map_err(|e| Error::Compile {
            label: label.to_string(),
            diagnostics: e.emit_to_string(source),
        })?;

        let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
        validator.validate(&module).map_err(|e| Error::Compile {
            label: label.to_string(),
            diagnostics: format!("{:?}", e),
        })?;

        let entry_points = module
            .entry_points
            .iter()
            .map(|entry| entry.name.clone())
            .collect();
        log::debug!("compiled shader '{}' ({} bytes)", label, source.len());

        Ok(Self {
            inner: Rc::new(ProgramData {
                label: label.to_string(),
                source: source.to_string(),
                entry_points,
            }),
        })
    }

    /// Identifying label given at compile time
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// The WGSL source this program was compiled from
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    /// Names of the module's entry points
    pub fn entry_points(&self) -> &[String] {
        &self.inner.entry_points
    }

    /// Whether the module declares the named entry point
    pub fn has_entry_point(&self, name: &str) -> bool {
        self.inner.entry_points.iter().any(|entry| entry == name)
    }
}

/// Builds and compiles the lighting shader for a material.
///
/// Materials with lighting disabled, and scenes without lights, get the
/// flat emission shader; everything else gets the full lighting loop
/// with `light_count` baked in.
pub fn generate_program(material: &Material, light_count: usize) -> Result<ShaderProgram> {
    let lit = material.lights_enabled && light_count > 0;
    let label = if lit {
        match material.lighting_model {
            LightingModel::Phong => format!("phong-{}-lights", light_count),
            LightingModel::BlinnPhong => format!("blinn-phong-{}-lights", light_count),
        }
    } else {
        "unlit".to_string()
    };
    let source = lighting_source(material.lighting_model, lit, light_count);
    ShaderProgram::compile(&label, &source)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_SHADER: &str = r#"
        @vertex
        fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(pos, 1.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    "#;

    #[test]
    fn test_compile_valid_source() {
        let program = ShaderProgram::compile("triangle", TRIANGLE_SHADER).unwrap();

        assert_eq!(program.label(), "triangle");
        assert!(program.has_entry_point("vs_main"));
        assert!(program.has_entry_point("fs_main"));
    }

    #[test]
    fn test_compile_rejects_invalid_source() {
        let result = ShaderProgram::compile("broken", "not wgsl at all { } }");

        match result {
            Err(Error::Compile { label, .. }) => assert_eq!(label, "broken"),
            other => panic!("expected a compile error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_generated_unlit_program() {
        let material = Material::new();

        let program = generate_program(&material, 0).unwrap();

        assert_eq!(program.label(), "unlit");
        assert!(program.has_entry_point("fs_main"));
    }

    #[test]
    fn test_generated_lighting_programs_validate() {
        for light_count in 1..=3 {
            for preset in [Material::gold(), Material::ruby(), Material::jade()] {
                let mut material = preset;
                material.lights_enabled = true;

                material.lighting_model = LightingModel::Phong;
                let phong = generate_program(&material, light_count).unwrap();
                assert_eq!(phong.label(), format!("phong-{}-lights", light_count));

                material.lighting_model = LightingModel::BlinnPhong;
                let blinn = generate_program(&material, light_count).unwrap();
                assert_eq!(blinn.label(), format!("blinn-phong-{}-lights", light_count));
            }
        }
    }

    #[test]
    fn test_lit_material_without_lights_falls_back_to_unlit() {
        let mut material = Material::gold();
        material.lights_enabled = true;

        let program = generate_program(&material, 0).unwrap();

        assert_eq!(program.label(), "unlit");
    }

    #[test]
    fn test_clones_share_module() {
        let program = ShaderProgram::compile("triangle", TRIANGLE_SHADER).unwrap();
        let clone = program.clone();

        assert_eq!(program.source(), clone.source());
    }
}
