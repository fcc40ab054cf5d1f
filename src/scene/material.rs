//! Material definitions for classic fixed-function style lighting
//!
//! A [`Material`] carries the four color channels of the traditional
//! lighting equation plus a shininess exponent. The predefined
//! constructors cover the well known table of gemstone, metal, plastic
//! and rubber materials, and materials can be blended with `+` (average)
//! or `*` (filter).

use std::ops::{Add, Mul};

use cgmath::{ElementWise, Vector4};

use crate::shader::ShaderProgram;

/// Specular model used when lighting a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightingModel {
    /// Classic Phong: specular from the reflection vector
    #[default]
    Phong,
    /// Blinn-Phong: specular from the halfway vector
    BlinnPhong,
}

/// Surface description for an entity
///
/// All color channels are RGBA. With lighting disabled only `emission`
/// is visible; with lighting enabled the emission is added on top of the
/// per-light ambient, diffuse and specular contributions.
#[derive(Debug, Clone)]
pub struct Material {
    /// Self-illumination, visible regardless of lights
    pub emission: Vector4<f32>,
    /// Response to ambient light
    pub ambient: Vector4<f32>,
    /// Response to direct light, scaled by incidence angle
    pub diffuse: Vector4<f32>,
    /// Highlight color
    pub specular: Vector4<f32>,
    /// Highlight exponent; higher is tighter
    pub shininess: f32,
    /// Whether lights affect this material at all
    pub lights_enabled: bool,
    /// Specular model to light with
    pub lighting_model: LightingModel,

    shader: Option<ShaderProgram>,
    custom_shader: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            emission: Vector4::new(1.0, 1.0, 1.0, 1.0),
            ambient: Vector4::new(1.0, 1.0, 1.0, 1.0),
            diffuse: Vector4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vector4::new(1.0, 1.0, 1.0, 1.0),
            shininess: 32.0,
            lights_enabled: false,
            lighting_model: LightingModel::Phong,
            shader: None,
            custom_shader: false,
        }
    }
}

impl Material {
    /// Creates a plain white material with lighting disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Set every color channel from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.set_color_rgba(r, g, b, 1.0);
        self
    }

    /// Builder pattern: Set the highlight exponent
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Builder pattern: Set the specular model
    pub fn with_lighting_model(mut self, model: LightingModel) -> Self {
        self.lighting_model = model;
        self
    }

    /// Sets emission, ambient, diffuse and specular to the same color.
    ///
    /// This is the canonical color setter; the `_rgba` and `_from`
    /// variants forward here.
    pub fn set_color(&mut self, color: Vector4<f32>) {
        self.emission = color;
        self.ambient = color;
        self.diffuse = color;
        self.specular = color;
    }

    /// Sets every color channel from individual components
    pub fn set_color_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.set_color(Vector4::new(r, g, b, a));
    }

    /// Copies every color channel from another material
    pub fn set_color_from(&mut self, other: &Material) {
        self.emission = other.emission;
        self.ambient = other.ambient;
        self.diffuse = other.diffuse;
        self.specular = other.specular;
    }

    /// Sets the emission channel
    pub fn set_emission(&mut self, color: Vector4<f32>) {
        self.emission = color;
    }

    /// Sets the ambient channel
    pub fn set_ambient(&mut self, color: Vector4<f32>) {
        self.ambient = color;
    }

    /// Sets the diffuse channel
    pub fn set_diffuse(&mut self, color: Vector4<f32>) {
        self.diffuse = color;
    }

    /// Sets the specular channel
    pub fn set_specular(&mut self, color: Vector4<f32>) {
        self.specular = color;
    }

    /// Attaches a hand-written shader program.
    ///
    /// Scene preparation leaves materials with a custom shader alone
    /// instead of generating one for them.
    pub fn set_shader(&mut self, shader: ShaderProgram) {
        self.shader = Some(shader);
        self.custom_shader = true;
    }

    /// The shader currently attached, custom or generated
    pub fn shader(&self) -> Option<&ShaderProgram> {
        self.shader.as_ref()
    }

    /// Whether the attached shader was supplied by the user
    pub fn has_custom_shader(&self) -> bool {
        self.custom_shader
    }

    /// Attach a generated program without claiming it as user-supplied.
    pub(crate) fn set_generated_shader(&mut self, shader: ShaderProgram) {
        self.shader = Some(shader);
        self.custom_shader = false;
    }

    /// Classic lit material from an ambient/diffuse/specular table row.
    /// Emission is black and lighting is left disabled until the scene
    /// enables it.
    fn classic(ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            emission: Vector4::new(0.0, 0.0, 0.0, 1.0),
            ambient: Vector4::new(ambient[0], ambient[1], ambient[2], 1.0),
            diffuse: Vector4::new(diffuse[0], diffuse[1], diffuse[2], 1.0),
            specular: Vector4::new(specular[0], specular[1], specular[2], 1.0),
            shininess,
            ..Self::default()
        }
    }

    pub fn emerald() -> Self {
        Self::classic(
            [0.0215, 0.1745, 0.0215],
            [0.07568, 0.61424, 0.07568],
            [0.633, 0.727811, 0.633],
            76.8,
        )
    }

    pub fn jade() -> Self {
        Self::classic(
            [0.135, 0.2225, 0.1575],
            [0.54, 0.89, 0.63],
            [0.316228, 0.316228, 0.316228],
            12.8,
        )
    }

    pub fn obsidian() -> Self {
        Self::classic(
            [0.05375, 0.05, 0.06625],
            [0.18275, 0.17, 0.22525],
            [0.332741, 0.328634, 0.346435],
            38.4,
        )
    }

    pub fn pearl() -> Self {
        Self::classic(
            [0.25, 0.20725, 0.20725],
            [1.0, 0.829, 0.829],
            [0.296648, 0.296648, 0.296648],
            11.264,
        )
    }

    pub fn ruby() -> Self {
        Self::classic(
            [0.1745, 0.01175, 0.01175],
            [0.61424, 0.04136, 0.04136],
            [0.727811, 0.626959, 0.626959],
            76.8,
        )
    }

    pub fn turquoise() -> Self {
        Self::classic(
            [0.1, 0.18725, 0.1745],
            [0.396, 0.74151, 0.69102],
            [0.297254, 0.30829, 0.306678],
            12.8,
        )
    }

    pub fn brass() -> Self {
        Self::classic(
            [0.329412, 0.223529, 0.027451],
            [0.780392, 0.568627, 0.113725],
            [0.992157, 0.941176, 0.807843],
            27.897_436,
        )
    }

    pub fn bronze() -> Self {
        Self::classic(
            [0.2125, 0.1275, 0.054],
            [0.714, 0.4284, 0.18144],
            [0.393548, 0.271906, 0.166721],
            25.6,
        )
    }

    pub fn chrome() -> Self {
        Self::classic(
            [0.25, 0.25, 0.25],
            [0.4, 0.4, 0.4],
            [0.774597, 0.774597, 0.774597],
            76.8,
        )
    }

    pub fn copper() -> Self {
        Self::classic(
            [0.19125, 0.0735, 0.0225],
            [0.7038, 0.27048, 0.0828],
            [0.256777, 0.137622, 0.086014],
            12.8,
        )
    }

    pub fn gold() -> Self {
        Self::classic(
            [0.24725, 0.1995, 0.0745],
            [0.75164, 0.60648, 0.22648],
            [0.628281, 0.555802, 0.366065],
            51.2,
        )
    }

    pub fn silver() -> Self {
        Self::classic(
            [0.19225, 0.19225, 0.19225],
            [0.50754, 0.50754, 0.50754],
            [0.508273, 0.508273, 0.508273],
            51.2,
        )
    }

    pub fn black_plastic() -> Self {
        Self::classic([0.0, 0.0, 0.0], [0.01, 0.01, 0.01], [0.5, 0.5, 0.5], 32.0)
    }

    pub fn cyan_plastic() -> Self {
        Self::classic(
            [0.0, 0.1, 0.06],
            [0.0, 0.509_803_92, 0.509_803_92],
            [0.501_960_78, 0.501_960_78, 0.501_960_78],
            32.0,
        )
    }

    pub fn green_plastic() -> Self {
        Self::classic([0.0, 0.0, 0.0], [0.1, 0.35, 0.1], [0.45, 0.55, 0.45], 32.0)
    }

    pub fn red_plastic() -> Self {
        Self::classic([0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.7, 0.6, 0.6], 32.0)
    }

    pub fn white_plastic() -> Self {
        Self::classic([0.0, 0.0, 0.0], [0.55, 0.55, 0.55], [0.7, 0.7, 0.7], 32.0)
    }

    pub fn yellow_plastic() -> Self {
        Self::classic([0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.6, 0.6, 0.5], 32.0)
    }

    pub fn black_rubber() -> Self {
        Self::classic([0.02, 0.02, 0.02], [0.01, 0.01, 0.01], [0.4, 0.4, 0.4], 10.0)
    }

    pub fn cyan_rubber() -> Self {
        Self::classic([0.0, 0.05, 0.05], [0.4, 0.5, 0.5], [0.04, 0.7, 0.7], 10.0)
    }

    pub fn green_rubber() -> Self {
        Self::classic([0.0, 0.05, 0.0], [0.4, 0.5, 0.4], [0.04, 0.7, 0.04], 10.0)
    }

    pub fn red_rubber() -> Self {
        Self::classic([0.05, 0.0, 0.0], [0.5, 0.4, 0.4], [0.7, 0.04, 0.04], 10.0)
    }

    pub fn white_rubber() -> Self {
        Self::classic([0.05, 0.05, 0.05], [0.5, 0.5, 0.5], [0.7, 0.7, 0.7], 10.0)
    }

    pub fn yellow_rubber() -> Self {
        Self::classic([0.05, 0.05, 0.0], [0.5, 0.5, 0.4], [0.7, 0.7, 0.04], 10.0)
    }
}

/// Averages the colors of two materials and takes the geometric mean of
/// their shininess. Everything else resets to defaults.
impl Add for Material {
    type Output = Material;

    fn add(self, rhs: Material) -> Material {
        Material {
            emission: (self.emission + rhs.emission) / 2.0,
            ambient: (self.ambient + rhs.ambient) / 2.0,
            diffuse: (self.diffuse + rhs.diffuse) / 2.0,
            specular: (self.specular + rhs.specular) / 2.0,
            shininess: (self.shininess * rhs.shininess).sqrt(),
            ..Material::default()
        }
    }
}

/// Multiplies the colors of two materials component-wise, filtering one
/// through the other, and takes the geometric mean of their shininess.
/// Everything else resets to defaults.
impl Mul for Material {
    type Output = Material;

    fn mul(self, rhs: Material) -> Material {
        Material {
            emission: self.emission.mul_element_wise(rhs.emission),
            ambient: self.ambient.mul_element_wise(rhs.ambient),
            diffuse: self.diffuse.mul_element_wise(rhs.diffuse),
            specular: self.specular.mul_element_wise(rhs.specular),
            shininess: (self.shininess * rhs.shininess).sqrt(),
            ..Material::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_color_sets_all_four_channels() {
        let color = Vector4::new(0.2, 0.4, 0.6, 1.0);
        let mut material = Material::new();

        material.set_color(color);

        assert_eq!(material.emission, color);
        assert_eq!(material.ambient, color);
        assert_eq!(material.diffuse, color);
        assert_eq!(material.specular, color);
    }

    #[test]
    fn test_color_setter_variants_agree() {
        let mut by_vector = Material::new();
        let mut by_components = Material::new();
        let mut by_copy = Material::new();

        by_vector.set_color(Vector4::new(0.2, 0.4, 0.6, 0.8));
        by_components.set_color_rgba(0.2, 0.4, 0.6, 0.8);
        by_copy.set_color_from(&by_vector);

        for other in [&by_components, &by_copy] {
            assert_eq!(by_vector.emission, other.emission);
            assert_eq!(by_vector.ambient, other.ambient);
            assert_eq!(by_vector.diffuse, other.diffuse);
            assert_eq!(by_vector.specular, other.specular);
        }
    }

    #[test]
    fn test_classic_presets_are_lit_table_rows() {
        let gold = Material::gold();

        assert_eq!(gold.emission, Vector4::new(0.0, 0.0, 0.0, 1.0));
        assert!((gold.ambient.x - 0.24725).abs() < 1e-6);
        assert!((gold.diffuse.y - 0.60648).abs() < 1e-6);
        assert!((gold.specular.z - 0.366065).abs() < 1e-6);
        assert_eq!(gold.shininess, 51.2);
        assert!(!gold.lights_enabled);
    }

    #[test]
    fn test_adding_materials_averages_colors() {
        let blend = Material::gold() + Material::silver();

        let expected_ambient = (0.24725 + 0.19225) / 2.0;
        assert!((blend.ambient.x - expected_ambient).abs() < 1e-6);
        assert!((blend.shininess - 51.2).abs() < 1e-4);
    }

    #[test]
    fn test_multiplying_materials_filters_colors() {
        let mut red = Material::new();
        red.set_color_rgba(1.0, 0.0, 0.0, 1.0);
        let mut gray = Material::new();
        gray.set_color_rgba(0.5, 0.5, 0.5, 1.0);

        let filtered = red * gray;

        assert_eq!(filtered.diffuse, Vector4::new(0.5, 0.0, 0.0, 1.0));
        assert_eq!(filtered.shininess, 32.0);
    }

    #[test]
    fn test_geometric_mean_of_shininess() {
        let blend = Material::new().with_shininess(2.0) + Material::new().with_shininess(8.0);

        assert!((blend.shininess - 4.0).abs() < 1e-6);
    }
}
