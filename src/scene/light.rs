//! Light sources
//!
//! Three kinds of light are supported:
//!
//! - **Point lights** sit at a position and cast in all directions,
//!   optionally falling off with distance through the attenuation
//!   coefficients.
//! - **Directional lights** originate at infinity and travel along a
//!   fixed direction.
//! - **Spotlights** are point lights restricted to a cone, enabled by
//!   setting [`Light::spot_cos_cutoff`] to a value in `[0, 1]`.
//!
//! Lights can be registered on the scene directly or attached to an
//! entity, in which case they follow the entity's transform.

use cgmath::{Angle, InnerSpace, Matrix4, Rad, Vector3, Vector4};

/// How a light's `position` field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    /// `position` is a location in space
    #[default]
    Point,
    /// `position` is the direction the light travels in
    Directional,
}

/// A single light source
///
/// The three color channels play the same roles as their material
/// counterparts: ambient illuminates everything, diffuse illuminates
/// surfaces facing the light, specular reflects off them.
#[derive(Debug, Clone)]
pub struct Light {
    pub ambient: Vector4<f32>,
    pub diffuse: Vector4<f32>,
    pub specular: Vector4<f32>,
    /// Location of the light, or its travel direction for
    /// [`LightKind::Directional`]
    pub position: Vector3<f32>,
    pub kind: LightKind,
    /// Axis of the spotlight cone. Only meaningful while
    /// `spot_cos_cutoff` is non-negative.
    pub spot_direction: Vector3<f32>,
    /// Falloff inside the cone; 0 gives a hard-edged cone
    pub spot_exponent: f32,
    /// Cosine of the cone half-angle, in `[0, 1]`. Negative disables the
    /// cone entirely.
    pub spot_cos_cutoff: f32,
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            ambient: Vector4::new(1.0, 1.0, 1.0, 1.0),
            diffuse: Vector4::new(1.0, 1.0, 1.0, 1.0),
            specular: Vector4::new(1.0, 1.0, 1.0, 1.0),
            position: Vector3::new(-2.0, 3.0, 2.0),
            kind: LightKind::Point,
            spot_direction: Vector3::new(0.0, 0.0, 0.0),
            spot_exponent: 0.0,
            spot_cos_cutoff: -1.0,
            constant_attenuation: 1.0,
            linear_attenuation: 0.0,
            quadratic_attenuation: 0.0,
        }
    }
}

impl Light {
    /// Creates a point light of the given color
    pub fn new(position: Vector3<f32>, color: Vector4<f32>) -> Self {
        let mut light = Self {
            position,
            ..Self::default()
        };
        light.set_color(color);
        light
    }

    /// Creates a point light, same as [`Light::new`]
    pub fn point(position: Vector3<f32>, color: Vector4<f32>) -> Self {
        Self::new(position, color)
    }

    /// Creates a directional light traveling along `direction`
    pub fn directional(direction: Vector3<f32>, color: Vector4<f32>) -> Self {
        let mut light = Self::new(direction, color);
        light.kind = LightKind::Directional;
        light
    }

    /// Creates a spotlight at `position` shining along `direction`
    ///
    /// # Arguments
    /// * `cutoff` - Half-angle of the cone
    /// * `exponent` - Falloff toward the cone edge; 0 keeps the cone hard
    pub fn spot<A: Into<Rad<f32>>>(
        position: Vector3<f32>,
        direction: Vector3<f32>,
        cutoff: A,
        exponent: f32,
        color: Vector4<f32>,
    ) -> Self {
        let mut light = Self::new(position, color);
        light.spot_direction = direction;
        light.spot_cos_cutoff = cutoff.into().cos();
        light.spot_exponent = exponent;
        light
    }

    /// Sets ambient, diffuse and specular to the same color
    pub fn set_color(&mut self, color: Vector4<f32>) {
        self.ambient = color;
        self.diffuse = color;
        self.specular = color;
    }

    /// Sets the light color from individual components
    pub fn set_color_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.set_color(Vector4::new(r, g, b, a));
    }

    /// Sets the three distance falloff coefficients in one call
    pub fn set_attenuation(&mut self, constant: f32, linear: f32, quadratic: f32) {
        self.constant_attenuation = constant;
        self.linear_attenuation = linear;
        self.quadratic_attenuation = quadratic;
    }

    /// Whether the cone restriction is active
    pub fn is_spot(&self) -> bool {
        self.spot_cos_cutoff >= 0.0
    }

    /// Copy of this light carried into world space.
    ///
    /// Point positions transform as points, directions as vectors.
    pub(crate) fn transformed(&self, world: &Matrix4<f32>) -> Light {
        let mut light = self.clone();
        light.position = match self.kind {
            LightKind::Point => (world * self.position.extend(1.0)).truncate(),
            LightKind::Directional => (world * self.position.extend(0.0)).truncate(),
        };
        if self.spot_direction.magnitude2() > 0.0 {
            light.spot_direction = (world * self.spot_direction.extend(0.0)).truncate();
        }
        light
    }
}
