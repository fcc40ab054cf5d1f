//! Entities, the visible objects of a scene
//!
//! An [`Entity`] couples a mesh with a material and a transform, and can
//! carry child entities and attached lights that inherit its transform.
//! The transform is kept as separate translation, rotation and scale
//! components; the model matrix is assembled lazily when it is read.
//!
//! Geometry lives behind a shared [`MeshHandle`]. [`Entity::share`]
//! creates a sibling entity on the same handle, so geometry edits reach
//! every sibling while materials and transforms stay per-entity.

use cgmath::{InnerSpace, Matrix4, Quaternion, Rad, Rotation3, Vector3};

use crate::geometry::{Mesh, MeshHandle};
use crate::scene::{Light, Material};

/// A mesh placed in the scene with a material and transform
#[derive(Debug)]
pub struct Entity {
    mesh: MeshHandle,
    /// Optional name, shown in logs
    pub name: String,
    pub material: Material,
    /// Child entities, transformed relative to this one
    pub children: Vec<Entity>,
    /// Lights that follow this entity's transform
    pub lights: Vec<Light>,
    position: Vector3<f32>,
    rotation: Quaternion<f32>,
    scale: Vector3<f32>,
    model: Matrix4<f32>,
    model_dirty: bool,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(Mesh::new())
    }
}

impl Entity {
    /// Creates an entity that owns the given mesh
    pub fn new(mesh: Mesh) -> Self {
        Self::from_handle(mesh.into_handle())
    }

    /// Creates an entity on an existing mesh handle
    pub fn from_handle(mesh: MeshHandle) -> Self {
        Self {
            mesh,
            name: String::new(),
            material: Material::default(),
            children: Vec::new(),
            lights: Vec::new(),
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            model: Matrix4::from_scale(1.0),
            model_dirty: false,
        }
    }

    /// Builder pattern: Set the entity name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Builder pattern: Set the material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Creates a sibling entity sharing this entity's geometry.
    ///
    /// The sibling starts with a copy of this entity's material and
    /// transform but no children or lights. Geometry edits made through
    /// either entity are visible to both; material and transform changes
    /// are not.
    pub fn share(&self) -> Entity {
        Entity {
            mesh: self.mesh.clone(),
            name: self.name.clone(),
            material: self.material.clone(),
            children: Vec::new(),
            lights: Vec::new(),
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            model: self.model,
            model_dirty: self.model_dirty,
        }
    }

    /// Handle to this entity's geometry
    pub fn mesh(&self) -> &MeshHandle {
        &self.mesh
    }

    /// Replaces the geometry in place.
    ///
    /// Entities sharing the handle see the new mesh too.
    pub fn set_mesh(&mut self, mesh: Mesh) {
        *self.mesh.borrow_mut() = mesh;
    }

    /// Replaces the material
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// Number of vertices in the geometry
    pub fn vertex_count(&self) -> usize {
        self.mesh.borrow().vertex_count()
    }

    /// Number of triangles in the geometry
    pub fn face_count(&self) -> usize {
        self.mesh.borrow().triangle_count()
    }

    /// Adds a child entity transformed relative to this one
    pub fn add_child(&mut self, child: Entity) {
        self.children.push(child);
    }

    /// Attaches a light that follows this entity's transform
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Current translation
    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// Current rotation
    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    /// Current per-axis scale factors
    pub fn scale_factors(&self) -> Vector3<f32> {
        self.scale
    }

    /// Moves the entity by a delta
    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
        self.model_dirty = true;
    }

    /// Same as [`Entity::translate`] with individual components
    pub fn translate_xyz(&mut self, dx: f32, dy: f32, dz: f32) {
        self.translate(Vector3::new(dx, dy, dz));
    }

    /// Places the entity at an absolute position
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.model_dirty = true;
    }

    /// Same as [`Entity::set_position`] with individual components
    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.set_position(Vector3::new(x, y, z));
    }

    /// Composes a rotation about a world axis onto the entity.
    /// A zero axis is ignored.
    pub fn rotate<A: Into<Rad<f32>>>(&mut self, angle: A, axis: Vector3<f32>) {
        if axis.magnitude2() == 0.0 {
            return;
        }
        self.rotation = Quaternion::from_axis_angle(axis.normalize(), angle) * self.rotation;
        self.model_dirty = true;
    }

    /// [`Entity::rotate`] around the X axis
    pub fn rotate_x<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.rotate(angle, Vector3::unit_x());
    }

    /// [`Entity::rotate`] around the Y axis
    pub fn rotate_y<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.rotate(angle, Vector3::unit_y());
    }

    /// [`Entity::rotate`] around the Z axis
    pub fn rotate_z<A: Into<Rad<f32>>>(&mut self, angle: A) {
        self.rotate(angle, Vector3::unit_z());
    }

    /// Multiplies the scale uniformly on all axes
    pub fn scale(&mut self, factor: f32) {
        self.scale_vec(Vector3::new(factor, factor, factor));
    }

    /// Multiplies the scale per axis.
    ///
    /// Omitted components follow the classic shorthand: with `sy` absent
    /// the scale is uniform in `sx`; with only `sz` absent it defaults
    /// to 1.
    pub fn scale_xyz(&mut self, sx: f32, sy: Option<f32>, sz: Option<f32>) {
        let (sy, sz) = match (sy, sz) {
            (None, _) => (sx, sx),
            (Some(sy), None) => (sy, 1.0),
            (Some(sy), Some(sz)) => (sy, sz),
        };
        self.scale_vec(Vector3::new(sx, sy, sz));
    }

    /// Multiplies the scale by a per-axis vector
    pub fn scale_vec(&mut self, factors: Vector3<f32>) {
        self.scale.x *= factors.x;
        self.scale.y *= factors.y;
        self.scale.z *= factors.z;
        self.model_dirty = true;
    }

    /// Local model matrix, translation times rotation times scale.
    /// Recomputed here only after a transform component changed.
    pub fn model_matrix(&mut self) -> Matrix4<f32> {
        if self.model_dirty {
            self.model = Matrix4::from_translation(self.position)
                * Matrix4::from(self.rotation)
                * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
            self.model_dirty = false;
        }
        self.model
    }

    /// Bakes the current transform into the vertex data and resets the
    /// transform to identity.
    ///
    /// Entities sharing the geometry see the transformed vertices.
    pub fn apply_transform(&mut self) {
        let model = self.model_matrix();
        self.mesh.borrow_mut().transform(&model);
        self.position = Vector3::new(0.0, 0.0, 0.0);
        self.rotation = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        self.scale = Vector3::new(1.0, 1.0, 1.0);
        self.model = Matrix4::from_scale(1.0);
        self.model_dirty = false;
    }
}

/// Deep copy: the clone gets its own mesh with copied vertex data, not a
/// shared handle. Use [`Entity::share`] to share geometry instead.
impl Clone for Entity {
    fn clone(&self) -> Self {
        Self {
            mesh: self.mesh.borrow().clone().into_handle(),
            name: self.name.clone(),
            material: self.material.clone(),
            children: self.children.clone(),
            lights: self.lights.clone(),
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
            model: self.model,
            model_dirty: self.model_dirty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes;
    use cgmath::{Deg, Vector4};

    #[test]
    fn test_uniform_scale_shorthand() {
        let mut explicit = Entity::new(shapes::cube());
        let mut shorthand = Entity::new(shapes::cube());

        explicit.scale(2.0);
        shorthand.scale_xyz(2.0, None, None);

        assert_eq!(explicit.scale_factors(), shorthand.scale_factors());
        assert_eq!(explicit.scale_factors(), Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_partial_scale_defaults_z_to_one() {
        let mut entity = Entity::new(shapes::cube());

        entity.scale_xyz(2.0, Some(3.0), None);

        assert_eq!(entity.scale_factors(), Vector3::new(2.0, 3.0, 1.0));
    }

    #[test]
    fn test_scale_accumulates() {
        let mut entity = Entity::new(shapes::cube());

        entity.scale(2.0);
        entity.scale(2.0);

        assert_eq!(entity.scale_factors(), Vector3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_shared_entities_see_geometry_edits() {
        let original = Entity::new(shapes::cube());
        let shared = original.share();

        original.mesh().borrow_mut().positions[0] = Vector3::new(9.0, 9.0, 9.0);

        assert_eq!(shared.mesh().borrow().positions[0], Vector3::new(9.0, 9.0, 9.0));
    }

    #[test]
    fn test_shared_entities_keep_separate_materials() {
        let original = Entity::new(shapes::cube());
        let mut shared = original.share();

        shared.material.set_color(Vector4::new(1.0, 0.0, 0.0, 1.0));

        assert_eq!(original.material.diffuse, Vector4::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_clone_detaches_geometry() {
        let original = Entity::new(shapes::cube());
        let cloned = original.clone();

        original.mesh().borrow_mut().positions[0] = Vector3::new(9.0, 9.0, 9.0);

        assert_ne!(cloned.mesh().borrow().positions[0], Vector3::new(9.0, 9.0, 9.0));
    }

    #[test]
    fn test_model_matrix_composes_translation_and_scale() {
        let mut entity = Entity::new(shapes::cube());
        entity.translate_xyz(1.0, 2.0, 3.0);
        entity.scale(2.0);

        let placed = entity.model_matrix() * Vector3::new(1.0, 1.0, 1.0).extend(1.0);

        assert!((placed.x - 3.0).abs() < 1e-6);
        assert!((placed.y - 4.0).abs() < 1e-6);
        assert!((placed.z - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_about_y() {
        let mut entity = Entity::new(shapes::cube());
        entity.rotate_y(Deg(90.0));

        let turned = entity.model_matrix() * Vector3::new(1.0, 0.0, 0.0).extend(1.0);

        assert!(turned.x.abs() < 1e-6);
        assert!((turned.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_zero_axis_is_ignored() {
        let mut entity = Entity::new(shapes::cube());

        entity.rotate(Deg(45.0), Vector3::new(0.0, 0.0, 0.0));

        assert_eq!(entity.rotation(), Quaternion::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_apply_transform_bakes_and_resets() {
        let mut entity = Entity::new(shapes::cube());
        entity.translate_xyz(0.0, 5.0, 0.0);

        entity.apply_transform();

        assert_eq!(entity.position(), Vector3::new(0.0, 0.0, 0.0));
        for position in &entity.mesh().borrow().positions {
            assert!(position.y >= 4.0 && position.y <= 6.0);
        }
        let unchanged = entity.model_matrix() * Vector3::new(0.0, 0.0, 0.0).extend(1.0);
        assert_eq!(unchanged.y, 0.0);
    }

    #[test]
    fn test_counts_come_from_mesh() {
        let entity = Entity::new(shapes::cube());

        assert_eq!(entity.vertex_count(), 24);
        assert_eq!(entity.face_count(), 12);
    }
}
