//! Scene container and the render loop entry point

use std::path::Path;
use std::time::Instant;

use cgmath::{ortho, perspective, Deg, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::camera::{Camera, CameraController};
use crate::error::{Error, Result};
use crate::geometry::MeshHandle;
use crate::loader;
use crate::render::{draw_mesh, Framebuffer};
use crate::scene::{Entity, Light, Material};
use crate::shader::generate_program;

/// How eye space maps to clip space
#[derive(Debug, Clone, Copy)]
pub enum Projection {
    /// Perspective projection with a vertical field of view in degrees.
    /// An aspect ratio of zero or less follows the framebuffer.
    Perspective {
        fovy_deg: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Orthographic box
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    /// Caller-supplied projection matrix
    Custom(Matrix4<f32>),
}

impl Projection {
    fn matrix(&self, width: u32, height: u32) -> Matrix4<f32> {
        match *self {
            Projection::Perspective {
                fovy_deg,
                aspect,
                near,
                far,
            } => {
                let aspect = if aspect > 0.0 {
                    aspect
                } else {
                    width as f32 / height.max(1) as f32
                };
                perspective(Deg(fovy_deg), aspect, near, far)
            }
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => ortho(left, right, bottom, top, near, far),
            Projection::Custom(matrix) => matrix,
        }
    }
}

/// A renderable world: entities, lights, a camera and the framebuffer
/// frames land in.
///
/// Entities added directly to the scene are roots of the transform
/// hierarchy. Lights can live at scene level, where their position is
/// world space, or attached to entities, which carry them through their
/// transforms.
pub struct Scene {
    /// Root entities, drawn in insertion order
    pub entities: Vec<Entity>,
    /// World-space lights
    pub lights: Vec<Light>,
    camera: Option<Camera>,
    projection: Projection,
    bg_color: Vector4<f32>,
    framebuffer: Framebuffer,
    controller: Option<Box<dyn CameraController>>,
    prepared: bool,
    last_frame: Option<Instant>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl Scene {
    /// Creates a scene rendering at the given resolution, with a 45
    /// degree perspective projection and a black background
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            entities: Vec::new(),
            lights: Vec::new(),
            camera: None,
            projection: Projection::Perspective {
                fovy_deg: 45.0,
                aspect: 0.0,
                near: 0.1,
                far: 100.0,
            },
            bg_color: Vector4::new(0.0, 0.0, 0.0, 0.0),
            framebuffer: Framebuffer::new(width, height),
            controller: None,
            prepared: false,
            last_frame: None,
        }
    }

    /// Render width in pixels
    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    /// Render height in pixels
    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    /// The framebuffer holding the last rendered frame
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Changes the render resolution, discarding the current frame
    pub fn resize(&mut self, width: u32, height: u32) {
        self.framebuffer.resize(width, height);
    }

    /// Adds a root entity and returns its index
    pub fn add_entity(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.prepared = false;
        self.entities.len() - 1
    }

    /// Root entity by index
    pub fn get_entity(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Mutable root entity by index
    pub fn get_entity_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    /// Adds a world-space light
    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
        self.prepared = false;
    }

    /// Sets the camera used for rendering
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    /// Convenience for [`Scene::set_camera`] with an explicit pose
    pub fn set_camera_pose(&mut self, position: Vector3<f32>, target: Vector3<f32>, up: Vector3<f32>) {
        self.camera = Some(Camera::new(position, target, up));
    }

    /// The scene camera, if one has been set
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Mutable access to the scene camera
    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    /// Sets the view matrix directly, creating a default camera first if
    /// none exists
    pub fn set_view_matrix(&mut self, view: Matrix4<f32>) {
        self.camera.get_or_insert_with(Camera::default).set_view_matrix(view);
    }

    /// Replaces the projection
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Sets a custom projection matrix
    pub fn set_projection_matrix(&mut self, matrix: Matrix4<f32>) {
        self.projection = Projection::Custom(matrix);
    }

    /// Sets a perspective projection.
    /// An aspect ratio of zero or less follows the framebuffer.
    pub fn set_perspective_projection(&mut self, fovy_deg: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Projection::Perspective {
            fovy_deg,
            aspect,
            near,
            far,
        };
    }

    /// Sets an orthographic projection
    pub fn set_orthographic_projection(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) {
        self.projection = Projection::Orthographic {
            left,
            right,
            bottom,
            top,
            near,
            far,
        };
    }

    /// Sets the background color frames are cleared with
    pub fn set_bg_color(&mut self, color: Vector4<f32>) {
        self.bg_color = color;
    }

    /// Installs a camera controller, run once per rendered frame
    pub fn set_controller<C: CameraController + 'static>(&mut self, controller: C) {
        self.controller = Some(Box::new(controller));
    }

    /// Turns lighting on or off for every material in the scene,
    /// including child entities
    pub fn enable_lights(&mut self, enable: bool) {
        set_lights_enabled(&mut self.entities, enable);
        self.prepared = false;
    }

    /// The view-projection matrix for the current camera and projection
    pub fn view_projection(&self) -> Option<Matrix4<f32>> {
        let camera = self.camera.as_ref()?;
        let projection = self
            .projection
            .matrix(self.framebuffer.width(), self.framebuffer.height());
        Some(projection * camera.view())
    }

    /// Validates meshes and builds shader programs for every entity.
    ///
    /// Materials without a custom shader get a generated program
    /// matching the current lighting model and light count. Called
    /// automatically by [`Scene::render`] after anything changed, but
    /// can be called up front to surface errors early.
    pub fn prepare(&mut self) -> Result<()> {
        let light_count = self.lights.len() + count_attached_lights(&self.entities);
        prepare_entities(&mut self.entities, light_count)?;
        self.prepared = true;
        log::debug!(
            "prepared scene: {} entities, {} lights",
            count_entities(&self.entities),
            light_count
        );
        Ok(())
    }

    /// Renders one frame into the framebuffer.
    ///
    /// Runs the camera controller, prepares the scene if needed, then
    /// draws all entities depth-tested in insertion order. Fails with
    /// [`Error::InvalidState`] when no camera has been set.
    pub fn render(&mut self) -> Result<()> {
        let now = Instant::now();
        let delta_time = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        if let (Some(controller), Some(camera)) = (self.controller.as_mut(), self.camera.as_mut()) {
            controller.update(camera, delta_time);
        }

        if !self.prepared {
            self.prepare()?;
        }

        let (view, camera_position) = match &self.camera {
            Some(camera) => (camera.view(), eye_position(camera)),
            None => {
                return Err(Error::InvalidState(
                    "scene has no camera; call set_camera before rendering".to_string(),
                ))
            }
        };
        let vp = self
            .projection
            .matrix(self.framebuffer.width(), self.framebuffer.height())
            * view;

        self.framebuffer.clear(self.bg_color);

        // First pass walks the hierarchy, caching world matrices and
        // moving attached lights into world space.
        let mut draws = Vec::new();
        let mut lights = self.lights.clone();
        let identity = Matrix4::identity();
        for entity in &mut self.entities {
            collect_draws(entity, &identity, &mut draws, &mut lights);
        }

        for item in &draws {
            let mesh = item.mesh.borrow();
            draw_mesh(
                &mut self.framebuffer,
                &mesh,
                &item.world,
                &vp,
                &item.material,
                &lights,
                camera_position,
            );
        }
        Ok(())
    }

    /// Writes the last rendered frame to disk.
    /// See [`loader::save_image`] for the supported formats.
    pub fn save_image(&self, path: impl AsRef<Path>) -> Result<()> {
        loader::save_image(&self.framebuffer, path)
    }
}

struct DrawItem {
    mesh: MeshHandle,
    material: Material,
    world: Matrix4<f32>,
}

fn collect_draws(
    entity: &mut Entity,
    parent: &Matrix4<f32>,
    draws: &mut Vec<DrawItem>,
    lights: &mut Vec<Light>,
) {
    let world = parent * entity.model_matrix();
    for light in &entity.lights {
        lights.push(light.transformed(&world));
    }
    draws.push(DrawItem {
        mesh: entity.mesh().clone(),
        material: entity.material.clone(),
        world,
    });
    for child in &mut entity.children {
        collect_draws(child, &world, draws, lights);
    }
}

fn prepare_entities(entities: &mut [Entity], light_count: usize) -> Result<()> {
    for entity in entities {
        entity.mesh().borrow().validate().map_err(|e| match e {
            Error::InvalidState(detail) if !entity.name.is_empty() => {
                Error::InvalidState(format!("entity '{}': {}", entity.name, detail))
            }
            other => other,
        })?;
        if !entity.material.has_custom_shader() {
            let program = generate_program(&entity.material, light_count)?;
            entity.material.set_generated_shader(program);
        }
        prepare_entities(&mut entity.children, light_count)?;
    }
    Ok(())
}

fn set_lights_enabled(entities: &mut [Entity], enable: bool) {
    for entity in entities {
        entity.material.lights_enabled = enable;
        set_lights_enabled(&mut entity.children, enable);
    }
}

fn count_attached_lights(entities: &[Entity]) -> usize {
    entities
        .iter()
        .map(|e| e.lights.len() + count_attached_lights(&e.children))
        .sum()
}

fn count_entities(entities: &[Entity]) -> usize {
    entities
        .iter()
        .map(|e| 1 + count_entities(&e.children))
        .sum()
}

/// Where the camera sits in world space. Falls back to inverting the
/// view matrix when the pose was overwritten by a raw matrix.
fn eye_position(camera: &Camera) -> Vector3<f32> {
    if camera.has_pose() {
        camera.position()
    } else {
        camera
            .view()
            .invert()
            .map(|inverse| inverse.w.truncate())
            .unwrap_or(Vector3::new(0.0, 0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes;
    use crate::shader::ShaderProgram;
    use cgmath::Deg;

    fn glowing(r: f32, g: f32, b: f32) -> Material {
        let mut material = Material::new();
        material.set_emission(Vector4::new(r, g, b, 1.0));
        material
    }

    fn front_camera(distance: f32) -> Camera {
        Camera::new(
            Vector3::new(0.0, 0.0, distance),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::unit_y(),
        )
    }

    #[test]
    fn test_render_without_camera_fails() {
        let mut scene = Scene::new(32, 32);
        scene.add_entity(Entity::new(shapes::cube()));

        let err = scene.render().unwrap_err();

        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn test_render_draws_entity_at_center() {
        let mut scene = Scene::new(64, 64);
        scene.set_bg_color(Vector4::new(0.0, 0.0, 1.0, 1.0));
        scene.set_camera(Camera::default());
        scene.add_entity(Entity::new(shapes::cube()).with_material(glowing(1.0, 0.0, 0.0)));

        scene.render().unwrap();

        // the camera looks at the origin, so the cube covers the center
        let fb = scene.framebuffer();
        assert_eq!(fb.pixel(32, 32), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(0, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_depth_orders_entities_not_draw_order() {
        let mut scene = Scene::new(64, 64);
        scene.set_camera(front_camera(5.0));

        let mut near = Entity::new(shapes::cube()).with_material(glowing(1.0, 0.0, 0.0));
        near.scale(0.4);
        near.translate_xyz(0.0, 0.0, 1.0);
        let mut far = Entity::new(shapes::cube()).with_material(glowing(0.0, 1.0, 0.0));
        far.scale(0.4);
        far.translate_xyz(0.0, 0.0, -1.0);

        // near first, far second: draw order must not matter
        scene.add_entity(near);
        scene.add_entity(far);
        scene.render().unwrap();

        assert_eq!(scene.framebuffer().pixel(32, 32), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_child_inherits_parent_transform() {
        let mut scene = Scene::new(64, 64);
        scene.set_camera(front_camera(5.0));

        // the group node has no geometry of its own
        let mut group = Entity::default();
        group.translate_xyz(2.0, 0.0, 0.0);
        let mut child = Entity::new(shapes::cube()).with_material(glowing(1.0, 1.0, 0.0));
        child.scale(0.5);
        child.translate_xyz(-2.0, 0.0, 0.0);
        group.add_child(child);
        scene.add_entity(group);

        scene.render().unwrap();

        // parent +2 and child -2 cancel, putting the cube at the origin
        assert_eq!(scene.framebuffer().pixel(32, 32), Some([255, 255, 0, 255]));
    }

    #[test]
    fn test_attached_light_follows_carrier() {
        let mut scene = Scene::new(64, 64);
        scene.set_camera(front_camera(5.0));

        let mut subject = Entity::new(shapes::cube());
        subject.material.set_ambient(Vector4::new(0.0, 0.0, 0.0, 1.0));
        subject.material.set_diffuse(Vector4::new(1.0, 1.0, 1.0, 1.0));
        subject.material.set_specular(Vector4::new(0.0, 0.0, 0.0, 1.0));
        subject.material.set_emission(Vector4::new(0.0, 0.0, 0.0, 1.0));
        scene.add_entity(subject);

        let mut holder = Entity::default();
        holder.translate_xyz(0.0, 0.0, 3.0);
        holder.add_light(Light::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector4::new(1.0, 1.0, 1.0, 1.0),
        ));
        scene.add_entity(holder);

        scene.enable_lights(true);
        scene.render().unwrap();

        // the light rides its holder to (0, 0, 3), two units from the
        // cube face it shines on head-on
        let pixel = scene.framebuffer().pixel(32, 32).unwrap();
        assert!(pixel[0] > 200, "expected a lit face, got {:?}", pixel);
    }

    #[test]
    fn test_enable_lights_reaches_nested_materials() {
        let mut scene = Scene::new(16, 16);
        let mut parent = Entity::new(shapes::cube());
        parent.add_child(Entity::new(shapes::cube()));
        scene.add_entity(parent);

        scene.enable_lights(true);

        assert!(scene.entities[0].material.lights_enabled);
        assert!(scene.entities[0].children[0].material.lights_enabled);
    }

    #[test]
    fn test_add_entity_returns_indices() {
        let mut scene = Scene::new(16, 16);

        assert_eq!(scene.add_entity(Entity::default()), 0);
        assert_eq!(scene.add_entity(Entity::default()), 1);
        assert!(scene.get_entity_mut(1).is_some());
        assert!(scene.get_entity_mut(2).is_none());
    }

    #[test]
    fn test_prepare_generates_programs() {
        let mut scene = Scene::new(16, 16);
        scene.add_entity(Entity::new(shapes::cube()));
        scene.add_light(Light::default());
        scene.enable_lights(true);

        scene.prepare().unwrap();

        let shader = scene.entities[0].material.shader().unwrap();
        assert_eq!(shader.label(), "phong-1-lights");
    }

    #[test]
    fn test_prepare_keeps_custom_shader() {
        let source = "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return vec4<f32>(1.0);\n}\n";
        let program = ShaderProgram::compile("custom", source).unwrap();

        let mut scene = Scene::new(16, 16);
        let mut entity = Entity::new(shapes::cube());
        entity.material.set_shader(program);
        scene.add_entity(entity);

        scene.prepare().unwrap();

        assert_eq!(scene.entities[0].material.shader().unwrap().label(), "custom");
    }

    #[test]
    fn test_prepare_reports_invalid_mesh() {
        let mut scene = Scene::new(16, 16);
        let mut mesh = shapes::cube();
        mesh.indices.push(999);
        scene.add_entity(Entity::new(mesh).with_name("broken"));

        let err = scene.prepare().unwrap_err();

        match err {
            Error::InvalidState(detail) => assert!(detail.contains("broken")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_controller_runs_each_frame() {
        struct QuarterTurn;
        impl CameraController for QuarterTurn {
            fn update(&mut self, camera: &mut Camera, _delta_time: f32) {
                camera.orbit_y(Deg(90.0));
            }
        }

        let mut scene = Scene::new(16, 16);
        scene.set_camera(Camera::default());
        scene.set_controller(QuarterTurn);

        scene.render().unwrap();

        let position = scene.camera().unwrap().position();
        assert!((position.x - 5.0).abs() < 1e-4);
        assert!((position.y - 4.0).abs() < 1e-4);
        assert!((position.z + 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_resize_changes_framebuffer() {
        let mut scene = Scene::new(16, 16);

        scene.resize(128, 32);

        assert_eq!(scene.width(), 128);
        assert_eq!(scene.height(), 32);
    }

    #[test]
    fn test_render_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        let mut scene = Scene::new(32, 32);
        scene.set_bg_color(Vector4::new(0.2, 0.2, 0.2, 1.0));
        scene.set_camera(Camera::default());
        scene.add_entity(Entity::new(shapes::sphere(16, 8)));
        scene.render().unwrap();
        scene.save_image(&path).unwrap();

        assert!(path.exists());
    }
}
