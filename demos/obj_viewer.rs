//! # OBJ Viewer
//!
//! Loads an OBJ file given on the command line, frames it from its
//! bounding radius and writes four turntable frames.
//!
//! ## Usage:
//! ```bash
//! cargo run --example obj_viewer -- model.obj
//! ```

use cairn::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "model.obj".to_string());
    let mesh = loader::load_obj(&path)?;

    // frame the model from its bounding radius
    let radius = mesh
        .positions
        .iter()
        .map(|p| p.magnitude())
        .fold(0.0f32, f32::max)
        .max(1e-3);

    let mut scene = Scene::new(800, 600);
    scene.set_bg_color(Vector4::new(0.1, 0.1, 0.12, 1.0));
    scene.set_camera(Camera::new(
        Vector3::new(0.0, radius * 0.8, radius * 2.5),
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::unit_y(),
    ));

    let model = Entity::new(mesh).with_material(Material::silver());
    scene.add_entity(model);

    scene.add_light(Light::new(
        Vector3::new(radius * 2.0, radius * 3.0, radius * 2.0),
        Vector4::new(1.0, 1.0, 1.0, 1.0),
    ));
    scene.enable_lights(true);

    for frame in 0..4 {
        scene.render()?;
        scene.save_image(format!("view_{frame}.png"))?;
        if let Some(camera) = scene.camera_mut() {
            camera.orbit_y(Deg(90.0));
        }
    }
    println!("wrote view_0.png .. view_3.png");
    Ok(())
}
