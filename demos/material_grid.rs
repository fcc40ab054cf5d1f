//! # Material Grid Demo
//!
//! The "Hello World" demo for Cairn. Renders a 5x5 grid of spheres,
//! each picking a random classic material preset, lit by one white
//! light.
//!
//! ## What this demo shows:
//! - Creating a scene and camera
//! - Sharing one mesh across many entities
//! - The classic material presets
//! - Saving a rendered frame as a PNG
//!
//! ## Usage:
//! ```bash
//! cargo run --example material_grid
//! ```

use cairn::prelude::*;
use rand::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut scene = Scene::new(800, 600);
    scene.set_bg_color(Vector4::new(0.05, 0.05, 0.08, 1.0));
    scene.set_camera(Camera::new(
        Vector3::new(0.0, 5.0, 8.0),
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::unit_y(),
    ));

    let presets: [fn() -> Material; 12] = [
        Material::emerald,
        Material::jade,
        Material::obsidian,
        Material::pearl,
        Material::ruby,
        Material::turquoise,
        Material::brass,
        Material::bronze,
        Material::chrome,
        Material::copper,
        Material::gold,
        Material::silver,
    ];

    // one sphere mesh, shared by all 25 entities
    let ball = Entity::new(shapes::icosphere(3));

    let mut rng = rand::rng();
    for row in 0..5 {
        for column in 0..5 {
            let mut entity = ball.share();
            entity.set_material(presets[rng.random_range(0..presets.len())]());
            entity.scale(0.4);
            entity.set_position(Vector3::new(
                column as f32 - 2.0,
                0.0,
                row as f32 - 2.0,
            ));
            scene.add_entity(entity);
        }
    }

    let mut key = Light::new(
        Vector3::new(4.0, 6.0, 4.0),
        Vector4::new(1.0, 1.0, 1.0, 1.0),
    );
    key.ambient *= 0.2;
    scene.add_light(key);
    scene.enable_lights(true);

    scene.render()?;
    scene.save_image("material_grid.png")?;
    println!("wrote material_grid.png");
    Ok(())
}
