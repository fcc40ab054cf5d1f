//! # Multi-Light Demo
//!
//! Three colored point lights over a rubber floor, each riding a small
//! glowing marker cube so you can see where it sits. Shows attached
//! lights, the face-normal fallback on the cylinder and mixing lit and
//! unlit materials in one scene.
//!
//! ## Usage:
//! ```bash
//! cargo run --example multi_light
//! ```

use cairn::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut scene = Scene::new(800, 600);
    scene.set_bg_color(Vector4::new(0.02, 0.02, 0.03, 1.0));
    scene.set_camera(Camera::new(
        Vector3::new(6.0, 5.0, 8.0),
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::unit_y(),
    ));

    let mut floor = Entity::new(shapes::tessellated_plane(40, 40));
    floor.scale_vec(Vector3::new(0.5, 1.0, 0.5));
    floor.translate_xyz(0.0, -1.5, 0.0);
    floor.set_material(Material::white_rubber());
    scene.add_entity(floor);

    let mut left = Entity::new(shapes::cube()).with_material(Material::brass());
    left.translate_xyz(-2.5, 0.0, 0.0);
    scene.add_entity(left);

    let middle = Entity::new(shapes::icosphere(3)).with_material(Material::pearl());
    scene.add_entity(middle);

    let mut right = Entity::new(shapes::cylinder(0.7, 2.0, 24)).with_material(Material::bronze());
    right.translate_xyz(2.5, 0.0, 0.0);
    scene.add_entity(right);

    scene.enable_lights(true);

    // markers are added after enable_lights, so they stay unlit and
    // render as pure glow
    let stations = [
        (Vector3::new(-3.0, 3.0, 2.0), Vector4::new(1.0, 0.2, 0.2, 1.0)),
        (Vector3::new(0.0, 4.0, -3.0), Vector4::new(0.2, 1.0, 0.2, 1.0)),
        (Vector3::new(3.0, 3.0, 2.0), Vector4::new(0.2, 0.4, 1.0, 1.0)),
    ];
    for (position, color) in stations {
        let mut marker = Entity::new(shapes::cube());
        marker.scale(0.1);
        marker.set_position(position);
        marker.material.set_emission(color);
        marker.add_light(Light::new(Vector3::new(0.0, 0.0, 0.0), color));
        scene.add_entity(marker);
    }

    scene.render()?;
    scene.save_image("multi_light.png")?;
    println!("wrote multi_light.png");
    Ok(())
}
