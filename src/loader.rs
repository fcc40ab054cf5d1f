//! Asset loading and image output
//!
//! Free functions for pulling meshes and shader source from disk and
//! writing rendered frames back out. OBJ files collapse into a single
//! [`Mesh`]; frames are written as PNG through the `image` crate, or as
//! binary PPM when the path ends in `.ppm`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use cgmath::{Vector2, Vector3};

use crate::error::{Error, Result};
use crate::geometry::Mesh;
use crate::render::Framebuffer;
use crate::shader::ShaderProgram;

/// Loads an OBJ file into a single mesh.
///
/// All models in the file are merged, with faces triangulated and
/// indices unified. When any model lacks normals the merged mesh gets
/// computed face normals instead; texture coordinates survive only if
/// every model carries them.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| match e {
        tobj::LoadError::OpenFileFailed => Error::FileNotFound(display.clone()),
        other => Error::Parse {
            path: display.clone(),
            detail: other.to_string(),
        },
    })?;

    let mut mesh = Mesh::new();
    let mut all_normals = true;
    let mut all_texcoords = true;

    for model in &models {
        let data = &model.mesh;
        let base = mesh.positions.len() as u32;

        for xyz in data.positions.chunks_exact(3) {
            mesh.positions.push(Vector3::new(xyz[0], xyz[1], xyz[2]));
        }
        if !data.normals.is_empty() && data.normals.len() == data.positions.len() {
            for xyz in data.normals.chunks_exact(3) {
                mesh.normals.push(Vector3::new(xyz[0], xyz[1], xyz[2]));
            }
        } else {
            all_normals = false;
        }
        if !data.texcoords.is_empty() && data.texcoords.len() / 2 == data.positions.len() / 3 {
            for uv in data.texcoords.chunks_exact(2) {
                mesh.texcoords.push(Vector2::new(uv[0], uv[1]));
            }
        } else {
            all_texcoords = false;
        }
        mesh.indices.extend(data.indices.iter().map(|i| i + base));
    }

    if !all_normals {
        mesh.normals.clear();
        mesh.calc_face_normals();
    }
    if !all_texcoords {
        mesh.texcoords.clear();
    }

    log::info!(
        "loaded {} ({} vertices, {} triangles)",
        display,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Compiles WGSL shader source into a validated program
pub fn load_shaders(source: &str) -> Result<ShaderProgram> {
    ShaderProgram::compile("user", source)
}

/// Reads a WGSL file and compiles it, labelling the program with the
/// file stem
pub fn load_shaders_from_file(path: impl AsRef<Path>) -> Result<ShaderProgram> {
    let path = path.as_ref();
    let source = read_text_file(path)?;
    let label = path.file_stem().and_then(|s| s.to_str()).unwrap_or("user");
    ShaderProgram::compile(label, &source)
}

/// Reads a UTF-8 text file.
/// A missing file maps to [`Error::FileNotFound`].
pub fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| Error::from_io(e, &path.display().to_string()))
}

/// Writes a framebuffer to disk.
///
/// Paths ending in `.ppm` are written as binary PPM (P6, alpha
/// dropped). Any other path goes through the `image` crate, which picks
/// the format from the extension.
pub fn save_image(fb: &Framebuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let is_ppm = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ppm"));
    if is_ppm {
        let mut file = File::create(path).map_err(|e| Error::from_io(e, &display))?;
        let header = format!("P6\n{} {}\n255\n", fb.width(), fb.height());
        file.write_all(header.as_bytes())?;
        file.write_all(&fb.rgb_bytes())?;
    } else {
        let image = image::RgbaImage::from_raw(fb.width(), fb.height(), fb.bytes().to_vec())
            .ok_or_else(|| Error::Encode {
                path: display.clone(),
                detail: "framebuffer bytes do not match its dimensions".to_string(),
            })?;
        image.save(path).map_err(|e| match e {
            image::ImageError::IoError(io) => Error::from_io(io, &display),
            other => Error::Encode {
                path: display.clone(),
                detail: other.to_string(),
            },
        })?;
    }

    log::info!("wrote {}", display);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn test_load_obj_single_triangle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let mesh = load_obj(&path).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        // the file has no normals, so face normals get computed
        assert!(mesh.has_normals());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_load_obj_keeps_file_normals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n",
        )
        .unwrap();

        let mesh = load_obj(&path).unwrap();

        assert_eq!(mesh.normals[0], Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_load_obj_merges_models() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two.obj");
        std::fs::write(
            &path,
            "o first\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
             o second\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        )
        .unwrap();

        let mesh = load_obj(&path).unwrap();

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_load_obj_missing_file() {
        let err = load_obj("does_not_exist.obj").unwrap_err();

        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_read_text_file_missing() {
        let err = read_text_file("does_not_exist.txt").unwrap_err();

        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_load_shaders_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glow.wgsl");
        std::fs::write(
            &path,
            "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n    return vec4<f32>(1.0);\n}\n",
        )
        .unwrap();

        let program = load_shaders_from_file(&path).unwrap();

        assert_eq!(program.label(), "glow");
        assert!(program.has_entry_point("fs_main"));
    }

    #[test]
    fn test_save_and_reload_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut fb = Framebuffer::new(4, 3);
        fb.clear(Vector4::new(1.0, 0.0, 0.0, 1.0));

        save_image(&fb, &path).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.dimensions(), (4, 3));
        assert_eq!(reloaded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_save_ppm_writes_header_and_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.ppm");
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(Vector4::new(0.0, 1.0, 0.0, 1.0));

        save_image(&fb, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let header = b"P6\n2 2\n255\n";
        assert!(bytes.starts_with(header));
        assert_eq!(bytes.len(), header.len() + 2 * 2 * 3);
        assert_eq!(&bytes[header.len()..header.len() + 3], &[0, 255, 0]);
    }
}
