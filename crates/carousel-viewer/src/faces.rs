use std::path::PathBuf;

use anyhow::{ensure, Result};
use image::{DynamicImage, Rgba, RgbaImage};

use carousel_engine::render::cylinder::open_face;

const GENERATED_SIZE: u32 = 256;
const CHECKER_CELLS: u32 = 8;

/// Loads one image per face from `paths`, or generates `count` checkerboards
/// when no paths are given.
pub fn load_faces(paths: &[PathBuf], count: usize) -> Result<Vec<DynamicImage>> {
    if paths.is_empty() {
        log::info!("no face images given; generating {count} checkerboards");
        return Ok((0..count)
            .map(|face| DynamicImage::ImageRgba8(checkerboard(face, count, GENERATED_SIZE)))
            .collect());
    }

    ensure!(
        paths.len() == count,
        "expected {count} face images, got {}",
        paths.len()
    );

    let mut images = Vec::with_capacity(count);
    for (face, path) in paths.iter().enumerate() {
        let img = open_face(face, path)?;
        log::debug!("face {face}: {} ({}x{})", path.display(), img.width(), img.height());
        images.push(img);
    }
    Ok(images)
}

/// A checkerboard tinted by face index, with `face + 1` ticks along the top
/// row so faces can be told apart.
pub fn checkerboard(face: usize, count: usize, size: u32) -> RgbaImage {
    let tint = face_tint(face, count);
    let light = Rgba([235, 235, 235, 255]);
    let cell = (size / CHECKER_CELLS).max(1);

    RgbaImage::from_fn(size, size, |x, y| {
        let (cx, cy) = (x / cell, y / cell);
        let tick_row = cy == 0 && (cx as usize) < face + 1 && (x % cell) < cell / 2;
        if tick_row {
            Rgba([20, 20, 20, 255])
        } else if (cx + cy) % 2 == 0 {
            tint
        } else {
            light
        }
    })
}

/// Evenly spaced hues around the colour wheel.
fn face_tint(face: usize, count: usize) -> Rgba<u8> {
    let h = face as f32 / count.max(1) as f32 * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let to_u8 = |c: f32| (40.0 + c * 190.0) as u8;
    Rgba([to_u8(r), to_u8(g), to_u8(b), 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_one_image_per_face() {
        let faces = load_faces(&[], 8).unwrap();
        assert_eq!(faces.len(), 8);
        assert!(faces.iter().all(|f| f.width() == GENERATED_SIZE));
    }

    #[test]
    fn generated_faces_differ() {
        let a = checkerboard(0, 8, 64);
        let b = checkerboard(3, 8, 64);
        assert_ne!(a.get_pixel(8, 63), b.get_pixel(8, 63));
    }

    #[test]
    fn ticks_count_face_index() {
        let img = checkerboard(2, 8, 64);
        let dark = Rgba([20, 20, 20, 255]);
        // cell = 8px; ticks occupy the left half of the first three cells.
        assert_eq!(*img.get_pixel(1, 1), dark);
        assert_eq!(*img.get_pixel(17, 1), dark);
        assert_ne!(*img.get_pixel(25, 1), dark);
    }

    #[test]
    fn path_count_must_match() {
        let paths = vec![PathBuf::from("a.png")];
        assert!(load_faces(&paths, 8).is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let paths: Vec<_> = (0..3).map(|i| PathBuf::from(format!("/nope/{i}.png"))).collect();
        assert!(load_faces(&paths, 3).is_err());
    }
}
