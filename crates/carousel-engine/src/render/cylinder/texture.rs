use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use crate::render::RenderCtx;

use super::MeshError;

pub const FACE_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Decodes face `face` from an encoded image blob.
pub fn decode_face(face: usize, bytes: &[u8]) -> Result<DynamicImage, MeshError> {
    image::load_from_memory(bytes).map_err(|source| MeshError::Decode { face, source })
}

/// Opens and decodes face `face` from disk. The file handle is released
/// before returning.
pub fn open_face(face: usize, path: impl AsRef<Path>) -> Result<DynamicImage, MeshError> {
    image::open(path).map_err(|source| MeshError::Decode { face, source })
}

/// Converts to RGBA8.
///
/// Each side is first divided by `subsample` (`0` and `1` keep full size,
/// no side drops below one texel). The result is then shrunk, aspect
/// preserved, when either side still exceeds `max_dimension`.
pub fn prepare_face_image(
    face: usize,
    image: DynamicImage,
    subsample: u32,
    max_dimension: u32,
) -> Result<RgbaImage, MeshError> {
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        return Err(MeshError::EmptyImage { face });
    }

    let image = if subsample > 1 {
        let (sw, sh) = ((w / subsample).max(1), (h / subsample).max(1));
        log::debug!("face {face}: subsampling {w}x{h} by {subsample} to {sw}x{sh}");
        image.resize_exact(sw, sh, FilterType::Triangle)
    } else {
        image
    };

    let (w, h) = (image.width(), image.height());
    let image = if w > max_dimension || h > max_dimension {
        log::debug!("face {face}: downscaling {w}x{h} to fit {max_dimension}");
        image.resize(max_dimension, max_dimension, FilterType::Triangle)
    } else {
        image
    };

    Ok(image.into_rgba8())
}

/// Nearest minification, linear magnification, repeat on both axes.
pub fn face_sampler_descriptor() -> wgpu::SamplerDescriptor<'static> {
    wgpu::SamplerDescriptor {
        label: Some("carousel face sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    }
}

/// Uploads one prepared image as a single-mip 2D texture.
pub fn upload_face_texture(
    ctx: &RenderCtx<'_>,
    face: usize,
    pixels: &RgbaImage,
) -> (wgpu::Texture, wgpu::TextureView) {
    let (width, height) = pixels.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let label = format!("carousel face {face} texture");
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FACE_TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, Rgb([200, 10, 10]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    // ── decode ───────────────────────────────────────────────────────────

    #[test]
    fn decodes_png_blob() {
        let img = decode_face(0, &png_bytes(4, 2)).unwrap();
        assert_eq!((img.width(), img.height()), (4, 2));
    }

    #[test]
    fn garbage_reports_face_index() {
        match decode_face(5, b"not an image") {
            Err(MeshError::Decode { face, .. }) => assert_eq!(face, 5),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_decode_error() {
        let err = open_face(2, "/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, MeshError::Decode { face: 2, .. }));
    }

    // ── prepare ──────────────────────────────────────────────────────────

    #[test]
    fn small_image_keeps_size_and_becomes_rgba() {
        let img = decode_face(0, &png_bytes(8, 4)).unwrap();
        let rgba = prepare_face_image(0, img, 1, 64).unwrap();
        assert_eq!(rgba.dimensions(), (8, 4));
        assert_eq!(rgba.get_pixel(0, 0).0, [200, 10, 10, 255]);
    }

    #[test]
    fn oversized_image_fits_limit_keeping_aspect() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(400, 100));
        let rgba = prepare_face_image(0, img, 1, 200).unwrap();
        assert_eq!(rgba.dimensions(), (200, 50));
    }

    #[test]
    fn subsample_halves_each_side() {
        let img = decode_face(0, &png_bytes(64, 30)).unwrap();
        let rgba = prepare_face_image(0, img, 2, 4096).unwrap();
        assert_eq!(rgba.dimensions(), (32, 15));

        let [r, _, _, a] = rgba.get_pixel(5, 5).0;
        assert!(r.abs_diff(200) <= 1, "r = {r}");
        assert_eq!(a, 255);
    }

    #[test]
    fn subsample_zero_or_one_keeps_size() {
        for factor in [0, 1] {
            let img = DynamicImage::ImageRgb8(RgbImage::new(10, 6));
            let rgba = prepare_face_image(0, img, factor, 64).unwrap();
            assert_eq!(rgba.dimensions(), (10, 6));
        }
    }

    #[test]
    fn subsample_never_reaches_zero() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(3, 1));
        let rgba = prepare_face_image(0, img, 4, 64).unwrap();
        assert_eq!(rgba.dimensions(), (1, 1));
    }

    #[test]
    fn subsample_then_limit() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(800, 200));
        let rgba = prepare_face_image(0, img, 2, 200).unwrap();
        assert_eq!(rgba.dimensions(), (200, 50));
    }

    #[test]
    fn empty_image_rejected() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert!(matches!(
            prepare_face_image(3, img, 2, 64),
            Err(MeshError::EmptyImage { face: 3 })
        ));
    }

    // ── sampler ──────────────────────────────────────────────────────────

    #[test]
    fn sampler_filters_and_wraps() {
        let d = face_sampler_descriptor();
        assert_eq!(d.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(d.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(d.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(d.address_mode_v, wgpu::AddressMode::Repeat);
    }
}
