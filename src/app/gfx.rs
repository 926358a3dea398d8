// src/app/gfx.rs
use std::path::Path;

use eframe::egui::{self as eg, ColorImage, TextureHandle};

/// Longest edge kept for the preview texture.
pub const PREVIEW_MAX_EDGE: u32 = 1024;

/// Decode an image file into a `ColorImage`, shrunk (keeping aspect) so neither edge
/// exceeds `max_edge`.
pub fn decode_downsized(path: &Path, max_edge: u32) -> Result<ColorImage, String> {
    let img = image::ImageReader::open(path)
        .map_err(|e| format!("open image {}: {e}", path.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", path.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", path.display()))?;

    let img = if img.width() > max_edge || img.height() > max_edge {
        img.thumbnail(max_edge, max_edge)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Load the generated image as a preview texture named after its path. (UI thread only)
pub fn load_preview(ctx: &eg::Context, path: &Path) -> Result<TextureHandle, String> {
    let preview = decode_downsized(path, PREVIEW_MAX_EDGE)?;
    Ok(ctx.load_texture(path.to_string_lossy(), preview, eg::TextureOptions::LINEAR))
}

/// Largest size with the image's aspect that fits `avail`; never scales up.
pub fn fit_size(image: eg::Vec2, avail: eg::Vec2) -> eg::Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return eg::Vec2::ZERO;
    }
    let scale = (avail.x / image.x).min(avail.y / image.y).min(1.0).max(0.0);
    image * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgba};

    #[test]
    fn fit_keeps_aspect_and_never_upscales() {
        let fitted = fit_size(eg::vec2(1024.0, 512.0), eg::vec2(400.0, 400.0));
        assert_eq!(fitted, eg::vec2(400.0, 200.0));

        let tall = fit_size(eg::vec2(500.0, 1000.0), eg::vec2(800.0, 300.0));
        assert_eq!(tall, eg::vec2(150.0, 300.0));

        let small = fit_size(eg::vec2(100.0, 50.0), eg::vec2(800.0, 600.0));
        assert_eq!(small, eg::vec2(100.0, 50.0));

        assert_eq!(fit_size(eg::Vec2::ZERO, eg::vec2(10.0, 10.0)), eg::Vec2::ZERO);
    }

    #[test]
    fn downsizes_large_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(300, 150, Rgba([1u8, 2, 3, 255])))
            .save(&path)
            .unwrap();

        let small = decode_downsized(&path, 100).unwrap();
        assert_eq!(small.size, [100, 50]);
        assert_eq!(small.pixels.len(), 100 * 50);
        assert_eq!(small.pixels[0], eg::Color32::from_rgb(1, 2, 3));

        let full = decode_downsized(&path, 1024).unwrap();
        assert_eq!(full.size, [300, 150]);
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        std::fs::write(&path, b"plain text").unwrap();
        assert!(decode_downsized(&path, 100).is_err());
        assert!(decode_downsized(&dir.path().join("missing.png"), 100).is_err());
    }
}
