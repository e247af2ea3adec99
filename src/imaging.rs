use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::texture::pixel_buffer::PixelBuffer;

/// Converts a decoded straight-alpha RGBA pixel buffer into an `image` crate
/// buffer for resizing/encoding.
pub fn to_rgba_image(buffer: &PixelBuffer) -> RgbaImage {
    RgbaImage::from_raw(buffer.width, buffer.height, buffer.rgba.clone())
        .unwrap_or_else(|| RgbaImage::new(buffer.width, buffer.height))
}

/// Resizes `image` so its longer side is at most `max_side`, preserving aspect
/// ratio; leaves it untouched if already within bounds (keeps embedded GLB
/// texture).
pub fn resize_longer_side(image: &RgbaImage, max_side: u32) -> RgbaImage {
    let (width, height) = (image.width(), image.height());
    let longer = width.max(height);
    if longer <= max_side || longer == 0 {
        return image.clone();
    }

    let scale = max_side as f32 / longer as f32;
    let new_width = ((width as f32) * scale).round().max(1.0) as u32;
    let new_height = ((height as f32) * scale).round().max(1.0) as u32;
    image::imageops::resize(image, new_width, new_height, image::imageops::FilterType::Lanczos3)
}

/// Encodes an RGBA image to a PNG byte buffer.
pub fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(image, image.width(), image.height(), ExtendedColorType::Rgba8)
        .expect("PNG encoding of an in-memory RGBA buffer does not fail");
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_longer_side_leaves_small_images_untouched() {
        let image = RgbaImage::new(100, 50);
        let resized = resize_longer_side(&image, 512);
        assert_eq!((resized.width(), resized.height()), (100, 50));
    }

    #[test]
    fn resize_longer_side_scales_down_to_the_cap() {
        let image = RgbaImage::new(2048, 1024);
        let resized = resize_longer_side(&image, 512);
        assert_eq!(resized.width(), 512);
        assert_eq!(resized.height(), 256);
    }

    #[test]
    fn encode_png_round_trips_through_the_png_decoder() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let bytes = encode_png(&image);
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0), image.get_pixel(0, 0));
    }
}
