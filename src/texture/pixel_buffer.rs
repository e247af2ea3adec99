const MAX_DIMENSION: u32 = 4096;

/// `width x height` of straight (non-premultiplied) RGBA, channel order R, G, B, A.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Option<PixelBuffer> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return None;
        }

        Some(PixelBuffer {
            width,
            height,
            rgba: vec![0u8; width as usize * height as usize * 4],
        })
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.rgba[idx..idx + 4].copy_from_slice(&rgba);
    }
}
