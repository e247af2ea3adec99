/// Block-codec decode for the three S3TC variants the BLP2 block-compressed encoding can
/// select between (spec §4.2, encoding 2): BC1 (DXT1), BC2 (DXT3), BC3 (DXT5).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCodec {
    Bc1,
    Bc2,
    Bc3,
}

impl BlockCodec {
    /// `alpha_encoding`: 0 -> BC1, 1 -> BC2, 7 -> BC3, anything else falls back to BC1.
    pub fn from_alpha_encoding(alpha_encoding: u32) -> BlockCodec {
        match alpha_encoding {
            0 => BlockCodec::Bc1,
            1 => BlockCodec::Bc2,
            7 => BlockCodec::Bc3,
            _ => BlockCodec::Bc1,
        }
    }

    pub fn block_size(self) -> usize {
        match self {
            BlockCodec::Bc1 => 8,
            BlockCodec::Bc2 | BlockCodec::Bc3 => 16,
        }
    }
}

fn decode_565(value: u16) -> [u8; 3] {
    let r5 = ((value >> 11) & 0x1F) as u32;
    let g6 = ((value >> 5) & 0x3F) as u32;
    let b5 = (value & 0x1F) as u32;

    let r = ((r5 * 527 + 23) >> 6) as u8;
    let g = ((g6 * 259 + 33) >> 6) as u8;
    let b = ((b5 * 527 + 23) >> 6) as u8;
    [r, g, b]
}

/// Decodes the 8-byte BC1 colour block shared by BC1/BC2/BC3 into 16 RGB colours
/// (row-major, 4x4). `punch_through_alpha` reports whether pixel index 3 means
/// "transparent" (BC1 3-colour mode) rather than a 4th interpolated colour, which
/// only applies when the block is used standalone (BC1), not alongside explicit or
/// interpolated alpha (BC2/BC3).
fn decode_color_block(block: &[u8], punch_through_alpha: bool) -> ([[u8; 3]; 4], bool, u32) {
    let color0 = u16::from_le_bytes([block[0], block[1]]);
    let color1 = u16::from_le_bytes([block[2], block[3]]);
    let indices = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);

    let c0 = decode_565(color0);
    let c1 = decode_565(color1);
    let four_color_mode = !punch_through_alpha || color0 > color1;

    let mix = |a: u8, b: u8, ta: u32, tb: u32| -> u8 { ((a as u32 * ta + b as u32 * tb) / (ta + tb)) as u8 };

    let palette = if four_color_mode {
        let c2 = [
            mix(c0[0], c1[0], 2, 1),
            mix(c0[1], c1[1], 2, 1),
            mix(c0[2], c1[2], 2, 1),
        ];
        let c3 = [
            mix(c0[0], c1[0], 1, 2),
            mix(c0[1], c1[1], 1, 2),
            mix(c0[2], c1[2], 1, 2),
        ];
        [c0, c1, c2, c3]
    } else {
        let c2 = [
            mix(c0[0], c1[0], 1, 1),
            mix(c0[1], c1[1], 1, 1),
            mix(c0[2], c1[2], 1, 1),
        ];
        [c0, c1, c2, [0, 0, 0]]
    };

    (palette, four_color_mode, indices)
}

/// Decodes one block into `out`, an RGBA buffer for the whole image, at block-origin
/// `(block_x, block_y)` in pixels. Pixels outside `(width, height)` are skipped.
pub fn decode_block(codec: BlockCodec, block: &[u8], block_x: u32, block_y: u32, width: u32, height: u32, out: &mut [u8]) {
    match codec {
        BlockCodec::Bc1 => decode_bc1_block(block, block_x, block_y, width, height, out),
        BlockCodec::Bc2 => decode_bc2_block(block, block_x, block_y, width, height, out),
        BlockCodec::Bc3 => decode_bc3_block(block, block_x, block_y, width, height, out),
    }
}

fn write_pixel(out: &mut [u8], width: u32, height: u32, x: u32, y: u32, rgba: [u8; 4]) {
    if x >= width || y >= height {
        return;
    }
    let idx = (y as usize * width as usize + x as usize) * 4;
    out[idx..idx + 4].copy_from_slice(&rgba);
}

fn decode_bc1_block(block: &[u8], block_x: u32, block_y: u32, width: u32, height: u32, out: &mut [u8]) {
    let (palette, four_color_mode, indices) = decode_color_block(block, true);

    for row in 0..4u32 {
        for col in 0..4u32 {
            let bit_pos = (row * 4 + col) * 2;
            let idx = ((indices >> bit_pos) & 0b11) as usize;
            let rgb = palette[idx];
            let alpha = if !four_color_mode && idx == 3 { 0 } else { 255 };
            write_pixel(out, width, height, block_x + col, block_y + row, [rgb[0], rgb[1], rgb[2], alpha]);
        }
    }
}

fn decode_bc2_block(block: &[u8], block_x: u32, block_y: u32, width: u32, height: u32, out: &mut [u8]) {
    let alpha_bits = u64::from_le_bytes(block[0..8].try_into().unwrap());
    let (palette, _, indices) = decode_color_block(&block[8..16], false);

    for row in 0..4u32 {
        for col in 0..4u32 {
            let pixel_i = row * 4 + col;
            let nibble = ((alpha_bits >> (pixel_i * 4)) & 0xF) as u8;
            let alpha = nibble * 17;

            let bit_pos = pixel_i * 2;
            let idx = ((indices >> bit_pos) & 0b11) as usize;
            let rgb = palette[idx];
            write_pixel(out, width, height, block_x + col, block_y + row, [rgb[0], rgb[1], rgb[2], alpha]);
        }
    }
}

fn decode_bc3_block(block: &[u8], block_x: u32, block_y: u32, width: u32, height: u32, out: &mut [u8]) {
    let alpha0 = block[0];
    let alpha1 = block[1];
    let mut alpha_indices_bytes = [0u8; 8];
    alpha_indices_bytes[..6].copy_from_slice(&block[2..8]);
    let alpha_bits = u64::from_le_bytes(alpha_indices_bytes);

    let alpha_palette: [u8; 8] = if alpha0 > alpha1 {
        [
            alpha0,
            alpha1,
            ((6 * alpha0 as u32 + 1 * alpha1 as u32) / 7) as u8,
            ((5 * alpha0 as u32 + 2 * alpha1 as u32) / 7) as u8,
            ((4 * alpha0 as u32 + 3 * alpha1 as u32) / 7) as u8,
            ((3 * alpha0 as u32 + 4 * alpha1 as u32) / 7) as u8,
            ((2 * alpha0 as u32 + 5 * alpha1 as u32) / 7) as u8,
            ((1 * alpha0 as u32 + 6 * alpha1 as u32) / 7) as u8,
        ]
    } else {
        [
            alpha0,
            alpha1,
            ((4 * alpha0 as u32 + 1 * alpha1 as u32) / 5) as u8,
            ((3 * alpha0 as u32 + 2 * alpha1 as u32) / 5) as u8,
            ((2 * alpha0 as u32 + 3 * alpha1 as u32) / 5) as u8,
            ((1 * alpha0 as u32 + 4 * alpha1 as u32) / 5) as u8,
            0,
            255,
        ]
    };

    let (palette, _, indices) = decode_color_block(&block[8..16], false);

    for row in 0..4u32 {
        for col in 0..4u32 {
            let pixel_i = row * 4 + col;
            let alpha_idx = ((alpha_bits >> (pixel_i * 3)) & 0b111) as usize;
            let alpha = alpha_palette[alpha_idx];

            let bit_pos = pixel_i * 2;
            let idx = ((indices >> bit_pos) & 0b11) as usize;
            let rgb = palette[idx];
            write_pixel(out, width, height, block_x + col, block_y + row, [rgb[0], rgb[1], rgb[2], alpha]);
        }
    }
}
