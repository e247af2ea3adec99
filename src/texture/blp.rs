use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use log::warn;

use crate::texture::dxt::{BlockCodec, decode_block};
use crate::texture::pixel_buffer::PixelBuffer;

const MAGIC: &[u8; 4] = b"BLP2";
const HEADER_LEN: usize = 148;
const PALETTE_LEN: usize = 256 * 4;

struct BlpHeader {
    encoding: u8,
    alpha_depth: u8,
    alpha_encoding: u8,
    width: u32,
    height: u32,
    mip_offsets: [u32; 16],
    mip_sizes: [u32; 16],
}

fn parse_header(bytes: &[u8]) -> Option<BlpHeader> {
    if bytes.len() < HEADER_LEN || &bytes[0..4] != MAGIC {
        return None;
    }

    let mut rdr = Cursor::new(&bytes[4..HEADER_LEN]);
    let _compression_type = rdr.read_u32::<LittleEndian>().ok()?;
    let encoding = rdr.read_u8().ok()?;
    let alpha_depth = rdr.read_u8().ok()?;
    let alpha_encoding = rdr.read_u8().ok()?;
    let _has_mips = rdr.read_u8().ok()?;
    let width = rdr.read_u32::<LittleEndian>().ok()?;
    let height = rdr.read_u32::<LittleEndian>().ok()?;

    let mut mip_offsets = [0u32; 16];
    for slot in mip_offsets.iter_mut() {
        *slot = rdr.read_u32::<LittleEndian>().ok()?;
    }
    let mut mip_sizes = [0u32; 16];
    for slot in mip_sizes.iter_mut() {
        *slot = rdr.read_u32::<LittleEndian>().ok()?;
    }

    Some(BlpHeader {
        encoding,
        alpha_depth,
        alpha_encoding,
        width,
        height,
        mip_offsets,
        mip_sizes,
    })
}

fn mip0_payload<'a>(bytes: &'a [u8], header: &BlpHeader) -> Option<&'a [u8]> {
    let offset = header.mip_offsets[0] as usize;
    let size = header.mip_sizes[0] as usize;
    bytes.get(offset..offset.checked_add(size)?)
}

/// Decodes a BLP2 texture blob into a straight-RGBA pixel buffer.
/// Returns `None` for any format-level failure: too short, wrong magic, impossible
/// dimensions, an out-of-bounds mip payload, or an unrecognised encoding.
pub fn decode_blp(bytes: &[u8]) -> Option<PixelBuffer> {
    let header = parse_header(bytes)?;
    let mut out = PixelBuffer::new(header.width, header.height)?;
    let payload = mip0_payload(bytes, &header)?;

    match header.encoding {
        1 => decode_paletted(bytes, &header, payload, &mut out)?,
        2 => decode_block_compressed(&header, payload, &mut out),
        3 => decode_direct_argb(payload, &mut out)?,
        other => {
            warn!("Unknown BLP encoding {}", other);
            return None;
        }
    }

    Some(out)
}

fn decode_paletted(bytes: &[u8], header: &BlpHeader, payload: &[u8], out: &mut PixelBuffer) -> Option<()> {
    let palette_bytes = bytes.get(HEADER_LEN..HEADER_LEN + PALETTE_LEN)?;
    let mut palette = [[0u8; 4]; 256]; // BGRA as stored
    for (i, chunk) in palette_bytes.chunks_exact(4).enumerate() {
        palette[i] = [chunk[0], chunk[1], chunk[2], chunk[3]];
    }

    let pixel_count = header.width as usize * header.height as usize;
    let indices = payload.get(0..pixel_count)?;
    let alpha_plane = payload.get(pixel_count..).unwrap_or(&[]);

    for i in 0..pixel_count {
        let x = (i % header.width as usize) as u32;
        let y = (i / header.width as usize) as u32;
        let entry = palette[indices[i] as usize];
        let rgb = [entry[2], entry[1], entry[0]]; // BGRA -> RGB

        let alpha = match header.alpha_depth {
            0 => 255,
            1 => {
                let byte_idx = i / 8;
                let bit_idx = i % 8;
                match alpha_plane.get(byte_idx) {
                    Some(byte) if (byte >> bit_idx) & 1 == 1 => 255,
                    Some(_) => 0,
                    None => 255,
                }
            }
            4 => {
                let byte_idx = i / 2;
                match alpha_plane.get(byte_idx) {
                    Some(byte) => {
                        let nibble = if i % 2 == 0 { byte & 0xF } else { byte >> 4 };
                        nibble * 17
                    }
                    None => 255,
                }
            }
            8 => alpha_plane.get(i).copied().unwrap_or(255),
            _ => 255,
        };

        out.set_pixel(x, y, [rgb[0], rgb[1], rgb[2], alpha]);
    }

    Some(())
}

fn decode_block_compressed(header: &BlpHeader, payload: &[u8], out: &mut PixelBuffer) {
    let codec = BlockCodec::from_alpha_encoding(header.alpha_encoding as u32);
    let block_size = codec.block_size();
    let blocks_wide = header.width.div_ceil(4);
    let blocks_high = header.height.div_ceil(4);

    for by in 0..blocks_high {
        for bx in 0..blocks_wide {
            let block_index = (by * blocks_wide + bx) as usize;
            let start = block_index * block_size;
            let Some(block) = payload.get(start..start + block_size) else {
                continue; // truncated payload: leave remaining pixels at their default (transparent black)
            };
            decode_block(codec, block, bx * 4, by * 4, header.width, header.height, &mut out.rgba);
        }
    }
}

fn decode_direct_argb(payload: &[u8], out: &mut PixelBuffer) -> Option<()> {
    let expected = out.width as usize * out.height as usize * 4;
    let slice = payload.get(0..expected)?;
    out.rgba.copy_from_slice(slice);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(encoding: u8, alpha_depth: u8, alpha_encoding: u8, width: u32, height: u32, mip0_size: u32) -> Vec<u8> {
        let mut b = Vec::new();
        b.extend_from_slice(MAGIC);
        b.extend_from_slice(&0u32.to_le_bytes()); // compression type, unused
        b.push(encoding);
        b.push(alpha_depth);
        b.push(alpha_encoding);
        b.push(0); // has_mips
        b.extend_from_slice(&width.to_le_bytes());
        b.extend_from_slice(&height.to_le_bytes());

        let mut mip_offsets = [0u32; 16];
        let mut mip_sizes = [0u32; 16];
        mip_offsets[0] = HEADER_LEN as u32;
        mip_sizes[0] = mip0_size;
        if encoding == 1 {
            mip_offsets[0] += PALETTE_LEN as u32;
        }

        for o in mip_offsets {
            b.extend_from_slice(&o.to_le_bytes());
        }
        for s in mip_sizes {
            b.extend_from_slice(&s.to_le_bytes());
        }
        b
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = header_bytes(3, 8, 0, 2, 2, 16);
        bytes[0] = b'X';
        assert!(decode_blp(&bytes).is_none());
    }

    #[test]
    fn decodes_direct_argb() {
        let mut bytes = header_bytes(3, 8, 0, 1, 1, 4);
        bytes.extend_from_slice(&[10, 20, 30, 255]);
        let buf = decode_blp(&bytes).expect("should decode");
        assert_eq!(buf.width, 1);
        assert_eq!(buf.height, 1);
        assert_eq!(buf.rgba, vec![10, 20, 30, 255]);
    }

    #[test]
    fn decodes_paletted_opaque() {
        let mut bytes = header_bytes(1, 0, 0, 1, 1, 1);
        let mut palette = vec![0u8; 256 * 4];
        palette[0..4].copy_from_slice(&[10, 20, 30, 255]); // BGRA
        bytes.extend_from_slice(&palette);
        bytes.push(0); // single index pixel -> palette[0]
        let buf = decode_blp(&bytes).expect("should decode");
        assert_eq!(buf.rgba, vec![30, 20, 10, 255]); // BGRA -> RGBA, alpha depth 0 = opaque
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let bytes = header_bytes(3, 8, 0, 5000, 1, 4);
        assert!(decode_blp(&bytes).is_none());
    }
}
