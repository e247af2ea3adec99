/// Character atlas compositing: resolves a base skin and per-item region overlays
/// and alpha-composites them onto a 512x512 canvas.
pub mod regions;

use std::collections::HashMap;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};

use formats::dbc::item_display::{BodyRegion, ItemDisplayRecord};

use crate::atlas::regions::{component_dir, rect, ATLAS_SIZE};
use crate::imaging::to_rgba_image;
use crate::io::mpq::loader::MPQLoader;
use crate::texture::blp::decode_blp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    fn suffix(self) -> &'static str {
        match self {
            Sex::Male => "_M",
            Sex::Female => "_F",
        }
    }
}

/// Filenames tried, in order, to resolve a character's base skin. Reused verbatim
/// by the character branch of the asset resolver.
pub fn base_skin_candidates(model_name: &str, skin_index: u8) -> Vec<String> {
    let nn = format!("{:02}", skin_index);
    vec![
        format!("{model_name}Skin00_{nn}.blp"),
        format!("{model_name}Skin{nn}_00.blp"),
        format!("{model_name}_skin.blp"),
        format!("{model_name}.blp"),
    ]
}

/// Case-insensitive substring fallback shared by the atlas's base-skin resolution
/// and the asset resolver's character/creature resolution: search `{dir}\{needle}`,
/// keep `.blp` matches, and take the lexicographically first.
pub fn substring_fallback(loader: &MPQLoader, dir: &str, needle: &str) -> Option<Vec<u8>> {
    let search = format!("{dir}\\{needle}");
    let mut matches = loader.list(&search);
    matches.retain(|p| p.to_ascii_lowercase().ends_with(".blp"));
    matches.sort();
    matches.into_iter().next().and_then(|path| loader.read(&path))
}

fn resolve_base_skin(loader: &MPQLoader, model_dir: &str, model_name: &str, skin_index: u8) -> Option<Vec<u8>> {
    for candidate in base_skin_candidates(model_name, skin_index) {
        let path = format!("{model_dir}\\{candidate}");
        if let Some(bytes) = loader.read(&path) {
            return Some(bytes);
        }
    }

    substring_fallback(loader, model_dir, &format!("{model_name}skin"))
}

fn resolve_overlay_texture(loader: &MPQLoader, component_dir: &str, token: &str, sex: Sex) -> Option<Vec<u8>> {
    for suffix in [sex.suffix(), "_U", ""] {
        let path = format!("Item\\TextureComponents\\{component_dir}\\{token}{suffix}.blp");
        if let Some(bytes) = loader.read(&path) {
            return Some(bytes);
        }
    }
    None
}

/// Alpha-composites `src` onto `dst` at `(x, y)`, straight-alpha `over`:
/// `out = src + dst*(1 - src.a)` per channel.
fn composite_over(dst: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        let dx = x + sx;
        let dy = y + sy;
        if dx >= dst.width() || dy >= dst.height() {
            continue;
        }
        let dst_pixel = *dst.get_pixel(dx, dy);
        let src_a = src_pixel[3] as f32 / 255.0;
        let mut out = [0u8; 4];
        for c in 0..4 {
            let s = src_pixel[c] as f32;
            let d = dst_pixel[c] as f32;
            out[c] = (s + d * (1.0 - src_a)).round().clamp(0.0, 255.0) as u8;
        }
        dst.put_pixel(dx, dy, Rgba(out));
    }
}

/// Resolves the region an overlay entry actually targets: a recognized suffix on
/// the token wins over the map's nominal region key.
fn resolve_region(nominal: BodyRegion, token: &str) -> BodyRegion {
    BodyRegion::from_suffix(token).unwrap_or(nominal)
}

/// Composites a character's body-region atlas: a resized base skin with item
/// overlays layered in caller order.
pub fn composite_atlas(
    loader: &MPQLoader,
    model_dir: &str,
    model_name: &str,
    skin_index: u8,
    sex: Sex,
    fallback_color: [u8; 4],
    item_order: &[u32],
    metadata: &HashMap<u32, ItemDisplayRecord>,
) -> RgbaImage {
    let base = resolve_base_skin(loader, model_dir, model_name, skin_index)
        .and_then(|bytes| decode_blp(&bytes))
        .map(|pixels| to_rgba_image(&pixels));

    let mut canvas = match base {
        Some(image) => image::imageops::resize(&image, ATLAS_SIZE, ATLAS_SIZE, FilterType::Lanczos3),
        None => RgbaImage::from_pixel(ATLAS_SIZE, ATLAS_SIZE, Rgba(fallback_color)),
    };

    for item_id in item_order {
        let Some(record) = metadata.get(item_id) else { continue };
        for (&nominal_region, token) in &record.tex {
            let region = resolve_region(nominal_region, token);
            let Some(bytes) = resolve_overlay_texture(loader, component_dir(region), token, sex) else { continue };
            let Some(pixels) = decode_blp(&bytes) else { continue };

            let r = rect(region);
            let resized = image::imageops::resize(&to_rgba_image(&pixels), r.w, r.h, FilterType::Lanczos3);
            composite_over(&mut canvas, &resized, r.x, r.y);
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_skin_candidate_order_is_stable() {
        let candidates = base_skin_candidates("HumanFemale", 3);
        assert_eq!(
            candidates,
            vec![
                "HumanFemaleSkin00_03.blp".to_string(),
                "HumanFemaleSkin03_00.blp".to_string(),
                "HumanFemale_skin.blp".to_string(),
                "HumanFemale.blp".to_string(),
            ]
        );
    }

    #[test]
    fn region_inference_from_suffix_beats_the_map_key() {
        assert_eq!(resolve_region(BodyRegion::LegUpper, "Armor_Chest_Robe_TU"), BodyRegion::TorsoUpper);
    }

    #[test]
    fn no_suffix_falls_back_to_the_map_key() {
        assert_eq!(resolve_region(BodyRegion::Hand, "Glove_Plain_01"), BodyRegion::Hand);
    }

    #[test]
    fn composite_over_blends_straight_alpha() {
        let mut dst = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 128]));
        composite_over(&mut dst, &src, 0, 0);
        let blended = dst.get_pixel(0, 0);
        assert_eq!(blended[0], 128); // 255*0.5 + 0*0.5 rounds to 128 (127.5 -> 128)
        assert_eq!(blended[3], 255); // 128 + 255*(1 - 0.5) = 255
    }

    #[test]
    fn no_base_skin_fills_the_fallback_color() {
        let loader = MPQLoader::new("/nonexistent", &[]);
        let metadata = HashMap::new();
        let atlas = composite_atlas(&loader, "Character\\Human\\Female", "HumanFemale", 0, Sex::Female, [10, 20, 30, 255], &[], &metadata);
        assert_eq!(atlas.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
        assert_eq!(atlas.width(), ATLAS_SIZE);
        assert_eq!(atlas.height(), ATLAS_SIZE);
    }
}
