/// Asset resolution policy: given a model and an asset class, picks candidate
/// texture paths and queries the archive overlay.
use formats::m2::types::{M2Asset, M2TextureType};

use crate::atlas::{base_skin_candidates, substring_fallback};
use crate::io::mpq::loader::MPQLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Character,
    Creature,
    Object,
    Item,
}

fn creature_candidates(model_name: &str) -> Vec<String> {
    vec![
        format!("{model_name}.blp"),
        format!("{model_name}_skin.blp"),
        format!("{model_name}Skin.blp"),
        format!("{model_name}00.blp"),
        format!("{model_name}_00.blp"),
    ]
}

fn resolve_by_candidates(loader: &MPQLoader, model_dir: &str, candidates: Vec<String>) -> Option<Vec<u8>> {
    for candidate in candidates {
        let path = format!("{model_dir}\\{candidate}");
        if let Some(bytes) = loader.read(&path) {
            return Some(bytes);
        }
    }
    None
}

/// Picks the model's first texture definition with an embedded filename:
/// type `None` (0) and a non-empty name.
fn item_embedded_texture(asset: &M2Asset) -> Option<&str> {
    asset
        .textures
        .iter()
        .find(|t| matches!(t.texture_type, M2TextureType::None) && !t.filename.is_empty())
        .map(|t| t.filename.as_str())
}

/// Resolves a model's main texture bytes per the candidate ordering defined for
/// its asset class.
pub fn resolve(
    loader: &MPQLoader,
    model_dir: &str,
    model_name: &str,
    skin_index: u8,
    class: AssetClass,
    asset: Option<&M2Asset>,
) -> Option<Vec<u8>> {
    match class {
        AssetClass::Character => {
            resolve_by_candidates(loader, model_dir, base_skin_candidates(model_name, skin_index))
                .or_else(|| substring_fallback(loader, model_dir, &format!("{model_name}skin")))
        }
        AssetClass::Creature | AssetClass::Object => {
            resolve_by_candidates(loader, model_dir, creature_candidates(model_name))
                .or_else(|| substring_fallback(loader, model_dir, &format!("{model_name}skin")))
        }
        AssetClass::Item => {
            if let Some(filename) = asset.and_then(item_embedded_texture) {
                if let Some(bytes) = loader.read(filename) {
                    return Some(bytes);
                }
            }
            resolve(loader, model_dir, model_name, skin_index, AssetClass::Creature, asset)
        }
    }
}
