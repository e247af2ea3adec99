use crate::m2::types::{M2Asset, M2SkinProfile};

/// Rewrites the skin's raw triangle list (indices into the vertex-remap table) into
/// model-vertex indices: `triangles[i] = remap[raw_triangles[i]]` (spec component C5,
/// §3 "Skin Companion", §4.5). A raw index past the end of the remap table resolves
/// to model-vertex 0 rather than failing the whole skin.
pub fn remap_triangles(skin: &M2SkinProfile) -> Vec<u32> {
    skin.indices
        .iter()
        .map(|&raw| skin.vertices.get(raw as usize).copied().unwrap_or(0) as u32)
        .collect()
}

/// Resolves the texture-definition index a submesh should render with (spec
/// component C5, "Skin Companion Parser", §4.5 "Submesh -> texture resolution").
///
/// Scans batches (the model's texture units) in encounter order; the first whose
/// `skinSectionIndex` equals `submesh_index` wins. Its `textureComboIndex` is an
/// index into the texture-lookup table (`textureCombos`); if that table is shorter
/// than the index, fall back to using the index directly against the
/// texture-definition table (spec §9: "observed to matter for certain assets").
/// A submesh with no matching batch resolves to texture 0.
pub fn resolve_submesh_texture(asset: &M2Asset, skin: &M2SkinProfile, submesh_index: u16) -> usize {
    let Some(combo_index) = skin
        .batches
        .iter()
        .find(|batch| batch.skinSectionIndex == submesh_index)
        .map(|batch| batch.textureComboIndex as usize)
    else {
        return 0;
    };

    match asset.textureCombos.get(combo_index) {
        Some(&texture_id) => texture_id as usize,
        None => combo_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::m2::types::{M2Batch, Version};

    fn empty_asset() -> M2Asset {
        M2Asset {
            magic: 0,
            version: Version { major: 1, minor: 8 },
            name: String::new(),
            vertices: vec![],
            #[cfg(feature = "wotlk")]
            num_skin_profiles: 0,
            textures: vec![],
            materials: vec![],
            textureCombos: vec![],
            textureCoordCombos: vec![],
            textureWeightCombos: vec![],
            textureTransformCombos: vec![],
        }
    }

    fn batch(skin_section_index: u16, texture_combo_index: u16) -> M2Batch {
        M2Batch {
            flags: 0,
            priorityPlane: 0,
            shader_id: 0,
            skinSectionIndex: skin_section_index,
            geosetIndex: 0,
            colorIndex: 0,
            materialIndex: 0,
            materialLayer: 0,
            textureCount: 1,
            textureComboIndex: texture_combo_index,
            textureCoordComboIndex: 0,
            textureWeightComboIndex: 0,
            textureTransformComboIndex: 0,
        }
    }

    fn skin_with_batches(batches: Vec<M2Batch>) -> M2SkinProfile {
        M2SkinProfile {
            #[cfg(feature = "wotlk")]
            magic: 0,
            vertices: vec![],
            indices: vec![],
            submeshes: vec![],
            batches,
            boneCountMax: 0,
        }
    }

    #[test]
    fn remaps_raw_triangle_indices_through_the_vertex_remap_table() {
        let skin = M2SkinProfile {
            #[cfg(feature = "wotlk")]
            magic: 0,
            vertices: vec![5, 7, 9], // skin-local index -> model vertex index
            indices: vec![0, 1, 2, 2, 1, 0],
            submeshes: vec![],
            batches: vec![],
            boneCountMax: 0,
        };
        assert_eq!(remap_triangles(&skin), vec![5, 7, 9, 9, 7, 5]);
    }

    #[test]
    fn out_of_range_raw_index_remaps_to_zero() {
        let skin = M2SkinProfile {
            #[cfg(feature = "wotlk")]
            magic: 0,
            vertices: vec![5],
            indices: vec![0, 99],
            submeshes: vec![],
            batches: vec![],
            boneCountMax: 0,
        };
        assert_eq!(remap_triangles(&skin), vec![5, 0]);
    }

    #[test]
    fn resolves_through_the_lookup_table() {
        let mut asset = empty_asset();
        asset.textureCombos = vec![7, 8, 9];
        let skin = skin_with_batches(vec![batch(0, 1)]);
        assert_eq!(resolve_submesh_texture(&asset, &skin, 0), 8);
    }

    #[test]
    fn falls_back_to_direct_indexing_when_lookup_table_is_shorter() {
        let mut asset = empty_asset();
        asset.textureCombos = vec![7]; // combo_index 2 is out of range
        let skin = skin_with_batches(vec![batch(0, 2)]);
        assert_eq!(resolve_submesh_texture(&asset, &skin, 0), 2);
    }

    #[test]
    fn unmatched_submesh_resolves_to_zero() {
        let asset = empty_asset();
        let skin = skin_with_batches(vec![batch(3, 5)]);
        assert_eq!(resolve_submesh_texture(&asset, &skin, 0), 0);
    }

    #[test]
    fn first_matching_batch_in_encounter_order_wins() {
        let mut asset = empty_asset();
        asset.textureCombos = vec![10, 20];
        let skin = skin_with_batches(vec![batch(0, 0), batch(0, 1)]);
        assert_eq!(resolve_submesh_texture(&asset, &skin, 0), 10);
    }
}
