use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use formats::m2::resolve::remap_triangles;
use formats::m2::types::{M2Asset, M2SkinProfile};

/// A compact, renderable triangle mesh produced from a skeletal model + skin
/// companion pair.
#[derive(Debug, Clone)]
pub struct AssembledMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u16>,
    pub bbox_min: Vec3,
    pub bbox_max: Vec3,
}

/// Converts WoW's right-handed, Z-up axis convention to glTF's Y-up convention:
/// `(x, y, z) -> (x, z, -y)`.
fn z_up_to_y_up(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

/// Assembles a dense, renderable mesh from a model's vertex pool and a skin's
/// topology.
///
/// Returns `None` if the skin has no triangles or the triangle list references no
/// vertices at all -- an empty mesh is a content-level failure and the caller
/// must not emit a GLB for it.
pub fn assemble(asset: &M2Asset, skin: &M2SkinProfile) -> Option<AssembledMesh> {
    let triangles = remap_triangles(skin);
    if triangles.is_empty() {
        return None;
    }

    // BTreeMap keeps referenced indices visited in ascending order of the original
    // index, giving stable, deterministic dense output arrays.
    let mut original_to_dense: BTreeMap<u32, u32> = BTreeMap::new();
    for &original in &triangles {
        let next_dense = original_to_dense.len() as u32;
        original_to_dense.entry(original).or_insert(next_dense);
    }

    if original_to_dense.is_empty() {
        return None;
    }

    let mut positions = Vec::with_capacity(original_to_dense.len());
    let mut normals = Vec::with_capacity(original_to_dense.len());
    let mut uvs = Vec::with_capacity(original_to_dense.len());

    for &original in original_to_dense.keys() {
        match asset.vertices.get(original as usize) {
            Some(vertex) => {
                positions.push(z_up_to_y_up(Vec3::new(vertex.pos.x, vertex.pos.y, vertex.pos.z)));
                normals.push(z_up_to_y_up(Vec3::new(vertex.normal.x, vertex.normal.y, vertex.normal.z)));
                uvs.push(Vec2::new(vertex.tex_coords[0].x, vertex.tex_coords[0].y));
            }
            None => {
                positions.push(Vec3::ZERO);
                normals.push(Vec3::ZERO);
                uvs.push(Vec2::ZERO);
            }
        }
    }

    let indices: Vec<u16> = triangles
        .iter()
        .map(|original| *original_to_dense.get(original).unwrap_or(&0) as u16)
        .collect();

    let mut bbox_min = positions[0];
    let mut bbox_max = positions[0];
    for &p in &positions[1..] {
        bbox_min = bbox_min.min(p);
        bbox_max = bbox_max.max(p);
    }

    Some(AssembledMesh { positions, normals, uvs, indices, bbox_min, bbox_max })
}

#[cfg(test)]
mod tests {
    use super::*;
    use formats::common::types::{C2Vector, C3Vector};
    use formats::m2::types::{M2Vertex, Version};

    fn vertex(x: f32, y: f32, z: f32) -> M2Vertex {
        M2Vertex {
            pos: C3Vector { x, y, z },
            bone_weights: [0; 4],
            bone_indices: [0; 4],
            normal: C3Vector { x: 0.0, y: 0.0, z: 1.0 },
            tex_coords: [C2Vector { x: 0.5, y: 0.5 }, C2Vector { x: 0.0, y: 0.0 }],
        }
    }

    fn asset_with_vertices(verts: Vec<M2Vertex>) -> M2Asset {
        M2Asset {
            magic: 0,
            version: Version { major: 1, minor: 8 },
            name: String::new(),
            vertices: verts,
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

    fn skin(vertices: Vec<u16>, indices: Vec<u16>) -> M2SkinProfile {
        M2SkinProfile {
            #[cfg(feature = "wotlk")]
            magic: 0,
            vertices,
            indices,
            submeshes: vec![],
            batches: vec![],
            boneCountMax: 0,
        }
    }

    #[test]
    fn empty_triangle_list_is_a_hard_failure() {
        let asset = asset_with_vertices(vec![vertex(0.0, 0.0, 0.0)]);
        let skin = skin(vec![0], vec![]);
        assert!(assemble(&asset, &skin).is_none());
    }

    #[test]
    fn compacts_vertices_and_remaps_triangles() {
        let asset = asset_with_vertices(vec![vertex(1.0, 2.0, 3.0), vertex(4.0, 5.0, 6.0), vertex(7.0, 8.0, 9.0)]);
        // skin-local vertex 0 -> model vertex 2, skin-local 1 -> model vertex 0
        let skin = skin(vec![2, 0], vec![0, 1, 0]);
        let mesh = assemble(&asset, &skin).expect("should assemble");

        // referenced original indices {0, 2}, visited ascending -> dense 0 = model 0, dense 1 = model 2
        assert_eq!(mesh.positions.len(), 2);
        assert_eq!(mesh.indices, vec![1, 0, 1]);
    }

    #[test]
    fn applies_z_up_to_y_up_conversion() {
        let asset = asset_with_vertices(vec![vertex(1.0, 2.0, 3.0)]);
        let skin = skin(vec![0], vec![0, 0, 0]);
        let mesh = assemble(&asset, &skin).unwrap();
        assert_eq!(mesh.positions[0], Vec3::new(1.0, 3.0, -2.0));
        assert_eq!(mesh.normals[0], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn bbox_covers_all_positions() {
        let asset = asset_with_vertices(vec![vertex(-1.0, 0.0, 0.0), vertex(1.0, 5.0, -2.0)]);
        let skin = skin(vec![0, 1], vec![0, 1, 0]);
        let mesh = assemble(&asset, &skin).unwrap();
        assert!(mesh.bbox_min.x <= mesh.bbox_max.x);
        assert!(mesh.bbox_min.y <= mesh.bbox_max.y);
        assert!(mesh.bbox_min.z <= mesh.bbox_max.z);
    }
}
