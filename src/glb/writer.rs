use glam::{Vec2, Vec3};

use crate::glb::document::{
    Accessor, Asset, Attributes, Buffer, BufferView, Image, Material, Mesh, Node,
    PbrMetallicRoughness, Primitive, Root, Sampler, Scene, Texture, TextureRef,
    COMPONENT_TYPE_FLOAT, COMPONENT_TYPE_UNSIGNED_SHORT, FILTER_LINEAR, FILTER_LINEAR_MIPMAP_LINEAR,
    TARGET_ARRAY_BUFFER, TARGET_ELEMENT_ARRAY_BUFFER, WRAP_REPEAT,
};
use crate::mesh::assembler::AssembledMesh;

const GLB_MAGIC: u32 = 0x4654_6C67;
const GLB_VERSION: u32 = 2;
const CHUNK_TYPE_JSON: u32 = 0x4E4F_534A;

/// Packs a region's raw bytes into `bin`, padding with `pad_byte` up to the next
/// 4-byte boundary, and returns `(offset, length)` of the unpadded region. Every
/// buffer-view sub-region is individually padded before the next one begins.
fn push_region(bin: &mut Vec<u8>, bytes: &[u8], pad_byte: u8) -> (u32, u32) {
    let offset = bin.len() as u32;
    let length = bytes.len() as u32;
    bin.extend_from_slice(bytes);
    while bin.len() % 4 != 0 {
        bin.push(pad_byte);
    }
    (offset, length)
}

fn flatten_vec3(values: &[Vec3]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 12);
    for v in values {
        out.extend_from_slice(&v.x.to_le_bytes());
        out.extend_from_slice(&v.y.to_le_bytes());
        out.extend_from_slice(&v.z.to_le_bytes());
    }
    out
}

fn flatten_vec2(values: &[Vec2]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 8);
    for v in values {
        out.extend_from_slice(&v.x.to_le_bytes());
        out.extend_from_slice(&v.y.to_le_bytes());
    }
    out
}

fn flatten_indices(values: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 2);
    for &v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn component_bounds(values: &[Vec3]) -> ([f32; 3], [f32; 3]) {
    let mut min = [values[0].x, values[0].y, values[0].z];
    let mut max = min;
    for v in &values[1..] {
        min[0] = min[0].min(v.x);
        min[1] = min[1].min(v.y);
        min[2] = min[2].min(v.z);
        max[0] = max[0].max(v.x);
        max[1] = max[1].max(v.y);
        max[2] = max[2].max(v.z);
    }
    (min, max)
}

/// Builds the single binary chunk and JSON document for a mesh, with an optional
/// embedded PNG texture.
fn build_document(mesh: &AssembledMesh, png: Option<&[u8]>) -> (Root, Vec<u8>) {
    let mut bin = Vec::new();
    let mut buffer_views = Vec::new();
    let mut accessors = Vec::new();

    let index_bytes = flatten_indices(&mesh.indices);
    let (index_offset, index_length) = push_region(&mut bin, &index_bytes, 0);
    buffer_views.push(BufferView {
        buffer: 0,
        byte_offset: index_offset,
        byte_length: index_length,
        target: Some(TARGET_ELEMENT_ARRAY_BUFFER),
    });
    let index_min = *mesh.indices.iter().min().unwrap_or(&0);
    let index_max = *mesh.indices.iter().max().unwrap_or(&0);
    accessors.push(Accessor {
        buffer_view: 0,
        component_type: COMPONENT_TYPE_UNSIGNED_SHORT,
        count: mesh.indices.len() as u32,
        element_type: "SCALAR",
        min: Some(vec![index_min as f32]),
        max: Some(vec![index_max as f32]),
    });

    let position_bytes = flatten_vec3(&mesh.positions);
    let (position_offset, position_length) = push_region(&mut bin, &position_bytes, 0);
    buffer_views.push(BufferView {
        buffer: 0,
        byte_offset: position_offset,
        byte_length: position_length,
        target: Some(TARGET_ARRAY_BUFFER),
    });
    let (pos_min, pos_max) = component_bounds(&mesh.positions);
    accessors.push(Accessor {
        buffer_view: 1,
        component_type: COMPONENT_TYPE_FLOAT,
        count: mesh.positions.len() as u32,
        element_type: "VEC3",
        min: Some(pos_min.to_vec()),
        max: Some(pos_max.to_vec()),
    });

    let normal_bytes = flatten_vec3(&mesh.normals);
    let (normal_offset, normal_length) = push_region(&mut bin, &normal_bytes, 0);
    buffer_views.push(BufferView {
        buffer: 0,
        byte_offset: normal_offset,
        byte_length: normal_length,
        target: Some(TARGET_ARRAY_BUFFER),
    });
    accessors.push(Accessor {
        buffer_view: 2,
        component_type: COMPONENT_TYPE_FLOAT,
        count: mesh.normals.len() as u32,
        element_type: "VEC3",
        min: None,
        max: None,
    });

    let uv_bytes = flatten_vec2(&mesh.uvs);
    let (uv_offset, uv_length) = push_region(&mut bin, &uv_bytes, 0);
    buffer_views.push(BufferView {
        buffer: 0,
        byte_offset: uv_offset,
        byte_length: uv_length,
        target: Some(TARGET_ARRAY_BUFFER),
    });
    accessors.push(Accessor {
        buffer_view: 3,
        component_type: COMPONENT_TYPE_FLOAT,
        count: mesh.uvs.len() as u32,
        element_type: "VEC2",
        min: None,
        max: None,
    });

    let mut images = Vec::new();
    let mut samplers = Vec::new();
    let mut textures = Vec::new();
    let material = match png {
        Some(png_bytes) => {
            let (image_offset, image_length) = push_region(&mut bin, png_bytes, 0);
            buffer_views.push(BufferView {
                buffer: 0,
                byte_offset: image_offset,
                byte_length: image_length,
                target: None,
            });
            images.push(Image { buffer_view: 4, mime_type: "image/png" });
            samplers.push(Sampler {
                mag_filter: FILTER_LINEAR,
                min_filter: FILTER_LINEAR_MIPMAP_LINEAR,
                wrap_s: WRAP_REPEAT,
                wrap_t: WRAP_REPEAT,
            });
            textures.push(Texture { sampler: 0, source: 0 });
            Material {
                pbr_metallic_roughness: PbrMetallicRoughness {
                    base_color_factor: None,
                    base_color_texture: Some(TextureRef { index: 0 }),
                    metallic_factor: 0.0,
                    roughness_factor: 0.8,
                },
                double_sided: true,
            }
        }
        None => Material {
            pbr_metallic_roughness: PbrMetallicRoughness {
                base_color_factor: Some([0.8, 0.7, 0.6, 1.0]),
                base_color_texture: None,
                metallic_factor: 0.0,
                roughness_factor: 0.8,
            },
            double_sided: true,
        },
    };

    let root = Root {
        asset: Asset::default(),
        buffers: vec![Buffer { byte_length: bin.len() as u32 }],
        buffer_views,
        accessors,
        meshes: vec![Mesh {
            primitives: vec![Primitive {
                attributes: Attributes { position: 1, normal: 2, texcoord_0: 3 },
                indices: 0,
                material: 0,
            }],
        }],
        materials: vec![material],
        nodes: vec![Node { mesh: 0 }],
        scenes: vec![Scene { nodes: vec![0] }],
        scene: 0,
        images,
        samplers,
        textures,
    };

    (root, bin)
}

/// Serializes a mesh (and optional PNG texture) into a binary glTF container:
/// a 12-byte header, a space-padded JSON chunk, and a zero-padded BIN chunk.
pub fn write_glb(mesh: &AssembledMesh, png: Option<&[u8]>) -> Vec<u8> {
    let (root, bin) = build_document(mesh, png);

    let mut json = serde_json::to_vec(&root).expect("glTF document always serializes");
    while json.len() % 4 != 0 {
        json.push(0x20);
    }

    let mut bin_padded = bin;
    while bin_padded.len() % 4 != 0 {
        bin_padded.push(0);
    }

    let total_length = 12 + 8 + json.len() as u32 + 8 + bin_padded.len() as u32;

    let mut out = Vec::with_capacity(total_length as usize);
    out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    out.extend_from_slice(&GLB_VERSION.to_le_bytes());
    out.extend_from_slice(&total_length.to_le_bytes());

    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    out.extend_from_slice(&json);

    out.extend_from_slice(&(bin_padded.len() as u32).to_le_bytes());
    out.extend_from_slice(&u32::from_le_bytes(*b"BIN\0").to_le_bytes());
    out.extend_from_slice(&bin_padded);

    out
}
