use serde::Serialize;

/// A minimal glTF 2.0 JSON document covering exactly the fields this converter needs:
/// one buffer, up to five buffer views, four accessors, one mesh/primitive, one
/// material, one node, one scene, and an optional image/sampler/texture trio.
#[derive(Serialize)]
pub struct Root {
    pub asset: Asset,
    pub buffers: Vec<Buffer>,
    #[serde(rename = "bufferViews")]
    pub buffer_views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub nodes: Vec<Node>,
    pub scenes: Vec<Scene>,
    pub scene: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub samplers: Vec<Sampler>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub textures: Vec<Texture>,
}

#[derive(Serialize)]
pub struct Asset {
    pub version: &'static str,
}

impl Default for Asset {
    fn default() -> Self {
        Asset { version: "2.0" }
    }
}

#[derive(Serialize)]
pub struct Buffer {
    #[serde(rename = "byteLength")]
    pub byte_length: u32,
}

pub const TARGET_ARRAY_BUFFER: u32 = 34962;
pub const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;

#[derive(Serialize)]
pub struct BufferView {
    pub buffer: u32,
    #[serde(rename = "byteOffset")]
    pub byte_offset: u32,
    #[serde(rename = "byteLength")]
    pub byte_length: u32,
    #[serde(rename = "target", skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

pub const COMPONENT_TYPE_UNSIGNED_SHORT: u32 = 5123;
pub const COMPONENT_TYPE_FLOAT: u32 = 5126;

#[derive(Serialize)]
pub struct Accessor {
    #[serde(rename = "bufferView")]
    pub buffer_view: u32,
    #[serde(rename = "componentType")]
    pub component_type: u32,
    pub count: u32,
    #[serde(rename = "type")]
    pub element_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f32>>,
}

#[derive(Serialize)]
pub struct Mesh {
    pub primitives: Vec<Primitive>,
}

#[derive(Serialize)]
pub struct Primitive {
    pub attributes: Attributes,
    pub indices: u32,
    pub material: u32,
}

#[derive(Serialize)]
pub struct Attributes {
    #[serde(rename = "POSITION")]
    pub position: u32,
    #[serde(rename = "NORMAL")]
    pub normal: u32,
    #[serde(rename = "TEXCOORD_0")]
    pub texcoord_0: u32,
}

#[derive(Serialize)]
pub struct Material {
    #[serde(rename = "pbrMetallicRoughness")]
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    #[serde(rename = "doubleSided")]
    pub double_sided: bool,
}

#[derive(Serialize, Default)]
pub struct PbrMetallicRoughness {
    #[serde(rename = "baseColorFactor", skip_serializing_if = "Option::is_none")]
    pub base_color_factor: Option<[f32; 4]>,
    #[serde(rename = "baseColorTexture", skip_serializing_if = "Option::is_none")]
    pub base_color_texture: Option<TextureRef>,
    #[serde(rename = "metallicFactor")]
    pub metallic_factor: f32,
    #[serde(rename = "roughnessFactor")]
    pub roughness_factor: f32,
}

#[derive(Serialize)]
pub struct TextureRef {
    pub index: u32,
}

#[derive(Serialize)]
pub struct Node {
    pub mesh: u32,
}

#[derive(Serialize)]
pub struct Scene {
    pub nodes: Vec<u32>,
}

#[derive(Serialize)]
pub struct Image {
    #[serde(rename = "bufferView")]
    pub buffer_view: u32,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

pub const FILTER_LINEAR: u32 = 9729;
pub const FILTER_LINEAR_MIPMAP_LINEAR: u32 = 9987;
pub const WRAP_REPEAT: u32 = 10497;

#[derive(Serialize)]
pub struct Sampler {
    #[serde(rename = "magFilter")]
    pub mag_filter: u32,
    #[serde(rename = "minFilter")]
    pub min_filter: u32,
    #[serde(rename = "wrapS")]
    pub wrap_s: u32,
    #[serde(rename = "wrapT")]
    pub wrap_t: u32,
}

#[derive(Serialize)]
pub struct Texture {
    pub sampler: u32,
    pub source: u32,
}
