use std::io::Cursor;

use crate::common::types::{C2Vector, C3Vector};
use crate::m2::reader::M2Reader;

/// Builds a minimal, hand-assembled WotLK-flavoured M2 buffer: a header with every array
/// pointing past the fixed-size header into an appended data section.
struct M2Builder {
    header: Vec<u8>,
    data: Vec<u8>,
    /// positions (in `header`) of offset words that still need `4 + header.len()` added,
    /// since `header` keeps growing after the descriptor for an earlier array is written.
    patches: Vec<usize>,
}

impl M2Builder {
    fn new() -> Self {
        M2Builder { header: Vec::new(), data: Vec::new(), patches: Vec::new() }
    }

    fn u8(&mut self, v: u8) -> &mut Self {
        self.header.push(v);
        self
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.header.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn f32(&mut self, v: f32) -> &mut Self {
        self.header.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn vec3(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.f32(x).f32(y).f32(z)
    }

    fn empty_array(&mut self) -> &mut Self {
        self.u32(0).u32(0)
    }

    /// Appends `bytes` to the trailing data section and writes a (size, offset) array
    /// descriptor pointing at it, where `size` counts elements. The offset is data-relative
    /// until `finish()` patches it to be absolute from the start of the file.
    fn array(&mut self, elem_count: u32, bytes: &[u8]) -> &mut Self {
        let data_relative_offset = self.data.len() as u32;
        self.u32(elem_count);
        self.patches.push(self.header.len());
        self.u32(data_relative_offset);
        self.data.extend_from_slice(bytes);
        self
    }

    fn finish(mut self) -> Vec<u8> {
        let header_total_len = 4 + self.header.len(); // includes the 4-byte magic
        for patch_pos in &self.patches {
            let slot = *patch_pos; // position within `self.header`
            let data_relative = u32::from_le_bytes(self.header[slot..slot + 4].try_into().unwrap());
            let absolute = header_total_len as u32 + data_relative;
            self.header[slot..slot + 4].copy_from_slice(&absolute.to_le_bytes());
        }

        let mut buf = Vec::new();
        buf.extend_from_slice(b"MD20");
        buf.append(&mut self.header);
        buf.append(&mut self.data);
        buf
    }
}

fn vertex_bytes(pos: (f32, f32, f32), normal: (f32, f32, f32), uv: (f32, f32)) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&pos.0.to_le_bytes());
    b.extend_from_slice(&pos.1.to_le_bytes());
    b.extend_from_slice(&pos.2.to_le_bytes());
    b.extend_from_slice(&[0u8; 4]); // bone_weights
    b.extend_from_slice(&[0u8; 4]); // bone_indices
    b.extend_from_slice(&normal.0.to_le_bytes());
    b.extend_from_slice(&normal.1.to_le_bytes());
    b.extend_from_slice(&normal.2.to_le_bytes());
    b.extend_from_slice(&uv.0.to_le_bytes());
    b.extend_from_slice(&uv.1.to_le_bytes());
    b.extend_from_slice(&[0u8; 8]); // second uv set, unused here
    b
}

fn build_minimal_m2(name: &str, verts: &[Vec<u8>]) -> Vec<u8> {
    let mut b = M2Builder::new();
    b.u8(8).u8(1).u8(0).u8(0); // Version: minor=8, major=1 (WotLK)

    let name_bytes = {
        let mut v = name.as_bytes().to_vec();
        v.push(0);
        v
    };
    b.array(name_bytes.len() as u32, &name_bytes); // name
    b.u32(0); // global flags

    b.empty_array(); // global_loops
    b.empty_array(); // sequences
    b.empty_array(); // sequenceIdxHashById
    b.empty_array(); // bones
    b.empty_array(); // boneIndicesById

    let vertex_bytes_flat: Vec<u8> = verts.iter().flat_map(|v| v.clone()).collect();
    b.array(verts.len() as u32, &vertex_bytes_flat); // vertices

    b.u32(0); // num_skin_profiles (wotlk)
    b.empty_array(); // colors
    b.empty_array(); // textures
    b.empty_array(); // texture_weights
    b.empty_array(); // texture_transforms
    b.empty_array(); // textureIndicesById
    b.empty_array(); // materials
    b.empty_array(); // boneCombos
    b.empty_array(); // textureCombos
    b.empty_array(); // textureCoordCombos
    b.empty_array(); // textureWeightCombos
    b.empty_array(); // textureTransformCombos

    b.vec3(0.0, 0.0, 0.0).vec3(0.0, 0.0, 0.0); // bounding_box
    b.f32(0.0); // bounding_sphere_radius
    b.vec3(0.0, 0.0, 0.0).vec3(0.0, 0.0, 0.0); // collision_box
    b.f32(0.0); // collision_sphere_radius

    b.empty_array(); // collisionIndices
    b.empty_array(); // collisionPositions
    b.empty_array(); // collisionFaceNormals
    b.empty_array(); // attachments
    b.empty_array(); // attachmentIndicesById
    b.empty_array(); // events
    b.empty_array(); // lights
    b.empty_array(); // cameras
    b.empty_array(); // cameraIndicesById
    b.empty_array(); // ribbon_emitters
    b.empty_array(); // particle_emitters

    b.finish()
}

#[test]
fn parses_name_and_vertices() {
    let verts = vec![
        vertex_bytes((1.0, 2.0, 3.0), (0.0, 0.0, 1.0), (0.1, 0.2)),
        vertex_bytes((4.0, 5.0, 6.0), (0.0, 0.0, 1.0), (0.3, 0.4)),
    ];
    let bytes = build_minimal_m2("Chair01.m2", &verts);
    let mut rdr = Cursor::new(bytes);

    let asset = M2Reader::parse_asset(&mut rdr).expect("should parse");
    assert_eq!(asset.name, "Chair01.m2");
    assert_eq!(asset.vertices.len(), 2);
    assert_eq!(asset.vertices[0].pos.x, 1.0);
    assert_eq!(asset.vertices[1].pos.z, 6.0);
    assert!(asset.textures.is_empty());
    assert!(asset.materials.is_empty());
}

#[test]
fn rejects_bad_magic() {
    let mut bytes = build_minimal_m2("x", &[]);
    bytes[0] = b'X'; // corrupt the magic
    let mut rdr = Cursor::new(bytes);
    assert!(M2Reader::parse_asset(&mut rdr).is_err());
}

struct SkinBuilder {
    header: Vec<u8>,
    data: Vec<u8>,
    patches: Vec<usize>,
}

impl SkinBuilder {
    fn new() -> Self {
        SkinBuilder { header: Vec::new(), data: Vec::new(), patches: Vec::new() }
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.header.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn empty_array(&mut self) -> &mut Self {
        self.u32(0).u32(0)
    }

    fn array(&mut self, elem_count: u32, bytes: &[u8]) -> &mut Self {
        let data_relative_offset = self.data.len() as u32;
        self.u32(elem_count);
        self.patches.push(self.header.len());
        self.u32(data_relative_offset);
        self.data.extend_from_slice(bytes);
        self
    }

    fn finish(mut self) -> Vec<u8> {
        let header_total_len = 4 + self.header.len();
        for patch_pos in &self.patches {
            let slot = *patch_pos;
            let data_relative = u32::from_le_bytes(self.header[slot..slot + 4].try_into().unwrap());
            let absolute = header_total_len as u32 + data_relative;
            self.header[slot..slot + 4].copy_from_slice(&absolute.to_le_bytes());
        }

        let mut buf = Vec::new();
        buf.extend_from_slice(b"SKIN");
        buf.append(&mut self.header);
        buf.append(&mut self.data);
        buf
    }
}

#[test]
fn parses_skin_profile_with_batches() {
    let mut b = SkinBuilder::new();
    let indices: Vec<u16> = vec![0, 1, 2];
    let index_bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
    b.array(3, &index_bytes.clone()); // vertices (reusing the same values for test simplicity)
    b.array(3, &index_bytes); // indices
    b.empty_array(); // bones
    b.empty_array(); // submeshes

    // one M2Batch: flags(u8) priorityPlane(i8) + 11 u16 fields
    let mut batch_bytes = Vec::new();
    batch_bytes.push(0u8); // flags
    batch_bytes.push(0u8); // priorityPlane
    for v in [0u16, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0] {
        batch_bytes.extend_from_slice(&v.to_le_bytes());
    }
    b.array(1, &batch_bytes); // batches
    b.u32(4); // boneCountMax

    let bytes = b.finish();
    let mut rdr = Cursor::new(bytes);
    let skin = M2Reader::parse_skin_profile(&mut rdr).expect("should parse");
    assert_eq!(skin.indices, vec![0, 1, 2]);
    assert_eq!(skin.batches.len(), 1);
    assert_eq!(skin.batches[0].textureComboIndex, 1);
}

#[test]
fn c2_and_c3_vector_roundtrip() {
    use crate::common::reader::Parseable;

    let mut buf = Vec::new();
    buf.extend_from_slice(&1.5f32.to_le_bytes());
    buf.extend_from_slice(&2.5f32.to_le_bytes());
    buf.extend_from_slice(&3.5f32.to_le_bytes());
    let mut rdr = Cursor::new(buf);
    let v = C3Vector::parse(&mut rdr).unwrap();
    assert_eq!((v.x, v.y, v.z), (1.5, 2.5, 3.5));

    let mut buf2 = Vec::new();
    buf2.extend_from_slice(&0.25f32.to_le_bytes());
    buf2.extend_from_slice(&0.75f32.to_le_bytes());
    let mut rdr2 = Cursor::new(buf2);
    let uv = C2Vector::parse(&mut rdr2).unwrap();
    assert_eq!((uv.x, uv.y), (0.25, 0.75));
}
