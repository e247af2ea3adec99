/// Binary glTF (GLB) serialization: a minimal glTF 2.0 JSON document paired with a
/// single binary chunk.
pub mod document;
pub mod writer;

pub use writer::write_glb;
