/// Mesh assembly: compacts a model's referenced vertices, remaps triangle indices,
/// converts axis convention, and computes bounds (the "Mesh
/// Assembler").
pub mod assembler;
