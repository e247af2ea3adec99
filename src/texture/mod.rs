/// Texture decoding: turns a paletted/block-compressed/direct-ARGB blob into a
/// straight-alpha RGBA pixel buffer.
pub mod blp;
pub mod dxt;
pub mod pixel_buffer;
