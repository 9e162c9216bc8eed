//! Vertex and index buffers, deinterleaved once at construction.

pub mod index;
pub mod vertex;
