//! Immutable 2D textures with wrap-aware point and bilinear sampling.

pub mod texture2d;
