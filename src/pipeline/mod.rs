//! The five-stage draw pipeline and the scan converter it drives.
//!
//! Stages run strictly in order, each fanned out over every core and closed by a dispatcher
//! barrier: vertex shading, primitive assembly (cull and frustum test), clip-space divide,
//! rasterization, fragment shading.

pub mod assembly;
pub(crate) mod clip;
pub mod draw;
pub mod rasterizer;
pub mod state;
