//! Programmable vertex/fragment contract, per-draw uniforms and the built-in lighting model.

/// Built-in flat-color and lit shaders.
pub mod builtin;
/// Shader trait and uniform state.
pub mod contract;
/// Lights and the scalar/vectorized lighting strategies.
pub mod lighting;
