//! softras is a multi-threaded CPU software rasterizer.
//!
//! A [`GraphicsDevice`] owns a fixed pool of worker threads, a color and depth target and a
//! swapchain. Each draw call runs five barrier-separated stages, each fanned out over every
//! worker:
//!
//! - vertex shading through the bound [`Shader`]
//! - primitive assembly (back-face cull and frustum test)
//! - clip-space divide
//! - scanline and Bresenham rasterization with an atomic depth test
//! - fragment shading through the selected [`LightingModel`]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod device;
pub mod diagnostics;
pub mod dispatch;
pub mod foundation;
pub mod pipeline;
pub mod shader;
pub mod texture;

pub use crate::buffer::{
    index::IndexBuffer,
    vertex::{Vertex, VertexBuffer, VertexLayout},
};
pub use crate::device::{
    device::{ClearFlags, GraphicsDevice},
    framebuffer::{ColorBuffer, DepthBuffer, FAR_DEPTH},
    swapchain::Swapchain,
};
pub use crate::diagnostics::profiler::{ProfileCounter, ProfileSnapshot, ProfileTimer, Profiler};
pub use crate::dispatch::{dispatcher::TaskDispatcher, partition::PartitionedList};
pub use crate::foundation::{
    config::{DeviceConfig, MAX_CORES},
    error::{RasterError, RasterResult},
    math::{Color, Viewport},
};
pub use crate::pipeline::{
    draw::WIREFRAME_COLOR,
    rasterizer::{Fragment, Rasterizer},
    state::{CullMode, FillMode, FrontFace, PrimitiveKind, RasterState},
};
pub use crate::shader::{
    builtin::{FlatColorShader, LitShader},
    contract::{Shader, Uniforms},
    lighting::{Attenuation, Light, LightKind, LightingModel, ScalarLighting, VectorLighting},
};
pub use crate::texture::texture2d::{FilterMode, Texture2D, WrapMode};
