//! Device surface: render context, frame buffers, swapchain and the draw submission API.

pub mod context;
#[allow(clippy::module_inception)]
pub mod device;
pub mod framebuffer;
pub mod swapchain;
