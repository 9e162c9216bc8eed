use std::path::Path;

use anyhow::Context;

use crate::{
    device::framebuffer::ColorBuffer,
    foundation::{error::RasterResult, math::Viewport},
};

/// Two RGBA8 surfaces: the back one receives the next frame, the front one is on display.
#[derive(Clone, Debug)]
pub struct Swapchain {
    viewport: Viewport,
    surfaces: [Vec<u8>; 2],
    front: usize,
    presented: u64,
}

impl Swapchain {
    pub fn new(viewport: Viewport) -> Self {
        let bytes = viewport.pixel_count() * 4;
        Self {
            viewport,
            surfaces: [vec![0; bytes], vec![0; bytes]],
            front: 0,
            presented: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames presented since construction.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Convert `color` into the back surface and make it the front one.
    pub fn present(&mut self, color: &ColorBuffer) {
        let back = 1 - self.front;
        color.copy_to_rgba(&mut self.surfaces[back]);
        self.front = back;
        self.presented += 1;
    }

    /// Tightly packed RGBA8 rows of the last presented frame.
    pub fn front(&self) -> &[u8] {
        &self.surfaces[self.front]
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> RasterResult<()> {
        let path = path.as_ref();
        image::save_buffer_with_format(
            path,
            self.front(),
            self.viewport.width,
            self.viewport.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/device/swapchain.rs"]
mod tests;
