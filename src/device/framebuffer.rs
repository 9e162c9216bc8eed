//! Color and depth targets shared by every worker.
//!
//! Depth is the one target several rasterizer tasks may touch at the same pixel in the same
//! round. Each cell is an `f32` stored as bits in an `AtomicU32` and updated by compare-and-swap,
//! so the nearest fragment wins whatever the task interleaving. The fragment stage then only
//! shades a fragment whose depth still equals the stored depth, which makes the color written
//! for a pixel independent of scheduling.

use std::{
    cmp::Ordering as CmpOrdering,
    sync::atomic::{AtomicU8, AtomicU32, Ordering},
};

use crate::foundation::math::Color;

/// Depth seeded by a clear; closer is smaller.
pub const FAR_DEPTH: f32 = 1.0;

/// Row-major BGRA8 pixels.
#[derive(Debug)]
pub struct ColorBuffer {
    bytes: Vec<AtomicU8>,
}

impl ColorBuffer {
    /// Zeroed (transparent black) buffer of `pixels` pixels.
    pub fn new(pixels: usize) -> Self {
        Self {
            bytes: (0..pixels * 4).map(|_| AtomicU8::new(0)).collect(),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.bytes.len() / 4
    }

    /// Set byte `plane` (0 = B, 1 = G, 2 = R, 3 = A) of every pixel.
    pub fn fill_plane(&self, plane: usize, value: u8) {
        for byte in self.bytes.iter().skip(plane).step_by(4) {
            byte.store(value, Ordering::Relaxed);
        }
    }

    /// Overwrite one pixel with raw BGRA bytes.
    pub fn write(&self, pixel: usize, bgra: [u8; 4]) {
        let base = pixel * 4;
        for (byte, value) in self.bytes[base..base + 4].iter().zip(bgra) {
            byte.store(value, Ordering::Relaxed);
        }
    }

    /// Write a shaded color as opaque BGRA8; the color's alpha is not stored.
    pub fn write_color(&self, pixel: usize, color: Color) {
        let [b, g, r, _] = color.to_bgra8();
        self.write(pixel, [b, g, r, 255]);
    }

    /// BGRA bytes of one pixel.
    pub fn pixel(&self, pixel: usize) -> [u8; 4] {
        let base = pixel * 4;
        std::array::from_fn(|i| self.bytes[base + i].load(Ordering::Relaxed))
    }

    pub fn to_bgra_vec(&self) -> Vec<u8> {
        self.bytes.iter().map(|b| b.load(Ordering::Relaxed)).collect()
    }

    /// Copy into a tightly packed RGBA8 slice of the same pixel count.
    pub fn copy_to_rgba(&self, out: &mut [u8]) {
        for (dst, px) in out.chunks_exact_mut(4).zip(self.bytes.chunks_exact(4)) {
            dst[0] = px[2].load(Ordering::Relaxed);
            dst[1] = px[1].load(Ordering::Relaxed);
            dst[2] = px[0].load(Ordering::Relaxed);
            dst[3] = px[3].load(Ordering::Relaxed);
        }
    }
}

/// One `f32` depth per pixel, seeded to [`FAR_DEPTH`].
#[derive(Debug)]
pub struct DepthBuffer {
    cells: Vec<AtomicU32>,
}

impl DepthBuffer {
    pub fn new(pixels: usize) -> Self {
        Self {
            cells: (0..pixels)
                .map(|_| AtomicU32::new(FAR_DEPTH.to_bits()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reset every cell to [`FAR_DEPTH`].
    pub fn clear(&self) {
        for cell in &self.cells {
            cell.store(FAR_DEPTH.to_bits(), Ordering::Relaxed);
        }
    }

    pub fn get(&self, pixel: usize) -> f32 {
        f32::from_bits(self.cells[pixel].load(Ordering::Acquire))
    }

    /// Store `depth` if it is strictly nearer than the current value.
    pub fn test_and_set(&self, pixel: usize, depth: f32) -> bool {
        let cell = &self.cells[pixel];
        let mut current = cell.load(Ordering::Relaxed);
        loop {
            // NaN never passes.
            let nearer = depth.partial_cmp(&f32::from_bits(current)) == Some(CmpOrdering::Less);
            if !nearer {
                return false;
            }
            match cell.compare_exchange_weak(
                current,
                depth.to_bits(),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    /// Whether `depth` is still the stored value at `pixel`.
    pub fn holds(&self, pixel: usize, depth: f32) -> bool {
        self.cells[pixel].load(Ordering::Acquire) == depth.to_bits()
    }

    pub fn to_vec(&self) -> Vec<f32> {
        (0..self.cells.len()).map(|i| self.get(i)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/device/framebuffer.rs"]
mod tests;
