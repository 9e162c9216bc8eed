use std::sync::Arc;

use anyhow::Context;
use glam::{DVec4, Vec2};

use crate::foundation::{
    error::{RasterError, RasterResult},
    math::Color,
};

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WrapMode {
    /// Keep the fractional part.
    #[default]
    Repeat,
    /// Clamp to the edge texel.
    Clamp,
    /// Return the border color.
    Border,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FilterMode {
    Point,
    #[default]
    Bilinear,
}

/// Width×height texels in normalized RGBA, row 0 at `v = 0`.
///
/// Texel storage is shared and never mutated after construction; only the sampling
/// configuration (wrap, filter, border) can change. A second copy of the texels is kept in
/// 4-lane form for the vectorized lighting path.
#[derive(Clone, Debug)]
pub struct Texture2D {
    width: u32,
    height: u32,
    texels: Arc<[Color]>,
    lanes: Arc<[DVec4]>,
    wrap: WrapMode,
    filter: FilterMode,
    border: Color,
}

impl Texture2D {
    /// Build from tightly packed RGBA8 rows.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::validation(format!(
                "texture must be non-empty, got {width}x{height}"
            )));
        }
        let expected = (width as usize) * (height as usize) * 4;
        if rgba.len() != expected {
            return Err(RasterError::validation(format!(
                "texture data is {} bytes, expected {expected} for {width}x{height} RGBA8",
                rgba.len()
            )));
        }

        let texels: Arc<[Color]> = rgba
            .chunks_exact(4)
            .map(|px| Color::from_rgba8([px[0], px[1], px[2], px[3]]))
            .collect();
        let lanes = texels.iter().map(|c| c.to_lanes()).collect();

        Ok(Self {
            width,
            height,
            texels,
            lanes,
            wrap: WrapMode::default(),
            filter: FilterMode::default(),
            border: Color::BLACK,
        })
    }

    pub fn from_image(image: &image::RgbaImage) -> RasterResult<Self> {
        let (width, height) = image.dimensions();
        Self::from_rgba8(width, height, image.as_raw())
    }

    /// Decode an encoded image (PNG, JPEG, ...) through the `image` crate.
    pub fn decode(bytes: &[u8]) -> RasterResult<Self> {
        let rgba = image::load_from_memory(bytes)
            .context("decode texture image")?
            .to_rgba8();
        Self::from_image(&rgba)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    pub fn set_wrap_mode(&mut self, wrap: WrapMode) {
        self.wrap = wrap;
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    pub fn set_filter_mode(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    pub fn border_color(&self) -> Color {
        self.border
    }

    pub fn set_border_color(&mut self, border: Color) {
        self.border = border;
    }

    pub fn with_wrap_mode(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_filter_mode(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn texel(&self, x: u32, y: u32) -> Color {
        self.texels[self.texel_index(x, y)]
    }

    pub fn sample(&self, uv: Vec2) -> Color {
        let Some((u, v)) = self.wrap_uv(uv) else {
            return self.border;
        };
        match self.filter {
            FilterMode::Point => self.texels[self.point_index(u, v)],
            FilterMode::Bilinear => {
                let taps = self.bilinear_taps(u, v);
                let [c00, c10, c01, c11] = taps.indices.map(|i| self.texels[i]);
                let top = c00.lerp_unclamped(c10, taps.tx);
                let bottom = c01.lerp_unclamped(c11, taps.tx);
                top.lerp_unclamped(bottom, taps.ty)
            }
        }
    }

    /// [`Texture2D::sample`] over the 4-lane texel copy, lane order R, G, B, A.
    pub fn sample_lanes(&self, uv: Vec2) -> DVec4 {
        let Some((u, v)) = self.wrap_uv(uv) else {
            return self.border.to_lanes();
        };
        match self.filter {
            FilterMode::Point => self.lanes[self.point_index(u, v)],
            FilterMode::Bilinear => {
                let taps = self.bilinear_taps(u, v);
                let [c00, c10, c01, c11] = taps.indices.map(|i| self.lanes[i]);
                let (tx, ty) = (f64::from(taps.tx), f64::from(taps.ty));
                c00.lerp(c10, tx).lerp(c01.lerp(c11, tx), ty)
            }
        }
    }

    fn wrap_uv(&self, uv: Vec2) -> Option<(f32, f32)> {
        match self.wrap {
            WrapMode::Repeat => Some((repeat(uv.x), repeat(uv.y))),
            WrapMode::Clamp => Some((uv.x.clamp(0.0, 1.0), uv.y.clamp(0.0, 1.0))),
            WrapMode::Border => {
                let inside = (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y);
                inside.then_some((uv.x, uv.y))
            }
        }
    }

    fn point_index(&self, u: f32, v: f32) -> usize {
        let x = texel_floor(u * self.width as f32, self.width);
        let y = texel_floor(v * self.height as f32, self.height);
        self.texel_index(x, y)
    }

    // Texel centers sit at half-integer coordinates.
    fn bilinear_taps(&self, u: f32, v: f32) -> BilinearTaps {
        let fx = u * self.width as f32 - 0.5;
        let fy = v * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let (tx, ty) = (fx - x0, fy - y0);

        let (x0, y0) = (x0 as i64, y0 as i64);
        let xa = self.neighbour(x0, self.width);
        let xb = self.neighbour(x0 + 1, self.width);
        let ya = self.neighbour(y0, self.height);
        let yb = self.neighbour(y0 + 1, self.height);

        BilinearTaps {
            indices: [
                self.texel_index(xa, ya),
                self.texel_index(xb, ya),
                self.texel_index(xa, yb),
                self.texel_index(xb, yb),
            ],
            tx,
            ty,
        }
    }

    fn neighbour(&self, i: i64, extent: u32) -> u32 {
        let extent = i64::from(extent);
        let i = match self.wrap {
            WrapMode::Repeat => i.rem_euclid(extent),
            WrapMode::Clamp | WrapMode::Border => i.clamp(0, extent - 1),
        };
        i as u32
    }

    fn texel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

struct BilinearTaps {
    /// Row-major: (x0, y0), (x1, y0), (x0, y1), (x1, y1).
    indices: [usize; 4],
    tx: f32,
    ty: f32,
}

fn repeat(t: f32) -> f32 {
    if (0.0..=1.0).contains(&t) {
        t
    } else {
        t - t.floor()
    }
}

fn texel_floor(t: f32, extent: u32) -> u32 {
    (t.floor().max(0.0) as u32).min(extent - 1)
}

#[cfg(test)]
#[path = "../../tests/unit/texture/texture2d.rs"]
mod tests;
