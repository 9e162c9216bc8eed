use std::ops::{Add, AddAssign, Mul, Sub};

use glam::DVec4;

use crate::foundation::error::{RasterError, RasterResult};

/// Linear RGBA color with `f32` channels, nominally in `[0, 1]`.
///
/// Scaling by a scalar leaves alpha untouched so lighting terms can be accumulated without
/// disturbing coverage.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Blend towards `other`, with `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self.lerp_unclamped(other, t.clamp(0.0, 1.0))
    }

    pub fn lerp_unclamped(self, other: Self, t: f32) -> Self {
        Self::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
            lerp(self.a, other.a, t),
        )
    }

    /// Packed 4-lane form used by the vectorized lighting path, lane order R, G, B, A.
    pub fn to_lanes(self) -> DVec4 {
        DVec4::new(
            f64::from(self.r),
            f64::from(self.g),
            f64::from(self.b),
            f64::from(self.a),
        )
    }

    pub fn from_lanes(v: DVec4) -> Self {
        Self::new(v.x as f32, v.y as f32, v.z as f32, v.w as f32)
    }

    /// Quantize to the color buffer byte order (B, G, R, A).
    pub fn to_bgra8(self) -> [u8; 4] {
        [
            unit_to_u8(self.b),
            unit_to_u8(self.g),
            unit_to_u8(self.r),
            unit_to_u8(self.a),
        ]
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let [b, g, r, a] = self.to_bgra8();
        [r, g, b, a]
    }

    pub fn approx_eq(self, other: Self, eps: f32) -> bool {
        (self.r - other.r).abs() <= eps
            && (self.g - other.g).abs() <= eps
            && (self.b - other.b).abs() <= eps
            && (self.a - other.a).abs() <= eps
    }
}

impl Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Color {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b, self.a - rhs.a)
    }
}

impl Mul for Color {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.r * rhs.r, self.g * rhs.g, self.b * rhs.b, self.a * rhs.a)
    }
}

impl Mul<f32> for Color {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a)
    }
}

impl Mul<Color> for f32 {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        rhs * self
    }
}

/// Render target extents. The origin is always the top-left pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::validation(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(RasterError::validation("viewport extent exceeds i32"));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Row-major pixel index. Callers must check [`Viewport::contains`] first.
    pub fn pixel_index(self, x: i32, y: i32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }
}

pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn unit_to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
