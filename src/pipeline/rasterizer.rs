//! Scan conversion of divided primitives into depth-tested fragments.
//!
//! Triangles are split at the middle vertex into flat-top and flat-bottom halves and filled
//! scanline by scanline. Lines use integer Bresenham stepping after Cohen–Sutherland clipping
//! to the viewport. Every candidate pixel goes through [`DepthBuffer::test_and_set`]; only
//! passing fragments are emitted, carrying the depth they stored.

use glam::Vec2;

use crate::{
    buffer::vertex::Vertex,
    device::framebuffer::DepthBuffer,
    foundation::math::{Viewport, lerp},
    pipeline::clip::ClipRect,
};

/// An interpolated vertex bound to a pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub x: i32,
    pub y: i32,
    /// Screen-space-linear depth written to the depth buffer.
    pub depth: f32,
    pub vertex: Vertex,
}

impl Fragment {
    /// Blend towards `other` and pin the result to scanline `y`.
    fn lerp(&self, other: &Self, t: f32, y: i32) -> Self {
        Self {
            x: (self.x as f32 + (other.x - self.x) as f32 * t + 0.5).floor() as i32,
            y,
            depth: lerp(self.depth, other.depth, t),
            vertex: Vertex::lerp(&self.vertex, &other.vertex, t),
        }
    }
}

/// One worker's scan converter. Holds only the viewport and its cached half extents.
#[derive(Clone, Copy, Debug)]
pub struct Rasterizer {
    viewport: Viewport,
    half_width: f32,
    half_height: f32,
}

impl Rasterizer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            half_width: (viewport.width / 2) as f32,
            half_height: (viewport.height / 2) as f32,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Unclamped NDC → pixel mapping, y flipped so the origin is top-left.
    fn to_screen(&self, v: &Vertex) -> Vec2 {
        Vec2::new(
            ((1.0 + v.position.x) * self.half_width + 0.5).floor(),
            ((1.0 - v.position.y) * self.half_height + 0.5).floor(),
        )
    }

    /// Map a divided vertex to its clamped pixel.
    pub fn screen_map(&self, v: &Vertex) -> Fragment {
        let p = self.to_screen(v);
        Fragment {
            x: p.x.clamp(0.0, (self.viewport.width - 1) as f32) as i32,
            y: p.y.clamp(0.0, (self.viewport.height - 1) as f32) as i32,
            depth: v.depth(),
            vertex: *v,
        }
    }

    pub fn triangle(
        &self,
        depth: &DepthBuffer,
        out: &mut Vec<Fragment>,
        a: &Vertex,
        b: &Vertex,
        c: &Vertex,
    ) {
        let mut f = [a, b, c].map(|v| self.screen_map(v));
        f.sort_by_key(|f| (f.y, f.x));
        let [f0, f1, f2] = f;
        let mut scan = Scan {
            depth,
            out,
            viewport: self.viewport,
        };

        if f0.y == f2.y {
            scan.span(&f0, &f2);
        } else if f0.y == f1.y {
            scan.top_flat(&f0, &f1, &f2, f0.y);
        } else if f1.y == f2.y {
            scan.bottom_flat(&f1, &f2, &f0);
        } else {
            let t = (f1.y - f0.y) as f32 / (f2.y - f0.y) as f32;
            let split = f0.lerp(&f2, t, f1.y);
            let (left, right) = if split.x < f1.x {
                (split, f1)
            } else {
                (f1, split)
            };
            scan.bottom_flat(&left, &right, &f0);
            // The split row was already covered by the upper half.
            scan.top_flat(&left, &right, &f2, f1.y + 1);
        }
    }

    /// Bresenham segment. Endpoints are clipped to the viewport in screen space; attributes are
    /// interpolated along the unclipped segment.
    pub fn line(&self, depth: &DepthBuffer, out: &mut Vec<Fragment>, a: &Vertex, b: &Vertex) {
        let (p0, p1) = (self.to_screen(a), self.to_screen(b));
        let bounds = ClipRect {
            min: Vec2::ZERO,
            max: Vec2::new(
                (self.viewport.width - 1) as f32,
                (self.viewport.height - 1) as f32,
            ),
        };
        let Some((c0, c1)) = bounds.clip(p0, p1) else {
            return;
        };

        let span = p1 - p0;
        let along_x = span.x.abs() >= span.y.abs();
        let param = |x: i32, y: i32| -> f32 {
            let t = if span == Vec2::ZERO {
                0.0
            } else if along_x {
                (x as f32 - p0.x) / span.x
            } else {
                (y as f32 - p0.y) / span.y
            };
            t.clamp(0.0, 1.0)
        };

        let start = Fragment {
            x: 0,
            y: 0,
            depth: a.depth(),
            vertex: *a,
        };
        let end = Fragment {
            depth: b.depth(),
            vertex: *b,
            ..start
        };
        let mut scan = Scan {
            depth,
            out,
            viewport: self.viewport,
        };
        bresenham(
            (c0.x.round() as i32, c0.y.round() as i32),
            (c1.x.round() as i32, c1.y.round() as i32),
            |x, y| scan.plot(&start, &end, x, y, param(x, y)),
        );
    }
}

/// Integer Bresenham walk from `p0` to `p1`, both ends inclusive.
pub(crate) fn bresenham(
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
    mut plot: impl FnMut(i32, i32),
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;
    loop {
        plot(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Depth-testing fragment sink for one primitive.
struct Scan<'a> {
    depth: &'a DepthBuffer,
    out: &'a mut Vec<Fragment>,
    viewport: Viewport,
}

impl Scan<'_> {
    /// Emit the blend of `from → to` at `t` for pixel `(x, y)` if it passes the depth test.
    fn plot(&mut self, from: &Fragment, to: &Fragment, x: i32, y: i32, t: f32) {
        if !self.viewport.contains(x, y) {
            return;
        }
        let z = lerp(from.depth, to.depth, t);
        if self
            .depth
            .test_and_set(self.viewport.pixel_index(x, y), z)
        {
            self.out.push(Fragment {
                x,
                y,
                depth: z,
                vertex: Vertex::lerp(&from.vertex, &to.vertex, t),
            });
        }
    }

    /// Horizontal run between two fragments on the same scanline.
    fn span(&mut self, left: &Fragment, right: &Fragment) {
        let (left, right) = if right.x < left.x {
            (right, left)
        } else {
            (left, right)
        };
        if left.x == right.x {
            self.plot(left, right, left.x, left.y, 0.0);
            return;
        }
        let width = (right.x - left.x) as f32;
        for x in left.x..=right.x {
            self.plot(left, right, x, left.y, (x - left.x) as f32 / width);
        }
    }

    /// `left` and `right` share the top scanline; edges converge on `bottom`. Rows above
    /// `first_row` are skipped.
    fn top_flat(&mut self, left: &Fragment, right: &Fragment, bottom: &Fragment, first_row: i32) {
        if bottom.y == left.y {
            self.span(left, right);
            return;
        }
        let height = (bottom.y - left.y) as f32;
        for y in first_row.max(left.y)..=bottom.y {
            let t = (y - left.y) as f32 / height;
            let l = left.lerp(bottom, t, y);
            let r = right.lerp(bottom, t, y);
            self.span(&l, &r);
        }
    }

    /// `left` and `right` share the bottom scanline; edges start at `top`.
    fn bottom_flat(&mut self, left: &Fragment, right: &Fragment, top: &Fragment) {
        if left.y == top.y {
            self.span(left, right);
            return;
        }
        let height = (left.y - top.y) as f32;
        for y in top.y..=left.y {
            let t = (y - top.y) as f32 / height;
            let l = top.lerp(left, t, y);
            let r = top.lerp(right, t, y);
            self.span(&l, &r);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/rasterizer.rs"]
mod tests;
