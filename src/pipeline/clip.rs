//! Cohen–Sutherland segment clipping against an axis-aligned screen rectangle (y down).

use glam::Vec2;

const LEFT: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const BOTTOM: u8 = 0b0100;
const TOP: u8 = 0b1000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ClipRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ClipRect {
    fn outcode(&self, p: Vec2) -> u8 {
        let mut code = 0;
        if p.x < self.min.x {
            code |= LEFT;
        } else if p.x > self.max.x {
            code |= RIGHT;
        }
        if p.y < self.min.y {
            code |= TOP;
        } else if p.y > self.max.y {
            code |= BOTTOM;
        }
        code
    }

    /// Portion of `p0 → p1` inside the rectangle, endpoints in the original order.
    pub fn clip(&self, mut p0: Vec2, mut p1: Vec2) -> Option<(Vec2, Vec2)> {
        let mut c0 = self.outcode(p0);
        let mut c1 = self.outcode(p1);
        // Each pass settles one boundary of one endpoint.
        for _ in 0..8 {
            if c0 | c1 == 0 {
                return Some((p0, p1));
            }
            if c0 & c1 != 0 {
                return None;
            }

            let out = if c0 != 0 { c0 } else { c1 };
            let d = p1 - p0;
            let p = if out & TOP != 0 {
                Vec2::new(p0.x + d.x * (self.min.y - p0.y) / d.y, self.min.y)
            } else if out & BOTTOM != 0 {
                Vec2::new(p0.x + d.x * (self.max.y - p0.y) / d.y, self.max.y)
            } else if out & LEFT != 0 {
                Vec2::new(self.min.x, p0.y + d.y * (self.min.x - p0.x) / d.x)
            } else {
                Vec2::new(self.max.x, p0.y + d.y * (self.max.x - p0.x) / d.x)
            };

            if out == c0 {
                p0 = p;
                c0 = self.outcode(p0);
            } else {
                p1 = p;
                c1 = self.outcode(p1);
            }
        }
        // Rounding can leave an intersection a hair outside a boundary.
        Some((p0.clamp(self.min, self.max), p1.clamp(self.min, self.max)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/clip.rs"]
mod tests;
