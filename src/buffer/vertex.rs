use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};

use crate::foundation::error::{RasterError, RasterResult};

/// One pipeline vertex.
///
/// `position` is object space on input, clip space after vertex shading and, after the
/// clip-space divide, NDC with `position.w` holding `1/W`. At that point `normal`, `uv` and
/// `world` are premultiplied by `1/W` so they interpolate linearly in screen space; the fragment
/// stage multiplies them back by `W` before shading.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec4,
    pub normal: Vec3,
    pub uv: Vec2,
    /// World-space position written by the vertex stage.
    pub world: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position: position.extend(1.0),
            normal,
            uv,
            world: position,
        }
    }

    /// Component-wise blend of every attribute.
    pub fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        Self {
            position: a.position.lerp(b.position, t),
            normal: a.normal.lerp(b.normal, t),
            uv: a.uv.lerp(b.uv, t),
            world: a.world.lerp(b.world, t),
        }
    }

    /// The stored `1/W` after the clip-space divide.
    pub fn inv_w(&self) -> f32 {
        self.position.w
    }

    /// Screen-space depth of a divided vertex.
    pub fn depth(&self) -> f32 {
        self.position.z
    }
}

/// Interleaved float layout accepted by [`VertexBuffer::from_interleaved`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VertexLayout {
    /// `x y z`
    Position,
    /// `x y z u v`
    PositionUv,
    /// `x y z u v nx ny nz`
    PositionUvNormal,
}

impl VertexLayout {
    /// Floats per vertex.
    pub fn stride(self) -> usize {
        match self {
            Self::Position => 3,
            Self::PositionUv => 5,
            Self::PositionUvNormal => 8,
        }
    }
}

/// Immutable, cheaply clonable vertex storage.
#[derive(Clone, Debug)]
pub struct VertexBuffer {
    vertices: Arc<[Vertex]>,
    layout: VertexLayout,
}

impl VertexBuffer {
    /// Deinterleave `data` according to `layout`. Missing attributes are zero.
    pub fn from_interleaved(layout: VertexLayout, data: &[f32]) -> RasterResult<Self> {
        let stride = layout.stride();
        if data.len() % stride != 0 {
            return Err(RasterError::validation(format!(
                "vertex data length {} is not a multiple of the {layout:?} stride {stride}",
                data.len()
            )));
        }

        let vertices = data
            .chunks_exact(stride)
            .map(|c| {
                let position = Vec3::new(c[0], c[1], c[2]);
                let uv = match layout {
                    VertexLayout::Position => Vec2::ZERO,
                    _ => Vec2::new(c[3], c[4]),
                };
                let normal = match layout {
                    VertexLayout::PositionUvNormal => Vec3::new(c[5], c[6], c[7]),
                    _ => Vec3::ZERO,
                };
                Vertex::new(position, uv, normal)
            })
            .collect();

        Ok(Self { vertices, layout })
    }

    pub fn from_vertices(layout: VertexLayout, vertices: Vec<Vertex>) -> Self {
        Self {
            vertices: vertices.into(),
            layout,
        }
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub(crate) fn shared(&self) -> Arc<[Vertex]> {
        Arc::clone(&self.vertices)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/vertex.rs"]
mod tests;
