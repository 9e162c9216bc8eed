use std::sync::Arc;

use crate::{
    buffer::{
        index::IndexBuffer,
        vertex::{Vertex, VertexBuffer},
    },
    device::framebuffer::{ColorBuffer, DepthBuffer},
    dispatch::partition::PartitionedList,
    foundation::math::{Color, Viewport},
    pipeline::{
        draw::{DrawTargets, Pipeline},
        rasterizer::Fragment,
        state::RasterState,
    },
    shader::contract::Shader,
};

/// Mutable per-device state for one viewport size.
///
/// A resize builds a fresh context, so buffers, bindings and fixed-function state all return
/// to their defaults together.
pub struct RenderContext {
    viewport: Viewport,
    color: Arc<ColorBuffer>,
    depth: Arc<DepthBuffer>,
    pub(crate) vertex_buffer: Option<VertexBuffer>,
    pub(crate) index_buffer: Option<IndexBuffer>,
    pub(crate) shader: Option<Arc<dyn Shader>>,
    pub(crate) state: RasterState,
    pub(crate) clear_color: Color,
    pipeline: Pipeline,
    vertices: PartitionedList<Vertex>,
    fragments: PartitionedList<Fragment>,
}

impl RenderContext {
    pub fn new(viewport: Viewport, cores: usize, clear_color: Color) -> Self {
        let pixels = viewport.pixel_count();
        Self {
            viewport,
            color: Arc::new(ColorBuffer::new(pixels)),
            depth: Arc::new(DepthBuffer::new(pixels)),
            vertex_buffer: None,
            index_buffer: None,
            shader: None,
            state: RasterState::default(),
            clear_color,
            pipeline: Pipeline::new(viewport, cores),
            vertices: PartitionedList::new(cores),
            fragments: PartitionedList::new(cores),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn color(&self) -> &Arc<ColorBuffer> {
        &self.color
    }

    pub fn depth(&self) -> &Arc<DepthBuffer> {
        &self.depth
    }

    pub fn state(&self) -> RasterState {
        self.state
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Split borrow of the pipeline and the targets it draws into.
    pub(crate) fn draw_parts(&mut self) -> (&Pipeline, DrawTargets<'_>) {
        (
            &self.pipeline,
            DrawTargets {
                color: &self.color,
                depth: &self.depth,
                vertices: &mut self.vertices,
                fragments: &mut self.fragments,
            },
        )
    }
}
