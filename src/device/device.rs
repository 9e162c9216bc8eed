use std::sync::Arc;

use glam::Vec3;

use crate::{
    buffer::{
        index::IndexBuffer,
        vertex::{Vertex, VertexBuffer},
    },
    device::{context::RenderContext, swapchain::Swapchain},
    diagnostics::profiler::{ProfileSnapshot, ProfileTimer, Profiler},
    dispatch::dispatcher::TaskDispatcher,
    foundation::{
        config::DeviceConfig,
        error::{RasterError, RasterResult},
        math::{Color, Viewport},
    },
    pipeline::{
        draw::{DrawCall, Fetch, WIREFRAME_COLOR},
        state::{CullMode, FillMode, FrontFace, PrimitiveKind, RasterState},
    },
    shader::{
        contract::Shader,
        lighting::{LightingModel, ScalarLighting, VectorLighting},
    },
};

/// Which targets [`GraphicsDevice::clear`] resets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClearFlags {
    pub color: bool,
    pub depth: bool,
}

impl ClearFlags {
    pub const COLOR: Self = Self {
        color: true,
        depth: false,
    };
    pub const DEPTH: Self = Self {
        color: false,
        depth: true,
    };
    pub const ALL: Self = Self {
        color: true,
        depth: true,
    };
}

/// A software render device: worker pool, render context and swapchain.
///
/// All state setters and draws are called from one thread; a draw returns only after every
/// stage has finished on every worker.
pub struct GraphicsDevice {
    config: DeviceConfig,
    profiler: Arc<Profiler>,
    dispatcher: TaskDispatcher,
    context: RenderContext,
    swapchain: Swapchain,
    vectorized: bool,
    frame: u64,
}

impl GraphicsDevice {
    pub fn new(config: DeviceConfig) -> RasterResult<Self> {
        config.validate()?;
        let viewport = config.viewport()?;
        check_surface(viewport)?;
        let profiler = Arc::new(Profiler::new(config.profiling));
        let dispatcher =
            TaskDispatcher::new(config.cores, config.threaded, Arc::clone(&profiler))?;
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            cores = config.cores,
            threaded = config.threaded,
            "graphics device created"
        );
        Ok(Self {
            context: RenderContext::new(viewport, config.cores, config.clear_color),
            swapchain: Swapchain::new(viewport),
            vectorized: config.vectorized,
            frame: 0,
            profiler,
            dispatcher,
            config,
        })
    }

    /// Join the worker pool, reporting a worker that panicked.
    pub fn destroy(mut self) -> RasterResult<()> {
        self.dispatcher.stop()
    }

    /// Replace the render context and swapchain for a new viewport. Bindings and
    /// fixed-function state return to their defaults.
    pub fn resize(&mut self, width: u32, height: u32) -> RasterResult<()> {
        let viewport = Viewport::new(width, height)?;
        check_surface(viewport)?;
        self.context =
            RenderContext::new(viewport, self.dispatcher.cores(), self.context.clear_color);
        self.swapchain = Swapchain::new(viewport);
        self.config.width = width;
        self.config.height = height;
        Ok(())
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.context.viewport()
    }

    pub fn cores(&self) -> usize {
        self.dispatcher.cores()
    }

    /// Clears performed since construction.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn bind_vertex_buffer(&mut self, buffer: VertexBuffer) {
        self.context.vertex_buffer = Some(buffer);
    }

    pub fn bind_index_buffer(&mut self, buffer: IndexBuffer) {
        self.context.index_buffer = Some(buffer);
    }

    pub fn use_shader(&mut self, shader: Arc<dyn Shader>) {
        self.context.shader = Some(shader);
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.context.clear_color = color;
    }

    pub fn clear_color(&self) -> Color {
        self.context.clear_color()
    }

    /// Color clear is four byte-plane tasks; depth clear is one more task.
    pub fn clear(&mut self, flags: ClearFlags) -> RasterResult<()> {
        let profiler = Arc::clone(&self.profiler);
        profiler.measure(ProfileTimer::Clear, || {
            let cores = self.dispatcher.cores();
            if flags.color {
                let bgra = self.context.clear_color.to_bgra8();
                for (plane, value) in bgra.into_iter().enumerate() {
                    let color = Arc::clone(self.context.color());
                    self.dispatcher
                        .push(plane % cores, move || color.fill_plane(plane, value))?;
                }
            }
            if flags.depth {
                let depth = Arc::clone(self.context.depth());
                self.dispatcher.push(4 % cores, move || depth.clear())?;
            }
            self.dispatcher.wait()
        })?;
        self.frame += 1;
        Ok(())
    }

    /// Draw `count` consecutive vertices of the bound vertex buffer from `start`.
    #[tracing::instrument(skip(self))]
    pub fn draw_arrays(
        &mut self,
        kind: PrimitiveKind,
        start: usize,
        count: usize,
    ) -> RasterResult<()> {
        check_primitive_count(kind, count)?;
        let (Some(vertices), Some(shader)) = (&self.context.vertex_buffer, &self.context.shader)
        else {
            tracing::debug!("draw skipped: no vertex buffer or shader bound");
            return Ok(());
        };
        if start.checked_add(count).is_none_or(|end| end > vertices.len()) {
            return Err(RasterError::validation(format!(
                "draw range {start}+{count} exceeds {} vertices",
                vertices.len()
            )));
        }
        if count == 0 {
            return Ok(());
        }

        let call = DrawCall {
            kind,
            count,
            fetch: Fetch::Arrays { start },
            source: vertices.shared(),
            shader: Arc::clone(shader),
            state: self.context.state,
        };
        self.submit(&call)
    }

    /// Draw `count` indices of the bound index buffer from `start_index`. Each index is offset
    /// by `start_vertex` into the bound vertex buffer.
    #[tracing::instrument(skip(self))]
    pub fn draw_elements(
        &mut self,
        kind: PrimitiveKind,
        start_vertex: usize,
        start_index: usize,
        count: usize,
    ) -> RasterResult<()> {
        check_primitive_count(kind, count)?;
        let (Some(vertices), Some(indices), Some(shader)) = (
            &self.context.vertex_buffer,
            &self.context.index_buffer,
            &self.context.shader,
        ) else {
            tracing::debug!("draw skipped: no vertex buffer, index buffer or shader bound");
            return Ok(());
        };
        if start_index
            .checked_add(count)
            .is_none_or(|end| end > indices.len())
        {
            return Err(RasterError::validation(format!(
                "index range {start_index}+{count} exceeds {} indices",
                indices.len()
            )));
        }
        let Some(max) = indices.max_index_in(start_index, count) else {
            return Ok(());
        };
        if start_vertex
            .checked_add(max as usize)
            .is_none_or(|last| last >= vertices.len())
        {
            return Err(RasterError::validation(format!(
                "index {max} at base vertex {start_vertex} exceeds {} vertices",
                vertices.len()
            )));
        }

        let call = DrawCall {
            kind,
            count,
            fetch: Fetch::Elements {
                start_vertex,
                start_index,
                indices: indices.shared(),
            },
            source: vertices.shared(),
            shader: Arc::clone(shader),
            state: self.context.state,
        };
        self.submit(&call)
    }

    fn submit(&mut self, call: &DrawCall) -> RasterResult<()> {
        let lighting = self.lighting();
        let profiler = Arc::clone(&self.profiler);
        let (pipeline, targets) = self.context.draw_parts();
        profiler.measure(ProfileTimer::Render, || {
            pipeline.draw(call, targets, &self.dispatcher, &profiler, lighting)
        })
    }

    /// Depth-tested segment between two NDC points, drawn on the calling thread in the
    /// wireframe color.
    pub fn draw_line(&mut self, a: Vec3, b: Vec3) {
        let Some(rasterizer) = self.context.pipeline().rasterizer(0) else {
            return;
        };
        let endpoint = |p: Vec3| Vertex {
            position: p.extend(1.0),
            ..Vertex::default()
        };
        let viewport = self.context.viewport();
        let (color, depth) = (self.context.color(), self.context.depth());
        let mut fragments = Vec::new();
        rasterizer.line(depth, &mut fragments, &endpoint(a), &endpoint(b));
        for f in &fragments {
            color.write_color(viewport.pixel_index(f.x, f.y), WIREFRAME_COLOR);
        }
    }

    pub fn raster_state(&self) -> RasterState {
        self.context.state()
    }

    pub fn fill_mode(&self) -> FillMode {
        self.context.state.fill
    }

    pub fn set_fill_mode(&mut self, fill: FillMode) {
        self.context.state.fill = fill;
    }

    pub fn cull_mode(&self) -> CullMode {
        self.context.state.cull
    }

    pub fn set_cull_mode(&mut self, cull: CullMode) {
        self.context.state.cull = cull;
    }

    pub fn front_face(&self) -> FrontFace {
        self.context.state.front_face
    }

    pub fn set_front_face(&mut self, front_face: FrontFace) {
        self.context.state.front_face = front_face;
    }

    pub fn is_vectorized(&self) -> bool {
        self.vectorized
    }

    pub fn set_vectorized(&mut self, vectorized: bool) {
        self.vectorized = vectorized;
    }

    pub fn is_threaded(&self) -> bool {
        self.dispatcher.is_threaded()
    }

    /// Join the pool and restart it in the requested mode. Only valid between draws.
    pub fn set_threaded(&mut self, threaded: bool) -> RasterResult<()> {
        let switched = self.dispatcher.set_threaded(threaded);
        self.config.threaded = self.dispatcher.is_threaded();
        switched
    }

    fn lighting(&self) -> &'static dyn LightingModel {
        if self.vectorized {
            &VectorLighting
        } else {
            &ScalarLighting
        }
    }

    pub fn profiler(&self) -> &Arc<Profiler> {
        &self.profiler
    }

    pub fn profile_snapshot(&self) -> ProfileSnapshot {
        self.profiler.snapshot(self.cores())
    }

    /// Row-major BGRA8 copy of the color buffer.
    pub fn color_bytes(&self) -> Vec<u8> {
        self.context.color().to_bgra_vec()
    }

    pub fn depth_values(&self) -> Vec<f32> {
        self.context.depth().to_vec()
    }

    /// Hand the finished frame to the swapchain and close the profiler sample.
    pub fn present(&mut self) -> &[u8] {
        self.swapchain.present(self.context.color());
        self.profiler.update();
        self.swapchain.front()
    }

    pub fn swapchain(&self) -> &Swapchain {
        &self.swapchain
    }
}

fn check_surface(viewport: Viewport) -> RasterResult<()> {
    let bytes = viewport.pixel_count().checked_mul(4);
    if bytes.is_none_or(|b| b > isize::MAX as usize) {
        return Err(RasterError::device(format!(
            "{}x{} surface cannot be allocated",
            viewport.width, viewport.height
        )));
    }
    Ok(())
}

fn check_primitive_count(kind: PrimitiveKind, count: usize) -> RasterResult<()> {
    let size = kind.vertices_per_primitive();
    if count % size != 0 {
        return Err(RasterError::validation(format!(
            "{kind:?} draw needs a multiple of {size} vertices, got {count}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/device/device.rs"]
mod tests;
