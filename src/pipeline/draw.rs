//! One draw call as five barrier-separated stages.
//!
//! Every stage pushes one task per core and waits. Tasks only read shared snapshots and
//! append to their own partition, so the only cross-task writes are the atomic depth and
//! color targets.

use std::sync::Arc;

use crate::{
    buffer::vertex::Vertex,
    device::framebuffer::{ColorBuffer, DepthBuffer},
    diagnostics::profiler::{ProfileCounter, ProfileTimer, Profiler},
    dispatch::{dispatcher::TaskDispatcher, partition::PartitionedList},
    foundation::{
        error::RasterResult,
        math::{Color, Viewport},
    },
    pipeline::{
        assembly,
        rasterizer::{Fragment, Rasterizer},
        state::{PrimitiveKind, RasterState},
    },
    shader::{contract::Shader, lighting::LightingModel},
};

/// Color written by wireframe fill and debug lines.
pub const WIREFRAME_COLOR: Color = Color::WHITE;

/// Where primitive assembly fetches its vertices from.
#[derive(Clone, Debug)]
pub enum Fetch {
    /// Consecutive shaded vertices starting at `start`.
    Arrays { start: usize },
    /// `shaded[start_vertex + indices[start_index + i]]`.
    Elements {
        start_vertex: usize,
        start_index: usize,
        indices: Arc<[u32]>,
    },
}

impl Fetch {
    fn vertex(&self, shaded: &[Vertex], slot: usize) -> Vertex {
        match self {
            Self::Arrays { start } => shaded[start + slot],
            Self::Elements {
                start_vertex,
                start_index,
                indices,
            } => shaded[start_vertex + indices[start_index + slot] as usize],
        }
    }
}

/// A validated draw ready for the stages.
pub struct DrawCall {
    pub kind: PrimitiveKind,
    /// Vertices (arrays) or indices (elements) consumed; a multiple of the primitive size.
    pub count: usize,
    pub fetch: Fetch,
    pub source: Arc<[Vertex]>,
    pub shader: Arc<dyn Shader>,
    pub state: RasterState,
}

/// Targets and scratch lists a draw reads and writes.
pub struct DrawTargets<'a> {
    pub color: &'a Arc<ColorBuffer>,
    pub depth: &'a Arc<DepthBuffer>,
    pub vertices: &'a mut PartitionedList<Vertex>,
    pub fragments: &'a mut PartitionedList<Fragment>,
}

/// Per-core rasterizers for one viewport.
#[derive(Clone, Debug)]
pub struct Pipeline {
    viewport: Viewport,
    rasterizers: Vec<Rasterizer>,
}

impl Pipeline {
    pub fn new(viewport: Viewport, cores: usize) -> Self {
        Self {
            viewport,
            rasterizers: vec![Rasterizer::new(viewport); cores.max(1)],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn rasterizer(&self, core: usize) -> Option<&Rasterizer> {
        self.rasterizers.get(core)
    }

    pub fn draw(
        &self,
        call: &DrawCall,
        targets: DrawTargets<'_>,
        dispatcher: &TaskDispatcher,
        profiler: &Profiler,
        lighting: &'static dyn LightingModel,
    ) -> RasterResult<()> {
        let DrawTargets {
            color,
            depth,
            vertices,
            fragments,
        } = targets;

        profiler.measure(ProfileTimer::VertexShader, || {
            self.shade_vertices(call, vertices, dispatcher)
        })?;
        profiler.measure(ProfileTimer::PrimitiveAssembly, || {
            self.assemble(call, vertices, dispatcher)
        })?;
        profiler.increase(ProfileCounter::VertexCount, vertices.len() as u64);
        profiler.measure(ProfileTimer::TransformToCvv, || {
            self.divide(vertices, dispatcher)
        })?;
        profiler.measure(ProfileTimer::Rasterize, || {
            self.rasterize(call, vertices, fragments, depth, dispatcher)
        })?;
        profiler.measure(ProfileTimer::FragmentShader, || {
            self.shade_fragments(call, fragments, color, depth, dispatcher, lighting)
        })
    }

    fn cores(&self) -> usize {
        self.rasterizers.len()
    }

    fn shade_vertices(
        &self,
        call: &DrawCall,
        vertices: &mut PartitionedList<Vertex>,
        dispatcher: &TaskDispatcher,
    ) -> RasterResult<()> {
        let n = self.cores();
        vertices.clear();
        for core in 0..n {
            let out = vertices.writer(core);
            let source = Arc::clone(&call.source);
            let shader = Arc::clone(&call.shader);
            dispatcher.push(core, move || {
                let mut out = out.lock();
                out.extend(
                    source
                        .iter()
                        .skip(core)
                        .step_by(n)
                        .map(|v| shader.vertex(v)),
                );
            })?;
        }
        dispatcher.wait()?;
        vertices.flush_strided();
        tracing::trace!(vertices = vertices.len(), "vertex stage done");
        Ok(())
    }

    fn assemble(
        &self,
        call: &DrawCall,
        vertices: &mut PartitionedList<Vertex>,
        dispatcher: &TaskDispatcher,
    ) -> RasterResult<()> {
        let n = self.cores();
        let size = call.kind.vertices_per_primitive();
        let primitives = call.count / size;
        let shaded = vertices.snapshot();
        for core in 0..n {
            let out = vertices.writer(core);
            let shaded = Arc::clone(&shaded);
            let fetch = call.fetch.clone();
            let state = call.state;
            dispatcher.push(core, move || {
                let mut out = out.lock();
                let mut primitive = [Vertex::default(); 3];
                for k in (core..primitives).step_by(n) {
                    for (j, slot) in primitive[..size].iter_mut().enumerate() {
                        *slot = fetch.vertex(&shaded, k * size + j);
                    }
                    if assembly::accept(state, &primitive[..size]) {
                        out.extend_from_slice(&primitive[..size]);
                    }
                }
            })?;
        }
        dispatcher.wait()?;
        vertices.flush();
        tracing::trace!(
            primitives,
            kept = vertices.len() / size,
            "assembly stage done"
        );
        Ok(())
    }

    fn divide(
        &self,
        vertices: &mut PartitionedList<Vertex>,
        dispatcher: &TaskDispatcher,
    ) -> RasterResult<()> {
        let n = self.cores();
        let assembled = vertices.snapshot();
        for core in 0..n {
            let out = vertices.writer(core);
            let assembled = Arc::clone(&assembled);
            dispatcher.push(core, move || {
                let mut out = out.lock();
                out.extend(assembled.iter().skip(core).step_by(n).map(assembly::divide));
            })?;
        }
        dispatcher.wait()?;
        vertices.flush_strided();
        Ok(())
    }

    fn rasterize(
        &self,
        call: &DrawCall,
        vertices: &PartitionedList<Vertex>,
        fragments: &mut PartitionedList<Fragment>,
        depth: &Arc<DepthBuffer>,
        dispatcher: &TaskDispatcher,
    ) -> RasterResult<()> {
        let n = self.cores();
        let size = call.kind.vertices_per_primitive();
        let divided = vertices.snapshot();
        let primitives = divided.len() / size;
        let wireframe = call.state.is_wireframe();
        fragments.clear();
        for (core, rasterizer) in self.rasterizers.iter().copied().enumerate() {
            let out = fragments.writer(core);
            let divided = Arc::clone(&divided);
            let depth = Arc::clone(depth);
            let kind = call.kind;
            dispatcher.push(core, move || {
                let mut out = out.lock();
                let out = &mut *out;
                for k in (core..primitives).step_by(n) {
                    let v = &divided[k * size..(k + 1) * size];
                    match (kind, wireframe) {
                        (PrimitiveKind::Triangles, false) => {
                            rasterizer.triangle(&depth, out, &v[0], &v[1], &v[2]);
                        }
                        (PrimitiveKind::Triangles, true) => {
                            rasterizer.line(&depth, out, &v[0], &v[1]);
                            rasterizer.line(&depth, out, &v[1], &v[2]);
                            rasterizer.line(&depth, out, &v[2], &v[0]);
                        }
                        (PrimitiveKind::Lines, _) => rasterizer.line(&depth, out, &v[0], &v[1]),
                    }
                }
            })?;
        }
        dispatcher.wait()?;
        fragments.flush();
        tracing::trace!(fragments = fragments.len(), "raster stage done");
        Ok(())
    }

    fn shade_fragments(
        &self,
        call: &DrawCall,
        fragments: &PartitionedList<Fragment>,
        color: &Arc<ColorBuffer>,
        depth: &Arc<DepthBuffer>,
        dispatcher: &TaskDispatcher,
        lighting: &'static dyn LightingModel,
    ) -> RasterResult<()> {
        let n = self.cores();
        let viewport = self.viewport;
        let wireframe = call.state.is_wireframe();
        let all = fragments.snapshot();
        for core in 0..n {
            let all = Arc::clone(&all);
            let color = Arc::clone(color);
            let depth = Arc::clone(depth);
            let shader = Arc::clone(&call.shader);
            dispatcher.push(core, move || {
                for f in all.iter().skip(core).step_by(n) {
                    let pixel = viewport.pixel_index(f.x, f.y);
                    // A nearer fragment from another task owns this pixel.
                    if !depth.holds(pixel, f.depth) {
                        continue;
                    }
                    let shaded = if wireframe {
                        WIREFRAME_COLOR
                    } else {
                        shader.fragment(&assembly::restore(&f.vertex), lighting)
                    };
                    color.write_color(pixel, shaded);
                }
            })?;
        }
        dispatcher.wait()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/draw.rs"]
mod tests;
