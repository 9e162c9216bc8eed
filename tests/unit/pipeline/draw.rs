use glam::{Vec2, Vec3};

use super::*;
use crate::{
    pipeline::state::{CullMode, FillMode, FrontFace},
    shader::{builtin::FlatColorShader, lighting::ScalarLighting},
};

struct Harness {
    pipeline: Pipeline,
    dispatcher: TaskDispatcher,
    profiler: Arc<Profiler>,
    color: Arc<ColorBuffer>,
    depth: Arc<DepthBuffer>,
    vertices: PartitionedList<Vertex>,
    fragments: PartitionedList<Fragment>,
}

impl Harness {
    fn new(size: u32, cores: usize, threaded: bool) -> Self {
        let viewport = Viewport::new(size, size).unwrap();
        let profiler = Arc::new(Profiler::new(true));
        Self {
            pipeline: Pipeline::new(viewport, cores),
            dispatcher: TaskDispatcher::new(cores, threaded, Arc::clone(&profiler)).unwrap(),
            profiler,
            color: Arc::new(ColorBuffer::new(viewport.pixel_count())),
            depth: Arc::new(DepthBuffer::new(viewport.pixel_count())),
            vertices: PartitionedList::new(cores),
            fragments: PartitionedList::new(cores),
        }
    }

    fn run(&mut self, call: &DrawCall) {
        let targets = DrawTargets {
            color: &self.color,
            depth: &self.depth,
            vertices: &mut self.vertices,
            fragments: &mut self.fragments,
        };
        self.pipeline
            .draw(call, targets, &self.dispatcher, &self.profiler, &ScalarLighting)
            .unwrap();
    }

    fn lit(&self) -> usize {
        (0..self.color.pixel_count())
            .filter(|&i| self.color.pixel(i) != [0, 0, 0, 0])
            .count()
    }
}

fn vertex(x: f32, y: f32, z: f32) -> Vertex {
    Vertex::new(Vec3::new(x, y, z), Vec2::ZERO, Vec3::Z)
}

fn call(kind: PrimitiveKind, source: Vec<Vertex>, state: RasterState) -> DrawCall {
    DrawCall {
        kind,
        count: source.len(),
        fetch: Fetch::Arrays { start: 0 },
        source: source.into(),
        shader: Arc::new(FlatColorShader::new(Color::RED)),
        state,
    }
}

fn corner_triangle() -> Vec<Vertex> {
    vec![
        vertex(-1.0, 1.0, 0.0),
        vertex(1.0, 1.0, 0.0),
        vertex(1.0, -1.0, 0.0),
    ]
}

#[test]
fn solid_triangle_fills_the_upper_right_half() {
    let mut h = Harness::new(8, 3, false);
    h.run(&call(
        PrimitiveKind::Triangles,
        corner_triangle(),
        RasterState::default(),
    ));
    assert_eq!(h.lit(), 36);
    let red = Color::RED.to_bgra8();
    assert_eq!(h.color.pixel(7), [red[0], red[1], red[2], 255]);
    assert_eq!(h.color.pixel(7 * 8), [0, 0, 0, 0]);
    assert_eq!(h.profiler.count(ProfileCounter::VertexCount), 3);
}

#[test]
fn front_culling_discards_the_triangle() {
    let mut h = Harness::new(8, 2, false);
    let state = RasterState {
        cull: CullMode::Front,
        ..RasterState::default()
    };
    h.run(&call(PrimitiveKind::Triangles, corner_triangle(), state));
    assert_eq!(h.lit(), 0);
    assert!(h.fragments.is_empty());
}

#[test]
fn wireframe_writes_only_edges_in_the_wire_color() {
    let mut h = Harness::new(8, 2, false);
    let state = RasterState {
        fill: FillMode::Wireframe,
        ..RasterState::default()
    };
    h.run(&call(PrimitiveKind::Triangles, corner_triangle(), state));
    let lit = h.lit();
    assert!(lit > 0 && lit < 36, "edges only, got {lit}");
    let white = [255, 255, 255, 255];
    assert_eq!(h.color.pixel(0), white);
    assert_eq!(h.color.pixel(63), white);
}

#[test]
fn line_primitives_draw_segments() {
    let mut h = Harness::new(20, 4, false);
    let line = vec![vertex(-1.0, 1.0, 0.5), vertex(0.0, 1.0, 0.5)];
    h.run(&call(PrimitiveKind::Lines, line, RasterState::default()));
    assert_eq!(h.lit(), 11);
    // Solid fill shades line fragments through the bound shader.
    assert_eq!(h.color.pixel(0), [0, 0, 255, 255]);
    assert_eq!(h.color.pixel(10), [0, 0, 255, 255]);
}

#[test]
fn wireframe_lines_use_the_wire_color() {
    let mut h = Harness::new(20, 2, false);
    let line = vec![vertex(-1.0, 1.0, 0.5), vertex(0.0, 1.0, 0.5)];
    let state = RasterState {
        fill: FillMode::Wireframe,
        ..RasterState::default()
    };
    h.run(&call(PrimitiveKind::Lines, line, state));
    assert_eq!(h.lit(), 11);
    let white = [255, 255, 255, 255];
    assert_eq!(h.color.pixel(0), white);
    assert_eq!(h.color.pixel(10), white);
}

#[test]
fn elements_fetch_through_base_vertex_and_indices() {
    let mut h = Harness::new(8, 2, true);
    let mut source = vec![vertex(5.0, 5.0, 5.0)];
    source.extend(corner_triangle());
    let draw = DrawCall {
        count: 3,
        fetch: Fetch::Elements {
            start_vertex: 1,
            start_index: 1,
            indices: vec![9, 0, 1, 2].into(),
        },
        ..call(PrimitiveKind::Triangles, source, RasterState::default())
    };
    h.run(&draw);
    assert_eq!(h.lit(), 36);
}

#[test]
fn nearer_triangle_wins_across_cores() {
    let mut h = Harness::new(16, 4, true);
    let state = RasterState {
        front_face: FrontFace::None,
        ..RasterState::default()
    };
    let square = |z: f32| {
        vec![
            vertex(-1.0, 1.0, z),
            vertex(1.0, 1.0, z),
            vertex(1.0, -1.0, z),
            vertex(-1.0, 1.0, z),
            vertex(1.0, -1.0, z),
            vertex(-1.0, -1.0, z),
        ]
    };
    let mut far = call(PrimitiveKind::Triangles, square(0.8), state);
    far.shader = Arc::new(FlatColorShader::new(Color::BLUE));
    let near = call(PrimitiveKind::Triangles, square(0.2), state);

    h.run(&near);
    h.run(&far);
    let red = Color::RED.to_bgra8();
    for i in 0..h.color.pixel_count() {
        assert_eq!(&h.color.pixel(i)[..3], &red[..3], "pixel {i}");
    }
}
