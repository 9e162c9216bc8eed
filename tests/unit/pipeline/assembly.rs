use glam::{Vec2, Vec3, Vec4};

use super::*;
use crate::pipeline::state::FillMode;

fn at(x: f32, y: f32, z: f32, w: f32) -> Vertex {
    Vertex {
        position: Vec4::new(x, y, z, w),
        ..Vertex::default()
    }
}

fn state(cull: CullMode, front_face: FrontFace) -> RasterState {
    RasterState {
        fill: FillMode::Solid,
        cull,
        front_face,
    }
}

#[test]
fn flat_triangle_at_z_zero_is_front_facing_for_ccw() {
    let (a, b, c) = (at(-1.0, 1.0, 0.0, 1.0), at(1.0, 1.0, 0.0, 1.0), at(1.0, -1.0, 0.0, 1.0));
    assert!(survives_cull(state(CullMode::Back, FrontFace::Ccw), &a, &b, &c));
    assert!(!survives_cull(state(CullMode::Front, FrontFace::Ccw), &a, &b, &c));
    assert!(survives_cull(state(CullMode::FrontAndBack, FrontFace::Ccw), &a, &b, &c));
}

#[test]
fn winding_flips_the_decision() {
    let (a, b, c) = (at(-1.0, 1.0, 2.0, 4.0), at(1.0, 1.0, 2.0, 4.0), at(1.0, -1.0, 2.0, 4.0));
    // Normal points back at the eye here.
    assert!(!survives_cull(state(CullMode::Back, FrontFace::Ccw), &a, &b, &c));
    assert!(survives_cull(state(CullMode::Back, FrontFace::Cw), &a, &b, &c));
    assert!(survives_cull(state(CullMode::Front, FrontFace::Ccw), &a, &b, &c));
    assert!(!survives_cull(state(CullMode::Front, FrontFace::Cw), &a, &b, &c));

    // Reversed order faces the other way.
    assert!(survives_cull(state(CullMode::Back, FrontFace::Ccw), &a, &c, &b));
}

#[test]
fn no_front_face_or_wireframe_keeps_everything() {
    let (a, b, c) = (at(-1.0, 1.0, 2.0, 4.0), at(1.0, 1.0, 2.0, 4.0), at(1.0, -1.0, 2.0, 4.0));
    assert!(survives_cull(state(CullMode::Back, FrontFace::None), &a, &b, &c));
    let wire = RasterState {
        fill: FillMode::Wireframe,
        ..RasterState::default()
    };
    assert!(survives_cull(wire, &a, &b, &c));
}

#[test]
fn frustum_bounds_are_inclusive_with_near_at_zero() {
    assert!(inside_frustum(&at(1.0, -1.0, 0.0, 1.0)));
    assert!(inside_frustum(&at(0.5, 0.5, 1.0, 1.0)));
    assert!(!inside_frustum(&at(1.01, 0.0, 0.5, 1.0)));
    assert!(!inside_frustum(&at(0.0, 0.0, -0.01, 1.0)));
    assert!(!inside_frustum(&at(0.0, 0.0, 1.5, 1.0)));
}

#[test]
fn accept_drops_primitives_with_any_vertex_outside() {
    let s = state(CullMode::Back, FrontFace::None);
    let inside = [at(0.0, 0.0, 0.5, 1.0), at(0.5, 0.0, 0.5, 1.0), at(0.0, 0.5, 0.5, 1.0)];
    let mut partly = inside;
    partly[2] = at(0.0, 3.0, 0.5, 1.0);
    assert!(accept(s, &inside));
    assert!(!accept(s, &partly));
    assert!(!accept(s, &partly[1..]));

    let wire = RasterState {
        fill: FillMode::Wireframe,
        ..s
    };
    assert!(accept(wire, &partly));
}

#[test]
fn divide_at_unit_w_keeps_position_ratios() {
    let v = at(0.25, -0.5, 0.75, 1.0);
    let d = divide(&v);
    assert_eq!(d.position.truncate() / d.position.w, v.position.truncate() / v.position.w);
    assert_eq!(d.inv_w(), 1.0);
}

#[test]
fn restore_undoes_divide_on_varyings() {
    let v = Vertex {
        position: Vec4::new(1.0, 2.0, 3.0, 4.0),
        normal: Vec3::new(0.0, 0.0, 8.0),
        uv: Vec2::new(0.5, 1.0),
        world: Vec3::new(4.0, 4.0, 4.0),
    };
    let d = divide(&v);
    assert_eq!(d.position, Vec4::new(0.25, 0.5, 0.75, 0.25));
    assert_eq!(d.normal, Vec3::new(0.0, 0.0, 2.0));

    let r = restore(&d);
    assert_eq!(r.normal, v.normal);
    assert_eq!(r.uv, v.uv);
    assert_eq!(r.world, v.world);
}
