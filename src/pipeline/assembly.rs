use crate::{
    buffer::vertex::Vertex,
    pipeline::state::{CullMode, FrontFace, RasterState},
};

/// Face-orientation test on clip-space positions.
///
/// The face normal is `normalize((b - a) × (c - b))` and the view direction runs from the
/// origin (the eye after projection) to `a`. Their dot product decides the face against the
/// configured cull mode and front-face winding. Wireframe fill and [`FrontFace::None`] keep
/// every triangle.
pub fn survives_cull(state: RasterState, a: &Vertex, b: &Vertex, c: &Vertex) -> bool {
    if state.is_wireframe() || state.front_face == FrontFace::None {
        return true;
    }

    let ab = (b.position - a.position).truncate();
    let bc = (c.position - b.position).truncate();
    let normal = ab.cross(bc).normalize_or_zero();
    let view = a.position.truncate().normalize_or_zero();
    let facing = view.dot(normal) >= 0.0;

    match (state.cull, state.front_face) {
        (CullMode::FrontAndBack, _) => true,
        (CullMode::Back, FrontFace::Ccw) | (CullMode::Front, FrontFace::Cw) => facing,
        (CullMode::Back, _) | (CullMode::Front, _) => !facing,
    }
}

/// Homogeneous clip volume test: `-w ≤ x ≤ w`, `-w ≤ y ≤ w`, `0 ≤ z ≤ w`.
pub fn inside_frustum(v: &Vertex) -> bool {
    let p = v.position;
    (-p.w..=p.w).contains(&p.x) && (-p.w..=p.w).contains(&p.y) && (0.0..=p.w).contains(&p.z)
}

/// Whole-primitive acceptance. A primitive with any vertex outside the clip volume is dropped
/// rather than clipped; wireframe fill skips both tests.
pub fn accept(state: RasterState, primitive: &[Vertex]) -> bool {
    if state.is_wireframe() {
        return true;
    }
    if let [a, b, c] = primitive
        && !survives_cull(state, a, b, c)
    {
        return false;
    }
    primitive.iter().all(inside_frustum)
}

/// Perspective divide. Position xyz and every varying are scaled by `1/w`, and `w` is replaced
/// by `1/w` for the fragment stage to undo the scaling.
pub fn divide(v: &Vertex) -> Vertex {
    let inv = 1.0 / v.position.w;
    Vertex {
        position: (v.position.truncate() * inv).extend(inv),
        normal: v.normal * inv,
        uv: v.uv * inv,
        world: v.world * inv,
    }
}

/// Undo [`divide`] on interpolated varyings. Position is left in screen space.
pub fn restore(v: &Vertex) -> Vertex {
    let w = 1.0 / v.position.w;
    Vertex {
        position: v.position,
        normal: v.normal * w,
        uv: v.uv * w,
        world: v.world * w,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/assembly.rs"]
mod tests;
