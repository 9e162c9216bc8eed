use super::*;

#[test]
fn position_uv_normal_deinterleaves() {
    let data = [
        1.0, 2.0, 3.0, 0.25, 0.75, 0.0, 0.0, 1.0, //
        -1.0, -2.0, -3.0, 1.0, 0.0, 0.0, 1.0, 0.0,
    ];
    let vb = VertexBuffer::from_interleaved(VertexLayout::PositionUvNormal, &data).unwrap();
    assert_eq!(vb.len(), 2);
    let v = vb.vertices()[0];
    assert_eq!(v.position, Vec4::new(1.0, 2.0, 3.0, 1.0));
    assert_eq!(v.uv, Vec2::new(0.25, 0.75));
    assert_eq!(v.normal, Vec3::Z);
    assert_eq!(v.world, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(vb.vertices()[1].normal, Vec3::Y);
}

#[test]
fn position_only_leaves_other_attributes_zero() {
    let vb = VertexBuffer::from_interleaved(VertexLayout::Position, &[0.5, 0.5, 0.0]).unwrap();
    let v = vb.vertices()[0];
    assert_eq!(v.uv, Vec2::ZERO);
    assert_eq!(v.normal, Vec3::ZERO);
    assert_eq!(v.position.w, 1.0);
}

#[test]
fn ragged_data_is_rejected() {
    let err = VertexBuffer::from_interleaved(VertexLayout::PositionUv, &[0.0; 7]).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}

#[test]
fn lerp_blends_every_attribute() {
    let a = Vertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::ZERO);
    let b = Vertex::new(Vec3::new(2.0, 4.0, 8.0), Vec2::ONE, Vec3::X);
    let m = Vertex::lerp(&a, &b, 0.5);
    assert_eq!(m.position, Vec4::new(1.0, 2.0, 4.0, 1.0));
    assert_eq!(m.uv, Vec2::splat(0.5));
    assert_eq!(m.normal, Vec3::new(0.5, 0.0, 0.0));
    assert_eq!(m.world, Vec3::new(1.0, 2.0, 4.0));
}
