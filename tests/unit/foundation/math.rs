use super::*;

#[test]
fn scalar_scaling_keeps_alpha() {
    let c = Color::new(0.5, 0.25, 1.0, 0.75) * 2.0;
    assert_eq!(c, Color::new(1.0, 0.5, 2.0, 0.75));
    assert_eq!(0.5 * Color::WHITE, Color::new(0.5, 0.5, 0.5, 1.0));
}

#[test]
fn color_lerp_clamps_t() {
    let a = Color::BLACK;
    let b = Color::WHITE;
    assert_eq!(a.lerp(b, 2.0), b);
    assert_eq!(a.lerp(b, -1.0), a);
    assert!(a.lerp(b, 0.5).approx_eq(Color::GRAY, 1e-6));
}

#[test]
fn bgra_quantization_clamps_and_orders_channels() {
    assert_eq!(Color::new(1.0, 0.0, 0.0, 1.0).to_bgra8(), [0, 0, 255, 255]);
    assert_eq!(Color::new(2.0, -1.0, 0.5, 0.0).to_bgra8(), [127, 0, 255, 0]);
    assert_eq!(Color::RED.to_rgba8(), [255, 0, 0, 255]);
}

#[test]
fn lanes_preserve_channel_order() {
    let c = Color::new(0.1, 0.2, 0.3, 0.4);
    let v = c.to_lanes();
    assert!((v.x - 0.1).abs() < 1e-6);
    assert!((v.w - 0.4).abs() < 1e-6);
    assert!(Color::from_lanes(v).approx_eq(c, 1e-6));
}

#[test]
fn viewport_rejects_empty_extents() {
    assert!(Viewport::new(0, 10).is_err());
    assert!(Viewport::new(10, 0).is_err());
    let vp = Viewport::new(4, 3).unwrap();
    assert_eq!(vp.pixel_count(), 12);
    assert!(vp.contains(3, 2));
    assert!(!vp.contains(4, 2));
    assert!(!vp.contains(-1, 0));
    assert_eq!(vp.pixel_index(1, 2), 9);
}
