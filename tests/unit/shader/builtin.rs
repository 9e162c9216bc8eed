use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};

use super::*;
use crate::{
    shader::lighting::{Light, ScalarLighting},
    texture::texture2d::Texture2D,
};

#[test]
fn flat_shader_defaults_to_gray_and_ignores_lighting() {
    let shader = FlatColorShader::default();
    let v = Vertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::Z);
    assert_eq!(shader.fragment(&v, &ScalarLighting), Color::GRAY);
    assert_eq!(FlatColorShader::new(Color::RED).fragment(&v, &ScalarLighting), Color::RED);
}

#[test]
fn lit_vertex_stage_normalizes_normals() {
    let mut shader = LitShader::default();
    shader.uniforms.set_transforms(
        Mat4::from_scale(Vec3::splat(3.0)),
        Mat4::IDENTITY,
        Mat4::IDENTITY,
    );
    let out = shader.vertex(&Vertex::new(Vec3::ONE, Vec2::ZERO, Vec3::Y));
    assert!((out.normal.length() - 1.0).abs() < 1e-6);
    assert_eq!(out.world, Vec3::splat(3.0));
}

#[test]
fn lit_fragment_renormalizes_interpolated_normals() {
    let mut shader = LitShader::default();
    shader.uniforms.camera_pos = Vec3::new(0.0, 0.0, 5.0);
    shader.uniforms.lights = vec![Light::directional(Vec3::NEG_Z)];
    shader.uniforms.diffuse = Some(Arc::new(Texture2D::from_rgba8(1, 1, &[255; 4]).unwrap()));

    let short = Vertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::Z * 0.25);
    let unit = Vertex::new(Vec3::ZERO, Vec2::ZERO, Vec3::Z);
    let lit = shader.fragment(&unit, &ScalarLighting);
    assert!(lit.r > 0.5);
    assert_eq!(shader.fragment(&short, &ScalarLighting), lit);
}
