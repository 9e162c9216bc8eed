use std::sync::Arc;

use glam::{Mat3, Mat4, Vec3};

use crate::{
    buffer::vertex::Vertex,
    foundation::math::Color,
    shader::lighting::{Light, LightingModel},
    texture::texture2d::Texture2D,
};

/// Per-draw state read by shader stages.
///
/// The derived matrices (`model_view`, `mvp`, `normal_matrix`) are only consistent after
/// [`Uniforms::set_transforms`]; assigning the base matrices directly leaves them stale.
#[derive(Clone, Debug)]
pub struct Uniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub model_view: Mat4,
    pub mvp: Mat4,
    /// Inverse-transpose of the model matrix's upper 3x3.
    pub normal_matrix: Mat3,
    /// World-space eye position, used for specular view vectors.
    pub camera_pos: Vec3,
    pub diffuse: Option<Arc<Texture2D>>,
    pub specular: Option<Arc<Texture2D>>,
    pub lights: Vec<Light>,
    pub specular_power: f32,
    /// Seconds since start, for animated shaders.
    pub time: f32,
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            model_view: Mat4::IDENTITY,
            mvp: Mat4::IDENTITY,
            normal_matrix: Mat3::IDENTITY,
            camera_pos: Vec3::ZERO,
            diffuse: None,
            specular: None,
            lights: Vec::new(),
            specular_power: 32.0,
            time: 0.0,
        }
    }
}

impl Uniforms {
    pub fn set_transforms(&mut self, model: Mat4, view: Mat4, projection: Mat4) {
        self.model = model;
        self.view = view;
        self.projection = projection;
        self.model_view = view * model;
        self.mvp = projection * self.model_view;
        self.normal_matrix = normal_matrix(model);
    }

    /// Clip-space position, world position and transformed normal of an input vertex.
    pub fn transform(&self, input: &Vertex) -> Vertex {
        Vertex {
            position: self.mvp * input.position,
            normal: self.normal_matrix * input.normal,
            uv: input.uv,
            world: (self.model * input.position).truncate(),
        }
    }
}

fn normal_matrix(model: Mat4) -> Mat3 {
    let m = Mat3::from_mat4(model);
    if m.determinant().abs() <= f32::EPSILON {
        return m;
    }
    m.inverse().transpose()
}

/// Vertex/fragment program invoked by the pipeline.
///
/// Shaders run concurrently on every worker; both entry points take `&self` and must not rely
/// on call order. `fragment` receives attributes already restored to their true values.
pub trait Shader: Send + Sync {
    fn uniforms(&self) -> &Uniforms;

    /// Object space in, clip space out.
    fn vertex(&self, input: &Vertex) -> Vertex;

    fn fragment(&self, input: &Vertex, lighting: &dyn LightingModel) -> Color;
}

#[cfg(test)]
#[path = "../../tests/unit/shader/contract.rs"]
mod tests;
