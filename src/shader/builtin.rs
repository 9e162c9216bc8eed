use crate::{
    buffer::vertex::Vertex,
    foundation::math::Color,
    shader::{
        contract::{Shader, Uniforms},
        lighting::LightingModel,
    },
};

/// Transforms geometry and fills it with one constant color.
#[derive(Clone, Debug)]
pub struct FlatColorShader {
    pub uniforms: Uniforms,
    pub color: Color,
}

impl Default for FlatColorShader {
    fn default() -> Self {
        Self {
            uniforms: Uniforms::default(),
            color: Color::GRAY,
        }
    }
}

impl FlatColorShader {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

impl Shader for FlatColorShader {
    fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    fn vertex(&self, input: &Vertex) -> Vertex {
        self.uniforms.transform(input)
    }

    fn fragment(&self, _input: &Vertex, _lighting: &dyn LightingModel) -> Color {
        self.color
    }
}

/// Textured multi-light shading through the active [`LightingModel`].
#[derive(Clone, Debug, Default)]
pub struct LitShader {
    pub uniforms: Uniforms,
}

impl LitShader {
    pub fn new(uniforms: Uniforms) -> Self {
        Self { uniforms }
    }
}

impl Shader for LitShader {
    fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    fn vertex(&self, input: &Vertex) -> Vertex {
        let mut out = self.uniforms.transform(input);
        out.normal = out.normal.normalize_or_zero();
        out
    }

    fn fragment(&self, input: &Vertex, lighting: &dyn LightingModel) -> Color {
        // Interpolation shortens normals.
        let fragment = Vertex {
            normal: input.normal.normalize_or_zero(),
            ..*input
        };
        lighting.shade(&self.uniforms, &fragment)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/builtin.rs"]
mod tests;
