use glam::{DVec4, Vec2, Vec3};

use crate::{
    buffer::vertex::Vertex, foundation::math::Color, shader::contract::Uniforms,
    texture::texture2d::Texture2D,
};

/// Inverse-quadratic falloff `1 / (constant + linear·d + quadratic·d²)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

impl Attenuation {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    pub fn factor(self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKind {
    Directional {
        /// Direction the light travels.
        direction: Vec3,
    },
    Point {
        position: Vec3,
        attenuation: Attenuation,
    },
    Spot {
        position: Vec3,
        direction: Vec3,
        attenuation: Attenuation,
        /// Cosine of the full-intensity cone half-angle.
        inner_cos: f32,
        /// Cosine of the cutoff cone half-angle.
        outer_cos: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Light {
    pub enabled: bool,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub kind: LightKind,
}

impl Light {
    fn with_kind(kind: LightKind) -> Self {
        Self {
            enabled: true,
            ambient: Color::rgb(0.05, 0.05, 0.05),
            diffuse: Color::rgb(0.5, 0.5, 0.5),
            specular: Color::rgb(0.5, 0.5, 0.5),
            kind,
        }
    }

    pub fn directional(direction: Vec3) -> Self {
        Self::with_kind(LightKind::Directional { direction })
    }

    pub fn point(position: Vec3, attenuation: Attenuation) -> Self {
        Self::with_kind(LightKind::Point {
            position,
            attenuation,
        })
    }

    pub fn spot(
        position: Vec3,
        direction: Vec3,
        attenuation: Attenuation,
        inner_cos: f32,
        outer_cos: f32,
    ) -> Self {
        Self::with_kind(LightKind::Spot {
            position,
            direction,
            attenuation,
            inner_cos,
            outer_cos,
        })
    }

    pub fn with_colors(mut self, ambient: Color, diffuse: Color, specular: Color) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    /// Per-light scalars for one surface point, shared by both lighting strategies.
    fn terms(&self, surface: &Surface, specular_power: f32) -> LightTerms {
        let (to_light, scale) = match self.kind {
            LightKind::Directional { direction } => ((-direction).normalize_or_zero(), 1.0),
            LightKind::Point {
                position,
                attenuation,
            } => {
                let d = position.distance(surface.position);
                (
                    (position - surface.position).normalize_or_zero(),
                    attenuation.factor(d),
                )
            }
            LightKind::Spot {
                position,
                direction,
                attenuation,
                inner_cos,
                outer_cos,
            } => {
                let to_light = (position - surface.position).normalize_or_zero();
                let d = position.distance(surface.position);
                let theta = to_light.dot((-direction).normalize_or_zero());
                (
                    to_light,
                    attenuation.factor(d) * spot_intensity(theta, inner_cos, outer_cos),
                )
            }
        };

        let diffuse = surface.normal.dot(to_light).max(0.0);
        let reflected = reflect(-to_light, surface.normal);
        let specular = surface.view_dir.dot(reflected).max(0.0).powf(specular_power);
        LightTerms {
            diffuse,
            specular,
            scale,
        }
    }
}

/// Linear ramp between the outer and inner cone cosines.
fn spot_intensity(theta: f32, inner_cos: f32, outer_cos: f32) -> f32 {
    let epsilon = inner_cos - outer_cos;
    if epsilon.abs() <= f32::EPSILON {
        return if theta >= outer_cos { 1.0 } else { 0.0 };
    }
    ((theta - outer_cos) / epsilon).clamp(0.0, 1.0)
}

fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

struct LightTerms {
    diffuse: f32,
    specular: f32,
    /// Attenuation times spot intensity.
    scale: f32,
}

struct Surface {
    position: Vec3,
    normal: Vec3,
    view_dir: Vec3,
}

impl Surface {
    fn new(uniforms: &Uniforms, fragment: &Vertex) -> Self {
        Self {
            position: fragment.world,
            normal: fragment.normal,
            view_dir: (uniforms.camera_pos - fragment.world).normalize_or_zero(),
        }
    }
}

/// Ambient + Lambert diffuse + Phong specular accumulation over the uniform light list.
///
/// Implementations must agree within floating-point tolerance; the pipeline picks one per draw
/// from the device's vectorized flag. A missing texture samples as black. With no lights the
/// diffuse texture is returned unlit.
pub trait LightingModel: Send + Sync {
    fn shade(&self, uniforms: &Uniforms, fragment: &Vertex) -> Color;
}

/// `f32` accumulation through [`Color`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarLighting;

/// `f64` accumulation over 4-lane R, G, B, A vectors.
#[derive(Clone, Copy, Debug, Default)]
pub struct VectorLighting;

fn sample(texture: Option<&Texture2D>, uv: Vec2) -> Color {
    texture.map_or(Color::BLACK, |t| t.sample(uv))
}

fn sample_lanes(texture: Option<&Texture2D>, uv: Vec2) -> DVec4 {
    texture.map_or(Color::BLACK.to_lanes(), |t| t.sample_lanes(uv))
}

impl LightingModel for ScalarLighting {
    fn shade(&self, uniforms: &Uniforms, fragment: &Vertex) -> Color {
        let diffuse_tex = sample(uniforms.diffuse.as_deref(), fragment.uv);
        if uniforms.lights.is_empty() {
            return diffuse_tex;
        }
        let specular_tex = sample(uniforms.specular.as_deref(), fragment.uv);
        let surface = Surface::new(uniforms, fragment);

        let mut ambient = Color::new(0.0, 0.0, 0.0, 0.0);
        let mut diffuse = ambient;
        let mut specular = ambient;
        for light in uniforms.lights.iter().filter(|l| l.enabled) {
            let t = light.terms(&surface, uniforms.specular_power);
            ambient += light.ambient * diffuse_tex * t.scale;
            diffuse += light.diffuse * diffuse_tex * (t.diffuse * t.scale);
            specular += light.specular * specular_tex * (t.specular * t.scale);
        }

        Color {
            a: diffuse_tex.a,
            ..ambient + diffuse + specular
        }
    }
}

impl LightingModel for VectorLighting {
    fn shade(&self, uniforms: &Uniforms, fragment: &Vertex) -> Color {
        let diffuse_tex = sample_lanes(uniforms.diffuse.as_deref(), fragment.uv);
        if uniforms.lights.is_empty() {
            return Color::from_lanes(diffuse_tex);
        }
        let specular_tex = sample_lanes(uniforms.specular.as_deref(), fragment.uv);
        let surface = Surface::new(uniforms, fragment);

        let mut acc = DVec4::ZERO;
        for light in uniforms.lights.iter().filter(|l| l.enabled) {
            let t = light.terms(&surface, uniforms.specular_power);
            let scale = f64::from(t.scale);
            acc += light.ambient.to_lanes() * diffuse_tex * scale;
            acc += light.diffuse.to_lanes() * diffuse_tex * (f64::from(t.diffuse) * scale);
            acc += light.specular.to_lanes() * specular_tex * (f64::from(t.specular) * scale);
        }
        acc.w = diffuse_tex.w;
        Color::from_lanes(acc)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/lighting.rs"]
mod tests;
