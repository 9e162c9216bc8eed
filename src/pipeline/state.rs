/// Polygon rasterization mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FillMode {
    #[default]
    Solid,
    /// Triangle edges only, written in a fixed color without shading.
    Wireframe,
}

/// Which faces the assembly stage discards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CullMode {
    #[default]
    Back,
    Front,
    /// Keep everything.
    FrontAndBack,
}

/// Winding that counts as front-facing. `None` disables culling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FrontFace {
    None,
    #[default]
    Ccw,
    Cw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PrimitiveKind {
    /// Independent triangles, three vertices each.
    Triangles,
    /// Independent segments, two vertices each.
    Lines,
}

impl PrimitiveKind {
    pub fn vertices_per_primitive(self) -> usize {
        match self {
            Self::Triangles => 3,
            Self::Lines => 2,
        }
    }
}

/// Fixed-function toggles read by every stage of a draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RasterState {
    pub fill: FillMode,
    pub cull: CullMode,
    pub front_face: FrontFace,
}

impl RasterState {
    pub fn is_wireframe(self) -> bool {
        self.fill == FillMode::Wireframe
    }
}
