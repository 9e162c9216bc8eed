use crate::foundation::{
    error::{RasterError, RasterResult},
    math::{Color, Viewport},
};

/// Upper bound on worker cores; the profiler keeps one task counter per core.
pub const MAX_CORES: usize = 64;

/// Construction-time settings for a [`GraphicsDevice`](crate::GraphicsDevice).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub width: u32,
    pub height: u32,
    /// Worker threads, one per partition index.
    pub cores: usize,
    /// Run stages on the worker pool; when `false` every round drains inline on the caller.
    pub threaded: bool,
    /// Use the 4-lane lighting path.
    pub vectorized: bool,
    pub profiling: bool,
    pub clear_color: Color,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            cores: 6,
            threaded: true,
            vectorized: true,
            profiling: true,
            clear_color: Color::BLACK,
        }
    }
}

impl DeviceConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Apply `SOFTRAS_CORES`, `SOFTRAS_THREADED` and `SOFTRAS_VECTORIZED` when they parse.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(cores) = std::env::var("SOFTRAS_CORES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            self.cores = cores;
        }
        if let Some(threaded) = env_flag("SOFTRAS_THREADED") {
            self.threaded = threaded;
        }
        if let Some(vectorized) = env_flag("SOFTRAS_VECTORIZED") {
            self.vectorized = vectorized;
        }
        self
    }

    pub fn viewport(&self) -> RasterResult<Viewport> {
        Viewport::new(self.width, self.height)
    }

    pub fn validate(&self) -> RasterResult<()> {
        self.viewport()?;
        if self.cores == 0 {
            return Err(RasterError::validation("cores must be >= 1"));
        }
        if self.cores > MAX_CORES {
            return Err(RasterError::validation(format!(
                "cores must be <= {MAX_CORES}, got {}",
                self.cores
            )));
        }
        Ok(())
    }
}

fn env_flag(name: &str) -> Option<bool> {
    parse_flag(&std::env::var(name).ok()?)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
