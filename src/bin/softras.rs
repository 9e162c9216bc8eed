use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use glam::{Mat4, Vec3};
use softras::{
    Attenuation, ClearFlags, Color, DeviceConfig, FillMode, FrontFace, GraphicsDevice,
    IndexBuffer, Light, LitShader, PrimitiveKind, ProfileTimer, Texture2D, Uniforms,
    VertexBuffer, VertexLayout, WrapMode,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "softras", version, about = "Render a lit, textured cube to PNG")]
struct Cli {
    /// Output PNG path.
    #[arg(long, default_value = "cube.png")]
    out: PathBuf,

    /// Device configuration JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Worker threads.
    #[arg(long)]
    cores: Option<usize>,

    /// Drain every stage on the calling thread.
    #[arg(long)]
    inline: bool,

    /// Use the scalar lighting path.
    #[arg(long)]
    scalar: bool,

    /// Frames to render; the cube turns a little each frame and the last one is saved.
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Draw triangle edges only.
    #[arg(long)]
    wireframe: bool,

    #[arg(long, value_enum, default_value_t = FaceChoice::None)]
    front_face: FaceChoice,

    /// Diffuse texture; a procedural checkerboard is used when absent.
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Print the profiler snapshot as JSON after rendering.
    #[arg(long)]
    profile: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FaceChoice {
    None,
    Ccw,
    Cw,
}

impl From<FaceChoice> for FrontFace {
    fn from(choice: FaceChoice) -> Self {
        match choice {
            FaceChoice::None => FrontFace::None,
            FaceChoice::Ccw => FrontFace::Ccw,
            FaceChoice::Cw => FrontFace::Cw,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let aspect = config.width as f32 / config.height as f32;

    let mut device = GraphicsDevice::new(config)?;
    device.set_fill_mode(if cli.wireframe {
        FillMode::Wireframe
    } else {
        FillMode::Solid
    });
    device.set_front_face(cli.front_face.into());

    let (vertices, indices) = cube()?;
    device.bind_vertex_buffer(vertices);
    device.bind_index_buffer(indices.clone());

    let diffuse = Arc::new(match &cli.texture {
        Some(path) => read_texture(path)?,
        None => checkerboard(64, 8)?,
    });

    for frame in 0..cli.frames.max(1) {
        let profiler = Arc::clone(device.profiler());
        profiler.begin(ProfileTimer::Loop);
        device.clear(ClearFlags::ALL)?;
        device.use_shader(Arc::new(LitShader::new(scene_uniforms(
            frame,
            aspect,
            &diffuse,
        ))));
        device.draw_elements(PrimitiveKind::Triangles, 0, 0, indices.len())?;
        profiler.end(ProfileTimer::Loop);
        device.present();
    }

    device
        .swapchain()
        .save_png(&cli.out)
        .with_context(|| format!("save frame to '{}'", cli.out.display()))?;
    tracing::info!(out = %cli.out.display(), frames = cli.frames, "frame written");

    if cli.profile {
        let snapshot = device.profile_snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    device.destroy()?;
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<DeviceConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config_json(path)?,
        None => DeviceConfig::new(640, 480),
    }
    .with_env_overrides();

    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(cores) = cli.cores {
        config.cores = cores;
    }
    if cli.inline {
        config.threaded = false;
    }
    if cli.scalar {
        config.vectorized = false;
    }
    config.validate()?;
    Ok(config)
}

fn read_config_json(path: &Path) -> anyhow::Result<DeviceConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let config: DeviceConfig = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse config '{}'", path.display()))?;
    Ok(config)
}

fn read_texture(path: &Path) -> anyhow::Result<Texture2D> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read texture '{}'", path.display()))?;
    Ok(Texture2D::decode(&bytes)?)
}

fn checkerboard(size: u32, cells: u32) -> anyhow::Result<Texture2D> {
    let cell = (size / cells).max(1);
    let image = image::RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            image::Rgba([230, 90, 40, 255])
        } else {
            image::Rgba([245, 235, 220, 255])
        }
    });
    Ok(Texture2D::from_image(&image)?.with_wrap_mode(WrapMode::Repeat))
}

fn scene_uniforms(frame: u32, aspect: f32, diffuse: &Arc<Texture2D>) -> Uniforms {
    let angle = 0.6 + frame as f32 * 0.05;
    let eye = Vec3::new(0.0, 1.6, 4.0);
    let mut uniforms = Uniforms {
        camera_pos: eye,
        diffuse: Some(Arc::clone(diffuse)),
        specular: Some(Arc::clone(diffuse)),
        lights: vec![
            Light::directional(Vec3::new(-0.4, -1.0, -0.6)),
            Light::point(Vec3::new(2.0, 2.0, 2.0), Attenuation::new(1.0, 0.09, 0.032)).with_colors(
                Color::rgb(0.02, 0.02, 0.02),
                Color::rgb(0.8, 0.8, 0.7),
                Color::WHITE,
            ),
        ],
        time: frame as f32 / 60.0,
        ..Uniforms::default()
    };
    uniforms.set_transforms(
        Mat4::from_rotation_y(angle) * Mat4::from_rotation_x(angle * 0.5),
        Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y),
        Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 100.0),
    );
    uniforms
}

/// Unit cube, four vertices per face so each face gets its own normal and full UV square.
fn cube() -> anyhow::Result<(VertexBuffer, IndexBuffer)> {
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let mut data = Vec::with_capacity(faces.len() * 4 * 8);
    let mut indices = Vec::with_capacity(faces.len() * 6);
    for (face, (normal, right, up)) in faces.into_iter().enumerate() {
        for (u, v) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            let p = (normal + right * (u * 2.0 - 1.0) + up * (v * 2.0 - 1.0)) * 0.5;
            data.extend_from_slice(&[p.x, p.y, p.z, u, v, normal.x, normal.y, normal.z]);
        }
        let base = face as u32 * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    let vertices = VertexBuffer::from_interleaved(VertexLayout::PositionUvNormal, &data)?;
    Ok((vertices, IndexBuffer::from(indices)))
}
