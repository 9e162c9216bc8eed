use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use glam::{Mat4, Vec3};
use serde_json::json;
use softras::{
    ClearFlags, DeviceConfig, FrontFace, GraphicsDevice, IndexBuffer, Light, LitShader,
    PrimitiveKind, ProfileCounter, ProfileTimer, Texture2D, Uniforms, VertexBuffer, VertexLayout,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct BenchArgs {
    width: u32,
    height: u32,
    cores: usize,
    grid: u32,
    warmup: u32,
    frames: u32,
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug)]
struct Variant {
    threaded: bool,
    vectorized: bool,
}

impl Variant {
    const ALL: [Self; 4] = [
        Self {
            threaded: true,
            vectorized: true,
        },
        Self {
            threaded: true,
            vectorized: false,
        },
        Self {
            threaded: false,
            vectorized: true,
        },
        Self {
            threaded: false,
            vectorized: false,
        },
    ];

    fn label(self) -> &'static str {
        match (self.threaded, self.vectorized) {
            (true, true) => "threaded/vector",
            (true, false) => "threaded/scalar",
            (false, true) => "inline/vector",
            (false, false) => "inline/scalar",
        }
    }
}

fn main() {
    // stdout carries the JSON report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;
    if args.frames == 0 {
        anyhow::bail!("--frames must be > 0");
    }
    if args.grid == 0 {
        anyhow::bail!("--grid must be > 0");
    }

    let (vertices, indices) = wave_grid(args.grid)?;
    let texture = Arc::new(Texture2D::from_rgba8(
        2,
        2,
        &[
            200, 60, 40, 255, 240, 240, 240, 255, //
            240, 240, 240, 255, 200, 60, 40, 255,
        ],
    )?);

    let mut variants = Vec::new();
    for variant in Variant::ALL {
        let report = run_variant(&args, variant, &vertices, &indices, &texture)
            .with_context(|| format!("run variant {}", variant.label()))?;
        variants.push(report);
    }

    let report = json!({
        "width": args.width,
        "height": args.height,
        "cores": args.cores,
        "triangles": indices.len() / 3,
        "frames": args.frames,
        "variants": variants,
    });
    let text = serde_json::to_string_pretty(&report)?;
    match &args.out {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("write report '{}'", path.display()))?,
        None => println!("{text}"),
    }
    Ok(())
}

fn run_variant(
    args: &BenchArgs,
    variant: Variant,
    vertices: &VertexBuffer,
    indices: &IndexBuffer,
    texture: &Arc<Texture2D>,
) -> anyhow::Result<serde_json::Value> {
    let config = DeviceConfig {
        cores: args.cores,
        threaded: variant.threaded,
        vectorized: variant.vectorized,
        profiling: true,
        ..DeviceConfig::new(args.width, args.height)
    };
    let aspect = args.width as f32 / args.height as f32;
    let mut device = GraphicsDevice::new(config)?;
    device.set_front_face(FrontFace::None);
    device.bind_vertex_buffer(vertices.clone());
    device.bind_index_buffer(indices.clone());

    let mut frame_times = Vec::with_capacity(args.frames as usize);
    for frame in 0..args.warmup + args.frames {
        let start = Instant::now();
        device.clear(ClearFlags::ALL)?;
        device.use_shader(Arc::new(LitShader::new(uniforms(frame, aspect, texture))));
        device.draw_elements(PrimitiveKind::Triangles, 0, 0, indices.len())?;
        let elapsed = start.elapsed();
        device.present();
        if frame >= args.warmup {
            frame_times.push(elapsed);
        }
    }

    let core_tasks: Vec<u64> = (0..device.cores())
        .map(|i| device.profiler().last_count(ProfileCounter::CoreTasks(i)))
        .collect();
    let stages: serde_json::Map<String, serde_json::Value> = ProfileTimer::ALL
        .iter()
        .map(|&t| (format!("{t:?}"), json!(device.profiler().average_ms(t))))
        .collect();
    device.destroy()?;

    frame_times.sort();
    let (p50, p90, p99) = (
        percentile(&frame_times, 0.50),
        percentile(&frame_times, 0.90),
        percentile(&frame_times, 0.99),
    );
    eprintln!(
        "  {:16} p50={:>10}  p90={:>10}  p99={:>10}",
        variant.label(),
        fmt_ms(p50),
        fmt_ms(p90),
        fmt_ms(p99)
    );

    Ok(json!({
        "variant": variant.label(),
        "threaded": variant.threaded,
        "vectorized": variant.vectorized,
        "frame_ms": {
            "p50": ms(p50),
            "p90": ms(p90),
            "p99": ms(p99),
        },
        "stage_avg_ms": stages,
        "core_tasks_last_frame": core_tasks,
    }))
}

fn uniforms(frame: u32, aspect: f32, texture: &Arc<Texture2D>) -> Uniforms {
    let eye = Vec3::new(0.0, 2.5, 3.0);
    let mut uniforms = Uniforms {
        camera_pos: eye,
        diffuse: Some(Arc::clone(texture)),
        lights: vec![
            Light::directional(Vec3::new(-0.3, -1.0, -0.4)),
            Light::point(Vec3::new(0.0, 1.0, 0.0), Default::default()),
        ],
        ..Uniforms::default()
    };
    uniforms.set_transforms(
        Mat4::from_rotation_y(frame as f32 * 0.02),
        Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y),
        Mat4::perspective_rh(50f32.to_radians(), aspect, 0.1, 50.0),
    );
    uniforms
}

/// `n`×`n` quads over `[-1, 1]²` in the XZ plane with a sine height field.
fn wave_grid(n: u32) -> anyhow::Result<(VertexBuffer, IndexBuffer)> {
    let side = n + 1;
    let mut data = Vec::with_capacity((side * side * 8) as usize);
    for j in 0..side {
        for i in 0..side {
            let (u, v) = (i as f32 / n as f32, j as f32 / n as f32);
            let (x, z) = (u * 2.0 - 1.0, v * 2.0 - 1.0);
            let y = 0.15 * (x * 6.0).sin() * (z * 6.0).cos();
            let normal = Vec3::new(
                -0.9 * (x * 6.0).cos() * (z * 6.0).cos(),
                1.0,
                0.9 * (x * 6.0).sin() * (z * 6.0).sin(),
            )
            .normalize();
            data.extend_from_slice(&[x, y, z, u * 4.0, v * 4.0, normal.x, normal.y, normal.z]);
        }
    }
    let mut indices = Vec::with_capacity((n * n * 6) as usize);
    for j in 0..n {
        for i in 0..n {
            let a = j * side + i;
            let b = a + side;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    let vertices = VertexBuffer::from_interleaved(VertexLayout::PositionUvNormal, &data)?;
    Ok((vertices, IndexBuffer::from(indices)))
}

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let n = sorted.len();
    let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
    sorted[rank - 1]
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn fmt_ms(d: Duration) -> String {
    format!("{:.3}ms", ms(d))
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);
    let mut out = BenchArgs {
        width: 640,
        height: 480,
        cores: 6,
        grid: 48,
        warmup: 3,
        frames: 60,
        out: None,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--width" => out.width = parse_num(args.next(), "--width")?,
            "--height" => out.height = parse_num(args.next(), "--height")?,
            "--cores" => out.cores = parse_num(args.next(), "--cores")?,
            "--grid" => out.grid = parse_num(args.next(), "--grid")?,
            "--warmup" => out.warmup = parse_num(args.next(), "--warmup")?,
            "--frames" => out.frames = parse_num(args.next(), "--frames")?,
            "--out" => {
                out.out = Some(PathBuf::from(args.next().ok_or_else(|| {
                    anyhow::anyhow!("missing value for --out (expected a path)")
                })?))
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }
    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"softras-bench

Renders a lit, textured height field repeatedly with every combination of threaded/inline
dispatch and vector/scalar lighting, then prints a JSON report with frame percentiles and
per-stage averages.

Usage:
  cargo run -q --release
  cargo run -q --release -- --cores 8 --grid 96 --frames 120 --out report.json

Args:
  --width N    (default 640)
  --height N   (default 480)
  --cores N    (default 6)
  --grid N     quads per side (default 48)
  --warmup N   (default 3)
  --frames N   measured frames per variant (default 60)
  --out PATH   write the report here instead of stdout
"#
    );
}

fn parse_num<T>(v: Option<String>, flag: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<T>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}
