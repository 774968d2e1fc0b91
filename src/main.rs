use clap::Parser;
use log::{error, info};
use phong_shadow::io::config::Config;
use phong_shadow::io::error::Result;
use phong_shadow::io::image::save_buffer_to_image;
use phong_shadow::pipeline::passes::{post_process_to_buffer, render_frame};
use phong_shadow::pipeline::renderer::Renderer;
use phong_shadow::scene::loader::init_scene_resources;
use std::process::ExitCode;
use std::time::Instant;

/// Renders a Phong-shaded model and its point-light shadow on a ground plane.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML scene description. Without one, the built-in scene is rendered.
    #[arg(short, long)]
    config: Option<String>,

    /// Output image path (overrides the config).
    #[arg(short, long)]
    output: Option<String>,

    /// Draw triangle edges only.
    #[arg(short, long)]
    wireframe: bool,

    /// Skip the shadow pass.
    #[arg(long)]
    no_shadows: bool,

    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    width: Option<u64>,

    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    height: Option<u64>,

    /// Rounds of Loop subdivision applied to the model (overrides the config).
    #[arg(short, long)]
    subdivisions: Option<u32>,

    /// Light position, overriding the config.
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    light: Option<Vec<f32>>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config: {}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &args);

    let context = init_scene_resources(&config)?;

    let (width, height) = config.render.dimensions();
    let mut renderer = Renderer::new(width, height, config.render.samples);

    info!("Rendering {}x{} ({}x SSAA)...", width, height, config.render.samples);
    let start = Instant::now();
    let stats = render_frame(&config.render, &context, &mut renderer);
    info!(
        "Frame done in {:.2?}: {} triangles, {} without shadow, {} fragments",
        start.elapsed(),
        stats.triangles,
        stats.culled,
        stats.fragments
    );

    let mut buffer = vec![0u32; width * height];
    post_process_to_buffer(&renderer.framebuffer, &mut buffer, config.render.gamma);
    save_buffer_to_image(&buffer, width, height, &config.render.output)?;
    info!("Saved {}", config.render.output);
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(output) = &args.output {
        config.render.output = output.clone();
    }
    if args.wireframe {
        config.render.wireframe = true;
    }
    if args.no_shadows {
        config.render.shadows = false;
    }
    if let Some(w) = args.width {
        config.render.width = w as usize;
    }
    if let Some(h) = args.height {
        config.render.height = h as usize;
    }
    if let Some(n) = args.subdivisions {
        config.model.subdivisions = n;
    }
    if let Some([x, y, z]) = args.light.as_deref() {
        config.light.position = [*x, *y, *z];
        config.light.orbit = None;
    }
}
