use clap::Parser;
use macroquad::prelude::*;
use ::rand::SeedableRng;
use ::rand::rngs::StdRng;
use sphere_tree::{GeneratorConfig, SphereTree};
use sphere_viz::{Cli, OrbitCamera, RenderVisitor};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Logs to stderr. `RUST_LOG` overrides the level chosen on the command line.
fn setup_logging(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}

/// Generates a tree for `seed`. On failure the partially grown tree is kept
/// and the error message is returned alongside it.
fn build_tree(config: &GeneratorConfig, seed: u64) -> (SphereTree, Option<String>) {
    let mut tree = SphereTree::from_config(config);
    let mut rng = StdRng::seed_from_u64(seed);
    let status = match tree.generate(config, &mut rng) {
        Ok(()) => None,
        Err(err) => {
            tracing::error!(seed, "{err}");
            Some(err.to_string())
        }
    };
    (tree, status)
}

#[macroquad::main("Sphere Tree")]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.log_level());

    let config = match cli.config() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {err}");
            return;
        }
    };

    let mut seed = cli.seed;
    let (mut tree, mut status) = build_tree(&config, seed);

    let mut camera = OrbitCamera::framing(&tree);

    loop {
        camera.update();
        if is_key_pressed(KeyCode::Space) {
            seed = seed.wrapping_add(1);
            (tree, status) = build_tree(&config, seed);
            camera.reframe(&tree);
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        tree.render(&mut RenderVisitor);

        set_default_camera();

        draw_text(
            &format!("Sphere tree - seed {seed}: {} spheres", tree.len()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!("Depth: {} of {}", tree.depth(), config.max_depth),
            10.0,
            45.0,
            18.0,
            GRAY,
        );
        if let Some(message) = &status {
            draw_text(message, 10.0, 65.0, 16.0, ORANGE);
        }

        draw_text(
            "Drag mouse to rotate, scroll to zoom, Space to regenerate",
            10.0,
            85.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 105.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
