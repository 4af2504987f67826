use anyhow::Context;
use clap::{Parser, Subcommand};
use notdoom_assets::{PathTextureLoader, ResourceManager};
use notdoom_input::{EventQueue, InputEvent, Key};
use notdoom_kernel::{EngineConfig, FixedClock, Game, scene};
use notdoom_render::{
    BatchedRenderer, DebugTextRenderer, DrawList, RecordingBackend, RenderView, Renderer,
    SpriteFrame, SpriteRenderer, render_system,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "notdoom-cli", about = "Run the notdoom demo scenes without a window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine config file (YAML); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Print the effective configuration as YAML
    Config,
    /// Walk through the mesh scene and print the final frame
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        /// Keys held for the whole run, e.g. `--hold w --hold d`
        #[arg(long)]
        hold: Vec<Key>,
        /// Horizontal mouse motion applied before the first frame
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        turn: f32,
    },
    /// Build the sprite scene and print one tessellated frame
    Sprites {
        /// Directory containing `patches/<name>.png`
        #[arg(long)]
        asset_dir: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn run(config: EngineConfig, frames: u64, dt: f32, hold: &[Key], turn: f32) -> anyhow::Result<()> {
    let max_instances = config.render.max_instances;
    let mut game = Game::new(scene::mesh_scene()?, config, FixedClock::new(dt));
    let draws = RecordingBackend::<DrawList>::shared();
    game.schedule_mut().add_system(
        "meshes",
        render_system("meshes", BatchedRenderer::new(max_instances), draws.clone()),
    );

    let mut events = EventQueue::new();
    if turn != 0.0 {
        events.push(InputEvent::MouseMotion {
            xrel: turn,
            yrel: 0.0,
        });
    }
    for key in hold {
        events.press(*key);
    }
    let ran = game.run(&mut events, Some(frames))?;

    let world = game.world();
    let view = RenderView::from_world(world)?;
    print!("{}", DebugTextRenderer::new().render(world, &view)?);
    println!("Frames: {ran}");
    if let Some(list) = draws.borrow().last() {
        println!(
            "Draw list: {} commands, {} instances, {} vertices, {} indices",
            list.commands.len(),
            list.instance_count(),
            list.vertices.len() / notdoom_assets::POSITION_COMPONENTS,
            list.indices.len()
        );
        for command in &list.commands {
            println!("  {command:?}");
        }
    }
    println!("View matrix:\n{}", view.view);
    Ok(())
}

fn sprites(config: EngineConfig, asset_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let asset_dir = asset_dir.unwrap_or_else(|| config.assets.asset_dir.clone());
    let mut resources = ResourceManager::new(&asset_dir, PathTextureLoader::new());
    let world = scene::sprite_scene(&mut resources)
        .with_context(|| format!("building sprite scene from {}", asset_dir.display()))?;

    let renderer = SpriteRenderer::from_config(&config);
    let frames = RecordingBackend::<SpriteFrame>::shared();
    let mut game = Game::new(world, config, FixedClock::new(0.0));
    game.schedule_mut()
        .add_system("sprites", render_system("sprites", renderer, frames.clone()));
    game.run(&mut EventQueue::new(), Some(1))?;

    let frames = frames.borrow();
    let Some(frame) = frames.last() else {
        anyhow::bail!("no sprite frame was produced");
    };
    println!(
        "Sprites: {} drawn, {} culled",
        frame.draws.len(),
        frame.culled
    );
    for draw in &frame.draws {
        println!(
            "  {} texture={} depth={:.1} grid={}x{} vertices={} indices={}",
            draw.entity,
            draw.texture.0,
            draw.depth,
            draw.columns,
            draw.rows,
            draw.vertices.len(),
            draw.indices.len()
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("notdoom-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("math: {}", notdoom_math::crate_info());
            println!("ecs: {}", notdoom_ecs::crate_info());
            println!("assets: {}", notdoom_assets::crate_info());
            println!("input: {}", notdoom_input::crate_info());
            println!("kernel: {}", notdoom_kernel::crate_info());
            println!("render: {}", notdoom_render::crate_info());
        }
        Commands::Config => {
            print!("{}", config.to_yaml_string()?);
        }
        Commands::Run {
            frames,
            dt,
            hold,
            turn,
        } => run(config, frames, dt, &hold, turn)?,
        Commands::Sprites { asset_dir } => sprites(config, asset_dir)?,
    }
    Ok(())
}
