use clap::{Parser, Subcommand};
use jenga_common::BlockId;
use jenga_input::{ControlAction, InputEvent, Key};
use jenga_kernel::{FIXED_TIMESTEP, JengaConfig, JengaWorld};
use jenga_render::{DebugTextRenderer, Renderer};
use jenga_tools::TowerInspector;
use jenga_tower::{TowerConfig, generate_layout, tower_height};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jenga-cli", about = "Headless tools for the Jenga tower")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, defaults and key bindings
    Info,
    /// Print the generated layout records
    Layout {
        /// Number of blocks; zero or negative prints nothing
        #[arg(short, long, default_value = "54", allow_negative_numbers = true)]
        blocks: i64,
        /// Emit JSON instead of one line per block
        #[arg(long)]
        json: bool,
    },
    /// Run the sync loop headless and print the result
    Simulate {
        #[arg(short, long, default_value = "54")]
        blocks: usize,
        /// Frames to run
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Block to take control of before the first frame
        #[arg(long)]
        select: Option<usize>,
        /// Key to hold while controlling (e.g. `Space`, `d`)
        #[arg(long)]
        key: Option<Key>,
        /// Frames to hold the key for; defaults to the whole run
        #[arg(long)]
        hold: Option<u64>,
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn print_layout(blocks: i64, json: bool) -> anyhow::Result<()> {
    let config = TowerConfig {
        block_count: usize::try_from(blocks).unwrap_or(0),
        ..TowerConfig::default()
    };
    let records = generate_layout(&config);
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    for r in &records {
        println!(
            "{} course={} pos=({:.1}, {:.1}, {:.1}) {}",
            r.id,
            r.course,
            r.position.x,
            r.position.y,
            r.position.z,
            if r.rotated { "rotated" } else { "straight" }
        );
    }
    Ok(())
}

fn simulate(
    config: JengaConfig,
    frames: u64,
    select: Option<usize>,
    key: Option<Key>,
    hold: Option<u64>,
) -> anyhow::Result<()> {
    let mut world = JengaWorld::new(config);

    if let Some(index) = select {
        world.select(BlockId(index))?;
    }
    if let Some(key) = key {
        world.push_input(InputEvent::KeyDown(key));
    }
    let hold = hold.unwrap_or(frames);

    for frame in 0..frames {
        if frame == hold {
            if let Some(key) = key {
                world.push_input(InputEvent::KeyUp(key));
            }
        }
        world.frame();
    }

    println!("{}", TowerInspector::summary(&world));
    if let Some(id) = world.selection().controlled() {
        if let Some(info) = TowerInspector::inspect_block(&world, id) {
            println!("{info}");
        }
    }
    println!("State hash: {:#018x}", world.state_hash());
    print!("{}", DebugTextRenderer::new().render(world.scene(), world.view()));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = JengaConfig::default();
            println!("jenga-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "tower: blocks={} size=({}, {}, {}) height={:.1}",
                config.tower.block_count,
                config.tower.block_size.x,
                config.tower.block_size.y,
                config.tower.block_size.z,
                tower_height(&config.tower)
            );
            println!(
                "physics: gravity=({}, {}, {}) iterations={} step={:.4}s",
                config.physics.gravity.x,
                config.physics.gravity.y,
                config.physics.gravity.z,
                config.physics.solver_iterations,
                FIXED_TIMESTEP
            );
            println!("table: y={}", config.table_height);

            let world = JengaWorld::new(config.with_blocks(0));
            for action in ControlAction::ALL {
                let keys: Vec<&str> = world
                    .bindings()
                    .keys_for(action)
                    .iter()
                    .map(|k| k.name())
                    .collect();
                println!("  {:<12} {}", action.label(), keys.join(", "));
            }
        }
        Commands::Layout { blocks, json } => print_layout(blocks, json)?,
        Commands::Simulate {
            blocks,
            frames,
            select,
            key,
            hold,
            seed,
        } => {
            tracing::info!(blocks, frames, ?select, ?key, "simulating");
            let config = JengaConfig::default().with_blocks(blocks).with_seed(seed);
            simulate(config, frames, select, key, hold)?;
        }
    }

    Ok(())
}
