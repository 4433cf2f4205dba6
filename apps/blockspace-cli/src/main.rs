use anyhow::{Context, bail};
use blockspace_common::SplitMix64;
use blockspace_kernel::{BlockRegistry, WorldGrid, cast_ray};
use blockspace_persist::{FORMAT_VERSION, SaveDocument, SaveStore};
use blockspace_session::{Hotbar, InputSnapshot, InteractionOutcome, Session, SessionConfig};
use clap::{Parser, Subcommand};
use glam::{Vec2, Vec3};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockspace-cli", about = "CLI tool for blockspace worlds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session config file (JSON); missing fields take defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the save directory
    #[arg(long, global = true)]
    save_dir: Option<PathBuf>,

    /// Override the save slot name
    #[arg(long, global = true)]
    slot: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, block catalogue and effective config
    Info,
    /// Write the starter world to the save slot
    New {
        /// Overwrite an existing save
        #[arg(short, long)]
        force: bool,
    },
    /// Summarise a save slot
    Inspect,
    /// Decode a save and resolve every block against the catalogue
    Validate,
    /// Run the session for a number of ticks and report the result
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// JSON array of input snapshots, replayed in order then idled
        #[arg(long)]
        script: Option<PathBuf>,
        /// Seed for the random wander used when no script is given
        #[arg(long, default_value = "42")]
        seed: u64,
        /// Hotbar key to select before the first tick
        #[arg(long)]
        hotbar: Option<u8>,
        /// Save the world after the run
        #[arg(long)]
        save: bool,
    },
    /// Cast a ray into a saved world
    Raycast {
        /// Ray start point
        #[arg(
            long,
            required = true,
            num_args = 3,
            value_names = ["X", "Y", "Z"],
            allow_negative_numbers = true
        )]
        origin: Vec<f32>,
        /// Ray direction; need not be normalised
        #[arg(
            long,
            required = true,
            num_args = 3,
            value_names = ["X", "Y", "Z"],
            allow_negative_numbers = true
        )]
        direction: Vec<f32>,
        /// Maximum ray length
        #[arg(long, default_value = "8.0")]
        max_distance: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Info => {
            println!("blockspace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("save format: v{FORMAT_VERSION}");
            let registry = BlockRegistry::with_defaults();
            println!("block types ({}):", registry.len());
            for block_type in registry.iter() {
                println!(
                    "  {:<14} solid={} appearance={:?}",
                    block_type.id, block_type.solid, block_type.appearance
                );
            }
            let hotbar = Hotbar::default();
            let keys: Vec<String> = hotbar.iter().map(|(k, id)| format!("{k}={id}")).collect();
            println!("hotbar: {}", keys.join(" "));
            println!("config: {}", serde_json::to_string_pretty(&config)?);
        }
        Commands::New { force } => {
            let store = SaveStore::new(&config.save_dir);
            if store.exists(&config.save_slot) && !force {
                bail!(
                    "slot `{}` already exists in {} (use --force to overwrite)",
                    config.save_slot,
                    store.root().display()
                );
            }
            let mut session = Session::new(config.clone(), BlockRegistry::with_defaults())?;
            session.build_starter_world()?;
            let blocks = session.save()?;
            println!(
                "Wrote starter world: {blocks} blocks -> {}",
                store.slot_path(&config.save_slot)?.display()
            );
        }
        Commands::Inspect => {
            let store = SaveStore::new(&config.save_dir);
            let doc = store
                .read(&config.save_slot)
                .with_context(|| format!("reading slot `{}`", config.save_slot))?;
            let grid = load_grid(&doc)?;
            println!("Slot: {}", store.slot_path(&config.save_slot)?.display());
            println!("{}", grid.summary());
            println!("state hash: {:#018x}", grid.state_hash());
            let slots = store.list()?;
            println!("slots in {}: {}", store.root().display(), slots.join(", "));
        }
        Commands::Validate => {
            let store = SaveStore::new(&config.save_dir);
            let doc = store
                .read(&config.save_slot)
                .with_context(|| format!("decoding slot `{}`", config.save_slot))?;
            let grid = load_grid(&doc)?;
            println!("OK: {} blocks, version {}", grid.len(), doc.version);
        }
        Commands::Simulate {
            ticks,
            script,
            seed,
            hotbar,
            save,
        } => {
            let inputs: Box<dyn Iterator<Item = InputSnapshot>> = match script {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading script {}", path.display()))?;
                    let script: Vec<InputSnapshot> = serde_json::from_str(&text)
                        .with_context(|| format!("parsing script {}", path.display()))?;
                    Box::new(
                        script
                            .into_iter()
                            .chain(std::iter::repeat_with(InputSnapshot::idle)),
                    )
                }
                None => Box::new(Wander::new(seed)),
            };

            let mut session = Session::start(config)?;
            if let Some(key) = hotbar {
                let Some(id) = Hotbar::default().get(key).cloned() else {
                    bail!("hotbar key {key} is not bound");
                };
                session.select_block(id);
            }

            let mut broken = 0usize;
            let mut placed = 0usize;
            let mut refused = 0usize;
            let mut landings = 0usize;
            for (i, input) in (0..ticks).zip(inputs) {
                let report = session
                    .tick(&input)
                    .with_context(|| format!("tick {}", i + 1))?;
                landings += usize::from(report.step.landed);
                for outcome in &report.interactions {
                    match outcome {
                        InteractionOutcome::Broken { .. } => broken += 1,
                        InteractionOutcome::Placed { .. } => placed += 1,
                        InteractionOutcome::PlacementBlocked { .. } => refused += 1,
                        InteractionOutcome::Missed => {}
                    }
                }
            }

            let player = session.player();
            println!("Simulated {} ticks", session.ticks());
            println!(
                "player: position=({:.3}, {:.3}, {:.3}) velocity=({:.3}, {:.3}, {:.3}) yaw={:.1} pitch={:.1} {:?}",
                player.position.x,
                player.position.y,
                player.position.z,
                player.velocity.x,
                player.velocity.y,
                player.velocity.z,
                player.yaw,
                player.pitch,
                player.motion
            );
            println!(
                "interactions: broken={broken} placed={placed} refused={refused} landings={landings}"
            );
            println!("selected: {}", session.selected());
            println!("{}", session.grid().summary());
            println!("state hash: {:#018x}", session.grid().state_hash());
            if save {
                let blocks = session.save()?;
                println!("saved {blocks} blocks");
            }
        }
        Commands::Raycast {
            origin,
            direction,
            max_distance,
        } => {
            let store = SaveStore::new(&config.save_dir);
            let doc = store
                .read(&config.save_slot)
                .with_context(|| format!("reading slot `{}`", config.save_slot))?;
            let grid = load_grid(&doc)?;
            let origin = Vec3::from_slice(&origin);
            let direction = Vec3::from_slice(&direction);
            match cast_ray(&grid, origin, direction, max_distance) {
                Some(hit) => {
                    let id = grid
                        .get(hit.block)
                        .map(|b| b.type_id().to_string())
                        .unwrap_or_default();
                    println!(
                        "Hit: block={} ({id}) face={} normal={} distance={:.3}",
                        hit.block, hit.face, hit.normal, hit.distance
                    );
                }
                None => println!("Miss"),
            }
        }
    }

    Ok(())
}

/// Config file (if any) with command-line overrides applied.
fn resolve_config(cli: &Cli) -> anyhow::Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };
    if let Some(dir) = &cli.save_dir {
        config.save_dir = dir.clone();
    }
    if let Some(slot) = &cli.slot {
        config.save_slot = slot.clone();
    }
    tracing::debug!(
        save_dir = %config.save_dir.display(),
        slot = %config.save_slot,
        "resolved config"
    );
    Ok(config)
}

fn load_grid(doc: &SaveDocument) -> anyhow::Result<WorldGrid> {
    let mut grid = WorldGrid::new();
    doc.load_into(&mut grid, &BlockRegistry::with_defaults())
        .context("resolving saved blocks")?;
    grid.drain_events();
    Ok(grid)
}

/// Deterministic stroll, one input per tick: every half second pick a new
/// heading and gait, occasionally jumping, breaking or placing. Never ends.
struct Wander {
    rng: SplitMix64,
    movement: Vec2,
    tick: u64,
}

impl Wander {
    fn new(seed: u64) -> Self {
        Self {
            rng: SplitMix64::new(seed),
            movement: Vec2::ZERO,
            tick: 0,
        }
    }
}

impl Iterator for Wander {
    type Item = InputSnapshot;

    fn next(&mut self) -> Option<InputSnapshot> {
        let rng = &mut self.rng;
        let mut input = InputSnapshot::default();
        if self.tick % 30 == 0 {
            self.movement = Vec2::new(rng.next_f32(-1.0, 1.0), rng.next_f32(-1.0, 1.0));
            input.look_delta = Vec2::new(rng.next_f32(-90.0, 90.0), rng.next_f32(-20.0, 20.0));
            input.jump = rng.next_u64() % 4 == 0;
            input.break_block = rng.next_u64() % 5 == 0;
            input.place_block = rng.next_u64() % 5 == 0;
        }
        input.movement = self.movement;
        self.tick = self.tick.wrapping_add(1);
        Some(input)
    }
}
