use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use housegen::{Building, CellKind, HouseConfig, HouseGenerator, WallKind};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

mod plan;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Per-floor counts plus the stair links and fingerprint
    Summary,
    /// ASCII floor plans, north up
    Plan,
    /// The whole building as JSON
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Generate a multi-floor house layout", long_about = None)]
struct Args {
    /// TOML file with house settings; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<i32>,
    #[arg(long)]
    depth: Option<i32>,
    #[arg(long)]
    floors: Option<i32>,
    #[arg(long)]
    min_room_size: Option<i32>,
    #[arg(short, long, value_enum, default_value_t = Format::Summary)]
    format: Format,
    /// Log generation stages to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn house_config(&self) -> Result<HouseConfig> {
        let mut config = match &self.config {
            Some(path) => HouseConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => HouseConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(floors) = self.floors {
            config.floor_count = floors;
        }
        if let Some(min_room_size) = self.min_room_size {
            config.min_room_size = min_room_size;
        }
        if let Some(seed) = self.seed {
            config.random_seed = Some(seed);
        }
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();
    // Only fails when a logger is already installed.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.house_config()?;
    let generator = HouseGenerator::new(config).context("Invalid house settings")?;
    let building = generator.generate().context("Generation failed")?;

    match args.format {
        Format::Summary => print_summary(&building),
        Format::Plan => {
            for floor in building.floors().iter().rev() {
                println!("Floor {}", floor.level());
                println!("{}", plan::render(floor));
            }
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&building)
                .context("Failed to serialize building")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn print_summary(building: &Building) {
    for floor in building.floors() {
        let count = |kind: WallKind| floor.walls().filter(|wall| wall.kind() == kind).count();
        println!(
            "Floor {}: {}x{}, {} rooms, {} walls ({} doors, {} windows), {} floor cells",
            floor.level(),
            floor.width(),
            floor.depth(),
            floor.rooms().len(),
            floor.wall_count(),
            count(WallKind::Door),
            count(WallKind::Window),
            floor.count_cells(CellKind::Floor),
        );
    }
    for link in building.stairs() {
        println!(
            "Stair {} -> {} at ({}, {})",
            link.lower, link.upper, link.origin.x, link.origin.y
        );
    }
    println!("Fingerprint: {:016x}", building.fingerprint());
}
