use anyhow::{Result, bail};
use clap::Parser;
use housegen::{GenerationError, HouseConfig, audit, generate};
use log::LevelFilter;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(author, version, about = "Generate random houses and audit every one", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    iterations: u32,
}

fn pick(rng: &mut ChaCha8Rng, min: i32, max: i32) -> i32 {
    min + (rng.next_u64() % (max - min + 1) as u64) as i32
}

fn random_config(rng: &mut ChaCha8Rng) -> HouseConfig {
    let min_room_size = pick(rng, 2, 6);
    HouseConfig {
        width: 2 * min_room_size + pick(rng, 0, 30),
        depth: 2 * min_room_size + pick(rng, 0, 30),
        floor_count: pick(rng, 1, 5),
        min_room_size,
        ..HouseConfig::default()
    }
    .with_seed(rng.next_u64())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();
    let _ =
        TermLogger::init(LevelFilter::Warn, log_config, TerminalMode::Stderr, ColorChoice::Auto);

    println!("Starting fuzz harness on seed {} for {} houses...", args.seed, args.iterations);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut skipped = 0u32;

    for iteration in 0..args.iterations {
        let config = random_config(&mut rng);
        let building = match generate(&config) {
            Ok(building) => building,
            Err(err @ GenerationError::StairPlacementImpossible { .. }) => {
                log::warn!("Iteration {iteration}: {err} for {config:?}");
                skipped += 1;
                continue;
            }
            Err(err) => bail!("Iteration {iteration}: generation failed for {config:?}: {err}"),
        };
        if let Err(violation) = audit(&building, config.min_room_size) {
            bail!("Iteration {iteration}: invariant failed for {config:?}: {violation}");
        }
    }

    println!("Fuzzing completed successfully ({skipped} houses had no free stair spot).");
    Ok(())
}
