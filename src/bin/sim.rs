use broadside::{place_fleet_randomly, Grid, TargetingAi, TOTAL_SHIP_CELLS};
use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;

/// Shots the targeting AI needed to sink each fleet.
#[derive(Debug, Serialize)]
struct SimReport {
    games: usize,
    seed: u64,
    shots: Vec<usize>,
    min: usize,
    max: usize,
    mean: f64,
}

fn play_one(rng: &mut SmallRng) -> anyhow::Result<usize> {
    let mut grid = Grid::new();
    place_fleet_randomly(&mut grid, rng)?;
    let mut ai = TargetingAi::new();
    let mut shots = 0;
    while grid.hit_count() < TOTAL_SHIP_CELLS {
        ai.attack(&mut grid, rng)?;
        shots += 1;
    }
    Ok(shots)
}

fn main() -> anyhow::Result<()> {
    broadside::init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <games> <seed>", args[0]);
        std::process::exit(1);
    }
    let games: usize = args[1].parse()?;
    let seed: u64 = args[2].parse()?;
    if games == 0 {
        anyhow::bail!("need at least one game");
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let shots = (0..games)
        .map(|_| play_one(&mut rng))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let report = SimReport {
        games,
        seed,
        min: shots.iter().copied().min().unwrap_or(0),
        max: shots.iter().copied().max().unwrap_or(0),
        mean: shots.iter().sum::<usize>() as f64 / games as f64,
        shots,
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
