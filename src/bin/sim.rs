use anyhow::{bail, Result};
use armada_ai::{
    init_logging, AiEngine, Difficulty, FleetBoard, OpponentView, ShotOutcome, BOARD_SIZE,
};
use clap::{Parser, ValueEnum};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;

#[derive(Parser)]
#[command(author, version, about = "Seeded AI-vs-AI match runner")]
struct Cli {
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1)]
    games: u32,
    #[arg(long, value_enum, default_value_t = Tier::Hard)]
    first: Tier,
    #[arg(long, value_enum, default_value_t = Tier::Hard)]
    second: Tier,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Tier {
    Easy,
    Medium,
    Hard,
}

impl From<Tier> for Difficulty {
    fn from(tier: Tier) -> Difficulty {
        match tier {
            Tier::Easy => Difficulty::Easy,
            Tier::Medium => Difficulty::Medium,
            Tier::Hard => Difficulty::Hard,
        }
    }
}

struct MatchReport {
    winner: usize,
    shots: [usize; 2],
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_rng(&mut rand::rng()),
    };

    let mut wins = [0u32; 2];
    let mut shots = [0usize; 2];
    for _ in 0..cli.games {
        let report = play_match(&mut rng, cli.first.into(), cli.second.into())?;
        wins[report.winner] += 1;
        shots[0] += report.shots[0];
        shots[1] += report.shots[1];
    }

    let per_side = |i: usize| {
        json!({
            "wins": wins[i],
            "avg_shots": shots[i] as f64 / cli.games as f64,
        })
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "games": cli.games,
            "first": format!("{:?}", cli.first),
            "second": format!("{:?}", cli.second),
            "player1": per_side(0),
            "player2": per_side(1),
        }))?
    );
    Ok(())
}

fn play_match(rng: &mut SmallRng, first: Difficulty, second: Difficulty) -> Result<MatchReport> {
    let mut engines = [AiEngine::new(first, rng), AiEngine::new(second, rng)];

    let mut boards = Vec::with_capacity(2);
    for engine in &engines {
        let layout = engine.place_fleet(rng);
        for kind in layout.unplaced() {
            log::warn!("{:?} engine sails without its {kind}", engine.difficulty());
        }
        let board = FleetBoard::from_layout(&layout);
        if let Some(axis) = board.dominant_axis() {
            log::debug!("fleet leans {axis:?}");
        }
        boards.push(board);
    }
    let mut views = [OpponentView::new(), OpponentView::new()];
    let mut shots = [0usize; 2];

    // Strict alternation; each side can need at most one shot per cell.
    for _ in 0..(2 * BOARD_SIZE * BOARD_SIZE) {
        for shooter in 0..2 {
            let target = 1 - shooter;
            let Some(at) = engines[shooter].choose_shot(rng, &views[shooter]) else {
                bail!("no shot available before the match was decided");
            };
            shots[shooter] += 1;
            match boards[target].fire_at(at)? {
                ShotOutcome::Miss => {
                    views[shooter].record_miss(at);
                    engines[shooter].record_shot_result(at, false);
                }
                ShotOutcome::Hit => {
                    views[shooter].record_hit(at);
                    engines[shooter].record_shot_result(at, true);
                }
                ShotOutcome::Sunk(kind) => {
                    views[shooter].record_hit(at);
                    engines[shooter].record_shot_result(at, true);
                    if let Some(cells) = boards[target].cells_of(kind) {
                        views[shooter].reveal_sunk(kind, cells);
                    }
                    engines[shooter].notify_ship_sunk(kind);
                }
            }
            if boards[target].all_sunk() {
                return Ok(MatchReport {
                    winner: shooter,
                    shots,
                });
            }
        }
    }
    bail!("match did not finish within the shot budget")
}
