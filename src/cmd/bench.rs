use crate::reports::{self, BenchRow};
use clap::Args;
use dartforge::aim::Aimer;
use dartforge::config::EngineConfig;
use dartforge::engine::Orchestrator;
use dartforge::error::{DartsError, DartsResult};
use dartforge::model::Player;
use dartforge::rules::options::{GameOptions, OptionValue};
use dartforge::rules::VariantRegistry;
use dartforge::storage::{self, MemoryStore};
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    #[command(flatten)]
    pub engine: EngineConfig,

    /// Legs to simulate per accuracy profile.
    #[arg(long, default_value_t = 500)]
    pub legs: usize,

    /// Starting score digit: 3 for 301, 5 for 501.
    #[arg(long, default_value_t = 5)]
    pub x: i64,

    #[arg(long, default_value_t = false)]
    pub double_out: bool,

    /// Accuracy profile as `name:h_dev:v_dev` (mm). Defaults to four skill levels.
    #[arg(long = "profile")]
    pub profiles: Vec<String>,
}

const DEFAULT_PROFILES: [(&str, f64, f64); 4] = [
    ("pro", 8.0, 10.0),
    ("league", 18.0, 22.0),
    ("pub", 35.0, 45.0),
    ("novice", 60.0, 70.0),
];

fn parse_profile(raw: &str) -> DartsResult<(String, f64, f64)> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [name, h, v] = parts.as_slice() else {
        return Err(DartsError::Config(format!(
            "expected name:h_dev:v_dev, got '{}'",
            raw
        )));
    };
    let number = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| DartsError::Config(format!("invalid deviation '{}' in '{}'", s, raw)))
    };
    Ok((name.to_string(), number(*h)?, number(*v)?))
}

/// Plays one single-player leg and returns the darts it took.
fn solo_leg(
    options: &GameOptions,
    h_dev: f64,
    v_dev: f64,
    seed: u64,
    max_darts: usize,
) -> DartsResult<Option<usize>> {
    let store = storage::shared(MemoryStore::new());
    let registry = VariantRegistry::standard();
    let mut orch = Orchestrator::create(store, &registry, "x01", options)?
        .with_aimer(Aimer::new(Some(seed)));
    orch.start(vec![Player::new("bench").with_deviation(h_dev, v_dev)])?;
    let thrown = orch.play_out(max_darts)?;
    Ok(orch.game().is_finished().then_some(thrown))
}

pub fn run(args: BenchArgs, config: EngineConfig) -> DartsResult<()> {
    let profiles: Vec<(String, f64, f64)> = if args.profiles.is_empty() {
        DEFAULT_PROFILES
            .iter()
            .map(|&(n, h, v)| (n.to_string(), h, v))
            .collect()
    } else {
        args.profiles
            .iter()
            .map(|p| parse_profile(p))
            .collect::<DartsResult<Vec<_>>>()?
    };

    let mut options = GameOptions::new();
    options.insert("x".to_string(), OptionValue::Int(args.x));
    options.insert("double_out".to_string(), OptionValue::Bool(args.double_out));
    options.insert("legs_to_set".to_string(), OptionValue::Int(1));
    options.insert("sets_to_match".to_string(), OptionValue::Int(1));

    let base_seed = config.simulation.seed.unwrap_or_else(|| fastrand::u64(..));
    let max_darts = config.simulation.max_darts;

    info!(
        "🏎️  Simulating {} legs of {}01 for {} profiles (seed {})",
        args.legs,
        args.x,
        profiles.len(),
        base_seed
    );
    let start = Instant::now();

    let mut rows = Vec::with_capacity(profiles.len());
    for (p, (name, h_dev, v_dev)) in profiles.into_iter().enumerate() {
        let results = (0..args.legs)
            .into_par_iter()
            .map(|i| {
                let seed = base_seed.wrapping_add((p * args.legs + i) as u64);
                solo_leg(&options, h_dev, v_dev, seed, max_darts)
            })
            .collect::<DartsResult<Vec<_>>>()?;

        let finished: Vec<usize> = results.into_iter().flatten().collect();
        if finished.is_empty() {
            info!("⚠️  {}: no leg finished within {} darts", name, max_darts);
            continue;
        }
        rows.push(BenchRow {
            profile: name,
            h_dev,
            v_dev,
            legs: finished.len(),
            avg_darts: finished.iter().sum::<usize>() as f64 / finished.len() as f64,
            best: finished.iter().copied().min().unwrap_or(0),
            worst: finished.iter().copied().max().unwrap_or(0),
        });
    }

    info!("🏁 Done in {:.2}s", start.elapsed().as_secs_f64());
    reports::bench(&rows);
    Ok(())
}
