use crate::reports;
use clap::Args;
use dartforge::api::{DartSession, FeedbackMode};
use dartforge::config::EngineConfig;
use dartforge::engine::SilentAnnouncer;
use dartforge::error::{DartsError, DartsResult};
use dartforge::model::{Game, Player};
use dartforge::rules::options::parse_pairs;
use dartforge::stats::game_stats;
use dartforge::storage::{self, JsonStore, MemoryStore, SharedStorage};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub engine: EngineConfig,

    #[arg(long, default_value = "x01")]
    pub variant: String,

    /// Variant option as key=value, e.g. `-o x=5 -o double_out=true`.
    #[arg(short = 'o', long = "option")]
    pub options: Vec<String>,

    /// Player as `name` or `name:h_dev:v_dev` (mm). Repeat for more seats.
    #[arg(short, long = "player", default_values_t = vec!["Ada".to_string(), "Grace".to_string()])]
    pub players: Vec<String>,

    /// Persist the match in this JSON store instead of memory.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Write every dart to this CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Log announcements instead of dropping them.
    #[arg(long, default_value_t = false)]
    pub announce: bool,
}

#[derive(Debug, Serialize)]
struct DartRecord<'a> {
    set: usize,
    leg: usize,
    take: u64,
    player: &'a str,
    field: String,
    score: u32,
    x: f64,
    y: f64,
    intent: String,
    take_result: String,
}

fn parse_player(raw: &str, config: &EngineConfig) -> DartsResult<Player> {
    let mut parts = raw.split(':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(DartsError::Config(format!("empty player name in '{}'", raw)));
    }
    let mut deviation = [
        config.simulation.default_h_dev,
        config.simulation.default_v_dev,
    ];
    for slot in deviation.iter_mut() {
        if let Some(value) = parts.next() {
            *slot = value.trim().parse().map_err(|_| {
                DartsError::Config(format!("invalid deviation '{}' for {}", value, name))
            })?;
        }
    }
    Ok(Player::new(name).with_deviation(deviation[0], deviation[1]))
}

fn open_store(path: Option<&PathBuf>) -> DartsResult<SharedStorage> {
    Ok(match path {
        Some(path) => storage::shared(JsonStore::open(path)?),
        None => storage::shared(MemoryStore::new()),
    })
}

/// Registers each player, reusing the stored one when the name is taken.
fn register(session: &DartSession, players: Vec<Player>) -> DartsResult<Vec<Player>> {
    let mut seated = Vec::with_capacity(players.len());
    for player in players {
        match session.add_new_player(player.clone())? {
            Some(p) => seated.push(p),
            None => {
                let stored = session
                    .players()?
                    .into_iter()
                    .find(|p| p.name == player.name)
                    .ok_or_else(|| DartsError::NotFound(format!("player {}", player.name)))?;
                seated.push(stored);
            }
        }
    }
    Ok(seated)
}

fn write_csv(path: &PathBuf, game: &Game) -> DartsResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for (s, set) in game.sets.iter().enumerate() {
        for (l, leg) in set.legs.iter().enumerate() {
            for take in &leg.takes {
                let player = game
                    .players
                    .get(take.seat)
                    .map(|p| p.name.as_str())
                    .unwrap_or("?");
                let take_result = take.result.map(|r| r.to_string()).unwrap_or_default();
                for dart in &take.darts {
                    let segment = dart.segment();
                    writer.serialize(DartRecord {
                        set: s + 1,
                        leg: l + 1,
                        take: take.id,
                        player,
                        field: segment.to_string(),
                        score: segment.score(),
                        x: dart.hit_location.x,
                        y: dart.hit_location.y,
                        intent: dart.intent.map(|i| i.to_string()).unwrap_or_default(),
                        take_result: take_result.clone(),
                    })?;
                }
            }
        }
    }
    writer.flush()?;
    info!("📝 Dart log written to {}", path.display());
    Ok(())
}

pub fn run(args: SimulateArgs, config: EngineConfig) -> DartsResult<()> {
    config.validate()?;
    let options = parse_pairs(args.options.iter().map(String::as_str))?;
    let players = args
        .players
        .iter()
        .map(|raw| parse_player(raw, &config))
        .collect::<DartsResult<Vec<_>>>()?;

    let store = open_store(args.store.as_ref())?;
    let max_darts = config.simulation.max_darts;
    let mut session = DartSession::new(store, config).with_mode(FeedbackMode::Synchronous);
    if !args.announce {
        session = session.with_announcer(Arc::new(SilentAnnouncer));
    }

    let seated = register(&session, players)?;
    info!("🚀 Simulating {} with {} players", args.variant, seated.len());
    session.new_game(&args.variant, &options, seated)?;

    let mut thrown = 0;
    while thrown < max_darts && !session.snapshot()?.is_finished() {
        session.generate_dart()?;
        thrown += 1;
    }
    let game = session.snapshot()?;
    if !game.is_finished() {
        warn!("⚠️  Stopped after {} darts without a winner", max_darts);
    }
    info!("🏁 {} darts thrown", thrown);
    reports::match_summary(&game);
    reports::player_stats(&game_stats(&game));

    if let Some(path) = &args.csv {
        write_csv(path, &game)?;
    }
    Ok(())
}
