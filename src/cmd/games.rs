use crate::reports;
use clap::Args;
use dartforge::error::DartsResult;
use dartforge::storage::{self, JsonStore};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct GamesArgs {
    #[arg(long)]
    pub store: PathBuf,

    /// Only games that can be resumed.
    #[arg(long, default_value_t = false)]
    pub unfinished: bool,
}

pub fn run(args: GamesArgs) -> DartsResult<()> {
    let store = storage::shared(JsonStore::open(&args.store)?);
    let games = {
        let store = storage::lock(&store)?;
        if args.unfinished {
            store.unfinished_games()?
        } else {
            store.all_games()?
        }
    };
    info!("📚 {} game(s) in {}", games.len(), args.store.display());
    reports::game_list(&games);
    Ok(())
}
