use clap::Args;
use dartforge::error::{DartsError, DartsResult};
use dartforge::model::Player;
use dartforge::rules::X01;

#[derive(Args, Debug, Clone)]
pub struct CheckoutArgs {
    /// Remaining X01 score.
    #[arg(long)]
    pub score: i32,

    #[arg(long, default_value_t = false)]
    pub double_out: bool,
}

pub fn run(args: CheckoutArgs) -> DartsResult<()> {
    if args.score < 1 {
        return Err(DartsError::Config(format!(
            "score must be positive, got {}",
            args.score
        )));
    }
    let rules = X01::new(5, args.double_out, false);
    let defaults = Player::default();
    let target = rules.suggest(
        args.score,
        defaults.preferred_scoring_segment,
        &defaults.preferred_doubles,
    );
    println!(
        "{} ({}): aim at {} for {}",
        args.score,
        rules.display_name(),
        target.segment,
        target.intent
    );
    Ok(())
}
