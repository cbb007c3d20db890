pub mod clock;
pub mod cricket;
pub mod options;
pub mod registry;
pub mod x01;

pub use self::clock::AroundTheClock;
pub use self::cricket::Cricket;
pub use self::registry::{KnownVariant, VariantRegistry};
pub use self::x01::X01;

use crate::error::{DartsError, DartsResult};
use crate::geometry::Segment;
use crate::model::{DartIntent, Game, Leg, Seat, Take, TakeResult};

/// Where an automated player should throw next, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub segment: Segment,
    pub intent: DartIntent,
}

impl Target {
    pub fn new(segment: Segment, intent: DartIntent) -> Self {
        Self { segment, intent }
    }
}

/// Rules of one game variant. One instance lives per running game and
/// caches the score mapping of the current leg.
pub trait GameRules: Send + Sync {
    fn name(&self) -> &str;

    /// Rebuilds every cached score by replaying the leg from scratch.
    fn recalculate_scores(&mut self, leg: Option<&Leg>, seats: usize);

    fn scores(&self) -> &[i32];

    fn score_of(&self, seat: Seat) -> i32 {
        self.scores().get(seat).copied().unwrap_or(0)
    }

    /// Result the open `take` of `seat` ends with, or `None` while it stays open.
    /// Scores must be up to date.
    fn take_verdict(&self, seat: Seat, take: &Take) -> Option<TakeResult>;

    fn next_target(&self, _game: &Game, _seat: Seat) -> DartsResult<Target> {
        Err(DartsError::Contract {
            variant: self.name().to_string(),
            method: "next_target",
        })
    }

    /// Remaining points worth announcing before the seat throws.
    fn required_score(&self, _seat: Seat) -> Option<u32> {
        None
    }

    fn announces_take_score(&self) -> bool {
        false
    }
}

/// Verdict shared by variants without a bust: a take ends after its third dart.
pub(crate) fn finished_after_three(take: &Take) -> Option<TakeResult> {
    if take.size() >= crate::model::DARTS_PER_TAKE {
        Some(TakeResult::Finished)
    } else {
        None
    }
}
