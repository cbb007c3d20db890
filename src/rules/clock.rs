use super::options::{GameOptions, OptionSpec};
use super::{finished_after_three, GameRules, Target};
use crate::error::DartsResult;
use crate::geometry::{Bed, Segment};
use crate::model::{DartIntent, Game, Leg, Seat, Take, TakeResult};

const FIRST_NUMBER: i32 = 1;
const WINNING_SCORE: i32 = 21;

/// Hit 1 to 20 in order; the score is the next number to hit.
#[derive(Default)]
pub struct AroundTheClock {
    scores: Vec<i32>,
}

impl AroundTheClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema() -> Vec<OptionSpec> {
        Vec::new()
    }

    pub fn from_options(_options: &GameOptions) -> DartsResult<Box<dyn GameRules>> {
        Ok(Box::new(AroundTheClock::new()))
    }
}

impl GameRules for AroundTheClock {
    fn name(&self) -> &str {
        "around_the_clock"
    }

    fn recalculate_scores(&mut self, leg: Option<&Leg>, seats: usize) {
        self.scores = vec![FIRST_NUMBER; seats];
        let Some(leg) = leg else { return };
        for take in leg.takes.iter().filter(|t| t.seat < seats) {
            for dart in &take.darts {
                if dart.segment().sector as i32 == self.scores[take.seat] {
                    self.scores[take.seat] += 1;
                }
            }
        }
    }

    fn scores(&self) -> &[i32] {
        &self.scores
    }

    fn take_verdict(&self, seat: Seat, take: &Take) -> Option<TakeResult> {
        if self.score_of(seat) == WINNING_SCORE {
            Some(TakeResult::Win)
        } else {
            finished_after_three(take)
        }
    }

    fn next_target(&self, _game: &Game, seat: Seat) -> DartsResult<Target> {
        let number = self.score_of(seat).clamp(FIRST_NUMBER, WINNING_SCORE - 1) as u32;
        Ok(Target::new(
            Segment::new(number, Bed::OuterSingle),
            DartIntent::Checkout,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DartBoard;
    use crate::model::Dart;

    fn take_of(seat: Seat, segments: &[Segment]) -> Take {
        let mut take = Take::new(seat);
        take.darts = segments
            .iter()
            .map(|&s| Dart::new(DartBoard::shared().center_of(s).unwrap()))
            .collect();
        take
    }

    #[test]
    fn only_the_current_number_advances() {
        let mut rules = AroundTheClock::new();
        let mut leg = Leg::new(0);
        leg.takes.push(take_of(
            0,
            &[
                Segment::new(1, Bed::Triple),
                Segment::new(3, Bed::OuterSingle),
                Segment::new(2, Bed::Double),
            ],
        ));
        rules.recalculate_scores(Some(&leg), 2);
        assert_eq!(rules.scores(), &[3, 1]);
        assert_eq!(rules.take_verdict(0, &leg.takes[0]), Some(TakeResult::Finished));
    }

    #[test]
    fn hitting_twenty_wins() {
        let mut rules = AroundTheClock::new();
        let mut leg = Leg::new(0);
        for n in 1..=20u32 {
            leg.takes.push(take_of(0, &[Segment::new(n, Bed::InnerSingle)]));
        }
        rules.recalculate_scores(Some(&leg), 1);
        assert_eq!(rules.score_of(0), 21);
        assert_eq!(
            rules.take_verdict(0, leg.takes.last().unwrap()),
            Some(TakeResult::Win)
        );
    }

    #[test]
    fn aims_at_the_outer_single_of_the_next_number() {
        let mut rules = AroundTheClock::new();
        rules.recalculate_scores(None, 1);
        let target = rules.next_target(&Game::new("around_the_clock", GameOptions::new()), 0).unwrap();
        assert_eq!(target.segment, Segment::new(1, Bed::OuterSingle));
        assert_eq!(target.intent, DartIntent::Checkout);
    }
}
