use super::options::{get_bool, get_int, GameOptions, OptionSpec};
use super::{finished_after_three, GameRules, Target};
use crate::error::DartsResult;
use crate::geometry::{Bed, DartBoard, Segment, BULL};
use crate::model::{DartIntent, Game, Leg, Seat, Take, TakeResult};

const MAX_ANNOUNCED_SCORE: i32 = 180;

pub struct X01 {
    pub x: u32,
    pub double_out: bool,
    pub double_in: bool,
    scores: Vec<i32>,
    checked_in: Vec<bool>,
}

impl X01 {
    pub fn new(x: u32, double_out: bool, double_in: bool) -> Self {
        Self {
            x,
            double_out,
            double_in,
            scores: Vec::new(),
            checked_in: Vec::new(),
        }
    }

    pub fn schema() -> Vec<OptionSpec> {
        vec![
            OptionSpec::range("x", 1..=9, 3),
            OptionSpec::flag("double_out", false),
            OptionSpec::flag("double_in", false),
        ]
    }

    pub fn from_options(options: &GameOptions) -> DartsResult<Box<dyn GameRules>> {
        Ok(Box::new(X01::new(
            get_int(options, "x", 3) as u32,
            get_bool(options, "double_out"),
            get_bool(options, "double_in"),
        )))
    }

    pub fn target_score(&self) -> i32 {
        (self.x * 100 + 1) as i32
    }

    pub fn display_name(&self) -> String {
        let mut name = format!("{}01", self.x);
        if self.double_out {
            name.push_str(" DO");
        }
        if self.double_in {
            name.push_str(" DI");
        }
        name
    }

    pub fn is_checked_in(&self, seat: Seat) -> bool {
        self.checked_in.get(seat).copied().unwrap_or(!self.double_in)
    }

    /// Checkout / setup decision for a remaining `score`, independent of any game.
    pub fn suggest(&self, score: i32, preferred_scoring: Segment, preferred_doubles: &[u32]) -> Target {
        let board = DartBoard::shared();

        if score > 100 {
            return Target::new(preferred_scoring, DartIntent::Score);
        }
        let score = score.max(0) as u32;

        let checkout = if self.double_out {
            board
                .segments_scoring(score)
                .iter()
                .any(|s| s.bed == Bed::Double)
        } else {
            board.is_reachable(score)
        };
        if checkout {
            let segment = if self.double_out {
                Segment::new(score / 2, Bed::Double)
            } else {
                board.easiest_segment_for(score)
            };
            return Target::new(segment, DartIntent::Checkout);
        }

        let segment = if self.double_out {
            preferred_doubles
                .iter()
                .filter_map(|&dbl| score.checked_sub(2 * dbl))
                .find(|&rest| rest > 0 && board.is_reachable(rest))
                .map(|rest| board.easiest_segment_for(rest))
                .unwrap_or_else(|| {
                    if score < 40 {
                        Segment::new(1, Bed::OuterSingle)
                    } else {
                        Segment::new(BULL, Bed::Double)
                    }
                })
        } else if score > 60 {
            Segment::new(BULL, Bed::Double)
        } else if score > 40 {
            Segment::new(score - 40, Bed::OuterSingle)
        } else if score > 20 {
            Segment::new(score - 20, Bed::OuterSingle)
        } else {
            board.easiest_segment_for(score)
        };
        Target::new(segment, DartIntent::Setup)
    }
}

impl GameRules for X01 {
    fn name(&self) -> &str {
        "x01"
    }

    fn recalculate_scores(&mut self, leg: Option<&Leg>, seats: usize) {
        self.scores = vec![self.target_score(); seats];
        self.checked_in = vec![!self.double_in; seats];

        let Some(leg) = leg else { return };
        for take in &leg.takes {
            if take.result == Some(TakeResult::Bust) || take.seat >= seats {
                continue;
            }
            for dart in &take.darts {
                let segment = dart.segment();
                if !self.checked_in[take.seat] {
                    if segment.bed != Bed::Double {
                        continue;
                    }
                    self.checked_in[take.seat] = true;
                }
                self.scores[take.seat] -= segment.score() as i32;
            }
        }
    }

    fn scores(&self) -> &[i32] {
        &self.scores
    }

    fn take_verdict(&self, seat: Seat, take: &Take) -> Option<TakeResult> {
        let score = self.score_of(seat);
        let last_bed = take.last_dart().map(|d| d.segment().bed);

        if score < 0 || (self.double_out && score == 0 && last_bed != Some(Bed::Double)) {
            Some(TakeResult::Bust)
        } else if score == 0 {
            Some(TakeResult::Win)
        } else {
            finished_after_three(take)
        }
    }

    fn next_target(&self, game: &Game, seat: Seat) -> DartsResult<Target> {
        let player = game.players.get(seat).cloned().unwrap_or_default();

        if !self.is_checked_in(seat) {
            let double = player.preferred_doubles.first().copied().unwrap_or(20);
            return Ok(Target::new(Segment::new(double, Bed::Double), DartIntent::Setup));
        }

        Ok(self.suggest(
            self.score_of(seat),
            player.preferred_scoring_segment,
            &player.preferred_doubles,
        ))
    }

    fn required_score(&self, seat: Seat) -> Option<u32> {
        let score = self.score_of(seat);
        if (0..=MAX_ANNOUNCED_SCORE).contains(&score) {
            Some(score as u32)
        } else {
            None
        }
    }

    fn announces_take_score(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dart;

    fn dart(segment: Segment) -> Dart {
        Dart::new(DartBoard::shared().center_of(segment).unwrap())
    }

    fn leg_with(takes: Vec<(Seat, Vec<Segment>)>) -> Leg {
        let mut leg = Leg::new(0);
        for (seat, segments) in takes {
            let mut take = Take::new(seat);
            take.darts = segments.into_iter().map(dart).collect();
            leg.takes.push(take);
        }
        leg
    }

    #[test]
    fn scores_count_down_from_the_target() {
        let mut rules = X01::new(3, false, false);
        let leg = leg_with(vec![(0, vec![Segment::new(20, Bed::Triple); 3])]);
        rules.recalculate_scores(Some(&leg), 2);
        assert_eq!(rules.scores(), &[121, 301]);
        assert_eq!(rules.take_verdict(0, &leg.takes[0]), Some(TakeResult::Finished));
    }

    #[test]
    fn overshoot_is_a_bust() {
        let mut rules = X01::new(1, false, false);
        let leg = leg_with(vec![(
            0,
            vec![
                Segment::new(20, Bed::Triple),
                Segment::new(20, Bed::Triple),
            ],
        )]);
        rules.recalculate_scores(Some(&leg), 1);
        assert_eq!(rules.score_of(0), -19);
        assert_eq!(rules.take_verdict(0, &leg.takes[0]), Some(TakeResult::Bust));
    }

    #[test]
    fn double_out_needs_a_double_to_finish() {
        let mut rules = X01::new(1, true, false);
        let single_finish = leg_with(vec![(
            0,
            vec![
                Segment::new(20, Bed::Triple),
                Segment::new(20, Bed::Double),
                Segment::new(1, Bed::OuterSingle),
            ],
        )]);
        rules.recalculate_scores(Some(&single_finish), 1);
        assert_eq!(rules.score_of(0), 0);
        assert_eq!(
            rules.take_verdict(0, &single_finish.takes[0]),
            Some(TakeResult::Bust)
        );

        let double_finish = leg_with(vec![(
            0,
            vec![
                Segment::new(20, Bed::Triple),
                Segment::new(1, Bed::OuterSingle),
                Segment::new(20, Bed::Double),
            ],
        )]);
        rules.recalculate_scores(Some(&double_finish), 1);
        assert_eq!(
            rules.take_verdict(0, &double_finish.takes[0]),
            Some(TakeResult::Win)
        );
    }

    #[test]
    fn double_in_ignores_darts_before_the_first_double() {
        let mut rules = X01::new(3, false, true);
        let leg = leg_with(vec![(
            0,
            vec![
                Segment::new(20, Bed::Triple),
                Segment::new(16, Bed::Double),
                Segment::new(20, Bed::Triple),
            ],
        )]);
        rules.recalculate_scores(Some(&leg), 1);
        assert!(rules.is_checked_in(0));
        assert_eq!(rules.score_of(0), 301 - 32 - 60);
    }

    #[test]
    fn busted_takes_are_skipped_on_recalculation() {
        let mut rules = X01::new(1, false, false);
        let mut leg = leg_with(vec![(0, vec![Segment::new(20, Bed::Triple); 2])]);
        leg.takes[0].result = Some(TakeResult::Bust);
        rules.recalculate_scores(Some(&leg), 1);
        assert_eq!(rules.score_of(0), 101);
    }

    #[test]
    fn suggestions_follow_the_remaining_score() {
        let triple_20 = Segment::new(20, Bed::Triple);
        let doubles = [20, 16, 8];
        let double_out = X01::new(5, true, false);
        let straight = X01::new(5, false, false);

        let t = double_out.suggest(170, triple_20, &doubles);
        assert_eq!((t.segment, t.intent), (triple_20, DartIntent::Score));

        let t = double_out.suggest(40, triple_20, &doubles);
        assert_eq!((t.segment, t.intent), (Segment::new(20, Bed::Double), DartIntent::Checkout));

        let t = double_out.suggest(50, triple_20, &doubles);
        assert_eq!(t.segment, Segment::new(BULL, Bed::Double));

        let t = double_out.suggest(41, triple_20, &doubles);
        assert_eq!((t.segment, t.intent), (Segment::new(1, Bed::OuterSingle), DartIntent::Setup));

        let t = straight.suggest(59, triple_20, &doubles);
        assert_eq!((t.segment, t.intent), (Segment::new(19, Bed::OuterSingle), DartIntent::Setup));

        let t = straight.suggest(61, triple_20, &doubles);
        assert_eq!(t.segment, Segment::new(BULL, Bed::Double));
    }

    #[test]
    fn required_score_only_within_reach_of_three_darts() {
        let mut rules = X01::new(5, false, false);
        rules.recalculate_scores(None, 1);
        assert_eq!(rules.required_score(0), None);
        let mut rules = X01::new(1, false, false);
        rules.recalculate_scores(None, 1);
        assert_eq!(rules.required_score(0), Some(101));
    }
}
