use super::options::{get_bool, GameOptions, OptionSpec};
use super::{finished_after_three, GameRules, Target};
use crate::error::DartsResult;
use crate::geometry::{Bed, Segment, BULL};
use crate::model::{DartIntent, Game, Leg, Seat, Take, TakeResult};

pub const GOAL_SECTORS: [u32; 7] = [20, 19, 18, 17, 16, 15, BULL];
const MARKS_TO_CLOSE: u32 = 3;

pub struct Cricket {
    pub cut_throat: bool,
    scores: Vec<i32>,
    /// marks[goal index][seat]
    marks: Vec<Vec<u32>>,
}

fn goal_index(sector: u32) -> Option<usize> {
    GOAL_SECTORS.iter().position(|&s| s == sector)
}

// Trebles are easier to hit than the bull.
fn target_value(sector: u32) -> u32 {
    if sector == BULL {
        BULL
    } else {
        sector * 3
    }
}

fn most_valuable(candidates: impl Iterator<Item = u32>) -> Option<u32> {
    candidates.max_by_key(|&s| target_value(s))
}

impl Cricket {
    pub fn new(cut_throat: bool) -> Self {
        Self {
            cut_throat,
            scores: Vec::new(),
            marks: Vec::new(),
        }
    }

    pub fn schema() -> Vec<OptionSpec> {
        vec![OptionSpec::flag("cut_throat", false)]
    }

    pub fn from_options(options: &GameOptions) -> DartsResult<Box<dyn GameRules>> {
        Ok(Box::new(Cricket::new(get_bool(options, "cut_throat"))))
    }

    pub fn marks_of(&self, seat: Seat, sector: u32) -> u32 {
        goal_index(sector)
            .and_then(|g| self.marks.get(g))
            .and_then(|row| row.get(seat))
            .copied()
            .unwrap_or(0)
    }

    pub fn has_closed(&self, seat: Seat, sector: u32) -> bool {
        self.marks_of(seat, sector) >= MARKS_TO_CLOSE
    }

    /// Every player has three marks on the sector; it scores for nobody.
    pub fn is_closed(&self, sector: u32) -> bool {
        goal_index(sector)
            .and_then(|g| self.marks.get(g))
            .map(|row| !row.is_empty() && row.iter().all(|&m| m >= MARKS_TO_CLOSE))
            .unwrap_or(false)
    }

    fn closed_by_all_opponents_of(&self, seat: Seat, sector: u32) -> bool {
        (0..self.scores.len())
            .filter(|&other| other != seat)
            .all(|other| self.has_closed(other, sector))
    }

    fn leading_score(&self) -> Option<i32> {
        if self.cut_throat {
            self.scores.iter().copied().min()
        } else {
            self.scores.iter().copied().max()
        }
    }

    fn is_leading(&self, seat: Seat) -> bool {
        self.leading_score() == Some(self.score_of(seat))
    }

    fn register_hit(&mut self, seat: Seat, segment: Segment) {
        let Some(g) = goal_index(segment.sector) else { return };
        if self.is_closed(segment.sector) {
            return;
        }

        let multiplier = segment.bed.multiplier();
        for _ in 0..multiplier {
            self.marks[g][seat] += 1;
            if self.is_closed(segment.sector) {
                break;
            }
        }

        let extra = multiplier.min(self.marks[g][seat].saturating_sub(MARKS_TO_CLOSE));
        if extra == 0 {
            return;
        }
        let points = (extra * segment.sector) as i32;
        if self.cut_throat {
            for other in 0..self.scores.len() {
                if other != seat && self.marks[g][other] < MARKS_TO_CLOSE {
                    self.scores[other] += points;
                }
            }
        } else {
            self.scores[seat] += points;
        }
    }
}

impl GameRules for Cricket {
    fn name(&self) -> &str {
        "cricket"
    }

    fn recalculate_scores(&mut self, leg: Option<&Leg>, seats: usize) {
        self.scores = vec![0; seats];
        self.marks = vec![vec![0; seats]; GOAL_SECTORS.len()];

        let Some(leg) = leg else { return };
        for take in leg.takes.iter().filter(|t| t.seat < seats) {
            for dart in &take.darts {
                self.register_hit(take.seat, dart.segment());
            }
        }
    }

    fn scores(&self) -> &[i32] {
        &self.scores
    }

    fn take_verdict(&self, seat: Seat, take: &Take) -> Option<TakeResult> {
        let closed_everything = GOAL_SECTORS.iter().all(|&s| self.has_closed(seat, s));
        if self.is_leading(seat) && closed_everything {
            Some(TakeResult::Win)
        } else {
            finished_after_three(take)
        }
    }

    fn next_target(&self, _game: &Game, seat: Seat) -> DartsResult<Target> {
        let open = |owner: Seat| {
            GOAL_SECTORS
                .iter()
                .copied()
                .filter(move |&s| !self.has_closed(owner, s))
        };

        let choice = if self.is_leading(seat) {
            most_valuable(open(seat))
        } else if self.cut_throat {
            let leader = (0..self.scores.len()).min_by_key(|&s| self.score_of(s));
            leader.and_then(|leader| most_valuable(open(leader)))
        } else {
            most_valuable(
                GOAL_SECTORS
                    .iter()
                    .copied()
                    .filter(|&s| !self.closed_by_all_opponents_of(seat, s)),
            )
        };

        let sector = choice
            .or_else(|| most_valuable(GOAL_SECTORS.iter().copied().filter(|&s| !self.is_closed(s))))
            .unwrap_or(GOAL_SECTORS[0]);
        let bed = if sector == BULL { Bed::Double } else { Bed::Triple };
        Ok(Target::new(Segment::new(sector, bed), DartIntent::Checkout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DartBoard;
    use crate::model::Dart;
    use crate::rules::options::GameOptions;

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

    const S20: Segment = Segment {
        sector: 20,
        bed: Bed::OuterSingle,
    };
    const T20: Segment = Segment {
        sector: 20,
        bed: Bed::Triple,
    };

    #[test]
    fn marks_beyond_three_score_for_the_hitter() {
        let mut rules = Cricket::new(false);
        let leg = leg_with(vec![(0, vec![S20, S20, S20, S20])]);
        rules.recalculate_scores(Some(&leg), 3);
        assert_eq!(rules.scores(), &[20, 0, 0]);
        assert_eq!(rules.marks_of(0, 20), 4);
        assert!(rules.has_closed(0, 20));
        assert!(!rules.is_closed(20));
    }

    #[test]
    fn a_triple_scores_only_the_marks_past_three() {
        let mut rules = Cricket::new(false);
        let leg = leg_with(vec![(0, vec![S20, S20, T20])]);
        rules.recalculate_scores(Some(&leg), 2);
        assert_eq!(rules.score_of(0), 40);
    }

    #[test]
    fn closed_by_everyone_scores_for_nobody() {
        let mut rules = Cricket::new(false);
        let leg = leg_with(vec![
            (0, vec![T20, S20]),
            (1, vec![T20, S20]),
            (2, vec![T20, S20, S20]),
        ]);
        rules.recalculate_scores(Some(&leg), 3);
        assert!(rules.is_closed(20));
        assert_eq!(rules.scores(), &[20, 20, 0]);
    }

    #[test]
    fn cut_throat_points_go_to_open_opponents() {
        let mut rules = Cricket::new(true);
        let leg = leg_with(vec![(1, vec![T20]), (0, vec![T20, S20])]);
        rules.recalculate_scores(Some(&leg), 3);
        assert_eq!(rules.scores(), &[0, 0, 20]);
    }

    #[test]
    fn misses_and_other_sectors_leave_the_leg_alone() {
        let mut rules = Cricket::new(false);
        let leg = leg_with(vec![(0, vec![Segment::new(3, Bed::Triple), Segment::new(14, Bed::Double)])]);
        rules.recalculate_scores(Some(&leg), 2);
        assert_eq!(rules.scores(), &[0, 0]);
        assert!(GOAL_SECTORS.iter().all(|&s| rules.marks_of(0, s) == 0));
    }

    #[test]
    fn closing_everything_while_leading_wins() {
        let mut rules = Cricket::new(false);
        let triples: Vec<Segment> = GOAL_SECTORS
            .iter()
            .map(|&s| if s == BULL { Segment::new(BULL, Bed::Double) } else { Segment::new(s, Bed::Triple) })
            .collect();
        let mut leg = Leg::new(0);
        for chunk in triples.chunks(3) {
            let mut take = Take::new(0);
            take.darts = chunk.iter().copied().map(dart).collect();
            leg.takes.push(take);
        }
        let mut bull = Take::new(0);
        bull.darts.push(dart(Segment::new(BULL, Bed::Single)));
        leg.takes.push(bull);

        rules.recalculate_scores(Some(&leg), 2);
        let last = leg.takes.last().unwrap();
        assert_eq!(rules.take_verdict(0, last), Some(TakeResult::Win));
        assert_eq!(rules.take_verdict(1, &Take::new(1)), None);
    }

    #[test]
    fn leader_aims_at_the_best_open_treble() {
        let mut rules = Cricket::new(false);
        let leg = leg_with(vec![(0, vec![T20])]);
        rules.recalculate_scores(Some(&leg), 2);
        let game = Game::new("cricket", GameOptions::new());
        let target = rules.next_target(&game, 0).unwrap();
        assert_eq!(target.segment, Segment::new(19, Bed::Triple));
        // tied at zero, seat 1 still has 20 open
        let target = rules.next_target(&game, 1).unwrap();
        assert_eq!(target.segment, Segment::new(20, Bed::Triple));
    }
}
