mod common;

use common::*;
use dartforge::engine::{Orchestrator, Outcome};
use dartforge::error::DartsError;
use dartforge::model::{Leg, Seat, Take, TakeResult};
use dartforge::rules::options::GameOptions;
use dartforge::rules::{GameRules, VariantRegistry};
use dartforge::storage::{self, MemoryStore};

/// Adds up every dart of the leg. Has no automated targeting.
#[derive(Default)]
struct Tally {
    scores: Vec<i32>,
}

impl GameRules for Tally {
    fn name(&self) -> &str {
        "tally"
    }

    fn recalculate_scores(&mut self, leg: Option<&Leg>, seats: usize) {
        self.scores = vec![0; seats];
        for take in leg.map(|l| l.takes.as_slice()).unwrap_or_default() {
            let points: u32 = take.darts.iter().map(|d| d.segment().score()).sum();
            if let Some(score) = self.scores.get_mut(take.seat) {
                *score += points as i32;
            }
        }
    }

    fn scores(&self) -> &[i32] {
        &self.scores
    }

    fn take_verdict(&self, _seat: Seat, take: &Take) -> Option<TakeResult> {
        (take.size() >= 3).then_some(TakeResult::Finished)
    }
}

fn registry_with_tally() -> VariantRegistry {
    let mut registry = VariantRegistry::standard();
    registry.register(
        "tally",
        Vec::new(),
        Box::new(|_: &GameOptions| Ok(Box::new(Tally::default()) as Box<dyn GameRules>)),
    );
    registry
}

#[test]
fn variants_without_targeting_cannot_generate_darts() {
    let registry = registry_with_tally();
    let mut orch = Orchestrator::create(
        storage::shared(MemoryStore::new()),
        &registry,
        "tally",
        &GameOptions::new(),
    )
    .unwrap();
    orch.start(players(&["Ada", "Bob"])).unwrap();
    orch.drain_announcements();
    let before = orch.game().clone();

    match orch.generate_dart() {
        Err(DartsError::Contract { variant, method }) => {
            assert_eq!(variant, "tally");
            assert_eq!(method, "next_target");
        }
        other => panic!("expected a contract error, got {:?}", other),
    }
    assert_eq!(orch.game(), &before);
    assert_eq!(orch.scores(), &[0, 0]);

    // Darts from a board still count.
    assert_eq!(orch.add_dart(t(20)).unwrap(), Outcome::Applied);
    assert_eq!(orch.scores(), &[60, 0]);
}
