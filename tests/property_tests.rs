mod common;

use common::*;
use dartforge::engine::{Orchestrator, Outcome};
use dartforge::geometry::{DartBoard, Point, RADIUS_OUTER_DOUBLE_MM};
use dartforge::model::{Dart, Leg, Take, DARTS_PER_TAKE};
use dartforge::rules::options::OptionValue;
use dartforge::rules::{KnownVariant, VariantRegistry};
use proptest::prelude::*;
use strum::IntoEnumIterator;

// --- STRATEGIES ---

prop_compose! {
    fn arb_point()(x in -190.0..190.0f64, y in -190.0..190.0f64) -> Point {
        Point::new(x, y)
    }
}

// Mostly on the board, with the occasional bounce-out.
prop_compose! {
    fn arb_throw()(r in 0.0..180.0f64, bearing in 0.0..360.0f64) -> Point {
        Point::from_polar(r, bearing)
    }
}

fn arb_leg(seats: usize) -> impl Strategy<Value = Leg> {
    proptest::collection::vec(
        proptest::collection::vec(arb_throw(), 1..=DARTS_PER_TAKE),
        0..12,
    )
    .prop_map(move |takes| {
        let mut leg = Leg::new(0);
        for (i, darts) in takes.into_iter().enumerate() {
            let mut take = Take::new(i % seats);
            take.darts = darts.into_iter().map(Dart::new).collect();
            leg.takes.push(take);
        }
        leg
    })
}

fn arb_variant() -> impl Strategy<Value = KnownVariant> {
    proptest::sample::select(KnownVariant::iter().collect::<Vec<_>>())
}

/// Throws `darts` as a live game would, running transitions between takes.
fn play(orch: &mut Orchestrator, darts: &[Point]) {
    for &p in darts {
        if orch.game().is_finished() {
            return;
        }
        assert_eq!(orch.add_dart(p).unwrap(), Outcome::Applied);
        if orch.has_pending() {
            orch.run_pending().unwrap();
        }
    }
    orch.drain_announcements();
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_point_lies_in_at_most_one_region(p in arb_point()) {
        let board = DartBoard::shared();
        let hits = board.regions().iter().filter(|r| r.contains(p)).count();
        if p.radius() < RADIUS_OUTER_DOUBLE_MM {
            prop_assert_eq!(hits, 1);
        } else {
            prop_assert_eq!(hits, 0);
            prop_assert!(board.resolve(p).is_miss());
        }
    }

    #[test]
    fn recalculation_is_idempotent(variant in arb_variant(), leg in arb_leg(3)) {
        let registry = VariantRegistry::standard();
        let name = variant.to_string();
        let options = registry.resolve_options(&name, &Default::default()).unwrap();
        let mut rules = registry.build(&name, &options).unwrap();

        rules.recalculate_scores(Some(&leg), 3);
        let first = rules.scores().to_vec();
        rules.recalculate_scores(Some(&leg), 3);
        prop_assert_eq!(first, rules.scores().to_vec());
    }

    #[test]
    fn undo_restores_the_state_before_the_last_dart(
        darts in proptest::collection::vec(arb_throw(), 0..40),
        last in arb_throw(),
        variant in arb_variant(),
    ) {
        let name = variant.to_string();
        let mut opts = vec![
            ("legs_to_set", OptionValue::Int(2)),
            ("sets_to_match", OptionValue::Int(2)),
        ];
        if variant == KnownVariant::X01 {
            opts.push(("x", OptionValue::Int(1)));
        }
        let (mut orch, _) = started(&name, &opts, &["Ada", "Bob"]);
        play(&mut orch, &darts);
        prop_assume!(!orch.game().is_finished());

        let before = orch.game().clone();
        let scores = orch.scores().to_vec();

        play(&mut orch, &[last]);
        prop_assert_eq!(orch.undo_last_dart().unwrap(), Outcome::Applied);

        let after = orch.game();
        prop_assert_eq!(orch.scores().to_vec(), scores);
        prop_assert_eq!(&after.darts_left, &before.darts_left);
        prop_assert_eq!(after.player_turn, before.player_turn);
        prop_assert_eq!(after.status, before.status);
        prop_assert_eq!(&after.sets, &before.sets);
    }
}
