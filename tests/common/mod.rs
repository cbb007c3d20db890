#![allow(dead_code)]

use dartforge::engine::{Orchestrator, Outcome};
use dartforge::geometry::{Bed, DartBoard, Point, Segment};
use dartforge::model::Player;
use dartforge::rules::options::{GameOptions, OptionValue};
use dartforge::rules::VariantRegistry;
use dartforge::storage::{self, MemoryStore, SharedStorage};

pub const MISS: Point = Point { x: 0.0, y: 300.0 };

pub fn seg(sector: u32, bed: Bed) -> Segment {
    Segment::new(sector, bed)
}

pub fn t(sector: u32) -> Point {
    at(seg(sector, Bed::Triple))
}

pub fn d(sector: u32) -> Point {
    at(seg(sector, Bed::Double))
}

pub fn s(sector: u32) -> Point {
    at(seg(sector, Bed::OuterSingle))
}

pub fn at(segment: Segment) -> Point {
    DartBoard::shared()
        .center_of(segment)
        .expect("segment has an aim point")
}

pub fn options(pairs: &[(&str, OptionValue)]) -> GameOptions {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

pub fn players(names: &[&str]) -> Vec<Player> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| Player {
            id: i as u64 + 1,
            ..Player::new(*n)
        })
        .collect()
}

/// A started game on a fresh in-memory store, start announcements drained.
pub fn started(variant: &str, opts: &[(&str, OptionValue)], names: &[&str]) -> (Orchestrator, SharedStorage) {
    let store = storage::shared(MemoryStore::new());
    let mut orch = Orchestrator::create(
        store.clone(),
        &VariantRegistry::standard(),
        variant,
        &options(opts),
    )
    .expect("game is created");
    assert_eq!(orch.start(players(names)).unwrap(), Outcome::Applied);
    orch.drain_announcements();
    (orch, store)
}

pub fn throw(orch: &mut Orchestrator, p: Point) {
    assert_eq!(orch.add_dart(p).unwrap(), Outcome::Applied, "dart at {:?} was refused", p);
}

/// Throws the darts and, when the take ends, runs its transitions.
pub fn take(orch: &mut Orchestrator, darts: &[Point]) {
    for &p in darts {
        throw(orch, p);
    }
    if orch.has_pending() {
        orch.run_pending().unwrap();
    }
    orch.drain_announcements();
}
