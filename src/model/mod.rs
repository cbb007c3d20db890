pub mod player;

pub use self::player::Player;

use crate::geometry::{DartBoard, Point, Segment};
use crate::rules::options::GameOptions;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use strum_macros::{Display, EnumString};

pub type EntityId = u64;

/// Seat index of a player within a game (its fixed turn position).
pub type Seat = usize;

pub const DARTS_PER_TAKE: usize = 3;

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Uninitialized,
    WaitingForUserInput,
    InProgress,
    LegFinished,
    Finished,
    Blocking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TakeResult {
    Win,
    Bust,
    Unfinished,
    Finished,
    CheckIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DartIntent {
    Score,
    Setup,
    Checkout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dart {
    pub id: EntityId,
    pub timestamp: u64,
    pub hit_location: Point,
    pub target_location: Option<Point>,
    pub intent: Option<DartIntent>,
}

impl Dart {
    pub fn new(hit_location: Point) -> Self {
        Self {
            id: 0,
            timestamp: now_ms(),
            hit_location,
            target_location: None,
            intent: None,
        }
    }

    pub fn aimed(hit_location: Point, target_location: Point, intent: DartIntent) -> Self {
        Self {
            target_location: Some(target_location),
            intent: Some(intent),
            ..Self::new(hit_location)
        }
    }

    pub fn segment(&self) -> Segment {
        DartBoard::shared().resolve(self.hit_location)
    }

    pub fn score(&self) -> u32 {
        self.segment().score()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Take {
    pub id: EntityId,
    pub seat: Seat,
    pub start_time: u64,
    pub darts: Vec<Dart>,
    pub result: Option<TakeResult>,
}

impl Take {
    pub fn new(seat: Seat) -> Self {
        Self {
            id: 0,
            seat,
            start_time: now_ms(),
            darts: Vec::with_capacity(DARTS_PER_TAKE),
            result: None,
        }
    }

    pub fn size(&self) -> usize {
        self.darts.len()
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Sum of the darts; a bust counts nothing.
    pub fn score(&self) -> u32 {
        if self.result == Some(TakeResult::Bust) {
            return 0;
        }
        self.darts.iter().map(Dart::score).sum()
    }

    pub fn last_dart(&self) -> Option<&Dart> {
        self.darts.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub id: EntityId,
    pub start_time: u64,
    pub beginner: Seat,
    pub takes: Vec<Take>,
    pub winner: Option<Seat>,
}

impl Leg {
    pub fn new(beginner: Seat) -> Self {
        Self {
            id: 0,
            start_time: now_ms(),
            beginner,
            takes: Vec::new(),
            winner: None,
        }
    }

    pub fn takes_of(&self, seat: Seat) -> impl Iterator<Item = &Take> {
        self.takes.iter().filter(move |t| t.seat == seat)
    }

    pub fn last_take_of(&self, seat: Seat) -> Option<&Take> {
        self.takes.iter().rev().find(|t| t.seat == seat)
    }

    pub fn last_take_index_of(&self, seat: Seat) -> Option<usize> {
        self.takes.iter().rposition(|t| t.seat == seat)
    }

    pub fn dart_count(&self) -> usize {
        self.takes.iter().map(Take::size).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub id: EntityId,
    pub start_time: u64,
    pub beginner: Seat,
    pub legs: Vec<Leg>,
    pub winner: Option<Seat>,
}

impl Set {
    pub fn new(beginner: Seat) -> Self {
        Self {
            id: 0,
            start_time: now_ms(),
            beginner,
            legs: Vec::new(),
            winner: None,
        }
    }

    pub fn legs_won_by(&self, seat: Seat) -> u32 {
        self.legs.iter().filter(|l| l.winner == Some(seat)).count() as u32
    }
}

/// Root aggregate. The last set (and its last leg) is the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: EntityId,
    pub variant: String,
    pub options: GameOptions,
    pub status: GameStatus,
    pub start_time: u64,
    /// Roster in seat order.
    pub players: Vec<Player>,
    pub player_turn: Seat,
    pub legs_to_set: u32,
    pub sets_to_match: u32,
    pub winner: Option<Seat>,
    pub sets: Vec<Set>,
    #[serde(skip)]
    pub darts_left: Vec<u8>,
}

impl Game {
    pub fn new(variant: impl Into<String>, options: GameOptions) -> Self {
        Self {
            id: 0,
            variant: variant.into(),
            options,
            status: GameStatus::Uninitialized,
            start_time: now_ms(),
            players: Vec::new(),
            player_turn: 0,
            legs_to_set: 3,
            sets_to_match: 1,
            winner: None,
            sets: Vec::new(),
            darts_left: Vec::new(),
        }
    }

    pub fn seats(&self) -> usize {
        self.players.len()
    }

    pub fn current_set(&self) -> Option<&Set> {
        self.sets.last()
    }

    pub fn current_set_mut(&mut self) -> Option<&mut Set> {
        self.sets.last_mut()
    }

    pub fn current_leg(&self) -> Option<&Leg> {
        self.current_set().and_then(|s| s.legs.last())
    }

    pub fn current_leg_mut(&mut self) -> Option<&mut Leg> {
        self.current_set_mut().and_then(|s| s.legs.last_mut())
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.player_turn)
    }

    /// The seat's latest take in the current leg, derived on every call.
    pub fn current_take_of(&self, seat: Seat) -> Option<&Take> {
        self.current_leg().and_then(|leg| leg.last_take_of(seat))
    }

    pub fn open_take_of(&self, seat: Seat) -> Option<&Take> {
        self.current_take_of(seat).filter(|t| !t.is_complete())
    }

    pub fn darts_left_of(&self, seat: Seat) -> u8 {
        self.darts_left.get(seat).copied().unwrap_or(0)
    }

    pub fn set_darts_left(&mut self, seat: Seat, n: u8) {
        if self.darts_left.len() < self.players.len() {
            self.darts_left.resize(self.players.len(), 0);
        }
        if let Some(slot) = self.darts_left.get_mut(seat) {
            *slot = n;
        }
    }

    pub fn seat_before(&self, seat: Seat) -> Seat {
        let n = self.seats().max(1);
        (seat + n - 1) % n
    }

    pub fn seat_after(&self, seat: Seat) -> Seat {
        let n = self.seats().max(1);
        (seat + 1) % n
    }

    pub fn has_darts(&self) -> bool {
        self.sets
            .iter()
            .flat_map(|s| s.legs.iter())
            .flat_map(|l| l.takes.iter())
            .any(|t| !t.darts.is_empty())
    }

    pub fn is_initialized(&self) -> bool {
        self.status != GameStatus::Uninitialized
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub fn is_blocked(&self) -> bool {
        self.status == GameStatus::Blocking
    }

    pub fn won_legs(&self, seat: Seat) -> u32 {
        self.current_set().map(|s| s.legs_won_by(seat)).unwrap_or(0)
    }

    pub fn won_sets(&self, seat: Seat) -> u32 {
        self.sets.iter().filter(|s| s.winner == Some(seat)).count() as u32
    }

    pub fn find_take(&self, take_id: EntityId) -> Option<&Take> {
        self.sets
            .iter()
            .flat_map(|s| s.legs.iter())
            .flat_map(|l| l.takes.iter())
            .find(|t| t.id == take_id)
    }

    pub fn all_takes(&self) -> impl Iterator<Item = &Take> {
        self.sets
            .iter()
            .flat_map(|s| s.legs.iter())
            .flat_map(|l| l.takes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Bed, DartBoard};

    fn dart_at(segment: Segment) -> Dart {
        Dart::new(DartBoard::shared().center_of(segment).unwrap())
    }

    #[test]
    fn bust_take_scores_nothing() {
        let mut take = Take::new(0);
        take.darts.push(dart_at(Segment::new(20, Bed::Triple)));
        take.darts.push(dart_at(Segment::new(19, Bed::Triple)));
        assert_eq!(take.score(), 117);
        take.result = Some(TakeResult::Bust);
        assert_eq!(take.score(), 0);
        assert_eq!(take.size(), 2);
    }

    #[test]
    fn seats_wrap() {
        let mut game = Game::new("x01", GameOptions::new());
        game.players = vec![Player::new("a"), Player::new("b"), Player::new("c")];
        assert_eq!(game.seat_before(0), 2);
        assert_eq!(game.seat_after(2), 0);
    }

    #[test]
    fn status_names() {
        assert_eq!(GameStatus::Blocking.to_string(), "BLOCKING");
        assert_eq!("CHECK_IN".parse::<TakeResult>().unwrap(), TakeResult::CheckIn);
    }
}
