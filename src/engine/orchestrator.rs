use super::events::{BoardState, EventBus, GameEvent, TransitionAction};
use super::feedback::Announcement;
use crate::aim::Aimer;
use crate::error::{DartsError, DartsResult};
use crate::geometry::Point;
use crate::model::{
    Dart, EntityId, Game, GameStatus, Leg, Player, Seat, Set, Take, TakeResult, DARTS_PER_TAKE,
};
use crate::rules::options::{get_int, GameOptions};
use crate::rules::{GameRules, VariantRegistry};
use crate::storage::{self, EntityKind, SharedStorage};
use serde_json::{json, Value};
use std::sync::mpsc::Receiver;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The request did not fit the current state and changed nothing.
    Ignored,
}

/// What a completed take set in motion.
#[derive(Debug, Clone, PartialEq)]
pub struct TakeCompletion {
    pub seat: Seat,
    pub result: TakeResult,
    pub score: u32,
    pub leg_won: bool,
    pub set_won: bool,
    pub game_won: bool,
    pub actions: Vec<TransitionAction>,
}

fn set_row(game_id: EntityId, set: &Set) -> Value {
    json!({
        "game_id": game_id,
        "beginner": set.beginner,
        "start_time": set.start_time,
        "winner": set.winner,
    })
}

fn leg_row(set_id: EntityId, leg: &Leg) -> Value {
    json!({
        "set_id": set_id,
        "beginner": leg.beginner,
        "start_time": leg.start_time,
        "winner": leg.winner,
    })
}

fn take_row(leg_id: EntityId, take: &Take) -> Value {
    json!({
        "leg_id": leg_id,
        "seat": take.seat,
        "start_time": take.start_time,
        "result": take.result,
    })
}

fn dart_row(take_id: EntityId, dart: &Dart) -> Value {
    json!({
        "take_id": take_id,
        "x": dart.hit_location.x,
        "y": dart.hit_location.y,
        "field": dart.segment().to_string(),
        "timestamp": dart.timestamp,
        "intent": dart.intent,
    })
}

/// Drives one game: darts in, scores and turn order out. Single owner;
/// callers serialize access (see `DartSession`).
pub struct Orchestrator {
    game: Game,
    rules: Box<dyn GameRules>,
    storage: SharedStorage,
    events: EventBus,
    aimer: Aimer,
    pending: Option<TakeCompletion>,
    outbox: Vec<Announcement>,
}

impl Orchestrator {
    /// Registers a new, not yet started game of `variant`.
    pub fn create(
        storage: SharedStorage,
        registry: &VariantRegistry,
        variant: &str,
        options: &GameOptions,
    ) -> DartsResult<Self> {
        let options = registry.resolve_options(variant, options)?;
        let rules = registry.build(variant, &options)?;

        let mut game = Game::new(variant, options);
        game.legs_to_set = get_int(&game.options, "legs_to_set", 3) as u32;
        game.sets_to_match = get_int(&game.options, "sets_to_match", 1) as u32;
        game.id = storage::lock(&storage)?.create(EntityKind::Game, serde_json::to_value(&game)?)?;
        info!("🎯 Created {} game #{}", variant, game.id);

        Ok(Self::assemble(game, rules, storage))
    }

    /// Resumes a stored game. A game saved while BLOCKING runs its
    /// outstanding transitions silently. Nothing is published until
    /// `publish_state` is called.
    pub fn load(storage: SharedStorage, registry: &VariantRegistry, mut game: Game) -> DartsResult<Self> {
        let rules = registry.build(&game.variant, &game.options)?;
        game.darts_left = vec![0; game.seats()];
        let mut orch = Self::assemble(game, rules, storage);

        orch.recalculate();
        if orch.game.is_blocked() {
            info!("🔓 Unblocking game #{}", orch.game.id);
            let game_won = orch.game.winner.is_some();
            let set_won = orch.game.current_set().is_some_and(|s| s.winner.is_some());
            let leg_won = orch.game.current_leg().is_some_and(|l| l.winner.is_some());
            for action in TransitionAction::queue(game_won, set_won, leg_won) {
                orch.perform(action, false)?;
            }
        }
        orch.recalculate();
        orch.reset_darts_left();
        orch.persist_game()?;
        info!(
            "📂 Loaded game #{} ({}), {} to throw",
            orch.game.id,
            orch.game.variant,
            orch.name_of(orch.game.player_turn)
        );
        Ok(orch)
    }

    fn assemble(game: Game, rules: Box<dyn GameRules>, storage: SharedStorage) -> Self {
        Self {
            game,
            rules,
            storage,
            events: EventBus::default(),
            aimer: Aimer::default(),
            pending: None,
            outbox: Vec::new(),
        }
    }

    pub fn with_aimer(mut self, aimer: Aimer) -> Self {
        self.aimer = aimer;
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn rules(&self) -> &dyn GameRules {
        self.rules.as_ref()
    }

    pub fn scores(&self) -> &[i32] {
        self.rules.scores()
    }

    pub fn score_of(&self, seat: Seat) -> i32 {
        self.rules.score_of(seat)
    }

    pub fn pending(&self) -> Option<&TakeCompletion> {
        self.pending.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn drain_announcements(&mut self) -> Vec<Announcement> {
        std::mem::take(&mut self.outbox)
    }

    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(observer);
    }

    pub fn subscribe_channel(&mut self) -> Receiver<GameEvent> {
        self.events.subscribe_channel()
    }

    // --- Lifecycle ---------------------------------------------------------

    pub fn start(&mut self, players: Vec<Player>) -> DartsResult<Outcome> {
        if self.game.is_initialized() {
            debug!("Game #{} already started", self.game.id);
            return Ok(Outcome::Ignored);
        }
        if players.is_empty() {
            return Err(DartsError::Config(
                "a game needs at least one player".to_string(),
            ));
        }

        self.game.players = players;
        self.game.darts_left = vec![0; self.game.seats()];
        self.game.status = GameStatus::InProgress;
        self.game.player_turn = 0;
        self.add_set(0)?;
        self.recalculate();
        self.next_player(true);
        self.persist_game()?;

        info!(
            "🚀 Started {} with {}",
            self.game.variant,
            self.game
                .players
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.publish_state(true);
        Ok(Outcome::Applied)
    }

    fn refusal(&self) -> Option<&'static str> {
        match self.game.status {
            GameStatus::Uninitialized => Some("game has not started"),
            GameStatus::Blocking => Some("game is blocked"),
            GameStatus::Finished => Some("game is finished"),
            _ if self.game.winner.is_some() => Some("game is finished"),
            _ => None,
        }
    }

    // --- Darts -------------------------------------------------------------

    pub fn add_dart(&mut self, hit_location: Point) -> DartsResult<Outcome> {
        self.add_dart_with(Dart::new(hit_location))
    }

    pub fn add_dart_with(&mut self, mut dart: Dart) -> DartsResult<Outcome> {
        if let Some(reason) = self.refusal() {
            debug!("Ignoring dart: {}", reason);
            return Ok(Outcome::Ignored);
        }
        let seat = self.game.player_turn;
        let left = self.game.darts_left_of(seat);
        if left == 0 {
            debug!("Ignoring dart: {} has no darts left", self.name_of(seat));
            return Ok(Outcome::Ignored);
        }

        let leg_id = self.current_leg_id()?;
        if self.game.open_take_of(seat).is_none() {
            let mut take = Take::new(seat);
            take.id = self.create_row(EntityKind::Take, take_row(leg_id, &take))?;
            self.current_leg_mut()?.takes.push(take);
        }

        let take_id = self.open_take_mut(seat)?.id;
        dart.id = self.create_row(EntityKind::Dart, dart_row(take_id, &dart))?;
        debug!("🎯 {} hit {}", self.name_of(seat), dart.segment());
        self.open_take_mut(seat)?.darts.push(dart);
        self.game.set_darts_left(seat, left - 1);

        if let Some(completion) = self.settle_take(seat)? {
            self.block_on(completion);
        }
        self.persist_game()?;
        self.publish_state(false);
        Ok(Outcome::Applied)
    }

    /// Throws a simulated dart for the current player at whatever the
    /// variant considers the best target.
    pub fn generate_dart(&mut self) -> DartsResult<Outcome> {
        if let Some(reason) = self.refusal() {
            debug!("Not generating a dart: {}", reason);
            return Ok(Outcome::Ignored);
        }
        let seat = self.game.player_turn;
        let target = self.rules.next_target(&self.game, seat)?;
        let (h_dev, v_dev) = self
            .game
            .players
            .get(seat)
            .map(|p| (p.horizontal_deviation, p.vertical_deviation))
            .unwrap_or_default();

        let aim_point = self.aimer.target_point(target.segment.into());
        let hit = self.aimer.aim_at(aim_point, h_dev, v_dev);
        debug!(
            "🤖 {} aims at {} ({})",
            self.name_of(seat),
            target.segment,
            target.intent
        );
        self.add_dart_with(Dart::aimed(hit, aim_point, target.intent))
    }

    /// Lets the aimer throw for every seat until the game is finished or
    /// `max_darts` were thrown. Transitions run right away and
    /// announcements are dropped. Returns the number of darts thrown.
    pub fn play_out(&mut self, max_darts: usize) -> DartsResult<usize> {
        let mut thrown = 0;
        while !self.game.is_finished() && thrown < max_darts {
            if self.has_pending() {
                self.run_pending()?;
                continue;
            }
            if self.generate_dart()? == Outcome::Ignored {
                break;
            }
            thrown += 1;
            if self.has_pending() {
                self.run_pending()?;
            }
            self.outbox.clear();
        }
        self.outbox.clear();
        Ok(thrown)
    }

    /// Recomputes scores and asks the variant whether the open take of
    /// `seat` is over. Completes take, leg, set and game as needed.
    fn settle_take(&mut self, seat: Seat) -> DartsResult<Option<TakeCompletion>> {
        self.recalculate();
        let verdict = self
            .game
            .open_take_of(seat)
            .and_then(|take| self.rules.take_verdict(seat, take));
        let Some(result) = verdict else {
            return Ok(None);
        };

        let completion = self.complete_take(seat, result)?;
        self.recalculate();
        Ok(Some(completion))
    }

    fn complete_take(&mut self, seat: Seat, result: TakeResult) -> DartsResult<TakeCompletion> {
        let leg_id = self.current_leg_id()?;
        let take = self.open_take_mut(seat)?;
        take.result = Some(result);
        let (take_id, score, row) = (take.id, take.score(), take_row(leg_id, take));
        self.update_row(EntityKind::Take, take_id, row)?;
        self.game.set_darts_left(seat, 0);
        debug!("Take of {} ended: {} ({} points)", self.name_of(seat), result, score);

        let (mut leg_won, mut set_won, mut game_won) = (false, false, false);
        if result == TakeResult::Win {
            leg_won = true;
            self.complete_leg(seat)?;
            if self.game.won_legs(seat) >= self.game.legs_to_set {
                set_won = true;
                self.complete_set(seat)?;
                if self.game.won_sets(seat) >= self.game.sets_to_match {
                    game_won = true;
                    self.game.winner = Some(seat);
                    info!("🏆 {} wins game #{}", self.name_of(seat), self.game.id);
                }
            }
        }

        Ok(TakeCompletion {
            seat,
            result,
            score,
            leg_won,
            set_won,
            game_won,
            actions: TransitionAction::queue(game_won, set_won, leg_won),
        })
    }

    fn complete_leg(&mut self, seat: Seat) -> DartsResult<()> {
        self.current_leg_mut()?.winner = Some(seat);
        self.sync_current_rows()?;
        info!("🎉 {} wins the leg", self.name_of(seat));
        Ok(())
    }

    fn complete_set(&mut self, seat: Seat) -> DartsResult<()> {
        if let Some(set) = self.game.current_set_mut() {
            set.winner = Some(seat);
        }
        self.sync_current_rows()?;
        info!("🎉 {} wins the set", self.name_of(seat));
        Ok(())
    }

    fn block_on(&mut self, completion: TakeCompletion) {
        self.game.status = GameStatus::Blocking;

        if self.rules.announces_take_score() {
            self.outbox.push(Announcement::TakeScore(completion.score));
        }
        let seat = completion.seat;
        let name = self.name_of(seat);
        if completion.game_won {
            self.outbox.push(Announcement::GameShot { seat, name });
        } else if completion.set_won {
            self.outbox.push(Announcement::SetShot { seat, name });
        } else if completion.leg_won {
            self.outbox.push(Announcement::LegShot { seat, name });
        }
        self.pending = Some(completion);
    }

    /// Runs the transitions queued by the last completed take. Call once
    /// its feedback is done.
    pub fn run_pending(&mut self) -> DartsResult<Vec<TransitionAction>> {
        let Some(completion) = self.pending.take() else {
            return Ok(Vec::new());
        };
        self.events
            .emit(GameEvent::PerformActions(completion.actions.clone()));
        for &action in &completion.actions {
            self.perform(action, true)?;
        }
        self.persist_game()?;
        self.publish_state(false);
        Ok(completion.actions)
    }

    fn perform(&mut self, action: TransitionAction, announce: bool) -> DartsResult<()> {
        debug!("Transition: {}", action);
        match action {
            TransitionAction::PrepareNextLeg => {
                let beginner = self
                    .game
                    .current_leg()
                    .map(|l| self.game.seat_after(l.beginner))
                    .unwrap_or(0);
                self.add_leg(beginner)?;
            }
            TransitionAction::PrepareNextSet => {
                let beginner = self
                    .game
                    .current_set()
                    .map(|s| self.game.seat_after(s.beginner))
                    .unwrap_or(0);
                self.add_set(beginner)?;
            }
            TransitionAction::SetFinished => self.game.status = GameStatus::Finished,
            TransitionAction::SetInProgress => self.game.status = GameStatus::InProgress,
            TransitionAction::RecalculateScores => self.recalculate(),
            TransitionAction::NextPlayer => self.next_player(announce),
        }
        Ok(())
    }

    fn next_player(&mut self, announce: bool) {
        let seat = self.game.seat_after(self.game.player_turn);
        self.game.player_turn = seat;
        self.game.set_darts_left(seat, DARTS_PER_TAKE as u8);
        if announce {
            self.outbox.push(Announcement::PlayerUp {
                seat,
                name: self.name_of(seat),
                required: self.rules.required_score(seat),
            });
        }
    }

    fn add_set(&mut self, beginner: Seat) -> DartsResult<()> {
        let mut set = Set::new(beginner);
        set.id = self.create_row(EntityKind::Set, set_row(self.game.id, &set))?;
        self.game.sets.push(set);
        self.add_leg(beginner)
    }

    // The turn is parked on the seat before the beginner; NextPlayer follows.
    fn add_leg(&mut self, beginner: Seat) -> DartsResult<()> {
        let set_id = self
            .game
            .current_set()
            .map(|s| s.id)
            .ok_or_else(|| DartsError::NotFound("current set".to_string()))?;
        let mut leg = Leg::new(beginner);
        leg.id = self.create_row(EntityKind::Leg, leg_row(set_id, &leg))?;
        if let Some(set) = self.game.current_set_mut() {
            set.legs.push(leg);
        }
        self.game.player_turn = self.game.seat_before(beginner);
        debug!(
            "Set {} leg {} begins with {}",
            self.game.sets.len(),
            self.game.current_set().map(|s| s.legs.len()).unwrap_or(0),
            self.name_of(beginner)
        );
        Ok(())
    }

    // --- Corrections -------------------------------------------------------

    /// Takes back the most recent dart: from the current player's open take,
    /// or else from the previous thrower, whose turn it becomes again.
    pub fn undo_last_dart(&mut self) -> DartsResult<Outcome> {
        if !self.game.is_initialized() || self.game.is_blocked() {
            debug!("Ignoring undo: game is not accepting input");
            return Ok(Outcome::Ignored);
        }
        if !self.game.has_darts() {
            debug!("Nothing to undo");
            return Ok(Outcome::Ignored);
        }

        let current = self.game.player_turn;
        let left = self.game.darts_left_of(current) as usize;
        let own_take_open = self.game.open_take_of(current).is_some_and(|t| t.size() > 0)
            && left > 0
            && left < DARTS_PER_TAKE;

        let removed = if self.game.is_finished() || own_take_open {
            self.remove_last_dart_of(current)?
        } else {
            let leg_is_empty = self.game.current_leg().is_some_and(|l| l.takes.is_empty());
            let previous = if leg_is_empty {
                self.previous_leg_winner()
            } else {
                let seat = self.game.seat_before(current);
                self.game.current_take_of(seat).map(|_| seat)
            };
            let Some(previous) = previous else {
                warn!("Undo found no take to revisit in game #{}", self.game.id);
                return Ok(Outcome::Ignored);
            };

            self.game.set_darts_left(current, 0);
            let removed = self.remove_last_dart_of(previous)?;
            self.game.player_turn = self.game.seat_before(self.game.player_turn);
            removed
        };
        if !removed {
            return Ok(Outcome::Ignored);
        }

        self.game.winner = None;
        if let Some(leg) = self.game.current_leg_mut() {
            leg.winner = None;
        }
        if let Some(set) = self.game.current_set_mut() {
            set.winner = None;
        }
        self.sync_current_rows()?;
        self.game.status = GameStatus::InProgress;
        self.recalculate();
        self.persist_game()?;
        info!("↩️  Undo, {} to throw", self.name_of(self.game.player_turn));
        self.publish_state(false);
        Ok(Outcome::Applied)
    }

    fn previous_leg_winner(&self) -> Option<Seat> {
        let set = self.game.current_set()?;
        if set.legs.len() > 1 {
            set.legs[set.legs.len() - 2].winner
        } else {
            self.game.sets.iter().rev().nth(1).and_then(|s| s.winner)
        }
    }

    fn remove_last_dart_of(&mut self, seat: Seat) -> DartsResult<bool> {
        if self.game.current_leg().is_some_and(|l| l.takes.is_empty()) {
            self.remove_empty_leg()?;
        }

        let leg_id = self.current_leg_id()?;
        let Some(leg) = self.game.current_leg_mut() else {
            return Ok(false);
        };
        let Some(idx) = leg.last_take_index_of(seat) else {
            return Ok(false);
        };
        let take = &mut leg.takes[idx];
        let Some(dart) = take.darts.pop() else {
            return Ok(false);
        };
        take.result = None;
        let (take_id, remaining, row) = (take.id, take.size(), take_row(leg_id, take));
        if remaining == 0 {
            leg.takes.remove(idx);
        }

        self.game
            .set_darts_left(seat, (DARTS_PER_TAKE - remaining) as u8);
        if remaining == 0 {
            self.delete_row(EntityKind::Take, take_id)?;
        } else {
            self.delete_row(EntityKind::Dart, dart.id)?;
            self.update_row(EntityKind::Take, take_id, row)?;
        }
        debug!("Removed {} of {}", dart.segment(), self.name_of(seat));
        Ok(true)
    }

    // The turn moves to the seat after the previous leg's winner; the
    // caller steps it back once more.
    fn remove_empty_leg(&mut self) -> DartsResult<()> {
        let Some(set) = self.game.current_set_mut() else {
            return Ok(());
        };
        let Some(leg) = set.legs.pop() else {
            return Ok(());
        };
        let set_is_empty = set.legs.is_empty();
        self.delete_row(EntityKind::Leg, leg.id)?;

        if set_is_empty && self.game.sets.len() > 1 {
            if let Some(set) = self.game.sets.pop() {
                self.delete_row(EntityKind::Set, set.id)?;
            }
        }
        if let Some(winner) = self.game.current_leg().and_then(|l| l.winner) {
            self.game.player_turn = self.game.seat_after(winner);
        }
        Ok(())
    }

    /// Moves dart `dart_id` of the latest take to `hit_location`. Darts
    /// thrown after it are replayed while the take stays open and dropped
    /// once it ends.
    pub fn edit_dart(
        &mut self,
        take_id: EntityId,
        dart_id: EntityId,
        hit_location: Point,
    ) -> DartsResult<Outcome> {
        if self.game.status != GameStatus::InProgress {
            debug!("Ignoring edit: game is {}", self.game.status);
            return Ok(Outcome::Ignored);
        }
        let leg = self.current_leg()?;
        let Some(take_idx) = leg.takes.iter().position(|t| t.id == take_id) else {
            if self.game.find_take(take_id).is_some() {
                debug!("Ignoring edit of take #{} from an earlier leg", take_id);
                return Ok(Outcome::Ignored);
            }
            return Err(DartsError::NotFound(format!("take #{}", take_id)));
        };
        if take_idx + 1 != leg.takes.len() {
            debug!("Ignoring edit of take #{}: only the latest take can be corrected", take_id);
            return Ok(Outcome::Ignored);
        }
        let take = &leg.takes[take_idx];
        let dart_idx = take
            .darts
            .iter()
            .position(|d| d.id == dart_id)
            .ok_or_else(|| DartsError::NotFound(format!("dart #{}", dart_id)))?;
        let seat = take.seat;
        let was_complete = take.is_complete();

        let (discarded, edited) = {
            let take = &mut self.current_leg_mut()?.takes[take_idx];
            take.result = None;
            let discarded = take.darts.split_off(dart_idx + 1);
            take.darts[dart_idx].hit_location = hit_location;
            (discarded, take.darts[dart_idx].clone())
        };
        self.update_row(EntityKind::Dart, dart_id, dart_row(take_id, &edited))?;
        for dart in &discarded {
            self.delete_row(EntityKind::Dart, dart.id)?;
        }
        debug!("✏️  Dart #{} moved to {}", dart_id, edited.segment());

        let mut completion = self.settle_take(seat)?;
        for mut dart in discarded {
            if completion.is_some() {
                debug!("Dropping {} after the take ended", dart.segment());
                continue;
            }
            dart.id = self.create_row(EntityKind::Dart, dart_row(take_id, &dart))?;
            self.open_take_mut(seat)?.darts.push(dart);
            completion = self.settle_take(seat)?;
        }

        match completion {
            None => {
                // Open again: the turn returns to its owner.
                let size = self.current_leg()?.takes[take_idx].size();
                let turn = self.game.player_turn;
                if turn != seat {
                    self.game.set_darts_left(turn, 0);
                    self.game.player_turn = seat;
                }
                self.game
                    .set_darts_left(seat, (DARTS_PER_TAKE - size) as u8);
                let leg_id = self.current_leg_id()?;
                let row = take_row(leg_id, &self.current_leg()?.takes[take_idx]);
                self.update_row(EntityKind::Take, take_id, row)?;
            }
            Some(c) if was_complete && !c.leg_won => {
                // The turn already moved on when the take first ended.
            }
            Some(c) => {
                let turn = self.game.player_turn;
                if turn != seat {
                    self.game.set_darts_left(turn, 0);
                    self.game.player_turn = seat;
                }
                self.block_on(c);
            }
        }

        self.persist_game()?;
        self.publish_state(false);
        Ok(Outcome::Applied)
    }

    // --- State projection ---------------------------------------------------

    /// The take a display should show: the current player's open take, or
    /// the most recent one while they have not thrown yet.
    pub fn displayed_take(&self) -> Option<&Take> {
        self.game
            .open_take_of(self.game.player_turn)
            .or_else(|| self.game.all_takes().last())
    }

    pub fn board_state(&self) -> BoardState {
        match self.displayed_take() {
            Some(take) if take.is_complete() => BoardState::RemoveDarts,
            _ => BoardState::TakeActive,
        }
    }

    /// Sends `TakeUpdated`, `BoardState` and `GameUpdated`, in that order.
    pub fn publish_state(&mut self, new_game: bool) {
        if self.events.is_empty() {
            return;
        }
        let take = self.displayed_take().cloned();
        let board = self.board_state();
        self.events.emit(GameEvent::TakeUpdated(take));
        self.events.emit(GameEvent::BoardState(board));
        self.events.emit(GameEvent::GameUpdated {
            game: Box::new(self.game.clone()),
            new_game,
        });
    }

    // --- Helpers -------------------------------------------------------------

    fn recalculate(&mut self) {
        self.rules
            .recalculate_scores(self.game.current_leg(), self.game.seats());
    }

    fn reset_darts_left(&mut self) {
        let seat = self.game.player_turn;
        self.game.darts_left = vec![0; self.game.seats()];
        if self.game.is_finished() {
            return;
        }
        let thrown = self.game.open_take_of(seat).map(Take::size).unwrap_or(0);
        self.game
            .set_darts_left(seat, (DARTS_PER_TAKE - thrown) as u8);
    }

    fn name_of(&self, seat: Seat) -> String {
        self.game
            .players
            .get(seat)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("seat {}", seat))
    }

    fn current_leg(&self) -> DartsResult<&Leg> {
        self.game
            .current_leg()
            .ok_or_else(|| DartsError::NotFound("current leg".to_string()))
    }

    fn current_leg_mut(&mut self) -> DartsResult<&mut Leg> {
        self.game
            .current_leg_mut()
            .ok_or_else(|| DartsError::NotFound("current leg".to_string()))
    }

    fn current_leg_id(&self) -> DartsResult<EntityId> {
        self.current_leg().map(|l| l.id)
    }

    fn open_take_mut(&mut self, seat: Seat) -> DartsResult<&mut Take> {
        self.game
            .current_leg_mut()
            .and_then(|leg| leg.takes.iter_mut().rev().find(|t| t.seat == seat))
            .filter(|t| !t.is_complete())
            .ok_or_else(|| DartsError::NotFound(format!("open take of seat {}", seat)))
    }

    fn create_row(&self, kind: EntityKind, fields: Value) -> DartsResult<EntityId> {
        storage::lock(&self.storage)?.create(kind, fields)
    }

    fn update_row(&self, kind: EntityKind, id: EntityId, fields: Value) -> DartsResult<()> {
        storage::lock(&self.storage)?.update(kind, id, fields)
    }

    fn delete_row(&self, kind: EntityKind, id: EntityId) -> DartsResult<()> {
        storage::lock(&self.storage)?.delete(kind, id)
    }

    fn sync_current_rows(&self) -> DartsResult<()> {
        if let Some(set) = self.game.current_set() {
            self.update_row(EntityKind::Set, set.id, set_row(self.game.id, set))?;
            if let Some(leg) = set.legs.last() {
                self.update_row(EntityKind::Leg, leg.id, leg_row(set.id, leg))?;
            }
        }
        Ok(())
    }

    fn persist_game(&self) -> DartsResult<()> {
        let row = serde_json::to_value(&self.game)?;
        self.update_row(EntityKind::Game, self.game.id, row)
    }
}
