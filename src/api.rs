use crate::aim::Aimer;
use crate::config::EngineConfig;
use crate::engine::{Announcement, Announcer, GameEvent, LogAnnouncer, Orchestrator, Outcome};
use crate::error::{DartsError, DartsResult};
use crate::geometry::Point;
use crate::model::{EntityId, Game, Player};
use crate::rules::options::{GameOptions, OptionValue};
use crate::rules::VariantRegistry;
use crate::storage::{self, EntityKind, SharedStorage};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

pub type SharedGame = Arc<RwLock<Orchestrator>>;

type SharedObserver = Arc<dyn Fn(&GameEvent) + Send + Sync>;

/// How take feedback is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackMode {
    /// Announcements and the transitions after them run on a spawned thread.
    Threaded,
    /// Everything runs on the calling thread before the call returns.
    Synchronous,
}

fn read(game: &SharedGame) -> DartsResult<RwLockReadGuard<'_, Orchestrator>> {
    game.read()
        .map_err(|e| DartsError::Session(format!("game lock poisoned: {}", e)))
}

fn write(game: &SharedGame) -> DartsResult<RwLockWriteGuard<'_, Orchestrator>> {
    game.write()
        .map_err(|e| DartsError::Session(format!("game lock poisoned: {}", e)))
}

/// Holds session observers and the events queued for them. Events are
/// queued while the game lock is held and delivered once it is released,
/// so observers may read the session again.
#[derive(Default)]
struct Courier {
    observers: Mutex<Vec<SharedObserver>>,
    queued: Mutex<Vec<GameEvent>>,
}

impl Courier {
    fn queue(&self, event: &GameEvent) {
        match self.queued.lock() {
            Ok(mut queued) => queued.push(event.clone()),
            Err(e) => error!("Event queue poisoned: {}", e),
        }
    }

    /// Must not be called with the game lock held.
    fn deliver(&self) {
        let observers = match self.observers.lock() {
            Ok(observers) => observers,
            Err(e) => {
                error!("Observer registry poisoned: {}", e);
                return;
            }
        };
        let events = match self.queued.lock() {
            Ok(mut queued) => std::mem::take(&mut *queued),
            Err(e) => {
                error!("Event queue poisoned: {}", e);
                return;
            }
        };
        for event in &events {
            for observer in observers.iter() {
                observer(event);
            }
        }
    }
}

/// Front door for a darts application: player registry, game lifecycle
/// and input routing. Mutations take the game's write lock; feedback for
/// a completed take runs outside it and re-enters to finish the turn.
pub struct DartSession {
    storage: SharedStorage,
    registry: VariantRegistry,
    config: EngineConfig,
    announcer: Arc<dyn Announcer>,
    mode: FeedbackMode,
    game: Option<SharedGame>,
    courier: Arc<Courier>,
    channels: Vec<Sender<GameEvent>>,
    feedback: Mutex<Vec<JoinHandle<()>>>,
}

impl DartSession {
    pub fn new(storage: SharedStorage, config: EngineConfig) -> Self {
        let announcer = Arc::new(LogAnnouncer::new(config.feedback.announce_delay_ms));
        Self {
            storage,
            registry: VariantRegistry::standard(),
            config,
            announcer,
            mode: FeedbackMode::Threaded,
            game: None,
            courier: Arc::new(Courier::default()),
            channels: Vec::new(),
            feedback: Mutex::new(Vec::new()),
        }
    }

    pub fn with_announcer(mut self, announcer: Arc<dyn Announcer>) -> Self {
        self.announcer = announcer;
        self
    }

    pub fn with_registry(mut self, registry: VariantRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_mode(mut self, mode: FeedbackMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    /// Observers hear every game this session runs. They are called after
    /// the game lock is released, so reading the session from a callback is
    /// fine; subscribing from one is not.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        match self.courier.observers.lock() {
            Ok(mut observers) => observers.push(Arc::new(observer)),
            Err(e) => error!("Observer registry poisoned: {}", e),
        }
    }

    pub fn subscribe_channel(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        self.channels.push(tx);
        rx
    }

    // --- Players -------------------------------------------------------------

    /// Registers `player`. A taken name is rejected with `Ok(None)`.
    pub fn add_new_player(&self, mut player: Player) -> DartsResult<Option<Player>> {
        let row = serde_json::to_value(&player)?;
        match storage::lock(&self.storage)?.create(EntityKind::Player, row) {
            Ok(id) => {
                player.id = id;
                info!("👤 Registered player {}", player.name);
                Ok(Some(player))
            }
            Err(e) if e.is_constraint() => {
                warn!("Player rejected: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn players(&self) -> DartsResult<Vec<Player>> {
        storage::lock(&self.storage)?.players()
    }

    // --- Games ---------------------------------------------------------------

    pub fn unfinished_games(&self) -> DartsResult<Vec<Game>> {
        storage::lock(&self.storage)?.unfinished_games()
    }

    pub fn all_games(&self) -> DartsResult<Vec<Game>> {
        storage::lock(&self.storage)?.all_games()
    }

    /// Creates and starts a game. Missing `legs_to_set` / `sets_to_match`
    /// come from the engine configuration.
    pub fn new_game(&mut self, variant: &str, options: &GameOptions, players: Vec<Player>) -> DartsResult<()> {
        let mut options = options.clone();
        let match_params = &self.config.match_params;
        options
            .entry("legs_to_set".to_string())
            .or_insert(OptionValue::Int(match_params.legs_to_set as i64));
        options
            .entry("sets_to_match".to_string())
            .or_insert(OptionValue::Int(match_params.sets_to_match as i64));

        let orch = Orchestrator::create(self.storage.clone(), &self.registry, variant, &options)?;
        let orch = self.attach(orch);
        let game = Arc::new(RwLock::new(orch));
        self.game = Some(game.clone());
        self.run(&game, |o| o.start(players)).map(|_| ())
    }

    pub fn load_game(&mut self, game_id: EntityId) -> DartsResult<()> {
        let game = self
            .all_games()?
            .into_iter()
            .find(|g| g.id == game_id)
            .ok_or_else(|| DartsError::NotFound(format!("game #{}", game_id)))?;

        let orch = Orchestrator::load(self.storage.clone(), &self.registry, game)?;
        let mut orch = self.attach(orch);
        orch.publish_state(true);
        self.game = Some(Arc::new(RwLock::new(orch)));
        self.courier.deliver();
        Ok(())
    }

    fn attach(&self, orch: Orchestrator) -> Orchestrator {
        let mut orch = orch.with_aimer(Aimer::new(self.config.simulation.seed));
        let courier = self.courier.clone();
        orch.subscribe(move |e| courier.queue(e));
        for tx in &self.channels {
            let tx = tx.clone();
            orch.subscribe(move |e| {
                let _ = tx.send(e.clone());
            });
        }
        orch
    }

    pub fn current_game(&self) -> Option<&SharedGame> {
        self.game.as_ref()
    }

    /// Read access to the running game.
    pub fn with_game<R>(&self, f: impl FnOnce(&Orchestrator) -> R) -> DartsResult<R> {
        let game = self
            .game
            .as_ref()
            .ok_or_else(|| DartsError::NotFound("no game loaded".to_string()))?;
        let guard = read(game)?;
        Ok(f(&guard))
    }

    pub fn snapshot(&self) -> DartsResult<Game> {
        self.with_game(|o| o.game().clone())
    }

    // --- Input ---------------------------------------------------------------

    pub fn process_impact(&self, hit_location: impl Into<Point>) -> DartsResult<Outcome> {
        let point = hit_location.into();
        self.mutate(|o| o.add_dart(point))
    }

    pub fn request_takeback(&self) -> DartsResult<Outcome> {
        self.mutate(|o| o.undo_last_dart())
    }

    pub fn edit_dart(&self, take_id: EntityId, dart_id: EntityId, hit_location: Point) -> DartsResult<Outcome> {
        self.mutate(|o| o.edit_dart(take_id, dart_id, hit_location))
    }

    pub fn generate_dart(&self) -> DartsResult<Outcome> {
        self.mutate(|o| o.generate_dart())
    }

    /// Blocks until all feedback threads spawned so far have finished.
    pub fn wait_for_feedback(&self) {
        let handles: Vec<_> = match self.feedback.lock() {
            Ok(mut guard) => guard.drain(..).collect(),
            Err(e) => {
                error!("Feedback registry poisoned: {}", e);
                return;
            }
        };
        for handle in handles {
            if handle.join().is_err() {
                error!("A feedback thread panicked");
            }
        }
    }

    fn mutate<F>(&self, f: F) -> DartsResult<Outcome>
    where
        F: FnOnce(&mut Orchestrator) -> DartsResult<Outcome>,
    {
        let Some(game) = &self.game else {
            debug!("Ignoring input: no game loaded");
            return Ok(Outcome::Ignored);
        };
        self.run(game, f)
    }

    fn run<F>(&self, game: &SharedGame, f: F) -> DartsResult<Outcome>
    where
        F: FnOnce(&mut Orchestrator) -> DartsResult<Outcome>,
    {
        // Only the request that completed the take starts its feedback.
        // Requests ignored while BLOCKING leave the pending actions alone.
        let result = {
            let mut orch = write(game)?;
            let was_pending = orch.has_pending();
            let result = f(&mut orch).map(|outcome| {
                let blocked = !was_pending && orch.has_pending();
                (outcome, orch.drain_announcements(), blocked)
            });
            result
        };
        self.courier.deliver();
        let (outcome, announcements, blocked) = result?;

        if blocked {
            self.finish_take(game.clone(), announcements)?;
        } else if !announcements.is_empty() {
            let announcer = self.announcer.clone();
            self.dispatch(move || {
                announcer.announce(&announcements);
                Ok(())
            })?;
        }
        Ok(outcome)
    }

    /// Plays the take feedback, then runs the queued transitions under the
    /// write lock. With `blocking` off the transitions do not wait.
    fn finish_take(&self, game: SharedGame, announcements: Vec<Announcement>) -> DartsResult<()> {
        let announcer = self.announcer.clone();
        let courier = self.courier.clone();
        let hold = self.config.feedback.blocking;
        self.dispatch(move || {
            if hold {
                announcer.announce(&announcements);
            }
            let follow_up = {
                let mut orch = write(&game)?;
                let ran = orch.run_pending().map(|_| orch.drain_announcements());
                ran
            };
            courier.deliver();
            let follow_up = follow_up?;
            if !hold {
                announcer.announce(&announcements);
            }
            announcer.announce(&follow_up);
            Ok(())
        })
    }

    fn dispatch<F>(&self, job: F) -> DartsResult<()>
    where
        F: FnOnce() -> DartsResult<()> + Send + 'static,
    {
        match self.mode {
            FeedbackMode::Synchronous => job(),
            FeedbackMode::Threaded => {
                let handle = thread::spawn(move || {
                    if let Err(e) = job() {
                        error!("❌ Feedback failed: {}", e);
                    }
                });
                self.feedback
                    .lock()
                    .map_err(|e| DartsError::Session(format!("feedback registry poisoned: {}", e)))?
                    .push(handle);
                Ok(())
            }
        }
    }
}

impl Drop for DartSession {
    fn drop(&mut self) {
        self.wait_for_feedback();
    }
}
