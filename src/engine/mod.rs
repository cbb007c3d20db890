pub mod events;
pub mod feedback;
pub mod orchestrator;

pub use self::events::{BoardState, EventBus, GameEvent, TransitionAction};
pub use self::feedback::{Announcement, Announcer, LogAnnouncer, SilentAnnouncer};
pub use self::orchestrator::{Orchestrator, Outcome, TakeCompletion};
