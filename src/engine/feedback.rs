use crate::model::Seat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::info;

/// Something the caller should hear. Rendering (audio, text) is up to the `Announcer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Announcement {
    TakeScore(u32),
    LegShot { seat: Seat, name: String },
    SetShot { seat: Seat, name: String },
    GameShot { seat: Seat, name: String },
    /// Introduces the next thrower, with the remaining X01 score when it is a checkout range.
    PlayerUp {
        seat: Seat,
        name: String,
        required: Option<u32>,
    },
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Announcement::TakeScore(score) => write!(f, "{}", score),
            Announcement::LegShot { name, .. } => write!(f, "Game shot and the leg, {}", name),
            Announcement::SetShot { name, .. } => write!(f, "Game shot and the set, {}", name),
            Announcement::GameShot { name, .. } => write!(f, "Game shot and the match, {}", name),
            Announcement::PlayerUp {
                name,
                required: Some(required),
                ..
            } => write!(f, "{}, you require {}", name, required),
            Announcement::PlayerUp { name, .. } => write!(f, "{} to throw", name),
        }
    }
}

/// Plays announcements. Called off the mutation lock; may block for as
/// long as the feedback takes.
pub trait Announcer: Send + Sync {
    fn announce(&self, announcements: &[Announcement]);
}

pub struct SilentAnnouncer;

impl Announcer for SilentAnnouncer {
    fn announce(&self, _announcements: &[Announcement]) {}
}

/// Writes each announcement to the log, then waits `delay`.
pub struct LogAnnouncer {
    pub delay: Duration,
}

impl LogAnnouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }
}

impl Announcer for LogAnnouncer {
    fn announce(&self, announcements: &[Announcement]) {
        for a in announcements {
            info!("📣 {}", a);
        }
        if !announcements.is_empty() && !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}
