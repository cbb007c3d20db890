use crate::geometry::{Bed, Segment};
use serde::{Deserialize, Serialize};

use super::EntityId;

pub const DEFAULT_H_DEV_MM: f64 = 35.0;
pub const DEFAULT_V_DEV_MM: f64 = 45.0;

/// A registered player. Independent of any game; the name is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    pub id: EntityId,
    pub name: String,
    pub horizontal_deviation: f64,
    pub vertical_deviation: f64,
    pub preferred_scoring_segment: Segment,
    /// Favourite finishing doubles, best first.
    pub preferred_doubles: Vec<u32>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            horizontal_deviation: DEFAULT_H_DEV_MM,
            vertical_deviation: DEFAULT_V_DEV_MM,
            preferred_scoring_segment: Segment::new(20, Bed::Triple),
            preferred_doubles: vec![20, 16, 8],
        }
    }
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_deviation(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_deviation = horizontal;
        self.vertical_deviation = vertical;
        self
    }

    pub fn with_preferred_doubles(mut self, doubles: Vec<u32>) -> Self {
        self.preferred_doubles = doubles;
        self
    }

    pub fn with_scoring_segment(mut self, segment: Segment) -> Self {
        self.preferred_scoring_segment = segment;
        self
    }
}
