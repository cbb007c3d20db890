use crate::engine::BoardState;
use crate::error::DartsResult;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// A dart impact from any source (click, drag correction, remote sensor),
/// in board millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEvent {
    pub x: f64,
    pub y: f64,
}

impl ImpactEvent {
    /// Parses a sensor `board_coordinate` message: `{"x": 12.5, "y": -80.0}`.
    pub fn parse(message: &str) -> DartsResult<Self> {
        Ok(serde_json::from_str(message)?)
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<ImpactEvent> for Point {
    fn from(e: ImpactEvent) -> Self {
        e.point()
    }
}

/// Message published back to the sensor side.
pub fn board_state_message(state: BoardState) -> String {
    state.to_string()
}
