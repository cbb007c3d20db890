use crate::model::{Game, Seat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub seat: Seat,
    pub name: String,
    pub darts_thrown: usize,
    pub points: u32,
    pub three_dart_average: f64,
    pub legs_won: u32,
    pub sets_won: u32,
}

/// Whole-game figures per seat. Busted takes count their darts but no points.
pub fn game_stats(game: &Game) -> Vec<PlayerStats> {
    game.players
        .iter()
        .enumerate()
        .map(|(seat, player)| {
            let (darts_thrown, points) = game
                .all_takes()
                .filter(|t| t.seat == seat)
                .fold((0, 0), |(darts, points), t| (darts + t.size(), points + t.score()));
            let legs_won = game
                .sets
                .iter()
                .flat_map(|s| s.legs.iter())
                .filter(|l| l.winner == Some(seat))
                .count() as u32;

            PlayerStats {
                seat,
                name: player.name.clone(),
                darts_thrown,
                points,
                three_dart_average: three_dart_average(points, darts_thrown),
                legs_won,
                sets_won: game.won_sets(seat),
            }
        })
        .collect()
}

pub fn three_dart_average(points: u32, darts: usize) -> f64 {
    if darts == 0 {
        0.0
    } else {
        points as f64 * 3.0 / darts as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(three_dart_average(0, 0), 0.0);
        assert_eq!(three_dart_average(180, 3), 180.0);
        assert_eq!(three_dart_average(100, 6), 50.0);
    }
}
