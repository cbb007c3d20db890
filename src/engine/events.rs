use crate::model::{Game, Take};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use strum_macros::{Display, EnumString};

/// Tells the camera/sensor side whether the darts have to be pulled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardState {
    RemoveDarts,
    TakeActive,
}

/// Deferred state transition, executed once the take announcement is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TransitionAction {
    PrepareNextLeg,
    PrepareNextSet,
    SetFinished,
    SetInProgress,
    RecalculateScores,
    NextPlayer,
}

impl TransitionAction {
    pub fn queue(game_won: bool, set_won: bool, leg_won: bool) -> Vec<TransitionAction> {
        use TransitionAction::*;
        if game_won {
            vec![SetFinished]
        } else if set_won {
            vec![PrepareNextSet, SetInProgress, RecalculateScores, NextPlayer]
        } else if leg_won {
            vec![PrepareNextLeg, SetInProgress, RecalculateScores, NextPlayer]
        } else {
            vec![SetInProgress, RecalculateScores, NextPlayer]
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TakeUpdated(Option<Take>),
    BoardState(BoardState),
    GameUpdated { game: Box<Game>, new_game: bool },
    PerformActions(Vec<TransitionAction>),
}

pub type Observer = Box<dyn Fn(&GameEvent) + Send + Sync>;

#[derive(Default)]
pub struct EventBus {
    observers: Vec<Observer>,
    channels: Vec<Sender<GameEvent>>,
}

impl EventBus {
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&GameEvent) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn subscribe_channel(&mut self) -> Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        self.channels.push(tx);
        rx
    }

    pub fn emit(&mut self, event: GameEvent) {
        for observer in &self.observers {
            observer(&event);
        }
        // Hung-up receivers are dropped.
        self.channels.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty() && self.channels.is_empty()
    }
}
