use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Location;

/// Movement a locked cube refused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CubeAction {
    Roll,
    Flip,
}

impl fmt::Display for CubeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Roll => "roll",
            Self::Flip => "flip",
        })
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("The box at {location} is empty")]
    EmptyTarget { location: Location },
    #[error("The box at {location} is locked and cannot {action}")]
    ImmovableTarget {
        location: Location,
        action: CubeAction,
    },
    #[error("The box at {location} is already locked")]
    AlreadyLocked { location: Location },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Direction is not available from this location")]
    InvalidDirection,
    #[error("The chosen box is not on any of the edges")]
    NotOnEdge,
    #[error("The chosen box was not rolled during this turn")]
    NotRolledThisTurn,
    #[error("Target does not match the shape the tool expects")]
    TargetShapeMismatch,
    #[error("Move is not allowed at this stage of the turn")]
    UnexpectedStage,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Input ended before the turn was complete")]
    InputExhausted,
}

impl GameError {
    /// Whether this error ends the current turn early.
    ///
    /// Every other error leaves the engine where it was, so the same move can be
    /// retried with different input.
    pub const fn forfeits_turn(self) -> bool {
        matches!(
            self,
            Self::EmptyTarget { .. } | Self::ImmovableTarget { .. } | Self::AlreadyLocked { .. }
        )
    }

    /// Whether the error is about the input alone, so asking again makes sense.
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::InvalidCoords
                | Self::InvalidDirection
                | Self::NotOnEdge
                | Self::NotRolledThisTurn
                | Self::TargetShapeMismatch
        )
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
