//! Error types
//!
//! None of these are fatal to the tick loop: the session logs them and moves on.

use thiserror::Error;

use crate::economy::ItemKind;
use crate::session::Phase;

/// Simulation invariant violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("snake has no segments")]
    EmptySnake,
}

/// Operations the coordinator refuses in its current phase
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while the game is {phase:?}")]
    GameInProgress { action: &'static str, phase: Phase },
}

/// Shop failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    #[error("not enough coins: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("{kind:?} '{id}' is already owned")]
    AlreadyOwned { kind: ItemKind, id: String },
    #[error("{kind:?} '{id}' is not owned")]
    NotOwned { kind: ItemKind, id: String },
}
