//! Rule errors raised by the engine

use crate::board::Hex;
use crate::pieces::{AbilityId, CharacterId, PieceId, Player};

pub type Result<T, E = RuleError> = std::result::Result<T, E>;

/// Every way a requested action can be refused.
///
/// All variants are recoverable: the engine never mutates state before
/// returning one of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("coordinate ({}, {}) is off the board", .0.q, .0.r)]
    InvalidCoordinate(Hex),

    #[error("piece {0:?} not found")]
    NotFound(PieceId),

    #[error("game is already over")]
    GameOver,

    #[error("it is {current:?}'s turn, piece belongs to {owner:?}")]
    WrongTurn { current: Player, owner: Player },

    #[error("acting user is not registered for {0:?}")]
    NotActivePlayer(Player),

    #[error("piece {0:?} already acted this turn")]
    AlreadyActed(PieceId),

    #[error("{character:?} has no ability {ability:?}")]
    UnknownAbility { character: CharacterId, ability: AbilityId },

    #[error("blocked: {0}")]
    Blocked(&'static str),

    #[error("piece {piece:?} cannot move to ({}, {})", .to.q, .to.r)]
    IllegalMove { piece: PieceId, to: Hex },

    #[error("{ability:?}: {reason}")]
    RuleViolation { ability: AbilityId, reason: &'static str },

    #[error("recruitment refused: {0}")]
    Recruitment(&'static str),
}

impl RuleError {
    pub(crate) fn violation(ability: AbilityId, reason: &'static str) -> Self {
        RuleError::RuleViolation { ability, reason }
    }
}
