//! LEADERS Core - Rules engine and AI
//!
//! This crate provides the core game logic for LEADERS:
//! - Board geometry (radius-3 hex grid with axial coordinates)
//! - Character catalogue and pieces
//! - Ability registry (movement extensions, actions, passives)
//! - Turn & legality engine and victory evaluation
//! - Heuristic AI opponent with risk simulation
//! - Recruitment and scenario setup

pub mod board;
pub mod pieces;
pub mod error;
pub mod game;
pub mod abilities;
pub mod engine;
pub mod victory;
pub mod recruit;
pub mod eval;
pub mod risk;
pub mod ai;
pub mod scenario;

// Re-exports for convenient access
pub use board::{Hex, BOARD_RADIUS, DIRECTIONS};
pub use pieces::{character_by_name, AbilityId, CharacterDef, CharacterId, GameId, Piece, PieceId, Player, UserId, CHARACTERS};
pub use error::{Result, RuleError};
pub use game::{Board, Difficulty, GameState, GameStatus, GameTurnState};
pub use abilities::{registry, AbilityRegistry, AbilityUse, Reach};
pub use engine::{legal_moves, AbilityOutcome, AbilityRequest, MoveOutcome, TurnOutcome};
pub use victory::{check_victory, VictoryResult, VictoryType, CAPTURE_THRESHOLD};
pub use recruit::{Recruiter, Reserve};
pub use eval::{Heuristics, LEADER_STRIKE, WIN_VALUE};
pub use ai::{AiAction, AiConfig, AiOpponent, ScoredAction, TurnReport};
pub use scenario::{Placement, Scenario};
