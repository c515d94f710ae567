//! Victory conditions: capture points and encirclement

use crate::abilities::registry;
use crate::game::Board;
use crate::pieces::{Piece, Player};
use serde::{Deserialize, Serialize};

/// Points at which a Leader is captured
pub const CAPTURE_THRESHOLD: u8 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictoryType {
    Capture,
    Encirclement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryResult {
    pub is_game_over: bool,
    pub winner: Option<Player>,
    pub victory_type: Option<VictoryType>,
}

impl VictoryResult {
    pub fn ongoing() -> Self {
        Self {
            is_game_over: false,
            winner: None,
            victory_type: None,
        }
    }

    fn win(winner: Player, victory_type: VictoryType) -> Self {
        Self {
            is_game_over: true,
            winner: Some(winner),
            victory_type: Some(victory_type),
        }
    }
}

/// Capture points enemies currently hold against `leader`
pub fn capture_points(board: &Board, leader: &Piece) -> u8 {
    let passives = registry();
    board
        .enemies_of(leader)
        .filter(|enemy| enemy.def().contributes_to_capture)
        .map(|enemy| {
            let dist = enemy.pos.distance_to(leader.pos);
            if dist == 1 {
                if passives.captures_alone(enemy) {
                    2
                } else {
                    1
                }
            } else if passives.assists_capture(enemy, leader) {
                1
            } else {
                0
            }
        })
        .sum()
}

/// Every neighbor of the Leader is off-board or occupied
pub fn is_encircled(board: &Board, leader: &Piece) -> bool {
    leader
        .pos
        .neighbors()
        .iter()
        .all(|n| !n.is_valid() || board.is_occupied(*n))
}

/// Evaluate both Leaders; the first one found lost decides the result
pub fn check_victory(board: &Board) -> VictoryResult {
    for leader in board.pieces().iter().filter(|p| p.is_leader()) {
        let winner = leader.owner.opponent();
        if capture_points(board, leader) >= CAPTURE_THRESHOLD {
            return VictoryResult::win(winner, VictoryType::Capture);
        }
        if is_encircled(board, leader) {
            return VictoryResult::win(winner, VictoryType::Encirclement);
        }
    }
    VictoryResult::ongoing()
}
