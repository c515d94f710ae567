//! Movement extensions and the geometry scans they share with actions

use super::{MovementExtension, Reach};
use crate::board::{all_cells, Hex};
use crate::game::Board;
use crate::pieces::{CharacterId, Piece};

// ============================================================================
// SCANS
// ============================================================================

/// Landings of a single jump over an adjacent occupied cell.
///
/// `vacated` is the jumper's starting cell: it counts as empty, since the
/// jumper has left it by the second jump.
pub(crate) fn jump_landings(from: Hex, board: &Board, vacated: Hex) -> Vec<Hex> {
    let occupied = |h: Hex| h != vacated && board.is_occupied(h);
    (0..6u8)
        .filter_map(|dir| {
            let over = from.neighbor(dir);
            let land = from.offset(dir, 2);
            let lands = land.is_valid() && (land == vacated || !board.is_occupied(land));
            (occupied(over) && lands).then_some(land)
        })
        .collect()
}

/// Cells reachable with one or two consecutive jumps
pub(crate) fn acrobat_landings(piece: &Piece, board: &Board) -> Vec<Hex> {
    let mut out = Vec::new();
    for first in jump_landings(piece.pos, board, piece.pos) {
        push_unique(&mut out, first);
        for second in jump_landings(first, board, piece.pos) {
            if second != piece.pos {
                push_unique(&mut out, second);
            }
        }
    }
    out
}

/// Straight two-cell charges with an empty midpoint
pub(crate) fn charge_landings(piece: &Piece, board: &Board) -> Vec<Hex> {
    (0..6u8)
        .filter_map(|dir| {
            let mid = piece.pos.neighbor(dir);
            let land = piece.pos.offset(dir, 2);
            (board.is_free(mid) && board.is_free(land)).then_some(land)
        })
        .collect()
}

/// First unit on each of the six rays, skipping adjacent ones
pub(crate) fn visible_targets<'a>(piece: &Piece, board: &'a Board) -> Vec<&'a Piece> {
    (0..6u8)
        .filter_map(|dir| board.first_along(piece.pos, dir))
        .filter(|t| t.pos.distance_to(piece.pos) >= 2)
        .collect()
}

/// Cells an enemy could be pushed to by a Brawler at `source`.
///
/// Adjacent target: any of the three cells behind it. Target two cells away
/// in a line with an empty midpoint: straight on only.
pub(crate) fn push_cells(source: &Piece, target: &Piece, board: &Board) -> Vec<Hex> {
    let Some(dir) = source.pos.direction_to(target.pos) else {
        return Vec::new();
    };
    match source.pos.distance_to(target.pos) {
        1 => [dir, (dir + 1) % 6, (dir + 5) % 6]
            .into_iter()
            .map(|d| target.pos.neighbor(d))
            .filter(|&h| board.is_free(h))
            .collect(),
        2 => {
            let mid = source.pos.neighbor(dir);
            let beyond = target.pos.neighbor(dir);
            if board.is_free(mid) && board.is_free(beyond) {
                vec![beyond]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}

/// Enemies a Brawler can push right now
pub(crate) fn push_targets<'a>(piece: &Piece, board: &'a Board) -> Vec<&'a Piece> {
    board
        .enemies_of(piece)
        .filter(|t| !push_cells(piece, t, board).is_empty())
        .collect()
}

/// Empty cells with no enemy next to them
pub(crate) fn stealth_cells(piece: &Piece, board: &Board) -> Vec<Hex> {
    all_cells()
        .filter(|&h| !board.is_occupied(h))
        .filter(|h| {
            h.valid_neighbors()
                .filter_map(|n| board.piece_at(n))
                .all(|p| !p.is_enemy_of(piece))
        })
        .collect()
}

/// Distance-2 cells reached through an empty intermediate cell, only while an
/// allied Vizier is on the board
pub(crate) fn boost_cells(piece: &Piece, board: &Board) -> Vec<Hex> {
    if !board.has_ally(piece.owner, CharacterId::Vizier) {
        return Vec::new();
    }
    all_cells()
        .filter(|h| h.distance_to(piece.pos) == 2 && !board.is_occupied(*h))
        .filter(|h| {
            piece
                .pos
                .valid_neighbors()
                .any(|n| n.distance_to(*h) == 1 && !board.is_occupied(n))
        })
        .collect()
}

/// Empty cells around the allied Leader
pub(crate) fn guard_cells(piece: &Piece, board: &Board) -> Vec<Hex> {
    match board.leader_of(piece.owner) {
        Some(leader) => leader
            .pos
            .valid_neighbors()
            .filter(|&h| !board.is_occupied(h))
            .collect(),
        None => Vec::new(),
    }
}

fn push_unique(out: &mut Vec<Hex>, hex: Hex) {
    if !out.contains(&hex) {
        out.push(hex);
    }
}

fn moves(cells: Vec<Hex>) -> Vec<Reach> {
    cells.into_iter().map(Reach::Move).collect()
}

fn targets<'a>(pieces: impl IntoIterator<Item = &'a Piece>) -> Vec<Reach> {
    pieces.into_iter().map(|p| Reach::Target(p.pos)).collect()
}

// ============================================================================
// EXTENSIONS
// ============================================================================

pub struct LeaderBoost;

impl MovementExtension for LeaderBoost {
    fn reach(&self, piece: &Piece, board: &Board) -> Vec<Reach> {
        moves(boost_cells(piece, board))
    }
}

pub struct AcrobatJump;

impl MovementExtension for AcrobatJump {
    fn reach(&self, piece: &Piece, board: &Board) -> Vec<Reach> {
        moves(acrobat_landings(piece, board))
    }
}

pub struct CavalryCharge;

impl MovementExtension for CavalryCharge {
    fn reach(&self, piece: &Piece, board: &Board) -> Vec<Reach> {
        moves(charge_landings(piece, board))
    }
}

pub struct GrapplerHook;

impl MovementExtension for GrapplerHook {
    fn reach(&self, piece: &Piece, board: &Board) -> Vec<Reach> {
        targets(visible_targets(piece, board))
    }
}

pub struct IllusionistSwap;

impl MovementExtension for IllusionistSwap {
    fn reach(&self, piece: &Piece, board: &Board) -> Vec<Reach> {
        targets(visible_targets(piece, board))
    }
}

pub struct BrawlerPush;

impl MovementExtension for BrawlerPush {
    fn reach(&self, piece: &Piece, board: &Board) -> Vec<Reach> {
        targets(push_targets(piece, board))
    }
}

pub struct ManipulatorMove;

impl MovementExtension for ManipulatorMove {
    fn reach(&self, piece: &Piece, board: &Board) -> Vec<Reach> {
        targets(
            visible_targets(piece, board)
                .into_iter()
                .filter(|t| t.is_enemy_of(piece))
                .filter(|t| t.pos.valid_neighbors().any(|n| !board.is_occupied(n))),
        )
    }
}

pub struct ProwlerStealth;

impl MovementExtension for ProwlerStealth {
    fn reach(&self, piece: &Piece, board: &Board) -> Vec<Reach> {
        moves(stealth_cells(piece, board))
    }
}

pub struct RoyalGuardStep;

impl MovementExtension for RoyalGuardStep {
    fn reach(&self, piece: &Piece, board: &Board) -> Vec<Reach> {
        moves(guard_cells(piece, board))
    }
}
