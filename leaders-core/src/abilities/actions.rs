//! Action strategies
//!
//! Relocation abilities validate against the very cell sets their movement
//! extensions enumerate, so move hints and executed actions never disagree.

use super::movement::{
    boost_cells, charge_landings, guard_cells, jump_landings, push_cells,
    push_targets, stealth_cells, visible_targets,
};
use super::{AbilityUse, ActionStrategy};
use crate::board::{opposite, Hex};
use crate::error::{Result, RuleError};
use crate::game::Board;
use crate::pieces::{AbilityId, Piece, PieceId};

// ============================================================================
// HELPERS
// ============================================================================

fn require_destination(ability: AbilityId, usage: &AbilityUse) -> Result<Hex> {
    let dest = usage
        .destination
        .ok_or_else(|| RuleError::violation(ability, "destination required"))?;
    if !dest.is_valid() {
        return Err(RuleError::InvalidCoordinate(dest));
    }
    Ok(dest)
}

fn require_target<'a>(ability: AbilityId, usage: &AbilityUse, board: &'a Board) -> Result<&'a Piece> {
    let id = usage
        .target
        .ok_or_else(|| RuleError::violation(ability, "target required"))?;
    board.piece(id).ok_or(RuleError::NotFound(id))
}

fn require_visible(ability: AbilityId, source: &Piece, target: &Piece, board: &Board) -> Result<u8> {
    if !visible_targets(source, board).iter().any(|t| t.id == target.id) {
        return Err(RuleError::violation(
            ability,
            "target must be the first unit in a straight line and not adjacent",
        ));
    }
    source
        .pos
        .direction_to(target.pos)
        .ok_or_else(|| RuleError::violation(ability, "target is not aligned"))
}

/// Cell directly behind `target` as seen from `source`
fn straight_behind(source: &Piece, target: &Piece) -> Option<Hex> {
    source.pos.direction_to(target.pos).map(|dir| target.pos.neighbor(dir))
}

fn require_enemy(ability: AbilityId, source: &Piece, target: &Piece) -> Result<()> {
    if target.is_enemy_of(source) {
        Ok(())
    } else {
        Err(RuleError::violation(ability, "target must be an enemy"))
    }
}

// ============================================================================
// RELOCATION (Cavalry, Prowler, Royal Guard, Leader boost)
// ============================================================================

/// Moves the source to one of the cells its movement extension lists
pub struct Relocate {
    ability: AbilityId,
}

impl Relocate {
    pub fn new(ability: AbilityId) -> Self {
        Self { ability }
    }

    fn cells(&self, source: &Piece, board: &Board) -> Vec<Hex> {
        match self.ability {
            AbilityId::LeaderBoost => boost_cells(source, board),
            AbilityId::CavalryCharge => charge_landings(source, board),
            AbilityId::ProwlerStealth => stealth_cells(source, board),
            AbilityId::RoyalGuardStep => guard_cells(source, board),
            _ => Vec::new(),
        }
    }
}

impl ActionStrategy for Relocate {
    fn ability(&self) -> AbilityId {
        self.ability
    }

    fn validate(&self, source: &Piece, usage: &AbilityUse, board: &Board) -> Result<()> {
        let dest = require_destination(self.ability, usage)?;
        if self.cells(source, board).contains(&dest) {
            Ok(())
        } else {
            Err(RuleError::violation(self.ability, "destination not reachable"))
        }
    }

    fn apply(&self, source: &Piece, usage: &AbilityUse, board: &mut Board) -> Vec<PieceId> {
        match usage.destination {
            Some(dest) => {
                board.set_position(source.id, dest);
                vec![source.id]
            }
            None => Vec::new(),
        }
    }

    fn candidates(&self, source: &Piece, board: &Board) -> Vec<AbilityUse> {
        self.cells(source, board).into_iter().map(AbilityUse::to).collect()
    }
}

// ============================================================================
// ACROBAT
// ============================================================================

/// One jump, optionally chained into a second
pub struct Jump;

impl ActionStrategy for Jump {
    fn ability(&self) -> AbilityId {
        AbilityId::AcrobatJump
    }

    fn validate(&self, source: &Piece, usage: &AbilityUse, board: &Board) -> Result<()> {
        let first = require_destination(self.ability(), usage)?;
        if !jump_landings(source.pos, board, source.pos).contains(&first) {
            return Err(RuleError::violation(
                self.ability(),
                "must jump over an adjacent unit onto an empty cell",
            ));
        }
        if let Some(second) = usage.secondary_destination {
            if !second.is_valid() {
                return Err(RuleError::InvalidCoordinate(second));
            }
            if second == source.pos || !jump_landings(first, board, source.pos).contains(&second) {
                return Err(RuleError::violation(
                    self.ability(),
                    "second jump must clear an adjacent unit onto an empty cell",
                ));
            }
        }
        Ok(())
    }

    fn apply(&self, source: &Piece, usage: &AbilityUse, board: &mut Board) -> Vec<PieceId> {
        match usage.secondary_destination.or(usage.destination) {
            Some(dest) => {
                board.set_position(source.id, dest);
                vec![source.id]
            }
            None => Vec::new(),
        }
    }

    fn candidates(&self, source: &Piece, board: &Board) -> Vec<AbilityUse> {
        let mut out = Vec::new();
        for first in jump_landings(source.pos, board, source.pos) {
            out.push(AbilityUse::to(first));
            for second in jump_landings(first, board, source.pos) {
                if second != source.pos {
                    out.push(AbilityUse::to(first).then(second));
                }
            }
        }
        out
    }
}

// ============================================================================
// GRAPPLER
// ============================================================================

/// Pull a visible unit next to the Grappler, or pull the Grappler next to it
pub struct Hook;

impl Hook {
    fn approach_cell(source: &Piece, target: &Piece) -> Option<Hex> {
        let dir = source.pos.direction_to(target.pos)?;
        Some(target.pos.neighbor(opposite(dir)))
    }
}

impl ActionStrategy for Hook {
    fn ability(&self) -> AbilityId {
        AbilityId::GrapplerHook
    }

    fn validate(&self, source: &Piece, usage: &AbilityUse, board: &Board) -> Result<()> {
        let target = require_target(self.ability(), usage, board)?;
        require_visible(self.ability(), source, target, board)?;
        match usage.destination {
            None => Ok(()),
            Some(dest) if Some(dest) == Self::approach_cell(source, target) => Ok(()),
            Some(dest) if !dest.is_valid() => Err(RuleError::InvalidCoordinate(dest)),
            Some(_) => Err(RuleError::violation(
                self.ability(),
                "grappler may only land next to its target",
            )),
        }
    }

    fn apply(&self, source: &Piece, usage: &AbilityUse, board: &mut Board) -> Vec<PieceId> {
        let Some(target) = usage.target.and_then(|id| board.piece(id).copied()) else {
            return Vec::new();
        };
        let Some(dir) = source.pos.direction_to(target.pos) else {
            return Vec::new();
        };
        match usage.destination {
            Some(dest) => {
                board.set_position(source.id, dest);
                vec![source.id]
            }
            None => {
                board.set_position(target.id, source.pos.neighbor(dir));
                vec![target.id]
            }
        }
    }

    fn candidates(&self, source: &Piece, board: &Board) -> Vec<AbilityUse> {
        let mut out = Vec::new();
        for target in visible_targets(source, board) {
            out.push(AbilityUse::on(target.id));
            if let Some(cell) = Self::approach_cell(source, target) {
                out.push(AbilityUse::on(target.id).with_destination(cell));
            }
        }
        out
    }
}

// ============================================================================
// ILLUSIONIST
// ============================================================================

/// Trade places with a visible, non-adjacent unit
pub struct Swap;

impl ActionStrategy for Swap {
    fn ability(&self) -> AbilityId {
        AbilityId::IllusionistSwap
    }

    fn validate(&self, source: &Piece, usage: &AbilityUse, board: &Board) -> Result<()> {
        let target = require_target(self.ability(), usage, board)?;
        require_visible(self.ability(), source, target, board)?;
        Ok(())
    }

    fn apply(&self, source: &Piece, usage: &AbilityUse, board: &mut Board) -> Vec<PieceId> {
        let Some(target) = usage.target.and_then(|id| board.piece(id).copied()) else {
            return Vec::new();
        };
        board.set_position(target.id, source.pos);
        board.set_position(source.id, target.pos);
        vec![source.id, target.id]
    }

    fn candidates(&self, source: &Piece, board: &Board) -> Vec<AbilityUse> {
        visible_targets(source, board)
            .into_iter()
            .map(|t| AbilityUse::on(t.id))
            .collect()
    }
}

// ============================================================================
// BRAWLER
// ============================================================================

/// Shove an enemy back and take ground
pub struct Push;

impl ActionStrategy for Push {
    fn ability(&self) -> AbilityId {
        AbilityId::BrawlerPush
    }

    fn validate(&self, source: &Piece, usage: &AbilityUse, board: &Board) -> Result<()> {
        let target = require_target(self.ability(), usage, board)?;
        require_enemy(self.ability(), source, target)?;
        let cells = push_cells(source, target, board);
        if cells.is_empty() {
            return Err(RuleError::violation(self.ability(), "target cannot be pushed"));
        }
        match usage.destination {
            Some(dest) => {
                if !dest.is_valid() {
                    return Err(RuleError::InvalidCoordinate(dest));
                }
                if !cells.contains(&dest) {
                    return Err(RuleError::violation(self.ability(), "push destination not allowed"));
                }
            }
            // Without a destination the push goes straight back
            None => {
                if !straight_behind(source, target).is_some_and(|h| cells.contains(&h)) {
                    return Err(RuleError::violation(
                        self.ability(),
                        "straight push is blocked, a side destination is required",
                    ));
                }
            }
        }
        Ok(())
    }

    fn apply(&self, source: &Piece, usage: &AbilityUse, board: &mut Board) -> Vec<PieceId> {
        let Some(target) = usage.target.and_then(|id| board.piece(id).copied()) else {
            return Vec::new();
        };
        let Some(push_to) = usage.destination.or_else(|| straight_behind(source, &target)) else {
            return Vec::new();
        };
        let advance_to = match source.pos.direction_to(target.pos) {
            Some(dir) if source.pos.distance_to(target.pos) == 2 => source.pos.neighbor(dir),
            _ => target.pos,
        };
        board.set_position(target.id, push_to);
        board.set_position(source.id, advance_to);
        vec![source.id, target.id]
    }

    fn candidates(&self, source: &Piece, board: &Board) -> Vec<AbilityUse> {
        push_targets(source, board)
            .into_iter()
            .flat_map(|t| {
                push_cells(source, t, board)
                    .into_iter()
                    .map(move |cell| AbilityUse::on(t.id).with_destination(cell))
            })
            .collect()
    }
}

// ============================================================================
// MANIPULATOR
// ============================================================================

/// Nudge a visible, non-adjacent enemy by one cell
pub struct Shift;

impl ActionStrategy for Shift {
    fn ability(&self) -> AbilityId {
        AbilityId::ManipulatorMove
    }

    fn validate(&self, source: &Piece, usage: &AbilityUse, board: &Board) -> Result<()> {
        let target = require_target(self.ability(), usage, board)?;
        require_enemy(self.ability(), source, target)?;
        require_visible(self.ability(), source, target, board)?;
        let dest = require_destination(self.ability(), usage)?;
        if dest.distance_to(target.pos) != 1 || board.is_occupied(dest) {
            return Err(RuleError::violation(
                self.ability(),
                "target may only be moved to an adjacent empty cell",
            ));
        }
        Ok(())
    }

    fn apply(&self, _source: &Piece, usage: &AbilityUse, board: &mut Board) -> Vec<PieceId> {
        match (usage.target, usage.destination) {
            (Some(id), Some(dest)) => {
                board.set_position(id, dest);
                vec![id]
            }
            _ => Vec::new(),
        }
    }

    fn candidates(&self, source: &Piece, board: &Board) -> Vec<AbilityUse> {
        visible_targets(source, board)
            .into_iter()
            .filter(|t| t.is_enemy_of(source))
            .flat_map(|t| {
                t.pos
                    .valid_neighbors()
                    .filter(|&n| !board.is_occupied(n))
                    .map(move |n| AbilityUse::on(t.id).with_destination(n))
            })
            .collect()
    }
}
