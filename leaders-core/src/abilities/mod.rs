//! Ability registry
//!
//! Three independent strategy tables keyed by [`AbilityId`]:
//! - movement extensions: extra cells a piece can reach or target
//! - actions: validated effects of an active ability
//! - passives: predicates other rules consult (block, shield, capture help)
//!
//! A missing entry means "no special behavior", never an error.

pub mod actions;
pub mod movement;
pub mod passive;

use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::Hex;
use crate::error::Result;
use crate::game::Board;
use crate::pieces::{AbilityId, Piece, PieceId};

// ============================================================================
// STRATEGY TRAITS
// ============================================================================

/// A cell contributed by a movement extension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reach {
    /// Empty cell the piece may relocate to
    Move(Hex),
    /// Cell of a unit the piece's ability can act upon (hint only)
    Target(Hex),
}

/// Parameters of one ability invocation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityUse {
    pub target: Option<PieceId>,
    pub destination: Option<Hex>,
    pub secondary_destination: Option<Hex>,
}

impl AbilityUse {
    pub fn to(destination: Hex) -> Self {
        Self {
            destination: Some(destination),
            ..Self::default()
        }
    }

    pub fn on(target: PieceId) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn with_destination(mut self, destination: Hex) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn then(mut self, secondary: Hex) -> Self {
        self.secondary_destination = Some(secondary);
        self
    }
}

pub trait MovementExtension: Send + Sync {
    fn reach(&self, piece: &Piece, board: &Board) -> Vec<Reach>;
}

pub trait ActionStrategy: Send + Sync {
    fn ability(&self) -> AbilityId;

    /// Geometric legality of one invocation
    fn validate(&self, source: &Piece, usage: &AbilityUse, board: &Board) -> Result<()>;

    /// Mutates positions; only called after `validate` succeeded.
    /// Returns the pieces whose position changed.
    fn apply(&self, source: &Piece, usage: &AbilityUse, board: &mut Board) -> Vec<PieceId>;

    /// Raw invocations worth trying from this position
    fn candidates(&self, source: &Piece, board: &Board) -> Vec<AbilityUse>;

    /// Invocations that pass validation
    fn options(&self, source: &Piece, board: &Board) -> Vec<AbilityUse> {
        self.candidates(source, board)
            .into_iter()
            .filter(|usage| self.validate(source, usage, board).is_ok())
            .collect()
    }

    fn execute(&self, source: &Piece, usage: &AbilityUse, board: &mut Board) -> Result<Vec<PieceId>> {
        self.validate(source, usage, board)?;
        Ok(self.apply(source, usage, board))
    }
}

pub trait PassiveStrategy: Send + Sync {
    /// Holder vetoes `enemy`'s active abilities
    fn blocks(&self, _holder: &Piece, _enemy: &Piece) -> bool {
        false
    }

    /// Holder shields `target` from enemy abilities
    fn protects(&self, _holder: &Piece, _target: &Piece) -> bool {
        false
    }

    /// Holder adds a capture point against `leader` without being adjacent
    fn assists_capture(&self, _holder: &Piece, _leader: &Piece) -> bool {
        false
    }

    /// Holder's adjacency alone is enough to capture
    fn captures_alone(&self) -> bool {
        false
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

pub struct AbilityRegistry {
    movement: FxHashMap<AbilityId, Box<dyn MovementExtension>>,
    actions: FxHashMap<AbilityId, Box<dyn ActionStrategy>>,
    passives: FxHashMap<AbilityId, Box<dyn PassiveStrategy>>,
}

impl AbilityRegistry {
    pub fn empty() -> Self {
        Self {
            movement: FxHashMap::default(),
            actions: FxHashMap::default(),
            passives: FxHashMap::default(),
        }
    }

    /// Registry holding every built-in strategy
    pub fn standard() -> Self {
        let mut reg = Self::empty();

        reg.register_movement(AbilityId::LeaderBoost, movement::LeaderBoost);
        reg.register_movement(AbilityId::AcrobatJump, movement::AcrobatJump);
        reg.register_movement(AbilityId::CavalryCharge, movement::CavalryCharge);
        reg.register_movement(AbilityId::GrapplerHook, movement::GrapplerHook);
        reg.register_movement(AbilityId::IllusionistSwap, movement::IllusionistSwap);
        reg.register_movement(AbilityId::BrawlerPush, movement::BrawlerPush);
        reg.register_movement(AbilityId::ManipulatorMove, movement::ManipulatorMove);
        reg.register_movement(AbilityId::ProwlerStealth, movement::ProwlerStealth);
        reg.register_movement(AbilityId::RoyalGuardStep, movement::RoyalGuardStep);

        reg.register_action(actions::Relocate::new(AbilityId::LeaderBoost));
        reg.register_action(actions::Relocate::new(AbilityId::CavalryCharge));
        reg.register_action(actions::Relocate::new(AbilityId::ProwlerStealth));
        reg.register_action(actions::Relocate::new(AbilityId::RoyalGuardStep));
        reg.register_action(actions::Jump);
        reg.register_action(actions::Hook);
        reg.register_action(actions::Swap);
        reg.register_action(actions::Push);
        reg.register_action(actions::Shift);

        reg.register_passive(AbilityId::JailerBlock, passive::JailerBlock);
        reg.register_passive(AbilityId::ProtectorShield, passive::ProtectorShield);
        reg.register_passive(AbilityId::ArcherAssist, passive::ArcherAssist);
        reg.register_passive(AbilityId::AssassinStrike, passive::AssassinStrike);

        reg
    }

    pub fn register_movement<M: MovementExtension + 'static>(&mut self, id: AbilityId, ext: M) {
        self.movement.insert(id, Box::new(ext));
    }

    pub fn register_action<S: ActionStrategy + 'static>(&mut self, strategy: S) {
        self.actions.insert(strategy.ability(), Box::new(strategy));
    }

    pub fn register_passive<P: PassiveStrategy + 'static>(&mut self, id: AbilityId, passive: P) {
        self.passives.insert(id, Box::new(passive));
    }

    pub fn movement(&self, id: AbilityId) -> Option<&dyn MovementExtension> {
        self.movement.get(&id).map(|b| b.as_ref())
    }

    pub fn action(&self, id: AbilityId) -> Option<&dyn ActionStrategy> {
        self.actions.get(&id).map(|b| b.as_ref())
    }

    pub fn passive(&self, id: AbilityId) -> Option<&dyn PassiveStrategy> {
        self.passives.get(&id).map(|b| b.as_ref())
    }

    /// Every movement-extension result for the piece's abilities
    pub fn extra_reach(&self, piece: &Piece, board: &Board) -> Vec<Reach> {
        let mut out: Vec<Reach> = Vec::new();
        for &ability in piece.def().abilities {
            if let Some(ext) = self.movement(ability) {
                for reach in ext.reach(piece, board) {
                    if !out.contains(&reach) {
                        out.push(reach);
                    }
                }
            }
        }
        out
    }

    fn passives_of<'a>(&'a self, piece: &'a Piece) -> impl Iterator<Item = &'a dyn PassiveStrategy> + 'a {
        piece.def().abilities.iter().filter_map(move |&a| self.passive(a))
    }

    pub fn blocks(&self, holder: &Piece, enemy: &Piece) -> bool {
        self.passives_of(holder).any(|p| p.blocks(holder, enemy))
    }

    pub fn protects(&self, holder: &Piece, target: &Piece) -> bool {
        self.passives_of(holder).any(|p| p.protects(holder, target))
    }

    pub fn assists_capture(&self, holder: &Piece, leader: &Piece) -> bool {
        self.passives_of(holder).any(|p| p.assists_capture(holder, leader))
    }

    pub fn captures_alone(&self, holder: &Piece) -> bool {
        self.passives_of(holder).any(|p| p.captures_alone())
    }
}

/// Process-wide registry, built on first use
pub fn registry() -> &'static AbilityRegistry {
    static REGISTRY: OnceLock<AbilityRegistry> = OnceLock::new();
    REGISTRY.get_or_init(AbilityRegistry::standard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{CharacterId, CHARACTERS};

    #[test]
    fn test_every_active_ability_has_an_action() {
        let reg = registry();
        for ability in [
            AbilityId::AcrobatJump,
            AbilityId::CavalryCharge,
            AbilityId::GrapplerHook,
            AbilityId::IllusionistSwap,
            AbilityId::BrawlerPush,
            AbilityId::ManipulatorMove,
            AbilityId::ProwlerStealth,
            AbilityId::RoyalGuardStep,
            AbilityId::LeaderBoost,
        ] {
            assert!(reg.action(ability).is_some(), "{:?}", ability);
            assert!(reg.movement(ability).is_some(), "{:?}", ability);
            assert!(reg.passive(ability).is_none(), "{:?}", ability);
        }
    }

    #[test]
    fn test_missing_entry_is_not_an_error() {
        let reg = registry();
        assert!(reg.action(AbilityId::VizierCounsel).is_none());
        assert!(reg.movement(AbilityId::JailerBlock).is_none());
        assert!(reg.passive(AbilityId::VizierCounsel).is_none());
    }

    #[test]
    fn test_abilities_belong_to_some_character() {
        let reg = registry();
        for def in &CHARACTERS {
            for &ability in def.abilities {
                let known = reg.movement(ability).is_some()
                    || reg.action(ability).is_some()
                    || reg.passive(ability).is_some()
                    || ability == AbilityId::VizierCounsel;
                assert!(known, "{:?} of {:?} has no strategy", ability, def.id);
            }
        }
        assert!(CharacterId::Cub.def().abilities.is_empty());
    }
}
