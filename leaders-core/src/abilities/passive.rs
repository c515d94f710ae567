//! Passive strategies

use super::PassiveStrategy;
use crate::pieces::Piece;

/// Enemies next to the Jailer cannot use active abilities
pub struct JailerBlock;

impl PassiveStrategy for JailerBlock {
    fn blocks(&self, holder: &Piece, enemy: &Piece) -> bool {
        holder.is_enemy_of(enemy) && holder.pos.distance_to(enemy.pos) == 1
    }
}

/// Shields itself and adjacent allies from enemy abilities
pub struct ProtectorShield;

impl PassiveStrategy for ProtectorShield {
    fn protects(&self, holder: &Piece, target: &Piece) -> bool {
        holder.id == target.id
            || (holder.owner == target.owner && holder.pos.distance_to(target.pos) == 1)
    }
}

/// Counts toward capture from two cells away in a straight line
pub struct ArcherAssist;

impl PassiveStrategy for ArcherAssist {
    fn assists_capture(&self, holder: &Piece, leader: &Piece) -> bool {
        holder.pos.distance_to(leader.pos) == 2 && holder.pos.is_aligned(leader.pos)
    }
}

/// Adjacent Assassin is worth a full capture on its own
pub struct AssassinStrike;

impl PassiveStrategy for AssassinStrike {
    fn captures_alone(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;
    use crate::pieces::{CharacterId, GameId, PieceId, Player};

    fn piece(id: u32, character: CharacterId, owner: Player, q: i8, r: i8) -> Piece {
        Piece::new(PieceId(id), GameId(1), character, owner, Hex::new(q, r))
    }

    #[test]
    fn test_jailer_blocks_adjacent_enemies_only() {
        let jailer = piece(1, CharacterId::Jailer, Player::First, 0, 0);
        let near = piece(2, CharacterId::Grappler, Player::Second, 1, 0);
        let far = piece(3, CharacterId::Grappler, Player::Second, 2, 0);
        let ally = piece(4, CharacterId::Grappler, Player::First, -1, 0);
        assert!(JailerBlock.blocks(&jailer, &near));
        assert!(!JailerBlock.blocks(&jailer, &far));
        assert!(!JailerBlock.blocks(&jailer, &ally));
    }

    #[test]
    fn test_archer_needs_line_at_two() {
        let leader = piece(1, CharacterId::Leader, Player::First, 0, 0);
        let aligned = piece(2, CharacterId::Archer, Player::Second, 0, -2);
        let offline = piece(3, CharacterId::Archer, Player::Second, 1, -2);
        let adjacent = piece(4, CharacterId::Archer, Player::Second, 0, -1);
        assert!(ArcherAssist.assists_capture(&aligned, &leader));
        assert!(!ArcherAssist.assists_capture(&offline, &leader));
        assert!(!ArcherAssist.assists_capture(&adjacent, &leader));
    }

    #[test]
    fn test_shield() {
        let protector = piece(1, CharacterId::Protector, Player::First, 0, 0);
        let ally = piece(2, CharacterId::Cavalry, Player::First, 0, 1);
        assert!(ProtectorShield.protects(&protector, &protector));
        assert!(ProtectorShield.protects(&protector, &ally));
        assert!(AssassinStrike.captures_alone());
        assert!(!ProtectorShield.captures_alone());
    }
}
