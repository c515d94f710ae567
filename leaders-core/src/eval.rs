//! Position evaluation for the AI: material and positional terms

use crate::game::Board;
use crate::pieces::{PieceId, Player};
use crate::victory::check_victory;
use serde::{Deserialize, Serialize};

/// Score of a won position (effectively infinite)
pub const WIN_VALUE: f32 = 100000.0;

/// An action that lands a blow on the enemy Leader on its own
pub const LEADER_STRIKE: f32 = 1000.0;

/// Heuristic weights for candidate scoring
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Flat bonus per enemy unit removed
    pub kill_bonus: f32,
    /// Penalty per cell between a unit and the enemy Leader
    pub approach_weight: f32,
    /// Penalty per cell from the board center
    pub center_weight: f32,
    /// Bonus per unit standing next to its own Leader
    pub bodyguard_weight: f32,
    /// Bonus per unit covering the Leader's second ring
    pub lane_weight: f32,
    /// Threat multiplier for the Leader
    pub leader_risk_weight: f32,
    /// Threat multiplier for every other unit
    pub unit_risk_weight: f32,
    /// Threat from displacement abilities at range
    pub control_penalty: f32,
    /// Combination threats on the Leader (swap or hook into a capture)
    pub combo_penalty: f32,
    /// Two enemies bracketing the Leader on one axis
    pub sandwich_penalty: f32,
    /// Half-width of the uniform noise added on Easy
    pub jitter: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            kill_bonus: 50.0,
            approach_weight: 3.0,
            center_weight: 1.0,
            bodyguard_weight: 4.0,
            lane_weight: 1.5,
            leader_risk_weight: 12.0,
            unit_risk_weight: 1.0,
            control_penalty: 0.5,
            combo_penalty: 40.0,
            sandwich_penalty: 25.0,
            jitter: 2.0,
        }
    }
}

/// Material gained by `player` going from `before` to `after`.
///
/// `mover` is the acting piece and `target` the unit its ability acted on.
pub fn material(
    before: &Board,
    after: &Board,
    player: Player,
    mover: PieceId,
    target: Option<PieceId>,
    heuristics: &Heuristics,
) -> f32 {
    let victory = check_victory(after);
    match victory.winner {
        Some(winner) if winner == player => return WIN_VALUE,
        Some(_) => return -WIN_VALUE,
        None => {}
    }

    let opponent = player.opponent();
    let mut score = 0.0f32;

    // Units lost on either side
    let enemies_lost = before.owned_by(opponent).count() as f32 - after.owned_by(opponent).count() as f32;
    let own_lost = before.owned_by(player).count() as f32 - after.owned_by(player).count() as f32;
    score += heuristics.kill_bonus * (enemies_lost - own_lost);

    let Some(enemy_leader) = before.leader_of(opponent) else {
        return score;
    };
    if target == Some(enemy_leader.id) {
        return score + LEADER_STRIKE;
    }

    // Fresh contact with the enemy Leader
    let leader_after = after.leader_of(opponent).map(|l| l.pos);
    if let (Some(was), Some(now), Some(leader_pos)) = (before.piece(mover), after.piece(mover), leader_after) {
        let strikes = !now.is_leader() && now.def().contributes_to_capture;
        if strikes && now.pos.distance_to(leader_pos) == 1 && was.pos.distance_to(enemy_leader.pos) != 1 {
            score += LEADER_STRIKE;
        }
    }

    score
}

/// Positional score of `player`'s units on `board`
pub fn positional(board: &Board, player: Player, heuristics: &Heuristics) -> f32 {
    let own_leader = board.leader_of(player).map(|l| l.pos);
    let enemy_leader = board.leader_of(player.opponent()).map(|l| l.pos);

    let mut score = 0.0f32;
    for piece in board.owned_by(player).filter(|p| !p.is_leader()) {
        score -= heuristics.center_weight * piece.pos.distance_to_center() as f32;

        if let Some(target) = enemy_leader {
            if piece.def().contributes_to_capture {
                score -= heuristics.approach_weight * piece.pos.distance_to(target) as f32;
            }
        }

        if let Some(home) = own_leader {
            match piece.pos.distance_to(home) {
                1 => score += heuristics.bodyguard_weight,
                2 => score += heuristics.lane_weight,
                _ => {}
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Hex;
    use crate::pieces::{CharacterId, GameId, Piece};

    fn piece(id: u32, character: CharacterId, owner: Player, q: i8, r: i8) -> Piece {
        Piece::new(PieceId(id), GameId(1), character, owner, Hex::new(q, r))
    }

    fn board(extra: Vec<Piece>) -> Board {
        let mut pieces = vec![
            piece(1, CharacterId::Leader, Player::First, 0, 3),
            piece(2, CharacterId::Leader, Player::Second, 0, -3),
        ];
        pieces.extend(extra);
        Board::new(pieces)
    }

    #[test]
    fn test_win_and_loss() {
        let before = board(vec![piece(3, CharacterId::Assassin, Player::Second, 0, -1)]);
        let after = board(vec![piece(3, CharacterId::Assassin, Player::Second, 0, 2)]);
        let h = Heuristics::default();
        assert_eq!(material(&before, &after, Player::Second, PieceId(3), None, &h), WIN_VALUE);
        assert_eq!(material(&before, &after, Player::First, PieceId(3), None, &h), -WIN_VALUE);
    }

    #[test]
    fn test_leader_strike_on_contact() {
        let before = board(vec![piece(3, CharacterId::Cavalry, Player::Second, 0, 0)]);
        let after = board(vec![piece(3, CharacterId::Cavalry, Player::Second, 0, 2)]);
        let h = Heuristics::default();
        assert_eq!(material(&before, &after, Player::Second, PieceId(3), None, &h), LEADER_STRIKE);

        // Already adjacent: no fresh contact
        let same = board(vec![piece(3, CharacterId::Cavalry, Player::Second, 1, 2)]);
        assert_eq!(material(&same, &after, Player::Second, PieceId(3), None, &h), 0.0);
    }

    #[test]
    fn test_targeting_enemy_leader() {
        let b = board(vec![piece(3, CharacterId::Illusionist, Player::Second, 0, 0)]);
        let h = Heuristics::default();
        assert_eq!(material(&b, &b, Player::Second, PieceId(3), Some(PieceId(1)), &h), LEADER_STRIKE);
        assert_eq!(material(&b, &b, Player::Second, PieceId(3), Some(PieceId(2)), &h), 0.0);
    }

    #[test]
    fn test_cub_contact_is_not_a_strike() {
        let before = board(vec![piece(3, CharacterId::Cub, Player::Second, 0, 0)]);
        let after = board(vec![piece(3, CharacterId::Cub, Player::Second, 0, 2)]);
        assert_eq!(material(&before, &after, Player::Second, PieceId(3), None, &Heuristics::default()), 0.0);
    }

    #[test]
    fn test_kill_bonus() {
        let before = board(vec![piece(3, CharacterId::Archer, Player::First, 2, 0)]);
        let after = board(vec![]);
        let h = Heuristics::default();
        assert_eq!(material(&before, &after, Player::Second, PieceId(2), None, &h), h.kill_bonus);
    }

    #[test]
    fn test_positional_prefers_closer_and_guarding() {
        let h = Heuristics::default();
        let far = board(vec![piece(3, CharacterId::Cavalry, Player::Second, 0, -2)]);
        let near = board(vec![piece(3, CharacterId::Cavalry, Player::Second, 0, 0)]);
        assert!(positional(&near, Player::Second, &h) > positional(&far, Player::Second, &h));

        let guard = board(vec![piece(3, CharacterId::Protector, Player::First, 0, 2)]);
        let stray = board(vec![piece(3, CharacterId::Protector, Player::First, 3, -1)]);
        assert!(positional(&guard, Player::First, &h) > positional(&stray, Player::First, &h));
    }
}
