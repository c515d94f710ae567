//! One-ply risk simulation
//!
//! Estimates how exposed a player's units are to the opponent's next turn.
//! Scores are non-negative; the AI subtracts them.

use crate::abilities::movement::{acrobat_landings, charge_landings, visible_targets};
use crate::board::{opposite, Hex};
use crate::engine::legal_moves;
use crate::eval::{Heuristics, WIN_VALUE};
use crate::game::{Board, Difficulty};
use crate::pieces::{CharacterId, Piece, Player};
use crate::victory::CAPTURE_THRESHOLD;

/// Cumulative risk past which the position counts as lost
pub const LETHAL_THRESHOLD: f32 = 60.0;

/// Risk reported once the threshold is crossed
pub const LETHAL_RISK: f32 = WIN_VALUE / 10.0;

/// Risk of `player`'s position at the given difficulty
pub fn risk(board: &Board, player: Player, difficulty: Difficulty, heuristics: &Heuristics) -> f32 {
    match difficulty {
        Difficulty::Easy => simple_risk(board, player, heuristics),
        Difficulty::Hard => deep_risk(board, player, heuristics),
    }
}

// ============================================================================
// SIMPLE RISK
// ============================================================================

/// How strongly `enemy` threatens `target` next turn
pub fn threat(enemy: &Piece, target: &Piece, board: &Board, heuristics: &Heuristics) -> f32 {
    let dist = enemy.pos.distance_to(target.pos);
    let aligned = enemy.pos.is_aligned(target.pos);
    let touches = |cells: Vec<Hex>| cells.into_iter().any(|h| h.distance_to(target.pos) == 1);

    match enemy.character {
        CharacterId::Cub => 0.0,
        CharacterId::Assassin if dist == 1 => 2.0,
        CharacterId::Assassin if dist == 2 => 1.0,
        _ if dist == 1 => 1.0,
        CharacterId::Archer if dist == 2 && aligned => 1.0,
        CharacterId::Cavalry if (2..=3).contains(&dist) && aligned && touches(charge_landings(enemy, board)) => 1.0,
        CharacterId::Acrobat if dist <= 4 && touches(acrobat_landings(enemy, board)) => 1.0,
        CharacterId::Grappler | CharacterId::Illusionist | CharacterId::Manipulator
            if (2..=3).contains(&dist) && aligned =>
        {
            heuristics.control_penalty
        }
        _ => 0.0,
    }
}

/// Role-weighted sum of every enemy's threat to every owned unit
pub fn simple_risk(board: &Board, player: Player, heuristics: &Heuristics) -> f32 {
    let enemies: Vec<&Piece> = board.owned_by(player.opponent()).collect();
    board
        .owned_by(player)
        .map(|own| {
            let weight = if own.is_leader() {
                heuristics.leader_risk_weight
            } else {
                heuristics.unit_risk_weight
            };
            let total: f32 = enemies.iter().map(|e| threat(e, own, board, heuristics)).sum();
            weight * total
        })
        .sum()
}

// ============================================================================
// COMBINATION RISK
// ============================================================================

/// Capture points the enemy could hold against `leader` after one more turn,
/// assuming every enemy unit uses its action to close in
pub fn predicted_capture_points(board: &Board, leader: &Piece) -> u8 {
    board
        .enemies_of(leader)
        .filter(|e| e.def().contributes_to_capture)
        .map(|enemy| {
            let full = if enemy.is(CharacterId::Assassin) { 2 } else { 1 };
            if enemy.pos.distance_to(leader.pos) == 1 {
                return full;
            }
            let moves = legal_moves(enemy, board);
            if moves.iter().any(|h| h.distance_to(leader.pos) == 1) {
                full
            } else if enemy.is(CharacterId::Archer)
                && moves
                    .iter()
                    .chain(std::iter::once(&enemy.pos))
                    .any(|h| h.distance_to(leader.pos) == 2 && h.is_aligned(leader.pos))
            {
                1
            } else {
                0
            }
        })
        .sum()
}

/// Capture points other enemies already hold around `cell`
fn support_at(board: &Board, leader: &Piece, cell: Hex, exclude: &Piece) -> u8 {
    board
        .enemies_of(leader)
        .filter(|e| e.id != exclude.id && e.def().contributes_to_capture)
        .filter(|e| e.pos.distance_to(cell) == 1)
        .map(|e| if e.is(CharacterId::Assassin) { 2 } else { 1 })
        .sum()
}

/// Swap or hook that drags the Leader into enemy contact
fn displacement_combos(board: &Board, leader: &Piece) -> usize {
    board
        .enemies_of(leader)
        .filter(|e| !board.is_jailed(e))
        .filter(|e| visible_targets(e, board).iter().any(|t| t.id == leader.id))
        .filter(|e| match e.character {
            // Leader lands on the Illusionist's cell
            CharacterId::Illusionist => support_at(board, leader, e.pos, e) >= 1,
            // Leader is pulled next to the Grappler, which counts itself
            CharacterId::Grappler => match e.pos.direction_to(leader.pos) {
                Some(dir) => {
                    let landing = e.pos.neighbor(dir);
                    support_at(board, leader, landing, e) + 1 >= CAPTURE_THRESHOLD
                }
                None => false,
            },
            _ => false,
        })
        .count()
}

/// Enemies bracketing the Leader from both ends of one axis within two cells
fn sandwiches(board: &Board, leader: &Piece) -> usize {
    let close_enemy = |dir: u8| {
        board
            .first_along(leader.pos, dir)
            .map(|p| p.is_enemy_of(leader) && p.def().contributes_to_capture && p.pos.distance_to(leader.pos) <= 2)
            .unwrap_or(false)
    };
    (0..3u8)
        .filter(|&dir| close_enemy(dir) && close_enemy(opposite(dir)))
        .count()
}

/// Simple risk plus combination threats on the Leader, saturating at
/// [`LETHAL_RISK`] once [`LETHAL_THRESHOLD`] is crossed
pub fn deep_risk(board: &Board, player: Player, heuristics: &Heuristics) -> f32 {
    let mut total = simple_risk(board, player, heuristics);

    if let Some(leader) = board.leader_of(player) {
        if predicted_capture_points(board, leader) >= CAPTURE_THRESHOLD {
            total += heuristics.combo_penalty;
        }
        total += heuristics.combo_penalty * displacement_combos(board, leader) as f32;
        total += heuristics.sandwich_penalty * sandwiches(board, leader) as f32;
    }

    if total >= LETHAL_THRESHOLD {
        LETHAL_RISK
    } else {
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{GameId, PieceId};

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
    fn test_quiet_board_has_no_risk() {
        let b = board(vec![]);
        let h = Heuristics::default();
        assert_eq!(simple_risk(&b, Player::First, &h), 0.0);
        assert_eq!(deep_risk(&b, Player::First, &h), 0.0);
    }

    #[test]
    fn test_leader_weighted_highest() {
        let h = Heuristics::default();
        let near_leader = board(vec![piece(3, CharacterId::Cavalry, Player::Second, 0, 2)]);
        let near_unit = board(vec![
            piece(3, CharacterId::Cavalry, Player::Second, 2, -1),
            piece(4, CharacterId::Jailer, Player::First, 2, 0),
        ]);
        assert_eq!(simple_risk(&near_leader, Player::First, &h), h.leader_risk_weight);
        assert_eq!(simple_risk(&near_unit, Player::First, &h), h.unit_risk_weight);
    }

    #[test]
    fn test_threat_ranges() {
        let h = Heuristics::default();
        let b = board(vec![]);
        let target = piece(9, CharacterId::Leader, Player::First, 0, 0);

        let assassin = piece(3, CharacterId::Assassin, Player::Second, 0, -1);
        assert_eq!(threat(&assassin, &target, &b, &h), 2.0);
        let archer = piece(4, CharacterId::Archer, Player::Second, 0, -2);
        assert_eq!(threat(&archer, &target, &b, &h), 1.0);
        let skew_archer = piece(5, CharacterId::Archer, Player::Second, 1, -2);
        assert_eq!(threat(&skew_archer, &target, &b, &h), 0.0);
        let grappler = piece(6, CharacterId::Grappler, Player::Second, 3, 0);
        assert_eq!(threat(&grappler, &target, &b, &h), h.control_penalty);
        let cub = piece(7, CharacterId::Cub, Player::Second, 1, 0);
        assert_eq!(threat(&cub, &target, &b, &h), 0.0);
    }

    #[test]
    fn test_cavalry_charge_threat() {
        let h = Heuristics::default();
        let target = piece(9, CharacterId::Leader, Player::First, 0, 0);
        let b = board(vec![target]);
        let open = piece(3, CharacterId::Cavalry, Player::Second, 0, -3);
        let b = {
            let mut pieces = b.into_pieces();
            pieces.retain(|p| p.id != PieceId(2));
            pieces.push(open);
            Board::new(pieces)
        };
        // Charge from (0,-3) lands on (0,-1), next to the target
        assert_eq!(threat(&open, &target, &b, &h), 1.0);
    }

    #[test]
    fn test_predicted_capture_points() {
        let b = board(vec![
            piece(3, CharacterId::Cavalry, Player::Second, 0, 1),
            piece(4, CharacterId::Jailer, Player::Second, 2, 1),
        ]);
        let leader = *b.leader_of(Player::First).unwrap();
        assert_eq!(predicted_capture_points(&b, &leader), 2);
    }

    #[test]
    fn test_sandwich_detected() {
        let b = Board::new(vec![
            piece(1, CharacterId::Leader, Player::First, 0, 1),
            piece(2, CharacterId::Leader, Player::Second, 0, -3),
            piece(3, CharacterId::Cavalry, Player::Second, 0, -1),
            piece(4, CharacterId::Jailer, Player::Second, 0, 3),
        ]);
        let leader = *b.leader_of(Player::First).unwrap();
        assert_eq!(sandwiches(&b, &leader), 1);

        // A Leader on the rim has no open axis through it
        let edge = board(vec![
            piece(3, CharacterId::Cavalry, Player::Second, -2, 3),
            piece(4, CharacterId::Jailer, Player::Second, 2, 1),
        ]);
        let leader = *edge.leader_of(Player::First).unwrap();
        assert_eq!(sandwiches(&edge, &leader), 0);
    }

    #[test]
    fn test_illusionist_swap_combo() {
        let b = board(vec![
            piece(3, CharacterId::Illusionist, Player::Second, 0, 0),
            piece(4, CharacterId::Jailer, Player::Second, 1, -1),
        ]);
        let leader = *b.leader_of(Player::First).unwrap();
        assert_eq!(displacement_combos(&b, &leader), 1);
    }

    #[test]
    fn test_deep_risk_saturates() {
        let h = Heuristics::default();
        let b = board(vec![
            piece(3, CharacterId::Assassin, Player::Second, 0, 1),
            piece(4, CharacterId::Jailer, Player::Second, 2, 1),
            piece(5, CharacterId::Archer, Player::Second, -2, 3),
        ]);
        assert!(simple_risk(&b, Player::First, &h) < LETHAL_THRESHOLD);
        assert_eq!(deep_risk(&b, Player::First, &h), LETHAL_RISK);
    }
}
