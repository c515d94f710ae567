//! Recruitment: placing new units on a player's home edge
//!
//! The card deck and river live outside the engine. A [`Recruiter`] decides
//! what to bring in and where; [`GameState::place_recruit`] enforces the
//! placement rules.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::board::{all_cells, Hex, BOARD_RADIUS};
use crate::error::{Result, RuleError};
use crate::game::GameState;
use crate::pieces::{CharacterId, Piece, Player};

/// Non-Leader units a player may field; Cubs ride along for free
pub const MAX_UNITS: usize = 4;

/// Recruitments allowed per turn
pub const RECRUITS_PER_TURN: u8 = 1;

/// Rim cells on the player's own half of the board
pub fn home_cells(player: Player) -> impl Iterator<Item = Hex> {
    let sign = player.home_sign();
    all_cells().filter(move |h| h.distance_to_center() == BOARD_RADIUS && h.r * sign > 0)
}

pub fn is_home_cell(player: Player, hex: Hex) -> bool {
    hex.is_valid() && hex.distance_to_center() == BOARD_RADIUS && hex.r * player.home_sign() > 0
}

/// Source of new units for a player
pub trait Recruiter {
    /// Recruit for `player`, returning the pieces placed
    fn recruit(&mut self, state: &mut GameState, player: Player) -> Result<Vec<Piece>>;
}

impl GameState {
    /// Units counted against [`MAX_UNITS`]
    pub fn unit_count(&self, player: Player) -> usize {
        self.board
            .owned_by(player)
            .filter(|p| !p.is_leader() && !p.is(CharacterId::Cub))
            .count()
    }

    /// Whether `player` may recruit at all right now
    pub fn can_recruit(&self, player: Player) -> bool {
        !self.is_over()
            && self.current_player() == player
            && self.turn.recruitment_count < RECRUITS_PER_TURN
            && self.unit_count(player) < MAX_UNITS
    }

    /// Place a recruited character at `hex`.
    ///
    /// An Old Bear brings its Cub onto the first free neighbor; both count as
    /// a single recruitment.
    pub fn place_recruit(&mut self, player: Player, character: CharacterId, hex: Hex) -> Result<Vec<Piece>> {
        if self.is_over() {
            return Err(RuleError::GameOver);
        }
        let current = self.current_player();
        if player != current {
            return Err(RuleError::WrongTurn { current, owner: player });
        }
        if !hex.is_valid() {
            return Err(RuleError::InvalidCoordinate(hex));
        }
        if !CharacterId::recruitable().any(|c| c == character) {
            return Err(RuleError::Recruitment("character cannot be recruited"));
        }
        if self.turn.recruitment_count >= RECRUITS_PER_TURN {
            return Err(RuleError::Recruitment("already recruited this turn"));
        }
        if self.unit_count(player) >= MAX_UNITS {
            return Err(RuleError::Recruitment("unit limit reached"));
        }
        if !is_home_cell(player, hex) {
            return Err(RuleError::Recruitment("cell is not on the home edge"));
        }
        if self.board.is_occupied(hex) {
            return Err(RuleError::Recruitment("cell is occupied"));
        }

        let cub_cell = if character == CharacterId::OldBear {
            let cell = hex
                .valid_neighbors()
                .find(|&n| !self.board.is_occupied(n))
                .ok_or(RuleError::Recruitment("no room for the cub"))?;
            Some(cell)
        } else {
            None
        };

        let mut placed = Vec::with_capacity(2);
        let piece = Piece::new(self.board.next_piece_id(), self.id, character, player, hex);
        self.board.insert(piece);
        placed.push(piece);
        if let Some(cell) = cub_cell {
            let cub = Piece::new(self.board.next_piece_id(), self.id, CharacterId::Cub, player, cell);
            self.board.insert(cub);
            placed.push(cub);
        }
        self.turn.recruitment_count += 1;

        tracing::debug!("{:?} recruited {:?} at ({}, {})", player, character, hex.q, hex.r);
        Ok(placed)
    }
}

/// Per-player queues of characters, drawn front first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserve {
    queues: [VecDeque<CharacterId>; 2],
}

impl Reserve {
    pub fn new(first: Vec<CharacterId>, second: Vec<CharacterId>) -> Self {
        Self {
            queues: [first.into(), second.into()],
        }
    }

    /// Same line-up for both players
    pub fn mirrored(characters: Vec<CharacterId>) -> Self {
        Self::new(characters.clone(), characters)
    }

    pub fn remaining(&self, player: Player) -> usize {
        self.queues[player.index()].len()
    }

    pub fn peek(&self, player: Player) -> Option<CharacterId> {
        self.queues[player.index()].front().copied()
    }
}

impl Recruiter for Reserve {
    fn recruit(&mut self, state: &mut GameState, player: Player) -> Result<Vec<Piece>> {
        let character = self
            .peek(player)
            .ok_or(RuleError::Recruitment("reserve is empty"))?;
        let mut last_err = RuleError::Recruitment("no free home cell");
        let free: Vec<Hex> = home_cells(player)
            .filter(|&h| !state.board.is_occupied(h))
            .collect();
        for cell in free {
            match state.place_recruit(player, character, cell) {
                Ok(placed) => {
                    self.queues[player.index()].pop_front();
                    return Ok(placed);
                }
                Err(RuleError::Recruitment("no room for the cub")) => {
                    last_err = RuleError::Recruitment("no room for the cub");
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{GameId, PieceId};

    fn piece(id: u32, character: CharacterId, owner: Player, q: i8, r: i8) -> Piece {
        Piece::new(PieceId(id), GameId(3), character, owner, Hex::new(q, r))
    }

    fn leaders() -> GameState {
        GameState::new(
            GameId(3),
            vec![
                piece(1, CharacterId::Leader, Player::First, 0, 3),
                piece(2, CharacterId::Leader, Player::Second, 0, -3),
            ],
        )
    }

    #[test]
    fn test_home_cells() {
        let first: Vec<Hex> = home_cells(Player::First).collect();
        let second: Vec<Hex> = home_cells(Player::Second).collect();
        assert_eq!(first.len(), 8);
        assert_eq!(second.len(), 8);
        assert!(first.contains(&Hex::new(0, 3)));
        assert!(first.contains(&Hex::new(2, 1)));
        assert!(!first.contains(&Hex::new(3, 0)));
        assert!(second.iter().all(|h| h.r < 0));
        assert!(is_home_cell(Player::Second, Hex::new(1, -3)));
        assert!(!is_home_cell(Player::Second, Hex::new(1, 2)));
    }

    #[test]
    fn test_place_recruit() {
        let mut state = leaders();
        let placed = state.place_recruit(Player::First, CharacterId::Archer, Hex::new(-1, 3)).unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].id, PieceId(3));
        assert!(!placed[0].has_acted);
        assert_eq!(state.turn.recruitment_count, 1);
        assert_eq!(state.unit_count(Player::First), 1);
        assert_eq!(
            state.place_recruit(Player::First, CharacterId::Jailer, Hex::new(-2, 3)),
            Err(RuleError::Recruitment("already recruited this turn"))
        );
    }

    #[test]
    fn test_recruit_rejections() {
        let mut state = leaders();
        assert!(matches!(
            state.place_recruit(Player::Second, CharacterId::Archer, Hex::new(1, -3)),
            Err(RuleError::WrongTurn { .. })
        ));
        assert_eq!(
            state.place_recruit(Player::First, CharacterId::Archer, Hex::new(0, 0)),
            Err(RuleError::Recruitment("cell is not on the home edge"))
        );
        assert_eq!(
            state.place_recruit(Player::First, CharacterId::Archer, Hex::new(0, 3)),
            Err(RuleError::Recruitment("cell is occupied"))
        );
        assert_eq!(
            state.place_recruit(Player::First, CharacterId::Leader, Hex::new(-1, 3)),
            Err(RuleError::Recruitment("character cannot be recruited"))
        );
        assert_eq!(
            state.place_recruit(Player::First, CharacterId::Archer, Hex::new(4, 0)),
            Err(RuleError::InvalidCoordinate(Hex::new(4, 0)))
        );
        assert_eq!(state.turn.recruitment_count, 0);
    }

    #[test]
    fn test_unit_cap_ignores_cubs() {
        let mut state = GameState::new(
            GameId(3),
            vec![
                piece(1, CharacterId::Leader, Player::First, 0, 3),
                piece(2, CharacterId::Leader, Player::Second, 0, -3),
                piece(3, CharacterId::Archer, Player::First, 0, 1),
                piece(4, CharacterId::Jailer, Player::First, 1, 1),
                piece(5, CharacterId::OldBear, Player::First, -1, 1),
                piece(6, CharacterId::Cub, Player::First, -1, 2),
            ],
        );
        assert_eq!(state.unit_count(Player::First), 3);
        assert!(state.can_recruit(Player::First));
        state.place_recruit(Player::First, CharacterId::Cavalry, Hex::new(-3, 3)).unwrap();
        assert_eq!(state.unit_count(Player::First), 4);

        state.end_turn();
        state.end_turn();
        assert!(!state.can_recruit(Player::First));
        assert_eq!(
            state.place_recruit(Player::First, CharacterId::Vizier, Hex::new(-2, 3)),
            Err(RuleError::Recruitment("unit limit reached"))
        );
    }

    #[test]
    fn test_old_bear_brings_cub() {
        let mut state = leaders();
        let placed = state.place_recruit(Player::First, CharacterId::OldBear, Hex::new(-3, 3)).unwrap();
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[1].character, CharacterId::Cub);
        assert_eq!(placed[1].pos.distance_to(placed[0].pos), 1);
        assert_eq!(state.turn.recruitment_count, 1);
        assert_eq!(state.unit_count(Player::First), 1);
        assert!(state.board.is_consistent());
    }

    #[test]
    fn test_reserve_draws_in_order() {
        let mut state = leaders();
        let mut reserve = Reserve::new(vec![CharacterId::Archer, CharacterId::Jailer], vec![CharacterId::Vizier]);
        let placed = reserve.recruit(&mut state, Player::First).unwrap();
        assert_eq!(placed[0].character, CharacterId::Archer);
        assert!(is_home_cell(Player::First, placed[0].pos));
        assert_eq!(reserve.remaining(Player::First), 1);

        // Second recruitment in the same turn is refused and nothing is drawn
        assert!(reserve.recruit(&mut state, Player::First).is_err());
        assert_eq!(reserve.peek(Player::First), Some(CharacterId::Jailer));

        state.end_turn();
        let placed = reserve.recruit(&mut state, Player::Second).unwrap();
        assert_eq!(placed[0].character, CharacterId::Vizier);
        assert_eq!(
            reserve.recruit(&mut state, Player::Second),
            Err(RuleError::Recruitment("reserve is empty"))
        );
    }

    #[test]
    fn test_reserve_finds_last_free_home_cell() {
        let mut pieces = vec![
            piece(1, CharacterId::Leader, Player::First, 0, 3),
            piece(2, CharacterId::Leader, Player::Second, 0, -3),
        ];
        for (i, &(q, r)) in [(-3, 1), (-3, 2), (-3, 3), (-2, 3), (-1, 3), (1, 2)].iter().enumerate() {
            pieces.push(piece(3 + i as u32, CharacterId::Cub, Player::Second, q, r));
        }
        let mut state = GameState::new(GameId(3), pieces);
        let mut reserve = Reserve::mirrored(vec![CharacterId::Archer]);

        let placed = reserve.recruit(&mut state, Player::First).unwrap();
        assert_eq!(placed[0].pos, Hex::new(2, 1));
        assert_eq!(reserve.remaining(Player::First), 0);
        assert!(state.board.is_consistent());
    }
}
