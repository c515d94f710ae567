//! Board state, turn state and the game aggregate

use crate::abilities::registry;
use crate::board::Hex;
use crate::pieces::{CharacterId, GameId, Piece, PieceId, Player, UserId};
use serde::{Deserialize, Serialize};

// ============================================================================
// BOARD STATE
// ============================================================================

/// All pieces of one game.
///
/// Queries are linear scans; a game never holds more than a dozen pieces.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pieces: Vec<Piece>,
}

impl Board {
    pub fn new(pieces: Vec<Piece>) -> Self {
        Self { pieces }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn into_pieces(self) -> Vec<Piece> {
        self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|p| p.id == id)
    }

    pub fn piece_at(&self, hex: Hex) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.pos == hex)
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.piece_at(hex).is_some()
    }

    pub fn is_occupied_at(&self, q: i8, r: i8) -> bool {
        self.is_occupied(Hex::new(q, r))
    }

    /// On the board and unoccupied
    pub fn is_free(&self, hex: Hex) -> bool {
        hex.is_valid() && !self.is_occupied(hex)
    }

    /// No piece strictly between two aligned cells
    pub fn is_path_clear(&self, start: Hex, end: Hex) -> bool {
        if !start.is_aligned(end) {
            return false;
        }
        if start.distance_to(end) <= 1 {
            return true;
        }
        start.between(end).into_iter().all(|h| !self.is_occupied(h))
    }

    /// First piece met walking from `origin` in `direction`
    pub fn first_along(&self, origin: Hex, direction: u8) -> Option<&Piece> {
        origin.ray(direction).find_map(|h| self.piece_at(h))
    }

    pub fn leader_of(&self, player: Player) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.owner == player && p.is_leader())
    }

    pub fn owned_by(&self, player: Player) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.owner == player)
    }

    pub fn enemies_of(&self, piece: &Piece) -> impl Iterator<Item = &Piece> + '_ {
        let owner = piece.owner;
        self.pieces.iter().filter(move |p| p.owner != owner)
    }

    pub fn has_ally(&self, player: Player, character: CharacterId) -> bool {
        self.owned_by(player).any(|p| p.is(character))
    }

    /// Target is shielded: it is a shield holder itself or stands next to an allied one
    pub fn is_protected(&self, target: &Piece) -> bool {
        let passives = registry();
        self.owned_by(target.owner)
            .any(|holder| passives.protects(holder, target))
    }

    /// An adjacent enemy suppresses this piece's abilities
    pub fn is_jailed(&self, piece: &Piece) -> bool {
        let passives = registry();
        self.enemies_of(piece)
            .any(|holder| passives.blocks(holder, piece))
    }

    /// One past the highest id in this game
    pub fn next_piece_id(&self) -> PieceId {
        PieceId(self.pieces.iter().map(|p| p.id.0 + 1).max().unwrap_or(1))
    }

    pub(crate) fn insert(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    pub(crate) fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> + '_ {
        self.pieces.iter_mut()
    }

    pub(crate) fn set_position(&mut self, id: PieceId, hex: Hex) {
        if let Some(piece) = self.piece_mut(id) {
            piece.pos = hex;
        }
    }

    /// Every cell holds at most one piece and every piece is on the board
    pub fn is_consistent(&self) -> bool {
        self.pieces.iter().enumerate().all(|(i, p)| {
            p.pos.is_valid() && self.pieces[i + 1..].iter().all(|o| o.pos != p.pos && o.id != p.id)
        })
    }
}

// ============================================================================
// TURN STATE
// ============================================================================

/// AI difficulty
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

/// Whose turn it is and per-turn counters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTurnState {
    pub current_player: Player,
    pub turn_number: u32,
    /// Recruitments made during the current turn
    pub recruitment_count: u8,
    /// Set when one seat is computer-controlled
    pub ai_difficulty: Option<Difficulty>,
}

impl Default for GameTurnState {
    fn default() -> Self {
        Self {
            current_player: Player::First,
            turn_number: 1,
            recruitment_count: 0,
            ai_difficulty: None,
        }
    }
}

/// Game status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Ongoing,
    Finished,
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Snapshot handed in by the caller; clone to explore
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub id: GameId,
    pub board: Board,
    pub turn: GameTurnState,
    /// Registered user per seat
    pub players: [Option<UserId>; 2],
    pub status: GameStatus,
    pub winner: Option<Player>,
}

impl GameState {
    pub fn new(id: GameId, pieces: Vec<Piece>) -> Self {
        Self {
            id,
            board: Board::new(pieces),
            turn: GameTurnState::default(),
            players: [None, None],
            status: GameStatus::Ongoing,
            winner: None,
        }
    }

    pub fn with_players(mut self, first: UserId, second: UserId) -> Self {
        self.players = [Some(first), Some(second)];
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.turn.ai_difficulty = Some(difficulty);
        self
    }

    pub fn current_player(&self) -> Player {
        self.turn.current_player
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Finished
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.board.piece(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(id: u32, character: CharacterId, owner: Player, q: i8, r: i8) -> Piece {
        Piece::new(PieceId(id), GameId(1), character, owner, Hex::new(q, r))
    }

    #[test]
    fn test_occupancy() {
        let board = Board::new(vec![piece(1, CharacterId::Leader, Player::First, 0, 3)]);
        assert!(board.is_occupied(Hex::new(0, 3)));
        assert!(board.is_occupied_at(0, 3));
        assert!(!board.is_occupied_at(0, 2));
        assert!(!board.is_free(Hex::new(5, 0)));
        assert_eq!(board.next_piece_id(), PieceId(2));
    }

    #[test]
    fn test_next_piece_id_skips_gaps() {
        let board = Board::new(vec![
            piece(1, CharacterId::Leader, Player::First, 0, 3),
            piece(5, CharacterId::Leader, Player::Second, 0, -3),
        ]);
        assert_eq!(board.next_piece_id(), PieceId(6));
        assert_eq!(Board::new(vec![]).next_piece_id(), PieceId(1));
    }

    #[test]
    fn test_path_clear() {
        let board = Board::new(vec![piece(1, CharacterId::Archer, Player::First, 0, 1)]);
        assert!(!board.is_path_clear(Hex::new(0, 3), Hex::new(0, -1)));
        assert!(board.is_path_clear(Hex::new(0, 3), Hex::new(0, 1)));
        assert!(board.is_path_clear(Hex::new(1, 0), Hex::new(0, 0)));
        assert!(!board.is_path_clear(Hex::new(0, 0), Hex::new(1, 1)));
    }

    #[test]
    fn test_first_along() {
        let board = Board::new(vec![
            piece(1, CharacterId::Archer, Player::First, 0, -2),
            piece(2, CharacterId::Jailer, Player::Second, 0, -3),
        ]);
        assert_eq!(board.first_along(Hex::new(0, 1), 0).map(|p| p.id), Some(PieceId(1)));
        assert!(board.first_along(Hex::new(0, 1), 3).is_none());
    }

    #[test]
    fn test_protection() {
        let board = Board::new(vec![
            piece(1, CharacterId::Protector, Player::First, 0, 0),
            piece(2, CharacterId::Archer, Player::First, 1, 0),
            piece(3, CharacterId::Cavalry, Player::First, 2, 0),
            piece(4, CharacterId::Archer, Player::Second, -1, 0),
        ]);
        let pieces = board.pieces();
        assert!(board.is_protected(&pieces[0]), "shield holder protects itself");
        assert!(board.is_protected(&pieces[1]));
        assert!(!board.is_protected(&pieces[2]));
        assert!(!board.is_protected(&pieces[3]), "enemy shield never covers");
    }

    #[test]
    fn test_jailed() {
        let board = Board::new(vec![
            piece(1, CharacterId::Jailer, Player::First, 0, 0),
            piece(2, CharacterId::Illusionist, Player::Second, 0, -1),
            piece(3, CharacterId::Grappler, Player::Second, 0, -2),
        ]);
        assert!(board.is_jailed(&board.pieces()[1]));
        assert!(!board.is_jailed(&board.pieces()[2]));
        assert!(!board.is_jailed(&board.pieces()[0]));
    }

    #[test]
    fn test_consistency() {
        let ok = Board::new(vec![
            piece(1, CharacterId::Leader, Player::First, 0, 3),
            piece(2, CharacterId::Leader, Player::Second, 0, -3),
        ]);
        assert!(ok.is_consistent());
        let clash = Board::new(vec![
            piece(1, CharacterId::Leader, Player::First, 0, 3),
            piece(2, CharacterId::Leader, Player::Second, 0, 3),
        ]);
        assert!(!clash.is_consistent());
    }
}
