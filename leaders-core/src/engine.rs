//! Turn & legality engine
//!
//! Every entry point validates completely before touching state; a returned
//! error guarantees the snapshot is unchanged.

use serde::{Deserialize, Serialize};

use crate::abilities::{registry, AbilityUse, Reach};
use crate::board::Hex;
use crate::error::{Result, RuleError};
use crate::game::{Board, GameState, GameStatus, GameTurnState};
use crate::pieces::{AbilityId, CharacterId, Piece, PieceId, UserId};
use crate::victory::{check_victory, VictoryResult};

/// Steps a Nemesis takes after the enemy Leader moves
const NEMESIS_STEPS: usize = 2;

// ============================================================================
// REQUESTS AND OUTCOMES
// ============================================================================

/// Request to use an active ability
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRequest {
    pub source: PieceId,
    pub ability: AbilityId,
    pub usage: AbilityUse,
    pub acting_user: Option<UserId>,
}

impl AbilityRequest {
    pub fn new(source: PieceId, ability: AbilityId, usage: AbilityUse) -> Self {
        Self {
            source,
            ability,
            usage,
            acting_user: None,
        }
    }

    pub fn by(mut self, user: UserId) -> Self {
        self.acting_user = Some(user);
        self
    }
}

/// Pieces changed by a move, for the caller to persist
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub piece: Piece,
    /// Enemy Nemesis pieces that advanced in response
    pub reactions: Vec<Piece>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbilityOutcome {
    pub source: Piece,
    /// Every piece whose position changed, source included when it moved
    pub changed: Vec<Piece>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    pub turn: GameTurnState,
    /// Pieces whose acted flag was cleared
    pub reset: Vec<PieceId>,
    pub victory: VictoryResult,
}

// ============================================================================
// MOVE LEGALITY
// ============================================================================

/// Empty on-board neighbors, for characters that move normally
pub fn standard_moves(piece: &Piece, board: &Board) -> Vec<Hex> {
    if !piece.def().moves_normally {
        return Vec::new();
    }
    piece
        .pos
        .valid_neighbors()
        .filter(|&h| !board.is_occupied(h))
        .collect()
}

/// Standard steps plus every relocation granted by movement extensions.
/// Extensions are suppressed while an enemy Jailer stands adjacent.
pub fn legal_moves(piece: &Piece, board: &Board) -> Vec<Hex> {
    let mut moves = standard_moves(piece, board);
    if board.is_jailed(piece) {
        return moves;
    }
    for reach in registry().extra_reach(piece, board) {
        if let Reach::Move(cell) = reach {
            if !moves.contains(&cell) {
                moves.push(cell);
            }
        }
    }
    moves
}

impl GameState {
    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Destinations `move_piece` would accept for this piece
    pub fn valid_moves(&self, id: PieceId) -> Result<Vec<Hex>> {
        let piece = self.board.piece(id).ok_or(RuleError::NotFound(id))?;
        Ok(legal_moves(piece, &self.board))
    }

    /// Units the piece's abilities can currently act on
    pub fn ability_targets(&self, id: PieceId) -> Result<Vec<Hex>> {
        let piece = self.board.piece(id).ok_or(RuleError::NotFound(id))?;
        if self.board.is_jailed(piece) {
            return Ok(Vec::new());
        }
        Ok(registry()
            .extra_reach(piece, &self.board)
            .into_iter()
            .filter_map(|r| match r {
                Reach::Target(cell) => Some(cell),
                Reach::Move(_) => None,
            })
            .collect())
    }

    pub fn check_victory(&self) -> VictoryResult {
        check_victory(&self.board)
    }

    // ========================================================================
    // AUTHORIZATION
    // ========================================================================

    /// Existence, turn, identity and acted checks shared by every action
    fn authorize(&self, id: PieceId, acting_user: Option<UserId>) -> Result<Piece> {
        let piece = *self.board.piece(id).ok_or(RuleError::NotFound(id))?;
        if self.is_over() {
            return Err(RuleError::GameOver);
        }
        let current = self.current_player();
        if piece.owner != current {
            return Err(RuleError::WrongTurn {
                current,
                owner: piece.owner,
            });
        }
        if let Some(user) = acting_user {
            if self.players[current.index()] != Some(user) {
                return Err(RuleError::NotActivePlayer(current));
            }
        }
        if piece.has_acted {
            return Err(RuleError::AlreadyActed(id));
        }
        Ok(piece)
    }

    // ========================================================================
    // MOVE
    // ========================================================================

    pub fn move_piece(
        &mut self,
        id: PieceId,
        destination: Hex,
        acting_user: Option<UserId>,
    ) -> Result<MoveOutcome> {
        if !destination.is_valid() {
            return Err(RuleError::InvalidCoordinate(destination));
        }
        let piece = self.authorize(id, acting_user)?;
        if !legal_moves(&piece, &self.board).contains(&destination) {
            return Err(RuleError::IllegalMove {
                piece: id,
                to: destination,
            });
        }

        let mut moved = piece;
        moved.pos = destination;
        moved.has_acted = true;
        if let Some(slot) = self.board.piece_mut(id) {
            *slot = moved;
        }
        tracing::debug!(
            "{:?} {:?} moved ({}, {}) -> ({}, {})",
            piece.owner,
            piece.character,
            piece.pos.q,
            piece.pos.r,
            destination.q,
            destination.r
        );

        let reactions = if moved.is_leader() {
            self.nemesis_pursuit(&moved)
        } else {
            Vec::new()
        };

        Ok(MoveOutcome {
            piece: moved,
            reactions,
        })
    }

    /// Each enemy Nemesis closes in on a Leader that just moved
    fn nemesis_pursuit(&mut self, leader: &Piece) -> Vec<Piece> {
        let hunters: Vec<PieceId> = self
            .board
            .enemies_of(leader)
            .filter(|p| p.is(CharacterId::Nemesis))
            .map(|p| p.id)
            .collect();

        let mut advanced = Vec::new();
        for id in hunters {
            let mut stepped = false;
            for _ in 0..NEMESIS_STEPS {
                let Some(hunter) = self.board.piece(id) else {
                    break;
                };
                let current = hunter.pos.distance_to(leader.pos);
                if current <= 1 {
                    break;
                }
                let next = hunter
                    .pos
                    .valid_neighbors()
                    .filter(|&h| h != leader.pos && !self.board.is_occupied(h))
                    .filter(|h| h.distance_to(leader.pos) < current)
                    .min_by_key(|h| h.distance_to(leader.pos));
                match next {
                    Some(cell) => {
                        self.board.set_position(id, cell);
                        stepped = true;
                    }
                    None => break,
                }
            }
            if stepped {
                if let Some(hunter) = self.board.piece(id) {
                    tracing::debug!("Nemesis {:?} advanced to ({}, {})", id, hunter.pos.q, hunter.pos.r);
                    advanced.push(*hunter);
                }
            }
        }
        advanced
    }

    // ========================================================================
    // ABILITY
    // ========================================================================

    pub fn use_ability(&mut self, request: AbilityRequest) -> Result<AbilityOutcome> {
        let AbilityRequest {
            source: source_id,
            ability,
            usage,
            acting_user,
        } = request;

        for cell in [usage.destination, usage.secondary_destination].into_iter().flatten() {
            if !cell.is_valid() {
                return Err(RuleError::InvalidCoordinate(cell));
            }
        }
        let source = self.authorize(source_id, acting_user)?;
        if !source.def().has_ability(ability) {
            return Err(RuleError::UnknownAbility {
                character: source.character,
                ability,
            });
        }
        let strategy = registry()
            .action(ability)
            .ok_or_else(|| RuleError::violation(ability, "passive ability cannot be activated"))?;

        let target = match usage.target {
            Some(tid) => Some(*self.board.piece(tid).ok_or(RuleError::NotFound(tid))?),
            None => None,
        };
        if self.board.is_jailed(&source) {
            return Err(RuleError::Blocked("an adjacent jailer prevents abilities"));
        }
        if let Some(target) = target {
            if target.is_enemy_of(&source) && self.board.is_protected(&target) {
                return Err(RuleError::Blocked("target is shielded by a protector"));
            }
        }

        let mut scratch = self.board.clone();
        let moved = strategy.execute(&source, &usage, &mut scratch)?;
        if let Some(src) = scratch.piece_mut(source_id) {
            src.has_acted = true;
        }
        self.board = scratch;

        let source_after = *self.board.piece(source_id).ok_or(RuleError::NotFound(source_id))?;
        let changed = moved
            .iter()
            .filter_map(|id| self.board.piece(*id).copied())
            .collect();
        tracing::debug!("{:?} {:?} used {:?}", source.owner, source.character, ability);

        Ok(AbilityOutcome {
            source: source_after,
            changed,
        })
    }

    /// Spend a piece's action without doing anything
    pub fn pass_piece(&mut self, id: PieceId, acting_user: Option<UserId>) -> Result<Piece> {
        let mut piece = self.authorize(id, acting_user)?;
        piece.has_acted = true;
        if let Some(slot) = self.board.piece_mut(id) {
            *slot = piece;
        }
        Ok(piece)
    }

    // ========================================================================
    // END TURN
    // ========================================================================

    pub fn end_turn(&mut self) -> TurnOutcome {
        let victory = self.check_victory();
        if victory.is_game_over || self.is_over() {
            if self.status != GameStatus::Finished {
                tracing::info!(
                    "Game {:?} over on turn {}: {:?} wins by {:?}",
                    self.id,
                    self.turn.turn_number,
                    victory.winner,
                    victory.victory_type
                );
            }
            self.status = GameStatus::Finished;
            if victory.winner.is_some() {
                self.winner = victory.winner;
            }
            return TurnOutcome {
                turn: self.turn,
                reset: Vec::new(),
                victory,
            };
        }

        let mut reset = Vec::new();
        for piece in self.board.pieces_mut() {
            if piece.has_acted {
                piece.has_acted = false;
                reset.push(piece.id);
            }
        }
        self.turn.current_player = self.turn.current_player.opponent();
        self.turn.turn_number += 1;
        self.turn.recruitment_count = 0;

        TurnOutcome {
            turn: self.turn,
            reset,
            victory,
        }
    }
}
