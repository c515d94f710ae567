//! Heuristic AI opponent
//!
//! Scores every candidate of every unacted unit on a cloned state, commits the
//! single best action, and repeats until nothing beats standing still. No
//! tree search: one ply plus the risk lookahead in [`crate::risk`].

use std::time::Duration;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::abilities::{registry, AbilityUse};
use crate::board::Hex;
use crate::engine::{AbilityRequest, TurnOutcome};
use crate::error::{Result, RuleError};
use crate::eval::{material, positional, Heuristics};
use crate::game::{Difficulty, GameState};
use crate::pieces::{Piece, PieceId, Player};
use crate::recruit::Recruiter;
use crate::risk::risk;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Seat the AI plays
    pub player: Player,
    pub difficulty: Difficulty,
    /// Safety cap on committed actions per turn
    pub max_actions_per_turn: usize,
    pub max_recruit_attempts: usize,
    /// Pause between committed actions, for presentation pacing
    pub action_delay_ms: u64,
    pub heuristics: Heuristics,
    pub seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            player: Player::Second,
            difficulty: Difficulty::Easy,
            max_actions_per_turn: 10,
            max_recruit_attempts: 2,
            action_delay_ms: 0,
            heuristics: Heuristics::default(),
            seed: 42,
        }
    }
}

impl AiConfig {
    pub fn easy() -> Self {
        Self::default()
    }

    pub fn hard() -> Self {
        Self {
            difficulty: Difficulty::Hard,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn playing(mut self, player: Player) -> Self {
        self.player = player;
        self
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// One engine call the AI can make for a unit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiAction {
    Move { piece: PieceId, to: Hex },
    Ability(AbilityRequest),
    Pass(PieceId),
}

impl AiAction {
    pub fn piece(&self) -> PieceId {
        match *self {
            AiAction::Move { piece, .. } | AiAction::Pass(piece) => piece,
            AiAction::Ability(req) => req.source,
        }
    }

    /// Unit the action is aimed at, if any
    pub fn target(&self) -> Option<PieceId> {
        match *self {
            AiAction::Ability(req) => req.usage.target,
            _ => None,
        }
    }

    /// Run the action through the engine
    pub fn apply(&self, state: &mut GameState) -> Result<()> {
        match *self {
            AiAction::Move { piece, to } => state.move_piece(piece, to, None).map(|_| ()),
            AiAction::Ability(req) => state.use_ability(req).map(|_| ()),
            AiAction::Pass(piece) => state.pass_piece(piece, None).map(|_| ()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredAction {
    pub action: AiAction,
    pub score: f32,
}

/// Every move and ability use the unit could attempt, moves first
pub fn candidates(state: &GameState, piece: &Piece) -> Vec<AiAction> {
    let mut out: Vec<AiAction> = state
        .valid_moves(piece.id)
        .unwrap_or_default()
        .into_iter()
        .map(|to| AiAction::Move { piece: piece.id, to })
        .collect();

    let strategies = registry();
    for &ability in piece.def().abilities {
        if let Some(strategy) = strategies.action(ability) {
            out.extend(
                strategy
                    .options(piece, &state.board)
                    .into_iter()
                    .map(|usage: AbilityUse| AiAction::Ability(AbilityRequest::new(piece.id, ability, usage))),
            );
        }
    }
    out
}

/// Result of one planning step
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    /// Best action that beats standing still
    pub best: Option<ScoredAction>,
    /// Unacted units with nothing better than standing still
    pub idle: Vec<PieceId>,
}

/// What the AI did during one turn
#[derive(Clone, Debug, PartialEq)]
pub struct TurnReport {
    pub actions: Vec<ScoredAction>,
    pub passed: Vec<PieceId>,
    pub recruited: Vec<Piece>,
    /// An engine error cut the turn short
    pub aborted: bool,
    pub outcome: TurnOutcome,
}

// ============================================================================
// AI OPPONENT
// ============================================================================

pub struct AiOpponent {
    config: AiConfig,
    rng: ChaCha8Rng,
}

impl AiOpponent {
    pub fn new(config: AiConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Difficulty in effect: the game's own setting wins over the config
    pub fn difficulty(&self, state: &GameState) -> Difficulty {
        state.turn.ai_difficulty.unwrap_or(self.config.difficulty)
    }

    /// Score of `after` for the AI, reached from `before` by `mover`
    pub fn evaluate(&self, before: &GameState, after: &GameState, mover: PieceId, target: Option<PieceId>) -> f32 {
        let player = self.config.player;
        let h = &self.config.heuristics;
        material(&before.board, &after.board, player, mover, target, h)
            + positional(&after.board, player, h)
            - risk(&after.board, player, self.difficulty(before), h)
    }

    fn noise(&mut self, difficulty: Difficulty) -> f32 {
        let jitter = self.config.heuristics.jitter;
        if difficulty == Difficulty::Easy && jitter > 0.0 {
            self.rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        }
    }

    /// Score every candidate of every unacted unit
    pub fn plan(&mut self, state: &GameState) -> Plan {
        let difficulty = self.difficulty(state);
        let movers: Vec<Piece> = state
            .board
            .owned_by(self.config.player)
            .filter(|p| !p.has_acted)
            .copied()
            .collect();

        let mut best: Option<ScoredAction> = None;
        let mut idle = Vec::new();

        for piece in movers {
            let floor = self.evaluate(state, state, piece.id, None);
            let mut piece_best: Option<ScoredAction> = None;

            for action in candidates(state, &piece) {
                let mut trial = state.clone();
                if action.apply(&mut trial).is_err() {
                    continue;
                }
                let score = self.evaluate(state, &trial, piece.id, action.target()) + self.noise(difficulty);
                if piece_best.map_or(true, |b| score > b.score) {
                    piece_best = Some(ScoredAction { action, score });
                }
            }

            match piece_best {
                Some(found) if found.score > floor => {
                    if best.map_or(true, |b| found.score > b.score) {
                        best = Some(found);
                    }
                }
                _ => idle.push(piece.id),
            }
        }

        Plan { best, idle }
    }

    pub fn best_action(&mut self, state: &GameState) -> Option<ScoredAction> {
        self.plan(state).best
    }

    /// Play the AI's whole turn: act, recruit, end the turn.
    ///
    /// Engine errors while committing abort the turn; the turn still ends.
    pub fn play_turn(&mut self, state: &mut GameState, recruiter: &mut dyn Recruiter) -> Result<TurnReport> {
        let player = self.config.player;
        if state.is_over() {
            return Err(RuleError::GameOver);
        }
        let current = state.current_player();
        if current != player {
            return Err(RuleError::WrongTurn { current, owner: player });
        }

        let mut actions = Vec::new();
        let mut passed = Vec::new();
        let mut aborted = false;

        while actions.len() < self.config.max_actions_per_turn {
            let plan = self.plan(state);
            let Some(choice) = plan.best else {
                for id in plan.idle {
                    if let Err(e) = state.pass_piece(id, None) {
                        tracing::warn!("AI pass failed for {:?}: {}", id, e);
                        aborted = true;
                        break;
                    }
                    passed.push(id);
                }
                break;
            };

            if let Err(e) = choice.action.apply(state) {
                tracing::warn!("AI action {:?} rejected: {}", choice.action, e);
                aborted = true;
                break;
            }
            tracing::debug!("AI {:?} committed {:?} (score {:.1})", player, choice.action, choice.score);
            actions.push(choice);

            if state.check_victory().is_game_over {
                break;
            }
            if self.config.action_delay_ms > 0 {
                std::thread::sleep(Duration::from_millis(self.config.action_delay_ms));
            }
        }

        let mut recruited = Vec::new();
        if !aborted && !state.check_victory().is_game_over {
            for _ in 0..self.config.max_recruit_attempts {
                if !state.can_recruit(player) {
                    break;
                }
                match recruiter.recruit(state, player) {
                    Ok(placed) => recruited.extend(placed),
                    Err(e) => tracing::debug!("AI recruitment skipped: {}", e),
                }
            }
        }

        let outcome = state.end_turn();
        Ok(TurnReport {
            actions,
            passed,
            recruited,
            aborted,
            outcome,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
