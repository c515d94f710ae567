//! Integration tests for the LEADERS engine
//!
//! Tests the full stack: scenario setup, engine rules, victory and AI turns

use leaders_core::{
    board::Hex,
    engine::AbilityRequest,
    game::{GameState, GameStatus},
    pieces::{AbilityId, CharacterId, GameId, Piece, PieceId, Player, UserId},
    AbilityUse, AiConfig, AiOpponent, Reserve, RuleError, Scenario, VictoryType,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn piece(id: u32, character: CharacterId, owner: Player, q: i8, r: i8) -> Piece {
    Piece::new(PieceId(id), GameId(1), character, owner, Hex::new(q, r))
}

/// Two Leaders on an otherwise empty board
fn leaders_only() -> GameState {
    GameState::new(
        GameId(1),
        vec![
            piece(1, CharacterId::Leader, Player::First, 0, 3),
            piece(2, CharacterId::Leader, Player::Second, 0, -3),
        ],
    )
    .with_players(UserId(10), UserId(20))
}

/// Play AI-vs-AI until the game ends or `max_turns` passes
fn play_out(mut state: GameState, seed: u64, max_turns: u32) -> GameState {
    let mut reserve = Reserve::mirrored(vec![CharacterId::Assassin, CharacterId::Cavalry, CharacterId::Jailer]);
    let mut first = AiOpponent::new(AiConfig::hard().playing(Player::First).with_seed(seed));
    let mut second = AiOpponent::new(AiConfig::easy().with_seed(seed + 1));

    while !state.is_over() && state.turn.turn_number <= max_turns {
        let ai = match state.current_player() {
            Player::First => &mut first,
            Player::Second => &mut second,
        };
        let report = ai.play_turn(&mut state, &mut reserve).unwrap();
        assert!(!report.aborted);
        assert!(state.board.is_consistent());
    }
    state
}

// ============================================================================
// END-TO-END RULES
// ============================================================================

#[test]
fn test_opening_turn_end_to_end() {
    let mut state = leaders_only();

    // Foreign piece
    assert!(matches!(
        state.move_piece(PieceId(2), Hex::new(0, -2), Some(UserId(10))),
        Err(RuleError::WrongTurn { .. })
    ));
    // Unknown piece
    assert_eq!(
        state.move_piece(PieceId(77), Hex::new(0, 2), Some(UserId(10))),
        Err(RuleError::NotFound(PieceId(77)))
    );

    let outcome = state.move_piece(PieceId(1), Hex::new(0, 2), Some(UserId(10))).unwrap();
    assert!(outcome.piece.has_acted);
    assert_eq!(outcome.piece.pos, Hex::new(0, 2));

    let turn = state.end_turn();
    assert_eq!(turn.turn.current_player, Player::Second);
    assert_eq!(turn.turn.turn_number, 2);
    assert_eq!(turn.reset, vec![PieceId(1)]);
    assert!(!state.piece(PieceId(1)).unwrap().has_acted);
}

#[test]
fn test_ability_then_capture() {
    let mut state = GameState::new(
        GameId(1),
        vec![
            piece(1, CharacterId::Leader, Player::First, 0, 3),
            piece(2, CharacterId::Leader, Player::Second, 0, -1),
            piece(3, CharacterId::Grappler, Player::First, 0, 1),
            piece(4, CharacterId::Cavalry, Player::First, 1, 0),
        ],
    );

    // Hook the Leader in next to the Grappler
    let hook = AbilityRequest::new(PieceId(3), AbilityId::GrapplerHook, AbilityUse::on(PieceId(2)));
    let outcome = state.use_ability(hook).unwrap();
    assert!(outcome.changed.iter().any(|p| p.id == PieceId(2) && p.pos == Hex::new(0, 0)));

    // Cavalry at (1,0) already touches (0,0): two capture points
    let victory = state.check_victory();
    assert!(victory.is_game_over);
    assert_eq!(victory.winner, Some(Player::First));
    assert_eq!(victory.victory_type, Some(VictoryType::Capture));

    state.end_turn();
    assert_eq!(state.status, GameStatus::Finished);
    assert_eq!(state.turn.current_player, Player::First);
    assert_eq!(
        state.move_piece(PieceId(4), Hex::new(2, 0), None),
        Err(RuleError::GameOver)
    );
}

#[test]
fn test_rejected_action_changes_nothing() {
    let mut state = Scenario::default().to_game_state(GameId(4)).unwrap();
    let before = state.clone();

    assert!(state.move_piece(PieceId(1), Hex::new(0, 0), None).is_err());
    assert!(state
        .use_ability(AbilityRequest::new(PieceId(1), AbilityId::LeaderBoost, AbilityUse::to(Hex::new(0, 1))))
        .is_err());
    assert!(state.move_piece(PieceId(1), Hex::new(5, 5), None).is_err());
    assert_eq!(state, before);
}

#[test]
fn test_recruit_and_act_next_turn() {
    let mut state = leaders_only();
    let placed = state.place_recruit(Player::First, CharacterId::Vizier, Hex::new(-1, 3)).unwrap();
    let vizier = placed[0].id;
    state.end_turn();
    state.end_turn();

    // Vizier unlocks the Leader's boost
    let moves = state.valid_moves(PieceId(1)).unwrap();
    assert!(moves.iter().any(|h| h.distance_to(Hex::new(0, 3)) == 2));
    assert!(state.move_piece(vizier, Hex::new(-1, 2), None).is_ok());
}

// ============================================================================
// AI GAMES
// ============================================================================

#[test]
fn test_ai_vs_ai_stays_legal() {
    let state = Scenario::default().to_game_state(GameId(9)).unwrap();
    let end = play_out(state, 3, 30);
    assert!(end.is_over() || end.turn.turn_number == 31);
    if end.is_over() {
        assert!(end.winner.is_some());
        assert!(end.check_victory().is_game_over);
    }
}

#[test]
fn test_ai_vs_ai_random_scenarios() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for game in 0..3u64 {
        let scenario = Scenario::random_symmetric(&mut rng, "random", 3);
        let state = scenario.to_game_state(GameId(game)).unwrap();
        let end = play_out(state, game, 20);
        for player in [Player::First, Player::Second] {
            assert!(end.unit_count(player) <= 4);
            assert!(end.board.leader_of(player).is_some());
        }
    }
}

#[test]
fn test_same_seed_same_game() {
    let state = Scenario::default().to_game_state(GameId(9)).unwrap();
    let a = play_out(state.clone(), 17, 15);
    let b = play_out(state, 17, 15);
    assert_eq!(a, b);
}
