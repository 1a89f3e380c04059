//! Opponent integration tests.

use fanorona_telo::ai::{legal_actions, HeuristicConfig, HeuristicOpponent, Opponent, OpponentKind, RandomOpponent};
use fanorona_telo::core::{GamePhase, GameRng, PieceSet, PlayerId, Position};
use fanorona_telo::game::apply_action;
use fanorona_telo::GameState;

fn pos(x: i8, y: i8) -> Position {
    Position::new(x, y)
}

fn with_layout(player_one: &[Position], player_two: &[Position], to_move: PlayerId) -> GameState {
    let mut state = GameState::new(0);
    state.pieces = PieceSet::with_layout(player_one, player_two);
    state.current_player = to_move;
    state
}

// =============================================================================
// Placement heuristics
// =============================================================================

#[test]
fn test_ai_completes_its_own_row() {
    let state = with_layout(&[pos(1, 1)], &[pos(0, 0), pos(1, 0)], PlayerId::Two);
    let ai = HeuristicOpponent::default();
    assert_eq!(ai.placement_move(&state), Some(pos(2, 0)));
}

#[test]
fn test_ai_blocks_opponent_column() {
    let state = with_layout(&[pos(0, 0), pos(0, 1)], &[pos(2, 2)], PlayerId::Two);
    let ai = HeuristicOpponent::default();
    assert_eq!(ai.placement_move(&state), Some(pos(0, 2)));
}

#[test]
fn test_ai_plays_player_one_too() {
    let state = with_layout(&[pos(2, 0), pos(2, 1)], &[pos(0, 0)], PlayerId::One);
    let ai = HeuristicOpponent::default();
    assert_eq!(ai.placement_move(&state), Some(pos(2, 2)));
}

#[test]
fn test_custom_strategic_order() {
    let config = HeuristicConfig::default().with_strategic_positions(vec![pos(1, 1), pos(0, 0)]);
    let ai = HeuristicOpponent::new(config);

    assert_eq!(ai.placement_move(&GameState::new(0)), Some(pos(1, 1)));

    let state = with_layout(&[pos(1, 1)], &[], PlayerId::Two);
    assert_eq!(ai.placement_move(&state), Some(pos(0, 0)));
}

// =============================================================================
// Every choice is legal
// =============================================================================

fn play_out(mut one: Box<dyn Opponent>, mut two: Box<dyn Opponent>, max_actions: usize) -> GameState {
    let mut state = GameState::new(0);
    for _ in 0..max_actions {
        if state.is_over() {
            break;
        }
        let opponent = match state.current_player {
            PlayerId::One => &mut one,
            PlayerId::Two => &mut two,
        };
        let action = opponent.choose_action(&state).expect("a live game always offers an action");
        assert!(legal_actions(&state).contains(&action), "{action} is not legal");
        state = apply_action(&state, action, 0).expect("chosen action is accepted");
    }
    state
}

#[test]
fn test_heuristic_vs_random_stays_legal() {
    for seed in 0..20 {
        let heuristic = OpponentKind::Heuristic.build(&HeuristicConfig::default(), GameRng::new(seed));
        let random = Box::new(RandomOpponent::new(GameRng::new(seed + 1000)));
        play_out(heuristic, random, 100);
    }
}

#[test]
fn test_random_vs_random_stays_legal() {
    for seed in 0..20 {
        let one = Box::new(RandomOpponent::new(GameRng::new(seed)));
        let two = Box::new(RandomOpponent::new(GameRng::new(seed + 1)));
        play_out(one, two, 100);
    }
}

#[test]
fn test_heuristic_self_play_is_deterministic() {
    let run = || {
        let one = OpponentKind::Heuristic.build(&HeuristicConfig::default(), GameRng::new(9));
        let two = OpponentKind::Heuristic.build(&HeuristicConfig::default(), GameRng::new(10));
        play_out(one, two, 60)
    };
    assert_eq!(run(), run());
}

#[test]
fn test_heuristic_never_misses_a_placement_win() {
    let config = HeuristicConfig::default();
    for seed in 0..30 {
        let mut random = RandomOpponent::new(GameRng::new(seed));
        let ai = HeuristicOpponent::new(config.clone());
        let mut state = GameState::new(0);

        while !state.is_over() && state.phase == GamePhase::Placement {
            let action = if state.current_player == PlayerId::One {
                random.choose_action(&state).unwrap()
            } else {
                fanorona_telo::Action::Place(ai.placement_move(&state).unwrap())
            };
            let mover = state.current_player;
            let could_win = legal_actions(&state).into_iter().any(|a| {
                apply_action(&state, a, 0)
                    .map(|s| s.winner == Some(mover))
                    .unwrap_or(false)
            });
            state = apply_action(&state, action, 0).unwrap();
            if mover == PlayerId::Two && could_win {
                assert_eq!(state.winner, Some(PlayerId::Two), "seed {seed}");
            }
        }
    }
}
