//! Turn and phase transitions.
//!
//! Each transition reads a `GameState` and returns a brand-new one, or a
//! `Rejection` with the input untouched. The same functions drive real play
//! (via the session) and remote peers (via `apply_action`).
//!
//! ## Placement
//!
//! The player's first unplaced piece goes on the clicked point. When the
//! sixth piece lands the phase flips to movement for good.
//!
//! ## Movement
//!
//! Clicking an own piece selects it (repeatable); clicking a free adjacent
//! point afterwards commits the slide.
//!
//! ## Ending
//!
//! A full line ends the game for its owner. A player left with no legal
//! slide on their turn loses, as does a player who runs out of time.

use tracing::{debug, info, instrument};

use crate::core::{
    Action, ActionRecord, EndReason, GamePhase, GameState, GameStatus, PlayerId, Position,
    Timestamp,
};
use crate::rules;

use super::error::Rejection;

fn reject(rejection: Rejection) -> Rejection {
    debug!(%rejection, "action rejected");
    rejection
}

/// Check that `player` is the one on turn.
///
/// The transitions below always act for `state.current_player`; callers that
/// receive input attributed to a specific player run this first.
pub fn ensure_turn(state: &GameState, player: PlayerId) -> Result<(), Rejection> {
    if state.is_over() {
        return Err(reject(Rejection::GameOver));
    }
    if state.current_player != player {
        return Err(reject(Rejection::NotYourTurn {
            expected: state.current_player,
            actual: player,
        }));
    }
    Ok(())
}

fn ensure_phase(state: &GameState, phase: GamePhase) -> Result<(), Rejection> {
    if state.is_over() {
        return Err(reject(Rejection::GameOver));
    }
    if state.phase != phase {
        return Err(reject(Rejection::WrongPhase(state.phase)));
    }
    Ok(())
}

/// Put the current player's next piece on `position`.
#[instrument(level = "debug", skip(state), fields(player = %state.current_player, turn = state.turn_number))]
pub fn apply_placement(
    state: &GameState,
    position: Position,
    now: Timestamp,
) -> Result<GameState, Rejection> {
    ensure_phase(state, GamePhase::Placement)?;

    if !rules::is_valid_position(position) {
        return Err(reject(Rejection::InvalidPosition(position)));
    }
    if rules::is_occupied(position, &state.pieces) {
        return Err(reject(Rejection::PositionOccupied(position)));
    }

    let player = state.current_player;
    let piece = rules::unplaced_pieces(player, &state.pieces)
        .first()
        .copied()
        .ok_or_else(|| reject(Rejection::NoUnplacedPiece(player)))?;

    let mut next = state.clone();
    next.pieces = state.pieces.with_placed(piece.id, position);
    if next.pieces.all_placed() {
        next.phase = GamePhase::Movement;
        debug!("all pieces placed, entering movement phase");
    }

    Ok(finish_turn(next, Action::Place(position), now))
}

/// Handle a click during the movement phase.
///
/// Returns a state with the piece selected when `position` holds one of the
/// current player's pieces, or the state after the move when it is a legal
/// destination for the selected piece.
#[instrument(level = "debug", skip(state), fields(player = %state.current_player, turn = state.turn_number))]
pub fn apply_move(
    state: &GameState,
    position: Position,
    now: Timestamp,
) -> Result<GameState, Rejection> {
    ensure_phase(state, GamePhase::Movement)?;

    let player = state.current_player;

    if let Some(piece) = state.pieces.piece_at(position).filter(|p| p.owner == player) {
        let mut next = state.clone();
        next.selected = Some(piece.id);
        return Ok(next);
    }

    let selected = state
        .selected
        .and_then(|id| state.pieces.get(id))
        .filter(|p| p.placed && p.owner == player)
        .copied()
        .ok_or_else(|| reject(Rejection::NoSelection))?;

    if !rules::can_move_to(selected.position, position, &state.pieces) {
        return Err(reject(Rejection::InvalidDestination {
            from: selected.position,
            to: position,
        }));
    }

    let mut next = state.clone();
    next.pieces = state.pieces.with_moved(selected.id, position);

    let action = Action::Move {
        from: selected.position,
        to: position,
    };
    Ok(finish_turn(next, action, now))
}

/// Apply a complete action for the current player.
///
/// `Move` performs the selection and the commit in one step and is refused
/// outright if either half would be.
pub fn apply_action(
    state: &GameState,
    action: Action,
    now: Timestamp,
) -> Result<GameState, Rejection> {
    match action {
        Action::Place(position) => apply_placement(state, position, now),
        Action::Move { from, to } => {
            ensure_phase(state, GamePhase::Movement)?;

            let player = state.current_player;
            if state.pieces.owner_at(from) != Some(player) {
                return Err(reject(Rejection::NotYourPiece {
                    player,
                    position: from,
                }));
            }
            if !rules::can_move_to(from, to, &state.pieces) {
                return Err(reject(Rejection::InvalidDestination { from, to }));
            }

            let selected = apply_move(state, from, now)?;
            apply_move(&selected, to, now)
        }
    }
}

/// `ensure_turn` followed by `apply_action`.
pub fn apply_action_as(
    state: &GameState,
    player: PlayerId,
    action: Action,
    now: Timestamp,
) -> Result<GameState, Rejection> {
    ensure_turn(state, player)?;
    apply_action(state, action, now)
}

/// End the game on time if the current turn has run past `limit_ms`.
///
/// Returns `None` while time remains or once the game is already over.
#[must_use]
pub fn timeout_turn(state: &GameState, now: Timestamp, limit_ms: u64) -> Option<GameState> {
    if state.is_over() || state.turn_elapsed(now) < limit_ms {
        return None;
    }
    let loser = state.current_player;
    info!(%loser, elapsed_ms = state.turn_elapsed(now), "turn time limit exceeded");
    Some(end_game(state.clone(), loser.other(), EndReason::Timeout, now))
}

/// End the game immediately as a loss for the current player.
pub fn forfeit(state: &GameState, now: Timestamp) -> Result<GameState, Rejection> {
    if state.is_over() {
        return Err(reject(Rejection::GameOver));
    }
    let winner = state.current_player.other();
    Ok(end_game(state.clone(), winner, EndReason::Forfeit, now))
}

fn finish_turn(mut next: GameState, action: Action, now: Timestamp) -> GameState {
    let player = next.current_player;

    next.history
        .push_back(ActionRecord::new(player, action, next.turn_number));
    next.total_game_time = next.total_game_time.saturating_add(next.turn_elapsed(now));
    next.turn_started_at = now;
    next.turn_number = next.turn_number.saturating_add(1);
    next.selected = None;
    next.current_player = player.other();

    if let Some(winner) = rules::check_winner(&next.pieces) {
        return declare_winner(next, winner, EndReason::Alignment);
    }

    if next.phase == GamePhase::Movement && !rules::can_player_move(next.current_player, &next.pieces) {
        return declare_winner(next, player, EndReason::Blocked);
    }

    next
}

fn end_game(mut next: GameState, winner: PlayerId, reason: EndReason, now: Timestamp) -> GameState {
    next.total_game_time = next.total_game_time.saturating_add(next.turn_elapsed(now));
    next.turn_started_at = now;
    next.selected = None;
    declare_winner(next, winner, reason)
}

fn declare_winner(mut next: GameState, winner: PlayerId, reason: EndReason) -> GameState {
    next.status = GameStatus::Won;
    next.winner = Some(winner);
    next.end_reason = Some(reason);
    info!(%winner, %reason, turns = next.turns_played(), "game over");
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PieceId, PieceSet};

    fn pos(x: i8, y: i8) -> Position {
        Position::new(x, y)
    }

    fn place_all(points: &[(i8, i8)]) -> GameState {
        points.iter().fold(GameState::new(0), |state, &(x, y)| {
            apply_placement(&state, pos(x, y), 0).unwrap()
        })
    }

    fn movement_state(player_one: &[Position], player_two: &[Position], to_move: PlayerId) -> GameState {
        let mut state = GameState::new(0);
        state.pieces = PieceSet::with_layout(player_one, player_two);
        state.phase = GamePhase::Movement;
        state.current_player = to_move;
        state
    }

    #[test]
    fn test_placement_uses_first_unplaced_piece() {
        let state = apply_placement(&GameState::new(0), pos(1, 1), 10).unwrap();

        assert_eq!(state.pieces.piece_at(pos(1, 1)).map(|p| p.id), Some(PieceId(0)));
        assert_eq!(state.current_player, PlayerId::Two);
        assert_eq!(state.turn_number, 2);
        assert_eq!(state.turn_started_at, 10);
        assert_eq!(state.total_game_time, 10);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_placement_on_occupied_point_is_rejected() {
        let state = apply_placement(&GameState::new(0), pos(1, 1), 0).unwrap();
        let result = apply_placement(&state, pos(1, 1), 5);

        assert_eq!(result, Err(Rejection::PositionOccupied(pos(1, 1))));
        assert_eq!(state.current_player, PlayerId::Two);
        assert_eq!(state.pieces.placed_count(), 1);
    }

    #[test]
    fn test_placement_off_board_is_rejected() {
        let result = apply_placement(&GameState::new(0), pos(3, 1), 0);
        assert_eq!(result, Err(Rejection::InvalidPosition(pos(3, 1))));
    }

    #[test]
    fn test_placement_without_pieces_in_hand() {
        let mut state = GameState::new(0);
        state.pieces = PieceSet::with_layout(&[pos(0, 0), pos(2, 1), pos(1, 2)], &[pos(1, 1)]);

        let result = apply_placement(&state, pos(2, 2), 0);
        assert_eq!(result, Err(Rejection::NoUnplacedPiece(PlayerId::One)));
    }

    #[test]
    fn test_sixth_placement_enters_movement() {
        let state = place_all(&[(0, 0), (1, 1), (2, 1), (1, 0), (1, 2), (2, 2)]);

        assert_eq!(state.phase, GamePhase::Movement);
        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.current_player, PlayerId::One);
        assert_eq!(state.turns_played(), 6);
    }

    #[test]
    fn test_placement_rejected_after_phase_change() {
        let state = place_all(&[(0, 0), (1, 1), (2, 1), (1, 0), (1, 2), (2, 2)]);
        let result = apply_placement(&state, pos(0, 1), 0);
        assert_eq!(result, Err(Rejection::WrongPhase(GamePhase::Movement)));
    }

    #[test]
    fn test_alignment_during_placement_wins() {
        let state = place_all(&[(0, 0), (1, 1), (1, 0), (2, 2), (2, 0)]);

        assert_eq!(state.status, GameStatus::Won);
        assert_eq!(state.winner, Some(PlayerId::One));
        assert_eq!(state.end_reason, Some(EndReason::Alignment));
        assert_eq!(state.phase, GamePhase::Placement);
        assert_eq!(apply_placement(&state, pos(0, 2), 0), Err(Rejection::GameOver));
    }

    #[test]
    fn test_select_then_move() {
        let state = movement_state(
            &[pos(0, 0), pos(2, 1), pos(1, 2)],
            &[pos(1, 0), pos(0, 1), pos(2, 2)],
            PlayerId::One,
        );

        let selected = apply_move(&state, pos(0, 0), 0).unwrap();
        assert_eq!(selected.selected, Some(PieceId(0)));
        assert_eq!(selected.current_player, PlayerId::One);
        assert_eq!(selected.pieces, state.pieces);

        let moved = apply_move(&selected, pos(1, 1), 0).unwrap();
        assert_eq!(moved.pieces.owner_at(pos(1, 1)), Some(PlayerId::One));
        assert_eq!(moved.selected, None);
        assert_eq!(moved.current_player, PlayerId::Two);
    }

    #[test]
    fn test_reselect_changes_selection() {
        let state = movement_state(
            &[pos(0, 0), pos(2, 1), pos(1, 2)],
            &[pos(1, 0), pos(0, 1), pos(2, 2)],
            PlayerId::One,
        );

        let first = apply_move(&state, pos(0, 0), 0).unwrap();
        let second = apply_move(&first, pos(2, 1), 0).unwrap();
        assert_eq!(second.selected, Some(PieceId(1)));
    }

    #[test]
    fn test_move_without_selection() {
        let state = movement_state(
            &[pos(0, 0), pos(2, 1), pos(1, 2)],
            &[pos(1, 0), pos(0, 1), pos(2, 2)],
            PlayerId::One,
        );
        assert_eq!(apply_move(&state, pos(1, 1), 0), Err(Rejection::NoSelection));
    }

    #[test]
    fn test_move_to_non_adjacent_point() {
        let state = movement_state(
            &[pos(0, 0), pos(2, 1), pos(1, 2)],
            &[pos(1, 0), pos(0, 1), pos(2, 2)],
            PlayerId::One,
        );
        let selected = apply_move(&state, pos(2, 1), 0).unwrap();

        let result = apply_move(&selected, pos(0, 2), 0);
        assert_eq!(
            result,
            Err(Rejection::InvalidDestination {
                from: pos(2, 1),
                to: pos(0, 2),
            })
        );
    }

    #[test]
    fn test_clicking_opponent_piece_with_selection() {
        let state = movement_state(
            &[pos(0, 0), pos(2, 1), pos(1, 2)],
            &[pos(1, 0), pos(0, 1), pos(2, 2)],
            PlayerId::One,
        );
        let selected = apply_move(&state, pos(0, 0), 0).unwrap();

        assert!(matches!(
            apply_move(&selected, pos(1, 0), 0),
            Err(Rejection::InvalidDestination { .. })
        ));
    }

    #[test]
    fn test_winning_move() {
        let state = movement_state(
            &[pos(0, 0), pos(1, 0), pos(1, 1)],
            &[pos(0, 1), pos(1, 2), pos(2, 2)],
            PlayerId::One,
        );

        let won = apply_action(
            &state,
            Action::Move {
                from: pos(1, 1),
                to: pos(2, 0),
            },
            0,
        )
        .unwrap();

        assert_eq!(won.status, GameStatus::Won);
        assert_eq!(won.winner, Some(PlayerId::One));
        assert_eq!(won.end_reason, Some(EndReason::Alignment));
        assert_eq!(won.current_player, PlayerId::Two);
        assert_eq!(apply_move(&won, pos(0, 1), 0), Err(Rejection::GameOver));
    }

    #[test]
    fn test_apply_action_rejects_foreign_piece() {
        let state = movement_state(
            &[pos(0, 0), pos(2, 1), pos(1, 2)],
            &[pos(1, 0), pos(0, 1), pos(2, 2)],
            PlayerId::One,
        );
        let result = apply_action(
            &state,
            Action::Move {
                from: pos(1, 0),
                to: pos(1, 1),
            },
            0,
        );
        assert_eq!(
            result,
            Err(Rejection::NotYourPiece {
                player: PlayerId::One,
                position: pos(1, 0),
            })
        );
    }

    #[test]
    fn test_apply_action_rejects_own_piece_as_destination() {
        let state = movement_state(
            &[pos(0, 0), pos(1, 0), pos(2, 2)],
            &[pos(0, 1), pos(2, 1), pos(1, 2)],
            PlayerId::One,
        );
        let result = apply_action(
            &state,
            Action::Move {
                from: pos(0, 0),
                to: pos(1, 0),
            },
            0,
        );
        assert!(matches!(result, Err(Rejection::InvalidDestination { .. })));
    }

    #[test]
    fn test_ensure_turn() {
        let state = GameState::new(0);
        assert!(ensure_turn(&state, PlayerId::One).is_ok());
        assert_eq!(
            apply_action_as(&state, PlayerId::Two, Action::Place(pos(1, 1)), 0),
            Err(Rejection::NotYourTurn {
                expected: PlayerId::One,
                actual: PlayerId::Two,
            })
        );
    }

    #[test]
    fn test_boxing_in_a_player_completes_a_diagonal() {
        // Player two slides (2,1) -> (2,0); player one is then boxed in, which
        // on this board always means player two holds a diagonal
        let state = movement_state(
            &[pos(0, 0), pos(1, 0), pos(0, 1)],
            &[pos(1, 1), pos(2, 1), pos(0, 2)],
            PlayerId::Two,
        );
        assert_eq!(rules::check_winner(&state.pieces), None);

        let next = apply_action(
            &state,
            Action::Move {
                from: pos(2, 1),
                to: pos(2, 0),
            },
            0,
        )
        .unwrap();

        // (2,0) (1,1) (0,2) is also a diagonal, so alignment is reported first
        assert_eq!(next.winner, Some(PlayerId::Two));
        assert_eq!(next.end_reason, Some(EndReason::Alignment));
    }

    #[test]
    fn test_timeout() {
        let state = GameState::new(1_000);

        assert!(timeout_turn(&state, 60_999, 60_000).is_none());

        let timed_out = timeout_turn(&state, 61_000, 60_000).unwrap();
        assert_eq!(timed_out.status, GameStatus::Won);
        assert_eq!(timed_out.winner, Some(PlayerId::Two));
        assert_eq!(timed_out.end_reason, Some(EndReason::Timeout));
        assert_eq!(timed_out.total_game_time, 60_000);

        assert!(timeout_turn(&timed_out, 200_000, 60_000).is_none());
    }

    #[test]
    fn test_forfeit() {
        let state = apply_placement(&GameState::new(0), pos(1, 1), 0).unwrap();
        let ended = forfeit(&state, 0).unwrap();

        assert_eq!(ended.winner, Some(PlayerId::One));
        assert_eq!(ended.end_reason, Some(EndReason::Forfeit));
        assert_eq!(forfeit(&ended, 0), Err(Rejection::GameOver));
    }

    #[test]
    fn test_counters_saturate() {
        let mut state = GameState::new(0);
        state.turn_number = u32::MAX;
        state.total_game_time = u64::MAX - 1;

        let next = apply_placement(&state, pos(1, 1), 500).unwrap();
        assert_eq!(next.turn_number, u32::MAX);
        assert_eq!(next.total_game_time, u64::MAX);

        let ended = forfeit(&next, 1_000).unwrap();
        assert_eq!(ended.total_game_time, u64::MAX);
    }

    #[test]
    fn test_input_state_unchanged_after_commit() {
        let state = GameState::new(0);
        let before = state.clone();
        let _ = apply_placement(&state, pos(0, 0), 100).unwrap();
        assert_eq!(state, before);
    }
}
