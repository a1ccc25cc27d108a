use pontinho_engine::domain::{GameConfig, GamePhase, GameState, PlayerId, MAX_ROUND_LOSS};
use pontinho_engine::engine::errors::EngineError;
use pontinho_engine::engine::registry;
use pontinho_engine::engine::round::{apply_round, is_all_zero, start_game, validate_round, RoundInput};

// ---------- helpers ----------

fn table(names: &[&str]) -> (GameState, Vec<PlayerId>) {
    let mut state = GameState::new(GameConfig::friendly());
    let ids = names
        .iter()
        .map(|n| registry::add_player(&mut state, n).unwrap())
        .collect();
    (state, ids)
}

fn losses(pairs: &[(PlayerId, i64)]) -> RoundInput {
    pairs.iter().copied().collect()
}

fn score(state: &GameState, id: PlayerId) -> i32 {
    state.player(id).unwrap().score
}

// ---------- start_game ----------

#[test]
fn start_game_freezes_seating_and_sets_round_one() {
    let (mut state, ids) = table(&["Alice", "Bob", "Carol"]);

    start_game(&mut state).unwrap();

    assert_eq!(state.current_round, 1);
    assert_eq!(state.dealer_index, 0);
    assert_eq!(state.original_order, ids);
    assert_eq!(state.phase(), GamePhase::Active);
}

#[test]
fn start_game_needs_two_players_and_runs_once() {
    let (mut state, _) = table(&["Alice"]);
    assert_eq!(start_game(&mut state), Err(EngineError::NotEnoughPlayers));
    assert_eq!(state.current_round, 0);

    registry::add_player(&mut state, "Bob").unwrap();
    start_game(&mut state).unwrap();
    assert_eq!(start_game(&mut state), Err(EngineError::GameAlreadyStarted));
}

// ---------- apply_round ----------

#[test]
fn two_player_round_updates_scores_and_history() {
    let (mut state, ids) = table(&["Alice", "Bob"]);

    let deltas = apply_round(&mut state, &losses(&[(ids[0], 20), (ids[1], 10)])).unwrap();

    assert_eq!(score(&state, ids[0]), 79);
    assert_eq!(score(&state, ids[1]), 89);
    assert_eq!(state.current_round, 1);
    assert_eq!(state.round_history.len(), 1);
    assert_eq!(deltas.get(&ids[0]), Some(&20));

    let record = &state.round_history[0];
    assert_eq!(record.round, 1);
    assert_eq!(record.loss_of(ids[1]), Some(10));
    assert_eq!(record.name_of(ids[0]), Some("ALICE"));
}

#[test]
fn first_round_without_start_freezes_seating() {
    let (mut state, ids) = table(&["Alice", "Bob"]);
    apply_round(&mut state, &losses(&[(ids[0], 5), (ids[1], 5)])).unwrap();
    assert_eq!(state.original_order, ids);
}

#[test]
fn round_after_explicit_start_is_recorded_as_round_two() {
    let (mut state, ids) = table(&["Alice", "Bob"]);
    start_game(&mut state).unwrap();

    apply_round(&mut state, &losses(&[(ids[0], 5), (ids[1], 0)])).unwrap();

    assert_eq!(state.current_round, 2);
    assert_eq!(state.round_history[0].round, 2);
}

#[test]
fn missing_player_keeps_score() {
    let (mut state, ids) = table(&["Alice", "Bob", "Carol"]);

    let deltas = apply_round(&mut state, &losses(&[(ids[0], 15)])).unwrap();

    assert_eq!(score(&state, ids[1]), 99);
    assert_eq!(score(&state, ids[2]), 99);
    assert!(!deltas.contains_key(&ids[1]));
    assert_eq!(state.player(ids[1]).unwrap().rounds_won, 0);
}

#[test]
fn metrics_track_zero_rounds_and_biggest_loss() {
    let (mut state, ids) = table(&["Alice", "Bob"]);

    apply_round(&mut state, &losses(&[(ids[0], 0), (ids[1], 30)])).unwrap();
    apply_round(&mut state, &losses(&[(ids[0], 0), (ids[1], 12)])).unwrap();

    let alice = state.player(ids[0]).unwrap();
    let bob = state.player(ids[1]).unwrap();
    assert_eq!(alice.rounds_won, 2);
    assert_eq!(alice.biggest_loss, 0);
    assert_eq!(bob.rounds_won, 0);
    assert_eq!(bob.biggest_loss, 30);
}

#[test]
fn values_for_eliminated_players_are_ignored() {
    let (mut state, ids) = table(&["Alice", "Bob", "Carol"]);
    state.player_mut(ids[2]).unwrap().eliminated = true;
    let carol_before = score(&state, ids[2]);

    let deltas = apply_round(&mut state, &losses(&[(ids[0], 1), (ids[1], 2), (ids[2], 50)])).unwrap();

    assert_eq!(score(&state, ids[2]), carol_before);
    assert!(!deltas.contains_key(&ids[2]));
}

#[test]
fn negative_loss_is_rejected_atomically() {
    let (mut state, ids) = table(&["Alice", "Bob"]);
    let before = state.clone();

    let err = apply_round(&mut state, &losses(&[(ids[0], 10), (ids[1], -5)])).unwrap_err();

    assert_eq!(
        err,
        EngineError::NegativeLoss {
            player_id: ids[1],
            loss: -5
        }
    );
    assert!(err.is_validation());
    assert_eq!(state, before);
}

#[test]
fn unknown_player_in_round_is_rejected() {
    let (mut state, ids) = table(&["Alice", "Bob"]);
    let before = state.clone();

    assert_eq!(
        apply_round(&mut state, &losses(&[(ids[0], 1), (77, 3)])),
        Err(EngineError::UnknownRoundPlayer(77))
    );
    assert_eq!(state, before);
}

#[test]
fn round_rejected_while_bust_unresolved() {
    let (mut state, ids) = table(&["Alice", "Bob", "Carol"]);
    apply_round(&mut state, &losses(&[(ids[0], 120)])).unwrap();

    assert_eq!(
        validate_round(&state, &losses(&[(ids[1], 1)])),
        Err(EngineError::UnresolvedBust)
    );
}

#[test]
fn round_rejected_when_game_finished() {
    let (mut state, ids) = table(&["Alice", "Bob"]);
    start_game(&mut state).unwrap();
    state.player_mut(ids[1]).unwrap().eliminated = true;

    assert_eq!(
        apply_round(&mut state, &losses(&[(ids[0], 1)])),
        Err(EngineError::GameFinished)
    );
}

#[test]
fn round_needs_two_active_players() {
    let (mut state, ids) = table(&["Alice"]);
    assert_eq!(
        apply_round(&mut state, &losses(&[(ids[0], 1)])),
        Err(EngineError::NotEnoughPlayers)
    );
}

#[test]
fn all_zero_detection() {
    assert!(is_all_zero(&losses(&[(1, 0), (2, 0)])));
    assert!(is_all_zero(&RoundInput::new()));
    assert!(!is_all_zero(&losses(&[(1, 0), (2, 3)])));
}

#[test]
fn loss_beyond_score_range_is_rejected_untouched() {
    let (mut state, ids) = table(&["Alice", "Bob"]);
    let before = state.clone();

    let err = apply_round(&mut state, &losses(&[(ids[0], 5_000_000_000), (ids[1], 0)])).unwrap_err();

    assert_eq!(
        err,
        EngineError::LossTooLarge {
            player_id: ids[0],
            loss: 5_000_000_000,
        }
    );
    assert!(err.is_validation());
    assert_eq!(state, before);
}

#[test]
fn largest_allowed_loss_is_recorded_as_entered() {
    let (mut state, ids) = table(&["Alice", "Bob"]);
    let huge = i64::from(MAX_ROUND_LOSS);

    let deltas = apply_round(&mut state, &losses(&[(ids[0], huge), (ids[1], 0)])).unwrap();

    assert_eq!(deltas[&ids[0]], MAX_ROUND_LOSS);
    assert_eq!(state.round_history[0].loss_of(ids[0]), Some(MAX_ROUND_LOSS));
    assert_eq!(state.player(ids[0]).unwrap().biggest_loss, MAX_ROUND_LOSS);
    assert_eq!(score(&state, ids[0]), 99 - i32::MAX);
}
