use pontinho_engine::domain::{GameConfig, GameState, PlayerId};
use pontinho_engine::engine::dealer::{advance, current_dealer};
use pontinho_engine::engine::registry;
use pontinho_engine::engine::round::start_game;

// ---------- helpers ----------

fn started(names: &[&str]) -> (GameState, Vec<PlayerId>) {
    let mut state = GameState::new(GameConfig::friendly());
    let ids: Vec<PlayerId> = names
        .iter()
        .map(|n| registry::add_player(&mut state, n).unwrap())
        .collect();
    start_game(&mut state).unwrap();
    (state, ids)
}

// ---------- tests ----------

#[test]
fn dealer_in_setup_is_first_roster_player() {
    let mut state = GameState::new(GameConfig::friendly());
    assert_eq!(current_dealer(&state), None);

    let a = registry::add_player(&mut state, "Alice").unwrap();
    registry::add_player(&mut state, "Bob").unwrap();
    assert_eq!(current_dealer(&state), Some(a));
}

#[test]
fn dealer_in_setup_follows_manual_seating() {
    let mut state = GameState::new(GameConfig::friendly());
    let a = registry::add_player(&mut state, "Alice").unwrap();
    let b = registry::add_player(&mut state, "Bob").unwrap();

    registry::move_player(&mut state, b, a).unwrap();
    assert_eq!(current_dealer(&state), Some(b));
}

#[test]
fn dealer_rotates_through_seating_and_wraps() {
    let (mut state, ids) = started(&["Alice", "Bob", "Carol"]);
    assert_eq!(current_dealer(&state), Some(ids[0]));

    advance(&mut state);
    assert_eq!(current_dealer(&state), Some(ids[1]));
    advance(&mut state);
    assert_eq!(current_dealer(&state), Some(ids[2]));
    advance(&mut state);
    assert_eq!(current_dealer(&state), Some(ids[0]));
}

#[test]
fn dealer_skips_eliminated_players() {
    let (mut state, ids) = started(&["Alice", "Bob", "Carol", "Dave"]);
    state.player_mut(ids[1]).unwrap().eliminated = true;
    state.player_mut(ids[2]).unwrap().eliminated = true;

    advance(&mut state);
    assert_eq!(current_dealer(&state), Some(ids[3]));
    advance(&mut state);
    assert_eq!(current_dealer(&state), Some(ids[0]));
}

#[test]
fn dealer_skips_ids_missing_from_roster() {
    let (mut state, ids) = started(&["Alice", "Bob", "Carol"]);
    state.players.retain(|p| p.id != ids[1]);

    advance(&mut state);
    assert_eq!(current_dealer(&state), Some(ids[2]));
}

#[test]
fn out_of_range_index_reads_and_advances_from_zero() {
    let (mut state, ids) = started(&["Alice", "Bob", "Carol"]);
    state.dealer_index = 17;

    assert_eq!(current_dealer(&state), Some(ids[0]));
    advance(&mut state);
    assert_eq!(current_dealer(&state), Some(ids[1]));
}

#[test]
fn advance_terminates_when_everyone_is_eliminated() {
    let (mut state, _) = started(&["Alice", "Bob"]);
    for p in state.players.iter_mut() {
        p.eliminated = true;
    }

    advance(&mut state);
    assert!(state.dealer_index < state.original_order.len());
}

#[test]
fn late_entry_joins_rotation_at_the_end() {
    let (mut state, ids) = started(&["Alice", "Bob"]);
    let carol = registry::add_player(&mut state, "Carol").unwrap();
    assert_eq!(state.original_order, vec![ids[0], ids[1], carol]);

    advance(&mut state);
    advance(&mut state);
    assert_eq!(current_dealer(&state), Some(carol));
}
