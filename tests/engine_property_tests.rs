use proptest::prelude::*;

use pontinho_engine::domain::{GameConfig, GamePhase, GameState, Money, PlayerId};
use pontinho_engine::engine::round::apply_round;
use pontinho_engine::engine::{
    registry, undo, EngineError, GameSession, RebuyDecision, RoundInput, RoundProgress,
};
use pontinho_engine::infra::{GameStore, InMemoryGameStore, NoopNotifier};

const NAMES: [&str; 6] = ["ANA", "BRUNO", "CARLA", "DIEGO", "ELISA", "FABIO"];

type PropSession = GameSession<InMemoryGameStore, NoopNotifier>;

// ---------- helpers ----------

fn entry() -> Money {
    Money::from_units(10)
}

fn rebuy() -> Money {
    Money::from_units(5)
}

fn new_session(players: usize) -> (PropSession, Vec<PlayerId>) {
    let config = GameConfig::staked(entry(), rebuy()).unwrap();
    let mut session = GameSession::new(InMemoryGameStore::new(), NoopNotifier, config);
    let ids = NAMES[..players]
        .iter()
        .map(|n| session.add_player(n).unwrap())
        .collect();
    session.start_game().unwrap();
    (session, ids)
}

/// Сыграть раунды, пока партия не закончится или не кончатся данные.
/// Возвращает число принятых перекупок.
fn play_out(session: &mut PropSession, rounds: &[Vec<u32>], answers: &[bool]) -> u64 {
    let mut rebuys = 0;
    let mut answer_no = 0;

    for losses in rounds {
        if session.phase() == GamePhase::Finished {
            break;
        }
        let input: RoundInput = session
            .state()
            .active_players()
            .zip(losses.iter().cycle())
            .map(|(p, &l)| (p.id, i64::from(l)))
            .collect();

        let mut progress = session.submit_round(&input).unwrap();
        while let RoundProgress::AwaitingRebuy(_) = progress {
            let accept = answers.get(answer_no % answers.len().max(1)).copied().unwrap_or(false);
            answer_no += 1;
            if accept {
                rebuys += 1;
            }
            let decision = if accept { RebuyDecision::Accept } else { RebuyDecision::Decline };
            progress = session.answer_rebuy(decision).unwrap();
        }
    }
    rebuys
}

fn losses_strategy() -> impl Strategy<Value = Vec<Vec<u32>>> {
    prop::collection::vec(prop::collection::vec(0u32..130, 1..6), 1..40)
}

// ---------- properties ----------

proptest! {
    #[test]
    fn round_subtracts_losses_and_advances_counter(
        players in 2usize..=6,
        raw in prop::collection::vec(0u32..200, 6),
    ) {
        let mut state = GameState::new(GameConfig::friendly());
        let ids: Vec<PlayerId> = NAMES[..players]
            .iter()
            .map(|n| registry::add_player(&mut state, n).unwrap())
            .collect();
        let input: RoundInput = ids.iter().zip(&raw).map(|(&id, &l)| (id, i64::from(l))).collect();
        let before = state.current_round;

        apply_round(&mut state, &input).unwrap();

        prop_assert_eq!(state.current_round, before + 1);
        for (&id, &l) in ids.iter().zip(&raw) {
            prop_assert_eq!(state.player(id).unwrap().score, 99 - l as i32);
        }
    }

    #[test]
    fn pot_always_matches_entries_and_rebuys(
        players in 2usize..=6,
        rounds in losses_strategy(),
        answers in prop::collection::vec(any::<bool>(), 1..10),
    ) {
        let (mut session, _) = new_session(players);
        let rebuys = play_out(&mut session, &rounds, &answers);

        let expected = Money::from_cents(
            entry().cents() * players as u64 + rebuy().cents() * rebuys,
        );
        prop_assert_eq!(session.total_pot(), expected);
        let debts: Money = session.state().players.iter().map(|p| p.debt).sum();
        prop_assert_eq!(session.total_pot(), debts);
    }

    #[test]
    fn dealer_is_never_eliminated_while_someone_plays(
        players in 2usize..=6,
        rounds in losses_strategy(),
        answers in prop::collection::vec(any::<bool>(), 1..10),
    ) {
        let (mut session, _) = new_session(players);
        play_out(&mut session, &rounds, &answers);

        let state = session.state();
        prop_assert!(!state.has_unresolved_bust());
        if state.active_count() > 0 {
            let dealer = session.current_dealer().and_then(|id| state.player(id));
            prop_assert!(dealer.map_or(false, |d| !d.eliminated));
        }
    }

    #[test]
    fn saved_state_equals_live_state(
        players in 2usize..=6,
        rounds in losses_strategy(),
        answers in prop::collection::vec(any::<bool>(), 1..10),
    ) {
        let (mut session, _) = new_session(players);
        play_out(&mut session, &rounds, &answers);

        let stored = session.store().load();
        prop_assert_eq!(stored.as_ref(), Some(session.state()));
    }

    #[test]
    fn finished_game_has_exactly_one_player_left(
        players in 2usize..=6,
        rounds in losses_strategy(),
    ) {
        let (mut session, _) = new_session(players);
        // Отказ от всех перекупок.
        play_out(&mut session, &rounds, &[false]);

        if session.phase() == GamePhase::Finished {
            prop_assert_eq!(session.state().active_count(), 1);
            prop_assert!(session.winner_info().is_some());
        }
    }

    #[test]
    fn second_undo_in_a_row_fails(
        players in 2usize..=6,
        rounds in losses_strategy(),
    ) {
        let (mut session, _) = new_session(players);
        play_out(&mut session, &rounds[..1], &[true]);

        let mut state = session.state().clone();
        undo::restore(&mut state).unwrap();
        prop_assert_eq!(undo::restore(&mut state), Err(EngineError::NothingToUndo));
    }
}
