//! Старт партии и применение раунда.

use std::collections::BTreeMap;

use tracing::info;

use crate::domain::game::{GamePhase, GameState};
use crate::domain::round::{RoundDeltas, RoundRecord};
use crate::domain::{PlayerId, Score, MAX_ROUND_LOSS, MIN_PLAYERS_TO_START};
use crate::engine::errors::EngineError;

/// Сырой ввод раунда: сколько очков потерял каждый игрок.
///
/// Знаковый тип: ввод приходит из UI как есть, отрицательные значения
/// отсекаются валидацией.
pub type RoundInput = BTreeMap<PlayerId, i64>;

/// Все ли значения раунда нулевые (пустой ввод тоже считается нулевым).
///
/// Такой раунд вызывающая сторона обязана подтвердить отдельно.
pub fn is_all_zero(input: &RoundInput) -> bool {
    input.values().all(|v| *v == 0)
}

/// Явный старт партии: заморозить рассадку, раунд = 1, дилер – первый.
pub fn start_game(state: &mut GameState) -> Result<(), EngineError> {
    if state.current_round > 0 {
        return Err(EngineError::GameAlreadyStarted);
    }
    if state.active_count() < MIN_PLAYERS_TO_START {
        return Err(EngineError::NotEnoughPlayers);
    }

    state.freeze_seating();
    state.current_round = 1;
    state.dealer_index = 0;

    info!(players = state.original_order.len(), "game started");
    Ok(())
}

/// Проверить ввод раунда, ничего не меняя.
pub fn validate_round(state: &GameState, input: &RoundInput) -> Result<(), EngineError> {
    if state.phase() == GamePhase::Finished {
        return Err(EngineError::GameFinished);
    }
    if state.has_unresolved_bust() {
        return Err(EngineError::UnresolvedBust);
    }
    if state.active_count() < MIN_PLAYERS_TO_START {
        return Err(EngineError::NotEnoughPlayers);
    }

    for (&player_id, &loss) in input {
        if loss < 0 {
            return Err(EngineError::NegativeLoss { player_id, loss });
        }
        if loss > i64::from(MAX_ROUND_LOSS) {
            return Err(EngineError::LossTooLarge { player_id, loss });
        }
        if state.player(player_id).is_none() {
            return Err(EngineError::UnknownRoundPlayer(player_id));
        }
    }

    Ok(())
}

/// Применить раунд.
///
/// Точку отката снимает вызывающий код – до этого вызова, чтобы раунд
/// и все его последствия (перекупки, вылеты) откатывались одним шагом.
///
/// Возвращает сырые потери для дальнейшей проверки «лопнувших».
pub fn apply_round(state: &mut GameState, input: &RoundInput) -> Result<RoundDeltas, EngineError> {
    validate_round(state, input)?;

    // Первый раунд без явного старта тоже замораживает рассадку.
    state.freeze_seating();

    let mut deltas = RoundDeltas::new();

    for player in state.players.iter_mut().filter(|p| p.is_active()) {
        let Some(&raw) = input.get(&player.id) else {
            continue;
        };
        let player_id = player.id;
        let too_large = |_| EngineError::LossTooLarge { player_id, loss: raw };
        let lost = u32::try_from(raw).map_err(too_large)?;
        let penalty = Score::try_from(lost).map_err(too_large)?;

        player.score = player.score.saturating_sub(penalty);
        if lost == 0 {
            player.rounds_won += 1;
        }
        if lost > player.biggest_loss {
            player.biggest_loss = lost;
        }

        deltas.insert(player.id, lost);
    }

    state.current_round += 1;
    state.round_history.push(RoundRecord {
        round: state.current_round,
        scores: deltas.clone(),
        player_names: state.players.iter().map(|p| (p.id, p.name.clone())).collect(),
    });

    info!(
        round = state.current_round,
        players = deltas.len(),
        "round committed"
    );

    Ok(deltas)
}
