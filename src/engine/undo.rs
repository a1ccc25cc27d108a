use tracing::info;

use crate::domain::game::{GameState, UndoSnapshot};
use crate::engine::errors::EngineError;

/// Снять точку отката. Предыдущая точка теряется – уровень один.
///
/// `clone()` здесь настоящая глубокая копия: дальнейшие изменения живого
/// состояния в снапшот не протекают.
pub fn snapshot(state: &mut GameState) {
    state.undo_snapshot = Some(UndoSnapshot {
        players: state.players.clone(),
        round_history: state.round_history.clone(),
        current_round: state.current_round,
        dealer_index: state.dealer_index,
        original_order: state.original_order.clone(),
    });
}

/// Откатиться к точке и сжечь её. Второй откат подряд – `NothingToUndo`.
pub fn restore(state: &mut GameState) -> Result<(), EngineError> {
    let snap = state.undo_snapshot.take().ok_or(EngineError::NothingToUndo)?;

    state.players = snap.players;
    state.round_history = snap.round_history;
    state.current_round = snap.current_round;
    state.dealer_index = snap.dealer_index;
    state.original_order = snap.original_order;

    info!(current_round = state.current_round, "state restored from undo snapshot");
    Ok(())
}

pub fn can_undo(state: &GameState) -> bool {
    state.undo_snapshot.is_some()
}
