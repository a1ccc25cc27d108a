use tracing::debug;

use crate::domain::game::GameState;
use crate::domain::PlayerId;

/// Текущий дилер.
///
/// - Подготовка: первый в замороженной рассадке, а если она ещё не
///   заморожена – первый не вылетевший игрок ростера.
/// - Партия: `original_order[dealer_index]`; индекс за пределами читается как 0.
pub fn current_dealer(state: &GameState) -> Option<PlayerId> {
    if state.current_round == 0 {
        if let Some(first) = state.original_order.first() {
            return Some(*first);
        }
        return state.active_players().next().map(|p| p.id);
    }

    if state.original_order.is_empty() {
        return None;
    }
    let idx = clamped_index(state);
    Some(state.original_order[idx])
}

/// Передать раздачу следующему не вылетевшему по кругу.
///
/// Не больше `original_order.len()` шагов: если вылетели все,
/// индекс остаётся там, где закончился полный круг.
/// Вызывается после разбора «лопнувших», чтобы видеть итоговые вылеты.
pub fn advance(state: &mut GameState) {
    let len = state.original_order.len();
    if len == 0 {
        return;
    }

    state.dealer_index = clamped_index(state);

    for _ in 0..len {
        state.dealer_index = (state.dealer_index + 1) % len;

        let pid = state.original_order[state.dealer_index];
        if state.player(pid).map_or(false, |p| !p.eliminated) {
            debug!(dealer = pid, dealer_index = state.dealer_index, "dealer advanced");
            return;
        }
    }
}

fn clamped_index(state: &GameState) -> usize {
    if state.dealer_index >= state.original_order.len() {
        0
    } else {
        state.dealer_index
    }
}
