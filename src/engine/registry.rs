//! Ростер: посадка, удаление, пересадка и отметка оплаты.

use tracing::{debug, info};

use crate::domain::game::{GamePhase, GameState};
use crate::domain::player::{name_fits, normalize_name, Player};
use crate::domain::{PlayerId, STARTING_SCORE};
use crate::engine::errors::EngineError;
use crate::engine::undo;

/// Проверить имя нового игрока и вернуть нормализованный вариант.
///
/// Дубликатом считается только совпадение с *не вылетевшим* игроком:
/// вылетевший может вернуться под тем же именем новой записью.
pub fn validate_new_name(state: &GameState, raw: &str) -> Result<String, EngineError> {
    let name = normalize_name(raw);

    if name.is_empty() {
        return Err(EngineError::EmptyName);
    }
    if !name_fits(&name) {
        return Err(EngineError::NameTooLong);
    }
    if state.active_players().any(|p| p.name == name) {
        return Err(EngineError::DuplicateName(name));
    }

    Ok(name)
}

/// Посадить игрока за стол.
///
/// До первого раунда игрок получает стартовые 99 очков; поздний вход
/// получает наименьшие положительные очки среди активных. Долг = вход.
/// Перед изменением снимается точка отката.
pub fn add_player(state: &mut GameState, raw_name: &str) -> Result<PlayerId, EngineError> {
    if state.phase() == GamePhase::Finished {
        return Err(EngineError::GameFinished);
    }
    let name = validate_new_name(state, raw_name)?;

    undo::snapshot(state);

    let late_entry = state.current_round > 0;
    let score = if late_entry {
        state.lowest_positive_score(None)
    } else {
        STARTING_SCORE
    };

    let id = state.allocate_id();
    let debt = state.config.entry;
    state.players.push(Player::new(id, name, score, debt));

    // Пока рассадка не заморожена, её определяет порядок ростера.
    if state.seating_frozen() {
        state.original_order.push(id);
    }

    if late_entry {
        debug!(player_id = id, score, "late entry seeded from lowest positive score");
    }
    info!(player_id = id, score, late_entry, "player added");

    Ok(id)
}

/// Удалить игрока. Только до первого раунда.
pub fn remove_player(state: &mut GameState, id: PlayerId) -> Result<Player, EngineError> {
    if state.current_round > 0 {
        return Err(EngineError::GameAlreadyStarted);
    }
    let pos = state.position_of(id).ok_or(EngineError::UnknownPlayer(id))?;

    undo::snapshot(state);

    let removed = state.players.remove(pos);
    state.original_order.retain(|pid| *pid != id);

    info!(player_id = id, "player removed");
    Ok(removed)
}

/// Переключить отметку об оплате.
///
/// Если игрок ничего не должен – молча ничего не делаем (`Ok(None)`),
/// иначе возвращаем новое значение флага.
pub fn toggle_payment(state: &mut GameState, id: PlayerId) -> Result<Option<bool>, EngineError> {
    let player = state.player_mut(id).ok_or(EngineError::UnknownPlayer(id))?;

    if player.debt.is_zero() {
        return Ok(None);
    }

    player.has_paid = !player.has_paid;
    info!(player_id = id, has_paid = player.has_paid, "payment toggled");
    Ok(Some(player.has_paid))
}

/// Пересадить игрока `src` на место игрока `target` (до первого раунда).
///
/// После пересадки рассадка замораживается по новому порядку ростера.
pub fn move_player(state: &mut GameState, src: PlayerId, target: PlayerId) -> Result<(), EngineError> {
    if state.current_round > 0 {
        return Err(EngineError::GameAlreadyStarted);
    }
    let from = state.position_of(src).ok_or(EngineError::UnknownPlayer(src))?;
    let to = state.position_of(target).ok_or(EngineError::UnknownPlayer(target))?;

    let moved = state.players.remove(from);
    state.players.insert(to, moved);
    state.original_order = state.players.iter().map(|p| p.id).collect();

    debug!(player_id = src, position = to, "seat reordered");
    Ok(())
}
