use serde::{Deserialize, Serialize};

use crate::domain::game::GameState;
use crate::domain::money::Money;
use crate::domain::PlayerId;

/// Итог партии для победителя.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinnerInfo {
    pub player_id: PlayerId,
    pub name: String,
    /// Весь банк: долги всех игроков, включая вылетевших.
    pub total_pot: Money,
    /// Банк минус собственные вложения победителя.
    pub net_profit: Money,
}

/// Строка расчёта для вылетевшего игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoserEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub debt: Money,
    pub has_paid: bool,
}

/// Полный расчёт по столу.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settlement {
    pub winner: Option<WinnerInfo>,
    pub losers: Vec<LoserEntry>,
    pub paid: Money,
    pub pending: Money,
    pub friendly: bool,
}

/// Банк: сумма долгов всех игроков.
pub fn total_pot(state: &GameState) -> Money {
    state.players.iter().map(|p| p.debt).sum()
}

/// Победитель и его прибыль. Только когда партия действительно закончена.
pub fn winner_info(state: &GameState) -> Option<WinnerInfo> {
    if !state.has_winner() {
        return None;
    }
    let winner = state.active_players().next()?;
    let pot = total_pot(state);

    Some(WinnerInfo {
        player_id: winner.id,
        name: winner.name.clone(),
        total_pot: pot,
        net_profit: pot.saturating_sub(winner.debt),
    })
}

/// Расчёт: кто из вылетевших сколько должен и что уже оплачено.
pub fn settlement(state: &GameState) -> Settlement {
    let losers: Vec<LoserEntry> = state
        .players
        .iter()
        .filter(|p| p.eliminated)
        .map(|p| LoserEntry {
            player_id: p.id,
            name: p.name.clone(),
            debt: p.debt,
            has_paid: p.has_paid,
        })
        .collect();

    let paid = losers.iter().filter(|l| l.has_paid).map(|l| l.debt).sum();
    let pending = losers.iter().filter(|l| !l.has_paid).map(|l| l.debt).sum();

    Settlement {
        winner: winner_info(state),
        losers,
        paid,
        pending,
        friendly: state.config.is_friendly(),
    }
}
