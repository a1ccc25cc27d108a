use serde::{Deserialize, Serialize};

use crate::domain::game::{GamePhase, GameState};
use crate::domain::player::Player;
use crate::engine::bust::RebuyOffer;
use crate::engine::session::GameSession;
use crate::engine::{dealer, settlement, undo};
use crate::infra::persistence::GameStore;
use crate::infra::prompt::Notifier;

use super::dto::{
    HistoryDto, HistoryEntryDto, HistoryRoundDto, PlayerDto, ScoreZone, SettlementDto,
    TableViewDto,
};

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Получить состояние стола.
    GetTable,

    /// История раундов.
    GetHistory,

    /// Расчёт: банк, победитель, кто сколько должен.
    GetSettlement,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QueryResponse {
    Table(TableViewDto),
    History(HistoryDto),
    Settlement(SettlementDto),
}

pub fn answer_query<S: GameStore, N: Notifier>(
    session: &GameSession<S, N>,
    query: &Query,
) -> QueryResponse {
    match query {
        Query::GetTable => QueryResponse::Table(table_view(session)),
        Query::GetHistory => QueryResponse::History(build_history(session.state())),
        Query::GetSettlement => QueryResponse::Settlement(build_settlement(session.state())),
    }
}

/// DTO стола для сессии (с учётом ожидающей перекупки).
pub fn table_view<S: GameStore, N: Notifier>(session: &GameSession<S, N>) -> TableViewDto {
    build_table_view(session.state(), session.pending_offer())
}

/// Сформировать DTO стола из состояния.
///
/// До первого раунда игроки идут в порядке рассадки; после – сначала
/// активные, внутри по убыванию очков (сортировка стабильная).
pub fn build_table_view(state: &GameState, pending: Option<&RebuyOffer>) -> TableViewDto {
    let dealer = dealer::current_dealer(state);
    let last = state.round_history.last();

    let mut ordered: Vec<&Player> = state.players.iter().collect();
    if state.current_round > 0 {
        ordered.sort_by(|a, b| {
            a.eliminated
                .cmp(&b.eliminated)
                .then_with(|| b.score.cmp(&a.score))
        });
    }

    let players = ordered
        .into_iter()
        .map(|p| PlayerDto {
            player_id: p.id,
            name: p.name.clone(),
            score: p.score,
            zone: ScoreZone::of(p.score),
            debt: p.debt,
            has_paid: p.has_paid,
            eliminated: p.eliminated,
            is_dealer: dealer == Some(p.id),
            last_round_loss: last.and_then(|r| r.loss_of(p.id)),
            rounds_won: p.rounds_won,
            biggest_loss: p.biggest_loss,
        })
        .collect();

    TableViewDto {
        friendly: state.config.is_friendly(),
        entry: state.config.entry,
        rebuy: state.config.rebuy,
        current_round: state.current_round,
        total_pot: settlement::total_pot(state),
        active_count: state.active_count(),
        total_count: state.players.len(),
        dealer,
        can_undo: pending.is_none() && undo::can_undo(state),
        finished: state.phase() == GamePhase::Finished,
        players,
        pending_rebuy: pending.cloned(),
    }
}

/// История: новые раунды сверху, имена – как были на момент раунда.
pub fn build_history(state: &GameState) -> HistoryDto {
    let rounds = state
        .round_history
        .iter()
        .rev()
        .map(|record| HistoryRoundDto {
            round: record.round,
            entries: record
                .scores
                .iter()
                .map(|(&player_id, &loss)| {
                    let name = record
                        .name_of(player_id)
                        .map(str::to_string)
                        .or_else(|| state.player(player_id).map(|p| p.name.clone()))
                        .unwrap_or_else(|| format!("#{player_id}"));
                    HistoryEntryDto {
                        player_id,
                        name,
                        loss,
                    }
                })
                .collect(),
        })
        .collect();

    HistoryDto { rounds }
}

pub fn build_settlement(state: &GameState) -> SettlementDto {
    let s = settlement::settlement(state);
    SettlementDto {
        friendly: s.friendly,
        total_pot: settlement::total_pot(state),
        winner: s.winner,
        losers: s.losers,
        paid: s.paid,
        pending: s.pending,
    }
}
