use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::domain::{PlayerId, RoundNumber, Score};
use crate::engine::bust::{BustEvent, RebuyOffer};
use crate::engine::session::RoundSummary;
use crate::engine::settlement::{LoserEntry, WinnerInfo};

/// Зона очков – как подсвечивать игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScoreZone {
    /// 50 и выше.
    Safe,
    /// 20..=49.
    Warning,
    /// 1..=19.
    Danger,
    /// 0 и ниже.
    Out,
}

impl ScoreZone {
    pub fn of(score: Score) -> Self {
        match score {
            s if s >= 50 => ScoreZone::Safe,
            s if s >= 20 => ScoreZone::Warning,
            s if s >= 1 => ScoreZone::Danger,
            _ => ScoreZone::Out,
        }
    }
}

/// DTO игрока за столом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerDto {
    pub player_id: PlayerId,
    pub name: String,
    pub score: Score,
    pub zone: ScoreZone,
    pub debt: Money,
    pub has_paid: bool,
    pub eliminated: bool,
    pub is_dealer: bool,
    /// Потеря в последнем раунде (если игрок в нём был).
    pub last_round_loss: Option<u32>,
    pub rounds_won: u32,
    pub biggest_loss: u32,
}

/// DTO стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableViewDto {
    pub friendly: bool,
    pub entry: Money,
    pub rebuy: Money,
    pub current_round: RoundNumber,
    pub total_pot: Money,
    pub active_count: usize,
    pub total_count: usize,
    pub dealer: Option<PlayerId>,
    pub can_undo: bool,
    pub finished: bool,
    /// После первого раунда: сначала активные, внутри – по убыванию очков.
    pub players: Vec<PlayerDto>,
    /// Ожидающее решение по перекупке, если раунд на паузе.
    pub pending_rebuy: Option<RebuyOffer>,
}

/// Одна строка истории.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntryDto {
    pub player_id: PlayerId,
    /// Имя на момент раунда (игрок мог быть удалён позже).
    pub name: String,
    pub loss: u32,
}

/// Один раунд истории.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRoundDto {
    pub round: RoundNumber,
    pub entries: Vec<HistoryEntryDto>,
}

/// История, новые раунды сверху.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryDto {
    pub rounds: Vec<HistoryRoundDto>,
}

/// Расчёт по столу.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettlementDto {
    pub friendly: bool,
    pub total_pot: Money,
    pub winner: Option<WinnerInfo>,
    pub losers: Vec<LoserEntry>,
    pub paid: Money,
    pub pending: Money,
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandResponse {
    /// Вернуть обновлённое состояние стола.
    Table(TableViewDto),

    /// Игрок добавлен.
    PlayerAdded { player_id: PlayerId, table: TableViewDto },

    /// Раунд стоит на паузе: нужно решение по перекупке.
    RebuyOffered {
        offer: RebuyOffer,
        table: TableViewDto,
    },

    /// Команда требует подтверждения: повторите её с `confirmed: true`.
    NeedsConfirmation { title: String, message: String },

    /// Раунд закрыт.
    RoundClosed {
        round: RoundNumber,
        events: Vec<BustEvent>,
        winner: Option<WinnerInfo>,
        table: TableViewDto,
    },
}

impl CommandResponse {
    pub fn round_closed(summary: RoundSummary, table: TableViewDto) -> Self {
        CommandResponse::RoundClosed {
            round: summary.round,
            events: summary.events,
            winner: summary.winner,
            table,
        }
    }

    /// Стол после команды, если он есть в ответе.
    pub fn table(&self) -> Option<&TableViewDto> {
        match self {
            CommandResponse::NeedsConfirmation { .. } => None,
            CommandResponse::Table(table)
            | CommandResponse::PlayerAdded { table, .. }
            | CommandResponse::RebuyOffered { table, .. }
            | CommandResponse::RoundClosed { table, .. } => Some(table),
        }
    }
}
