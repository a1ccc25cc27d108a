use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PlayerId;

/// Класс ошибки – то, как её показывать пользователю.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    /// Плохой ввод: операция отменена, состояние не тронуто.
    Validation,
    /// Операция недопустима в текущем состоянии партии.
    InvalidState,
}

/// Ошибки движка Pontinho.
///
/// Ни одна из них не фатальна: операция отменяется целиком,
/// `GameState` остаётся как был.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Введите имя игрока")]
    EmptyName,

    #[error("Имя слишком длинное (максимум 20 символов)")]
    NameTooLong,

    #[error("Активный игрок с именем {0} уже есть за столом")]
    DuplicateName(String),

    #[error("Потеря игрока {player_id} не может быть отрицательной ({loss})")]
    NegativeLoss { player_id: PlayerId, loss: i64 },

    #[error("Потеря игрока {player_id} слишком большая ({loss})")]
    LossTooLarge { player_id: PlayerId, loss: i64 },

    #[error("В раунде указан игрок {0}, которого нет за столом")]
    UnknownRoundPlayer(PlayerId),

    #[error("Неверная сумма: {0}")]
    InvalidAmount(String),

    #[error("Неверные настройки стола: {0}")]
    InvalidConfig(String),

    #[error("Игрок {0} не найден за столом")]
    UnknownPlayer(PlayerId),

    #[error("Нельзя удалять или пересаживать игроков во время партии")]
    GameAlreadyStarted,

    #[error("Добавьте хотя бы 2 игроков")]
    NotEnoughPlayers,

    #[error("Нечего отменять")]
    NothingToUndo,

    #[error("Партия завершена – начните новую или перезапустите")]
    GameFinished,

    #[error("Есть игроки с отрицательными очками – сначала закройте раунд")]
    UnresolvedBust,

    #[error("Раунд ещё не закрыт: ждём решения о перекупке")]
    RoundInProgress,

    #[error("Нет ожидающего решения о перекупке")]
    NoPendingRebuy,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::EmptyName
            | EngineError::NameTooLong
            | EngineError::DuplicateName(_)
            | EngineError::NegativeLoss { .. }
            | EngineError::LossTooLarge { .. }
            | EngineError::UnknownRoundPlayer(_)
            | EngineError::InvalidAmount(_)
            | EngineError::InvalidConfig(_) => ErrorKind::Validation,

            EngineError::UnknownPlayer(_)
            | EngineError::GameAlreadyStarted
            | EngineError::NotEnoughPlayers
            | EngineError::NothingToUndo
            | EngineError::GameFinished
            | EngineError::UnresolvedBust
            | EngineError::RoundInProgress
            | EngineError::NoPendingRebuy => ErrorKind::InvalidState,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}
