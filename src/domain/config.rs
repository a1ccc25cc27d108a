use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::engine::errors::EngineError;

/// Денежные настройки стола.
///
/// Оба нуля – «дружеский» режим: долг не считается и не показывается,
/// а правила вылета и перекупки работают так же.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    /// Вход: долг, который игрок берёт на себя при посадке.
    pub entry: Money,
    /// Перекупка: сколько добавляется к долгу за каждое возвращение.
    pub rebuy: Money,
}

impl GameConfig {
    /// Дружеская игра, без денег.
    pub fn friendly() -> Self {
        Self {
            entry: Money::ZERO,
            rebuy: Money::ZERO,
        }
    }

    /// Игра на деньги: и вход, и перекупка обязаны быть больше нуля.
    pub fn staked(entry: Money, rebuy: Money) -> Result<Self, EngineError> {
        if entry.is_zero() || rebuy.is_zero() {
            return Err(EngineError::InvalidConfig(
                "вход и перекупка должны быть больше нуля".into(),
            ));
        }
        Ok(Self { entry, rebuy })
    }

    pub fn is_friendly(&self) -> bool {
        self.entry.is_zero() && self.rebuy.is_zero()
    }
}
