use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::domain::{PlayerId, Score, MAX_NAME_LEN};

/// Игрок за столом Pontinho.
///
/// Одна запись живёт всю партию: очки, долг, метрики и флаг вылета.
/// Из ростера удаляется только до первой раунды или полным сбросом стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    /// Имя уже нормализовано (trim + верхний регистр).
    pub name: String,
    /// Текущие очки. Сразу после раунда могут быть отрицательными
    /// (игрок «лопнул»), до закрытия раунда это разрешается.
    pub score: Score,
    /// Сколько игрок должен в банк: вход + все перекупки.
    pub debt: Money,
    /// Отметка об оплате (только учёт, денег движок не двигает).
    pub has_paid: bool,
    /// Вылет окончательный: назад в этой партии не возвращаемся.
    pub eliminated: bool,
    /// Сколько раундов игрок закончил, не потеряв ни одного очка.
    ///
    /// Старые сохранения этого поля не знают – по умолчанию 0.
    #[serde(default)]
    pub rounds_won: u32,
    /// Самая большая потеря за один раунд.
    #[serde(default)]
    pub biggest_loss: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: String, score: Score, debt: Money) -> Self {
        Self {
            id,
            name,
            score,
            debt,
            has_paid: false,
            eliminated: false,
            rounds_won: 0,
            biggest_loss: 0,
        }
    }

    /// Игрок ещё в партии (может быть и с отрицательными очками до разбора).
    pub fn is_active(&self) -> bool {
        !self.eliminated
    }

    /// В партии и с неотрицательными очками.
    pub fn is_standing(&self) -> bool {
        !self.eliminated && self.score >= 0
    }

    /// Лопнул в последнем раунде и ещё не разобран.
    pub fn is_busted(&self) -> bool {
        !self.eliminated && self.score < 0
    }
}

/// Нормализация имени: обрезаем пробелы и переводим в верхний регистр.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Длина имени в символах (не в байтах – имена бывают с акцентами).
pub fn name_len(name: &str) -> usize {
    name.chars().count()
}

/// Проходит ли нормализованное имя ограничение по длине.
pub fn name_fits(name: &str) -> bool {
    name_len(name) <= MAX_NAME_LEN
}
