//! Доменная модель Pontinho: игроки, деньги, настройки стола, история раундов
//! и агрегат состояния партии.

pub mod config;
pub mod game;
pub mod money;
pub mod player;
pub mod round;

// Базовые идентификаторы.
pub type PlayerId = u64;
pub type RoundNumber = u32;
/// Очки игрока. Знаковые: сразу после раунда бывают отрицательными.
pub type Score = i32;

/// Стартовые очки на свежем столе.
pub const STARTING_SCORE: Score = 99;
/// Очки, которые выставляются победителю при автоматической победе.
pub const WINNER_SCORE: Score = 99;
/// Максимальная длина имени (в символах).
pub const MAX_NAME_LEN: usize = 20;
/// Наибольшая потеря за раунд: столько очков можно вычесть без переполнения.
pub const MAX_ROUND_LOSS: u32 = Score::MAX as u32;
/// Минимум активных игроков, чтобы начать партию.
pub const MIN_PLAYERS_TO_START: usize = 2;

pub use config::*;
pub use game::*;
pub use money::*;
pub use player::*;
pub use round::*;
