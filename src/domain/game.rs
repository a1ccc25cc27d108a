use serde::{Deserialize, Serialize};

use crate::domain::config::GameConfig;
use crate::domain::player::Player;
use crate::domain::round::RoundRecord;
use crate::domain::{PlayerId, RoundNumber, Score, STARTING_SCORE};

/// Фаза партии. Не хранится, всегда выводится из состояния.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    /// Раунд 0: ростер и рассадка свободно меняются.
    Setup,
    /// Идут раунды: ростер только пополняется поздним входом,
    /// рассадка заморожена.
    Active,
    /// Остался один игрок – победитель. Новые раунды не принимаются.
    Finished,
}

/// Единственная точка отката: глубокая копия изменяемой части состояния.
///
/// `next_id` и конфиг сюда не входят – после отката id не переиспользуются.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UndoSnapshot {
    pub players: Vec<Player>,
    pub round_history: Vec<RoundRecord>,
    pub current_round: RoundNumber,
    pub dealer_index: usize,
    pub original_order: Vec<PlayerId>,
}

/// Полное состояние стола.
///
/// Один экземпляр на всю программу; движок получает его по ссылке.
/// Сериализуется целиком (включая точку отката) как единый блоб.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameState {
    /// Порядок ростера = порядок посадки до первого раунда.
    pub players: Vec<Player>,
    pub config: GameConfig,
    /// Только дописывается (кроме отката и сброса).
    pub round_history: Vec<RoundRecord>,
    /// 0 – подготовка, 1+ – партия идёт.
    pub current_round: RoundNumber,
    pub next_id: PlayerId,
    /// Замороженная рассадка (id игроков) для ротации дилера.
    pub original_order: Vec<PlayerId>,
    /// Индекс в `original_order`.
    pub dealer_index: usize,
    pub undo_snapshot: Option<UndoSnapshot>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::friendly())
    }
}

impl GameState {
    /// Пустой стол с заданными денежными настройками.
    pub fn new(config: GameConfig) -> Self {
        Self {
            players: Vec::new(),
            config,
            round_history: Vec::new(),
            current_round: 0,
            next_id: 1,
            original_order: Vec::new(),
            dealer_index: 0,
            undo_snapshot: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.current_round == 0 {
            GamePhase::Setup
        } else if self.has_winner() {
            GamePhase::Finished
        } else {
            GamePhase::Active
        }
    }

    /// Условие победы: ровно один не вылетевший, за столом больше одного
    /// игрока и хотя бы один вылетел.
    pub fn has_winner(&self) -> bool {
        self.active_count() == 1
            && self.players.len() > 1
            && self.players.iter().any(|p| p.eliminated)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn position_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Не вылетевшие игроки в порядке ростера.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active_players().count()
    }

    /// Есть ли неразобранные «лопнувшие» игроки.
    pub fn has_unresolved_bust(&self) -> bool {
        self.players.iter().any(|p| p.is_busted())
    }

    /// Заморожена ли рассадка.
    pub fn seating_frozen(&self) -> bool {
        !self.original_order.is_empty()
    }

    /// Заморозить рассадку по текущему ростеру (только не вылетевшие).
    /// Если уже заморожена – ничего не делает.
    pub fn freeze_seating(&mut self) {
        if self.original_order.is_empty() {
            self.original_order = self.active_players().map(|p| p.id).collect();
        }
    }

    /// Выдать следующий id. Id никогда не переиспользуются.
    pub fn allocate_id(&mut self) -> PlayerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Наименьшие положительные очки среди активных игроков.
    ///
    /// Порядок поиска:
    /// 1. минимум среди очков > 0;
    /// 2. иначе минимум среди очков >= 0;
    /// 3. иначе стартовые 99.
    ///
    /// `exclude` – игрок, которого не учитываем (тот, кто перекупается).
    pub fn lowest_positive_score(&self, exclude: Option<PlayerId>) -> Score {
        let candidates = || {
            self.players
                .iter()
                .filter(move |p| p.is_standing() && Some(p.id) != exclude)
                .map(|p| p.score)
        };

        candidates()
            .filter(|s| *s > 0)
            .min()
            .or_else(|| candidates().min())
            .unwrap_or(STARTING_SCORE)
    }
}
