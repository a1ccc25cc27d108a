use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{PlayerId, RoundNumber};

/// Сколько очков потерял каждый активный игрок за раунд.
pub type RoundDeltas = BTreeMap<PlayerId, u32>;

/// Запись одного раунда в истории.
///
/// Имена копируются в момент записи, чтобы история читалась и после
/// переименований или удаления игроков.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundRecord {
    pub round: RoundNumber,
    /// Только игроки, которые были в партии и получили значение.
    pub scores: RoundDeltas,
    #[serde(default)]
    pub player_names: BTreeMap<PlayerId, String>,
}

impl RoundRecord {
    /// Имя игрока на момент раунда.
    pub fn name_of(&self, player_id: PlayerId) -> Option<&str> {
        self.player_names.get(&player_id).map(String::as_str)
    }

    /// Потеря игрока в этом раунде, если он в нём участвовал.
    pub fn loss_of(&self, player_id: PlayerId) -> Option<u32> {
        self.scores.get(&player_id).copied()
    }
}
