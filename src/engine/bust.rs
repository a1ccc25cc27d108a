//! Разбор «лопнувших» игроков после раунда: перекупка, вылет, победитель.
//!
//! Разбор пошаговый. Каждое предложение перекупки – точка приостановки:
//! следующий «лопнувший» не рассматривается, пока не пришёл ответ по
//! текущему. Счётчики пересчитываются на каждом шаге заново, потому что
//! предыдущие решения меняют, кто считается активным.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::game::GameState;
use crate::domain::money::Money;
use crate::domain::{PlayerId, Score, WINNER_SCORE};
use crate::engine::errors::EngineError;

/// Предложение перекупки, которое нужно подтвердить снаружи.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RebuyOffer {
    pub player_id: PlayerId,
    pub name: String,
    /// Текущие (отрицательные) очки.
    pub score: Score,
    /// С какими очками игрок вернётся, если согласится.
    pub return_score: Score,
    /// Сколько добавится к долгу.
    pub cost: Money,
}

/// Ответ на предложение перекупки.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RebuyDecision {
    Accept,
    Decline,
    /// Диалог закрыли без ответа – считается отказом.
    Dismissed,
}

impl RebuyDecision {
    pub fn accepted(self) -> bool {
        matches!(self, RebuyDecision::Accept)
    }

    /// `None` – ответа не было (закрыли окно).
    pub fn from_answer(answer: Option<bool>) -> Self {
        match answer {
            Some(true) => RebuyDecision::Accept,
            Some(false) => RebuyDecision::Decline,
            None => RebuyDecision::Dismissed,
        }
    }
}

/// Почему партия закончилась.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum WinReason {
    /// Лопнули двое и больше, устоял ровно один.
    MultipleBust,
    /// Лопнул игрок, и за столом остался единственный соперник.
    LastStanding,
    /// Лопнули все: побеждает первый по ростеру.
    AllBusted,
}

/// Что произошло при разборе (для уведомлений и истории).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BustEvent {
    Rebought {
        player_id: PlayerId,
        score: Score,
        debt: Money,
    },
    Eliminated {
        player_id: PlayerId,
    },
    Winner {
        player_id: PlayerId,
        reason: WinReason,
    },
}

/// Результат очередного шага разбора.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BustStep {
    /// Ждём решения по перекупке.
    AwaitingRebuy(RebuyOffer),
    /// Все разобраны.
    Resolved,
}

/// Пошаговый разбор одного раунда.
#[derive(Debug, Default)]
pub struct BustResolver {
    events: Vec<BustEvent>,
    pending: Option<RebuyOffer>,
    started: bool,
    finished: bool,
}

impl BustResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Начать разбор сразу после применения раунда.
    ///
    /// Сначала проверяется «двойной перебор»: если лопнули двое и больше,
    /// а устоял ровно один – он побеждает, остальные вылетают, перекупка
    /// никому не предлагается.
    pub fn begin(&mut self, state: &mut GameState) -> BustStep {
        if self.started {
            return self.current_step();
        }
        self.started = true;

        let busted: Vec<PlayerId> = state
            .players
            .iter()
            .filter(|p| p.is_busted())
            .map(|p| p.id)
            .collect();
        let standing: Vec<PlayerId> = state
            .players
            .iter()
            .filter(|p| p.is_standing())
            .map(|p| p.id)
            .collect();

        if busted.len() >= 2 && standing.len() == 1 {
            let winner = standing[0];
            for pid in busted {
                self.eliminate(state, pid);
            }
            self.crown(state, winner, WinReason::MultipleBust);
            self.finished = true;
            return BustStep::Resolved;
        }

        self.scan(state)
    }

    /// Применить решение по текущему предложению и продолжить разбор.
    pub fn answer(
        &mut self,
        state: &mut GameState,
        decision: RebuyDecision,
    ) -> Result<BustStep, EngineError> {
        let player_id = self
            .pending
            .as_ref()
            .map(|offer| offer.player_id)
            .ok_or(EngineError::NoPendingRebuy)?;
        if state.player(player_id).is_none() {
            return Err(EngineError::UnknownPlayer(player_id));
        }
        let offer = self.pending.take().ok_or(EngineError::NoPendingRebuy)?;

        if decision.accepted() {
            // Ищем минимум среди остальных: у самого игрока сейчас минус.
            let target = state.lowest_positive_score(Some(offer.player_id));
            let rebuy = state.config.rebuy;
            let player = state
                .player_mut(offer.player_id)
                .ok_or(EngineError::UnknownPlayer(offer.player_id))?;

            player.score = target;
            player.debt += rebuy;
            player.has_paid = false;

            info!(player_id = player.id, score = target, debt = %player.debt, "rebuy accepted");
            self.events.push(BustEvent::Rebought {
                player_id: player.id,
                score: target,
                debt: player.debt,
            });
        } else {
            info!(player_id = offer.player_id, ?decision, "rebuy declined");
            self.eliminate(state, offer.player_id);
        }

        Ok(self.scan(state))
    }

    /// Текущее предложение, если разбор стоит на паузе.
    pub fn pending(&self) -> Option<&RebuyOffer> {
        self.pending.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn events(&self) -> &[BustEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BustEvent> {
        self.events
    }

    /// Победитель, если разбор его объявил.
    pub fn winner(&self) -> Option<PlayerId> {
        self.events.iter().find_map(|e| match e {
            BustEvent::Winner { player_id, .. } => Some(*player_id),
            _ => None,
        })
    }

    fn current_step(&self) -> BustStep {
        match &self.pending {
            Some(offer) => BustStep::AwaitingRebuy(offer.clone()),
            None => BustStep::Resolved,
        }
    }

    /// Найти первого неразобранного по порядку ростера и решить его судьбу.
    fn scan(&mut self, state: &mut GameState) -> BustStep {
        let Some(buster) = state.players.iter().find(|p| p.is_busted()) else {
            self.finished = true;
            return BustStep::Resolved;
        };
        let buster_id = buster.id;

        let others: Vec<PlayerId> = state
            .players
            .iter()
            .filter(|p| p.id != buster_id && p.is_standing())
            .map(|p| p.id)
            .collect();

        match others.len() {
            0 => {
                // Лопнули все – побеждает этот, остальные с минусом вылетают.
                let rest: Vec<PlayerId> = state
                    .players
                    .iter()
                    .filter(|p| p.id != buster_id && p.is_busted())
                    .map(|p| p.id)
                    .collect();
                for pid in rest {
                    self.eliminate(state, pid);
                }
                self.crown(state, buster_id, WinReason::AllBusted);
                self.finished = true;
                BustStep::Resolved
            }
            1 => {
                self.eliminate(state, buster_id);
                self.crown(state, others[0], WinReason::LastStanding);
                self.finished = true;
                BustStep::Resolved
            }
            _ => {
                let offer = RebuyOffer {
                    player_id: buster_id,
                    name: buster.name.clone(),
                    score: buster.score,
                    return_score: state.lowest_positive_score(Some(buster_id)),
                    cost: state.config.rebuy,
                };
                info!(player_id = buster_id, score = offer.score, "rebuy offered");
                self.pending = Some(offer.clone());
                BustStep::AwaitingRebuy(offer)
            }
        }
    }

    fn eliminate(&mut self, state: &mut GameState, player_id: PlayerId) {
        if let Some(p) = state.player_mut(player_id) {
            p.eliminated = true;
            info!(player_id, score = p.score, "player eliminated");
            self.events.push(BustEvent::Eliminated { player_id });
        }
    }

    fn crown(&mut self, state: &mut GameState, player_id: PlayerId, reason: WinReason) {
        if let Some(p) = state.player_mut(player_id) {
            p.score = WINNER_SCORE;
            info!(player_id, ?reason, "winner declared");
            self.events.push(BustEvent::Winner { player_id, reason });
        }
    }
}
