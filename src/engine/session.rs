// src/engine/session.rs

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::config::GameConfig;
use crate::domain::game::{GamePhase, GameState};
use crate::domain::money::Money;
use crate::domain::round::RoundDeltas;
use crate::domain::{PlayerId, RoundNumber, STARTING_SCORE};
use crate::engine::bust::{BustEvent, BustResolver, BustStep, RebuyDecision, RebuyOffer};
use crate::engine::errors::EngineError;
use crate::engine::round::{self, RoundInput};
use crate::engine::settlement::{self, Settlement, WinnerInfo};
use crate::engine::{dealer, registry, undo};
use crate::infra::persistence::GameStore;
use crate::infra::prompt::{ConfirmationPrompter, Notifier, Severity};

pub const ALL_ZERO_TITLE: &str = "Все нули?";
pub const ALL_ZERO_MESSAGE: &str = "Все значения нулевые. Точно закрыть этот раунд?";
pub const NEW_TABLE_TITLE: &str = "Новый стол";
pub const NEW_TABLE_MESSAGE: &str = "Закончить текущую игру и начать новый стол?";
pub const RESTART_TITLE: &str = "Перезапуск партии";
pub const RESTART_MESSAGE: &str = "Перезапустить партию с теми же игроками?";

/// Итог закрытого раунда.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: RoundNumber,
    pub deltas: RoundDeltas,
    pub events: Vec<BustEvent>,
    /// Дилер следующего раунда.
    pub dealer: Option<PlayerId>,
    pub winner: Option<WinnerInfo>,
}

/// Где сейчас раунд.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundProgress {
    /// Раунд применён, ждём ответа по перекупке.
    AwaitingRebuy(RebuyOffer),
    /// Раунд закрыт: все разобраны, дилер передан, состояние сохранено.
    Closed(RoundSummary),
}

/// Раунд, который применён, но ещё не разобран до конца.
struct PendingRound {
    deltas: RoundDeltas,
    resolver: BustResolver,
}

/// Заголовок и текст вопроса о перекупке.
pub fn rebuy_prompt(offer: &RebuyOffer, friendly: bool) -> (String, String) {
    let title = format!("{} ЛОПНУЛ!", offer.name);
    let message = if friendly {
        format!("Очки: {}. Вернуться в игру?", offer.score)
    } else {
        format!("Очки: {}. Оплатить перекупку ({})?", offer.score, offer.cost)
    };
    (title, message)
}

/// Привести загруженное состояние к виду, с которым можно играть дальше.
fn settle_loaded(mut state: GameState) -> Option<GameState> {
    if !state.has_unresolved_bust() {
        return Some(state);
    }
    if undo::restore(&mut state).is_ok() && !state.has_unresolved_bust() {
        warn!(round = state.current_round, "saved game had an unresolved bust, rolled back");
        return Some(state);
    }
    warn!("saved game has an unresolved bust and no undo point, ignored");
    None
}

/// Стол целиком: состояние + хранилище + уведомления.
///
/// Все команды верхнего уровня идут через сессию. Пока раунд ждёт
/// решения о перекупке, любая другая изменяющая команда отклоняется
/// (`RoundInProgress`): разбор одного раунда не перемежается с другими
/// изменениями. Состояние сохраняется только после полностью закрытой
/// операции.
pub struct GameSession<S: GameStore, N: Notifier> {
    state: GameState,
    store: S,
    notifier: N,
    pending: Option<PendingRound>,
}

impl<S: GameStore, N: Notifier> GameSession<S, N> {
    /// Новый пустой стол. Сразу сохраняется.
    pub fn new(store: S, notifier: N, config: GameConfig) -> Self {
        let mut session = Self::with_state(GameState::new(config), store, notifier);
        session.persist();
        session
    }

    /// Продолжить сохранённую игру, если она есть.
    ///
    /// Сохранение с неразобранным «лопнувшим» откатывается к точке отката;
    /// если откатываться некуда, сохранение отвергается.
    pub fn resume(store: S, notifier: N) -> Result<Self, (S, N)> {
        match store.load().and_then(settle_loaded) {
            Some(state) => {
                info!(
                    players = state.players.len(),
                    current_round = state.current_round,
                    "saved game resumed"
                );
                Ok(Self::with_state(state, store, notifier))
            }
            None => Err((store, notifier)),
        }
    }

    /// Продолжить сохранённую игру или начать новую с `config`.
    pub fn open(store: S, notifier: N, config: GameConfig) -> Self {
        match Self::resume(store, notifier) {
            Ok(session) => session,
            Err((store, notifier)) => Self::new(store, notifier, config),
        }
    }

    pub fn with_state(state: GameState, store: S, notifier: N) -> Self {
        Self {
            state,
            store,
            notifier,
            pending: None,
        }
    }

    // ---------- чтение ----------

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn current_dealer(&self) -> Option<PlayerId> {
        dealer::current_dealer(&self.state)
    }

    pub fn total_pot(&self) -> Money {
        settlement::total_pot(&self.state)
    }

    pub fn winner_info(&self) -> Option<WinnerInfo> {
        settlement::winner_info(&self.state)
    }

    pub fn settlement(&self) -> Settlement {
        settlement::settlement(&self.state)
    }

    pub fn can_undo(&self) -> bool {
        self.pending.is_none() && undo::can_undo(&self.state)
    }

    /// Предложение перекупки, на котором стоит раунд.
    pub fn pending_offer(&self) -> Option<&RebuyOffer> {
        self.pending.as_ref().and_then(|p| p.resolver.pending())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ---------- ростер ----------

    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, EngineError> {
        self.ensure_idle()?;
        let res = registry::add_player(&mut self.state, name);
        let id = self.report(res)?;
        self.persist();

        if let Some(p) = self.state.player(id) {
            let msg = if self.state.current_round > 0 {
                format!("{} вошёл с {} очками!", p.name, p.score)
            } else {
                format!("{} за столом!", p.name)
            };
            self.notifier.notify(&msg, Severity::Success);
        }
        Ok(id)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let res = registry::remove_player(&mut self.state, id);
        let removed = self.report(res)?;
        self.persist();
        self.notifier
            .notify(&format!("{} убран со стола", removed.name), Severity::Info);
        Ok(())
    }

    pub fn toggle_payment(&mut self, id: PlayerId) -> Result<Option<bool>, EngineError> {
        self.ensure_idle()?;
        let res = registry::toggle_payment(&mut self.state, id);
        let toggled = self.report(res)?;

        if let (Some(paid), Some(p)) = (toggled, self.state.player(id)) {
            let (msg, severity) = if paid {
                (format!("{} оплатил!", p.name), Severity::Success)
            } else {
                (format!("Оплата {} снята", p.name), Severity::Info)
            };
            self.persist();
            self.notifier.notify(&msg, severity);
        }
        Ok(toggled)
    }

    pub fn move_player(&mut self, src: PlayerId, target: PlayerId) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let res = registry::move_player(&mut self.state, src, target);
        self.report(res)?;
        self.persist();
        Ok(())
    }

    // ---------- партия ----------

    pub fn start_game(&mut self) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let res = round::start_game(&mut self.state);
        self.report(res)?;
        self.persist();

        let dealer_name = self
            .current_dealer()
            .and_then(|id| self.state.player(id))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "?".to_string());
        self.notifier.notify(
            &format!("Партия началась! Дилер: {dealer_name}"),
            Severity::Success,
        );
        Ok(())
    }

    /// Применить раунд и начать разбор «лопнувших».
    ///
    /// Подтверждение раунда из одних нулей – забота вызывающего
    /// (см. [`GameSession::play_round`]).
    pub fn submit_round(&mut self, input: &RoundInput) -> Result<RoundProgress, EngineError> {
        self.ensure_idle()?;
        let checked = round::validate_round(&self.state, input);
        self.report(checked)?;

        // Один снапшот на весь раунд вместе с перекупками и вылетами.
        undo::snapshot(&mut self.state);
        let res = round::apply_round(&mut self.state, input);
        let deltas = self.report(res)?;

        let mut resolver = BustResolver::new();
        match resolver.begin(&mut self.state) {
            BustStep::AwaitingRebuy(offer) => {
                self.pending = Some(PendingRound { deltas, resolver });
                Ok(RoundProgress::AwaitingRebuy(offer))
            }
            BustStep::Resolved => Ok(RoundProgress::Closed(self.close_round(deltas, resolver))),
        }
    }

    /// Ответ на текущее предложение перекупки.
    pub fn answer_rebuy(&mut self, decision: RebuyDecision) -> Result<RoundProgress, EngineError> {
        let Some(mut pending) = self.pending.take() else {
            return self.report(Err(EngineError::NoPendingRebuy));
        };

        let step = match pending.resolver.answer(&mut self.state, decision) {
            Ok(step) => step,
            Err(err) => {
                // Ответ отклонён до изменений: предложение по-прежнему ждёт.
                self.pending = Some(pending);
                return self.report(Err(err));
            }
        };

        match step {
            BustStep::AwaitingRebuy(offer) => {
                self.pending = Some(pending);
                Ok(RoundProgress::AwaitingRebuy(offer))
            }
            BustStep::Resolved => Ok(RoundProgress::Closed(
                self.close_round(pending.deltas, pending.resolver),
            )),
        }
    }

    /// Полный раунд с вопросами к человеку.
    ///
    /// Раунд из одних нулей сначала подтверждается; отказ – ничего не
    /// происходит (`Ok(None)`). Затем по одному, в порядке ростера,
    /// задаются вопросы о перекупке.
    pub fn play_round<P>(
        &mut self,
        input: &RoundInput,
        prompter: &mut P,
    ) -> Result<Option<RoundSummary>, EngineError>
    where
        P: ConfirmationPrompter + ?Sized,
    {
        self.ensure_idle()?;
        let checked = round::validate_round(&self.state, input);
        self.report(checked)?;

        if round::is_all_zero(input) && !prompter.ask(ALL_ZERO_TITLE, ALL_ZERO_MESSAGE) {
            return Ok(None);
        }

        let mut progress = self.submit_round(input)?;
        loop {
            match progress {
                RoundProgress::Closed(summary) => return Ok(Some(summary)),
                RoundProgress::AwaitingRebuy(offer) => {
                    let (title, message) = rebuy_prompt(&offer, self.state.config.is_friendly());
                    let answer = prompter.ask_or_dismiss(&title, &message);
                    let decision = RebuyDecision::from_answer(answer);
                    progress = self.answer_rebuy(decision)?;
                }
            }
        }
    }

    pub fn undo(&mut self) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let res = undo::restore(&mut self.state);
        self.report(res)?;
        self.persist();
        self.notifier.notify("Действие отменено!", Severity::Info);
        Ok(())
    }

    /// Закрыть стол и начать новый с другими настройками.
    ///
    /// Возвращает `false`, если пользователь не подтвердил.
    pub fn new_game<P>(&mut self, config: GameConfig, prompter: &mut P) -> Result<bool, EngineError>
    where
        P: ConfirmationPrompter + ?Sized,
    {
        self.ensure_idle()?;
        if !prompter.ask(NEW_TABLE_TITLE, NEW_TABLE_MESSAGE) {
            return Ok(false);
        }

        self.state = GameState::new(config);
        self.store.clear();

        info!(friendly = config.is_friendly(), "table reset");
        self.notifier.notify("Стол закрыт!", Severity::Info);
        Ok(true)
    }

    /// Перезапустить партию с тем же ростером: очки, долги и история –
    /// как на свежем столе.
    pub fn restart_match<P>(&mut self, prompter: &mut P) -> Result<bool, EngineError>
    where
        P: ConfirmationPrompter + ?Sized,
    {
        self.ensure_idle()?;
        if !prompter.ask(RESTART_TITLE, RESTART_MESSAGE) {
            return Ok(false);
        }

        let entry = self.state.config.entry;
        for p in self.state.players.iter_mut() {
            p.score = STARTING_SCORE;
            p.eliminated = false;
            p.rounds_won = 0;
            p.biggest_loss = 0;
            p.debt = entry;
            p.has_paid = false;
        }
        self.state.round_history.clear();
        self.state.current_round = 0;
        self.state.dealer_index = 0;
        self.state.undo_snapshot = None;
        self.state.original_order.clear();

        self.persist();
        info!(players = self.state.players.len(), "match restarted");
        self.notifier
            .notify("Партия успешно перезапущена!", Severity::Success);
        Ok(true)
    }

    // ---------- внутреннее ----------

    fn ensure_idle(&mut self) -> Result<(), EngineError> {
        if self.pending.is_some() {
            return self.report(Err(EngineError::RoundInProgress));
        }
        Ok(())
    }

    /// Сообщить об ошибке пользователю и пробросить её дальше.
    fn report<T>(&mut self, res: Result<T, EngineError>) -> Result<T, EngineError> {
        if let Err(err) = &res {
            let severity = if err.is_validation() {
                Severity::Error
            } else {
                Severity::Warning
            };
            self.notifier.notify(&err.to_string(), severity);
        }
        res
    }

    fn persist(&mut self) {
        self.store.save(&self.state);
    }

    /// Дилер передаётся только после разбора: он должен видеть итоговые вылеты.
    fn close_round(&mut self, deltas: RoundDeltas, resolver: BustResolver) -> RoundSummary {
        dealer::advance(&mut self.state);
        self.persist();

        let events = resolver.into_events();
        for event in &events {
            self.announce(event);
        }

        RoundSummary {
            round: self.state.current_round,
            deltas,
            events,
            dealer: self.current_dealer(),
            winner: self.winner_info(),
        }
    }

    fn announce(&mut self, event: &BustEvent) {
        let name_of = |id: PlayerId| {
            self.state
                .player(id)
                .map(|p| p.name.clone())
                .unwrap_or_default()
        };

        let (msg, severity) = match event {
            BustEvent::Rebought { player_id, score, .. } => (
                format!("{} вернулся с {} очками!", name_of(*player_id), score),
                Severity::Info,
            ),
            BustEvent::Eliminated { player_id } => {
                (format!("{} выбыл!", name_of(*player_id)), Severity::Error)
            }
            BustEvent::Winner { player_id, .. } => (
                format!("{} – ПОБЕДИТЕЛЬ!", name_of(*player_id)),
                Severity::Success,
            ),
        };
        self.notifier.notify(&msg, severity);
    }
}
