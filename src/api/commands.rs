use serde::{Deserialize, Serialize};

use crate::domain::config::GameConfig;
use crate::domain::money::Money;
use crate::domain::PlayerId;
use crate::engine::bust::RebuyDecision;
use crate::engine::round::{self, RoundInput};
use crate::engine::session::{
    GameSession, RoundProgress, ALL_ZERO_MESSAGE, ALL_ZERO_TITLE, NEW_TABLE_MESSAGE,
    NEW_TABLE_TITLE, RESTART_MESSAGE, RESTART_TITLE,
};
use crate::infra::persistence::GameStore;
use crate::infra::prompt::{ConfirmationPrompter, Notifier};

use super::dto::CommandResponse;
use super::errors::ApiError;
use super::queries::table_view;

/// Команда верхнего уровня.
///
/// Команды, которые в интерфейсе требуют подтверждения, несут флаг
/// `confirmed`: без него вместо выполнения возвращается
/// `CommandResponse::NeedsConfirmation`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    AddPlayer { name: String },
    RemovePlayer { player_id: PlayerId },
    TogglePayment { player_id: PlayerId },
    /// Пересадить `player_id` на место `target` (только до старта).
    MovePlayer { player_id: PlayerId, target: PlayerId },
    StartGame,

    /// Потери за раунд. Раунд из одних нулей требует `confirmed`.
    SubmitRound {
        losses: RoundInput,
        #[serde(default)]
        confirmed: bool,
    },

    /// Ответ на текущее предложение перекупки.
    AnswerRebuy { decision: RebuyDecision },

    Undo,

    /// Новый стол. Нулевые суммы – дружеская игра.
    NewGame {
        entry: Money,
        rebuy: Money,
        #[serde(default)]
        confirmed: bool,
    },

    /// Перезапуск партии с тем же ростером.
    RestartMatch {
        #[serde(default)]
        confirmed: bool,
    },
}

/// Подтверждение, уже полученное клиентом вместе с командой.
struct Preconfirmed(bool);

impl ConfirmationPrompter for Preconfirmed {
    fn ask(&mut self, _title: &str, _message: &str) -> bool {
        self.0
    }
}

fn needs_confirmation(title: &str, message: &str) -> CommandResponse {
    CommandResponse::NeedsConfirmation {
        title: title.to_string(),
        message: message.to_string(),
    }
}

/// Настройки стола из сумм: обе нулевые – дружеская игра.
pub fn config_from_amounts(entry: Money, rebuy: Money) -> Result<GameConfig, ApiError> {
    if entry.is_zero() && rebuy.is_zero() {
        return Ok(GameConfig::friendly());
    }
    Ok(GameConfig::staked(entry, rebuy)?)
}

/// Выполнить команду над сессией.
pub fn execute<S: GameStore, N: Notifier>(
    session: &mut GameSession<S, N>,
    command: Command,
) -> Result<CommandResponse, ApiError> {
    match command {
        Command::AddPlayer { name } => {
            let player_id = session.add_player(&name)?;
            Ok(CommandResponse::PlayerAdded {
                player_id,
                table: table_view(session),
            })
        }

        Command::RemovePlayer { player_id } => {
            session.remove_player(player_id)?;
            Ok(CommandResponse::Table(table_view(session)))
        }

        Command::TogglePayment { player_id } => {
            session.toggle_payment(player_id)?;
            Ok(CommandResponse::Table(table_view(session)))
        }

        Command::MovePlayer { player_id, target } => {
            session.move_player(player_id, target)?;
            Ok(CommandResponse::Table(table_view(session)))
        }

        Command::StartGame => {
            session.start_game()?;
            Ok(CommandResponse::Table(table_view(session)))
        }

        Command::SubmitRound { losses, confirmed } => {
            if round::is_all_zero(&losses) && !confirmed {
                round::validate_round(session.state(), &losses)?;
                return Ok(needs_confirmation(ALL_ZERO_TITLE, ALL_ZERO_MESSAGE));
            }
            let progress = session.submit_round(&losses)?;
            Ok(progress_response(session, progress))
        }

        Command::AnswerRebuy { decision } => {
            let progress = session.answer_rebuy(decision)?;
            Ok(progress_response(session, progress))
        }

        Command::Undo => {
            session.undo()?;
            Ok(CommandResponse::Table(table_view(session)))
        }

        Command::NewGame {
            entry,
            rebuy,
            confirmed,
        } => {
            let config = config_from_amounts(entry, rebuy)?;
            if !session.new_game(config, &mut Preconfirmed(confirmed))? {
                return Ok(needs_confirmation(NEW_TABLE_TITLE, NEW_TABLE_MESSAGE));
            }
            Ok(CommandResponse::Table(table_view(session)))
        }

        Command::RestartMatch { confirmed } => {
            if !session.restart_match(&mut Preconfirmed(confirmed))? {
                return Ok(needs_confirmation(RESTART_TITLE, RESTART_MESSAGE));
            }
            Ok(CommandResponse::Table(table_view(session)))
        }
    }
}

fn progress_response<S: GameStore, N: Notifier>(
    session: &GameSession<S, N>,
    progress: RoundProgress,
) -> CommandResponse {
    let table = table_view(session);
    match progress {
        RoundProgress::AwaitingRebuy(offer) => CommandResponse::RebuyOffered { offer, table },
        RoundProgress::Closed(summary) => CommandResponse::round_closed(summary, table),
    }
}
