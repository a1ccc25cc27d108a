//! Движок Понтинью: очки, долги, вылеты и победитель.
//!
//! Высокоуровневый объект: `GameSession`
//! Основные операции:
//!   - `add_player` / `remove_player` / `move_player` – ростер
//!   - `start_game` – зафиксировать рассадку и первого дилера
//!   - `submit_round` + `answer_rebuy` – раунд с пошаговым разбором «лопнувших»
//!   - `undo` – откат последнего действия

pub mod bust;
pub mod dealer;
pub mod errors;
pub mod registry;
pub mod round;
pub mod session;
pub mod settlement;
pub mod undo;

pub use bust::{BustEvent, BustResolver, BustStep, RebuyDecision, RebuyOffer, WinReason};
pub use errors::{EngineError, ErrorKind};
pub use round::RoundInput;
pub use session::{rebuy_prompt, GameSession, RoundProgress, RoundSummary};
pub use settlement::{LoserEntry, Settlement, WinnerInfo};
