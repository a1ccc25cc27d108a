//! Движок подсчёта очков для карточной игры Понтинью.
//!
//! Слои:
//! - `domain` – данные стола (игроки, очки, долги, история);
//! - `engine` – правила: ростер, раунды, перекупка, дилер, откат, расчёт;
//! - `infra` – хранилище состояния и подтверждения/уведомления;
//! - `api` – сериализуемые команды, запросы и DTO.

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;
