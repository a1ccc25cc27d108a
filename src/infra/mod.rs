//! Инфраструктура вокруг движка:
//! - хранилище состояния стола (файл / память);
//! - подтверждения и уведомления для человека за столом.

pub mod persistence;
pub mod prompt;

pub use persistence::{GameStore, InMemoryGameStore, JsonFileStore};
pub use prompt::{ConfirmationPrompter, NoopNotifier, Notifier, ScriptedPrompter, Severity, TracingNotifier};
