use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Подтверждение «да/нет» от человека за столом.
///
/// Используется для перекупки, раунда из одних нулей, новой партии и
/// перезапуска. Вызывается последовательно, по одному вопросу за раз.
/// Закрытое без ответа окно `ask` обязан вернуть как `false`.
pub trait ConfirmationPrompter {
    fn ask(&mut self, title: &str, message: &str) -> bool;

    /// Как `ask`, но `None` – окно закрыли без ответа.
    fn ask_or_dismiss(&mut self, title: &str, message: &str) -> Option<bool> {
        Some(self.ask(title, message))
    }
}

/// Важность уведомления.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Уведомления для пользователя («тосты»). Ответ движку не нужен.
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

/// Заранее заданные ответы – для тестов и реплеев.
///
/// Когда ответы кончились, окно считается закрытым без ответа.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Заголовки заданных вопросов по порядку.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl ConfirmationPrompter for ScriptedPrompter {
    fn ask(&mut self, title: &str, message: &str) -> bool {
        self.ask_or_dismiss(title, message).unwrap_or(false)
    }

    fn ask_or_dismiss(&mut self, title: &str, _message: &str) -> Option<bool> {
        self.asked.push(title.to_string());
        self.answers.pop_front()
    }
}

/// Уведомления в лог через `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => info!(?severity, "{message}"),
            Severity::Warning => warn!("{message}"),
            Severity::Error => error!("{message}"),
        }
    }
}

/// Ничего не делает.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&mut self, _message: &str, _severity: Severity) {}
}

/// Запоминает уведомления – удобно проверять в тестах.
impl Notifier for Vec<(Severity, String)> {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.push((severity, message.to_string()));
    }
}
