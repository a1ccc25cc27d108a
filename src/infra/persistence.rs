use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::game::GameState;

/// Хранилище одного состояния стола.
///
/// Движку нужно только сохранить/загрузить/стереть один непрозрачный
/// блоб. Ошибки хранилища наружу не выходят: они логируются и
/// проглатываются, игра продолжается без сохранения.
pub trait GameStore {
    /// Сохранить состояние целиком (включая точку отката).
    fn save(&mut self, state: &GameState);

    /// Загрузить сохранённое состояние, если оно есть и читается.
    fn load(&self) -> Option<GameState>;

    /// Стереть сохранение.
    fn clear(&mut self);
}

/// Сериализовать состояние в блоб.
pub fn encode_state(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Разобрать блоб.
///
/// Старые сохранения без `rounds_won`/`biggest_loss` (и без других
/// полей) получают значения по умолчанию.
pub fn decode_state(blob: &str) -> Result<GameState, serde_json::Error> {
    serde_json::from_str(blob)
}

/// Простая in-memory реализация для тестов и симуляций.
///
/// Держит именно сериализованный блоб, чтобы путь сохранения/загрузки
/// был тем же, что и у файлового хранилища.
#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    blob: Option<String>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Хранилище с уже готовым блобом (например, из старой версии).
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl GameStore for InMemoryGameStore {
    fn save(&mut self, state: &GameState) {
        match encode_state(state) {
            Ok(blob) => self.blob = Some(blob),
            Err(err) => warn!(%err, "failed to encode game state"),
        }
    }

    fn load(&self) -> Option<GameState> {
        let blob = self.blob.as_deref()?;
        match decode_state(blob) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(%err, "stored game state is unreadable");
                None
            }
        }
    }

    fn clear(&mut self) {
        self.blob = None;
    }
}

/// Сохранение в JSON-файл на диске.
///
/// Запись идёт во временный файл рядом и затем переименовывается,
/// чтобы оборванная запись не портила прошлое сохранение.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn try_save(&self, state: &GameState) -> Result<(), Box<dyn std::error::Error>> {
        let blob = encode_state(state)?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl GameStore for JsonFileStore {
    fn save(&mut self, state: &GameState) {
        match self.try_save(state) {
            Ok(()) => debug!(path = %self.path.display(), "game state saved"),
            Err(err) => warn!(path = %self.path.display(), %err, "failed to save game state"),
        }
    }

    fn load(&self) -> Option<GameState> {
        let blob = match fs::read_to_string(&self.path) {
            Ok(blob) => blob,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to read game state");
                return None;
            }
        };

        match decode_state(&blob) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "stored game state is unreadable");
                None
            }
        }
    }

    fn clear(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path.display(), %err, "failed to clear game state"),
        }
    }
}
