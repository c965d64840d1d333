use crate::events::ControlEvent;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Переменная окружения с путём к файлу конфигурации
pub const CONFIG_PATH_ENV: &str = "SLIDE_RELAY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "slide-relay.toml";

// Стандартные привязки: стрелки в терминале приходят как ESC [ C / ESC [ D
static DEFAULT_BINDINGS: Lazy<Vec<KeyBinding>> = Lazy::new(|| {
    let mut bindings = Vec::new();
    let mut bind = |inputs: &[&str], action: ControlEvent| {
        for input in inputs {
            bindings.push(KeyBinding {
                input: input.to_string(),
                action,
            });
        }
    };

    bind(&["n", "next", "right", "", "\u{1b}[C"], ControlEvent::Next);
    bind(&["p", "prev", "previous", "left", "\u{1b}[D"], ControlEvent::Previous);
    bind(&["r", "reset"], ControlEvent::Reset);
    bind(&["q", "quit", "exit"], ControlEvent::Quit);

    bindings
});

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub windows: WindowsConfig,
    pub timer: TimerConfig,
    #[serde(default)]
    pub bindings: Vec<KeyBinding>,
    // Индекс для поиска привязок - не сериализуется, строится после загрузки
    #[serde(skip)]
    binding_index: HashMap<String, ControlEvent>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowsConfig {
    pub backend: String,
    pub targets: Vec<String>,
    pub controller_title: String,
    pub xdotool_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimerConfig {
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyBinding {
    pub input: String,
    pub action: ControlEvent,
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            windows: WindowsConfig {
                backend: "xdotool".to_string(),
                targets: vec![
                    "presentation.pdf".to_string(),
                    "presentation-notes.pdf".to_string(),
                ],
                controller_title: "slide-relay".to_string(),
                xdotool_path: "xdotool".to_string(),
            },
            timer: TimerConfig {
                tick_interval_ms: 1000,
            },
            bindings: DEFAULT_BINDINGS.clone(),
            binding_index: HashMap::new(),
        };
        config.build_binding_index();
        config
    }
}

impl Config {
    /// Загрузка: значения по умолчанию -> TOML файл -> переменные SLIDE_RELAY_*
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("SLIDE_RELAY_").ignore(&["config"]).split("__"));

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;
        config.build_binding_index();

        Ok(config)
    }

    /// Заменяет список целевых окон (позиционные аргументы CLI)
    pub fn with_targets(mut self, targets: Vec<String>) -> Result<Self> {
        if !targets.is_empty() {
            self.windows.targets = targets;
            self.validate()?;
        }
        Ok(self)
    }

    /// Строит индекс привязок для поиска за O(1)
    pub fn build_binding_index(&mut self) {
        self.binding_index = self
            .bindings
            .iter()
            .map(|binding| (binding.input.to_lowercase(), binding.action))
            .collect();
    }

    /// Действие для строки, введённой в терминале контроллера
    pub fn action_for(&self, input: &str) -> Option<ControlEvent> {
        // Escape-последовательности не трогаем, обычные слова сравниваем без регистра
        let trimmed = input.trim_matches(|c: char| c == ' ' || c == '\t' || c == '\r');
        self.binding_index.get(&trimmed.to_lowercase()).copied()
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timer.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "pretty" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация настроек окон
        match self.windows.backend.as_str() {
            "xdotool" | "dry-run" => {}
            _ => anyhow::bail!("Неизвестный backend окон: {}", self.windows.backend),
        }

        if self.windows.targets.is_empty() {
            anyhow::bail!("Список целевых окон пуст");
        }

        let mut seen = HashSet::new();
        for (i, title) in self.windows.targets.iter().enumerate() {
            if title.is_empty() {
                anyhow::bail!("Пустой заголовок целевого окна #{}", i + 1);
            }
            if !seen.insert(title.as_str()) {
                anyhow::bail!("Целевое окно '{}' указано дважды", title);
            }
        }

        if self.windows.controller_title.is_empty() {
            anyhow::bail!("controller_title не может быть пустым");
        }

        if self.windows.xdotool_path.is_empty() {
            anyhow::bail!("xdotool_path не может быть пустым");
        }

        // Валидация таймера
        if self.timer.tick_interval_ms < 100 {
            anyhow::bail!("tick_interval_ms должно быть минимум 100");
        }

        Ok(())
    }
}
