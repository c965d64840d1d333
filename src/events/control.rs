use serde::{Deserialize, Serialize};
use std::fmt;

/// Направление навигации по слайдам
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Клавиша, которую получает каждое целевое окно
    pub fn key(self) -> NavKey {
        match self {
            Direction::Forward => NavKey::Right,
            Direction::Backward => NavKey::Left,
        }
    }
}

/// Клавиши, пересылаемые в окна просмотрщиков
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Left,
    Right,
}

impl NavKey {
    /// Имя keysym в формате xdotool
    pub fn keysym(self) -> &'static str {
        match self {
            NavKey::Left => "Left",
            NavKey::Right => "Right",
        }
    }
}

impl fmt::Display for NavKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keysym())
    }
}

/// Команда, пришедшая от пользователя контроллера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlEvent {
    Next,
    Previous,
    Reset,
    Quit,
}

impl fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlEvent::Next => "next",
            ControlEvent::Previous => "previous",
            ControlEvent::Reset => "reset",
            ControlEvent::Quit => "quit",
        };
        f.write_str(name)
    }
}
