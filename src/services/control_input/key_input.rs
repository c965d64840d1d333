use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::ControlEvent;
use crate::utils::terminal::RawModeGuard;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use std::sync::Arc;
use tracing::warn;

use super::r#trait::ControlSource;

/// Имя клавиши в терминах таблицы привязок
fn key_name(key: &KeyEvent) -> Option<String> {
    match key.code {
        KeyCode::Right => Some("right".to_string()),
        KeyCode::Left => Some("left".to_string()),
        KeyCode::Enter => Some(String::new()),
        KeyCode::Char(c) => Some(c.to_string()),
        _ => None,
    }
}

/// В raw-режиме терминал не превращает Ctrl+C в SIGINT
fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
}

fn map_key(config: &Config, key: &KeyEvent) -> Option<ControlEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if is_interrupt(key) {
        return Some(ControlEvent::Quit);
    }

    let name = key_name(key)?;
    let event = config.action_for(&name);
    if event.is_none() {
        warn!("Клавиша {:?} ни к чему не привязана", key.code);
    }
    event
}

/// Управление с терминала: каждое нажатие обрабатывается сразу, без Enter
pub struct KeyControlInput {
    events: EventStream,
    config: Arc<Config>,
    _raw_mode: RawModeGuard,
}

impl KeyControlInput {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let raw_mode = RawModeGuard::enable()?;
        Ok(Self {
            events: EventStream::new(),
            config,
            _raw_mode: raw_mode,
        })
    }
}

#[async_trait::async_trait]
impl ControlSource for KeyControlInput {
    async fn next_event(&mut self) -> Result<Option<ControlEvent>> {
        while let Some(event) = self.events.next().await {
            let Event::Key(key) = event? else {
                continue;
            };
            if let Some(event) = map_key(&self.config, &key) {
                debug_if_enabled!("Клавиша {:?} -> {}", key.code, event);
                return Ok(Some(event));
            }
        }
        Ok(None)
    }
}
