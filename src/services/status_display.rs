use crate::debug_if_enabled;
use std::io::{IsTerminal, Write};
use tracing::warn;

/// Экранное отображение часов контроллера
pub trait StatusDisplay: Send {
    fn show(&mut self, status: &str);
}

/// Строка состояния в терминале контроллера (stderr, перезаписывается через `\r`)
pub struct TerminalStatus {
    interactive: bool,
    last: String,
}

impl TerminalStatus {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stderr().is_terminal(),
            last: String::new(),
        }
    }
}

impl Default for TerminalStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusDisplay for TerminalStatus {
    fn show(&mut self, status: &str) {
        if status == self.last {
            return;
        }
        self.last = status.to_string();

        if !self.interactive {
            debug_if_enabled!("Часы: {}", status);
            return;
        }

        let mut stderr = std::io::stderr().lock();
        if let Err(e) = write!(stderr, "\r\x1b[2K{}", status).and_then(|_| stderr.flush()) {
            warn!("Не удалось обновить строку состояния: {}", e);
        }
    }
}

impl Drop for TerminalStatus {
    fn drop(&mut self) {
        if self.interactive && !self.last.is_empty() {
            // Терминал может быть ещё в raw-режиме
            eprint!("\r\n");
        }
    }
}
