//! Test double that records every call in order.

use crate::error::{RelayError, Result};
use crate::events::{NavKey, WindowHandle};
use parking_lot::Mutex;
use std::collections::HashSet;

use super::r#trait::WindowSystem;

#[derive(Default)]
pub struct RecordingWindowSystem {
    calls: Mutex<Vec<String>>,
    missing: HashSet<String>,
    broken_activation: HashSet<String>,
    broken_keys: HashSet<String>,
}

impl RecordingWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Поиск этого заголовка ничего не находит
    pub fn with_missing(mut self, title: &str) -> Self {
        self.missing.insert(title.to_string());
        self
    }

    /// Активация окна с этим заголовком падает
    pub fn with_broken_activation(mut self, title: &str) -> Self {
        self.broken_activation.insert(title.to_string());
        self
    }

    /// Отправка клавиши в окно с этим заголовком падает
    pub fn with_broken_keys(mut self, title: &str) -> Self {
        self.broken_keys.insert(title.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn title_of(handle: &WindowHandle) -> &str {
        handle.as_str().trim_start_matches("id-")
    }
}

#[async_trait::async_trait]
impl WindowSystem for RecordingWindowSystem {
    async fn search(&self, title: &str) -> Result<Vec<WindowHandle>> {
        self.calls.lock().push(format!("search {}", title));
        if self.missing.contains(title) {
            return Ok(Vec::new());
        }
        Ok(vec![WindowHandle::new(format!("id-{}", title))])
    }

    async fn activate(&self, handle: &WindowHandle) -> Result<()> {
        self.calls
            .lock()
            .push(format!("activate {}", Self::title_of(handle)));
        if self.broken_activation.contains(Self::title_of(handle)) {
            return Err(RelayError::ExternalCommand {
                command: "windowactivate".to_string(),
                detail: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }

    async fn send_key(&self, handle: &WindowHandle, key: NavKey) -> Result<()> {
        self.calls
            .lock()
            .push(format!("key {} {}", Self::title_of(handle), key));
        if self.broken_keys.contains(Self::title_of(handle)) {
            return Err(RelayError::ExternalCommand {
                command: "key".to_string(),
                detail: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
