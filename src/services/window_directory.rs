use crate::error::{RelayError, Result};
use crate::events::WindowHandle;
use crate::services::WindowSystem;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Кэш "заголовок -> окно" на всё время работы процесса.
///
/// Заголовки задаются при старте и считаются стабильными, поэтому каждый
/// заголовок ищется во внешней системе не более одного раза. Неудачный поиск
/// не кэшируется.
pub struct WindowDirectory {
    system: Arc<dyn WindowSystem>,
    handles: HashMap<String, WindowHandle>,
}

impl WindowDirectory {
    pub fn new(system: Arc<dyn WindowSystem>) -> Self {
        Self {
            system,
            handles: HashMap::new(),
        }
    }

    pub fn system(&self) -> &Arc<dyn WindowSystem> {
        &self.system
    }

    pub async fn resolve(&mut self, title: &str) -> Result<WindowHandle> {
        if let Some(handle) = self.handles.get(title) {
            return Ok(handle.clone());
        }

        if title.is_empty() {
            return RelayError::window_not_found("пустой заголовок окна");
        }

        let found = self.system.search(title).await.map_err(|e| match e {
            not_found @ RelayError::WindowNotFound(_) => not_found,
            other => RelayError::WindowNotFound(format!("'{}': {}", title, other)),
        })?;

        let mut found = found.into_iter();
        let handle = match found.next() {
            Some(handle) => handle,
            None => return RelayError::window_not_found(format!("'{}'", title)),
        };

        let extra = found.count();
        if extra > 0 {
            warn!(
                "Заголовку '{}' соответствует {} окон, используем {}",
                title,
                extra + 1,
                handle
            );
        }

        info!("Окно '{}' -> {}", title, handle);
        self.handles.insert(title.to_string(), handle.clone());
        Ok(handle)
    }

    #[allow(dead_code)]
    pub fn cached(&self, title: &str) -> Option<&WindowHandle> {
        self.handles.get(title)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.handles.len()
    }
}
