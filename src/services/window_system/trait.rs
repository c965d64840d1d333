use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::events::{NavKey, WindowHandle};
use std::sync::Arc;

/// Внешние возможности оконной системы, которыми пользуется контроллер
#[async_trait::async_trait]
pub trait WindowSystem: Send + Sync {
    /// Все окна, заголовок которых точно совпадает с `title`
    async fn search(&self, title: &str) -> Result<Vec<WindowHandle>>;

    /// Вывести окно на передний план и дождаться подтверждения
    async fn activate(&self, handle: &WindowHandle) -> Result<()>;

    /// Нажать клавишу без модификаторов в активном окне
    async fn send_key(&self, handle: &WindowHandle, key: NavKey) -> Result<()>;

    /// Проверка доступности утилиты при старте
    async fn health_check(&self) -> Result<()>;
}

/// Factory function to create the window system backend selected in the config
pub fn create_window_system(config: &Config) -> Result<Arc<dyn WindowSystem>> {
    match config.windows.backend.as_str() {
        "dry-run" => Ok(Arc::new(super::dry_run::DryRunWindowSystem::new())),
        "xdotool" => Ok(Arc::new(super::xdotool::XdotoolWindowSystem::new(
            &config.windows.xdotool_path,
        ))),
        other => Err(RelayError::Config(anyhow::anyhow!(
            "Неизвестный backend окон: {}",
            other
        ))),
    }
}
