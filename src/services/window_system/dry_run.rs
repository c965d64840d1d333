use crate::error::Result;
use crate::events::{NavKey, WindowHandle};
use parking_lot::Mutex;
use tracing::info;

use super::r#trait::WindowSystem;

#[derive(Default)]
struct DryRunState {
    issued: u32,
    foreground: Option<WindowHandle>,
}

/// Эмуляция оконной системы: ничего не запускает, только пишет в лог
pub struct DryRunWindowSystem {
    state: Mutex<DryRunState>,
}

impl DryRunWindowSystem {
    pub fn new() -> Self {
        info!("Dry-run режим - оконная система работает в режиме эмуляции");
        Self {
            state: Mutex::new(DryRunState::default()),
        }
    }
}

impl Default for DryRunWindowSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl WindowSystem for DryRunWindowSystem {
    async fn search(&self, title: &str) -> Result<Vec<WindowHandle>> {
        let mut state = self.state.lock();
        state.issued += 1;
        let handle = WindowHandle::new(format!("dry-{}", state.issued));
        info!("[DRY RUN] Окно '{}' -> {}", title, handle);
        Ok(vec![handle])
    }

    async fn activate(&self, handle: &WindowHandle) -> Result<()> {
        info!("[DRY RUN] Активация окна {}", handle);
        self.state.lock().foreground = Some(handle.clone());
        Ok(())
    }

    async fn send_key(&self, handle: &WindowHandle, key: NavKey) -> Result<()> {
        let state = self.state.lock();
        match &state.foreground {
            Some(foreground) if foreground == handle => {
                info!("[DRY RUN] Клавиша {} -> {}", key, handle)
            }
            other => info!(
                "[DRY RUN] Клавиша {} для {}, но на переднем плане {:?}",
                key, handle, other
            ),
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
