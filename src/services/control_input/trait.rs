use crate::config::Config;
use crate::error::Result;
use crate::events::ControlEvent;
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

use super::{KeyControlInput, LineControlInput};

/// Источник команд контроллера
#[async_trait::async_trait]
pub trait ControlSource: Send {
    /// Следующая распознанная команда; `None` - ввод закрыт.
    ///
    /// Вызывается внутри `select!`, поэтому отмена не должна терять ввод.
    async fn next_event(&mut self) -> Result<Option<ControlEvent>>;
}

/// Factory function: single keys in a terminal, whole lines otherwise
pub fn create_control_input(config: Arc<Config>) -> Result<Box<dyn ControlSource>> {
    if std::io::stdin().is_terminal() {
        info!("stdin - терминал, читаем отдельные нажатия клавиш");
        Ok(Box::new(KeyControlInput::new(config)?))
    } else {
        info!("stdin не терминал, читаем команды построчно");
        Ok(Box::new(LineControlInput::new(
            BufReader::new(tokio::io::stdin()),
            config,
        )))
    }
}
