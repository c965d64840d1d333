use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::ControlEvent;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use super::r#trait::ControlSource;

/// Управление построчно (канал или файл): одна строка - одна команда
pub struct LineControlInput<R> {
    reader: R,
    // Частично прочитанная строка переживает отмену в `select!`
    pending: Vec<u8>,
    config: Arc<Config>,
}

impl<R: AsyncBufRead + Unpin + Send> LineControlInput<R> {
    pub fn new(reader: R, config: Arc<Config>) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            config,
        }
    }

    /// Следующая строка без `\n`; байты не из UTF-8 заменяются на U+FFFD
    async fn next_line(&mut self) -> Result<Option<String>> {
        let read = self.reader.read_until(b'\n', &mut self.pending).await?;
        if read == 0 && self.pending.is_empty() {
            return Ok(None);
        }

        let raw = std::mem::take(&mut self.pending);
        let raw = raw.strip_suffix(b"\n").unwrap_or(&raw[..]);
        Ok(Some(String::from_utf8_lossy(raw).into_owned()))
    }
}

#[async_trait::async_trait]
impl<R: AsyncBufRead + Unpin + Send> ControlSource for LineControlInput<R> {
    async fn next_event(&mut self) -> Result<Option<ControlEvent>> {
        while let Some(line) = self.next_line().await? {
            match self.config.action_for(&line) {
                Some(event) => {
                    debug_if_enabled!("Ввод {:?} -> {}", line, event);
                    return Ok(Some(event));
                }
                None => warn!("Неизвестная команда {:?}, игнорируем", line),
            }
        }
        Ok(None)
    }
}
