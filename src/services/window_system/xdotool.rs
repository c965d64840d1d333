use crate::debug_if_enabled;
use crate::error::{RelayError, Result};
use crate::events::{NavKey, WindowHandle};
use crate::relay_error;
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

use super::r#trait::WindowSystem;

/// Регулярное выражение xdotool, совпадающее только с заголовком целиком
pub fn exact_title_pattern(title: &str) -> String {
    let mut pattern = String::with_capacity(title.len() + 2);
    pattern.push('^');
    for c in title.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('$');
    pattern
}

fn parse_window_ids(stdout: &[u8]) -> Vec<WindowHandle> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(WindowHandle::new)
        .collect()
}

pub struct XdotoolWindowSystem {
    program: String,
}

impl XdotoolWindowSystem {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        debug_if_enabled!("Запуск {} {:?}", self.program, args);
        let mut cmd = Command::new(&self.program);
        cmd.args(args).kill_on_drop(true);

        cmd.output().await.map_err(|e| {
            debug!("{} не найден или не работает: {}", self.program, e);
            relay_error!(external, self.program, "не удалось запустить: {}", e)
        })
    }

    async fn run_checked(&self, args: &[&str]) -> Result<()> {
        let output = self.run(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("{} вернул ошибку: {}", self.program, stderr);
            return Err(relay_error!(
                external,
                format!("{} {}", self.program, args.join(" ")),
                "{} {}",
                output.status,
                stderr.trim()
            ));
        }
        Ok(())
    }

    /// Заголовок окна как есть, без завершающего перевода строки
    async fn window_name(&self, handle: &WindowHandle) -> Result<String> {
        let output = self.run(&["getwindowname", handle.as_str()]).await?;
        if !output.status.success() {
            return Err(relay_error!(
                external,
                format!("{} getwindowname {}", self.program, handle),
                "{}",
                output.status
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let name = stdout.strip_suffix('\n').unwrap_or(&*stdout);
        Ok(name.to_string())
    }
}

#[async_trait::async_trait]
impl WindowSystem for XdotoolWindowSystem {
    async fn search(&self, title: &str) -> Result<Vec<WindowHandle>> {
        let pattern = exact_title_pattern(title);
        let output = self
            .run(&["search", "--name", pattern.as_str()])
            .await
            .map_err(|e| RelayError::WindowNotFound(format!("'{}': {}", title, e)))?;

        let handles = parse_window_ids(&output.stdout);

        // xdotool search выходит с кодом 1 и пустым выводом, если ничего не нашлось
        let no_match = output.status.code() == Some(1) && handles.is_empty();
        if !output.status.success() && !no_match {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return RelayError::window_not_found(format!(
                "'{}': xdotool search {}: {}",
                title,
                output.status,
                stderr.trim()
            ));
        }

        // Регулярные выражения xdotool не различают регистр, сверяем заголовок побайтно
        let mut exact = Vec::with_capacity(handles.len());
        for handle in handles {
            match self.window_name(&handle).await {
                Ok(name) if name == title => exact.push(handle),
                Ok(name) => debug!("Окно {} ('{}') отброшено: регистр не совпал", handle, name),
                Err(e) => debug!("Окно {} пропущено: {}", handle, e),
            }
        }

        debug!("xdotool нашёл {} окон для '{}'", exact.len(), title);
        Ok(exact)
    }

    async fn activate(&self, handle: &WindowHandle) -> Result<()> {
        self.run_checked(&["windowactivate", "--sync", handle.as_str()])
            .await
    }

    async fn send_key(&self, handle: &WindowHandle, key: NavKey) -> Result<()> {
        debug_if_enabled!("Клавиша {} для окна {}", key, handle);
        self.run_checked(&["key", "--clearmodifiers", key.keysym()])
            .await
    }

    async fn health_check(&self) -> Result<()> {
        self.run_checked(&["version"]).await
    }
}
