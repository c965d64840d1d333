use std::io::{IsTerminal, Write};
use std::panic::{self, PanicHookInfo};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use tracing::{debug, info, warn};

static RAW_MODE: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK: Once = Once::new();

/// Установить заголовок окна терминала (OSC 0), чтобы окно контроллера
/// находилось по заголовку так же, как окна просмотрщиков
pub fn set_title(title: &str) {
    let mut stderr = std::io::stderr();
    if !stderr.is_terminal() {
        debug!("stderr не терминал, заголовок '{}' не устанавливается", title);
        return;
    }

    match write!(stderr, "{}", title_sequence(title)).and_then(|_| stderr.flush()) {
        Ok(()) => info!("Заголовок окна контроллера: '{}'", title),
        Err(e) => warn!("Не удалось установить заголовок терминала: {}", e),
    }
}

fn title_sequence(title: &str) -> String {
    // Управляющие символы внутри OSC оборвали бы последовательность
    let clean: String = title.chars().filter(|c| !c.is_control()).collect();
    format!("\x1b]0;{}\x07", clean)
}

/// Raw-режим терминала на время жизни значения
pub struct RawModeGuard(());

impl RawModeGuard {
    pub fn enable() -> std::io::Result<Self> {
        install_panic_hook();
        crossterm::terminal::enable_raw_mode()?;
        RAW_MODE.store(true, Ordering::SeqCst);
        debug!("Raw-режим терминала включён");
        Ok(Self(()))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    if RAW_MODE.swap(false, Ordering::SeqCst) {
        // Ошибку здесь уже некуда вернуть
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Паника не должна оставлять терминал в raw-режиме
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let default = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo| {
            restore_terminal();
            default(info);
        }));
    });
}

/// Writer для терминала: в raw-режиме `\n` больше не возвращает каретку,
/// поэтому переводы строк дополняются `\r`. Вывод в файл или канал не меняется.
pub struct LineEndWriter<W> {
    inner: W,
    terminal: bool,
}

impl LineEndWriter<std::io::Stdout> {
    pub fn stdout() -> Self {
        let inner = std::io::stdout();
        let terminal = inner.is_terminal();
        Self { inner, terminal }
    }
}

impl LineEndWriter<std::io::Stderr> {
    pub fn stderr() -> Self {
        let inner = std::io::stderr();
        let terminal = inner.is_terminal();
        Self { inner, terminal }
    }
}

impl<W: Write> LineEndWriter<W> {
    #[cfg(test)]
    fn new(inner: W, terminal: bool) -> Self {
        Self { inner, terminal }
    }

    fn translating(&self) -> bool {
        self.terminal && RAW_MODE.load(Ordering::SeqCst)
    }
}

impl<W: Write> Write for LineEndWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !self.translating() {
            return self.inner.write(buf);
        }

        for chunk in buf.split_inclusive(|b| *b == b'\n') {
            match chunk.strip_suffix(b"\n") {
                Some(line) => {
                    self.inner.write_all(line)?;
                    self.inner.write_all(b"\r\n")?;
                }
                None => self.inner.write_all(chunk)?,
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
