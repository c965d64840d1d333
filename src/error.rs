use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Окно не найдено: {0}")]
    WindowNotFound(String),

    #[error("Команда `{command}` завершилась с ошибкой: {detail}")]
    ExternalCommand { command: String, detail: String },
}

impl RelayError {
    pub fn window_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(RelayError::WindowNotFound(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

// Удобный макрос для ошибок внешних команд
#[macro_export]
macro_rules! relay_error {
    (external, $command:expr, $($arg:tt)*) => {
        $crate::error::RelayError::ExternalCommand {
            command: ($command).to_string(),
            detail: format!($($arg)*),
        }
    };
}
