use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::info;
mod app;
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::{Config, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use services::{
    create_control_input,
    create_window_system,
    PresentationClock,
    TerminalStatus,
    WindowDirectory,
};
use utils::terminal::LineEndWriter;

#[derive(Parser, Debug)]
#[command(name = "slide-relay")]
#[command(about = "Пересылает стрелки в окна PDF-просмотрщиков и ведёт таймер презентации")]
struct Args {
    /// Заголовки целевых окон в порядке обхода
    #[arg(value_name = "TITLE")]
    titles: Vec<String>,

    /// Уровень логирования
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)?.with_targets(args.titles)?;

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск slide-relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", config_path);
    info!("Целевые окна: {:?}", config.windows.targets);

    let config = Arc::new(config);

    let system = create_window_system(&config)?;
    system
        .health_check()
        .await
        .with_context(|| format!("Backend окон '{}' недоступен", config.windows.backend))?;

    utils::terminal::set_title(&config.windows.controller_title);

    let mut clock = PresentationClock::new(
        WindowDirectory::new(system),
        config.windows.targets.clone(),
        config.windows.controller_title.clone(),
        config.tick_interval(),
        Box::new(LineEndWriter::stdout()),
        Box::new(TerminalStatus::new()),
    );
    let mut input = create_control_input(config.clone())?;

    info!("Управление: n/→ - вперёд, p/← - назад, r - сброс часов, q - выход");
    app::run(&mut clock, input.as_mut()).await?;
    drop(clock);
    // Терминал возвращается из raw-режима до выхода
    drop(input);

    info!("slide-relay завершил работу");
    // Блокирующее чтение stdin нельзя отменить, не ждём его при остановке runtime
    std::process::exit(0)
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    // stdout занят журналом таймингов, логи идут в stderr
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(LineEndWriter::stderr)
        .with_ansi(std::io::stderr().is_terminal());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "pretty" => registry.with(layer.pretty()).init(),
        _ => registry.with(layer.compact()).init(),
    }

    Ok(())
}
