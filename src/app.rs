use crate::error::Result;
use crate::events::{ControlEvent, Direction};
use crate::services::{ControlSource, NavigationOutcome, PresentationClock};
use tokio::signal;
use tokio::time::sleep_until;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Выполнить одну команду контроллера
pub async fn dispatch(clock: &mut PresentationClock, event: ControlEvent) -> Flow {
    match event {
        ControlEvent::Next => report(clock.navigate(Direction::Forward).await),
        ControlEvent::Previous => report(clock.navigate(Direction::Backward).await),
        ControlEvent::Reset => clock.reset(),
        ControlEvent::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn report(outcome: NavigationOutcome) {
    if !outcome.failures.is_empty() {
        let titles: Vec<&str> = outcome.failures.iter().map(|(t, _)| t.as_str()).collect();
        warn!(
            "Переход {} -> {}: проверьте окна {:?}, они могли рассинхронизироваться",
            outcome.record.from, outcome.record.to, titles
        );
    }
}

/// Цикл событий: ввод, тик часов и Ctrl+C обрабатываются строго по одному
pub async fn run(clock: &mut PresentationClock, input: &mut dyn ControlSource) -> Result<()> {
    clock.reset();

    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let next_tick = clock.next_tick();
        let tick = async move {
            match next_tick {
                Some(at) => sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            event = input.next_event() => match event? {
                Some(event) => {
                    if dispatch(clock, event).await == Flow::Quit {
                        info!("Получена команда завершения");
                        break;
                    }
                }
                None => {
                    info!("Ввод закрыт, завершаем работу");
                    break;
                }
            },
            _ = tick => clock.tick(),
            result = &mut shutdown => {
                match result {
                    Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                    Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
                }
                break;
            }
        }
    }

    Ok(())
}
