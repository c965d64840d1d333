use crate::error::{RelayError, Result};
use crate::events::{Direction, Hms, NavKey, NavigationRecord, TIMING_HEADER};
use crate::services::{StatusDisplay, WindowDirectory};
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Единственный отложенный тик часов
#[derive(Debug, Default)]
struct TickTimer {
    deadline: Option<Instant>,
}

impl TickTimer {
    /// Возвращает true, если тик был запланирован
    fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    fn schedule(&mut self, at: Instant) {
        // Сначала отменяем предыдущий тик: в очереди всегда не больше одного
        self.cancel();
        self.deadline = Some(at);
    }
}

/// Результат навигации: запись для журнала и ошибки по отдельным окнам
#[derive(Debug)]
pub struct NavigationOutcome {
    pub record: NavigationRecord,
    pub failures: Vec<(String, RelayError)>,
}

/// Счётчик слайдов, секундомер презентации и протокол пересылки клавиш.
///
/// Навигация обходит целевые окна строго по очереди: окно активируется,
/// получает одну клавишу, и только после этого начинается работа со следующим.
/// Ошибка по одному окну пишется в лог и не прерывает обход остальных.
pub struct PresentationClock {
    directory: WindowDirectory,
    targets: Vec<String>,
    controller_title: String,
    slide: u32,
    session_start: Instant,
    last_transition: Instant,
    tick_interval: Duration,
    timer: TickTimer,
    log: Box<dyn Write + Send>,
    display: Box<dyn StatusDisplay>,
}

impl PresentationClock {
    pub fn new(
        directory: WindowDirectory,
        targets: Vec<String>,
        controller_title: String,
        tick_interval: Duration,
        log: Box<dyn Write + Send>,
        display: Box<dyn StatusDisplay>,
    ) -> Self {
        info!(
            "Инициализация PresentationClock: {} целевых окон, контроллер '{}'",
            targets.len(),
            controller_title
        );

        let now = Instant::now();
        Self {
            directory,
            targets,
            controller_title,
            slide: 1,
            session_start: now,
            last_transition: now,
            tick_interval,
            timer: TickTimer::default(),
            log,
            display,
        }
    }

    pub fn slide(&self) -> u32 {
        self.slide
    }

    /// Момент следующего тика, если он запланирован
    pub fn next_tick(&self) -> Option<Instant> {
        self.timer.deadline
    }

    pub fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.session_start)
    }

    pub fn split(&self) -> Duration {
        Instant::now().saturating_duration_since(self.last_transition)
    }

    /// Переход на соседний слайд с пересылкой стрелки во все целевые окна
    pub async fn navigate(&mut self, direction: Direction) -> NavigationOutcome {
        let from = self.slide;
        self.slide = match direction {
            Direction::Forward => self.slide.saturating_add(1),
            Direction::Backward => self.slide.saturating_sub(1).max(1),
        };

        let now = Instant::now();
        let record = NavigationRecord {
            from,
            to: self.slide,
            since_start: now.saturating_duration_since(self.session_start),
            split: now.saturating_duration_since(self.last_transition),
        };
        self.emit(&record.to_string());
        info!("Слайд {} -> {} ({:?})", from, self.slide, direction);

        let key = direction.key();
        let mut failures = Vec::new();

        for title in &self.targets {
            if let Err(e) = Self::forward_key(&mut self.directory, title, key).await {
                error!("Не удалось переслать {} в окно '{}': {}", key, title, e);
                failures.push((title.clone(), e));
            }
        }

        // Возвращаем фокус контроллеру, чтобы он снова принимал нажатия
        if let Err(e) = Self::focus(&mut self.directory, &self.controller_title).await {
            error!(
                "Не удалось вернуть фокус окну контроллера '{}': {}",
                self.controller_title, e
            );
            failures.push((self.controller_title.clone(), e));
        }

        self.last_transition = Instant::now();
        self.refresh_display();

        NavigationOutcome { record, failures }
    }

    /// Сброс секундомера. Номер слайда не меняется
    pub fn reset(&mut self) {
        if self.timer.cancel() {
            debug!("Отменён запланированный тик");
        }

        let now = Instant::now();
        self.session_start = now;
        self.last_transition = now;

        self.emit(TIMING_HEADER);
        info!("Часы сброшены на слайде {}", self.slide);

        self.refresh_display();
        self.timer.schedule(now + self.tick_interval);
    }

    /// Периодическое обновление часов, само себя перепланирует
    pub fn tick(&mut self) {
        self.refresh_display();
        self.timer.schedule(Instant::now() + self.tick_interval);
    }

    fn status(&self) -> String {
        format!("{} ({})", Hms(self.elapsed()), self.slide)
    }

    fn refresh_display(&mut self) {
        let status = self.status();
        self.display.show(&status);
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.log, "{}", line).and_then(|_| self.log.flush()) {
            warn!("Не удалось записать строку журнала таймингов: {}", e);
        }
    }

    async fn forward_key(directory: &mut WindowDirectory, title: &str, key: NavKey) -> Result<()> {
        let handle = directory.resolve(title).await?;
        directory.system().activate(&handle).await?;
        directory.system().send_key(&handle, key).await
    }

    async fn focus(directory: &mut WindowDirectory, title: &str) -> Result<()> {
        let handle = directory.resolve(title).await?;
        directory.system().activate(&handle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::window_system::recording::RecordingWindowSystem;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedLog(Arc<Mutex<Vec<u8>>>);

    impl SharedLog {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for SharedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct SharedStatus(Arc<Mutex<Vec<String>>>);

    impl SharedStatus {
        fn last(&self) -> Option<String> {
            self.0.lock().last().cloned()
        }
    }

    impl StatusDisplay for SharedStatus {
        fn show(&mut self, status: &str) {
            self.0.lock().push(status.to_string());
        }
    }

    struct Harness {
        clock: PresentationClock,
        system: Arc<RecordingWindowSystem>,
        log: SharedLog,
        status: SharedStatus,
    }

    fn harness(targets: &[&str], system: RecordingWindowSystem) -> Harness {
        let system = Arc::new(system);
        let log = SharedLog::default();
        let status = SharedStatus::default();
        let clock = PresentationClock::new(
            WindowDirectory::new(system.clone()),
            targets.iter().map(|t| t.to_string()).collect(),
            "ctl".to_string(),
            Duration::from_secs(1),
            Box::new(log.clone()),
            Box::new(status.clone()),
        );
        Harness {
            clock,
            system,
            log,
            status,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_forward_visits_windows_in_order() {
        let mut h = harness(&["A", "B"], RecordingWindowSystem::new());
        h.clock.reset();

        let outcome = h.clock.navigate(Direction::Forward).await;

        assert!(outcome.failures.is_empty());
        assert_eq!(
            h.system.calls(),
            vec![
                "search A",
                "activate A",
                "key A Right",
                "search B",
                "activate B",
                "key B Right",
                "search ctl",
                "activate ctl",
            ]
        );
        assert_eq!(
            h.log.lines(),
            vec![TIMING_HEADER, "1\t2\t0:00:00\t0:00:00"]
        );
        assert_eq!(h.status.last().as_deref(), Some("0:00:00 (2)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_navigation_uses_cached_handles() {
        let mut h = harness(&["A", "B"], RecordingWindowSystem::new());
        h.clock.navigate(Direction::Forward).await;
        h.system.clear();

        h.clock.navigate(Direction::Backward).await;

        assert_eq!(
            h.system.calls(),
            vec!["activate A", "key A Left", "activate B", "key B Left", "activate ctl"]
        );
        assert_eq!(h.clock.slide(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backward_at_floor_still_sends_keys() {
        let mut h = harness(&["A", "B"], RecordingWindowSystem::new());

        let outcome = h.clock.navigate(Direction::Backward).await;

        assert_eq!(outcome.record.from, 1);
        assert_eq!(outcome.record.to, 1);
        assert!(h.log.lines()[0].starts_with("1\t1\t"));
        assert_eq!(h.system.count("key"), 2);
        assert!(h.system.calls().iter().all(|c| !c.ends_with("Right")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slide_number_never_drops_below_one() {
        for forward in 0..4u32 {
            for backward in 0..7u32 {
                let mut h = harness(&["A"], RecordingWindowSystem::new());
                for _ in 0..forward {
                    h.clock.navigate(Direction::Forward).await;
                }
                for _ in 0..backward {
                    h.clock.navigate(Direction::Backward).await;
                }
                let expected = (1 + forward as i64 - backward as i64).max(1) as u32;
                assert_eq!(h.clock.slide(), expected, "{} вперёд, {} назад", forward, backward);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_and_split_in_log() {
        let mut h = harness(&["A"], RecordingWindowSystem::new());
        h.clock.reset();

        tokio::time::advance(Duration::from_secs(65)).await;
        h.clock.navigate(Direction::Forward).await;

        tokio::time::advance(Duration::from_millis(10_400)).await;
        h.clock.navigate(Direction::Forward).await;

        let lines = h.log.lines();
        assert_eq!(lines[1], "1\t2\t0:01:05\t0:01:05");
        assert_eq!(lines[2], "2\t3\t0:01:15\t0:00:10");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_zeroes_timers_and_keeps_slide() {
        let mut h = harness(&["A"], RecordingWindowSystem::new());
        h.clock.navigate(Direction::Forward).await;
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(h.clock.elapsed(), Duration::from_secs(30));

        h.clock.reset();

        assert_eq!(h.clock.elapsed(), Duration::ZERO);
        assert_eq!(h.clock.split(), Duration::ZERO);
        assert_eq!(h.clock.slide(), 2);
        assert_eq!(h.log.lines().last().map(String::as_str), Some(TIMING_HEADER));
        assert_eq!(h.status.last().as_deref(), Some("0:00:00 (2)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exactly_one_tick_pending_after_resets() {
        let mut h = harness(&["A"], RecordingWindowSystem::new());
        assert_eq!(h.clock.next_tick(), None);

        for _ in 0..5 {
            h.clock.reset();
            tokio::time::advance(Duration::from_millis(300)).await;
        }
        let last_reset = Instant::now() - Duration::from_millis(300);
        assert_eq!(h.clock.next_tick(), Some(last_reset + Duration::from_secs(1)));

        h.clock.tick();
        assert_eq!(h.clock.next_tick(), Some(Instant::now() + Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_updates_display() {
        let mut h = harness(&["A"], RecordingWindowSystem::new());
        h.clock.reset();
        h.clock.navigate(Direction::Forward).await;

        tokio::time::advance(Duration::from_secs(3_725)).await;
        h.clock.tick();

        assert_eq!(h.status.last().as_deref(), Some("1:02:05 (2)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_window_does_not_block_others() {
        let system = RecordingWindowSystem::new()
            .with_missing("A")
            .with_broken_activation("B")
            .with_broken_keys("C");
        let mut h = harness(&["A", "B", "C", "D"], system);

        let outcome = h.clock.navigate(Direction::Forward).await;

        assert_eq!(
            h.system.calls(),
            vec![
                "search A",
                "search B",
                "activate B",
                "search C",
                "activate C",
                "key C Right",
                "search D",
                "activate D",
                "key D Right",
                "search ctl",
                "activate ctl",
            ]
        );
        let failed: Vec<&str> = outcome.failures.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(failed, vec!["A", "B", "C"]);
        assert!(matches!(outcome.failures[0].1, RelayError::WindowNotFound(_)));
        assert!(matches!(outcome.failures[1].1, RelayError::ExternalCommand { .. }));
        assert_eq!(h.clock.slide(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_controller_is_reported() {
        let mut h = harness(&["A"], RecordingWindowSystem::new().with_missing("ctl"));

        let outcome = h.clock.navigate(Direction::Forward).await;

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "ctl");
        assert_eq!(h.system.count("key"), 1);
    }
}
