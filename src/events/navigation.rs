use std::fmt;
use std::time::Duration;

/// Заголовок журнала таймингов, печатается при каждом сбросе часов
pub const TIMING_HEADER: &str = "from#\tto#\ttime\tsplit";

/// Длительность в формате `H:MM:SS`, округлённая до целых секунд
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms(pub Duration);

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs_f64().round() as u64;
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        write!(f, "{}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Запись о переходе между слайдами. Не хранится, только печатается
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationRecord {
    pub from: u32,
    pub to: u32,
    pub since_start: Duration,
    pub split: Duration,
}

impl fmt::Display for NavigationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.from,
            self.to,
            Hms(self.since_start),
            Hms(self.split)
        )
    }
}
