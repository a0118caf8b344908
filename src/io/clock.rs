use std::time::{Duration, Instant};

/// Tracks time since the last stack advance. While held (paused or game
/// over) the elapsed time is frozen, so resuming does not owe an advance
/// for the time spent held.
pub struct AdvanceClock {
    last_advance: Instant,
    held: Option<Duration>,
}

impl AdvanceClock {
    pub fn new() -> Self {
        Self {
            last_advance: Instant::now(),
            held: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.held.unwrap_or_else(|| self.last_advance.elapsed())
    }

    pub fn remaining(&self, interval: Duration) -> Duration {
        interval.saturating_sub(self.elapsed())
    }

    pub fn mark(&mut self) {
        self.last_advance = Instant::now();
        self.held = None;
    }

    pub fn hold(&mut self) {
        if self.held.is_none() {
            self.held = Some(self.last_advance.elapsed());
        }
    }

    pub fn resume(&mut self) {
        if let Some(elapsed) = self.held.take() {
            let now = Instant::now();
            self.last_advance = now.checked_sub(elapsed).unwrap_or(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_remaining_counts_down() {
        let clock = AdvanceClock::new();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.remaining(Duration::from_secs(10)) < Duration::from_secs(10));
        assert_eq!(clock.remaining(Duration::from_millis(1)), Duration::ZERO);
    }

    #[test]
    fn test_hold_freezes_elapsed() {
        let mut clock = AdvanceClock::new();
        thread::sleep(Duration::from_millis(10));
        clock.hold();
        let frozen = clock.elapsed();

        thread::sleep(Duration::from_millis(200));
        assert_eq!(clock.elapsed(), frozen);

        // A second hold keeps the first reading.
        clock.hold();
        assert_eq!(clock.elapsed(), frozen);

        clock.resume();
        let resumed = clock.elapsed();
        assert!(resumed >= frozen);
        assert!(resumed < frozen + Duration::from_millis(100));
    }

    #[test]
    fn test_mark_restarts_and_releases_hold() {
        let mut clock = AdvanceClock::new();
        thread::sleep(Duration::from_millis(20));
        clock.hold();
        clock.mark();
        assert!(clock.elapsed() < Duration::from_millis(20));
    }
}
