use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Trailing-edge debouncer: a value is released once no newer value has been
/// pushed for the whole quiet period.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Replaces any pending value and restarts the quiet period at `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Releases the pending value if its quiet period has elapsed at `now`.
    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if *at <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(v, _)| v)
    }

    /// Sleeps until the pending value is due and releases it.
    ///
    /// Returns `None` immediately when nothing is pending. Dropping the future
    /// before it completes leaves the pending value untouched.
    pub async fn fire(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        sleep_until(deadline).await;
        self.take_ready(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use std::time::Duration;
    use tokio::time::{Instant, advance};

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn releases_only_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(QUIET);
        d.push("a", t0);
        assert_eq!(d.take_ready(t0 + Duration::from_millis(299)), None);
        assert_eq!(d.take_ready(t0 + QUIET), Some("a"));
        assert!(!d.is_armed());
    }

    #[test]
    fn newer_value_restarts_the_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(QUIET);
        d.push("a", t0);
        d.push("ab", t0 + Duration::from_millis(200));
        assert_eq!(d.take_ready(t0 + QUIET), None);
        assert_eq!(d.take_ready(t0 + Duration::from_millis(500)), Some("ab"));
    }

    #[tokio::test(start_paused = true)]
    async fn fire_waits_for_deadline() {
        let mut d = Debouncer::new(QUIET);
        let start = Instant::now();
        d.push(1, start);
        advance(Duration::from_millis(100)).await;
        d.push(2, Instant::now());
        assert_eq!(d.fire().await, Some(2));
        let waited = Instant::now() - start;
        assert!(waited >= Duration::from_millis(400), "{waited:?}");
        assert!(waited < Duration::from_millis(402), "{waited:?}");
        assert_eq!(d.fire().await, None);
    }
}
