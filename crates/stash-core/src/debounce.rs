use std::time::Duration;

use tokio::time::Instant;

/// Coalesces bursts of "dirty" marks into a single flush.
///
/// Every [`mark`](Debouncer::mark) pushes the deadline out to
/// `now + window`. The owner sleeps until [`deadline`](Debouncer::deadline)
/// and then calls [`take_due`](Debouncer::take_due), which reports
/// whether the burst has settled and resets the debouncer if so.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    dirty_at: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            dirty_at: None,
        }
    }

    /// Records a change at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.dirty_at = Some(now);
    }

    /// Instant at which the pending change should be flushed.
    pub fn deadline(&self) -> Option<Instant> {
        self.dirty_at.map(|t| t + self.window)
    }

    /// Returns true (and resets) if a change is pending and no further
    /// mark arrived within the window before `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.dirty_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Sleeps until `deadline`, or forever when there is none.
///
/// Meant for `tokio::select!` arms that only fire when work is pending.
pub async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    #[test]
    fn idle_debouncer_is_never_due() {
        let mut debouncer = Debouncer::new(WINDOW);
        assert!(!debouncer.take_due(Instant::now()));
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn burst_collapses_to_latest_mark() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.mark(start);
        debouncer.mark(start + Duration::from_millis(60));
        debouncer.mark(start + Duration::from_millis(90));

        // The first deadline has passed but the burst is still going.
        assert!(!debouncer.take_due(start + Duration::from_millis(120)));
        assert!(debouncer.take_due(start + Duration::from_millis(190)));
    }

    #[test]
    fn take_due_resets() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.mark(start);
        assert!(debouncer.take_due(start + WINDOW));
        assert_eq!(debouncer.deadline(), None);
        assert!(!debouncer.take_due(start + WINDOW * 2));
    }

    #[test]
    fn mark_pushes_deadline_out() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.mark(start);
        debouncer.mark(start + Duration::from_millis(40));

        assert_eq!(debouncer.deadline(), Some(start + Duration::from_millis(140)));
    }

    #[tokio::test(start_paused = true)]
    async fn sleep_until_waits_for_deadline() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.mark(Instant::now());

        sleep_until(debouncer.deadline()).await;

        assert!(debouncer.take_due(Instant::now()));
    }
}
