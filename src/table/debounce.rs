use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Holds the most recent value until `window` passes without another push
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace any pending value and restart the quiet period
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.window));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// The pending value, if its quiet period has already elapsed
    pub fn take_ready(&mut self) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= Instant::now() => self.cancel(),
            _ => None,
        }
    }

    /// Wait out the quiet period and hand over the last value
    pub async fn settled(&mut self) -> Option<T> {
        let deadline = self.pending.as_ref().map(|(_, deadline)| *deadline)?;
        sleep_until(deadline).await;
        self.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_last_value_survives_the_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.push("j");
        tokio::time::advance(Duration::from_millis(300)).await;
        debouncer.push("jo");
        tokio::time::advance(Duration::from_millis(300)).await;
        assert_eq!(debouncer.take_ready(), None);

        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(debouncer.take_ready(), Some("jo"));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn settled_waits_for_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let start = Instant::now();
        debouncer.push(String::from("asha"));
        assert_eq!(debouncer.settled().await.as_deref(), Some("asha"));
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(debouncer.settled().await, None);
    }
}
