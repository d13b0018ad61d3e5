//! User-visible alerts raised by controllers.

use std::sync::Mutex;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Warning,
            title: "Warning".to_string(),
            message: message.into(),
        }
    }
}

/// Where alerts go; a UI shows them, headless callers log or collect them
pub trait Notifier: Send + Sync {
    fn notify(&self, alert: Alert);
}

/// Writes alerts as tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, alert: Alert) {
        match alert.level {
            AlertLevel::Success => tracing::info!(title = %alert.title, "{}", alert.message),
            AlertLevel::Warning => tracing::warn!(title = %alert.title, "{}", alert.message),
            AlertLevel::Error => tracing::error!(title = %alert.title, "{}", alert.message),
        }
    }
}

/// Collects alerts for later display
#[derive(Debug, Default)]
pub struct AlertQueue {
    alerts: Mutex<Vec<Alert>>,
}

impl AlertQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Alert> {
        let mut alerts = self.alerts.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *alerts)
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for AlertQueue {
    fn notify(&self, alert: Alert) {
        tracing::debug!(level = ?alert.level, "alert queued: {}", alert.message);
        self.alerts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(alert);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drains_in_order() {
        let queue = AlertQueue::new();
        queue.notify(Alert::error("first"));
        queue.notify(Alert::success("Deleted", "second"));
        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].level, AlertLevel::Success);
        assert!(queue.is_empty());
    }
}
