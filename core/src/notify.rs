//! Toast-style notification sink.
//!
//! Toasts are recorded with their creation instant and a lifetime; callers
//! pass `now` explicitly so expiry is deterministic in tests. Rapid calls
//! stack up in arrival order, nothing is deduplicated. Expired toasts are
//! dropped whenever a new one is shown, so the queue only holds what is
//! still on screen plus anything not yet pruned since the last `show`.

use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_LIFE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    pub life: Duration,
    pub created_at: Instant,
}

impl Toast {
    pub fn is_alive(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < self.life
    }
}

#[derive(Debug, Clone)]
pub struct ToastQueue {
    life: Duration,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new(life: Duration) -> Self {
        Self {
            life,
            toasts: Vec::new(),
        }
    }

    pub fn show(&mut self, severity: Severity, summary: &str, detail: &str) {
        self.show_at(severity, summary, detail, Instant::now());
    }

    pub fn show_at(&mut self, severity: Severity, summary: &str, detail: &str, now: Instant) {
        self.prune(now);
        match severity {
            Severity::Error => tracing::warn!(summary, detail, "toast"),
            _ => tracing::debug!(?severity, summary, detail, "toast"),
        }
        self.toasts.push(Toast {
            severity,
            summary: summary.to_string(),
            detail: detail.to_string(),
            life: self.life,
            created_at: now,
        });
    }

    /// Toasts still visible at `now`.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(move |t| t.is_alive(now))
    }

    /// Drop expired toasts.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.is_alive(now));
    }

    /// Every toast recorded and not yet pruned, newest last.
    pub fn all(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_LIFE)
    }
}
