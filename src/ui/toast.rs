//! Transient notifications for booking outcomes.
//!
//! "Appointment moved", "10:00 is already booked", storage failures. The
//! clock is passed in explicitly so expiry can be tested without sleeping.

use std::time::{Duration, Instant};

/// Most toasts kept at once; older ones are dropped first.
const MAX_TOASTS: usize = 4;
const FADE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Info => "ℹ",
            ToastLevel::Warning => "⚠",
            ToastLevel::Error => "✗",
        }
    }

    /// Failures stay up longer than confirmations.
    pub fn lifetime(&self) -> Duration {
        match self {
            ToastLevel::Success | ToastLevel::Info => Duration::from_secs(3),
            ToastLevel::Warning => Duration::from_secs(4),
            ToastLevel::Error => Duration::from_secs(6),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
    pub ttl: Duration,
    /// Times the same message was raised while this toast was visible
    pub repeats: u32,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel, now: Instant) -> Self {
        Self {
            message: message.into(),
            level,
            shown_at: now,
            ttl: level.lifetime(),
            repeats: 0,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }

    /// 1.0 until the last half second, then a linear fade to 0.0.
    pub fn opacity_at(&self, now: Instant) -> f32 {
        let remaining = self.ttl.saturating_sub(now.saturating_duration_since(self.shown_at));
        if remaining >= FADE {
            1.0
        } else {
            remaining.as_secs_f32() / FADE.as_secs_f32()
        }
    }
}

#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast. Raising the message of the newest toast again
    /// restarts it instead of stacking a duplicate.
    pub fn push(&mut self, toast: Toast) {
        if let Some(last) = self.toasts.last_mut() {
            if last.message == toast.message && last.level == toast.level {
                last.shown_at = toast.shown_at;
                last.repeats += 1;
                return;
            }
        }

        self.toasts.push(toast);
        if self.toasts.len() > MAX_TOASTS {
            let overflow = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..overflow);
        }
    }

    fn raise(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.push(Toast::new(message, level, Instant::now()));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.raise(message, ToastLevel::Success);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.raise(message, ToastLevel::Info);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.raise(message, ToastLevel::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.raise(message, ToastLevel::Error);
    }

    pub fn cleanup(&mut self) {
        self.cleanup_at(Instant::now());
    }

    pub fn cleanup_at(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired_at(now));
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
