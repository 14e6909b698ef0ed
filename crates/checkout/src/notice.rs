use chrono::{DateTime, TimeDelta, Utc};

/// Seconds a success notice stays visible.
pub const DEFAULT_NOTICE_SECS: i64 = 3;

/// Transient "order placed" signal raised after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessNotice {
    pub message: String,
    pub raised_at: DateTime<Utc>,
    pub ttl: TimeDelta,
}

impl SuccessNotice {
    pub fn new(message: impl Into<String>, raised_at: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self {
            message: message.into(),
            raised_at,
            ttl,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.raised_at + self.ttl
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.raised_at && now < self.expires_at()
    }
}
