//! Per-source API call limiter.

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permit {
    Allowed,
    /// The poll interval has not elapsed yet. Normal between polls.
    NotDue,
    /// A call inside the lockout window. Indicates something is polling
    /// faster than the provider allows.
    LockedOut,
}

impl Permit {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Gates calls to one provider feature.
///
/// A call is permitted only when both the poll interval and the lockout
/// period have elapsed since the last successful call.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval_secs: i64,
    lockout_secs: i64,
    last_call: Option<i64>,
}

impl RateLimiter {
    pub fn new(interval_secs: u64, lockout_secs: u64) -> Self {
        Self {
            interval_secs: interval_secs as i64,
            lockout_secs: lockout_secs as i64,
            last_call: None,
        }
    }

    pub fn check(&self, now: i64) -> Permit {
        let Some(last) = self.last_call else {
            return Permit::Allowed;
        };
        let elapsed = now - last;
        if elapsed < self.lockout_secs {
            Permit::LockedOut
        } else if elapsed < self.interval_secs {
            Permit::NotDue
        } else {
            Permit::Allowed
        }
    }

    /// Records a successful call. Failed calls leave the limiter untouched.
    pub fn record_success(&mut self, now: i64) {
        self.last_call = Some(now);
    }

    pub fn last_call(&self) -> Option<i64> {
        self.last_call
    }

    pub fn lockout_secs(&self) -> i64 {
        self.lockout_secs
    }
}
