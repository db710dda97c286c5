/// Account lockout policy
///
/// Five failed attempts lock an account for fifteen minutes. The admission
/// check runs before password verification, so a locked account never costs
/// a hash computation and continued guesses cannot extend the lockout.
use chrono::{DateTime, Duration, Utc};

pub const MAX_FAILED_ATTEMPTS: i64 = 5;

pub fn lockout_duration() -> Duration {
    Duration::minutes(15)
}

/// Outcome of the pre-verification admission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Admit,
    Locked { remaining: Duration },
}

pub fn check_admission(
    lockout_enabled: bool,
    lockout_until: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Admission {
    match lockout_until {
        Some(until) if lockout_enabled && until > now => Admission::Locked {
            remaining: until - now,
        },
        _ => Admission::Admit,
    }
}

/// Remaining lockout reported to the caller in whole minutes, rounded up
pub fn remaining_minutes(remaining: Duration) -> i64 {
    let secs = remaining.num_seconds().max(0);
    (secs + 59) / 60
}
