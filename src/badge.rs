//! Display tones and labels
//!
//! Surfaces map a [`Tone`] onto their own palette. Every table here is an
//! exhaustive `match`, so a new variant cannot ship without a badge.

use crate::models::{AccessRequestStatus, AgentStatus, Environment, Role};
use chrono::{DateTime, Utc};

/// Semantic color category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Positive,
    Warning,
    Critical,
    Info,
    Accent,
    Muted,
}

/// Success rate at or above this reads as healthy
pub const SUCCESS_RATE_GOOD: f64 = 95.0;
/// Success rate at or above this (and below good) reads as a warning
pub const SUCCESS_RATE_FAIR: f64 = 85.0;

pub fn status_badge(status: AgentStatus) -> (Tone, &'static str) {
    match status {
        AgentStatus::Healthy => (Tone::Positive, "Healthy"),
        AgentStatus::Degraded => (Tone::Warning, "Degraded"),
        AgentStatus::Failed => (Tone::Critical, "Failed"),
    }
}

pub fn environment_tone(environment: Environment) -> Tone {
    match environment {
        Environment::Production => Tone::Info,
        Environment::Staging => Tone::Accent,
        Environment::Development => Tone::Muted,
    }
}

pub fn role_badge(role: Role) -> (Tone, &'static str) {
    match role {
        Role::Admin => (Tone::Accent, "Admin"),
        Role::Developer => (Tone::Info, "Developer"),
        Role::Viewer => (Tone::Muted, "Viewer"),
    }
}

pub fn access_request_tone(status: &AccessRequestStatus) -> Tone {
    match status {
        AccessRequestStatus::Approved => Tone::Positive,
        AccessRequestStatus::Pending => Tone::Warning,
        AccessRequestStatus::Rejected | AccessRequestStatus::Other(_) => Tone::Critical,
    }
}

/// Tone of a success-rate bar.
pub fn success_rate_tone(rate: f64) -> Tone {
    if rate >= SUCCESS_RATE_GOOD {
        Tone::Positive
    } else if rate >= SUCCESS_RATE_FAIR {
        Tone::Warning
    } else {
        Tone::Critical
    }
}

/// "just now", "15 minutes ago", "3 hours ago", "2 days ago".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    }
    let (amount, unit) = if elapsed.num_hours() < 1 {
        (elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        (elapsed.num_hours(), "hour")
    } else {
        (elapsed.num_days(), "day")
    };
    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashSet;

    #[test]
    fn test_every_status_has_distinct_tone() {
        let tones: HashSet<Tone> = AgentStatus::ALL
            .iter()
            .map(|s| status_badge(*s).0)
            .collect();
        assert_eq!(tones.len(), AgentStatus::ALL.len());
        assert_eq!(status_badge(AgentStatus::Degraded).1, "Degraded");
    }

    #[test]
    fn test_environment_and_role_tables() {
        assert_eq!(environment_tone(Environment::Production), Tone::Info);
        assert_eq!(environment_tone(Environment::Development), Tone::Muted);
        assert_eq!(role_badge(Role::Admin), (Tone::Accent, "Admin"));
        for role in Role::ALL {
            assert!(!role_badge(role).1.is_empty());
        }
    }

    #[test]
    fn test_success_rate_thresholds() {
        assert_eq!(success_rate_tone(99.2), Tone::Positive);
        assert_eq!(success_rate_tone(95.0), Tone::Positive);
        assert_eq!(success_rate_tone(87.3), Tone::Warning);
        assert_eq!(success_rate_tone(85.0), Tone::Warning);
        assert_eq!(success_rate_tone(62.4), Tone::Critical);
    }

    #[test]
    fn test_access_request_tone() {
        assert_eq!(
            access_request_tone(&AccessRequestStatus::Approved),
            Tone::Positive
        );
        assert_eq!(
            access_request_tone(&AccessRequestStatus::from("escalated".to_string())),
            Tone::Critical
        );
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(relative_time(now, now), "just now");
        assert_eq!(relative_time(now + Duration::minutes(5), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(15), now), "15 minutes ago");
        assert_eq!(relative_time(now - Duration::minutes(61), now), "1 hour ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
    }
}
