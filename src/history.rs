//! Execution history synthesis
//!
//! No execution-history endpoint is consumed, so the agent detail view shows
//! a deterministic synthetic sequence. Given the same `now` it always yields
//! the same events.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Number of synthetic events per agent
pub const HISTORY_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub timestamp: DateTime<Utc>,
    /// Seconds, 1 through 5
    pub duration: u32,
    pub success: bool,
    pub tokens: u32,
}

/// Event for hour offset `i` (0 = now).
pub fn event_at(i: usize, now: DateTime<Utc>) -> ExecutionEvent {
    let seed = ((i * 7) % 100) as u32;
    ExecutionEvent {
        timestamp: now - Duration::hours(i as i64),
        duration: seed % 5 + 1,
        success: seed > 10,
        tokens: 1000 + seed * 50,
    }
}

/// [`HISTORY_LEN`] hourly events ending at `now`, earliest first.
pub fn execution_history(now: DateTime<Utc>) -> Vec<ExecutionEvent> {
    let mut events: Vec<ExecutionEvent> = (0..HISTORY_LEN).map(|i| event_at(i, now)).collect();
    events.reverse();
    events
}

/// Share of successful events, 0–100.
pub fn success_percentage(events: &[ExecutionEvent]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }
    let ok = events.iter().filter(|e| e.success).count();
    ok as f64 * 100.0 / events.len() as f64
}
