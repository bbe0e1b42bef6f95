//! Demo metric series
//!
//! The metrics views chart time series that no backend provides. They are
//! generated here with the same base values and variance the dashboard has
//! always shown. The random source is injected so that tests can seed it.

use crate::models::MetricDataPoint;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default history length of generated series, in days
pub const DEFAULT_DAYS: u32 = 30;

/// One point per day at midnight UTC, from `now - days` through today.
/// Values are `base ± variance / 2`, floored at zero.
pub fn generate_time_series<R: Rng + ?Sized>(
    days: u32,
    base: f64,
    variance: f64,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<MetricDataPoint> {
    let today = now.date_naive();
    (0..=days)
        .rev()
        .map(|i| {
            let day = today - Duration::days(i64::from(i));
            let jitter = (rng.gen::<f64>() - 0.5) * variance;
            MetricDataPoint {
                timestamp: day.and_time(NaiveTime::MIN).and_utc(),
                value: (base + jitter).max(0.0),
            }
        })
        .collect()
}

/// Chart window selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Days7,
    #[default]
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Days7, TimeRange::Days30, TimeRange::Days90];

    pub fn days(self) -> u32 {
        match self {
            TimeRange::Days7 => 7,
            TimeRange::Days30 => 30,
            TimeRange::Days90 => 90,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Days7 => "7 days",
            TimeRange::Days30 => "30 days",
            TimeRange::Days90 => "90 days",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "7d" | "7" => Some(TimeRange::Days7),
            "30d" | "30" => Some(TimeRange::Days30),
            "90d" | "90" => Some(TimeRange::Days90),
            _ => None,
        }
    }

    /// The trailing `days + 1` points of `series` (all of it when shorter).
    pub fn window(self, series: &[MetricDataPoint]) -> &[MetricDataPoint] {
        let keep = (self.days() as usize + 1).min(series.len());
        &series[series.len() - keep..]
    }

    pub fn next(self) -> Self {
        match self {
            TimeRange::Days7 => TimeRange::Days30,
            TimeRange::Days30 => TimeRange::Days90,
            TimeRange::Days90 => TimeRange::Days7,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeRange::Days7 => "7d",
            TimeRange::Days30 => "30d",
            TimeRange::Days90 => "90d",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub execution_time: Vec<MetricDataPoint>,
    pub throughput: Vec<MetricDataPoint>,
    pub failure_rate: Vec<MetricDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    pub task_success_rate: Vec<MetricDataPoint>,
    pub validation_pass_rate: Vec<MetricDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyMetrics {
    pub end_to_end: Vec<MetricDataPoint>,
    pub model_response: Vec<MetricDataPoint>,
    pub tool_call: Vec<MetricDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTokens {
    pub agent: String,
    pub tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelShare {
    pub model: String,
    pub tokens: u64,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUsageMetrics {
    pub tokens_per_agent: Vec<AgentTokens>,
    pub cost_estimation: Vec<MetricDataPoint>,
    pub model_breakdown: Vec<ModelShare>,
}

impl TokenUsageMetrics {
    pub fn total_tokens(&self) -> u64 {
        self.tokens_per_agent.iter().map(|a| a.tokens).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityMetrics {
    pub time_saved: Vec<MetricDataPoint>,
    pub tasks_automated: Vec<MetricDataPoint>,
    pub roi: Vec<MetricDataPoint>,
}

/// Every metric group the metrics views render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub generated_at: DateTime<Utc>,
    pub performance: PerformanceMetrics,
    pub accuracy: AccuracyMetrics,
    pub latency: LatencyMetrics,
    pub tokens: TokenUsageMetrics,
    pub productivity: ProductivityMetrics,
}

impl MetricsSnapshot {
    pub fn generate<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> Self {
        let mut series = |base: f64, variance: f64| {
            generate_time_series(DEFAULT_DAYS, base, variance, now, rng)
        };
        let performance = PerformanceMetrics {
            execution_time: series(3.2, 2.0),
            throughput: series(145.0, 40.0),
            failure_rate: series(4.2, 3.0),
        };
        let accuracy = AccuracyMetrics {
            task_success_rate: series(94.0, 5.0),
            validation_pass_rate: series(96.0, 3.0),
        };
        let latency = LatencyMetrics {
            end_to_end: series(850.0, 300.0),
            model_response: series(420.0, 150.0),
            tool_call: series(230.0, 100.0),
        };
        let cost_estimation = series(1840.0, 400.0);
        let productivity = ProductivityMetrics {
            time_saved: series(420.0, 80.0),
            tasks_automated: series(1850.0, 300.0),
            roi: series(3.8, 0.6),
        };

        Self {
            generated_at: now,
            performance,
            accuracy,
            latency,
            tokens: TokenUsageMetrics {
                tokens_per_agent: tokens_per_agent(),
                cost_estimation,
                model_breakdown: model_breakdown(),
            },
            productivity,
        }
    }
}

fn tokens_per_agent() -> Vec<AgentTokens> {
    [
        ("Customer Support Agent", 2_450_000),
        ("Code Review Assistant", 1_890_000),
        ("Sales Lead Qualifier", 1_240_000),
        ("Content Moderator", 980_000),
        ("Incident Responder", 870_000),
        ("Data Pipeline Monitor", 750_000),
        ("Marketing Analyzer", 620_000),
        ("Invoice Processor", 450_000),
    ]
    .into_iter()
    .map(|(agent, tokens)| AgentTokens {
        agent: agent.to_string(),
        tokens,
    })
    .collect()
}

fn model_breakdown() -> Vec<ModelShare> {
    [
        ("GPT-4", 4_120_000, 42),
        ("Claude-3-Opus", 2_760_000, 28),
        ("GPT-3.5-Turbo", 1_850_000, 19),
        ("Claude-3-Sonnet", 980_000, 10),
        ("Gemini-Pro", 620_000, 6),
    ]
    .into_iter()
    .map(|(model, tokens, percentage)| ModelShare {
        model: model.to_string(),
        tokens,
        percentage,
    })
    .collect()
}

/// Mean of the series values; 0 when empty.
pub fn mean(series: &[MetricDataPoint]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().map(|p| p.value).sum::<f64>() / series.len() as f64
}

/// Relative change between the first and last value, in percent.
pub fn trend_percent(series: &[MetricDataPoint]) -> Option<f64> {
    let first = series.first()?.value;
    let last = series.last()?.value;
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

/// Block-character sparkline, scaled to the values' own min and max.
/// A flat series renders at mid height.
pub fn sparkline(values: &[f64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let top = BARS.len() - 1;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                BARS[top / 2]
            } else {
                let idx = ((v - min) / span * top as f64).round() as usize;
                BARS[idx.min(top)]
            }
        })
        .collect()
}

pub fn values(series: &[MetricDataPoint]) -> Vec<f64> {
    series.iter().map(|p| p.value).collect()
}
