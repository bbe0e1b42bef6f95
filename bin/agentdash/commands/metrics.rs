//! Metrics command - demo metric series over a time range

use crate::style::*;
use agent_dashboard::badge::Tone;
use agent_dashboard::metrics::{mean, sparkline, trend_percent, values};
use agent_dashboard::state::{MetricsPage, MetricsTab};
use agent_dashboard::{MetricsSnapshot, TimeRange};
use anyhow::Result;
use chrono::Utc;
use clap::Args;
use comfy_table::Cell;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// 7d, 30d or 90d
    #[arg(short, long, default_value = "30d", value_parser = parse_range)]
    range: TimeRange,

    /// Seed for reproducible series
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_range(s: &str) -> std::result::Result<TimeRange, String> {
    TimeRange::parse(s).ok_or_else(|| format!("expected 7d, 30d or 90d, got '{}'", s))
}

pub fn run(args: MetricsArgs) -> Result<()> {
    let now = Utc::now();
    let snapshot = match args.seed {
        Some(seed) => MetricsSnapshot::generate(now, &mut StdRng::seed_from_u64(seed)),
        None => MetricsSnapshot::generate(now, &mut rand::thread_rng()),
    };
    let mut page = MetricsPage::new(snapshot);
    page.range = args.range;

    print_header(&format!("Metrics - last {}", page.range.label()));

    for tab in MetricsTab::ALL {
        print_section(tab.label());
        let mut table = new_table(["Series", "Latest", "Mean", "Trend", ""]);
        for series in page.series(tab) {
            let latest = series.points.last().map_or(0.0, |p| p.value);
            let trend = match trend_percent(series.points) {
                Some(t) if t >= 0.0 => Cell::new(format!("+{:.1}%", t)),
                Some(t) => Cell::new(format!("{:.1}%", t)),
                None => Cell::new("-"),
            };
            table.add_row(vec![
                Cell::new(series.label),
                Cell::new(format!("{:.1} {}", latest, series.unit)),
                Cell::new(format!("{:.1} {}", mean(series.points), series.unit)),
                trend,
                Cell::new(sparkline(&values(series.points))),
            ]);
        }
        println!("{table}");

        if tab == MetricsTab::Tokens {
            print_token_usage(&page);
        }
    }
    println!();
    Ok(())
}

fn print_token_usage(page: &MetricsPage) {
    let tokens = &page.snapshot.tokens;
    print_key_value("Total tokens", &tokens.total_tokens().to_string());

    let top = tokens.tokens_per_agent.first().map_or(1, |a| a.tokens.max(1));
    let mut table = new_table(["Agent", "Tokens", ""]);
    for entry in &tokens.tokens_per_agent {
        table.add_row(vec![
            Cell::new(&entry.agent),
            Cell::new(entry.tokens),
            Cell::new(progress_bar(
                entry.tokens as f64 / top as f64,
                24,
                Tone::Info,
            )),
        ]);
    }
    println!("{table}");

    let mut table = new_table(["Model", "Tokens", "Share"]);
    for share in &tokens.model_breakdown {
        table.add_row(vec![
            Cell::new(&share.model),
            Cell::new(share.tokens),
            Cell::new(format!("{}%", share.percentage)),
        ]);
    }
    println!("{table}");
}
