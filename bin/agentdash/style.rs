//! Terminal styling for CLI output

use agent_dashboard::badge::Tone;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// ANSI color codes
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

use colors::*;

pub fn style_dim(s: &str) -> String {
    format!("{}{}{}", DIM, s, RESET)
}

pub fn style_gray(s: &str) -> String {
    format!("{}{}{}", GRAY, s, RESET)
}

/// ANSI color of a badge tone
pub fn tone_ansi(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => GREEN,
        Tone::Warning => YELLOW,
        Tone::Critical => RED,
        Tone::Info => BLUE,
        Tone::Accent => MAGENTA,
        Tone::Muted => GRAY,
    }
}

/// Table cell color of a badge tone
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => Color::Green,
        Tone::Warning => Color::Yellow,
        Tone::Critical => Color::Red,
        Tone::Info => Color::Blue,
        Tone::Accent => Color::Magenta,
        Tone::Muted => Color::DarkGrey,
    }
}

pub fn toned(tone: Tone, s: &str) -> String {
    format!("{}{}{}", tone_ansi(tone), s, RESET)
}

pub fn toned_cell(tone: Tone, s: impl ToString) -> Cell {
    Cell::new(s).fg(tone_color(tone))
}

// Status indicators
pub fn icon_success() -> String {
    format!("{}✓{}", GREEN, RESET)
}

pub fn icon_error() -> String {
    format!("{}✗{}", RED, RESET)
}

pub fn icon_warning() -> String {
    format!("{}⚠{}", YELLOW, RESET)
}

pub fn icon_bullet() -> String {
    format!("{}•{}", GRAY, RESET)
}

pub fn print_success(msg: &str) {
    println!("{} {}", icon_success(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}{}{}", icon_error(), RED, msg, RESET);
}

pub fn print_warning(msg: &str) {
    println!("{} {}{}{}", icon_warning(), YELLOW, msg, RESET);
}

pub fn print_header(title: &str) {
    println!();
    println!(
        "{}{} {} {}{}",
        BOLD,
        CYAN,
        title,
        "─".repeat(50usize.saturating_sub(title.chars().count())),
        RESET
    );
    println!();
}

pub fn print_section(title: &str) {
    println!();
    println!("  {}{}{}", BOLD, title, RESET);
    println!("  {}", style_dim(&"─".repeat(40)));
}

pub fn print_key_value(key: &str, value: &str) {
    println!("  {}{}:{} {}", GRAY, key, RESET, value);
}

pub fn print_key_value_colored(key: &str, value: &str, color: &str) {
    println!("  {}{}:{} {}{}{}", GRAY, key, RESET, color, value, RESET);
}

/// `progress` in [0, 1]
pub fn progress_bar(progress: f64, width: usize, tone: Tone) -> String {
    let filled = ((progress.clamp(0.0, 1.0)) * width as f64).round() as usize;
    let empty = width - filled;

    format!(
        "{}{}{}{}{}",
        tone_ansi(tone),
        "█".repeat(filled),
        GRAY,
        "░".repeat(empty),
        RESET
    )
}

pub fn new_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.into_iter().map(Into::into).collect::<Vec<Cell>>());
    table
}

/// Spinner frames; the last one is shown when finished.
pub const SPINNER_TICKS: [&str; 11] = [
    "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓",
];

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&SPINNER_TICKS),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Await `fut` behind a spinner.
pub async fn with_spinner<T>(msg: &str, fut: impl Future<Output = T>) -> T {
    let pb = spinner(msg);
    let out = fut.await;
    pb.finish_and_clear();
    out
}
