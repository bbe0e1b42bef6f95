mod app;
mod ui;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use agent_dashboard::metrics::MetricsSnapshot;
use agent_dashboard::{DashboardClient, DashboardConfig, DataSource, FixtureSource, SourceKind};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing_subscriber::EnvFilter;

use crate::app::{App, Command};

#[derive(Parser)]
#[command(name = "agentdash-tui", about = "Agent Dashboard terminal UI")]
struct Cli {
    /// Config file (default: <config dir>/agentdash/config.toml)
    #[arg(short, long, env = "AGENTDASH_CONFIG")]
    config: Option<PathBuf>,

    /// API base URL (overrides config and AGENTDASH_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Data source: remote or fixtures
    #[arg(long)]
    source: Option<String>,

    /// Initial tab to display
    #[arg(long, default_value = "dashboard")]
    tab: String,

    /// Seconds between automatic reloads, 0 to disable
    #[arg(long, default_value_t = 60)]
    refresh_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let source: Box<dyn DataSource> = match config.source {
        SourceKind::Remote => Box::new(
            DashboardClient::from_config(&config).context("Failed to build HTTP client")?,
        ),
        SourceKind::Fixtures => Box::new(FixtureSource::new(Utc::now())),
    };

    let mut terminal = ratatui::try_init()?;

    let result = run(&mut terminal, cli, &config, source.as_ref()).await;

    ratatui::try_restore()?;

    result
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::resolve(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = url.clone();
    }
    if let Some(raw) = &cli.source {
        config.source = SourceKind::parse(raw)
            .ok_or_else(|| anyhow!("--source must be 'remote' or 'fixtures', got '{}'", raw))?;
    }
    config.validate()?;
    Ok(config)
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    cli: Cli,
    config: &DashboardConfig,
    source: &dyn DataSource,
) -> Result<()> {
    let source_label = match config.source {
        SourceKind::Remote => config.api_base_url.clone(),
        SourceKind::Fixtures => "demo fixtures".to_string(),
    };
    let snapshot = MetricsSnapshot::generate(Utc::now(), &mut rand::thread_rng());
    let mut app = App::new(
        source_label,
        config.dashboard_page_size,
        config.list_page_size,
        snapshot,
    );
    app.set_tab_from_str(&cli.tab);

    app.refresh(source).await;

    let tick_rate = (cli.refresh_secs > 0).then(|| Duration::from_secs(cli.refresh_secs));
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        let timeout = match tick_rate {
            Some(rate) => rate.checked_sub(last_tick.elapsed()).unwrap_or_default(),
            None => Duration::from_secs(1),
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = app.handle_key(key.code) {
                        if command == Command::Reload {
                            last_tick = Instant::now();
                        }
                        app.run_command(source, command).await;
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }

        if tick_rate.is_some_and(|rate| last_tick.elapsed() >= rate) {
            app.refresh(source).await;
            last_tick = Instant::now();
        }
    }

    Ok(())
}
