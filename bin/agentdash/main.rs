//! Agent Dashboard CLI
//!
//! Lists, inspects and mutates monitored AI agents, teams and access
//! requests against the dashboard backend or the built-in demo data.

mod commands;
mod style;

use agent_dashboard::{DashboardClient, DashboardConfig, DataSource, FixtureSource, SourceKind};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use style::print_error;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "agentdash")]
#[command(about = "Agent Dashboard - inspect and manage monitored AI agents")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/agentdash/config.toml)
    #[arg(short, long, global = true, env = "AGENTDASH_CONFIG")]
    config: Option<PathBuf>,

    /// API base URL (overrides config and AGENTDASH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Data source: remote or fixtures
    #[arg(long, global = true)]
    source: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List agents with optional filters, search and sort
    Agents(commands::agents::ListArgs),

    /// Show one agent with its execution history
    Agent {
        /// Agent ID
        id: String,
    },

    /// Register a new agent
    CreateAgent(commands::agents::AgentFields),

    /// Update an agent; omitted fields keep their current value
    UpdateAgent {
        /// Agent ID
        id: String,

        #[command(flatten)]
        fields: commands::agents::AgentPatch,
    },

    /// Activate an agent
    Activate {
        /// Agent ID
        id: String,
    },

    /// Deactivate an agent
    Deactivate {
        /// Agent ID
        id: String,
    },

    /// Assign an agent to a team
    AssignTeam {
        /// Agent ID
        id: String,

        /// Team ID
        #[arg(long)]
        team: String,

        /// Team display name sent along with the ID
        #[arg(long)]
        team_name: Option<String>,
    },

    /// Remove an agent from the listing (no backend delete exists)
    DeleteAgent {
        /// Agent ID
        id: String,
    },

    /// List teams
    Teams {
        /// Only teams the current user belongs to
        #[arg(long)]
        mine: bool,
    },

    /// List team memberships
    Members {
        /// Filter by name, email, role or team
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create, update or delete a team
    #[command(subcommand)]
    Team(commands::teams::TeamCommand),

    /// Add, remove or invite team members
    #[command(subcommand)]
    Member(commands::teams::MemberCommand),

    /// Summary statistics over all agents
    Stats,

    /// Demo metrics over a time range
    Metrics(commands::metrics::MetricsArgs),

    /// List admin access requests, or file one
    AccessRequests {
        /// Request admin access to this agent
        #[arg(long, value_name = "AGENT_ID")]
        request: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("agent_dashboard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    debug!("Using {} source at {}", config.source, config.api_base_url);
    let source = build_source(&config)?;
    let source: &dyn DataSource = source.as_ref();
    let yes = cli.yes;

    match cli.command {
        Commands::Agents(args) => commands::agents::list(source, &config, args).await,
        Commands::Agent { id } => commands::agents::show(source, &id).await,
        Commands::CreateAgent(fields) => commands::agents::create(source, fields).await,
        Commands::UpdateAgent { id, fields } => {
            commands::agents::update(source, &id, fields).await
        }
        Commands::Activate { id } => commands::agents::set_active(source, &id, true).await,
        Commands::Deactivate { id } => commands::agents::set_active(source, &id, false).await,
        Commands::AssignTeam {
            id,
            team,
            team_name,
        } => commands::agents::assign_team(source, &id, team, team_name).await,
        Commands::DeleteAgent { id } => commands::agents::delete(source, &id, yes).await,
        Commands::Teams { mine } => commands::teams::list(source, mine).await,
        Commands::Members { search } => commands::teams::members(source, search).await,
        Commands::Team(cmd) => commands::teams::team(source, cmd, yes).await,
        Commands::Member(cmd) => commands::teams::member(source, cmd, yes).await,
        Commands::Stats => commands::agents::stats(source, &config).await,
        Commands::Metrics(args) => commands::metrics::run(args),
        Commands::AccessRequests { request } => {
            commands::access::run(source, request.as_deref()).await
        }
    }
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

fn build_source(config: &DashboardConfig) -> Result<Box<dyn DataSource>> {
    let source: Box<dyn DataSource> = match config.source {
        SourceKind::Remote => Box::new(
            DashboardClient::from_config(config).context("Failed to build HTTP client")?,
        ),
        SourceKind::Fixtures => Box::new(FixtureSource::new(Utc::now())),
    };
    Ok(source)
}
