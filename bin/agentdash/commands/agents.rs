//! Agent commands: list, show, create, update, lifecycle, team assignment

use super::confirm;
use crate::style::*;
use agent_dashboard::badge::{
    environment_tone, relative_time, status_badge, success_rate_tone, Tone,
};
use agent_dashboard::history::{execution_history, success_percentage};
use agent_dashboard::mapper::{agent_to_form, DEFAULT_MODEL};
use agent_dashboard::metrics::sparkline;
use agent_dashboard::query::{query_agents, unique_environments, unique_models, unique_teams};
use agent_dashboard::state::{
    validate_agent_form, validate_assignment, AgentsAction, AgentsPage, LoadState,
};
use agent_dashboard::{
    Agent, AgentFilter, AgentForm, AgentQuery, AgentStatus, AgentSummary, AssignTeamRequest,
    DashboardConfig, DataSource, Error, SortDirection, SortField, SortState,
};
use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use comfy_table::{Cell, Row};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Team label
    #[arg(long)]
    team: Option<String>,

    /// production, staging or development
    #[arg(long = "env")]
    environment: Option<String>,

    /// Model identifier, e.g. gpt-4o
    #[arg(long)]
    model: Option<String>,

    /// healthy, degraded or failed
    #[arg(long)]
    status: Option<String>,

    /// Case-insensitive match on name or description
    #[arg(short, long)]
    search: Option<String>,

    /// Sort field (name, status, team, last_run, success_rate, ...)
    #[arg(long, default_value = "name")]
    sort: String,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Only agents owned by the current user
    #[arg(long)]
    mine: bool,

    /// Server-side team scope (team ID)
    #[arg(long)]
    team_id: Option<String>,

    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Defaults to the dashboard page size
    #[arg(long)]
    page_size: Option<u32>,
}

#[derive(Args, Debug)]
pub struct AgentFields {
    #[arg(long)]
    name: String,

    #[arg(long)]
    description: String,

    /// Team or category label
    #[arg(long, default_value = "")]
    category: String,

    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Tool identifier (repeatable)
    #[arg(long = "tool")]
    tools: Vec<String>,
}

impl AgentFields {
    fn into_form(self) -> AgentForm {
        AgentForm {
            name: self.name,
            description: self.description,
            category: self.category,
            model: self.model,
            key_features: self.tools.join("; "),
        }
    }
}

#[derive(Args, Debug)]
pub struct AgentPatch {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    model: Option<String>,

    /// Replace the tool list (repeatable)
    #[arg(long = "tool")]
    tools: Vec<String>,
}

impl AgentPatch {
    fn apply_to(self, form: &mut AgentForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(model) = self.model {
            form.model = model;
        }
        if !self.tools.is_empty() {
            form.key_features = self.tools.join("; ");
        }
    }
}

pub async fn list(source: &dyn DataSource, config: &DashboardConfig, args: ListArgs) -> Result<()> {
    let field = SortField::parse(&args.sort)
        .ok_or_else(|| anyhow!("Unknown sort field '{}'", args.sort))?;

    let agents = if args.mine {
        with_spinner("Loading your agents...", source.fetch_my_agents()).await
    } else {
        let page_size = args.page_size.unwrap_or(config.dashboard_page_size);
        let mut query = AgentQuery::page(args.page, page_size);
        if let Some(team_id) = args.team_id {
            query = query.with_team(team_id);
        }
        with_spinner("Loading agents...", source.fetch_agents(&query)).await
    }?;

    let filter = AgentFilter {
        team: args.team,
        environment: args.environment,
        model: args.model,
        status: args.status,
    };
    let sort = SortState {
        field,
        direction: if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        },
    };
    let search = args.search.unwrap_or_default();
    let rows = query_agents(&agents, &filter, &search, Some(&sort));

    print_header("Agents");
    if rows.is_empty() {
        println!("  {}", style_dim("No agents match the current filters"));
        println!();
        return Ok(());
    }

    let now = Utc::now();
    let mut table = new_table([
        "ID",
        "Name",
        "Status",
        "Team",
        "Environment",
        "Model",
        "Last run",
        "Exec time",
        "Success",
    ]);
    for agent in &rows {
        table.add_row(agent_row(agent, now));
    }
    println!("{table}");
    println!(
        "  {}",
        style_gray(&format!(
            "{} of {} agents, sorted by {} {}",
            rows.len(),
            agents.len(),
            sort.field,
            sort.direction.arrow()
        ))
    );
    println!();
    Ok(())
}

fn agent_row(agent: &Agent, now: DateTime<Utc>) -> Row {
    let (tone, label) = status_badge(agent.status);
    Row::from(vec![
        Cell::new(&agent.id),
        Cell::new(&agent.name),
        toned_cell(tone, label),
        Cell::new(&agent.team),
        toned_cell(environment_tone(agent.environment), agent.environment),
        Cell::new(&agent.model),
        Cell::new(relative_time(agent.last_run, now)),
        Cell::new(format!("{:.1}s", agent.execution_time)),
        toned_cell(
            success_rate_tone(agent.success_rate),
            format!("{:.1}%", agent.success_rate),
        ),
    ])
}

pub async fn show(source: &dyn DataSource, id: &str) -> Result<()> {
    let agent = with_spinner("Loading agent...", source.fetch_agent(id)).await?;
    let now = Utc::now();

    print_header(&agent.name);
    print_agent(&agent, now);

    print_section("Tools");
    if agent.tools.is_empty() {
        println!("    {} none", style_dim("─"));
    } else {
        for tool in &agent.tools {
            println!("    {} {}", icon_bullet(), tool);
        }
    }

    print_section("Execution History");
    let events = execution_history(now);
    let mut table = new_table(["Time", "Duration", "Result", "Tokens"]);
    for event in events.iter().rev() {
        let result = if event.success {
            toned_cell(Tone::Positive, "success")
        } else {
            toned_cell(Tone::Critical, "failed")
        };
        table.add_row(vec![
            Cell::new(relative_time(event.timestamp, now)),
            Cell::new(format!("{}s", event.duration)),
            result,
            Cell::new(event.tokens),
        ]);
    }
    println!("{table}");

    let durations: Vec<f64> = events.iter().map(|e| f64::from(e.duration)).collect();
    print_key_value("Success", &format!("{:.0}%", success_percentage(&events)));
    print_key_value("Duration trend", &sparkline(&durations));
    println!();
    Ok(())
}

fn print_agent(agent: &Agent, now: DateTime<Utc>) {
    let (tone, label) = status_badge(agent.status);
    print_key_value("ID", &agent.id);
    print_key_value_colored("Status", label, tone_ansi(tone));
    print_key_value("Team", &agent.team);
    print_key_value_colored(
        "Environment",
        agent.environment.as_str(),
        tone_ansi(environment_tone(agent.environment)),
    );
    print_key_value("Model", agent.model.as_str());
    print_key_value("Last run", &relative_time(agent.last_run, now));
    print_key_value("Avg execution", &format!("{:.1}s", agent.execution_time));
    print_key_value(
        "Success rate",
        &format!(
            "{} {:.1}%",
            progress_bar(
                agent.success_rate / 100.0,
                20,
                success_rate_tone(agent.success_rate)
            ),
            agent.success_rate
        ),
    );
    if !agent.description.is_empty() {
        print_key_value("Description", &agent.description);
    }
}

pub async fn create(source: &dyn DataSource, fields: AgentFields) -> Result<()> {
    let form = fields.into_form();
    validate_agent_form(&form)?;

    let agent = with_spinner("Creating agent...", source.create_agent(&form)).await?;
    print_success(&format!("Created agent {} ({})", agent.name, agent.id));
    println!();
    print_agent(&agent, Utc::now());
    println!();
    Ok(())
}

pub async fn update(source: &dyn DataSource, id: &str, patch: AgentPatch) -> Result<()> {
    let current = with_spinner("Loading agent...", source.fetch_agent(id)).await?;
    let mut form = agent_to_form(&current);
    patch.apply_to(&mut form);
    validate_agent_form(&form)?;

    let agent = with_spinner("Updating agent...", source.update_agent(id, &form)).await?;
    print_success(&format!("Updated agent {}", agent.name));
    println!();
    print_agent(&agent, Utc::now());
    println!();
    Ok(())
}

pub async fn set_active(source: &dyn DataSource, id: &str, active: bool) -> Result<()> {
    let agent = if active {
        with_spinner("Activating agent...", source.activate_agent(id)).await?
    } else {
        with_spinner("Deactivating agent...", source.deactivate_agent(id)).await?
    };
    let (tone, label) = status_badge(agent.status);
    print_success(&format!("{} is now {}", agent.name, toned(tone, label)));
    Ok(())
}

pub async fn assign_team(
    source: &dyn DataSource,
    id: &str,
    team_id: String,
    team_name: Option<String>,
) -> Result<()> {
    let request = AssignTeamRequest { team_id, team_name };
    validate_assignment(&request)?;

    let agent = with_spinner("Assigning team...", source.assign_team(id, &request)).await?;
    print_success(&format!("{} now belongs to {}", agent.name, agent.team));
    Ok(())
}

/// There is no delete endpoint; the agent is dropped from the loaded list.
pub async fn delete(source: &dyn DataSource, id: &str, yes: bool) -> Result<()> {
    let mut page = AgentsPage::default();
    with_spinner("Loading agents...", page.load(source, &AgentQuery::dashboard())).await;
    if let LoadState::Failed(message) = &page.agents {
        bail!("{}", message);
    }

    let name = match page.agents.value().and_then(|s| s.get(id)) {
        Some(agent) => agent.name.clone(),
        None => return Err(Error::not_found("Agent", id).into()),
    };
    if !confirm(&format!("Remove agent '{}' from the listing?", name), yes)? {
        print_warning("Cancelled");
        return Ok(());
    }

    page.apply(AgentsAction::Removed(id.to_string()));
    let remaining = page.agents.value().map_or(0, |s| s.len());
    print_success(&format!("Removed {} ({} agents listed)", name, remaining));
    print_warning("The backend has no delete endpoint; the agent reappears on the next load");
    Ok(())
}

pub async fn stats(source: &dyn DataSource, config: &DashboardConfig) -> Result<()> {
    let query = AgentQuery::page(1, config.dashboard_page_size);
    let agents = with_spinner("Loading agents...", source.fetch_agents(&query)).await?;
    let summary = AgentSummary::from_agents(&agents);

    print_header("Agent Statistics");

    print_section("Fleet");
    println!();
    print_key_value("Total agents", &summary.total.to_string());
    for status in AgentStatus::ALL {
        let (tone, label) = status_badge(status);
        print_key_value_colored(label, &summary.counts.get(status).to_string(), tone_ansi(tone));
    }
    print_key_value_colored(
        "Avg success rate",
        &format!("{:.1}%", summary.average_success_rate),
        tone_ansi(success_rate_tone(summary.average_success_rate)),
    );
    println!();

    print_section("Coverage");
    println!();
    print_key_value("Teams", &unique_teams(&agents).join(", "));
    print_key_value("Environments", &unique_environments(&agents).join(", "));
    print_key_value("Models", &unique_models(&agents).join(", "));
    println!();

    print_section("By Team");
    let mut table = new_table(["Team", "Agents", "Healthy", "Avg success"]);
    for team in unique_teams(&agents) {
        let members: Vec<Agent> = agents.iter().filter(|a| a.team == team).cloned().collect();
        let team_summary = AgentSummary::from_agents(&members);
        table.add_row(vec![
            Cell::new(&team),
            Cell::new(team_summary.total),
            Cell::new(team_summary.counts.healthy),
            toned_cell(
                success_rate_tone(team_summary.average_success_rate),
                format!("{:.1}%", team_summary.average_success_rate),
            ),
        ]);
    }
    println!("{table}");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_keeps_unset_fields() {
        let mut form = AgentForm {
            name: "Invoice Processor".to_string(),
            description: "Extracts invoice data".to_string(),
            category: "Finance".to_string(),
            model: "GPT_4".to_string(),
            key_features: "ocr; validation".to_string(),
        };
        let patch = AgentPatch {
            name: None,
            description: Some("Extracts and validates invoices".to_string()),
            category: None,
            model: None,
            tools: Vec::new(),
        };
        patch.apply_to(&mut form);
        assert_eq!(form.name, "Invoice Processor");
        assert_eq!(form.description, "Extracts and validates invoices");
        assert_eq!(form.key_features, "ocr; validation");
    }

    #[test]
    fn test_fields_join_tools() {
        let fields = AgentFields {
            name: "Scout".to_string(),
            description: "Finds leads".to_string(),
            category: String::new(),
            model: DEFAULT_MODEL.to_string(),
            tools: vec!["crm".to_string(), "email".to_string()],
        };
        assert_eq!(fields.into_form().key_features, "crm; email");
    }
}
