//! View-Model Mapper
//!
//! Translates external wire records into the normalized view models.
//!
//! Three agent fields have no source on the wire: `execution_time`,
//! `success_rate` and `last_run`. They are synthesized from fixed defaults at
//! mapping time and never reflect backend state.

use crate::error::{Error, Result};
use crate::models::{
    AccessRequestStatus, AdminAccessRequest, Agent, AgentStatus, Environment, MemberKey, Model,
    Role, Team, TeamMember,
};
use crate::wire::{
    AgentForm, ApiAdminAccessRequest, ApiAgentResponse, ApiTeam, ApiTeamMember, MemberInvite,
    TeamForm,
};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

/// Model used when the backend omits one
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_EXECUTION_TIME_SECS: f64 = 1.0;
pub const DEFAULT_SUCCESS_RATE: f64 = 95.0;
/// `last_run` is reported this many minutes before the mapping time
pub const DEFAULT_LAST_RUN_AGE_MINUTES: i64 = 15;

/// Lifecycle code → status. `Active` is healthy, `Paused` degraded,
/// everything else failed.
pub fn map_status(lifecycle: &str) -> AgentStatus {
    match lifecycle {
        "Active" => AgentStatus::Healthy,
        "Paused" => AgentStatus::Degraded,
        _ => AgentStatus::Failed,
    }
}

/// Lowercase and replace every `_` with `-`; absent or empty falls back to
/// [`DEFAULT_MODEL`].
pub fn normalize_model(raw: Option<&str>) -> Model {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => DEFAULT_MODEL,
    };
    Model::from(raw.replace('_', "-").to_lowercase())
}

/// Split a `;`-separated feature list into trimmed tool identifiers.
pub fn split_tools(key_features: Option<&str>) -> Vec<String> {
    match key_features {
        Some(features) if !features.is_empty() => features
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

pub fn map_agent(api: &ApiAgentResponse, now: DateTime<Utc>) -> Agent {
    Agent {
        id: api.id.to_string(),
        name: api.name.clone(),
        status: map_status(&api.status),
        team: api.category.clone(),
        environment: Environment::Production,
        model: normalize_model(api.model.as_deref()),
        last_run: now - Duration::minutes(DEFAULT_LAST_RUN_AGE_MINUTES),
        execution_time: DEFAULT_EXECUTION_TIME_SECS,
        success_rate: DEFAULT_SUCCESS_RATE,
        tools: split_tools(api.key_features.as_deref()),
        description: api.description.clone().unwrap_or_default(),
    }
    .normalized()
}

pub fn map_agents(items: &[ApiAgentResponse], now: DateTime<Utc>) -> Vec<Agent> {
    items.iter().map(|a| map_agent(a, now)).collect()
}

/// Prefill for the edit dialog: the inverse of the model/tools mapping.
pub fn agent_to_form(agent: &Agent) -> AgentForm {
    AgentForm {
        name: agent.name.clone(),
        description: agent.description.clone(),
        category: agent.team.clone(),
        model: agent.model.as_str().replace('-', "_").to_uppercase(),
        key_features: agent.tools.join("; "),
    }
}

/// Initials from the first character of each name part.
pub fn initials(first: &str, last: &str) -> String {
    first
        .chars()
        .next()
        .into_iter()
        .chain(last.chars().next())
        .collect()
}

fn map_role(raw: &str) -> Role {
    Role::parse(raw).unwrap_or_else(|| {
        warn!(role = raw, "Unknown team role, treating as viewer");
        Role::Viewer
    })
}

pub fn map_member(
    team_id: &str,
    team_name: &str,
    api: &ApiTeamMember,
    now: DateTime<Utc>,
) -> TeamMember {
    TeamMember {
        key: MemberKey::new(team_id, api.user_id.to_string()),
        name: format!("{} {}", api.first_name, api.last_name),
        email: api.email.clone(),
        role: map_role(&api.role),
        teams: vec![team_name.to_string()],
        avatar: initials(&api.first_name, &api.last_name),
        joined_date: now,
    }
}

pub fn map_team(api: &ApiTeam, now: DateTime<Utc>) -> Team {
    let id = api.id.to_string();
    let members: Vec<TeamMember> = api
        .team_members
        .iter()
        .map(|m| map_member(&id, &api.name, m, now))
        .collect();

    if let Some(reported) = api.member_count {
        if reported != members.len() as u64 {
            warn!(
                team_id = %id,
                reported,
                actual = members.len(),
                "Team memberCount disagrees with member list, using member list"
            );
        }
    }

    Team {
        id,
        name: api.name.clone(),
        description: api.description.clone(),
        members,
    }
}

pub fn map_teams(items: &[ApiTeam], now: DateTime<Utc>) -> Vec<Team> {
    items.iter().map(|t| map_team(t, now)).collect()
}

/// Parse a backend timestamp: RFC 3339, or a naive UTC date-time.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(Error::InvalidTimestamp(raw.to_string()))
}

pub fn map_access_request(api: &ApiAdminAccessRequest) -> Result<AdminAccessRequest> {
    Ok(AdminAccessRequest {
        id: api.id.to_string(),
        ai_agent_id: api.ai_agent_id.to_string(),
        requested_by_user_id: api.requested_by_user_id.to_string(),
        status: AccessRequestStatus::from(api.status.clone()),
        reviewed_by_user_id: api.reviewed_by_user_id.map(|id| id.to_string()),
        note: api.note.clone(),
        created_at: parse_timestamp(&api.created_at)?,
    })
}

/// Locally created team shown before the backend assigns an id.
pub fn placeholder_team(form: &TeamForm) -> Team {
    Team {
        id: format!("team-{}", Uuid::new_v4()),
        name: form.name.trim().to_string(),
        description: form.description.trim().to_string(),
        members: Vec::new(),
    }
}

/// Locally created membership for an invited email address. The person id
/// is temporary; the display name is the email's local part.
pub fn member_from_invite(team: &Team, invite: &MemberInvite, now: DateTime<Utc>) -> TeamMember {
    let email = invite.email.trim();
    let local = email.split('@').next().unwrap_or(email);
    TeamMember {
        key: MemberKey::new(team.id.clone(), Uuid::new_v4().to_string()),
        name: local.to_string(),
        email: email.to_string(),
        role: map_role(&invite.role),
        teams: vec![team.name.clone()],
        avatar: email
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect::<String>())
            .unwrap_or_default(),
        joined_date: now,
    }
}
