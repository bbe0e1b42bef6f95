//! Demo data set
//!
//! Eight agents and six people spread over seven teams. [`FixtureSource`]
//! serves them through [`DataSource`] so every surface runs without a
//! backend.

use crate::error::{Error, Result};
use crate::mapper::{map_agent, member_from_invite};
use crate::models::{
    AccessRequestStatus, AdminAccessRequest, Agent, AgentStatus, Environment, MemberKey, Model,
    Role, Team, TeamMember,
};
use crate::source::{AgentQuery, DataSource, MEMBER_REMOVED, TEAM_DELETED};
use crate::store::{AgentStore, TeamStore};
use crate::wire::{
    AgentForm, ApiAgentResponse, ApiTeam, AssignTeamRequest, MemberInvite, MutationResponse,
    TeamForm,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

struct AgentSeed {
    name: &'static str,
    status: AgentStatus,
    team: &'static str,
    environment: Environment,
    model: Model,
    minutes_ago: i64,
    execution_time: f64,
    success_rate: f64,
    tools: &'static [&'static str],
    description: &'static str,
}

fn agent_seeds() -> [AgentSeed; 8] {
    [
        AgentSeed {
            name: "Customer Support Agent",
            status: AgentStatus::Healthy,
            team: "Customer Success",
            environment: Environment::Production,
            model: Model::Gpt4,
            minutes_ago: 15,
            execution_time: 2.3,
            success_rate: 98.5,
            tools: &["email", "zendesk", "slack"],
            description: "Handles tier-1 customer support inquiries and ticket routing",
        },
        AgentSeed {
            name: "Code Review Assistant",
            status: AgentStatus::Healthy,
            team: "Engineering",
            environment: Environment::Production,
            model: Model::Claude3Opus,
            minutes_ago: 5,
            execution_time: 4.1,
            success_rate: 95.2,
            tools: &["github", "jira", "sonarqube"],
            description: "Automated code review and security vulnerability detection",
        },
        AgentSeed {
            name: "Data Pipeline Monitor",
            status: AgentStatus::Degraded,
            team: "Data",
            environment: Environment::Production,
            model: Model::Gpt35Turbo,
            minutes_ago: 45,
            execution_time: 5.8,
            success_rate: 87.3,
            tools: &["snowflake", "datadog", "pagerduty"],
            description: "Monitors data pipeline health and sends alerts",
        },
        AgentSeed {
            name: "Sales Lead Qualifier",
            status: AgentStatus::Healthy,
            team: "Sales",
            environment: Environment::Production,
            model: Model::Gpt4,
            minutes_ago: 8,
            execution_time: 1.9,
            success_rate: 96.7,
            tools: &["salesforce", "clearbit", "slack"],
            description: "Qualifies inbound leads and enriches contact data",
        },
        AgentSeed {
            name: "Content Moderator",
            status: AgentStatus::Healthy,
            team: "Trust & Safety",
            environment: Environment::Production,
            model: Model::Claude3Sonnet,
            minutes_ago: 2,
            execution_time: 0.8,
            success_rate: 99.1,
            tools: &["moderation-api", "slack"],
            description: "Moderates user-generated content for policy violations",
        },
        AgentSeed {
            name: "Invoice Processor",
            status: AgentStatus::Failed,
            team: "Finance",
            environment: Environment::Production,
            model: Model::Gpt35Turbo,
            minutes_ago: 120,
            execution_time: 3.2,
            success_rate: 72.4,
            tools: &["quickbooks", "stripe", "email"],
            description: "Processes and categorizes invoices automatically",
        },
        AgentSeed {
            name: "Marketing Analyzer",
            status: AgentStatus::Healthy,
            team: "Marketing",
            environment: Environment::Staging,
            model: Model::GeminiPro,
            minutes_ago: 30,
            execution_time: 2.7,
            success_rate: 94.8,
            tools: &["google-analytics", "mixpanel", "hubspot"],
            description: "Analyzes marketing campaign performance",
        },
        AgentSeed {
            name: "Incident Responder",
            status: AgentStatus::Healthy,
            team: "Engineering",
            environment: Environment::Production,
            model: Model::Claude3Opus,
            minutes_ago: 60,
            execution_time: 6.4,
            success_rate: 91.2,
            tools: &["pagerduty", "datadog", "slack", "jira"],
            description: "First responder for production incidents",
        },
    ]
}

/// The demo agents, ids `"1"` through `"8"`, with `last_run` relative to `now`.
pub fn demo_agents(now: DateTime<Utc>) -> Vec<Agent> {
    agent_seeds()
        .into_iter()
        .enumerate()
        .map(|(i, seed)| Agent {
            id: (i + 1).to_string(),
            name: seed.name.to_string(),
            status: seed.status,
            team: seed.team.to_string(),
            environment: seed.environment,
            model: seed.model,
            last_run: now - Duration::minutes(seed.minutes_ago),
            execution_time: seed.execution_time,
            success_rate: seed.success_rate,
            tools: seed.tools.iter().map(|t| t.to_string()).collect(),
            description: seed.description.to_string(),
        }
        .normalized())
        .collect()
}

/// A person of the demo organization, before being grouped into teams
#[derive(Debug, Clone, PartialEq)]
pub struct DemoPerson {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub role: Role,
    pub teams: &'static [&'static str],
    pub avatar: &'static str,
    pub joined: (i32, u32, u32),
}

pub fn demo_people() -> Vec<DemoPerson> {
    vec![
        DemoPerson {
            id: "1",
            name: "Sarah Chen",
            email: "sarah.chen@99xagent.com",
            role: Role::Admin,
            teams: &["Engineering", "Data"],
            avatar: "SC",
            joined: (2023, 1, 15),
        },
        DemoPerson {
            id: "2",
            name: "Marcus Johnson",
            email: "marcus.j@99xagent.com",
            role: Role::Developer,
            teams: &["Engineering"],
            avatar: "MJ",
            joined: (2023, 3, 22),
        },
        DemoPerson {
            id: "3",
            name: "Yuki Tanaka",
            email: "yuki.t@99xagent.com",
            role: Role::Developer,
            teams: &["Customer Success", "Sales"],
            avatar: "YT",
            joined: (2023, 6, 10),
        },
        DemoPerson {
            id: "4",
            name: "Alex Rivera",
            email: "alex.rivera@99xagent.com",
            role: Role::Admin,
            teams: &["Engineering", "Trust & Safety", "Data"],
            avatar: "AR",
            joined: (2022, 11, 5),
        },
        DemoPerson {
            id: "5",
            name: "Emma Wilson",
            email: "emma.w@99xagent.com",
            role: Role::Viewer,
            teams: &["Marketing"],
            avatar: "EW",
            joined: (2024, 1, 8),
        },
        DemoPerson {
            id: "6",
            name: "David Park",
            email: "david.park@99xagent.com",
            role: Role::Developer,
            teams: &["Finance"],
            avatar: "DP",
            joined: (2023, 9, 14),
        },
    ]
}

fn team_description(name: &str) -> &'static str {
    match name {
        "Engineering" => "Builds and operates the agent platform",
        "Data" => "Owns pipelines, warehousing and analytics agents",
        "Customer Success" => "Support automation and customer onboarding",
        "Sales" => "Lead qualification and pipeline tooling",
        "Trust & Safety" => "Content policy and moderation",
        "Marketing" => "Campaign analytics",
        "Finance" => "Billing and invoicing automation",
        _ => "",
    }
}

fn joined_at((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .unwrap_or_default()
}

/// Demo people grouped into teams by label, teams in order of first
/// appearance with ids `"1"`, `"2"`, ...
pub fn demo_teams() -> Vec<Team> {
    let people = demo_people();
    let mut teams: Vec<Team> = Vec::new();

    for person in &people {
        for label in person.teams {
            let idx = match teams.iter().position(|t| t.name == *label) {
                Some(idx) => idx,
                None => {
                    teams.push(Team {
                        id: (teams.len() + 1).to_string(),
                        name: label.to_string(),
                        description: team_description(label).to_string(),
                        members: Vec::new(),
                    });
                    teams.len() - 1
                }
            };
            let team = &mut teams[idx];
            team.members.push(TeamMember {
                key: MemberKey::new(team.id.clone(), person.id),
                name: person.name.to_string(),
                email: person.email.to_string(),
                role: person.role,
                teams: person.teams.iter().map(|t| t.to_string()).collect(),
                avatar: person.avatar.to_string(),
                joined_date: joined_at(person.joined),
            });
        }
    }
    teams
}

fn demo_access_requests() -> Vec<AdminAccessRequest> {
    vec![
        AdminAccessRequest {
            id: "1".to_string(),
            ai_agent_id: "2".to_string(),
            requested_by_user_id: "2".to_string(),
            status: AccessRequestStatus::Approved,
            reviewed_by_user_id: Some("1".to_string()),
            note: Some("Needs to tune review rules".to_string()),
            created_at: joined_at((2024, 2, 12)),
        },
        AdminAccessRequest {
            id: "2".to_string(),
            ai_agent_id: "6".to_string(),
            requested_by_user_id: "6".to_string(),
            status: AccessRequestStatus::Pending,
            reviewed_by_user_id: None,
            note: None,
            created_at: joined_at((2024, 3, 4)),
        },
    ]
}

struct FixtureState {
    agents: AgentStore,
    teams: TeamStore,
    access_requests: Vec<AdminAccessRequest>,
}

fn next_numeric_id<'a>(ids: impl Iterator<Item = &'a str>) -> u64 {
    ids.filter_map(|id| id.parse::<u64>().ok()).max().unwrap_or(0) + 1
}

/// In-memory [`DataSource`] over the demo data set.
///
/// Mutations apply to the in-memory copy only and echo results the way the
/// backend would.
pub struct FixtureSource {
    state: Mutex<FixtureState>,
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl FixtureSource {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_data(demo_agents(now), demo_teams())
    }

    pub fn with_data(agents: Vec<Agent>, teams: Vec<Team>) -> Self {
        Self {
            state: Mutex::new(FixtureState {
                agents: AgentStore::new(agents),
                teams: TeamStore::new(teams),
                access_requests: demo_access_requests(),
            }),
        }
    }

    async fn update_status(&self, id: &str, status: AgentStatus) -> Result<Agent> {
        let mut state = self.state.lock().await;
        let mut agent = state
            .agents
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("Agent", id))?;
        agent.status = status;
        state.agents.replace_by_id(agent.clone());
        info!("Agent {} is now {}", id, status);
        Ok(agent)
    }
}

/// A form applied to an existing agent keeps its runtime fields; a new agent
/// gets the same synthesized defaults a backend record would.
fn agent_from_form(id: u64, form: &AgentForm, current: Option<&Agent>) -> Agent {
    let echoed = ApiAgentResponse {
        id,
        name: form.name.trim().to_string(),
        description: Some(form.description.trim().to_string()),
        key_features: Some(form.key_features.clone()),
        category: form.category.clone(),
        status: "Active".to_string(),
        model: Some(form.model.clone()),
        team_members: Vec::new(),
    };
    let mapped = map_agent(&echoed, Utc::now());
    let agent = match current {
        Some(current) => Agent {
            id: current.id.clone(),
            status: current.status,
            environment: current.environment,
            last_run: current.last_run,
            execution_time: current.execution_time,
            success_rate: current.success_rate,
            ..mapped
        },
        None => mapped,
    };
    agent.normalized()
}

#[async_trait]
impl DataSource for FixtureSource {
    async fn fetch_agents(&self, query: &AgentQuery) -> Result<Vec<Agent>> {
        let state = self.state.lock().await;
        let scoped = state.agents.agents().iter().filter(|a| match &query.team_id {
            Some(team) => &a.team == team,
            None => true,
        });
        let skip = (query.page.max(1) as usize - 1) * query.page_size as usize;
        Ok(scoped
            .skip(skip)
            .take(query.page_size as usize)
            .cloned()
            .collect())
    }

    async fn fetch_my_agents(&self) -> Result<Vec<Agent>> {
        Ok(self.state.lock().await.agents.agents().to_vec())
    }

    async fn fetch_agent(&self, id: &str) -> Result<Agent> {
        self.state
            .lock()
            .await
            .agents
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("Agent", id))
    }

    async fn create_agent(&self, form: &AgentForm) -> Result<Agent> {
        let mut state = self.state.lock().await;
        let id = next_numeric_id(state.agents.agents().iter().map(|a| a.id.as_str()));
        let agent = agent_from_form(id, form, None);
        state.agents.insert(agent.clone());
        info!("Created demo agent {} ({})", agent.id, agent.name);
        Ok(agent)
    }

    async fn update_agent(&self, id: &str, form: &AgentForm) -> Result<Agent> {
        let mut state = self.state.lock().await;
        let current = state
            .agents
            .get(id)
            .ok_or_else(|| Error::not_found("Agent", id))?;
        let agent = agent_from_form(0, form, Some(current));
        state.agents.replace_by_id(agent.clone());
        Ok(agent)
    }

    async fn activate_agent(&self, id: &str) -> Result<Agent> {
        self.update_status(id, AgentStatus::Healthy).await
    }

    async fn deactivate_agent(&self, id: &str) -> Result<Agent> {
        self.update_status(id, AgentStatus::Failed).await
    }

    async fn assign_team(&self, id: &str, request: &AssignTeamRequest) -> Result<Agent> {
        let mut state = self.state.lock().await;
        let label = match &request.team_name {
            Some(name) => name.clone(),
            None => state
                .teams
                .get(&request.team_id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| request.team_id.clone()),
        };
        let mut agent = state
            .agents
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found("Agent", id))?;
        agent.team = label;
        state.agents.replace_by_id(agent.clone());
        Ok(agent)
    }

    async fn fetch_teams(&self) -> Result<Vec<Team>> {
        Ok(self.state.lock().await.teams.teams().to_vec())
    }

    async fn fetch_my_teams(&self) -> Result<Vec<Team>> {
        self.fetch_teams().await
    }

    async fn create_team(&self, form: &TeamForm) -> Result<MutationResponse> {
        let mut state = self.state.lock().await;
        let id = next_numeric_id(state.teams.teams().iter().map(|t| t.id.as_str()));
        let team = Team {
            id: id.to_string(),
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            members: Vec::new(),
        };
        let echoed = ApiTeam {
            id,
            name: team.name.clone(),
            description: team.description.clone(),
            member_count: Some(0),
            team_members: Vec::new(),
        };
        state.teams.add_team(team);
        Ok(MutationResponse {
            team: Some(echoed),
            ..MutationResponse::simulated("Team created successfully")
        })
    }

    async fn update_team(&self, team_id: &str, form: &TeamForm) -> Result<MutationResponse> {
        let mut state = self.state.lock().await;
        if !state
            .teams
            .rename_team(team_id, form.name.trim(), form.description.trim())
        {
            return Err(Error::not_found("Team", team_id));
        }
        Ok(MutationResponse::simulated("Team updated successfully"))
    }

    async fn delete_team(&self, team_id: &str) -> Result<MutationResponse> {
        if self.state.lock().await.teams.remove_team(team_id).is_none() {
            debug!("Demo team {} already absent", team_id);
        }
        Ok(MutationResponse::simulated(TEAM_DELETED))
    }

    async fn add_team_member(
        &self,
        team_id: &str,
        invite: &MemberInvite,
    ) -> Result<MutationResponse> {
        let mut state = self.state.lock().await;
        let team = state
            .teams
            .get(team_id)
            .ok_or_else(|| Error::not_found("Team", team_id))?;
        let member = member_from_invite(team, invite, Utc::now());
        state.teams.add_member(member);
        Ok(MutationResponse::simulated("Team member added successfully"))
    }

    async fn remove_team_member(&self, key: &MemberKey) -> Result<MutationResponse> {
        if self.state.lock().await.teams.remove_member(key).is_none() {
            debug!("Demo member {} already absent", key);
        }
        Ok(MutationResponse::simulated(MEMBER_REMOVED))
    }

    async fn invite_member(&self, invite: &MemberInvite) -> Result<MutationResponse> {
        Ok(MutationResponse {
            invitation_id: Some(Uuid::new_v4().to_string()),
            ..MutationResponse::simulated(format!("Invitation sent to {}", invite.email.trim()))
        })
    }

    async fn fetch_access_requests(&self) -> Result<Vec<AdminAccessRequest>> {
        Ok(self.state.lock().await.access_requests.clone())
    }

    async fn create_access_request(&self, agent_id: &str) -> Result<AdminAccessRequest> {
        let mut state = self.state.lock().await;
        if state.agents.get(agent_id).is_none() {
            return Err(Error::not_found("Agent", agent_id));
        }
        let id = next_numeric_id(state.access_requests.iter().map(|r| r.id.as_str()));
        let request = AdminAccessRequest {
            id: id.to_string(),
            ai_agent_id: agent_id.to_string(),
            requested_by_user_id: "1".to_string(),
            status: AccessRequestStatus::Pending,
            reviewed_by_user_id: None,
            note: None,
            created_at: Utc::now(),
        };
        state.access_requests.push(request.clone());
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 2, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_demo_agents() {
        let agents = demo_agents(now());
        assert_eq!(agents.len(), 8);
        assert_eq!(agents[0].id, "1");
        assert_eq!(agents[5].name, "Invoice Processor");
        assert_eq!(agents[5].last_run, now() - Duration::hours(2));
        assert_eq!(agents[7].tools.len(), 4);
        assert!(agents.iter().all(|a| (0.0..=100.0).contains(&a.success_rate)));
    }

    #[test]
    fn test_agent_from_form_clamps_carried_runtime_fields() {
        let mut current = demo_agents(now()).remove(0);
        current.success_rate = 140.0;
        current.execution_time = -2.0;
        let form = AgentForm {
            name: " Renamed ".to_string(),
            description: "Updated".to_string(),
            category: current.team.clone(),
            model: "gpt-4".to_string(),
            key_features: String::new(),
        };

        let agent = agent_from_form(1, &form, Some(&current));
        assert_eq!(agent.name, "Renamed");
        assert_eq!(agent.success_rate, 100.0);
        assert_eq!(agent.execution_time, 0.0);
    }

    #[test]
    fn test_demo_teams_group_people_by_label() {
        let teams = demo_teams();
        let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Engineering",
                "Data",
                "Customer Success",
                "Sales",
                "Trust & Safety",
                "Marketing",
                "Finance"
            ]
        );
        assert_eq!(teams[0].member_count(), 3);
        assert_eq!(teams[1].member_count(), 2);
        assert_eq!(teams.iter().map(Team::member_count).sum::<usize>(), 10);
        assert_eq!(teams[1].members[0].key, MemberKey::new("2", "1"));
        assert_eq!(
            teams[0].members[0].joined_date,
            Utc.with_ymd_and_hms(2023, 1, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_fetch_agents_pages_and_scopes() {
        let source = FixtureSource::new(now());
        let page = tokio_test::block_on(source.fetch_agents(&AgentQuery::page(2, 3))).unwrap();
        let ids: Vec<&str> = page.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "5", "6"]);

        let scoped =
            tokio_test::block_on(source.fetch_agents(&AgentQuery::list().with_team("Engineering")))
                .unwrap();
        assert_eq!(scoped.len(), 2);
    }

    #[test]
    fn test_agent_mutations_apply_locally() {
        let source = FixtureSource::new(now());
        let form = AgentForm {
            name: "Release Notes Writer".into(),
            description: "Drafts release notes".into(),
            category: "Engineering".into(),
            model: "CLAUDE_3_SONNET".into(),
            key_features: "github; slack".into(),
        };
        let created = tokio_test::block_on(source.create_agent(&form)).unwrap();
        assert_eq!(created.id, "9");
        assert_eq!(created.model, Model::Claude3Sonnet);

        let failed = tokio_test::block_on(source.deactivate_agent("9")).unwrap();
        assert_eq!(failed.status, AgentStatus::Failed);

        let request = AssignTeamRequest {
            team_id: "2".into(),
            team_name: None,
        };
        let moved = tokio_test::block_on(source.assign_team("9", &request)).unwrap();
        assert_eq!(moved.team, "Data");

        let err = tokio_test::block_on(source.activate_agent("99")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_team_mutations_apply_locally() {
        let source = FixtureSource::new(now());
        let form = TeamForm {
            name: "Platform".into(),
            description: "Infra".into(),
        };
        let ack = tokio_test::block_on(source.create_team(&form)).unwrap();
        assert_eq!(ack.team.map(|t| t.id), Some(8));

        let invite = MemberInvite {
            email: "new.hire@99xagent.com".into(),
            role: "viewer".into(),
        };
        tokio_test::block_on(source.add_team_member("8", &invite)).unwrap();
        let teams = tokio_test::block_on(source.fetch_teams()).unwrap();
        assert_eq!(teams[7].member_count(), 1);
        assert_eq!(teams[7].members[0].name, "new.hire");

        tokio_test::block_on(source.delete_team("1")).unwrap();
        let teams = tokio_test::block_on(source.fetch_teams()).unwrap();
        assert!(teams.iter().all(|t| t.id != "1"));
        assert!(teams
            .iter()
            .flat_map(|t| t.members.iter())
            .all(|m| m.key.team_id != "1"));
    }

    #[test]
    fn test_access_requests() {
        let source = FixtureSource::new(now());
        let created = tokio_test::block_on(source.create_access_request("3")).unwrap();
        assert_eq!(created.id, "3");
        assert_eq!(created.status, AccessRequestStatus::Pending);
        assert_eq!(
            tokio_test::block_on(source.fetch_access_requests())
                .unwrap()
                .len(),
            3
        );
        assert!(tokio_test::block_on(source.create_access_request("42")).is_err());
    }
}
