//! Page view state
//!
//! Each page owns one state value and changes it through `apply`. Async
//! drivers (`load`, `submit_create`, ...) run a [`DataSource`] call and feed
//! the outcome back through `apply`, so the transitions stay testable
//! without I/O.

use crate::error::{Error, Result};
use crate::mapper::{agent_to_form, map_team, member_from_invite, placeholder_team};
use crate::metrics::{MetricsSnapshot, TimeRange};
use crate::models::{
    AdminAccessRequest, Agent, MemberKey, MetricDataPoint, Role, Team, TeamMember,
};
use crate::query::{
    query_agents, search_members, unique_values, AgentFilter, AgentSummary, Facet, SortField,
    SortState,
};
use crate::source::{AgentQuery, DataSource};
use crate::store::{AgentStore, TeamStore};
use crate::wire::{AgentForm, AssignTeamRequest, MemberInvite, TeamForm};
use chrono::Utc;
use tracing::{debug, warn};

pub const REQUIRED_FIELDS: &str = "Please fill in all required fields";
pub const SELECT_TEAM: &str = "Please select a team";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const TEAM_NAME_REQUIRED: &str = "Team name is required";

/// Lifecycle of a page's primary collection
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// A modal form. `submitting` is set while the request is in flight; a
/// failure keeps the form open with its error.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog<F> {
    Closed,
    Open {
        form: F,
        submitting: bool,
        error: Option<String>,
    },
}

impl<F> Default for Dialog<F> {
    fn default() -> Self {
        Dialog::Closed
    }
}

impl<F> Dialog<F> {
    pub fn open(&mut self, form: F) {
        *self = Dialog::Open {
            form,
            submitting: false,
            error: None,
        };
    }

    pub fn close(&mut self) {
        *self = Dialog::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Dialog::Open { .. })
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Dialog::Open { submitting: true, .. })
    }

    pub fn form(&self) -> Option<&F> {
        match self {
            Dialog::Open { form, .. } => Some(form),
            Dialog::Closed => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut F> {
        match self {
            Dialog::Open { form, .. } => Some(form),
            Dialog::Closed => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Dialog::Open { error, .. } => error.as_deref(),
            Dialog::Closed => None,
        }
    }

    /// Mark the form as submitting. `None` when closed or already in flight.
    pub fn begin_submit(&mut self) -> Option<&F> {
        match self {
            Dialog::Open {
                form,
                submitting,
                error,
            } if !*submitting => {
                *submitting = true;
                *error = None;
                Some(form)
            }
            _ => None,
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        if let Dialog::Open {
            submitting, error, ..
        } = self
        {
            *submitting = false;
            *error = Some(message.into());
        }
    }
}

pub fn validate_agent_form(form: &AgentForm) -> Result<()> {
    if form.name.trim().is_empty() || form.description.trim().is_empty() {
        return Err(Error::Validation(REQUIRED_FIELDS.to_string()));
    }
    Ok(())
}

pub fn validate_assignment(request: &AssignTeamRequest) -> Result<()> {
    if request.team_id.trim().is_empty() {
        return Err(Error::Validation(SELECT_TEAM.to_string()));
    }
    Ok(())
}

pub fn validate_team_form(form: &TeamForm) -> Result<()> {
    if form.name.trim().is_empty() {
        return Err(Error::Validation(TEAM_NAME_REQUIRED.to_string()));
    }
    Ok(())
}

/// Invite dialog contents
#[derive(Debug, Clone, PartialEq)]
pub struct InviteForm {
    pub email: String,
    pub role: Role,
    pub team_id: Option<String>,
}

impl Default for InviteForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            role: Role::Developer,
            team_id: None,
        }
    }
}

impl InviteForm {
    pub fn to_invite(&self) -> MemberInvite {
        MemberInvite {
            email: self.email.trim().to_string(),
            role: self.role.as_str().to_string(),
        }
    }
}

pub fn validate_invite(form: &InviteForm) -> Result<()> {
    if form.email.trim().is_empty() {
        return Err(Error::Validation(EMAIL_REQUIRED.to_string()));
    }
    if form.team_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
        return Err(Error::Validation(SELECT_TEAM.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailTab {
    #[default]
    Overview,
    Configuration,
    History,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [
        DetailTab::Overview,
        DetailTab::Configuration,
        DetailTab::History,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DetailTab::Overview => "Overview",
            DetailTab::Configuration => "Configuration",
            DetailTab::History => "History",
        }
    }
}

/// Edit dialog target: which agent, and the prefilled form
#[derive(Debug, Clone, PartialEq)]
pub struct AgentEdit {
    pub agent_id: String,
    pub form: AgentForm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamAssignment {
    pub agent_id: String,
    pub request: AssignTeamRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AgentsAction {
    LoadStarted,
    Loaded(Vec<Agent>),
    LoadFailed(String),
    SetSearch(String),
    SetFacet(Facet, Option<String>),
    ToggleSort(SortField),
    Select(Option<String>),
    SetDetailTab(DetailTab),
    Created(Agent),
    /// Whole-record replacement by id (edit, activate, deactivate, assign)
    Updated(Agent),
    /// Local removal; there is no delete endpoint
    Removed(String),
    MutationFailed(String),
}

/// Dashboard and agents list state
#[derive(Debug, Clone, Default)]
pub struct AgentsPage {
    pub agents: LoadState<AgentStore>,
    pub search: String,
    pub filter: AgentFilter,
    pub sort: SortState,
    pub create: Dialog<AgentForm>,
    pub edit: Dialog<AgentEdit>,
    pub assign: Dialog<TeamAssignment>,
    pub selected: Option<String>,
    pub detail_tab: DetailTab,
    /// Last failed mutation outside any dialog
    pub notice: Option<String>,
}

impl AgentsPage {
    pub fn apply(&mut self, action: AgentsAction) {
        match action {
            AgentsAction::LoadStarted => self.agents = LoadState::Loading,
            AgentsAction::Loaded(agents) => {
                self.agents = LoadState::Loaded(AgentStore::new(agents));
            }
            AgentsAction::LoadFailed(message) => self.agents = LoadState::Failed(message),
            AgentsAction::SetSearch(search) => self.search = search,
            AgentsAction::SetFacet(facet, value) => self.filter.set(facet, value),
            AgentsAction::ToggleSort(field) => self.sort.toggle(field),
            AgentsAction::Select(id) => {
                self.selected = id;
                self.detail_tab = DetailTab::Overview;
            }
            AgentsAction::SetDetailTab(tab) => self.detail_tab = tab,
            AgentsAction::Created(agent) => {
                if let Some(store) = self.agents.value_mut() {
                    store.insert(agent);
                }
                self.create.close();
            }
            AgentsAction::Updated(agent) => {
                if self.edit.form().is_some_and(|e| e.agent_id == agent.id) {
                    self.edit.close();
                }
                if self.assign.form().is_some_and(|a| a.agent_id == agent.id) {
                    self.assign.close();
                }
                if let Some(store) = self.agents.value_mut() {
                    if !store.replace_by_id(agent) {
                        debug!("Updated agent is not in the loaded list");
                    }
                }
            }
            AgentsAction::Removed(id) => {
                if let Some(store) = self.agents.value_mut() {
                    store.remove(&id);
                }
                if self.selected.as_deref() == Some(id.as_str()) {
                    self.selected = None;
                }
            }
            AgentsAction::MutationFailed(message) => {
                if self.create.is_submitting() {
                    self.create.fail(message);
                } else if self.edit.is_submitting() {
                    self.edit.fail(message);
                } else if self.assign.is_submitting() {
                    self.assign.fail(message);
                } else {
                    self.notice = Some(message);
                }
            }
        }
    }

    /// Filtered, searched and sorted rows.
    pub fn visible(&self) -> Vec<&Agent> {
        match self.agents.value() {
            Some(store) => {
                query_agents(store.agents(), &self.filter, &self.search, Some(&self.sort))
            }
            None => Vec::new(),
        }
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary::from_agents(self.agents.value().map_or(&[][..], |s| s.agents()))
    }

    /// Choices offered by a facet selector.
    pub fn facet_options(&self, facet: Facet) -> Vec<String> {
        self.agents
            .value()
            .map(|s| unique_values(s.agents(), facet))
            .unwrap_or_default()
    }

    pub fn selected_agent(&self) -> Option<&Agent> {
        let id = self.selected.as_deref()?;
        self.agents.value()?.get(id)
    }

    pub fn open_create(&mut self) {
        self.create.open(AgentForm::default());
    }

    /// Open the edit dialog prefilled from the agent. False if it is unknown.
    pub fn open_edit(&mut self, agent_id: &str) -> bool {
        let Some(agent) = self.agents.value().and_then(|s| s.get(agent_id)) else {
            return false;
        };
        let form = agent_to_form(agent);
        self.edit.open(AgentEdit {
            agent_id: agent_id.to_string(),
            form,
        });
        true
    }

    pub fn open_assign(&mut self, agent_id: &str) {
        self.assign.open(TeamAssignment {
            agent_id: agent_id.to_string(),
            request: AssignTeamRequest::default(),
        });
    }

    pub async fn load(&mut self, source: &dyn DataSource, query: &AgentQuery) {
        self.apply(AgentsAction::LoadStarted);
        match source.fetch_agents(query).await {
            Ok(agents) => self.apply(AgentsAction::Loaded(agents)),
            Err(e) => {
                warn!("Loading agents failed: {}", e);
                self.apply(AgentsAction::LoadFailed(e.to_string()));
            }
        }
    }

    fn finish(&mut self, outcome: Result<Agent>, created: bool) -> Result<()> {
        match outcome {
            Ok(agent) if created => self.apply(AgentsAction::Created(agent)),
            Ok(agent) => self.apply(AgentsAction::Updated(agent)),
            Err(e) => {
                self.apply(AgentsAction::MutationFailed(e.to_string()));
                return Err(e);
            }
        }
        Ok(())
    }

    pub async fn submit_create(&mut self, source: &dyn DataSource) -> Result<()> {
        let form = match self.create.form() {
            Some(form) => form.clone(),
            None => return Ok(()),
        };
        if let Err(e) = validate_agent_form(&form) {
            self.create.fail(e.to_string());
            return Err(e);
        }
        if self.create.begin_submit().is_none() {
            return Ok(());
        }
        let outcome = source.create_agent(&form).await;
        self.finish(outcome, true)
    }

    pub async fn submit_edit(&mut self, source: &dyn DataSource) -> Result<()> {
        let edit = match self.edit.form() {
            Some(edit) => edit.clone(),
            None => return Ok(()),
        };
        if let Err(e) = validate_agent_form(&edit.form) {
            self.edit.fail(e.to_string());
            return Err(e);
        }
        if self.edit.begin_submit().is_none() {
            return Ok(());
        }
        let outcome = source.update_agent(&edit.agent_id, &edit.form).await;
        self.finish(outcome, false)
    }

    pub async fn submit_assign(&mut self, source: &dyn DataSource) -> Result<()> {
        let assignment = match self.assign.form() {
            Some(a) => a.clone(),
            None => return Ok(()),
        };
        if let Err(e) = validate_assignment(&assignment.request) {
            self.assign.fail(e.to_string());
            return Err(e);
        }
        if self.assign.begin_submit().is_none() {
            return Ok(());
        }
        let outcome = source
            .assign_team(&assignment.agent_id, &assignment.request)
            .await;
        self.finish(outcome, false)
    }

    pub async fn set_active(
        &mut self,
        source: &dyn DataSource,
        agent_id: &str,
        active: bool,
    ) -> Result<()> {
        let outcome = if active {
            source.activate_agent(agent_id).await
        } else {
            source.deactivate_agent(agent_id).await
        };
        self.finish(outcome, false)
    }
}

/// Edit dialog target for a team
#[derive(Debug, Clone, PartialEq)]
pub struct TeamEdit {
    pub team_id: String,
    pub form: TeamForm,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TeamAction {
    LoadStarted,
    Loaded(Vec<Team>),
    LoadFailed(String),
    SetSearch(String),
    TeamCreated(Team),
    TeamUpdated {
        team_id: String,
        name: String,
        description: String,
    },
    /// Removes the team and every membership it held
    TeamDeleted(String),
    MemberAdded(TeamMember),
    MemberRemoved(MemberKey),
    MutationFailed(String),
}

/// Team management state
#[derive(Debug, Clone, Default)]
pub struct TeamPage {
    pub teams: LoadState<TeamStore>,
    pub search: String,
    pub invite: Dialog<InviteForm>,
    pub create: Dialog<TeamForm>,
    pub edit: Dialog<TeamEdit>,
    pub pending_delete: Option<String>,
    pub pending_remove: Option<MemberKey>,
    pub error: Option<String>,
}

impl TeamPage {
    pub fn apply(&mut self, action: TeamAction) {
        match action {
            TeamAction::LoadStarted => self.teams = LoadState::Loading,
            TeamAction::Loaded(teams) => self.teams = LoadState::Loaded(TeamStore::new(teams)),
            TeamAction::LoadFailed(message) => self.teams = LoadState::Failed(message),
            TeamAction::SetSearch(search) => self.search = search,
            TeamAction::TeamCreated(team) => {
                if let Some(store) = self.teams.value_mut() {
                    store.add_team(team);
                }
                self.create.close();
            }
            TeamAction::TeamUpdated {
                team_id,
                name,
                description,
            } => {
                if let Some(store) = self.teams.value_mut() {
                    store.rename_team(&team_id, &name, &description);
                }
                self.edit.close();
            }
            TeamAction::TeamDeleted(team_id) => {
                if let Some(store) = self.teams.value_mut() {
                    store.remove_team(&team_id);
                }
                self.pending_delete = None;
                self.error = None;
            }
            TeamAction::MemberAdded(member) => {
                if let Some(store) = self.teams.value_mut() {
                    store.add_member(member);
                }
                self.invite.close();
            }
            TeamAction::MemberRemoved(key) => {
                if let Some(store) = self.teams.value_mut() {
                    store.remove_member(&key);
                }
                self.pending_remove = None;
                self.error = None;
            }
            TeamAction::MutationFailed(message) => {
                self.pending_delete = None;
                self.pending_remove = None;
                if self.invite.is_submitting() {
                    self.invite.fail(message);
                } else if self.create.is_submitting() {
                    self.create.fail(message);
                } else if self.edit.is_submitting() {
                    self.edit.fail(message);
                } else {
                    self.error = Some(message);
                }
            }
        }
    }

    /// Flattened memberships matching the search text.
    pub fn visible_members(&self) -> Vec<&TeamMember> {
        match self.teams.value() {
            Some(store) => search_members(&store.members(), &self.search),
            None => Vec::new(),
        }
    }

    pub fn team_count(&self) -> usize {
        self.teams.value().map_or(0, TeamStore::len)
    }

    pub fn member_count(&self) -> usize {
        self.teams.value().map_or(0, TeamStore::total_members)
    }

    pub fn open_edit(&mut self, team_id: &str) -> bool {
        let Some(team) = self.teams.value().and_then(|s| s.get(team_id)) else {
            return false;
        };
        let form = TeamForm {
            name: team.name.clone(),
            description: team.description.clone(),
        };
        self.edit.open(TeamEdit {
            team_id: team_id.to_string(),
            form,
        });
        true
    }

    pub async fn load(&mut self, source: &dyn DataSource) {
        self.apply(TeamAction::LoadStarted);
        match source.fetch_teams().await {
            Ok(teams) => self.apply(TeamAction::Loaded(teams)),
            Err(e) => {
                warn!("Loading teams failed: {}", e);
                self.apply(TeamAction::LoadFailed(e.to_string()));
            }
        }
    }

    fn fail(&mut self, e: Error) -> Result<()> {
        self.apply(TeamAction::MutationFailed(e.to_string()));
        Err(e)
    }

    pub async fn submit_invite(&mut self, source: &dyn DataSource) -> Result<()> {
        let form = match self.invite.form() {
            Some(form) => form.clone(),
            None => return Ok(()),
        };
        if let Err(e) = validate_invite(&form) {
            self.invite.fail(e.to_string());
            return Err(e);
        }
        let team_id = form.team_id.clone().unwrap_or_default();
        let Some(team) = self.teams.value().and_then(|s| s.get(&team_id)).cloned() else {
            let e = Error::not_found("Team", team_id);
            self.invite.fail(e.to_string());
            return Err(e);
        };
        if self.invite.begin_submit().is_none() {
            return Ok(());
        }
        let invite = form.to_invite();
        match source.add_team_member(&team.id, &invite).await {
            Ok(_) => {
                let member = member_from_invite(&team, &invite, Utc::now());
                self.apply(TeamAction::MemberAdded(member));
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub async fn submit_create(&mut self, source: &dyn DataSource) -> Result<()> {
        let form = match self.create.form() {
            Some(form) => form.clone(),
            None => return Ok(()),
        };
        if let Err(e) = validate_team_form(&form) {
            self.create.fail(e.to_string());
            return Err(e);
        }
        if self.create.begin_submit().is_none() {
            return Ok(());
        }
        match source.create_team(&form).await {
            Ok(ack) => {
                let team = match ack.team {
                    Some(api) => map_team(&api, Utc::now()),
                    None => placeholder_team(&form),
                };
                self.apply(TeamAction::TeamCreated(team));
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub async fn submit_edit(&mut self, source: &dyn DataSource) -> Result<()> {
        let edit = match self.edit.form() {
            Some(edit) => edit.clone(),
            None => return Ok(()),
        };
        if let Err(e) = validate_team_form(&edit.form) {
            self.edit.fail(e.to_string());
            return Err(e);
        }
        if self.edit.begin_submit().is_none() {
            return Ok(());
        }
        match source.update_team(&edit.team_id, &edit.form).await {
            Ok(_) => {
                self.apply(TeamAction::TeamUpdated {
                    team_id: edit.team_id,
                    name: edit.form.name.trim().to_string(),
                    description: edit.form.description.trim().to_string(),
                });
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub async fn delete_team(&mut self, source: &dyn DataSource, team_id: &str) -> Result<()> {
        self.pending_delete = Some(team_id.to_string());
        match source.delete_team(team_id).await {
            Ok(_) => {
                self.apply(TeamAction::TeamDeleted(team_id.to_string()));
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub async fn remove_member(&mut self, source: &dyn DataSource, key: &MemberKey) -> Result<()> {
        self.pending_remove = Some(key.clone());
        match source.remove_team_member(key).await {
            Ok(_) => {
                self.apply(TeamAction::MemberRemoved(key.clone()));
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetricsTab {
    #[default]
    Performance,
    Accuracy,
    Latency,
    Tokens,
    Productivity,
}

impl MetricsTab {
    pub const ALL: [MetricsTab; 5] = [
        MetricsTab::Performance,
        MetricsTab::Accuracy,
        MetricsTab::Latency,
        MetricsTab::Tokens,
        MetricsTab::Productivity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MetricsTab::Performance => "Performance",
            MetricsTab::Accuracy => "Accuracy",
            MetricsTab::Latency => "Latency",
            MetricsTab::Tokens => "Token Usage",
            MetricsTab::Productivity => "Productivity",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Metrics page: a generated snapshot viewed through a time range
#[derive(Debug, Clone)]
pub struct MetricsPage {
    pub snapshot: MetricsSnapshot,
    pub range: TimeRange,
    pub tab: MetricsTab,
}

impl MetricsPage {
    pub fn new(snapshot: MetricsSnapshot) -> Self {
        Self {
            snapshot,
            range: TimeRange::default(),
            tab: MetricsTab::default(),
        }
    }

    /// Charted series of `tab`, cut to the selected range.
    pub fn series(&self, tab: MetricsTab) -> Vec<NamedSeries<'_>> {
        let s = &self.snapshot;
        let charts: Vec<(&'static str, &'static str, &[MetricDataPoint])> = match tab {
            MetricsTab::Performance => vec![
                ("Execution time", "s", s.performance.execution_time.as_slice()),
                ("Throughput", "tasks/h", s.performance.throughput.as_slice()),
                ("Failure rate", "%", s.performance.failure_rate.as_slice()),
            ],
            MetricsTab::Accuracy => vec![
                ("Task success rate", "%", s.accuracy.task_success_rate.as_slice()),
                ("Validation pass rate", "%", s.accuracy.validation_pass_rate.as_slice()),
            ],
            MetricsTab::Latency => vec![
                ("End-to-end", "ms", s.latency.end_to_end.as_slice()),
                ("Model response", "ms", s.latency.model_response.as_slice()),
                ("Tool call", "ms", s.latency.tool_call.as_slice()),
            ],
            MetricsTab::Tokens => {
                vec![("Cost estimation", "$", s.tokens.cost_estimation.as_slice())]
            }
            MetricsTab::Productivity => vec![
                ("Time saved", "h", s.productivity.time_saved.as_slice()),
                ("Tasks automated", "", s.productivity.tasks_automated.as_slice()),
                ("ROI", "x", s.productivity.roi.as_slice()),
            ],
        };
        charts
            .into_iter()
            .map(|(label, unit, points)| NamedSeries {
                label,
                unit,
                points: self.range.window(points),
            })
            .collect()
    }
}

/// One chart of a metrics tab
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedSeries<'a> {
    pub label: &'static str,
    pub unit: &'static str,
    pub points: &'a [MetricDataPoint],
}

/// Settings page: admin access requests
#[derive(Debug, Clone, Default)]
pub struct SettingsPage {
    pub requests: LoadState<Vec<AdminAccessRequest>>,
    pub requesting: bool,
    pub error: Option<String>,
}

impl SettingsPage {
    pub async fn load(&mut self, source: &dyn DataSource) {
        self.requests = LoadState::Loading;
        self.requests = match source.fetch_access_requests().await {
            Ok(requests) => LoadState::Loaded(requests),
            Err(e) => LoadState::Failed(e.to_string()),
        };
    }

    pub async fn request_access(&mut self, source: &dyn DataSource, agent_id: &str) -> Result<()> {
        self.requesting = true;
        let outcome = source.create_access_request(agent_id).await;
        self.requesting = false;
        match outcome {
            Ok(request) => {
                if let Some(requests) = self.requests.value_mut() {
                    requests.push(request);
                }
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, FixtureSource};
    use crate::models::AgentStatus;
    use crate::query::SortDirection;

    fn loaded_agents() -> AgentsPage {
        let mut page = AgentsPage::default();
        page.apply(AgentsAction::Loaded(fixtures::demo_agents(Utc::now())));
        page
    }

    fn loaded_teams() -> TeamPage {
        let mut page = TeamPage::default();
        page.apply(TeamAction::Loaded(fixtures::demo_teams()));
        page
    }

    #[test]
    fn test_dialog_lifecycle() {
        let mut dialog: Dialog<String> = Dialog::default();
        assert!(dialog.begin_submit().is_none());

        dialog.open("form".to_string());
        assert_eq!(dialog.begin_submit().map(String::as_str), Some("form"));
        assert!(dialog.is_submitting());
        assert!(dialog.begin_submit().is_none());

        dialog.fail("nope");
        assert!(!dialog.is_submitting());
        assert_eq!(dialog.error(), Some("nope"));

        assert!(dialog.begin_submit().is_some());
        assert_eq!(dialog.error(), None);
        dialog.close();
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_load_state_accessors() {
        let failed: LoadState<u8> = LoadState::Failed("boom".into());
        assert_eq!(failed.error(), Some("boom"));
        assert!(failed.value().is_none());
        assert!(LoadState::<u8>::Loading.is_loading());
        assert_eq!(LoadState::Loaded(3).value(), Some(&3));
    }

    #[test]
    fn test_visible_applies_filter_search_and_sort() {
        let mut page = loaded_agents();
        page.apply(AgentsAction::SetFacet(Facet::Team, Some("Engineering".into())));
        page.apply(AgentsAction::ToggleSort(SortField::SuccessRate));
        page.apply(AgentsAction::ToggleSort(SortField::SuccessRate));
        assert_eq!(page.sort.direction, SortDirection::Descending);

        let names: Vec<&str> = page.visible().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Code Review Assistant", "Incident Responder"]);

        page.apply(AgentsAction::SetSearch("incident".into()));
        assert_eq!(page.visible().len(), 1);
    }

    #[test]
    fn test_visible_is_empty_before_load() {
        let page = AgentsPage::default();
        assert!(page.visible().is_empty());
        assert_eq!(page.summary().total, 0);
    }

    #[test]
    fn test_updated_replaces_by_id_and_closes_dialog() {
        let mut page = loaded_agents();
        assert!(page.open_edit("6"));
        let mut agent = page.agents.value().unwrap().get("6").cloned().unwrap();
        agent.status = AgentStatus::Healthy;
        page.apply(AgentsAction::Updated(agent));
        assert!(!page.edit.is_open());
        assert_eq!(page.summary().counts.failed, 0);
        assert_eq!(page.agents.value().unwrap().agents()[5].id, "6");
    }

    #[test]
    fn test_removed_clears_selection() {
        let mut page = loaded_agents();
        page.apply(AgentsAction::Select(Some("3".into())));
        assert_eq!(page.selected_agent().map(|a| a.id.as_str()), Some("3"));
        page.apply(AgentsAction::Removed("3".into()));
        assert!(page.selected.is_none());
        assert_eq!(page.summary().total, 7);
    }

    #[test]
    fn test_facet_options() {
        let page = loaded_agents();
        assert_eq!(page.facet_options(Facet::Environment), vec!["production", "staging"]);
        assert_eq!(
            page.facet_options(Facet::Status),
            vec!["degraded", "failed", "healthy"]
        );
    }

    #[test]
    fn test_create_validation_keeps_dialog_open() {
        let source = FixtureSource::default();
        let mut page = loaded_agents();
        page.open_create();
        let err = tokio_test::block_on(page.submit_create(&source)).unwrap_err();
        assert_eq!(err.to_string(), REQUIRED_FIELDS);
        assert_eq!(page.create.error(), Some(REQUIRED_FIELDS));
        assert!(!page.create.is_submitting());
    }

    #[test]
    fn test_create_appends_and_closes() {
        let source = FixtureSource::default();
        let mut page = loaded_agents();
        page.open_create();
        if let Some(form) = page.create.form_mut() {
            form.name = "Churn Predictor".into();
            form.description = "Flags at-risk accounts".into();
            form.model = "GPT_4".into();
        }
        tokio_test::block_on(page.submit_create(&source)).unwrap();
        assert!(!page.create.is_open());
        assert_eq!(page.summary().total, 9);
    }

    #[test]
    fn test_failed_mutation_outside_dialog_sets_notice() {
        let source = FixtureSource::default();
        let mut page = loaded_agents();
        assert!(tokio_test::block_on(page.set_active(&source, "404", true)).is_err());
        assert!(page.notice.as_deref().unwrap_or_default().contains("404"));
    }

    #[test]
    fn test_assign_requires_team() {
        let source = FixtureSource::default();
        let mut page = loaded_agents();
        page.open_assign("1");
        let err = tokio_test::block_on(page.submit_assign(&source)).unwrap_err();
        assert_eq!(err.to_string(), SELECT_TEAM);
    }

    #[test]
    fn test_delete_team_removes_its_members_in_one_step() {
        let source = FixtureSource::default();
        let mut page = loaded_teams();
        let before = page.member_count();
        let engineering = page.teams.value().unwrap().get("1").unwrap().member_count();

        tokio_test::block_on(page.delete_team(&source, "1")).unwrap();

        assert_eq!(page.team_count(), 6);
        assert_eq!(page.member_count(), before - engineering);
        assert!(page.pending_delete.is_none());
        assert!(page
            .visible_members()
            .iter()
            .all(|m| m.key.team_id != "1"));
    }

    #[test]
    fn test_invite_validation_and_success() {
        let source = FixtureSource::default();
        let mut page = loaded_teams();
        page.invite.open(InviteForm::default());
        let err = tokio_test::block_on(page.submit_invite(&source)).unwrap_err();
        assert_eq!(err.to_string(), EMAIL_REQUIRED);

        if let Some(form) = page.invite.form_mut() {
            form.email = "lee@99xagent.com".into();
        }
        let err = tokio_test::block_on(page.submit_invite(&source)).unwrap_err();
        assert_eq!(err.to_string(), SELECT_TEAM);

        if let Some(form) = page.invite.form_mut() {
            form.team_id = Some("6".into());
        }
        tokio_test::block_on(page.submit_invite(&source)).unwrap();
        assert!(!page.invite.is_open());
        let marketing = page.teams.value().unwrap().get("6").unwrap();
        assert_eq!(marketing.member_count(), 2);
        assert_eq!(marketing.members[1].name, "lee");
        assert_eq!(marketing.members[1].role, Role::Developer);
    }

    #[test]
    fn test_edit_team_relabels_members() {
        let source = FixtureSource::default();
        let mut page = loaded_teams();
        assert!(page.open_edit("2"));
        if let Some(edit) = page.edit.form_mut() {
            edit.form.name = "Analytics".into();
        }
        tokio_test::block_on(page.submit_edit(&source)).unwrap();
        let labels: Vec<&String> = page
            .visible_members()
            .iter()
            .flat_map(|m| m.teams.iter())
            .collect();
        assert!(labels.iter().all(|l| l.as_str() != "Data"));
        assert!(labels.iter().any(|l| l.as_str() == "Analytics"));
    }

    #[test]
    fn test_create_team_uses_echoed_team() {
        let source = FixtureSource::default();
        let mut page = loaded_teams();
        page.create.open(TeamForm {
            name: "Platform".into(),
            description: String::new(),
        });
        tokio_test::block_on(page.submit_create(&source)).unwrap();
        let store = page.teams.value().unwrap();
        assert_eq!(store.find_by_name("Platform").map(|t| t.id.as_str()), Some("8"));
    }

    #[test]
    fn test_remove_member() {
        let source = FixtureSource::default();
        let mut page = loaded_teams();
        let key = MemberKey::new("1", "2");
        tokio_test::block_on(page.remove_member(&source, &key)).unwrap();
        assert!(page.visible_members().iter().all(|m| m.key != key));
        assert!(page.pending_remove.is_none());
    }

    #[test]
    fn test_member_search() {
        let mut page = loaded_teams();
        page.apply(TeamAction::SetSearch("trust".into()));
        let names: Vec<&str> = page.visible_members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Alex Rivera"; 3]);
    }

    #[test]
    fn test_settings_request_access() {
        let source = FixtureSource::default();
        let mut page = SettingsPage::default();
        tokio_test::block_on(page.load(&source));
        assert_eq!(page.requests.value().map(Vec::len), Some(2));
        tokio_test::block_on(page.request_access(&source, "1")).unwrap();
        assert_eq!(page.requests.value().map(Vec::len), Some(3));
        assert!(tokio_test::block_on(page.request_access(&source, "77")).is_err());
        assert!(page.error.is_some());
    }

    #[test]
    fn test_metrics_tab_cycles() {
        assert_eq!(MetricsTab::Productivity.next(), MetricsTab::Performance);
        assert_eq!(MetricsTab::default().label(), "Performance");
    }

    #[test]
    fn test_metrics_series_follow_range() {
        use rand::{rngs::StdRng, SeedableRng};
        let snapshot = MetricsSnapshot::generate(Utc::now(), &mut StdRng::seed_from_u64(7));
        let mut page = MetricsPage::new(snapshot);

        let latency = page.series(MetricsTab::Latency);
        assert_eq!(latency.len(), 3);
        assert!(latency.iter().all(|s| s.points.len() == 31));

        page.range = TimeRange::Days7;
        let tokens = page.series(MetricsTab::Tokens);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].points.len(), 8);
        assert_eq!(
            tokens[0].points.last(),
            page.snapshot.tokens.cost_estimation.last()
        );
    }
}
