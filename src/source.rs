//! Data source abstraction
//!
//! Everything a surface needs from the outside world. [`crate::client::DashboardClient`]
//! talks to the HTTP backend; [`crate::fixtures::FixtureSource`] serves the demo
//! data set from memory.

use crate::error::Result;
use crate::models::{AdminAccessRequest, Agent, MemberKey, Team};
use crate::wire::{AgentForm, AssignTeamRequest, MemberInvite, MutationResponse, TeamForm};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Page size used by the dashboard overview
pub const DASHBOARD_PAGE_SIZE: u32 = 100;
/// Page size used by the agents list
pub const LIST_PAGE_SIZE: u32 = 10;

/// Acknowledgements reported when a delete has nothing to say
pub const TEAM_DELETED: &str = "Team deleted successfully";
pub const MEMBER_REMOVED: &str = "Team member removed successfully";

/// Paging and team scope of an agents fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQuery {
    pub page: u32,
    pub page_size: u32,
    pub team_id: Option<String>,
}

impl Default for AgentQuery {
    fn default() -> Self {
        Self::dashboard()
    }
}

impl AgentQuery {
    pub fn dashboard() -> Self {
        Self::page(1, DASHBOARD_PAGE_SIZE)
    }

    pub fn list() -> Self {
        Self::page(1, LIST_PAGE_SIZE)
    }

    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            team_id: None,
        }
    }

    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }
}

/// Agent, team and access-request operations consumed by the surfaces.
///
/// Reads return mapped view models. Agent mutations return the mapped
/// record the backend echoes back; team mutations return the backend's
/// acknowledgement.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_agents(&self, query: &AgentQuery) -> Result<Vec<Agent>>;

    async fn fetch_my_agents(&self) -> Result<Vec<Agent>>;

    /// Detail lookup. Resolves to the first record of the response page.
    async fn fetch_agent(&self, id: &str) -> Result<Agent>;

    async fn create_agent(&self, form: &AgentForm) -> Result<Agent>;

    async fn update_agent(&self, id: &str, form: &AgentForm) -> Result<Agent>;

    async fn activate_agent(&self, id: &str) -> Result<Agent>;

    async fn deactivate_agent(&self, id: &str) -> Result<Agent>;

    async fn assign_team(&self, id: &str, request: &AssignTeamRequest) -> Result<Agent>;

    async fn fetch_teams(&self) -> Result<Vec<Team>>;

    async fn fetch_my_teams(&self) -> Result<Vec<Team>>;

    async fn create_team(&self, form: &TeamForm) -> Result<MutationResponse>;

    async fn update_team(&self, team_id: &str, form: &TeamForm) -> Result<MutationResponse>;

    async fn delete_team(&self, team_id: &str) -> Result<MutationResponse>;

    async fn add_team_member(
        &self,
        team_id: &str,
        invite: &MemberInvite,
    ) -> Result<MutationResponse>;

    async fn remove_team_member(&self, key: &MemberKey) -> Result<MutationResponse>;

    /// Organization-level invitation, not bound to a team.
    async fn invite_member(&self, invite: &MemberInvite) -> Result<MutationResponse>;

    async fn fetch_access_requests(&self) -> Result<Vec<AdminAccessRequest>>;

    async fn create_access_request(&self, agent_id: &str) -> Result<AdminAccessRequest>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_presets() {
        assert_eq!(AgentQuery::default().page_size, 100);
        assert_eq!(AgentQuery::list().page_size, 10);
        assert_eq!(AgentQuery::list().page, 1);
        let scoped = AgentQuery::list().with_team("Data Team");
        assert_eq!(scoped.team_id.as_deref(), Some("Data Team"));
    }
}
