//! HTTP client for the agent registry backend

use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::mapper::{map_access_request, map_agent, map_agents, map_teams};
use crate::models::{AdminAccessRequest, Agent, MemberKey, Team};
use crate::source::{AgentQuery, DataSource, LIST_PAGE_SIZE, MEMBER_REMOVED, TEAM_DELETED};
use crate::wire::{
    AgentForm, AgentsResponse, ApiAdminAccessRequest, ApiAgentResponse, ApiTeam,
    AssignTeamRequest, CreateAccessRequest, MemberInvite, MutationResponse, TeamForm,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

/// User id attached to access requests raised from this dashboard
pub const CURRENT_USER_ID: u64 = 1;

pub struct DashboardClient {
    http: Client,
    base_url: Url,
    team_endpoints: Vec<String>,
}

impl DashboardClient {
    /// Client with default timeouts and endpoint list.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_config(&DashboardConfig {
            api_base_url: base_url.to_string(),
            ..Default::default()
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let base = config.api_base_url.trim_end_matches('/');
        let base_url = Url::parse(base)
            .map_err(|e| Error::Config(format!("invalid api_base_url '{}': {}", base, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("api_base_url '{}' cannot be a base", base)));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|source| Error::Transport {
                operation: "build HTTP client",
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            team_endpoints: config.team_endpoints.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Base URL joined with a literal `/`-separated path.
    fn endpoint_path(&self, path: &str) -> Url {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.endpoint(&segments)
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                operation,
                status,
                body,
            });
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| Error::Transport { operation, source })?;
        serde_json::from_slice(&bytes).map_err(|source| Error::Decode { operation, source })
    }

    /// Decode a body that must be a JSON array.
    async fn read_array<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> Result<Vec<T>> {
        let value: serde_json::Value = Self::read_json(operation, response).await?;
        if !value.is_array() {
            return Err(Error::Shape {
                operation,
                expected: "an array",
            });
        }
        serde_json::from_value(value).map_err(|source| Error::Decode { operation, source })
    }

    async fn get_agents_page(
        &self,
        operation: &'static str,
        url: Url,
        page: u32,
        page_size: u32,
        team_id: Option<&str>,
    ) -> Result<Vec<ApiAgentResponse>> {
        let mut params = vec![
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(team_id) = team_id {
            params.push(("teamId", team_id.to_string()));
        }
        debug!("GET {} {:?}", url, params);

        let response = self.send(operation, self.http.get(url).query(&params)).await?;
        let page: AgentsResponse = Self::read_json(operation, response).await?;
        Ok(page.items.unwrap_or_default())
    }

    async fn agent_mutation(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Agent> {
        let response = self.send(operation, request).await?;
        let api: ApiAgentResponse = Self::read_json(operation, response).await?;
        info!("{}: agent {} ({})", operation, api.id, api.status);
        Ok(map_agent(&api, Utc::now()))
    }

    async fn team_mutation(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<MutationResponse> {
        let response = self.send(operation, request).await?;
        let ack: MutationResponse = Self::read_json(operation, response).await?;
        info!("{}: {}", operation, ack.message);
        Ok(ack)
    }

    /// DELETE that also succeeds on 404 or on a 2xx without a JSON body.
    async fn lenient_delete(
        &self,
        operation: &'static str,
        url: Url,
        fallback_message: &'static str,
    ) -> Result<MutationResponse> {
        debug!("DELETE {}", url);
        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!("{} returned 404, treating {} as done", url, operation);
            return Ok(MutationResponse::simulated(fallback_message));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                operation,
                status,
                body,
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            return Ok(MutationResponse::simulated(fallback_message));
        }

        let ack: MutationResponse = Self::read_json(operation, response).await?;
        info!("{}: {}", operation, ack.message);
        Ok(ack)
    }

    /// One candidate of the team-list fallback chain.
    async fn try_team_endpoint(&self, path: &str) -> Result<Vec<ApiTeam>> {
        let url = self.endpoint_path(path);
        debug!("Trying team endpoint {}", url);
        let response = self.send("fetch teams", self.http.get(url)).await?;
        Self::read_array("fetch teams", response).await
    }
}

#[async_trait]
impl DataSource for DashboardClient {
    async fn fetch_agents(&self, query: &AgentQuery) -> Result<Vec<Agent>> {
        let items = self
            .get_agents_page(
                "fetch agents",
                self.endpoint(&["agents"]),
                query.page,
                query.page_size,
                query.team_id.as_deref(),
            )
            .await?;
        debug!("Fetched {} agents", items.len());
        Ok(map_agents(&items, Utc::now()))
    }

    async fn fetch_my_agents(&self) -> Result<Vec<Agent>> {
        let operation = "fetch my agents";
        let url = self.endpoint(&["agents", "my-agents"]);
        debug!("GET {}", url);
        let response = self.send(operation, self.http.get(url)).await?;
        let items: Vec<ApiAgentResponse> = Self::read_array(operation, response).await?;
        Ok(map_agents(&items, Utc::now()))
    }

    async fn fetch_agent(&self, id: &str) -> Result<Agent> {
        let items = self
            .get_agents_page(
                "fetch agent",
                self.endpoint(&["agents", id]),
                1,
                LIST_PAGE_SIZE,
                None,
            )
            .await?;
        items
            .first()
            .map(|api| map_agent(api, Utc::now()))
            .ok_or_else(|| Error::not_found("Agent", id))
    }

    async fn create_agent(&self, form: &AgentForm) -> Result<Agent> {
        let url = self.endpoint(&["agents"]);
        self.agent_mutation("create agent", self.http.post(url).json(form))
            .await
    }

    async fn update_agent(&self, id: &str, form: &AgentForm) -> Result<Agent> {
        let url = self.endpoint(&["agents", id]);
        self.agent_mutation("update agent", self.http.put(url).json(form))
            .await
    }

    async fn activate_agent(&self, id: &str) -> Result<Agent> {
        let url = self.endpoint(&["agents", id, "activate"]);
        self.agent_mutation("activate agent", self.http.patch(url))
            .await
    }

    async fn deactivate_agent(&self, id: &str) -> Result<Agent> {
        let url = self.endpoint(&["agents", id, "inactivate"]);
        self.agent_mutation("deactivate agent", self.http.patch(url))
            .await
    }

    async fn assign_team(&self, id: &str, request: &AssignTeamRequest) -> Result<Agent> {
        let url = self.endpoint(&["agents", id, "team", &request.team_id]);
        debug!("PUT {}", url);
        self.agent_mutation("assign team to agent", self.http.put(url))
            .await
    }

    async fn fetch_teams(&self) -> Result<Vec<Team>> {
        let mut last_error = None;
        for path in &self.team_endpoints {
            match self.try_team_endpoint(path).await {
                Ok(teams) => {
                    debug!("Team endpoint {} answered with {} teams", path, teams.len());
                    return Ok(map_teams(&teams, Utc::now()));
                }
                Err(e) => {
                    debug!("Team endpoint {} skipped: {}", path, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| Error::Config("no team endpoints configured".to_string())))
    }

    async fn fetch_my_teams(&self) -> Result<Vec<Team>> {
        let operation = "fetch my teams";
        let url = self.endpoint(&["teams", "my-teams"]);
        debug!("GET {}", url);
        let response = self.send(operation, self.http.get(url)).await?;
        let teams: Vec<ApiTeam> = Self::read_array(operation, response).await?;
        Ok(map_teams(&teams, Utc::now()))
    }

    async fn create_team(&self, form: &TeamForm) -> Result<MutationResponse> {
        let url = self.endpoint(&["teams"]);
        self.team_mutation("create team", self.http.post(url).json(form))
            .await
    }

    async fn update_team(&self, team_id: &str, form: &TeamForm) -> Result<MutationResponse> {
        let url = self.endpoint(&["teams", team_id]);
        self.team_mutation("update team", self.http.put(url).json(form))
            .await
    }

    async fn delete_team(&self, team_id: &str) -> Result<MutationResponse> {
        let url = self.endpoint(&["teams", team_id, "delete"]);
        self.lenient_delete("delete team", url, TEAM_DELETED).await
    }

    async fn add_team_member(
        &self,
        team_id: &str,
        invite: &MemberInvite,
    ) -> Result<MutationResponse> {
        let url = self.endpoint(&["teams", team_id, "members"]);
        self.team_mutation("add team member", self.http.post(url).json(invite))
            .await
    }

    async fn remove_team_member(&self, key: &MemberKey) -> Result<MutationResponse> {
        let member = key.to_string();
        let url = self.endpoint(&["teams", &key.team_id, "members", &member]);
        self.lenient_delete("remove team member", url, MEMBER_REMOVED)
            .await
    }

    async fn invite_member(&self, invite: &MemberInvite) -> Result<MutationResponse> {
        let url = self.endpoint(&["teams"]);
        self.team_mutation("invite team member", self.http.post(url).json(invite))
            .await
    }

    async fn fetch_access_requests(&self) -> Result<Vec<AdminAccessRequest>> {
        let operation = "fetch admin access requests";
        let url = self.endpoint(&["admin-access-requests"]);
        let response = self.send(operation, self.http.get(url)).await?;
        let items: Vec<ApiAdminAccessRequest> = Self::read_array(operation, response).await?;
        items.iter().map(map_access_request).collect()
    }

    async fn create_access_request(&self, agent_id: &str) -> Result<AdminAccessRequest> {
        let operation = "create admin access request";
        let ai_agent_id: u64 = agent_id
            .trim()
            .parse()
            .map_err(|_| Error::Validation(format!("Agent id '{}' is not numeric", agent_id)))?;
        let body = CreateAccessRequest {
            ai_agent_id,
            requested_by_user_id: CURRENT_USER_ID,
            status: "Pending".to_string(),
        };
        let url = self.endpoint(&["admin-access-requests"]);
        let response = self.send(operation, self.http.post(url).json(&body)).await?;
        let api: ApiAdminAccessRequest = Self::read_json(operation, response).await?;
        info!("Access request {} raised for agent {}", api.id, api.ai_agent_id);
        map_access_request(&api)
    }
}
