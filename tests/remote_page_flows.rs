//! Page reducers driven by the HTTP client against a mock backend
//!
//! Each test stands up an httpmock server, loads a page through
//! `DashboardClient` and checks what the page exposes afterwards.

use agent_dashboard::state::{
    AgentsAction, AgentsPage, InviteForm, LoadState, SettingsPage, TeamPage, SELECT_TEAM,
};
use agent_dashboard::{
    AccessRequestStatus, AgentQuery, AgentStatus, AssignTeamRequest, DashboardClient,
    DataSource, Facet, MemberKey, Role, SortField, TeamForm,
};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

// ============================================================================
// TEST HELPERS
// ============================================================================

fn agent_json(id: u64, name: &str, status: &str, model: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{} for the ops team", name),
        "keyFeatures": "slack; ; jira ",
        "category": "Operations",
        "status": status,
        "model": model,
        "teamMembers": []
    })
}

fn member_json(user_id: u64, first: &str, last: &str, role: &str) -> serde_json::Value {
    json!({
        "userId": user_id,
        "firstName": first,
        "lastName": last,
        "email": format!("{}@example.com", first.to_lowercase()),
        "role": role,
        "isActive": true
    })
}

fn client(server: &MockServer) -> DashboardClient {
    DashboardClient::new(&server.base_url()).unwrap()
}

fn mock_agents(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/agents");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "items": [
                    agent_json(1, "Ticket Router", "Active", "GPT_4"),
                    agent_json(2, "Alert Triage", "Paused", "claude_3_opus"),
                    agent_json(3, "Report Writer", "Archived", ""),
                ],
                "total": 3
            }));
    });
}

fn mock_teams(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/teams/all");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([
                {
                    "id": 10,
                    "name": "Platform",
                    "description": "Core platform",
                    "memberCount": 5,
                    "teamMembers": [
                        member_json(1, "Ada", "Lovelace", "Admin"),
                        member_json(2, "Grace", "Hopper", "Developer")
                    ]
                },
                {
                    "id": 11,
                    "name": "Research",
                    "description": "Model research",
                    "teamMembers": [member_json(1, "Ada", "Lovelace", "Owner")]
                }
            ]));
    });
}

// ============================================================================
// AGENTS
// ============================================================================

#[tokio::test]
async fn test_agents_page_loads_and_queries_remote_records() {
    let server = MockServer::start();
    mock_agents(&server);
    let source = client(&server);

    let mut page = AgentsPage::default();
    page.load(&source, &AgentQuery::dashboard()).await;

    assert!(matches!(page.agents, LoadState::Loaded(_)));
    let summary = page.summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.counts.get(AgentStatus::Healthy), 1);
    assert_eq!(summary.counts.get(AgentStatus::Degraded), 1);
    assert_eq!(summary.counts.get(AgentStatus::Failed), 1);

    let models = page.facet_options(Facet::Model);
    assert_eq!(models, vec!["claude-3-opus", "gpt-4", "gpt-4o"]);

    page.apply(AgentsAction::SetFacet(Facet::Status, Some("degraded".to_string())));
    let visible = page.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Alert Triage");
    assert_eq!(visible[0].tools, vec!["slack", "jira"]);

    page.apply(AgentsAction::SetFacet(Facet::Status, None));
    page.apply(AgentsAction::SetSearch("WRITER".to_string()));
    assert_eq!(page.visible().len(), 1);

    page.apply(AgentsAction::SetSearch(String::new()));
    page.apply(AgentsAction::ToggleSort(SortField::Status));
    let order: Vec<&str> = page.visible().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(order, vec!["2", "3", "1"]);
}

#[tokio::test]
async fn test_agents_page_records_load_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/agents");
        then.status(503).body("maintenance");
    });

    let mut page = AgentsPage::default();
    page.load(&client(&server), &AgentQuery::list()).await;

    let message = page.agents.error().unwrap_or_default();
    assert!(message.starts_with("Failed to fetch agents"));
    assert!(page.visible().is_empty());
    assert_eq!(page.summary().total, 0);
}

#[tokio::test]
async fn test_deactivate_replaces_the_record_in_place() {
    let server = MockServer::start();
    mock_agents(&server);
    let deactivate = server.mock(|when, then| {
        when.method(PATCH).path("/agents/1/inactivate");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(agent_json(1, "Ticket Router", "Inactive", "GPT_4"));
    });
    let source = client(&server);

    let mut page = AgentsPage::default();
    page.load(&source, &AgentQuery::dashboard()).await;
    page.set_active(&source, "1", false).await.unwrap();

    deactivate.assert();
    let store = page.agents.value().unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.agents()[0].id, "1");
    assert_eq!(store.agents()[0].status, AgentStatus::Failed);
    assert!(page.notice.is_none());
}

#[tokio::test]
async fn test_failed_activation_surfaces_as_notice() {
    let server = MockServer::start();
    mock_agents(&server);
    server.mock(|when, then| {
        when.method(PATCH).path("/agents/2/activate");
        then.status(403).body("forbidden");
    });
    let source = client(&server);

    let mut page = AgentsPage::default();
    page.load(&source, &AgentQuery::dashboard()).await;
    let err = page.set_active(&source, "2", true).await.unwrap_err();

    assert_eq!(page.notice.as_deref(), Some(err.to_string().as_str()));
    let agent = page.agents.value().and_then(|s| s.get("2")).unwrap();
    assert_eq!(agent.status, AgentStatus::Degraded);
}

#[tokio::test]
async fn test_assignment_without_team_never_reaches_backend() {
    let server = MockServer::start();
    mock_agents(&server);
    let assign = server.mock(|when, then| {
        when.method(PUT).path_contains("/team/");
        then.status(200);
    });
    let source = client(&server);

    let mut page = AgentsPage::default();
    page.load(&source, &AgentQuery::dashboard()).await;
    page.open_assign("1");
    if let Some(assignment) = page.assign.form_mut() {
        assignment.request = AssignTeamRequest {
            team_id: "  ".to_string(),
            team_name: None,
        };
    }
    let err = page.submit_assign(&source).await.unwrap_err();

    assert_eq!(err.to_string(), SELECT_TEAM);
    assert_eq!(page.assign.error(), Some(SELECT_TEAM));
    assign.assert_hits(0);
}

// ============================================================================
// TEAMS
// ============================================================================

#[tokio::test]
async fn test_team_page_flattens_memberships() {
    let server = MockServer::start();
    mock_teams(&server);

    let mut page = TeamPage::default();
    page.load(&client(&server)).await;

    assert_eq!(page.team_count(), 2);
    assert_eq!(page.member_count(), 3);

    // Ada appears once per team, each row keyed by its own team
    page.search = "ada".to_string();
    let keys: Vec<&MemberKey> = page.visible_members().iter().map(|m| &m.key).collect();
    assert_eq!(
        keys,
        vec![&MemberKey::new("10", "1"), &MemberKey::new("11", "1")]
    );
    let roles: Vec<Role> = page.visible_members().iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::Admin, Role::Viewer]);
}

#[tokio::test]
async fn test_team_page_falls_back_to_next_endpoint() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET).path("/teams/all");
        then.status(404);
    });
    server.mock(|when, then| {
        when.method(GET).path("/all-teams");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([{"id": 3, "name": "Solo", "description": "", "teamMembers": []}]));
    });

    let mut page = TeamPage::default();
    page.load(&client(&server)).await;

    first.assert();
    assert_eq!(page.team_count(), 1);
    assert_eq!(page.member_count(), 0);
}

#[tokio::test]
async fn test_remove_member_on_404_still_updates_page() {
    let server = MockServer::start();
    mock_teams(&server);
    let remove = server.mock(|when, then| {
        when.method(DELETE).path("/teams/10/members/10-2");
        then.status(404);
    });
    let source = client(&server);

    let mut page = TeamPage::default();
    page.load(&source).await;
    page.remove_member(&source, &MemberKey::new("10", "2"))
        .await
        .unwrap();

    remove.assert();
    assert_eq!(page.member_count(), 2);
    assert!(page.pending_remove.is_none());
    assert!(page.error.is_none());
}

#[tokio::test]
async fn test_invite_adds_member_under_selected_team() {
    let server = MockServer::start();
    mock_teams(&server);
    let add = server.mock(|when, then| {
        when.method(POST)
            .path("/teams/11/members")
            .json_body(json!({"email": "lin@example.com", "role": "viewer"}));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"success": true, "message": "Member added"}));
    });
    let source = client(&server);

    let mut page = TeamPage::default();
    page.load(&source).await;
    page.invite.open(InviteForm {
        email: " lin@example.com ".to_string(),
        role: Role::Viewer,
        team_id: Some("11".to_string()),
    });
    page.submit_invite(&source).await.unwrap();

    add.assert();
    assert!(!page.invite.is_open());
    let added = page
        .visible_members()
        .into_iter()
        .find(|m| m.email == "lin@example.com")
        .cloned()
        .unwrap();
    assert_eq!(added.key.team_id, "11");
    assert_eq!(added.name, "lin");
    assert_eq!(added.teams, vec!["Research"]);
}

#[tokio::test]
async fn test_create_team_without_echo_uses_local_placeholder() {
    let server = MockServer::start();
    mock_teams(&server);
    server.mock(|when, then| {
        when.method(POST).path("/teams");
        then.status(201)
            .header("content-type", "application/json")
            .json_body(json!({"success": true, "message": "Team created"}));
    });
    let source = client(&server);

    let mut page = TeamPage::default();
    page.load(&source).await;
    page.create.open(TeamForm {
        name: " Growth ".to_string(),
        description: "Experiments".to_string(),
    });
    page.submit_create(&source).await.unwrap();

    assert_eq!(page.team_count(), 3);
    let created = page.teams.value().and_then(|s| s.find_by_name("Growth")).unwrap();
    assert!(created.id.starts_with("team-"));
    assert!(created.members.is_empty());
}

// ============================================================================
// SETTINGS
// ============================================================================

#[tokio::test]
async fn test_settings_page_lists_and_files_requests() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/admin-access-requests");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!([{
                "id": 1,
                "aiAgentId": 4,
                "requestedByUserId": 2,
                "status": "Approved",
                "reviewedByUserId": 1,
                "createdAt": "2024-05-01T10:00:00Z"
            }]));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/admin-access-requests")
            .json_body_partial(r#"{"aiAgentId": 7, "status": "Pending"}"#);
        then.status(201)
            .header("content-type", "application/json")
            .json_body(json!({
                "id": 2,
                "aiAgentId": 7,
                "requestedByUserId": 1,
                "status": "Pending",
                "createdAt": "2024-05-02T08:30:00"
            }));
    });
    let source = client(&server);

    let mut page = SettingsPage::default();
    page.load(&source).await;
    page.request_access(&source, "7").await.unwrap();

    create.assert();
    let requests = page.requests.value().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].status, AccessRequestStatus::Approved);
    assert_eq!(requests[1].status, AccessRequestStatus::Pending);
    assert_eq!(requests[1].ai_agent_id, "7");
    assert!(!page.requesting);
}

#[tokio::test]
async fn test_non_numeric_agent_id_is_rejected_before_request() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST).path("/admin-access-requests");
        then.status(201);
    });

    let mut page = SettingsPage::default();
    let source = client(&server);
    assert!(source.create_access_request("abc").await.is_err());
    assert!(page.request_access(&source, "abc").await.is_err());

    create.assert_hits(0);
    assert!(page.error.is_some());
}
