//! Wire shapes of the external agent registry API
//!
//! These mirror the JSON the backend sends and accepts. Optional or
//! loosely-typed fields are tolerated with `#[serde(default)]` so that a
//! sparse record still maps; the mapper decides the defaults.

use serde::{Deserialize, Serialize};

/// Agent record as returned by `/agents` endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAgentResponse {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `;`-separated feature list
    #[serde(default)]
    pub key_features: Option<String>,
    #[serde(default)]
    pub category: String,
    /// Lifecycle code (`Active`, `Paused`, ...)
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub team_members: Vec<serde_json::Value>,
}

/// Paged list envelope of `GET /agents`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentsResponse {
    #[serde(default)]
    pub items: Option<Vec<ApiAgentResponse>>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Body of `POST /agents` and `PUT /agents/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub model: String,
    pub key_features: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTeamRequest {
    pub team_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTeamMember {
    pub user_id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTeam {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Tracked separately by the backend and may disagree with `team_members`
    #[serde(default)]
    pub member_count: Option<u64>,
    #[serde(default)]
    pub team_members: Vec<ApiTeamMember>,
}

/// Body of `POST /teams` and `PUT /teams/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamForm {
    pub name: String,
    pub description: String,
}

/// Body of `POST /teams/{id}/members` (and the invite variant)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInvite {
    pub email: String,
    pub role: String,
}

/// Generic `{success, message}` acknowledgement used by team mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<ApiTeam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_id: Option<String>,
}

impl MutationResponse {
    pub fn simulated(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            team: None,
            member: None,
            invitation_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAdminAccessRequest {
    pub id: u64,
    pub ai_agent_id: u64,
    pub requested_by_user_id: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reviewed_by_user_id: Option<u64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessRequest {
    pub ai_agent_id: u64,
    pub requested_by_user_id: u64,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_record_tolerates_missing_fields() {
        let api: ApiAgentResponse = serde_json::from_str(r#"{"id": 3, "name": "Bot"}"#).unwrap();
        assert_eq!(api.id, 3);
        assert!(api.key_features.is_none());
        assert!(api.model.is_none());
        assert!(api.status.is_empty());
    }

    #[test]
    fn test_agents_envelope_without_items() {
        let resp: AgentsResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(resp.items.is_none());
        assert_eq!(resp.total, Some(0));
    }

    #[test]
    fn test_agent_form_uses_camel_case() {
        let form = AgentForm {
            name: "n".into(),
            description: "d".into(),
            category: "c".into(),
            model: "GPT_4".into(),
            key_features: "a; b".into(),
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["keyFeatures"], "a; b");
        assert!(value.get("key_features").is_none());
    }

    #[test]
    fn test_mutation_response_defaults() {
        let resp: MutationResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(resp.success);
        assert!(resp.message.is_empty());
        assert!(resp.team.is_none());
    }
}
