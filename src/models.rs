//! View-model types
//!
//! The normalized shapes the rest of the dashboard works with. These are
//! distinct from the wire shapes in [`crate::wire`]; the mapper is the only
//! place that translates between the two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational health of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Healthy,
    Degraded,
    Failed,
}

impl AgentStatus {
    pub const ALL: [AgentStatus; 3] = [
        AgentStatus::Healthy,
        AgentStatus::Degraded,
        AgentStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Healthy => "healthy",
            AgentStatus::Degraded => "degraded",
            AgentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "healthy" => Some(AgentStatus::Healthy),
            "degraded" => Some(AgentStatus::Degraded),
            "failed" => Some(AgentStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Staging,
    Development,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Production,
        Environment::Staging,
        Environment::Development,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Development => "development",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "production" => Some(Environment::Production),
            "staging" => Some(Environment::Staging),
            "development" => Some(Environment::Development),
            _ => None,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// LLM model identifier
///
/// Known identifiers get their own variant; anything else the backend
/// reports is kept verbatim (already normalized) in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Model {
    Gpt4,
    Gpt4o,
    Gpt35Turbo,
    Claude3Opus,
    Claude3Sonnet,
    GeminiPro,
    Other(String),
}

impl Model {
    pub const KNOWN: [Model; 6] = [
        Model::Gpt4,
        Model::Gpt4o,
        Model::Gpt35Turbo,
        Model::Claude3Opus,
        Model::Claude3Sonnet,
        Model::GeminiPro,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt4 => "gpt-4",
            Model::Gpt4o => "gpt-4o",
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::Claude3Opus => "claude-3-opus",
            Model::Claude3Sonnet => "claude-3-sonnet",
            Model::GeminiPro => "gemini-pro",
            Model::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Model::Other(_))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s {
            "gpt-4" => Model::Gpt4,
            "gpt-4o" => Model::Gpt4o,
            "gpt-3.5-turbo" => Model::Gpt35Turbo,
            "claude-3-opus" => Model::Claude3Opus,
            "claude-3-sonnet" => Model::Claude3Sonnet,
            "gemini-pro" => Model::GeminiPro,
            other => Model::Other(other.to_string()),
        }
    }
}

impl From<String> for Model {
    fn from(s: String) -> Self {
        Model::from(s.as_str())
    }
}

impl From<Model> for String {
    fn from(m: Model) -> Self {
        match m {
            Model::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One monitored AI agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub status: AgentStatus,
    /// Team label (free text, not a team id)
    pub team: String,
    pub environment: Environment,
    pub model: Model,
    pub last_run: DateTime<Utc>,
    /// Average execution time in seconds
    pub execution_time: f64,
    /// Percentage in [0, 100]
    pub success_rate: f64,
    pub tools: Vec<String>,
    pub description: String,
}

impl Agent {
    /// Clamp derived numeric fields into their valid ranges.
    pub fn normalized(mut self) -> Self {
        self.success_rate = clamp_rate(self.success_rate);
        if !self.execution_time.is_finite() || self.execution_time < 0.0 {
            self.execution_time = 0.0;
        }
        self
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 100.0)
    }
}

/// Team member role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Developer,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Developer, Role::Viewer];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Developer => "developer",
            Role::Viewer => "viewer",
        }
    }

    /// Case-insensitive parse
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "developer" => Some(Role::Developer),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite identity of a membership: which team, which person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberKey {
    pub team_id: String,
    pub person_id: String,
}

impl MemberKey {
    pub fn new(team_id: impl Into<String>, person_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            person_id: person_id.into(),
        }
    }
}

/// Path form used by the backend (`{teamId}-{personId}`). Never parsed back.
impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.team_id, self.person_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub key: MemberKey,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Team names the person belongs to
    pub teams: Vec<String>,
    /// Short initials
    pub avatar: String,
    pub joined_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members: Vec<TeamMember>,
}

impl Team {
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// A single chart sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccessRequestStatus {
    Pending,
    Approved,
    Rejected,
    Other(String),
}

impl AccessRequestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AccessRequestStatus::Pending => "pending",
            AccessRequestStatus::Approved => "approved",
            AccessRequestStatus::Rejected => "rejected",
            AccessRequestStatus::Other(s) => s,
        }
    }
}

impl From<String> for AccessRequestStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => AccessRequestStatus::Pending,
            "approved" => AccessRequestStatus::Approved,
            "rejected" => AccessRequestStatus::Rejected,
            other => AccessRequestStatus::Other(other.to_string()),
        }
    }
}

impl From<AccessRequestStatus> for String {
    fn from(s: AccessRequestStatus) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for AccessRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request for elevated access to an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAccessRequest {
    pub id: String,
    pub ai_agent_id: String,
    pub requested_by_user_id: String,
    pub status: AccessRequestStatus,
    pub reviewed_by_user_id: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}
