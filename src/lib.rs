//! Agent Dashboard
//!
//! Query and view-model layer of an AI-agent observability dashboard.
//! Backend records are normalized into view models, held in in-memory
//! stores and queried (filter, search, sort, aggregate) by the terminal
//! surfaces.
//!
//! ## Module Structure
//!
//! - `wire` / `models`: backend shapes and the normalized view models
//! - `mapper`: the only translation between the two
//! - `store`: in-memory agent and team stores
//! - `query/`: filter, search, sort and summary statistics
//! - `source`: the `DataSource` seam, with `client` (HTTP) and `fixtures`
//!   (demo data) behind it
//! - `state`: page state machines driven by the surfaces
//! - `metrics` / `history`: synthetic chart series and execution history
//! - `badge`: display tones
//! - `config`: file and environment configuration

pub mod badge;
pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod history;
pub mod mapper;
pub mod metrics;
pub mod models;
pub mod query;
pub mod source;
pub mod state;
pub mod store;
pub mod wire;

pub use client::DashboardClient;
pub use config::{DashboardConfig, SourceKind};
pub use error::{Error, Result};
pub use fixtures::FixtureSource;
pub use metrics::{MetricsSnapshot, TimeRange};
pub use models::{
    AccessRequestStatus, AdminAccessRequest, Agent, AgentStatus, Environment, MemberKey,
    MetricDataPoint, Model, Role, Team, TeamMember,
};
pub use query::{AgentFilter, AgentSummary, Facet, SortDirection, SortField, SortState};
pub use source::{AgentQuery, DataSource};
pub use store::{AgentStore, TeamStore};
pub use wire::{AgentForm, AssignTeamRequest, MemberInvite, MutationResponse, TeamForm};
