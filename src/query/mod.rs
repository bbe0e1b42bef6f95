//! Query layer over the Record Store
//!
//! Pure, single-pass functions: facet filtering and free-text search
//! ([`filter`]), ordering ([`sort`]) and summary statistics ([`aggregate`]).

pub mod aggregate;
pub mod filter;
pub mod sort;

pub use aggregate::{
    average_success_rate, status_counts, unique_environments, unique_models, unique_teams,
    unique_values, AgentSummary, StatusCounts,
};
pub use filter::{
    filter_agents, matches_search, query_agents, search_agents, search_members, AgentFilter, ALL,
};
pub use sort::{sort_agents, SortDirection, SortField, SortState};

use crate::models::Agent;
use std::fmt;

/// A filterable dimension of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Team,
    Environment,
    Model,
    Status,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Team, Facet::Environment, Facet::Model, Facet::Status];

    /// String form of this facet on `agent`, as compared by the filter.
    pub fn value_of(self, agent: &Agent) -> &str {
        match self {
            Facet::Team => &agent.team,
            Facet::Environment => agent.environment.as_str(),
            Facet::Model => agent.model.as_str(),
            Facet::Status => agent.status.as_str(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Facet::Team => "team",
            Facet::Environment => "environment",
            Facet::Model => "model",
            Facet::Status => "status",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
