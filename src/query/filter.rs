//! Filter Engine

use super::sort::{sort_agents, SortState};
use super::Facet;
use crate::models::{Agent, TeamMember};
use serde::{Deserialize, Serialize};

/// Sentinel criterion value meaning "no constraint"
pub const ALL: &str = "all";

/// Facet selection. `None` or `"all"` leaves a facet unconstrained; any other
/// value must match the agent's field exactly (case-sensitive).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentFilter {
    pub team: Option<String>,
    pub environment: Option<String>,
    pub model: Option<String>,
    pub status: Option<String>,
}

impl AgentFilter {
    pub fn criterion(&self, facet: Facet) -> Option<&str> {
        let value = match facet {
            Facet::Team => &self.team,
            Facet::Environment => &self.environment,
            Facet::Model => &self.model,
            Facet::Status => &self.status,
        };
        value.as_deref().filter(|v| *v != ALL)
    }

    pub fn set(&mut self, facet: Facet, value: Option<String>) {
        let slot = match facet {
            Facet::Team => &mut self.team,
            Facet::Environment => &mut self.environment,
            Facet::Model => &mut self.model,
            Facet::Status => &mut self.status,
        };
        *slot = value;
    }

    pub fn with(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.set(facet, Some(value.into()));
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        Facet::ALL.iter().all(|f| self.criterion(*f).is_none())
    }

    pub fn matches(&self, agent: &Agent) -> bool {
        Facet::ALL.iter().all(|facet| match self.criterion(*facet) {
            Some(wanted) => facet.value_of(agent) == wanted,
            None => true,
        })
    }
}

/// Agents matching every criterion, in input order.
pub fn filter_agents<'a>(agents: &'a [Agent], filter: &AgentFilter) -> Vec<&'a Agent> {
    agents.iter().filter(|a| filter.matches(a)).collect()
}

/// Case-insensitive substring match on name or description.
pub fn matches_search(agent: &Agent, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    agent.name.to_lowercase().contains(&needle)
        || agent.description.to_lowercase().contains(&needle)
}

pub fn search_agents<'a>(agents: Vec<&'a Agent>, query: &str) -> Vec<&'a Agent> {
    agents
        .into_iter()
        .filter(|a| matches_search(a, query))
        .collect()
}

/// Facets, then search, then sort: the rows a list view shows.
pub fn query_agents<'a>(
    agents: &'a [Agent],
    filter: &AgentFilter,
    search: &str,
    sort: Option<&SortState>,
) -> Vec<&'a Agent> {
    let mut rows = search_agents(filter_agents(agents, filter), search);
    if let Some(sort) = sort {
        sort_agents(&mut rows, sort.field, sort.direction);
    }
    rows
}

/// Case-insensitive substring match on name, email, role or any team label.
pub fn search_members<'a>(members: &[&'a TeamMember], query: &str) -> Vec<&'a TeamMember> {
    let needle = query.to_lowercase();
    members
        .iter()
        .copied()
        .filter(|m| {
            m.name.to_lowercase().contains(&needle)
                || m.email.to_lowercase().contains(&needle)
                || m.role.as_str().contains(&needle)
                || m.teams.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .collect()
}
