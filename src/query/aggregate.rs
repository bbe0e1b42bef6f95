//! Aggregation helpers for summary widgets and filter option lists

use super::Facet;
use crate::models::{Agent, AgentStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Distinct values of `facet` across `agents`, sorted lexicographically.
pub fn unique_values(agents: &[Agent], facet: Facet) -> Vec<String> {
    agents
        .iter()
        .map(|a| facet.value_of(a))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn unique_teams(agents: &[Agent]) -> Vec<String> {
    unique_values(agents, Facet::Team)
}

pub fn unique_environments(agents: &[Agent]) -> Vec<String> {
    unique_values(agents, Facet::Environment)
}

pub fn unique_models(agents: &[Agent]) -> Vec<String> {
    unique_values(agents, Facet::Model)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub healthy: usize,
    pub degraded: usize,
    pub failed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: AgentStatus) -> usize {
        match status {
            AgentStatus::Healthy => self.healthy,
            AgentStatus::Degraded => self.degraded,
            AgentStatus::Failed => self.failed,
        }
    }

    pub fn total(&self) -> usize {
        self.healthy + self.degraded + self.failed
    }
}

pub fn status_counts(agents: &[Agent]) -> StatusCounts {
    agents
        .iter()
        .fold(StatusCounts::default(), |mut counts, agent| {
            match agent.status {
                AgentStatus::Healthy => counts.healthy += 1,
                AgentStatus::Degraded => counts.degraded += 1,
                AgentStatus::Failed => counts.failed += 1,
            }
            counts
        })
}

/// Arithmetic mean of `success_rate`; 0 for an empty collection.
pub fn average_success_rate(agents: &[Agent]) -> f64 {
    if agents.is_empty() {
        return 0.0;
    }
    agents.iter().map(|a| a.success_rate).sum::<f64>() / agents.len() as f64
}

/// Numbers shown on the dashboard cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub total: usize,
    pub counts: StatusCounts,
    pub average_success_rate: f64,
}

impl AgentSummary {
    pub fn from_agents(agents: &[Agent]) -> Self {
        Self {
            total: agents.len(),
            counts: status_counts(agents),
            average_success_rate: average_success_rate(agents),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chrono::Utc;

    fn agents_with(teams: &[&str], rates: &[f64]) -> Vec<Agent> {
        let template = fixtures::demo_agents(Utc::now()).remove(0);
        teams
            .iter()
            .zip(rates.iter())
            .enumerate()
            .map(|(i, (team, rate))| Agent {
                id: i.to_string(),
                team: team.to_string(),
                success_rate: *rate,
                ..template.clone()
            })
            .collect()
    }

    #[test]
    fn test_unique_teams_sorted_and_deduplicated() {
        let agents = agents_with(&["Sales", "Data", "Data"], &[1.0, 2.0, 3.0]);
        assert_eq!(unique_teams(&agents), vec!["Data", "Sales"]);
    }

    #[test]
    fn test_unique_values_on_fixtures() {
        let agents = fixtures::demo_agents(Utc::now());
        assert_eq!(unique_environments(&agents), vec!["production", "staging"]);
        assert_eq!(
            unique_models(&agents),
            vec![
                "claude-3-opus",
                "claude-3-sonnet",
                "gemini-pro",
                "gpt-3.5-turbo",
                "gpt-4"
            ]
        );
        assert!(unique_values(&[], Facet::Team).is_empty());
    }

    #[test]
    fn test_average_success_rate() {
        assert_eq!(average_success_rate(&[]), 0.0);
        let agents = agents_with(&["a", "b"], &[100.0, 0.0]);
        assert_eq!(average_success_rate(&agents), 50.0);
    }

    #[test]
    fn test_status_counts_on_fixtures() {
        let agents = fixtures::demo_agents(Utc::now());
        let counts = status_counts(&agents);
        assert_eq!(counts.healthy, 6);
        assert_eq!(counts.degraded, 1);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.total(), agents.len());
        assert_eq!(counts.get(AgentStatus::Failed), 1);
    }

    #[test]
    fn test_summary() {
        let summary = AgentSummary::from_agents(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_success_rate, 0.0);
    }
}
