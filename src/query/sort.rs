//! Sort Engine

use crate::models::Agent;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

/// Sortable agent attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Name,
    Status,
    Team,
    Environment,
    Model,
    LastRun,
    ExecutionTime,
    SuccessRate,
    Tools,
    Description,
}

impl SortField {
    pub const ALL: [SortField; 11] = [
        SortField::Id,
        SortField::Name,
        SortField::Status,
        SortField::Team,
        SortField::Environment,
        SortField::Model,
        SortField::LastRun,
        SortField::ExecutionTime,
        SortField::SuccessRate,
        SortField::Tools,
        SortField::Description,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Status => "status",
            SortField::Team => "team",
            SortField::Environment => "environment",
            SortField::Model => "model",
            SortField::LastRun => "last_run",
            SortField::ExecutionTime => "execution_time",
            SortField::SuccessRate => "success_rate",
            SortField::Tools => "tools",
            SortField::Description => "description",
        }
    }

    /// Accepts snake_case and the camelCase attribute names.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.replace('-', "_").to_lowercase();
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized || f.as_str().replace('_', "") == normalized)
    }

    /// Compare two agents on this field's natural ordering.
    pub fn compare(self, a: &Agent, b: &Agent) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::Team => a.team.cmp(&b.team),
            SortField::Environment => a.environment.as_str().cmp(b.environment.as_str()),
            SortField::Model => a.model.as_str().cmp(b.model.as_str()),
            SortField::LastRun => a.last_run.cmp(&b.last_run),
            SortField::ExecutionTime => a.execution_time.total_cmp(&b.execution_time),
            SortField::SuccessRate => a.success_rate.total_cmp(&b.success_rate),
            SortField::Tools => a.tools.cmp(&b.tools),
            SortField::Description => a.description.cmp(&b.description),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Active sort column and direction of a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self::new(SortField::Name)
    }
}

impl SortState {
    pub fn new(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Same field flips the direction; a new field starts ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Stable in-place sort; ties keep their input order in both directions.
pub fn sort_agents<A: Borrow<Agent>>(rows: &mut [A], field: SortField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ord = field.compare(a.borrow(), b.borrow());
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
