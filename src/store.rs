//! Record Store
//!
//! In-memory, ordered collections of the current session's entities. Every
//! mutation replaces whole records; no field of a stored record is edited in
//! place from outside.

use crate::models::{Agent, MemberKey, Team, TeamMember};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStore {
    agents: Vec<Agent>,
}

impl AgentStore {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Overwrite the whole collection (a fresh load).
    pub fn replace_all(&mut self, agents: Vec<Agent>) {
        self.agents = agents;
    }

    /// Append a newly created agent.
    pub fn insert(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    /// Replace the record with the same id. Returns false if none matched.
    pub fn replace_by_id(&mut self, agent: Agent) -> bool {
        match self.agents.iter_mut().find(|a| a.id == agent.id) {
            Some(slot) => {
                *slot = agent;
                true
            }
            None => {
                debug!(agent_id = %agent.id, "replace_by_id: no agent with this id");
                false
            }
        }
    }

    /// Drop an agent from the session. There is no server-side delete.
    pub fn remove(&mut self, id: &str) -> Option<Agent> {
        let idx = self.agents.iter().position(|a| a.id == id)?;
        Some(self.agents.remove(idx))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStore {
    teams: Vec<Team>,
}

impl TeamStore {
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn replace_all(&mut self, teams: Vec<Team>) {
        self.teams = teams;
    }

    pub fn add_team(&mut self, team: Team) {
        self.teams.push(team);
    }

    /// Rename a team and relabel every membership that lists the old name.
    /// Returns false if the id is unknown.
    pub fn rename_team(&mut self, id: &str, name: &str, description: &str) -> bool {
        let Some(team) = self.teams.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        let old_name = std::mem::replace(&mut team.name, name.to_string());
        team.description = description.to_string();
        if old_name != name {
            let labels = self
                .teams
                .iter_mut()
                .flat_map(|t| t.members.iter_mut())
                .flat_map(|m| m.teams.iter_mut());
            for label in labels {
                if *label == old_name {
                    *label = name.to_string();
                }
            }
        }
        true
    }

    /// Remove a team together with all of its memberships. Its name is
    /// dropped from the labels of people who stay in other teams, unless a
    /// remaining team shares that name.
    pub fn remove_team(&mut self, id: &str) -> Option<Team> {
        let idx = self.teams.iter().position(|t| t.id == id)?;
        let removed = self.teams.remove(idx);
        if !self.teams.iter().any(|t| t.name == removed.name) {
            for member in self.teams.iter_mut().flat_map(|t| t.members.iter_mut()) {
                member.teams.retain(|label| *label != removed.name);
            }
        }
        Some(removed)
    }

    /// Append a member to the team named by `member.key.team_id`.
    pub fn add_member(&mut self, member: TeamMember) -> bool {
        match self
            .teams
            .iter_mut()
            .find(|t| t.id == member.key.team_id)
        {
            Some(team) => {
                team.members.push(member);
                true
            }
            None => false,
        }
    }

    pub fn remove_member(&mut self, key: &MemberKey) -> Option<TeamMember> {
        let team = self.teams.iter_mut().find(|t| t.id == key.team_id)?;
        let idx = team.members.iter().position(|m| &m.key == key)?;
        Some(team.members.remove(idx))
    }

    pub fn team_for(&self, key: &MemberKey) -> Option<&Team> {
        self.get(&key.team_id)
    }

    /// Flattened view of every membership, in team order.
    pub fn members(&self) -> Vec<&TeamMember> {
        self.teams.iter().flat_map(|t| t.members.iter()).collect()
    }

    pub fn total_members(&self) -> usize {
        self.teams.iter().map(Team::member_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgentStatus, Environment, Model, Role};
    use chrono::Utc;

    fn agent(id: &str, name: &str) -> Agent {
        Agent {
            id: id.to_string(),
            name: name.to_string(),
            status: AgentStatus::Healthy,
            team: "Data".to_string(),
            environment: Environment::Production,
            model: Model::Gpt4,
            last_run: Utc::now(),
            execution_time: 1.0,
            success_rate: 90.0,
            tools: vec![],
            description: String::new(),
        }
    }

    fn member(team_id: &str, person: &str, team_name: &str) -> TeamMember {
        TeamMember {
            key: MemberKey::new(team_id, person),
            name: format!("Person {}", person),
            email: format!("{}@example.com", person),
            role: Role::Developer,
            teams: vec![team_name.to_string()],
            avatar: "P".to_string(),
            joined_date: Utc::now(),
        }
    }

    fn team(id: &str, name: &str, people: &[&str]) -> Team {
        Team {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            members: people.iter().map(|p| member(id, p, name)).collect(),
        }
    }

    #[test]
    fn test_replace_by_id_keeps_position() {
        let mut store = AgentStore::new(vec![agent("1", "a"), agent("2", "b"), agent("3", "c")]);
        let mut updated = agent("2", "renamed");
        updated.status = AgentStatus::Failed;
        assert!(store.replace_by_id(updated));
        assert_eq!(store.agents()[1].name, "renamed");
        assert_eq!(store.agents()[1].status, AgentStatus::Failed);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_replace_by_id_unknown() {
        let mut store = AgentStore::new(vec![agent("1", "a")]);
        assert!(!store.replace_by_id(agent("9", "x")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("1").unwrap().name, "a");
        assert!(store.get("9").is_none());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut store = AgentStore::default();
        store.insert(agent("1", "a"));
        store.insert(agent("2", "b"));
        assert_eq!(store.remove("1").map(|a| a.name), Some("a".to_string()));
        assert!(store.remove("1").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_team_drops_its_members() {
        let mut store = TeamStore::new(vec![
            team("1", "Eng", &["10", "11"]),
            team("2", "Data", &["20"]),
        ]);
        assert_eq!(store.members().len(), 3);
        store.remove_team("1");
        let members = store.members();
        assert_eq!(members.len(), 1);
        assert!(members.iter().all(|m| m.key.team_id == "2"));
    }

    #[test]
    fn test_remove_team_strips_label_from_other_memberships() {
        let mut ada = member("2", "10", "Data");
        ada.teams = vec!["Eng".to_string(), "Data".to_string()];
        let mut store = TeamStore::new(vec![team("1", "Eng", &["10"]), team("2", "Data", &[])]);
        store.add_member(ada);

        store.remove_team("1");
        assert_eq!(store.members().len(), 1);
        assert_eq!(store.members()[0].teams, vec!["Data"]);
    }

    #[test]
    fn test_remove_team_keeps_label_shared_by_remaining_team() {
        let mut store = TeamStore::new(vec![
            team("1", "Eng", &["10"]),
            team("2", "Eng", &["20"]),
        ]);
        store.remove_team("1");
        assert_eq!(store.members()[0].teams, vec!["Eng"]);
    }

    #[test]
    fn test_member_count_tracks_mutations() {
        let mut store = TeamStore::new(vec![team("1", "Eng", &["10"])]);
        assert!(store.add_member(member("1", "11", "Eng")));
        assert_eq!(store.get("1").unwrap().member_count(), 2);
        store.remove_member(&MemberKey::new("1", "10"));
        let t = store.get("1").unwrap();
        assert_eq!(t.member_count(), t.members.len());
        assert_eq!(t.member_count(), 1);
    }

    #[test]
    fn test_add_member_to_unknown_team() {
        let mut store = TeamStore::new(vec![team("1", "Eng", &[])]);
        assert!(!store.add_member(member("7", "1", "Ghost")));
        assert_eq!(store.total_members(), 0);
    }

    #[test]
    fn test_rename_team_relabels_members() {
        let mut store = TeamStore::new(vec![team("1", "Eng", &["10"]), team("2", "Data", &["20"])]);
        assert!(store.rename_team("1", "Platform", "Infra"));
        let t = store.get("1").unwrap();
        assert_eq!(t.name, "Platform");
        assert_eq!(t.description, "Infra");
        assert_eq!(t.members[0].teams, vec!["Platform"]);
        assert_eq!(store.get("2").unwrap().members[0].teams, vec!["Data"]);
        assert!(!store.rename_team("9", "x", "y"));
    }

    #[test]
    fn test_team_for_uses_explicit_key() {
        let store = TeamStore::new(vec![team("team-ab-1", "Eng", &["10"])]);
        let key = MemberKey::new("team-ab-1", "10");
        assert_eq!(store.team_for(&key).map(|t| t.name.as_str()), Some("Eng"));
    }
}
