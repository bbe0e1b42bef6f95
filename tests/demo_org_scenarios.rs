//! End-to-end scenarios against the in-memory demo organization
//!
//! These walk the page reducers through multi-step workflows and check the
//! query layer's guarantees over every facet value the demo data offers.

use agent_dashboard::query::{
    filter_agents, query_agents, search_agents, sort_agents, status_counts, unique_values,
};
use agent_dashboard::state::{AgentsAction, AgentsPage, TeamPage, REQUIRED_FIELDS};
use agent_dashboard::{
    fixtures, AgentFilter, AgentForm, AgentQuery, AgentStatus, AgentSummary, DataSource, Facet,
    FixtureSource, MemberKey, SortDirection, SortField, SortState,
};
use chrono::{TimeZone, Utc};

// ============================================================================
// TEST HELPERS
// ============================================================================

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn facet_choices(facet: Facet) -> Vec<Option<String>> {
    let agents = fixtures::demo_agents(now());
    std::iter::once(None)
        .chain(unique_values(&agents, facet).into_iter().map(Some))
        .collect()
}

fn ids(rows: &[&agent_dashboard::Agent]) -> Vec<String> {
    rows.iter().map(|a| a.id.clone()).collect()
}

// ============================================================================
// QUERY GUARANTEES
// ============================================================================

#[test]
fn test_every_facet_combination_is_exact_and_idempotent() {
    let agents = fixtures::demo_agents(now());

    for team in facet_choices(Facet::Team) {
        for status in facet_choices(Facet::Status) {
            for environment in facet_choices(Facet::Environment) {
                let filter = AgentFilter {
                    team: team.clone(),
                    environment: environment.clone(),
                    model: None,
                    status: status.clone(),
                };
                let rows = filter_agents(&agents, &filter);

                let expected = agents.iter().filter(|a| filter.matches(a)).count();
                assert_eq!(rows.len(), expected);
                for agent in &rows {
                    if let Some(team) = &team {
                        assert_eq!(&agent.team, team);
                    }
                    if let Some(status) = &status {
                        assert_eq!(agent.status.as_str(), status);
                    }
                }

                let owned: Vec<_> = rows.iter().map(|a| (*a).clone()).collect();
                assert_eq!(ids(&filter_agents(&owned, &filter)), ids(&rows));
            }
        }
    }
}

#[test]
fn test_search_only_narrows() {
    let agents = fixtures::demo_agents(now());
    for needle in ["", "agent", "MONITOR", "slack", "zzz", "e"] {
        let all: Vec<_> = agents.iter().collect();
        let found = search_agents(all, needle);
        assert!(found.len() <= agents.len());
        for agent in &found {
            let haystack = format!("{} {}", agent.name, agent.description).to_lowercase();
            assert!(haystack.contains(&needle.to_lowercase()));
        }
    }
}

#[test]
fn test_descending_is_ascending_reversed_for_distinct_keys() {
    let agents = fixtures::demo_agents(now());
    for field in [SortField::Name, SortField::SuccessRate, SortField::LastRun] {
        let mut asc: Vec<_> = agents.iter().collect();
        let mut desc: Vec<_> = agents.iter().collect();
        sort_agents(&mut asc, field, SortDirection::Ascending);
        sort_agents(&mut desc, field, SortDirection::Descending);
        desc.reverse();
        assert_eq!(ids(&asc), ids(&desc), "{}", field);
    }
}

#[test]
fn test_query_pipeline_matches_manual_composition() {
    let agents = fixtures::demo_agents(now());
    let filter = AgentFilter::default().with(Facet::Environment, "production");
    let sort = SortState {
        field: SortField::ExecutionTime,
        direction: SortDirection::Descending,
    };

    let rows = query_agents(&agents, &filter, "a", Some(&sort));

    let mut manual = search_agents(filter_agents(&agents, &filter), "a");
    sort_agents(&mut manual, sort.field, sort.direction);
    assert_eq!(ids(&rows), ids(&manual));
    assert!(rows
        .windows(2)
        .all(|w| w[0].execution_time >= w[1].execution_time));
}

#[test]
fn test_summary_agrees_with_status_counts() {
    let agents = fixtures::demo_agents(now());
    let summary = AgentSummary::from_agents(&agents);
    let counts = status_counts(&agents);

    assert_eq!(summary.total, counts.total());
    assert_eq!(
        counts.get(AgentStatus::Healthy)
            + counts.get(AgentStatus::Degraded)
            + counts.get(AgentStatus::Failed),
        agents.len()
    );
    assert!(summary.average_success_rate > 0.0 && summary.average_success_rate <= 100.0);
}

// ============================================================================
// WORKFLOWS
// ============================================================================

#[tokio::test]
async fn test_agent_lifecycle_create_edit_assign_deactivate() {
    let source = FixtureSource::new(now());
    let mut page = AgentsPage::default();
    page.load(&source, &AgentQuery::dashboard()).await;
    assert_eq!(page.summary().total, 8);

    page.open_create();
    let err = page.submit_create(&source).await.unwrap_err();
    assert_eq!(err.to_string(), REQUIRED_FIELDS);
    assert!(page.create.is_open());

    if let Some(form) = page.create.form_mut() {
        *form = AgentForm {
            name: "Contract Summarizer".to_string(),
            description: "Summarizes vendor contracts".to_string(),
            category: "Legal".to_string(),
            model: "claude-3-sonnet".to_string(),
            key_features: "docusign; slack".to_string(),
        };
    }
    page.submit_create(&source).await.unwrap();
    assert!(!page.create.is_open());
    assert_eq!(page.summary().total, 9);
    let created = page
        .agents
        .value()
        .and_then(|s| s.agents().last())
        .cloned()
        .unwrap();
    assert_eq!(created.id, "9");
    assert_eq!(created.tools, vec!["docusign", "slack"]);

    assert!(page.open_edit(&created.id));
    if let Some(edit) = page.edit.form_mut() {
        edit.form.description = "Summarizes and flags vendor contracts".to_string();
    }
    page.submit_edit(&source).await.unwrap();

    page.open_assign(&created.id);
    if let Some(assignment) = page.assign.form_mut() {
        assignment.request.team_id = "6".to_string();
    }
    page.submit_assign(&source).await.unwrap();

    page.set_active(&source, &created.id, false).await.unwrap();

    let stored = source.fetch_agent(&created.id).await.unwrap();
    let shown = page.agents.value().and_then(|s| s.get(&created.id)).unwrap();
    assert_eq!(&stored, shown);
    assert_eq!(shown.team, "Marketing");
    assert_eq!(shown.status, AgentStatus::Failed);
    assert_eq!(shown.description, "Summarizes and flags vendor contracts");

    page.apply(AgentsAction::SetFacet(Facet::Team, Some("Marketing".to_string())));
    assert_eq!(page.visible().len(), 2);
}

#[tokio::test]
async fn test_team_rename_and_delete_keep_memberships_consistent() {
    let source = FixtureSource::new(now());
    let mut page = TeamPage::default();
    page.load(&source).await;
    assert_eq!(page.team_count(), 7);
    assert_eq!(page.member_count(), 10);

    // Sarah belongs to Engineering and Data
    assert!(page.open_edit("1"));
    if let Some(edit) = page.edit.form_mut() {
        edit.form.name = "Platform Engineering".to_string();
    }
    page.submit_edit(&source).await.unwrap();

    page.search = "sarah".to_string();
    let sarah = page.visible_members();
    assert_eq!(sarah.len(), 2);
    for membership in &sarah {
        assert_eq!(membership.teams, vec!["Platform Engineering", "Data"]);
    }

    // Every membership of Sarah or Alex now carries the new label
    page.search = "engineering".to_string();
    assert_eq!(page.visible_members().len(), 6);

    page.delete_team(&source, "2").await.unwrap();
    page.search = String::new();
    assert_eq!(page.team_count(), 6);
    assert_eq!(page.member_count(), 8);
    assert!(page
        .visible_members()
        .iter()
        .all(|m| m.key.team_id != "2"));

    // The deleted team's label is gone from the people who remain
    page.search = "data".to_string();
    assert!(page.visible_members().is_empty());
    page.search = "sarah".to_string();
    assert_eq!(page.visible_members()[0].teams, vec!["Platform Engineering"]);
    page.search = String::new();

    // A refetch agrees with the locally updated page
    let mut reloaded = TeamPage::default();
    reloaded.load(&source).await;
    assert_eq!(reloaded.member_count(), page.member_count());
    let labels = |p: &TeamPage| -> Vec<Vec<String>> {
        p.visible_members().iter().map(|m| m.teams.clone()).collect()
    };
    assert_eq!(labels(&reloaded), labels(&page));

    page.remove_member(&source, &MemberKey::new("1", "4"))
        .await
        .unwrap();
    assert_eq!(page.member_count(), 7);
}
