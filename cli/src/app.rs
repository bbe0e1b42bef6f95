use agent_dashboard::metrics::MetricsSnapshot;
use agent_dashboard::query::{Facet, SortField};
use agent_dashboard::state::{
    AgentsAction, AgentsPage, DetailTab, LoadState, MetricsPage, MetricsTab, SettingsPage,
    TeamAction, TeamPage,
};
use agent_dashboard::{Agent, AgentQuery, AgentStatus, DataSource};
use chrono::{DateTime, Utc};
use crossterm::event::KeyCode;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Agents,
    Team,
    Metrics,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Dashboard,
        Tab::Agents,
        Tab::Team,
        Tab::Metrics,
        Tab::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Agents => "Agents",
            Tab::Team => "Team",
            Tab::Metrics => "Metrics",
            Tab::Settings => "Settings",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Agents => 1,
            Tab::Team => 2,
            Tab::Metrics => 3,
            Tab::Settings => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Keystrokes edit the search text of the current tab
    Search,
}

/// Data-source work requested by a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Reload,
    Activate(String),
    Deactivate(String),
    RequestAccess(String),
}

/// Fields `s` steps through on the agents tab
pub const SORT_CYCLE: [SortField; 8] = [
    SortField::Name,
    SortField::Status,
    SortField::Team,
    SortField::Environment,
    SortField::Model,
    SortField::LastRun,
    SortField::ExecutionTime,
    SortField::SuccessRate,
];

pub struct App {
    pub tab: Tab,
    /// Full agent load behind the dashboard summary
    pub dashboard: AgentsPage,
    /// First page of the agents list
    pub agents: AgentsPage,
    pub team: TeamPage,
    pub metrics: MetricsPage,
    pub settings: SettingsPage,
    pub source_label: String,
    pub dashboard_page_size: u32,
    pub list_page_size: u32,
    /// Highlighted row of the current tab's list
    pub cursor: usize,
    pub input: InputMode,
    pub last_refresh: Option<DateTime<Utc>>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        source_label: String,
        dashboard_page_size: u32,
        list_page_size: u32,
        snapshot: MetricsSnapshot,
    ) -> Self {
        Self {
            tab: Tab::Dashboard,
            dashboard: AgentsPage::default(),
            agents: AgentsPage::default(),
            team: TeamPage::default(),
            metrics: MetricsPage::new(snapshot),
            settings: SettingsPage::default(),
            source_label,
            dashboard_page_size,
            list_page_size,
            cursor: 0,
            input: InputMode::Normal,
            last_refresh: None,
            should_quit: false,
        }
    }

    pub fn set_tab_from_str(&mut self, s: &str) {
        self.tab = Tab::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s))
            .unwrap_or(Tab::Dashboard);
        self.cursor = 0;
    }

    pub fn next_tab(&mut self) {
        let next = (self.tab.index() + 1) % Tab::ALL.len();
        self.tab = Tab::ALL[next];
        self.cursor = 0;
    }

    pub fn prev_tab(&mut self) {
        let idx = self.tab.index();
        let prev = if idx == 0 {
            Tab::ALL.len() - 1
        } else {
            idx - 1
        };
        self.tab = Tab::ALL[prev];
        self.cursor = 0;
    }

    /// Rows in the current tab's list
    pub fn list_len(&self) -> usize {
        match self.tab {
            Tab::Agents => self.agents.visible().len(),
            Tab::Team => self.team.visible_members().len(),
            Tab::Settings => self.settings.requests.value().map_or(0, Vec::len),
            Tab::Dashboard | Tab::Metrics => 0,
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        let last = self.list_len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(last);
    }

    fn clamp_cursor(&mut self) {
        let last = self.list_len().saturating_sub(1);
        self.cursor = self.cursor.min(last);
    }

    /// Agent under the cursor on the agents tab
    pub fn cursor_agent(&self) -> Option<&Agent> {
        self.agents.visible().get(self.cursor).copied()
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Option<Command> {
        if self.input == InputMode::Search {
            self.handle_search_key(code);
            return None;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.next_tab(),
            KeyCode::BackTab => self.prev_tab(),
            KeyCode::Up => self.cursor_up(),
            KeyCode::Down => self.cursor_down(),
            KeyCode::Char('r') => return Some(Command::Reload),
            KeyCode::Char('/') if matches!(self.tab, Tab::Agents | Tab::Team) => {
                self.input = InputMode::Search;
            }
            KeyCode::Char('f') if self.tab == Tab::Agents => {
                cycle_status_filter(&mut self.agents);
                self.cursor = 0;
            }
            KeyCode::Char('f') if self.tab == Tab::Dashboard => {
                cycle_status_filter(&mut self.dashboard);
            }
            KeyCode::Char('s') if self.tab == Tab::Agents => self.cycle_sort_field(),
            KeyCode::Char('S') if self.tab == Tab::Agents => {
                let field = self.agents.sort.field;
                self.agents.apply(AgentsAction::ToggleSort(field));
            }
            KeyCode::Enter if self.tab == Tab::Agents => self.toggle_selection(),
            KeyCode::Esc if self.tab == Tab::Agents => {
                self.agents.apply(AgentsAction::Select(None));
            }
            KeyCode::Char('d') if self.tab == Tab::Agents && self.agents.selected.is_some() => {
                let tabs = DetailTab::ALL;
                let idx = tabs
                    .iter()
                    .position(|t| *t == self.agents.detail_tab)
                    .map_or(0, |i| (i + 1) % tabs.len());
                self.agents.apply(AgentsAction::SetDetailTab(tabs[idx]));
            }
            KeyCode::Char('a') if self.tab == Tab::Agents => {
                return self.cursor_agent().map(|a| Command::Activate(a.id.clone()));
            }
            KeyCode::Char('x') if self.tab == Tab::Agents => {
                return self.cursor_agent().map(|a| Command::Deactivate(a.id.clone()));
            }
            KeyCode::Char('p') if self.tab == Tab::Agents => {
                return self
                    .cursor_agent()
                    .map(|a| Command::RequestAccess(a.id.clone()));
            }
            KeyCode::Right if self.tab == Tab::Metrics => {
                self.metrics.tab = self.metrics.tab.next();
            }
            KeyCode::Left if self.tab == Tab::Metrics => {
                let len = MetricsTab::ALL.len();
                let idx = MetricsTab::ALL
                    .iter()
                    .position(|t| *t == self.metrics.tab)
                    .unwrap_or(0);
                self.metrics.tab = MetricsTab::ALL[(idx + len - 1) % len];
            }
            KeyCode::Char('t') if self.tab == Tab::Metrics => {
                self.metrics.range = self.metrics.range.next();
            }
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let mut search = match self.tab {
            Tab::Team => self.team.search.clone(),
            _ => self.agents.search.clone(),
        };
        match code {
            KeyCode::Enter | KeyCode::Esc => {
                self.input = InputMode::Normal;
                return;
            }
            KeyCode::Backspace => {
                search.pop();
            }
            KeyCode::Char(c) => search.push(c),
            _ => return,
        }
        match self.tab {
            Tab::Team => self.team.apply(TeamAction::SetSearch(search)),
            _ => self.agents.apply(AgentsAction::SetSearch(search)),
        }
        self.cursor = 0;
    }

    fn cycle_sort_field(&mut self) {
        let idx = SORT_CYCLE
            .iter()
            .position(|f| *f == self.agents.sort.field)
            .map_or(0, |i| (i + 1) % SORT_CYCLE.len());
        self.agents.apply(AgentsAction::ToggleSort(SORT_CYCLE[idx]));
    }

    fn toggle_selection(&mut self) {
        let Some(id) = self.cursor_agent().map(|a| a.id.clone()) else {
            return;
        };
        if self.agents.selected.as_deref() == Some(id.as_str()) {
            self.agents.apply(AgentsAction::Select(None));
        } else {
            self.agents.apply(AgentsAction::Select(Some(id)));
        }
    }

    pub async fn run_command(&mut self, source: &dyn DataSource, command: Command) {
        match command {
            Command::Reload => self.refresh(source).await,
            Command::Activate(id) => self.set_active(source, &id, true).await,
            Command::Deactivate(id) => self.set_active(source, &id, false).await,
            Command::RequestAccess(id) => {
                if let Err(e) = self.settings.request_access(source, &id).await {
                    debug!("Access request for {} failed: {}", id, e);
                }
            }
        }
    }

    /// Applies the change to the agents list, then mirrors the returned
    /// record into the dashboard load.
    async fn set_active(&mut self, source: &dyn DataSource, id: &str, active: bool) {
        if let Err(e) = self.agents.set_active(source, id, active).await {
            debug!("Setting agent {} active={} failed: {}", id, active, e);
            return;
        }
        let updated = self.agents.agents.value().and_then(|s| s.get(id)).cloned();
        if let Some(agent) = updated {
            self.dashboard.apply(AgentsAction::Updated(agent));
        }
    }

    /// Reload every page and regenerate the demo metrics.
    pub async fn refresh(&mut self, source: &dyn DataSource) {
        self.agents.notice = None;
        self.team.error = None;
        self.settings.error = None;

        self.dashboard
            .load(source, &AgentQuery::page(1, self.dashboard_page_size))
            .await;
        self.agents
            .load(source, &AgentQuery::page(1, self.list_page_size))
            .await;
        self.team.load(source).await;
        self.settings.load(source).await;
        self.metrics.snapshot = MetricsSnapshot::generate(Utc::now(), &mut rand::thread_rng());

        self.clamp_cursor();
        self.last_refresh = Some(Utc::now());
    }

    /// First error any page is showing
    pub fn error_message(&self) -> Option<String> {
        if let LoadState::Failed(message) = &self.dashboard.agents {
            return Some(format!("Agents: {}", message));
        }
        if let LoadState::Failed(message) = &self.agents.agents {
            return Some(format!("Agents: {}", message));
        }
        if let Some(notice) = &self.agents.notice {
            return Some(notice.clone());
        }
        if let LoadState::Failed(message) = &self.team.teams {
            return Some(format!("Teams: {}", message));
        }
        if let Some(error) = &self.team.error {
            return Some(error.clone());
        }
        if let LoadState::Failed(message) = &self.settings.requests {
            return Some(format!("Access requests: {}", message));
        }
        self.settings.error.clone()
    }
}

/// all → healthy → degraded → failed → all
fn cycle_status_filter(page: &mut AgentsPage) {
    let current = page
        .filter
        .criterion(Facet::Status)
        .and_then(AgentStatus::parse);
    let next = match current {
        None => Some(AgentStatus::ALL[0]),
        Some(status) => AgentStatus::ALL
            .iter()
            .position(|s| *s == status)
            .and_then(|i| AgentStatus::ALL.get(i + 1))
            .copied(),
    };
    page.apply(AgentsAction::SetFacet(
        Facet::Status,
        next.map(|s| s.as_str().to_string()),
    ));
}
