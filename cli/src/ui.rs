use agent_dashboard::badge::{
    access_request_tone, environment_tone, relative_time, role_badge, status_badge,
    success_rate_tone, Tone,
};
use agent_dashboard::history::{execution_history, success_percentage};
use agent_dashboard::metrics::{mean, sparkline, trend_percent, values};
use agent_dashboard::state::{DetailTab, LoadState, MetricsTab};
use agent_dashboard::{Agent, AgentStatus};
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use crate::app::{App, InputMode, Tab};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_tabs(frame, chunks[0], app);

    match app.tab {
        Tab::Dashboard => draw_dashboard(frame, chunks[1], app),
        Tab::Agents => draw_agents(frame, chunks[1], app),
        Tab::Team => draw_team(frame, chunks[1], app),
        Tab::Metrics => draw_metrics(frame, chunks[1], app),
        Tab::Settings => draw_settings(frame, chunks[1], app),
    }

    draw_status_bar(frame, chunks[2], app);
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => Color::Green,
        Tone::Warning => Color::Yellow,
        Tone::Critical => Color::Red,
        Tone::Info => Color::Blue,
        Tone::Accent => Color::Magenta,
        Tone::Muted => Color::DarkGray,
    }
}

fn toned(tone: Tone, text: impl Into<String>) -> Span<'static> {
    Span::styled(text.into(), Style::default().fg(tone_color(tone)))
}

fn header_row<'a>(titles: &[&'a str]) -> Row<'a> {
    Row::new(titles.iter().map(|t| Cell::from(*t)).collect::<Vec<_>>()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn label(text: &str) -> Span<'static> {
    Span::styled(format!("{:<16}", text), Style::default().fg(Color::Yellow).bold())
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.label()).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Agent Dashboard"),
        )
        .select(app.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

/// Placeholder shown while a page has no data to draw
fn load_placeholder<T>(state: &LoadState<T>, what: &str) -> Option<String> {
    match state {
        LoadState::Idle | LoadState::Loading => Some(format!("Loading {}...", what)),
        LoadState::Failed(message) => Some(format!("Failed to load {}: {}", what, message)),
        LoadState::Loaded(_) => None,
    }
}

fn draw_dashboard(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let summary = app.dashboard.summary();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(chunks[0]);

    let healthy = summary.counts.get(AgentStatus::Healthy);
    let degraded = summary.counts.get(AgentStatus::Degraded);
    let failed = summary.counts.get(AgentStatus::Failed);
    let card_values = [
        ("Total Agents", summary.total.to_string(), Tone::Info),
        ("Healthy", healthy.to_string(), Tone::Positive),
        ("Issues", (degraded + failed).to_string(), Tone::Warning),
        (
            "Avg Success Rate",
            format!("{:.1}%", summary.average_success_rate),
            success_rate_tone(summary.average_success_rate),
        ),
    ];
    for (slot, (title, value, tone)) in cards.iter().zip(card_values) {
        let card = Paragraph::new(Line::from(toned(tone, value).bold()))
            .centered()
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(card, *slot);
    }

    if let Some(message) = load_placeholder(&app.dashboard.agents, "agents") {
        let block = Block::default().borders(Borders::ALL).title("Agents");
        frame.render_widget(Paragraph::new(message).block(block), chunks[1]);
        return;
    }

    let title = match app.dashboard.filter.status.as_deref() {
        Some(status) => format!("Agents ({})", status),
        None => "Agents".to_string(),
    };
    let rows: Vec<Row> = app
        .dashboard
        .visible()
        .into_iter()
        .take(visible_row_count(chunks[1]))
        .map(|agent| {
            let (tone, status) = status_badge(agent.status);
            Row::new(vec![
                Cell::from(agent.name.clone()),
                Cell::from(toned(tone, status)),
                Cell::from(agent.team.clone()),
                Cell::from(relative_time(agent.last_run, Utc::now())),
                Cell::from(toned(
                    success_rate_tone(agent.success_rate),
                    format!("{:.1}%", agent.success_rate),
                )),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(10),
        Constraint::Length(18),
        Constraint::Length(16),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&["Name", "Status", "Team", "Last Run", "Success"]))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, chunks[1]);

    if app.dashboard.visible().is_empty() {
        draw_empty_message(frame, chunks[1], "No agents match the current filter");
    }
}

fn draw_agents(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    draw_query_line(frame, chunks[0], app);

    if let Some(message) = load_placeholder(&app.agents.agents, "agents") {
        let block = Block::default().borders(Borders::ALL).title("Agents");
        frame.render_widget(Paragraph::new(message).block(block), chunks[1]);
        return;
    }

    let selected = app.agents.selected_agent();
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(if selected.is_some() {
            [Constraint::Percentage(60), Constraint::Percentage(40)]
        } else {
            [Constraint::Percentage(100), Constraint::Percentage(0)]
        })
        .split(chunks[1]);

    let visible = app.agents.visible();
    let rows: Vec<Row> = visible
        .iter()
        .map(|agent| {
            let (tone, status) = status_badge(agent.status);
            Row::new(vec![
                Cell::from(agent.name.clone()),
                Cell::from(toned(tone, status)),
                Cell::from(agent.team.clone()),
                Cell::from(toned(
                    environment_tone(agent.environment),
                    agent.environment.as_str(),
                )),
                Cell::from(agent.model.to_string()),
                Cell::from(format!("{:.1}s", agent.execution_time)),
                Cell::from(format!("{:.1}%", agent.success_rate)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(22),
        Constraint::Length(9),
        Constraint::Length(16),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(7),
        Constraint::Length(8),
    ];
    let title = format!(
        "Agents ({} of {})",
        visible.len(),
        app.agents.agents.value().map_or(0, |s| s.len())
    );
    let table = Table::new(rows, widths)
        .header(header_row(&[
            "Name", "Status", "Team", "Env", "Model", "Time", "Success",
        ]))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = TableState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(table, body[0], &mut state);

    if visible.is_empty() {
        draw_empty_message(frame, body[0], "No agents match the current search and filters");
    }

    if let Some(agent) = selected {
        draw_agent_detail(frame, body[1], app, agent);
    }
}

fn draw_query_line(frame: &mut Frame, area: Rect, app: &App) {
    let search_style = if app.input == InputMode::Search {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let cursor = if app.input == InputMode::Search { "_" } else { "" };
    let sort = &app.agents.sort;

    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::Yellow)),
        Span::styled(format!("{}{}", app.agents.search, cursor), search_style),
        Span::raw("  |  "),
        Span::styled("Status: ", Style::default().fg(Color::Yellow)),
        Span::raw(app.agents.filter.status.clone().unwrap_or_else(|| "all".to_string())),
        Span::raw("  |  "),
        Span::styled("Sort: ", Style::default().fg(Color::Yellow)),
        Span::raw(format!("{} {}", sort.field, sort.direction.arrow())),
    ]);
    let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_agent_detail(frame: &mut Frame, area: Rect, app: &App, agent: &Agent) {
    let now = Utc::now();
    let (tone, status) = status_badge(agent.status);

    let mut lines = vec![
        Line::from(Span::raw(agent.name.clone()).bold()),
        Line::from(
            DetailTab::ALL
                .iter()
                .flat_map(|t| {
                    let style = if *t == app.agents.detail_tab {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    [Span::styled(t.label(), style), Span::raw("  ")]
                })
                .collect::<Vec<_>>(),
        ),
        Line::from(""),
    ];

    match app.agents.detail_tab {
        DetailTab::Overview => {
            lines.extend([
                Line::from(vec![label("Status"), toned(tone, status)]),
                Line::from(vec![label("Team"), Span::raw(agent.team.clone())]),
                Line::from(vec![
                    label("Environment"),
                    toned(environment_tone(agent.environment), agent.environment.as_str()),
                ]),
                Line::from(vec![label("Model"), Span::raw(agent.model.to_string())]),
                Line::from(vec![
                    label("Last run"),
                    Span::raw(relative_time(agent.last_run, now)),
                ]),
                Line::from(vec![
                    label("Execution time"),
                    Span::raw(format!("{:.1}s", agent.execution_time)),
                ]),
                Line::from(vec![
                    label("Success rate"),
                    toned(
                        success_rate_tone(agent.success_rate),
                        format!("{:.1}%", agent.success_rate),
                    ),
                ]),
            ]);
        }
        DetailTab::Configuration => {
            lines.push(Line::from(label("Description")));
            lines.push(Line::from(agent.description.clone()));
            lines.push(Line::from(""));
            lines.push(Line::from(label("Tools")));
            if agent.tools.is_empty() {
                lines.push(Line::from(Span::raw("none").dark_gray()));
            }
            for tool in &agent.tools {
                lines.push(Line::from(format!("  • {}", tool)));
            }
        }
        DetailTab::History => {
            let events = execution_history(now);
            let durations: Vec<f64> = events.iter().map(|e| f64::from(e.duration)).collect();
            let rate = success_percentage(&events);
            lines.extend([
                Line::from(vec![label("Duration"), Span::raw(sparkline(&durations)).cyan()]),
                Line::from(vec![
                    label("Successful"),
                    toned(success_rate_tone(rate), format!("{:.0}%", rate)),
                ]),
                Line::from(""),
            ]);
            for event in events.iter().rev().take(8) {
                let outcome = if event.success {
                    toned(Tone::Positive, "ok")
                } else {
                    toned(Tone::Critical, "failed")
                };
                lines.push(Line::from(vec![
                    Span::raw(format!("{:<16}", relative_time(event.timestamp, now))),
                    Span::raw(format!("{}s  {:>5} tok  ", event.duration, event.tokens)),
                    outcome,
                ]));
            }
        }
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Details"));
    frame.render_widget(paragraph, area);
}

fn draw_team(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let search_style = if app.input == InputMode::Search {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let cursor = if app.input == InputMode::Search { "_" } else { "" };
    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::Yellow)),
        Span::styled(format!("{}{}", app.team.search, cursor), search_style),
        Span::raw("  |  "),
        Span::styled("Teams: ", Style::default().fg(Color::Yellow)),
        Span::raw(app.team.team_count().to_string()),
        Span::raw("  |  "),
        Span::styled("Members: ", Style::default().fg(Color::Yellow)),
        Span::raw(app.team.member_count().to_string()),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    if let Some(message) = load_placeholder(&app.team.teams, "teams") {
        let block = Block::default().borders(Borders::ALL).title("Members");
        frame.render_widget(Paragraph::new(message).block(block), chunks[1]);
        return;
    }

    let members = app.team.visible_members();
    let rows: Vec<Row> = members
        .iter()
        .map(|member| {
            let (tone, role) = role_badge(member.role);
            Row::new(vec![
                Cell::from(member.avatar.clone()),
                Cell::from(member.name.clone()),
                Cell::from(member.email.clone()),
                Cell::from(toned(tone, role)),
                Cell::from(member.teams.join(", ")),
                Cell::from(member.joined_date.format("%Y-%m-%d").to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(20),
        Constraint::Min(24),
        Constraint::Length(10),
        Constraint::Length(20),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&["", "Name", "Email", "Role", "Teams", "Joined"]))
        .block(Block::default().borders(Borders::ALL).title("Members"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut state = TableState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(table, chunks[1], &mut state);

    if members.is_empty() {
        draw_empty_message(frame, chunks[1], "No members match");
    }
}

fn draw_metrics(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.metrics;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let titles: Vec<&str> = MetricsTab::ALL.iter().map(|t| t.label()).collect();
    let selected = MetricsTab::ALL
        .iter()
        .position(|t| *t == page.tab)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Metrics ({})", page.range.label())),
        )
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let series = page.series(page.tab);
    let body = if page.tab == MetricsTab::Tokens {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(series.len() as u16 * 3 + 2), Constraint::Min(0)])
            .split(chunks[1]);
        draw_token_usage(frame, split[1], app);
        split[0]
    } else {
        chunks[1]
    };

    let width = body.width.saturating_sub(4) as usize;
    let mut lines = Vec::new();
    for s in &series {
        let vals = values(s.points);
        let latest = vals.last().copied().unwrap_or_default();
        let trend = match trend_percent(s.points) {
            Some(t) if t >= 0.0 => toned(Tone::Positive, format!("+{:.1}%", t)),
            Some(t) => toned(Tone::Critical, format!("{:.1}%", t)),
            None => Span::raw("-"),
        };
        lines.push(Line::from(vec![
            Span::styled(s.label, Style::default().fg(Color::Yellow).bold()),
            Span::raw(format!(
                "  latest {:.2}{}  mean {:.2}{}  trend ",
                latest,
                s.unit,
                mean(s.points),
                s.unit
            )),
            trend,
        ]));
        let shown = &vals[vals.len().saturating_sub(width)..];
        lines.push(Line::from(Span::raw(sparkline(shown)).cyan()));
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(page.tab.label()),
    );
    frame.render_widget(paragraph, body);
}

fn draw_token_usage(frame: &mut Frame, area: Rect, app: &App) {
    let tokens = &app.metrics.snapshot.tokens;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let data: Vec<(&str, u64)> = tokens
        .tokens_per_agent
        .iter()
        .map(|a| (a.agent.as_str(), a.tokens))
        .collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Tokens per agent ({} total)", tokens.total_tokens())),
        )
        .data(data.as_slice())
        .bar_width(9)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(Style::default().fg(Color::Black).bg(Color::Blue));
    frame.render_widget(chart, chunks[0]);

    let rows: Vec<Row> = tokens
        .model_breakdown
        .iter()
        .map(|share| {
            Row::new(vec![
                Cell::from(share.model.clone()),
                Cell::from(share.tokens.to_string()),
                Cell::from(format!("{}%", share.percentage)),
            ])
        })
        .collect();
    let widths = [
        Constraint::Min(14),
        Constraint::Length(10),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&["Model", "Tokens", "Share"]))
        .block(Block::default().borders(Borders::ALL).title("By model"));
    frame.render_widget(table, chunks[1]);
}

fn draw_settings(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let refresh = app
        .last_refresh
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    let info = vec![
        Line::from(vec![label("Data source"), Span::raw(app.source_label.clone())]),
        Line::from(vec![
            label("Page size"),
            Span::raw(format!(
                "{} dashboard, {} list",
                app.dashboard_page_size, app.list_page_size
            )),
        ]),
        Line::from(vec![label("Last refresh"), Span::raw(refresh)]),
        Line::from(vec![
            label("Access"),
            Span::raw("select an agent on the Agents tab and press p").dark_gray(),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(info).block(Block::default().borders(Borders::ALL).title("Settings")),
        chunks[0],
    );

    if let Some(message) = load_placeholder(&app.settings.requests, "access requests") {
        let block = Block::default().borders(Borders::ALL).title("Access Requests");
        frame.render_widget(Paragraph::new(message).block(block), chunks[1]);
        return;
    }

    let now = Utc::now();
    let requests = app.settings.requests.value().map_or(&[][..], |r| r.as_slice());
    let rows: Vec<Row> = requests
        .iter()
        .map(|request| {
            Row::new(vec![
                Cell::from(request.id.clone()),
                Cell::from(request.ai_agent_id.clone()),
                Cell::from(request.requested_by_user_id.clone()),
                Cell::from(toned(
                    access_request_tone(&request.status),
                    request.status.to_string(),
                )),
                Cell::from(relative_time(request.created_at, now)),
                Cell::from(request.note.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Min(20),
    ];
    let title = if app.settings.requesting {
        "Access Requests (submitting...)"
    } else {
        "Access Requests"
    };
    let table = Table::new(rows, widths)
        .header(header_row(&[
            "ID",
            "Agent",
            "Requested by",
            "Status",
            "Created",
            "Note",
        ]))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut state = TableState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(table, chunks[1], &mut state);

    if requests.is_empty() {
        draw_empty_message(frame, chunks[1], "No access requests");
    }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let refresh_str = app
        .last_refresh
        .map(|t| t.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());

    let hints = match (app.input, app.tab) {
        (InputMode::Search, _) => "type to search, Enter/Esc done",
        (_, Tab::Agents) => "/ search  s sort  S reverse  f status  Enter details  d detail tab  a/x on/off  p access",
        (_, Tab::Team) => "/ search",
        (_, Tab::Metrics) => "←/→ section  t range",
        (_, Tab::Dashboard) => "f status",
        (_, Tab::Settings) => "",
    };

    let mut spans = vec![
        Span::styled(" Source: ", Style::default().fg(Color::Yellow)),
        Span::raw(app.source_label.clone()),
        Span::raw(" | "),
        Span::styled("Refresh: ", Style::default().fg(Color::Yellow)),
        Span::raw(refresh_str),
        Span::raw(" | "),
        Span::raw(hints).dark_gray(),
        Span::raw("  r reload  q quit").dark_gray(),
    ];

    if let Some(err) = app.error_message() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        ));
    }

    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}

fn visible_row_count(area: Rect) -> usize {
    area.height.saturating_sub(4) as usize
}

fn draw_empty_message(frame: &mut Frame, area: Rect, message: &str) {
    let inner = centered_rect(60, 20, area);
    let text = Paragraph::new(message).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, inner);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
