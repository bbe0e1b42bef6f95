//! Admin access requests

use crate::style::*;
use agent_dashboard::badge::{access_request_tone, relative_time};
use agent_dashboard::state::{LoadState, SettingsPage};
use agent_dashboard::DataSource;
use anyhow::{bail, Result};
use chrono::Utc;
use comfy_table::Cell;

pub async fn run(source: &dyn DataSource, request: Option<&str>) -> Result<()> {
    let mut page = SettingsPage::default();
    with_spinner("Loading access requests...", page.load(source)).await;
    if let LoadState::Failed(message) = &page.requests {
        bail!("{}", message);
    }

    if let Some(agent_id) = request {
        with_spinner(
            "Requesting admin access...",
            page.request_access(source, agent_id),
        )
        .await?;
        print_success(&format!("Requested admin access to agent {}", agent_id));
    }

    print_header("Admin Access Requests");
    let requests = page.requests.value().map_or(&[][..], Vec::as_slice);
    if requests.is_empty() {
        println!("  {}", style_dim("No access requests"));
        println!();
        return Ok(());
    }

    let now = Utc::now();
    let mut table = new_table([
        "ID",
        "Agent",
        "Requested by",
        "Status",
        "Reviewed by",
        "Note",
        "Created",
    ]);
    for req in requests {
        table.add_row(vec![
            Cell::new(&req.id),
            Cell::new(&req.ai_agent_id),
            Cell::new(&req.requested_by_user_id),
            toned_cell(access_request_tone(&req.status), &req.status),
            Cell::new(req.reviewed_by_user_id.as_deref().unwrap_or("-")),
            Cell::new(req.note.as_deref().unwrap_or("")),
            Cell::new(relative_time(req.created_at, now)),
        ]);
    }
    println!("{table}");
    println!();
    Ok(())
}
