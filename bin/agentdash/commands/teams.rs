//! Team and membership commands

use super::confirm;
use crate::style::*;
use agent_dashboard::badge::role_badge;
use agent_dashboard::state::{InviteForm, LoadState, TeamPage, EMAIL_REQUIRED};
use agent_dashboard::{DataSource, Error, MemberInvite, MemberKey, Role, TeamForm};
use anyhow::{bail, Result};
use clap::Subcommand;
use comfy_table::Cell;

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// Create a team
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Rename a team or change its description
    Update {
        /// Team ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a team and all of its memberships
    Delete {
        /// Team ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MemberCommand {
    /// Add a member to a team
    Add {
        /// Team ID
        #[arg(long)]
        team: String,

        #[arg(long)]
        email: String,

        /// admin, developer or viewer
        #[arg(long, default_value = "developer", value_parser = parse_role)]
        role: Role,
    },

    /// Remove a member from a team
    Remove {
        /// Team ID
        #[arg(long)]
        team: String,

        /// Person ID within the team
        #[arg(long)]
        person: String,
    },

    /// Send an organization-wide invitation
    Invite {
        #[arg(long)]
        email: String,

        #[arg(long, default_value = "developer", value_parser = parse_role)]
        role: Role,
    },
}

fn parse_role(s: &str) -> std::result::Result<Role, String> {
    Role::parse(s).ok_or_else(|| format!("unknown role '{}'", s))
}

async fn load_page(source: &dyn DataSource) -> Result<TeamPage> {
    let mut page = TeamPage::default();
    with_spinner("Loading teams...", page.load(source)).await;
    if let LoadState::Failed(message) = &page.teams {
        bail!("{}", message);
    }
    Ok(page)
}

pub async fn list(source: &dyn DataSource, mine: bool) -> Result<()> {
    let teams = if mine {
        with_spinner("Loading your teams...", source.fetch_my_teams()).await?
    } else {
        with_spinner("Loading teams...", source.fetch_teams()).await?
    };

    print_header(if mine { "My Teams" } else { "Teams" });
    if teams.is_empty() {
        println!("  {}", style_dim("No teams"));
        println!();
        return Ok(());
    }

    let mut table = new_table(["ID", "Name", "Description", "Members"]);
    for team in &teams {
        table.add_row(vec![
            Cell::new(&team.id),
            Cell::new(&team.name),
            Cell::new(&team.description),
            Cell::new(team.member_count()),
        ]);
    }
    println!("{table}");
    println!();
    Ok(())
}

pub async fn members(source: &dyn DataSource, search: Option<String>) -> Result<()> {
    let mut page = load_page(source).await?;
    if let Some(search) = search {
        page.search = search;
    }

    print_header("Team Members");
    let rows = page.visible_members();
    if rows.is_empty() {
        println!("  {}", style_dim("No members match"));
        println!();
        return Ok(());
    }

    let mut table = new_table(["Key", "Name", "Email", "Role", "Teams", "Joined"]);
    for member in &rows {
        let (tone, label) = role_badge(member.role);
        table.add_row(vec![
            Cell::new(&member.key),
            Cell::new(format!("{} {}", member.avatar, member.name)),
            Cell::new(&member.email),
            toned_cell(tone, label),
            Cell::new(member.teams.join(", ")),
            Cell::new(member.joined_date.format("%Y-%m-%d")),
        ]);
    }
    println!("{table}");
    println!(
        "  {}",
        style_gray(&format!(
            "{} of {} memberships across {} teams",
            rows.len(),
            page.member_count(),
            page.team_count()
        ))
    );
    println!();
    Ok(())
}

pub async fn team(source: &dyn DataSource, cmd: TeamCommand, yes: bool) -> Result<()> {
    let mut page = load_page(source).await?;

    match cmd {
        TeamCommand::Create { name, description } => {
            page.create.open(TeamForm { name, description });
            with_spinner("Creating team...", page.submit_create(source)).await?;
            if let Some(team) = page.teams.value().and_then(|s| s.teams().last()) {
                print_success(&format!("Created team {} ({})", team.name, team.id));
            }
        }
        TeamCommand::Update {
            id,
            name,
            description,
        } => {
            if !page.open_edit(&id) {
                return Err(Error::not_found("Team", id).into());
            }
            if let Some(edit) = page.edit.form_mut() {
                if let Some(name) = name {
                    edit.form.name = name;
                }
                if let Some(description) = description {
                    edit.form.description = description;
                }
            }
            with_spinner("Updating team...", page.submit_edit(source)).await?;
            if let Some(team) = page.teams.value().and_then(|s| s.get(&id)) {
                print_success(&format!("Updated team {}", team.name));
            }
        }
        TeamCommand::Delete { id } => {
            let Some(team) = page.teams.value().and_then(|s| s.get(&id)).cloned() else {
                return Err(Error::not_found("Team", id.as_str()).into());
            };
            let prompt = format!(
                "Delete team '{}' and its {} memberships?",
                team.name,
                team.member_count()
            );
            if !confirm(&prompt, yes)? {
                print_warning("Cancelled");
                return Ok(());
            }
            with_spinner("Deleting team...", page.delete_team(source, &id)).await?;
            print_success(&format!(
                "Deleted team {} ({} teams remain)",
                team.name,
                page.team_count()
            ));
        }
    }
    Ok(())
}

pub async fn member(source: &dyn DataSource, cmd: MemberCommand, yes: bool) -> Result<()> {
    match cmd {
        MemberCommand::Add { team, email, role } => {
            let mut page = load_page(source).await?;
            page.invite.open(InviteForm {
                email,
                role,
                team_id: Some(team.clone()),
            });
            with_spinner("Adding member...", page.submit_invite(source)).await?;
            let team_name = page
                .teams
                .value()
                .and_then(|s| s.get(&team))
                .map(|t| t.name.clone())
                .unwrap_or(team);
            print_success(&format!(
                "Added member to {} ({} members in total)",
                team_name,
                page.member_count()
            ));
        }
        MemberCommand::Remove { team, person } => {
            let mut page = load_page(source).await?;
            let key = MemberKey::new(team, person);
            let name = page
                .teams
                .value()
                .and_then(|s| s.members().into_iter().find(|m| m.key == key))
                .map(|m| m.name.clone())
                .unwrap_or_else(|| key.to_string());
            if !confirm(&format!("Remove {} from the team?", name), yes)? {
                print_warning("Cancelled");
                return Ok(());
            }
            with_spinner("Removing member...", page.remove_member(source, &key)).await?;
            print_success(&format!("Removed {}", name));
        }
        MemberCommand::Invite { email, role } => {
            let invite = MemberInvite {
                email: email.trim().to_string(),
                role: role.as_str().to_string(),
            };
            if invite.email.is_empty() {
                bail!(EMAIL_REQUIRED);
            }
            let ack = with_spinner("Sending invitation...", source.invite_member(&invite)).await?;
            print_success(&ack.message);
            if let Some(id) = ack.invitation_id {
                print_key_value("Invitation", &id);
            }
        }
    }
    Ok(())
}
