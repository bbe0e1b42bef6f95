//! Subcommand implementations

pub mod access;
pub mod agents;
pub mod metrics;
pub mod teams;

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};

/// Ask before a destructive action; `yes` skips the prompt.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
