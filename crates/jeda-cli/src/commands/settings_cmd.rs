use jeda_core::settings::{CommitResult, Draft};

use crate::cli::SettingsCommands;
use crate::commands::common::{
    format_field_help_lines, format_settings_lines, open_settings_sync, parse_assignment,
    report_commit, CliContext, OpenedSync,
};
use crate::error::CliError;

pub async fn run_settings(
    command: Option<SettingsCommands>,
    context: &CliContext,
) -> Result<(), CliError> {
    match command.unwrap_or(SettingsCommands::Show { json: false }) {
        SettingsCommands::Show { json } => run_settings_show(json, context),
        SettingsCommands::Set { assignments, local } => {
            run_settings_set(&assignments, local, context).await
        }
        SettingsCommands::Reset { local } => run_settings_reset(local, context).await,
        SettingsCommands::Fields => {
            for line in format_field_help_lines() {
                println!("{line}");
            }
            Ok(())
        }
        SettingsCommands::Path => {
            println!("{}", context.settings_path.display());
            Ok(())
        }
    }
}

pub fn run_settings_show(as_json: bool, context: &CliContext) -> Result<(), CliError> {
    let settings = context.open_store().snapshot();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        for line in format_settings_lines(&settings) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Apply every assignment to a single draft, then close it once.
///
/// A bad assignment aborts before anything is committed.
pub fn apply_assignments(draft: &mut Draft, assignments: &[String]) -> Result<(), CliError> {
    for assignment in assignments {
        let (field, value) = parse_assignment(assignment)?;
        draft.edit_field(field, value)?;
    }
    Ok(())
}

pub async fn run_settings_set(
    assignments: &[String],
    local_only: bool,
    context: &CliContext,
) -> Result<(), CliError> {
    let opened = open_settings_sync(context, local_only).await?;
    let mut draft = opened.sync.open_session();
    apply_assignments(&mut draft, assignments)?;
    finish_session(opened, draft).await;
    Ok(())
}

pub async fn run_settings_reset(local_only: bool, context: &CliContext) -> Result<(), CliError> {
    let opened = open_settings_sync(context, local_only).await?;
    let mut draft = opened.sync.open_session();
    draft.reset_to_defaults();
    finish_session(opened, draft).await;
    Ok(())
}

async fn finish_session(opened: OpenedSync, draft: Draft) {
    let OpenedSync {
        sync,
        mut notifications,
        authenticated,
        request_timeout,
    } = opened;

    let result = sync.close_session(draft, authenticated);
    if matches!(result, CommitResult::Committed { .. }) {
        for line in format_settings_lines(&sync.snapshot()) {
            println!("{line}");
        }
    }

    report_commit(result, &mut notifications, request_timeout).await;
    if authenticated {
        println!("Sync status: {}", sync.sync_state().borrow().label());
    }
}
