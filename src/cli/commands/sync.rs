use std::path::Path;

use jar_core::SyncService;
use jar_domain::{Balance, JarInfo};

use crate::cli::commands::required_arg;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::remote::{read_response, JsonDirRemote};
use crate::currency::{format_amount, format_percent};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "load-profile",
            "Apply a saved jar-division response",
            "load-profile <file.json>",
            cmd_load_profile,
        ),
        CommandEntry::new(
            "load-balance",
            "Apply a saved balance response",
            "load-balance <file.json>",
            cmd_load_balance,
        ),
        CommandEntry::new(
            "sync",
            "Refresh profile and balance from a response directory",
            "sync <dir>",
            cmd_sync,
        ),
        CommandEntry::new(
            "save",
            "Save the allocation (must total 100%) to a response directory",
            "save <dir>",
            cmd_save,
        ),
    ]
}

fn cmd_load_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = required_arg(args, 0, "load-profile <file.json>")?;
    let response = read_response::<JarInfo>(Path::new(path)).map_err(into_command_error)?;
    SyncService::apply_jar_info(&mut context.store, response)?;
    output::success(format!(
        "Loaded jar division from {path} ({} allocated).",
        format_percent(context.store.total_percent())
    ));
    Ok(())
}

fn cmd_load_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = required_arg(args, 0, "load-balance <file.json>")?;
    let response = read_response::<Balance>(Path::new(path)).map_err(into_command_error)?;
    SyncService::apply_balance(&mut context.store, response)?;
    output::success(format!(
        "Loaded balances from {path} (total {}).",
        format_amount(context.store.total_balance(), &context.currency)
    ));
    Ok(())
}

fn cmd_sync(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = required_arg(args, 0, "sync <dir>")?;
    let remote = JsonDirRemote::new(dir);
    SyncService::refresh(&mut context.store, &remote)?;
    output::success(format!(
        "Synced from {dir}: {} over {} jars.",
        format_amount(context.store.total_balance(), &context.currency),
        context.store.jars().len()
    ));
    Ok(())
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = required_arg(args, 0, "save <dir>")?;
    let remote = JsonDirRemote::new(dir);
    let summary = SyncService::save(&mut context.store, &remote)?;
    output::success(format!(
        "Saved allocation to {} ({} assigned).",
        remote.profile_path().display(),
        format_amount(summary.allocated_amount, &context.currency)
    ));
    Ok(())
}

fn into_command_error(err: jar_core::RemoteError) -> CommandError {
    CommandError::from(jar_core::CoreError::from(err))
}
