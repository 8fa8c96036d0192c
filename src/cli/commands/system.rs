use jar_domain::RoundingPolicy;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::registry::CommandEntry;
use crate::cli::{help, output};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "policy",
            "Show or change how amounts are rounded",
            "policy [per-jar|largest-remainder]",
            cmd_policy,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_policy(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        output::info(format!("Rounding policy: {}", context.store.policy()));
        return Ok(());
    };
    let policy: RoundingPolicy = raw.parse().map_err(CommandError::InvalidArguments)?;
    context.store.set_policy(policy);
    context.config.rounding = policy;
    context.config_manager.save(&context.config)?;
    output::success(format!("Rounding policy set to {policy}."));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Jar Budget {}", meta.version));
    output::line(format!("  Build hash   : {} ({})", meta.git_hash, meta.git_status));
    output::line(format!("  Built at     : {}", meta.timestamp));
    output::line(format!("  Target       : {}", meta.target));
    output::line(format!("  Profile      : {}", meta.profile));
    output::line(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
