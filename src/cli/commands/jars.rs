use jar_core::{CoreError, PercentageAllocator};
use jar_domain::JarCategory;

use crate::cli::commands::required_arg;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::currency::{format_amount, format_percent, parse_amount};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "show",
            "Show every jar with its percentage and amount",
            "show",
            cmd_show,
        ),
        CommandEntry::new(
            "total",
            "Set the balance the jars are split from",
            "total <amount>",
            cmd_total,
        ),
        CommandEntry::new(
            "edit",
            "Change one jar's percentage (clamped to what is left)",
            "edit <jar|id> <percent>",
            cmd_edit,
        ),
        CommandEntry::new(
            "commit",
            "Apply pending edits and recompute amounts",
            "commit",
            cmd_commit,
        ),
        CommandEntry::new(
            "revert",
            "Discard pending edits",
            "revert",
            cmd_revert,
        ),
    ]
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = &context.store;
    output::section(format!("Jars ({})", store.phase()));
    output::line(format!(
        "  {:>2}  {:<14} {:>7}  {:>20}",
        "#", "Jar", "Percent", "Amount"
    ));
    for (jar, amount) in store.jars().iter().zip(store.preview_amounts()) {
        output::line(format!(
            "  {:>2}  {:<14} {:>7}  {:>20}",
            jar.id(),
            jar.label,
            format_percent(jar.percent),
            format_amount(amount, &context.currency)
        ));
    }
    output::line(format!(
        "  Total balance: {}",
        format_amount(store.total_balance(), &context.currency)
    ));
    output::line(format!(
        "  Allocated: {}",
        format_percent(store.total_percent())
    ));

    report_allocation_gap(store.total_percent());
    if store.flags().has_unsaved_edits {
        output::hint("Amounts are a preview; `commit` applies them, `revert` discards them.");
    }
    Ok(())
}

fn cmd_total(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = required_arg(args, 0, "total <amount>")?;
    let amount = parse_amount(raw, &context.currency)
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` is not an amount")))?;
    let total = u64::try_from(amount).map_err(|_| {
        let clamped = i64::try_from(amount).unwrap_or(i64::MIN);
        CommandError::from(CoreError::NegativeBalance(clamped))
    })?;

    context.store.set_total_balance(total);
    output::success(format!(
        "Total balance set to {}.",
        format_amount(total, &context.currency)
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "edit <jar|id> <percent>";
    let jar_arg = required_arg(args, 0, usage)?;
    let value_arg = required_arg(args, 1, usage)?;

    let category: JarCategory = jar_arg.parse().map_err(|_| {
        CommandError::InvalidArguments(format!(
            "unknown jar `{jar_arg}` (use a name such as `savings` or an id 1-6)"
        ))
    })?;
    let index = context
        .store
        .index_of(category)
        .ok_or_else(|| CoreError::UnknownJar(category.to_string()))?;

    let requested = match value_arg.trim().trim_end_matches('%').parse::<f64>() {
        Ok(value) => value,
        Err(_) => PercentageAllocator::parse_percent_input(value_arg),
    };
    let stored = context.store.edit_percent(index, requested)?;

    let amount = context.store.preview_amounts()[index];
    output::success(format!(
        "{} set to {} ({}).",
        category.label(),
        format_percent(stored),
        format_amount(amount, &context.currency)
    ));
    if f64::from(stored) < requested.round() {
        output::warning(format!(
            "Requested {requested}% but only {} was available.",
            format_percent(stored)
        ));
    }
    Ok(())
}

fn cmd_commit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.store.commit_edits();
    if !summary.had_unsaved_edits {
        output::info("Nothing to commit; amounts recomputed from the current balance.");
    }
    output::success(format!(
        "Committed: {} allocated, {} assigned.",
        format_percent(summary.total_percent),
        format_amount(summary.allocated_amount, &context.currency)
    ));
    if !summary.fully_allocated {
        report_allocation_gap(summary.total_percent);
        output::hint("Saving requires exactly 100%.");
    }
    Ok(())
}

fn report_allocation_gap(total_percent: u32) {
    if total_percent > 100 {
        output::warning(format!(
            "The allocation exceeds 100% by {}.",
            format_percent(total_percent - 100)
        ));
    } else if total_percent < 100 {
        output::warning(format!(
            "{} of the balance is unallocated.",
            format_percent(100 - total_percent)
        ));
    }
}

fn cmd_revert(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.store.flags().has_unsaved_edits {
        output::info("No unsaved edits.");
        return Ok(());
    }
    context.store.revert_edits();
    output::success("Edits discarded.");
    Ok(())
}
