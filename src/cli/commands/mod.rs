mod chart;
mod jars;
mod sync;
mod system;

use crate::cli::context::CommandError;
use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(jars::definitions());
    commands.extend(sync::definitions());
    commands.extend(chart::definitions());
    commands.extend(system::definitions());
    commands
}

fn required_arg<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
}
