pub mod commands;
mod context;
mod help;
pub mod output;
mod registry;
pub mod remote;
mod shell;

pub use context::{CliMode, CommandError, CommandResult, LoopControl, ShellContext};
pub use registry::{CommandEntry, CommandRegistry};
pub use shell::run_cli;
