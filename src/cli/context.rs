use std::io::{self, BufRead, Write};

use jar_config::{Config, ConfigError, ConfigManager};
use jar_core::{CoreError, JarStateStore};
use strsim::levenshtein;

use crate::cli::{
    commands,
    output::{self, OutputPreferences},
    registry::{CommandEntry, CommandRegistry},
};
use crate::currency::CurrencyFormat;
use crate::errors::{CliError, JarError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Jar(#[from] JarError),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::Jar(JarError::Core(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::Jar(JarError::Config(err))
    }
}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        CommandError::Jar(JarError::Io(err))
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        CommandError::Jar(JarError::Serde(err))
    }
}

/// Everything a command handler can touch: the jar store, preferences and
/// the command table.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub currency: CurrencyFormat,
    pub store: JarStateStore,
    pub running: bool,
}

impl ShellContext {
    /// Context backed by the configuration under the application home.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let (config_manager, config) = crate::config::load_or_default()?;
        Ok(Self::with_config(mode, config_manager, config))
    }

    pub fn with_config(mode: CliMode, config_manager: ConfigManager, config: Config) -> Self {
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let mut registry = CommandRegistry::new();
        for entry in commands::all_definitions() {
            registry.register(entry);
        }
        registry.alias("quit", "exit");
        registry.alias("ls", "show");

        let currency = CurrencyFormat::from_config(&config);
        let store = JarStateStore::with_order(
            &config.display_order(),
            config.default_total_balance,
            config.rounding,
        )
        .with_minor_units(currency.minor_units);
        tracing::debug!(
            total_balance = config.default_total_balance,
            rounding = %config.rounding,
            "shell context ready"
        );

        Self {
            mode,
            registry,
            currency,
            config_manager,
            config,
            store,
            running: true,
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        if self.store.flags().has_unsaved_edits {
            "jars*> ".to_string()
        } else {
            "jars> ".to_string()
        }
    }

    pub fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    /// Tokenizes and runs one input line.
    pub fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };

        let command = raw.to_lowercase();
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        let control = self.dispatch(&command, raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    /// Asks before leaving with unsaved edits; scripts never block.
    pub fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script || !self.store.flags().has_unsaved_edits {
            return Ok(true);
        }
        print!("You have unsaved edits. Exit anyway? [y/N] ");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    pub fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Jar(JarError::Core(CoreError::AllocationIncomplete { total })) => {
                output::error(format!(
                    "Allocation must total 100% before saving (currently {total}%)."
                ));
                output::hint("Adjust the jars with `edit <jar> <percent>` first.");
            }
            other => output::error(other),
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(context: &mut ShellContext, lines: &[&str]) -> Vec<String> {
    let mut failures = Vec::new();
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => failures.push(err.to_string()),
        }
    }
    failures
}
