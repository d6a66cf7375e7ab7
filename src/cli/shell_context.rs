use strsim::levenshtein;

use crate::config::ConfigManager;
use crate::ledger::Budget;

use super::errors::{CliError, CommandError};
use super::handlers;
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// Shell state: the budget being edited plus loop bookkeeping.
pub struct ShellContext {
    pub(crate) budget: Budget,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Builds a context from the stored configuration.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigManager::new()?.load()?;
        output::set_color_enabled(config.ui_color_enabled);
        Ok(Self::with_budget(Budget::from_config(&config)))
    }

    pub fn with_budget(budget: Budget) -> Self {
        Self {
            budget,
            running: true,
        }
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn prompt(&self) -> String {
        format!("budget ({})> ", self.budget.view_recurring_transactions().len())
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        handlers::commands().iter().map(|entry| entry.name).collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match handlers::find(command) {
            Some(entry) => match (entry.handler)(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            },
            None => {
                self.suggest_command(raw);
                Ok(LoopControl::Continue)
            }
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .command_names()
            .into_iter()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(err) => {
                output::error(err);
                Ok(())
            }
        }
    }

    /// Runs one line as if typed at the prompt.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
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

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }
}
