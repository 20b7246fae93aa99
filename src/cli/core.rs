//! Core CLI dispatch, errors, and shell context helpers.

use std::{
    env,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    core::{services::ServiceError, Clock, FixedClock, LedgerManager, SystemClock},
    errors::LedgerError,
    storage::JsonStorage,
};

use super::commands;
use super::output;
use super::registry::CommandRegistry;

const TODAY_ENV: &str = "FINANCE_CORE_TODAY";
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Fatal shell errors that abort the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-command failures; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger_manager: Arc<RwLock<LedgerManager>>,
    pub state: JsonStorage,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new_default()?;
        let state = JsonStorage::new(Some(storage.base_dir().to_path_buf()))?;

        let mut manager = LedgerManager::new(Box::new(storage));
        if manager.open_or_create(&config.ledger_name)? {
            tracing::info!(ledger = %config.ledger_name, "opened saved ledger");
        }

        Ok(Self {
            mode,
            registry,
            ledger_manager: Arc::new(RwLock::new(manager)),
            state,
            config_manager,
            config,
            clock: clock_from_env(),
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn manager(&self) -> RwLockReadGuard<'_, LedgerManager> {
        self.ledger_manager
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn manager_mut(&self) -> RwLockWriteGuard<'_, LedgerManager> {
        self.ledger_manager
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub(crate) fn format_amount(&self, value: f64) -> String {
        output::format_amount(&self.config.currency_symbol, value)
    }

    pub(crate) fn prompt(&self) -> String {
        let name = self
            .manager()
            .current_name()
            .unwrap_or("unsaved")
            .to_string();
        format!("finance[{name}]> ")
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    /// Writes the active ledger back under its current name.
    pub(crate) fn autosave(&self) -> CommandResult {
        let mut manager = self.manager_mut();
        let name = manager
            .current_name()
            .unwrap_or(self.config.ledger_name.as_str())
            .to_string();
        let path = manager.save(&name)?;
        tracing::debug!(path = %path.display(), "ledger autosaved");
        Ok(())
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Prompts for a value interactively; script mode treats a missing value as an error.
    pub(crate) fn ask(&self, label: &str) -> Result<String, CommandError> {
        if self.mode == CliMode::Script {
            return Err(CommandError::InvalidArguments(format!(
                "missing value for {label}"
            )));
        }
        let value = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    pub(crate) fn dispatch(
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

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let lowered = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &lowered), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= MAX_SUGGESTION_DISTANCE {
                output::hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit the shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Service(ServiceError::Ledger(LedgerError::ValidationFailed {
                field,
                reason,
            }))
            | CommandError::Ledger(LedgerError::ValidationFailed { field, reason }) => {
                output::error(format!("Invalid {field}: {reason}"));
            }
            other => output::error(other),
        }
    }
}

fn clock_from_env() -> Arc<dyn Clock> {
    let pinned = env::var(TODAY_ENV)
        .ok()
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok());
    match pinned {
        Some(date) => Arc::new(FixedClock(date)),
        None => Arc::new(SystemClock),
    }
}
