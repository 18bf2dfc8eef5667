use crate::action_executor::InvocationError;
use crate::command_registry::CommandRegistry;
use crate::config::{validate, Config};
use crate::contract::CandidateRow;
use crate::history::HistoryStore;
use crate::model::CommandEntry;
use crate::overlay_state::{CompletionSource, OpenAction, OverlayState};
use crate::search::{filter, filter_history_query};
use crate::selection::SelectionNavigator;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),
    #[error("no such command: {0}")]
    NoSuchCommand(String),
    #[error("command '{name}' failed: {source}")]
    Invocation {
        name: String,
        source: InvocationError,
    },
    #[error("no command has been run yet")]
    EmptyHistory,
}

/// Callbacks the core makes into whatever draws the palette.
pub trait LauncherShell {
    fn render(&mut self, rows: &[CandidateRow]);
    fn select(&mut self, index: Option<usize>);
    fn set_input_text(&mut self, text: &str);
    fn close(&mut self);
    fn diagnostic(&mut self, message: &str);
}

/// The palette's state machine. Owns the history store exclusively.
#[derive(Debug)]
pub struct CoreService {
    config: Config,
    registry: CommandRegistry,
    history: HistoryStore,
    overlay: OverlayState,
    navigator: SelectionNavigator,
    input_text: String,
    candidates: Vec<CommandEntry>,
}

impl CoreService {
    pub fn new(config: Config, registry: CommandRegistry) -> Result<Self, ServiceError> {
        let history = HistoryStore::with_file(&config.history_path, config.history_limit);
        Self::with_history(config, registry, history)
    }

    /// Builds the service and reads the persisted history right away, so a
    /// command run before the first open extends the saved list instead of
    /// replacing it.
    pub fn with_history(
        config: Config,
        registry: CommandRegistry,
        mut history: HistoryStore,
    ) -> Result<Self, ServiceError> {
        validate(&config).map_err(ServiceError::Config)?;
        // Read failures are logged by the store; the service starts with no history.
        let _ = history.load();
        let navigator = SelectionNavigator::new(config.advance_policy);
        Ok(Self {
            config,
            registry,
            history,
            overlay: OverlayState::default(),
            navigator,
            input_text: String::new(),
            candidates: Vec::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn candidates(&self) -> &[CommandEntry] {
        &self.candidates
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn selection(&self) -> Option<usize> {
        self.navigator.cursor()
    }

    pub fn source(&self) -> CompletionSource {
        self.overlay.source()
    }

    pub fn is_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    /// Show the palette. History is re-read from its resource on every fresh open.
    pub fn on_open(&mut self, shell: &mut dyn LauncherShell) {
        if self.overlay.on_open() == OpenAction::FocusExisting {
            return;
        }
        // Read failures are logged by the store; the palette opens with no history.
        let _ = self.history.load();
        self.input_text.clear();
        shell.set_input_text("");
        self.recompute(shell);
    }

    pub fn on_query_changed(&mut self, text: &str, shell: &mut dyn LauncherShell) {
        if !self.overlay.is_visible() {
            return;
        }
        self.input_text = text.to_string();
        self.overlay.on_query_changed(text);
        self.recompute(shell);
    }

    pub fn on_show_history(&mut self, shell: &mut dyn LauncherShell) {
        if !self.overlay.is_visible() {
            return;
        }
        self.overlay.on_show_history();
        self.recompute(shell);
    }

    /// Move the cursor to the next candidate and mirror it into the input field.
    pub fn on_advance(&mut self, shell: &mut dyn LauncherShell) -> Option<usize> {
        if !self.overlay.is_visible() {
            return None;
        }
        let cursor = self.navigator.advance();
        if let Some(entry) = self.navigator.current_selection(&self.candidates) {
            self.input_text = entry.name.clone();
            shell.set_input_text(&entry.name);
        }
        shell.select(cursor);
        cursor
    }

    pub fn on_cancel(&mut self, shell: &mut dyn LauncherShell) {
        if self.overlay.on_close() {
            shell.close();
            self.reset_session();
        }
    }

    /// Run the command named exactly by the input text.
    ///
    /// Returns `Ok(None)` for an empty field or a hidden palette. The history update
    /// is kept even when the command itself fails.
    pub fn on_confirm(
        &mut self,
        shell: &mut dyn LauncherShell,
    ) -> Result<Option<String>, ServiceError> {
        if !self.overlay.is_visible() || self.input_text.is_empty() {
            return Ok(None);
        }

        let Some(entry) = self.registry.get(&self.input_text).cloned() else {
            let error = ServiceError::NoSuchCommand(self.input_text.clone());
            shell.diagnostic(&error.to_string());
            return Err(error);
        };

        // Close before dispatch so the command runs with the palette out of the way.
        self.on_cancel(shell);
        self.execute(entry, shell).map(Some)
    }

    /// Re-run the most recently used command.
    ///
    /// Works with the palette hidden; the history is re-read first in that case so
    /// runs from other sessions are seen.
    pub fn repeat_last(&mut self, shell: &mut dyn LauncherShell) -> Result<String, ServiceError> {
        if !self.overlay.is_visible() {
            let _ = self.history.load();
        }
        let Some(name) = self.history.most_recent() else {
            return Err(ServiceError::EmptyHistory);
        };
        let Some(entry) = self.registry.resolve_history_name(name).cloned() else {
            let error = ServiceError::NoSuchCommand(name.to_string());
            shell.diagnostic(&error.to_string());
            return Err(error);
        };
        self.execute(entry, shell)
    }

    pub fn clear_history(&mut self, shell: &mut dyn LauncherShell) {
        self.history.clear();
        let _ = self.history.save();
        if self.overlay.source() == CompletionSource::History {
            self.recompute(shell);
        }
    }

    fn execute(
        &mut self,
        entry: CommandEntry,
        shell: &mut dyn LauncherShell,
    ) -> Result<String, ServiceError> {
        // Older files may hold the same command under its lower-case spelling.
        let registry = &self.registry;
        self.history.remove_aliases(&entry.name, |stored| {
            registry
                .resolve_history_name(stored)
                .is_some_and(|resolved| resolved.name == entry.name)
        });
        self.history.record_use(&entry.name);
        // Write failures are logged by the store and never block the command.
        let _ = self.history.save();

        match self.registry.invoke(&entry) {
            Ok(()) => {
                log::info!("command executed: {}", entry.invocation_target);
                Ok(entry.name)
            }
            Err(source) => {
                let error = ServiceError::Invocation {
                    name: entry.name,
                    source,
                };
                log::error!("{error}");
                shell.diagnostic(&error.to_string());
                Err(error)
            }
        }
    }

    fn recompute(&mut self, shell: &mut dyn LauncherShell) {
        let found = match self.overlay.source() {
            CompletionSource::Commands => filter(self.registry.entries(), &self.input_text),
            CompletionSource::History => {
                filter_history_query(self.history.entries(), &self.registry, &self.input_text)
            }
        };
        self.candidates = found.into_iter().cloned().collect();
        self.navigator.set_len(self.candidates.len());

        let rows: Vec<CandidateRow> = self.candidates.iter().map(CandidateRow::from).collect();
        shell.render(&rows);
        shell.select(None);
    }

    fn reset_session(&mut self) {
        self.input_text.clear();
        self.candidates.clear();
        self.navigator.set_len(0);
    }
}
