use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::config::MAX_HISTORY_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to read command history from {location}: {message}")]
    Read { location: String, message: String },
    #[error("failed to write command history to {location}: {message}")]
    Write { location: String, message: String },
}

/// Backing storage for the history list. One flat text blob.
pub trait HistoryResource {
    /// `Ok(None)` when nothing has been persisted yet.
    fn read(&self) -> std::io::Result<Option<String>>;
    fn write(&self, contents: &str) -> std::io::Result<()>;
    fn location(&self) -> String;
}

impl<R: HistoryResource + ?Sized> HistoryResource for Rc<R> {
    fn read(&self) -> std::io::Result<Option<String>> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        (**self).write(contents)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

#[derive(Debug, Clone)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryResource for FileResource {
    fn read(&self) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Default)]
pub struct MemoryResource {
    contents: RefCell<Option<String>>,
}

impl MemoryResource {
    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: RefCell::new(Some(contents.to_string())),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl HistoryResource for MemoryResource {
    fn read(&self) -> std::io::Result<Option<String>> {
        Ok(self.contents.borrow().clone())
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        *self.contents.borrow_mut() = Some(contents.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

/// Most-recent-first list of used command names, bounded and duplicate free.
pub struct HistoryStore {
    resource: Box<dyn HistoryResource>,
    entries: Vec<String>,
    limit: usize,
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("location", &self.resource.location())
            .field("entries", &self.entries)
            .field("limit", &self.limit)
            .finish()
    }
}

impl HistoryStore {
    pub fn new(resource: Box<dyn HistoryResource>, limit: usize) -> Self {
        Self {
            resource,
            entries: Vec::new(),
            limit: limit.clamp(1, MAX_HISTORY_LIMIT),
        }
    }

    pub fn with_file(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self::new(Box::new(FileResource::new(path)), limit)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// On failure the list is left empty and the error is returned for the caller
    /// to ignore or report; the palette works without history.
    pub fn load(&mut self) -> Result<&[String], HistoryError> {
        self.entries.clear();
        let raw = match self.resource.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(&self.entries),
            Err(error) => {
                let error = HistoryError::Read {
                    location: self.resource.location(),
                    message: error.to_string(),
                };
                log::warn!("{error}");
                return Err(error);
            }
        };

        for line in raw.lines() {
            if line.trim().is_empty() || self.entries.iter().any(|seen| seen == line) {
                continue;
            }
            self.entries.push(line.to_string());
        }
        self.entries.truncate(self.limit);
        log::debug!("loaded {} history entries", self.entries.len());
        Ok(&self.entries)
    }

    pub fn record_use(&mut self, name: &str) {
        if let Some(position) = self.entries.iter().position(|entry| entry == name) {
            let existing = self.entries.remove(position);
            self.entries.insert(0, existing);
        } else {
            self.entries.insert(0, name.to_string());
        }
        self.entries.truncate(self.limit);
    }

    /// Drops every entry other than `keep` that `is_alias` accepts.
    pub fn remove_aliases(&mut self, keep: &str, is_alias: impl Fn(&str) -> bool) {
        self.entries
            .retain(|stored| stored == keep || !is_alias(stored));
    }

    pub fn save(&self) -> Result<(), HistoryError> {
        let mut encoded = String::new();
        for entry in &self.entries {
            encoded.push_str(entry);
            encoded.push('\n');
        }

        self.resource.write(&encoded).map_err(|error| {
            let error = HistoryError::Write {
                location: self.resource.location(),
                message: error.to_string(),
            };
            log::warn!("{error}");
            error
        })
    }

    /// Empties the in-memory list. Call [`save`](Self::save) to persist.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
