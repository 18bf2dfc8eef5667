use serde::{Deserialize, Serialize};

use crate::model::CommandEntry;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateRow {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryChanged {
    pub text: String,
}

/// Raw user events forwarded by the launcher shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum ShellEvent {
    Open,
    QueryChanged(QueryChanged),
    Advance,
    ShowHistory,
    Confirm,
    Cancel,
    RepeatLast,
    ClearHistory,
}

/// What the shell should change on screen, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload")]
pub enum ShellUpdate {
    Render { rows: Vec<CandidateRow> },
    Select { index: Option<usize> },
    SetInputText { text: String },
    Close,
    Diagnostic { message: String },
    Executed { name: String },
}

impl From<&CommandEntry> for CandidateRow {
    fn from(value: &CommandEntry) -> Self {
        Self {
            name: value.name.clone(),
            icon: value.icon.locator(),
        }
    }
}
