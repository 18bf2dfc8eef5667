use serde::{Deserialize, Serialize};

use crate::contract::{CandidateRow, ShellEvent, ShellUpdate};
use crate::core_service::{CoreService, LauncherShell, ServiceError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    NoSuchCommand,
    Invocation,
    EmptyHistory,
    Config,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportResponse {
    Ok {
        updates: Vec<ShellUpdate>,
    },
    Err {
        error: ErrorResponse,
        updates: Vec<ShellUpdate>,
    },
}

/// Shell that queues every callback as a [`ShellUpdate`].
#[derive(Debug, Default)]
pub struct RecordingShell {
    updates: Vec<ShellUpdate>,
}

impl RecordingShell {
    pub fn updates(&self) -> &[ShellUpdate] {
        &self.updates
    }

    pub fn take_updates(&mut self) -> Vec<ShellUpdate> {
        std::mem::take(&mut self.updates)
    }
}

impl LauncherShell for RecordingShell {
    fn render(&mut self, rows: &[CandidateRow]) {
        self.updates.push(ShellUpdate::Render {
            rows: rows.to_vec(),
        });
    }

    fn select(&mut self, index: Option<usize>) {
        self.updates.push(ShellUpdate::Select { index });
    }

    fn set_input_text(&mut self, text: &str) {
        self.updates.push(ShellUpdate::SetInputText {
            text: text.to_string(),
        });
    }

    fn close(&mut self) {
        self.updates.push(ShellUpdate::Close);
    }

    fn diagnostic(&mut self, message: &str) {
        self.updates.push(ShellUpdate::Diagnostic {
            message: message.to_string(),
        });
    }
}

pub fn handle_event(service: &mut CoreService, event: ShellEvent) -> TransportResponse {
    let mut shell = RecordingShell::default();
    let outcome = match event {
        ShellEvent::Open => {
            service.on_open(&mut shell);
            Ok(())
        }
        ShellEvent::QueryChanged(change) => {
            service.on_query_changed(&change.text, &mut shell);
            Ok(())
        }
        ShellEvent::Advance => {
            service.on_advance(&mut shell);
            Ok(())
        }
        ShellEvent::ShowHistory => {
            service.on_show_history(&mut shell);
            Ok(())
        }
        ShellEvent::Cancel => {
            service.on_cancel(&mut shell);
            Ok(())
        }
        ShellEvent::ClearHistory => {
            service.clear_history(&mut shell);
            Ok(())
        }
        ShellEvent::Confirm => service.on_confirm(&mut shell).map(|executed| {
            if let Some(name) = executed {
                shell.updates.push(ShellUpdate::Executed { name });
            }
        }),
        ShellEvent::RepeatLast => service
            .repeat_last(&mut shell)
            .map(|name| shell.updates.push(ShellUpdate::Executed { name })),
    };

    let updates = shell.take_updates();
    match outcome {
        Ok(()) => TransportResponse::Ok { updates },
        Err(error) => TransportResponse::Err {
            error: map_service_error(error),
            updates,
        },
    }
}

pub fn handle_json(service: &mut CoreService, payload: &str) -> String {
    let response = match serde_json::from_str::<ShellEvent>(payload) {
        Ok(event) => handle_event(service, event),
        Err(error) => TransportResponse::Err {
            error: ErrorResponse {
                code: ErrorCode::InvalidJson,
                message: error.to_string(),
            },
            updates: Vec::new(),
        },
    };

    serde_json::to_string(&response).unwrap_or_else(|error| {
        log::error!("failed to encode transport response: {error}");
        r#"{"status":"err","error":{"code":"invalid_json","message":"response encoding failed"},"updates":[]}"#
            .to_string()
    })
}

fn map_service_error(error: ServiceError) -> ErrorResponse {
    let code = match &error {
        ServiceError::NoSuchCommand(_) => ErrorCode::NoSuchCommand,
        ServiceError::Invocation { .. } => ErrorCode::Invocation,
        ServiceError::EmptyHistory => ErrorCode::EmptyHistory,
        ServiceError::Config(_) => ErrorCode::Config,
    };
    ErrorResponse {
        code,
        message: error.to_string(),
    }
}
