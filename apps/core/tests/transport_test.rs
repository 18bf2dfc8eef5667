use std::rc::Rc;

use rush_core::action_executor::{logging_invoker, InvocationError};
use rush_core::command_registry::CommandRegistry;
use rush_core::config::Config;
use rush_core::contract::{CandidateRow, QueryChanged, ShellEvent, ShellUpdate};
use rush_core::core_service::CoreService;
use rush_core::history::{HistoryStore, MemoryResource};
use rush_core::model::CommandEntry;
use rush_core::transport::{handle_event, handle_json, ErrorCode, TransportResponse};

fn service(resource: &Rc<MemoryResource>) -> CoreService {
    let registry = CommandRegistry::new()
        .with_command(
            CommandEntry::new("Move Tool", "move_M.png", "moveTool"),
            logging_invoker("moveTool"),
        )
        .with_command(
            CommandEntry::new("Broken Tool", "broken.png", "brokenTool"),
            Box::new(|| Err(InvocationError::Failed("boom".to_string()))),
        );
    let history = HistoryStore::new(Box::new(Rc::clone(resource)), 25);
    CoreService::with_history(Config::default(), registry, history).unwrap()
}

fn send(service: &mut CoreService, payload: &str) -> TransportResponse {
    serde_json::from_str(&handle_json(service, payload)).unwrap()
}

#[test]
fn events_use_kind_payload_shape() {
    let event = ShellEvent::QueryChanged(QueryChanged {
        text: "mo".to_string(),
    });
    let encoded = serde_json::to_value(&event).unwrap();
    assert_eq!(
        encoded,
        serde_json::json!({ "kind": "QueryChanged", "payload": { "text": "mo" } })
    );

    let open: ShellEvent = serde_json::from_str(r#"{"kind":"Open"}"#).unwrap();
    assert_eq!(open, ShellEvent::Open);
}

#[test]
fn open_returns_render_rows() {
    let resource = Rc::new(MemoryResource::default());
    let mut service = service(&resource);

    let response = send(&mut service, r#"{"kind":"Open"}"#);

    let TransportResponse::Ok { updates } = response else {
        panic!("expected ok response");
    };
    assert!(updates.contains(&ShellUpdate::Render {
        rows: vec![
            CandidateRow {
                name: "Move Tool".to_string(),
                icon: ":move_M.png".to_string(),
            },
            CandidateRow {
                name: "Broken Tool".to_string(),
                icon: ":broken.png".to_string(),
            },
        ],
    }));
    assert_eq!(updates.last(), Some(&ShellUpdate::Select { index: None }));
}

#[test]
fn confirm_reports_executed_command() {
    let resource = Rc::new(MemoryResource::default());
    let mut service = service(&resource);
    send(&mut service, r#"{"kind":"Open"}"#);
    send(
        &mut service,
        r#"{"kind":"QueryChanged","payload":{"text":"Move Tool"}}"#,
    );

    let response = send(&mut service, r#"{"kind":"Confirm"}"#);

    let TransportResponse::Ok { updates } = response else {
        panic!("expected ok response");
    };
    assert_eq!(
        updates,
        vec![
            ShellUpdate::Close,
            ShellUpdate::Executed {
                name: "Move Tool".to_string()
            },
        ]
    );
    assert_eq!(resource.contents().as_deref(), Some("Move Tool\n"));
}

#[test]
fn unknown_name_maps_to_no_such_command() {
    let resource = Rc::new(MemoryResource::default());
    let mut service = service(&resource);
    send(&mut service, r#"{"kind":"Open"}"#);
    send(
        &mut service,
        r#"{"kind":"QueryChanged","payload":{"text":"move"}}"#,
    );

    let response = send(&mut service, r#"{"kind":"Confirm"}"#);

    match response {
        TransportResponse::Err { error, updates } => {
            assert_eq!(error.code, ErrorCode::NoSuchCommand);
            assert!(matches!(updates.as_slice(), [ShellUpdate::Diagnostic { .. }]));
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn failing_command_maps_to_invocation_error() {
    let resource = Rc::new(MemoryResource::default());
    let mut service = service(&resource);
    service.on_open(&mut rush_core::transport::RecordingShell::default());
    handle_event(
        &mut service,
        ShellEvent::QueryChanged(QueryChanged {
            text: "Broken Tool".to_string(),
        }),
    );

    match handle_event(&mut service, ShellEvent::Confirm) {
        TransportResponse::Err { error, .. } => {
            assert_eq!(error.code, ErrorCode::Invocation);
            assert!(error.message.contains("boom"));
        }
        other => panic!("unexpected response: {other:?}"),
    }
    assert_eq!(service.history(), ["Broken Tool"]);
}

#[test]
fn repeat_last_on_empty_history_is_error_code() {
    let resource = Rc::new(MemoryResource::default());
    let mut service = service(&resource);

    match handle_event(&mut service, ShellEvent::RepeatLast) {
        TransportResponse::Err { error, .. } => assert_eq!(error.code, ErrorCode::EmptyHistory),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn malformed_payload_is_invalid_json() {
    let resource = Rc::new(MemoryResource::default());
    let mut service = service(&resource);

    let raw = handle_json(&mut service, "{not json");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["status"], "err");
    assert_eq!(value["error"]["code"], "invalid_json");
    assert_eq!(value["updates"], serde_json::json!([]));
}

#[test]
fn clear_history_event_empties_persisted_file() {
    let resource = Rc::new(MemoryResource::with_contents("Move Tool\n"));
    let mut service = service(&resource);
    send(&mut service, r#"{"kind":"Open"}"#);

    let response = send(&mut service, r#"{"kind":"ClearHistory"}"#);

    assert!(matches!(response, TransportResponse::Ok { .. }));
    assert!(service.history().is_empty());
    assert_eq!(resource.contents().as_deref(), Some(""));
}
