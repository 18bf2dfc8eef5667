pub mod action_executor;
pub mod command_registry;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod history;
pub mod logging;
pub mod model;
pub mod overlay_state;
pub mod runtime;
pub mod search;
pub mod selection;
pub mod transport;
