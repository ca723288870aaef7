//! Async operations over the shared application state.

/// Store connectivity reporting.
pub mod health_service;
/// Saved matches and career statistics.
pub mod history_service;
/// Live match setup and operator actions.
pub mod match_service;
/// Result links and published share tokens.
pub mod share_service;
