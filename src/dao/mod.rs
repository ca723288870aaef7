//! Persistence contracts and records.

/// Match and share token storage.
pub mod match_store;
/// Stored record definitions.
pub mod models;
/// Storage abstraction layer errors.
pub mod storage;
