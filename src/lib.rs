//! Library crate for padel-tracker: live padel scoring, match analytics and shareable results.

pub mod analytics;
pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod services;
pub mod share;
pub mod state;
