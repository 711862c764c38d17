//! Data models: raw messages, extracted fields, transactions, configuration.

pub mod config;
pub mod fields;
pub mod message;
pub mod transaction;
