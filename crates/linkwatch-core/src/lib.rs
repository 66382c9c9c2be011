//! # linkwatch-core
//!
//! Core types, traits, configuration, and error handling for linkwatch.

pub mod config;
pub mod error;
pub mod message;
pub mod traits;

/// Platform chat identifier (Telegram chat id).
pub type ChatId = i64;
