//! # linkwatch-channels
//!
//! Messaging platform integrations for linkwatch.

pub mod telegram;
pub mod utils;
