//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "linkwatch".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_poll_timeout() -> u64 {
    30
}

pub fn default_backlog_per_chat() -> usize {
    50
}

pub fn default_restart_delay() -> u64 {
    5
}

pub fn default_recent_updates() -> usize {
    3
}

pub fn default_update_preview_chars() -> usize {
    100
}

pub fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_api_port() -> u16 {
    3000
}
