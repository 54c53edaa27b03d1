//! Alert structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Auto-dismiss delay used when none is given
pub const DEFAULT_ALERT_TIMEOUT_MS: u64 = 6000;

/// Visual category of an alert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    #[default]
    Info,
    Light,
    Dark,
}

impl AlertKind {
    /// Resolve a kind by name, falling back to `Info` for anything unknown
    pub fn resolve(name: &str) -> Self {
        match name {
            "primary" => Self::Primary,
            "secondary" => Self::Secondary,
            "success" => Self::Success,
            "danger" => Self::Danger,
            "warning" => Self::Warning,
            "light" => Self::Light,
            "dark" => Self::Dark,
            _ => Self::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Display options for a new alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertOptions {
    pub auto_hide: bool,
    /// Milliseconds before auto-dismissal; `None` uses the default
    pub timeout_ms: Option<u64>,
}

impl AlertOptions {
    /// Keep the alert until it is dismissed explicitly
    pub fn sticky() -> Self {
        Self {
            auto_hide: false,
            timeout_ms: None,
        }
    }

    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            auto_hide: true,
            timeout_ms: Some(timeout_ms),
        }
    }

    pub fn resolved_timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_ALERT_TIMEOUT_MS)
    }
}

impl Default for AlertOptions {
    fn default() -> Self {
        Self {
            auto_hide: true,
            timeout_ms: None,
        }
    }
}

/// A user-facing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub auto_hide: bool,
    pub timeout_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_kinds() {
        for name in [
            "primary", "secondary", "success", "danger", "warning", "info", "light", "dark",
        ] {
            assert_eq!(AlertKind::resolve(name).as_str(), name);
        }
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_info() {
        assert_eq!(AlertKind::resolve("critical"), AlertKind::Info);
        assert_eq!(AlertKind::resolve(""), AlertKind::Info);
        assert_eq!(AlertKind::resolve("Warning"), AlertKind::Info);
    }

    #[test]
    fn test_default_options() {
        let options = AlertOptions::default();
        assert!(options.auto_hide);
        assert_eq!(options.resolved_timeout_ms(), 6000);
        assert_eq!(AlertOptions::with_timeout(250).resolved_timeout_ms(), 250);
        assert!(!AlertOptions::sticky().auto_hide);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&AlertKind::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
