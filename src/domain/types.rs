//! Shared domain enumerations aligned with persisted database enums.

use serde::{Deserialize, Serialize};

/// Module namespaces used to scope settings, tags and search index entries.
pub mod modules {
    pub const BLOG: &str = "blog";
    pub const CORE: &str = "core";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "publication_status", rename_all = "snake_case")]
pub enum PublicationStatus {
    Active,
    Draft,
}

impl PublicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PublicationStatus::Active => "active",
            PublicationStatus::Draft => "draft",
        }
    }

    /// Coerce a raw submission value. Anything other than exactly `draft`
    /// becomes `active`.
    pub fn from_submission(raw: Option<&str>) -> Self {
        match raw {
            Some("draft") => PublicationStatus::Draft,
            _ => PublicationStatus::Active,
        }
    }
}

/// A single module setting. Settings are a flat per-module key/value store
/// with no relational structure; callers supply defaults for absent keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Int(i64::from(value))
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}
