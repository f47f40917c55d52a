//! Core data types for preference overrides

use serde::Serialize;
use std::fmt;

/// A literal preference value as accepted by the browser's user.js loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

/// Type tag of a [`PrefValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    Integer,
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::String => "string",
        };
        f.write_str(name)
    }
}

impl PrefValue {
    /// Type tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            PrefValue::Bool(_) => ValueKind::Bool,
            PrefValue::Integer(_) => ValueKind::Integer,
            PrefValue::String(_) => ValueKind::String,
        }
    }

    /// Convert to a `serde_json::Value` for JSON output
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PrefValue::Bool(b) => serde_json::Value::Bool(*b),
            PrefValue::Integer(n) => serde_json::Value::Number((*n).into()),
            PrefValue::String(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for PrefValue {
    /// Human-readable form (strings unquoted); see `writer::format_value` for the literal
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefValue::Bool(b) => write!(f, "{}", b),
            PrefValue::Integer(n) => write!(f, "{}", n),
            PrefValue::String(s) => f.write_str(s),
        }
    }
}

/// Convenience accessors for [`PrefValue`]
pub trait PrefValueExt {
    fn as_bool(&self) -> Option<bool>;
    fn as_i64(&self) -> Option<i64>;
    fn as_str(&self) -> Option<&str>;
    fn is_bool(&self) -> bool;
    fn is_integer(&self) -> bool;
    fn is_string(&self) -> bool;
}

impl PrefValueExt for PrefValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            PrefValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn is_bool(&self) -> bool {
        matches!(self, PrefValue::Bool(_))
    }

    fn is_integer(&self) -> bool {
        matches!(self, PrefValue::Integer(_))
    }

    fn is_string(&self) -> bool {
        matches!(self, PrefValue::String(_))
    }
}

/// The directive a statement was written with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefType {
    /// `user_pref(...)`
    User,
    /// `pref(...)`
    Default,
    /// `lock_pref(...)`
    Locked,
    /// `sticky_pref(...)`
    Sticky,
}

impl PrefType {
    /// Directive name as written in the file
    pub fn directive(&self) -> &'static str {
        match self {
            PrefType::User => "user_pref",
            PrefType::Default => "pref",
            PrefType::Locked => "lock_pref",
            PrefType::Sticky => "sticky_pref",
        }
    }

    pub(crate) fn from_directive(name: &str) -> Option<Self> {
        match name {
            "user_pref" => Some(PrefType::User),
            "pref" => Some(PrefType::Default),
            "lock_pref" => Some(PrefType::Locked),
            "sticky_pref" => Some(PrefType::Sticky),
            _ => None,
        }
    }
}

/// A single preference override
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefEntry {
    /// Dotted preference name, e.g. `browser.cache.disk.enable`
    pub key: String,
    pub value: PrefValue,
    pub pref_type: PrefType,
    /// Trailing `//` rationale on the same line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Enclosing `SECTION:` heading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Enclosing `/** GROUP ***/` heading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// 1-based line of the directive
    pub line: usize,
}

impl PrefEntry {
    /// Build a bare `user_pref` entry with no metadata
    pub fn user(key: impl Into<String>, value: PrefValue) -> Self {
        PrefEntry {
            key: key.into(),
            value,
            pref_type: PrefType::User,
            comment: None,
            section: None,
            group: None,
            line: 0,
        }
    }
}

/// A parsed user.js file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrefsFile {
    /// Entries in file order, duplicates included
    pub entries: Vec<PrefEntry>,
    /// Section names in the order they were opened
    pub sections: Vec<String>,
}

impl PrefsFile {
    /// Last value assigned to `key`, if any
    pub fn get(&self, key: &str) -> Option<&PrefValue> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }
}
