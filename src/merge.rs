//! Effective preference set
//!
//! The browser applies a user.js top to bottom, so a key assigned twice ends
//! up with its last value. This module collapses a parsed file to what the
//! browser actually sees.

use crate::types::{PrefEntry, PrefsFile};
use std::collections::HashMap;

/// Collapse duplicates with last-write-wins semantics
///
/// Each key keeps the position of its first appearance and the entry
/// (value, comment, section) of its last.
///
/// # Example
///
/// ```rust
/// use userjs::{effective, parse_user_js, PrefValue};
///
/// let file = parse_user_js(r#"
///     user_pref("a.one", 1);
///     user_pref("a.two", 2);
///     user_pref("a.one", 3);
/// "#)?;
///
/// let prefs = effective(&file);
/// assert_eq!(prefs.len(), 2);
/// assert_eq!(prefs[0].key, "a.one");
/// assert_eq!(prefs[0].value, PrefValue::Integer(3));
/// # Ok::<(), userjs::Error>(())
/// ```
pub fn effective(file: &PrefsFile) -> Vec<PrefEntry> {
    effective_entries(&file.entries)
}

/// Same as [`effective`], over a plain slice of entries
pub fn effective_entries(entries: &[PrefEntry]) -> Vec<PrefEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut merged: Vec<PrefEntry> = Vec::new();

    for entry in entries {
        match index.get(entry.key.as_str()) {
            Some(&slot) => {
                tracing::trace!(key = %entry.key, line = entry.line, "later entry wins");
                merged[slot] = entry.clone();
            }
            None => {
                index.insert(entry.key.as_str(), merged.len());
                merged.push(entry.clone());
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrefValue;

    fn entry(key: &str, value: i64, line: usize) -> PrefEntry {
        PrefEntry {
            line,
            ..PrefEntry::user(key, PrefValue::Integer(value))
        }
    }

    #[test]
    fn test_last_write_wins_in_first_position() {
        let entries = vec![entry("a", 1, 1), entry("b", 2, 2), entry("a", 9, 3)];
        let merged = effective_entries(&entries);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].key, "a");
        assert_eq!(merged[0].value, PrefValue::Integer(9));
        assert_eq!(merged[0].line, 3);
        assert_eq!(merged[1].key, "b");
    }

    #[test]
    fn test_no_duplicates_is_identity() {
        let entries = vec![entry("a", 1, 1), entry("b", 2, 2)];
        assert_eq!(effective_entries(&entries), entries);
    }

    #[test]
    fn test_empty() {
        assert!(effective(&PrefsFile::default()).is_empty());
    }
}
