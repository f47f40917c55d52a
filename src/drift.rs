//! Drift between a user.js and the live preference store
//!
//! While the browser runs, about:config changes land in the profile's
//! `prefs.js`. The user.js values are only reasserted at the next start, so
//! the two can disagree in between. This module reports where.

use crate::merge::effective_entries;
use crate::types::{PrefEntry, PrefValue};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftStatus {
    /// Live value equals the override
    Applied,
    /// Live value differs; the override wins again at next restart
    Pending,
    /// Not persisted in prefs.js, usually because it equals the built-in default
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftEntry {
    pub key: String,
    pub status: DriftStatus,
    pub expected: PrefValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<PrefValue>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DriftReport {
    pub entries: Vec<DriftEntry>,
}

impl DriftReport {
    pub fn count(&self, status: DriftStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Entries whose live value disagrees with the override
    pub fn pending(&self) -> impl Iterator<Item = &DriftEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == DriftStatus::Pending)
    }
}

/// Classify every effective override against the live preferences
///
/// # Example
///
/// ```rust
/// use userjs::{detect_drift, parse_user_js, DriftStatus};
///
/// let overrides = parse_user_js(r#"user_pref("browser.ml.enable", false);"#)?;
/// let live = parse_user_js(r#"user_pref("browser.ml.enable", true);"#)?;
///
/// let report = detect_drift(&overrides.entries, &live.entries);
/// assert_eq!(report.entries[0].status, DriftStatus::Pending);
/// # Ok::<(), userjs::Error>(())
/// ```
pub fn detect_drift(overrides: &[PrefEntry], live: &[PrefEntry]) -> DriftReport {
    let live_values: HashMap<&str, &PrefValue> =
        live.iter().map(|e| (e.key.as_str(), &e.value)).collect();

    let entries = effective_entries(overrides)
        .into_iter()
        .map(|entry| {
            let live = live_values.get(entry.key.as_str()).map(|v| (*v).clone());
            let status = match &live {
                Some(value) if *value == entry.value => DriftStatus::Applied,
                Some(_) => DriftStatus::Pending,
                None => DriftStatus::Absent,
            };
            DriftEntry {
                key: entry.key,
                status,
                expected: entry.value,
                live,
            }
        })
        .collect();

    let report = DriftReport { entries };
    tracing::debug!(
        applied = report.count(DriftStatus::Applied),
        pending = report.count(DriftStatus::Pending),
        absent = report.count(DriftStatus::Absent),
        "drift computed"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let overrides = vec![
            PrefEntry::user("a.applied", PrefValue::Bool(false)),
            PrefEntry::user("a.pending", PrefValue::Integer(10)),
            PrefEntry::user("a.absent", PrefValue::String("x".into())),
        ];
        let live = vec![
            PrefEntry::user("a.applied", PrefValue::Bool(false)),
            PrefEntry::user("a.pending", PrefValue::Integer(4)),
            PrefEntry::user("unrelated", PrefValue::Integer(1)),
        ];

        let report = detect_drift(&overrides, &live);
        let statuses: Vec<_> = report.entries.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                DriftStatus::Applied,
                DriftStatus::Pending,
                DriftStatus::Absent
            ]
        );
        assert_eq!(report.entries[1].live, Some(PrefValue::Integer(4)));
        assert_eq!(report.pending().count(), 1);
    }

    #[test]
    fn test_uses_effective_override_value() {
        let overrides = vec![
            PrefEntry::user("a.b", PrefValue::Integer(1)),
            PrefEntry::user("a.b", PrefValue::Integer(2)),
        ];
        let live = vec![PrefEntry::user("a.b", PrefValue::Integer(2))];
        let report = detect_drift(&overrides, &live);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].status, DriftStatus::Applied);
    }

    #[test]
    fn test_type_change_is_pending() {
        let overrides = vec![PrefEntry::user("a.b", PrefValue::Integer(1))];
        let live = vec![PrefEntry::user("a.b", PrefValue::Bool(true))];
        assert_eq!(
            detect_drift(&overrides, &live).entries[0].status,
            DriftStatus::Pending
        );
    }
}
