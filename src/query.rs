use crate::error::{Error, Result};
use crate::types::PrefEntry;
use glob::Pattern;

/// Query preferences by glob patterns (OR logic)
/// Returns entries whose key matches any of the provided patterns
pub fn query_preferences(entries: &[PrefEntry], patterns: &[&str]) -> Result<Vec<PrefEntry>> {
    // Compile all patterns first to fail fast on invalid patterns
    let compiled_patterns: Vec<Pattern> = patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::InvalidGlobPattern(format!("'{}': {}", p, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(entries
        .iter()
        .filter(|entry| compiled_patterns.iter().any(|p| p.matches(&entry.key)))
        .cloned()
        .collect())
}

/// Keep entries whose section starts with `name`, ignoring case
///
/// `"fastfox"` matches a section titled `FASTFOX (Speed tweaks)`.
pub fn filter_section(entries: &[PrefEntry], name: &str) -> Vec<PrefEntry> {
    let wanted = name.trim().to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            entry
                .section
                .as_deref()
                .is_some_and(|section| section.to_lowercase().starts_with(&wanted))
        })
        .cloned()
        .collect()
}
