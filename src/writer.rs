//! Canonical serialization of preference entries
//!
//! Output is one statement per line in the form the browser writes itself:
//! `user_pref("name", value);`. Parsing a canonical file and writing it back
//! reproduces it byte for byte.

use crate::types::{PrefEntry, PrefValue, PrefsFile};
use std::fmt::Write as _;

/// Controls what [`write_user_js`] emits besides the statements
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Append each entry's rationale as a trailing `// comment`
    pub comments: bool,
    /// Emit section banners and group headings when they change
    pub sections: bool,
}

/// Render a value as a user.js literal
///
/// # Example
///
/// ```rust
/// use userjs::{format_value, PrefValue};
///
/// assert_eq!(format_value(&PrefValue::Bool(true)), "true");
/// assert_eq!(format_value(&PrefValue::String("0 0".into())), "\"0 0\"");
/// ```
pub fn format_value(value: &PrefValue) -> String {
    match value {
        PrefValue::Bool(b) => b.to_string(),
        PrefValue::Integer(n) => n.to_string(),
        PrefValue::String(s) => quote(s),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render a single statement, optionally with its trailing comment
pub fn format_entry(entry: &PrefEntry, with_comment: bool) -> String {
    let mut line = format!(
        "{}({}, {});",
        entry.pref_type.directive(),
        quote(&entry.key),
        format_value(&entry.value)
    );
    if with_comment {
        if let Some(comment) = entry.comment.as_deref().filter(|c| !c.is_empty()) {
            line.push_str(" // ");
            line.push_str(comment);
        }
    }
    line
}

/// Serialize entries as a user.js document
///
/// # Example
///
/// ```rust
/// use userjs::{parse_user_js, write_user_js, WriteOptions};
///
/// let text = "user_pref(\"a.b\", true);\nuser_pref(\"c.d\", \"x\");\n";
/// let file = parse_user_js(text)?;
/// assert_eq!(write_user_js(&file.entries, &WriteOptions::default()), text);
/// # Ok::<(), userjs::Error>(())
/// ```
pub fn write_user_js(entries: &[PrefEntry], options: &WriteOptions) -> String {
    render(entries, &[], options)
}

/// Serialize a whole parsed file
///
/// Same as [`write_user_js`], except that with `options.sections` every
/// section of `file` gets its banner, including sections without entries
/// (such as an empty overrides area).
pub fn write_prefs_file(file: &PrefsFile, options: &WriteOptions) -> String {
    render(&file.entries, &file.sections, options)
}

fn banner(out: &mut String, text: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "/*** {} ***/", text);
}

fn render(entries: &[PrefEntry], sections: &[String], options: &WriteOptions) -> String {
    let mut out = String::new();
    let mut section: Option<&str> = None;
    let mut group: Option<&str> = None;
    // Banners for sections[..opened] are already written
    let mut opened = 0;

    for entry in entries {
        if options.sections {
            let entry_section = entry.section.as_deref();
            if entry_section != section {
                match entry_section {
                    Some(name) => {
                        if let Some(pos) = sections[opened..].iter().position(|s| s == name) {
                            for empty in &sections[opened..opened + pos] {
                                banner(&mut out, &format!("SECTION: {}", empty));
                            }
                            opened += pos + 1;
                        }
                        banner(&mut out, &format!("SECTION: {}", name));
                    }
                    None => {
                        if let Some(previous) = section {
                            banner(&mut out, &format!("END: {}", previous));
                        }
                    }
                }
                section = entry_section;
                group = None;
            }

            let entry_group = entry.group.as_deref();
            if entry_group != group {
                if let Some(name) = entry_group {
                    let _ = writeln!(out, "/** {} ***/", name);
                }
                group = entry_group;
            }
        }

        out.push_str(&format_entry(entry, options.comments));
        out.push('\n');
    }

    if options.sections {
        for empty in &sections[opened..] {
            banner(&mut out, &format!("SECTION: {}", empty));
            section = Some(empty.as_str());
        }
        if let Some(last) = section {
            banner(&mut out, &format!("END: {}", last));
        }
    }

    out
}
