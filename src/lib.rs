//! # userjs - curated Firefox preference overrides
//!
//! This crate ships a curated `user.js` (cache sizing, connection limits,
//! tracking protection, telemetry opt-outs, UI annoyance removal) together
//! with the tooling to keep such a file honest: a parser for the preference
//! file format, a linter, a canonical writer, and an installer that drops the
//! file into a Firefox profile.
//!
//! The browser itself decides what each preference means. Everything here is
//! about the file: is it well formed, are keys unique, does the text round
//! trip, and is it in the right place.
//!
//! ## Quick Start
//!
//! ### Parsing
//!
//! ```rust
//! use userjs::{parse_user_js, PrefType, PrefValue};
//!
//! let content = r#"
//!     /** DISK CACHE ***/
//!     user_pref("browser.cache.disk.enable", false); // RAM only
//! "#;
//!
//! let file = parse_user_js(content)?;
//! let entry = &file.entries[0];
//! assert_eq!(entry.key, "browser.cache.disk.enable");
//! assert_eq!(entry.value, PrefValue::Bool(false));
//! assert_eq!(entry.pref_type, PrefType::User);
//! # Ok::<(), userjs::Error>(())
//! ```
//!
//! ### Linting
//!
//! ```rust
//! use userjs::{lint, parse_user_js, LintConfig, Rule};
//!
//! let file = parse_user_js(r#"
//!     user_pref("a.b", 1);
//!     user_pref("a.b", 2);
//! "#)?;
//!
//! let report = lint(&file, &LintConfig::default())?;
//! assert!(report.has_errors());
//! assert_eq!(report.diagnostics[0].rule, Rule::DuplicateConflict);
//! # Ok::<(), userjs::Error>(())
//! ```
//!
//! ### The bundled list
//!
//! ```rust
//! use userjs::{bundled, effective};
//!
//! let file = bundled()?;
//! println!("{} overrides in {} sections", effective(&file).len(), file.sections.len());
//! # Ok::<(), userjs::Error>(())
//! ```
//!
//! ### Installing into a profile
//!
//! ```rust,no_run
//! use userjs::{find_profile_path, install_user_js, InstallOptions, BUNDLED_USER_JS};
//!
//! let profile = find_profile_path("default", None)?;
//! install_user_js(&profile, BUNDLED_USER_JS, &InstallOptions::default())?;
//! # Ok::<(), userjs::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All functions return [`Result<T, Error>`]. Syntax problems carry a
//! position:
//!
//! ```rust
//! use userjs::{parse_user_js, Error};
//!
//! match parse_user_js("user_pref(\"a.b\", 1)") {
//!     Err(Error::Parser { line, column, message }) => {
//!         eprintln!("{}:{}: {}", line, column, message);
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```
//!
//! ## See Also
//!
//! - [about:config](https://support.mozilla.org/en-US/kb/about-config-editor-firefox)
//! - [prefs.js grammar](https://searchfox.org/mozilla-central/source/modules/libpref/parser/src/lib.rs)

pub use types::{PrefEntry, PrefType, PrefValue, PrefValueExt, PrefsFile, ValueKind};

pub use error::{Error, Result};

pub use bundled::{bundled, BUNDLED_USER_JS};
pub use drift::{detect_drift, DriftEntry, DriftReport, DriftStatus};
pub use install::{install_user_js, InstallOptions, InstallOutcome};
pub use lint::{is_valid_pref_name, lint, Diagnostic, LintConfig, LintReport, Rule, Severity};
pub use merge::{effective, effective_entries};
pub use parser::{parse_user_js, parse_user_js_file};
pub use profile::{
    find_profile_path, get_profiles_directory, list_profiles, prefs_js_path, user_js_path,
    ProfileInfo, PROFILES_DIR_ENV,
};
pub use query::{filter_section, query_preferences};
pub use writer::{format_entry, format_value, write_prefs_file, write_user_js, WriteOptions};

// All modules are private - use re-exports above for public API
mod bundled;
mod drift;
mod error;
mod install;
mod lexer;
mod lint;
mod merge;
mod parser;
mod profile;
mod query;
mod types;
mod writer;
