//! Installing a user.js into a profile directory
//!
//! The content is validated first, any different existing user.js is backed
//! up, and the new file is written through a temp file in the same directory
//! so a crash never leaves a half-written user.js behind.

use crate::error::{Error, Result};
use crate::parser::parse_user_js;
use crate::profile::user_js_path;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Installation options
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Keep a copy of a differing existing user.js as `user.js.bak`
    pub backup: bool,
    /// Report the outcome without touching the filesystem
    pub dry_run: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            backup: true,
            dry_run: false,
        }
    }
}

/// What [`install_user_js`] did (or would do, for a dry run)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum InstallOutcome {
    /// No user.js existed before
    Created { path: PathBuf },
    /// An existing user.js was replaced
    Replaced {
        path: PathBuf,
        #[serde(skip_serializing_if = "Option::is_none")]
        backup: Option<PathBuf>,
    },
    /// The existing user.js already had this content
    Unchanged { path: PathBuf },
}

/// Write `content` as the profile's user.js
///
/// # Example
///
/// ```rust,no_run
/// use userjs::{find_profile_path, install_user_js, InstallOptions, BUNDLED_USER_JS};
///
/// let profile = find_profile_path("default-release", None)?;
/// let outcome = install_user_js(&profile, BUNDLED_USER_JS, &InstallOptions::default())?;
/// println!("{:?}", outcome);
/// # Ok::<(), userjs::Error>(())
/// ```
pub fn install_user_js(
    profile_dir: &Path,
    content: &str,
    options: &InstallOptions,
) -> Result<InstallOutcome> {
    if !profile_dir.is_dir() {
        return Err(Error::InvalidProfileDirectory(profile_dir.to_path_buf()));
    }

    // Refuse content the browser would choke on
    let parsed = parse_user_js(content)?;
    tracing::debug!(entries = parsed.entries.len(), "validated user.js content");

    let target = user_js_path(profile_dir);
    let existing = match std::fs::read_to_string(&target) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let outcome = match &existing {
        Some(text) if text == content => {
            return Ok(InstallOutcome::Unchanged { path: target });
        }
        Some(_) => InstallOutcome::Replaced {
            path: target.clone(),
            backup: options.backup.then(|| backup_path(&target)),
        },
        None => InstallOutcome::Created {
            path: target.clone(),
        },
    };

    if options.dry_run {
        tracing::info!(path = %target.display(), "dry run, nothing written");
        return Ok(outcome);
    }

    if let InstallOutcome::Replaced {
        backup: Some(backup),
        ..
    } = &outcome
    {
        std::fs::copy(&target, backup).map_err(|e| Error::Install {
            path: target.clone(),
            message: format!("backup to {} failed: {}", backup.display(), e),
        })?;
        tracing::info!(backup = %backup.display(), "backed up existing user.js");
    }

    write_atomically(profile_dir, &target, content)?;
    tracing::info!(path = %target.display(), "installed user.js");
    Ok(outcome)
}

fn backup_path(target: &Path) -> PathBuf {
    target.with_extension("js.bak")
}

fn write_atomically(dir: &Path, target: &Path, content: &str) -> Result<()> {
    let install_err = |message: String| Error::Install {
        path: target.to_path_buf(),
        message,
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    // Temp files are created owner-only; a replaced user.js keeps its mode
    if let Ok(metadata) = std::fs::metadata(target) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    tmp.persist(target)
        .map_err(|e| install_err(format!("could not move temp file into place: {}", e.error)))?;
    Ok(())
}
