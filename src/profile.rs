//! Firefox profile discovery
//!
//! A user.js only takes effect inside a profile directory. This module finds
//! those directories through `profiles.ini`, falling back to scanning the
//! profiles root.

use crate::error::{Error, Result};
use configparser::ini::Ini;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the profiles root
pub const PROFILES_DIR_ENV: &str = "MOZ_PROFILES_DIR";

/// Profile information parsed from profiles.ini
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileInfo {
    pub name: String,
    /// Path as written in profiles.ini
    pub path: PathBuf,
    pub is_relative: bool,
    pub is_default: bool,
    /// Install section (Firefox 67+) that uses this profile as its default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_to_install: Option<String>,
}

impl ProfileInfo {
    /// Absolute directory of this profile
    pub fn resolve(&self, profiles_dir: &Path) -> PathBuf {
        if self.is_relative {
            profiles_dir.join(&self.path)
        } else {
            self.path.clone()
        }
    }
}

/// Parsed profiles.ini
#[derive(Debug, Default)]
struct ProfilesIni {
    profiles: Vec<ProfileInfo>,
    /// (install section name, default profile path)
    installs: Vec<(String, String)>,
}

fn read_profiles_ini(ini_path: &Path) -> Result<ProfilesIni> {
    let content = std::fs::read_to_string(ini_path)?;
    parse_profiles_ini(&content)
}

fn parse_profiles_ini(content: &str) -> Result<ProfilesIni> {
    let mut ini = Ini::new();
    // configparser handles a UTF-8 BOM and lowercases section names
    ini.read(content.to_string())
        .map_err(Error::ProfilesIniParse)?;

    // Section order is not preserved by configparser
    let mut sections = ini.sections();
    sections.sort();

    let mut parsed = ProfilesIni::default();
    for section in sections {
        let lower = section.to_lowercase();
        if lower.starts_with("profile") {
            let name = ini.get(&section, "Name").unwrap_or_default();
            let path = ini.get(&section, "Path").unwrap_or_default();
            if name.is_empty() || path.is_empty() {
                tracing::warn!(section = %section, "skipping incomplete profile section");
                continue;
            }
            let is_relative = ini.getuint(&section, "IsRelative").ok().flatten().unwrap_or(1) == 1;
            let is_default = ini.getuint(&section, "Default").ok().flatten().unwrap_or(0) == 1;
            parsed.profiles.push(ProfileInfo {
                name,
                path: PathBuf::from(path),
                is_relative,
                is_default,
                locked_to_install: None,
            });
        } else if lower != "general" && lower != "backgroundtasksprofiles" {
            // Install sections are named by a hash of the install directory
            if let Some(default_path) = ini.get(&section, "Default") {
                parsed.installs.push((section, default_path));
            }
        }
    }

    for profile in &mut parsed.profiles {
        let path = profile.path.to_string_lossy();
        profile.locked_to_install = parsed
            .installs
            .iter()
            .find(|(_, default_path)| *default_path == path)
            .map(|(hash, _)| hash.to_uppercase());
    }

    Ok(parsed)
}

/// Get the profiles directory from an explicit path, the env var, or the OS default
///
/// Priority:
/// 1. Manual path provided via CLI or parameter
/// 2. `MOZ_PROFILES_DIR` environment variable
/// 3. Auto-detection based on OS
pub fn get_profiles_directory(manual_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = manual_path {
        return validate_profiles_dir(path);
    }

    // An empty value counts as unset
    if let Some(env_path) = std::env::var(PROFILES_DIR_ENV).ok().filter(|v| !v.is_empty()) {
        tracing::debug!(path = %env_path, "using {}", PROFILES_DIR_ENV);
        return validate_profiles_dir(Path::new(&env_path));
    }

    let detected = auto_detect_profiles_directory()?;
    validate_profiles_dir(&detected)
}

fn validate_profiles_dir(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(Error::InvalidProfileDirectory(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

fn auto_detect_profiles_directory() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA")
            .map_err(|_| Error::InvalidProfileDirectory(PathBuf::from("%APPDATA%")))?;
        Ok(PathBuf::from(appdata).join("Mozilla").join("Firefox"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME")
            .map_err(|_| Error::InvalidProfileDirectory(PathBuf::from("$HOME")))?;
        let home = PathBuf::from(home);
        if cfg!(target_os = "macos") {
            Ok(home.join("Library/Application Support/Firefox"))
        } else {
            Ok(home.join(".mozilla/firefox"))
        }
    }
}

/// List all profiles registered in profiles.ini
pub fn list_profiles(profiles_dir_opt: Option<&Path>) -> Result<Vec<ProfileInfo>> {
    let profiles_dir = get_profiles_directory(profiles_dir_opt)?;
    let ini_path = profiles_dir.join("profiles.ini");
    if !ini_path.exists() {
        return Err(Error::ProfilesIniParse(format!(
            "profiles.ini not found at {}",
            ini_path.display()
        )));
    }
    Ok(read_profiles_ini(&ini_path)?.profiles)
}

/// Find a profile directory by name
///
/// Tries, in order: an exact `Name=` match in profiles.ini; for `"default"`,
/// the install section's default profile and then the `Default=1` profile;
/// finally a directory named `name` or `*.name` under the profiles root.
pub fn find_profile_path(profile_name: &str, profiles_dir_opt: Option<&Path>) -> Result<PathBuf> {
    let profiles_dir = get_profiles_directory(profiles_dir_opt)?;
    let ini_path = profiles_dir.join("profiles.ini");

    if ini_path.exists() {
        match read_profiles_ini(&ini_path) {
            Ok(ini) => {
                if let Some(path) = resolve_from_ini(&ini, &profiles_dir, profile_name) {
                    return Ok(path);
                }
            }
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable profiles.ini"),
        }
    }

    scan_profiles_directory(&profiles_dir, profile_name)
}

fn resolve_from_ini(ini: &ProfilesIni, profiles_dir: &Path, name: &str) -> Option<PathBuf> {
    let existing = |p: PathBuf| if p.is_dir() { Some(p) } else { None };

    if let Some(profile) = ini.profiles.iter().find(|p| p.name == name) {
        if let Some(path) = existing(profile.resolve(profiles_dir)) {
            return Some(path);
        }
    }

    if name != "default" {
        return None;
    }

    // Firefox 67+ keeps the real default per install
    for (_, default_path) in &ini.installs {
        let candidate = PathBuf::from(default_path);
        let full = if candidate.is_absolute() {
            candidate
        } else {
            profiles_dir.join(candidate)
        };
        if let Some(path) = existing(full) {
            return Some(path);
        }
    }

    ini.profiles
        .iter()
        .find(|p| p.is_default)
        .and_then(|p| existing(p.resolve(profiles_dir)))
}

fn scan_profiles_directory(profiles_dir: &Path, profile_name: &str) -> Result<PathBuf> {
    let mut matches: Vec<PathBuf> = Vec::new();
    let suffix = format!(".{}", profile_name);

    for root in [profiles_dir.to_path_buf(), profiles_dir.join("Profiles")] {
        let Ok(entries) = std::fs::read_dir(&root) else {
            continue;
        };
        for entry in entries {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let dir_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
            if dir_name == profile_name {
                return Ok(path);
            }
            if dir_name.ends_with(&suffix) {
                matches.push(path);
            }
        }
    }

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(Error::ProfileNotFound {
            name: profile_name.to_string(),
            directory: profiles_dir.to_path_buf(),
        }),
        _ => {
            let names: Vec<String> = matches
                .iter()
                .filter_map(|p| p.file_name().map(|s| s.to_string_lossy().into_owned()))
                .collect();
            Err(Error::ProfileNotFound {
                name: format!(
                    "{} (ambiguous: {}; use the full directory name)",
                    profile_name,
                    names.join(", ")
                ),
                directory: profiles_dir.to_path_buf(),
            })
        }
    }
}

/// Path of user.js inside a profile
pub fn user_js_path(profile_path: &Path) -> PathBuf {
    profile_path.join("user.js")
}

/// Path of the live preference store inside a profile
pub fn prefs_js_path(profile_path: &Path) -> PathBuf {
    profile_path.join("prefs.js")
}
