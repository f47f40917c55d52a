use crate::cli::{self, OutputType, ReportFormat};
use anyhow::Context;
use std::path::{Path, PathBuf};
use userjs::{
    detect_drift, effective, filter_section, find_profile_path, install_user_js, lint,
    list_profiles as list_profiles_impl, parse_user_js, parse_user_js_file, prefs_js_path,
    query_preferences, write_prefs_file, DriftStatus, InstallOptions, InstallOutcome, LintConfig,
    LintReport, PrefEntry, PrefsFile, WriteOptions, BUNDLED_USER_JS,
};

/// Source text plus a label for messages
struct Source {
    label: String,
    content: String,
}

fn load_source(file: Option<&Path>) -> anyhow::Result<Source> {
    match file {
        Some(path) => {
            let content = std::fs::read_to_string(path).with_context(|| {
                format!(
                    "Failed to read {}. Make sure the file exists and is readable.",
                    path.display()
                )
            })?;
            Ok(Source {
                label: path.display().to_string(),
                content,
            })
        }
        None => Ok(Source {
            label: "<bundled user.js>".to_string(),
            content: BUNDLED_USER_JS.to_string(),
        }),
    }
}

fn parse_source(source: &Source) -> anyhow::Result<PrefsFile> {
    parse_user_js(&source.content).with_context(|| {
        format!(
            "Failed to parse {}. Run 'userjs check' on it for details.",
            source.label
        )
    })
}

/// Lint a file and print the diagnostics
pub fn check(
    file: Option<&Path>,
    deny_warnings: bool,
    strict_types: bool,
    override_sections: Vec<String>,
    output: ReportFormat,
) -> anyhow::Result<()> {
    let source = load_source(file)?;

    let mut config = LintConfig {
        flag_bool_like_integers: strict_types,
        ..LintConfig::default()
    };
    if !override_sections.is_empty() {
        config.override_sections = override_sections;
    }

    let report = match parse_user_js(&source.content) {
        Ok(parsed) => lint(&parsed, &config).context("Invalid --override-section pattern")?,
        Err(e) => LintReport::from_parse_error(&e),
    };

    match output {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => {
            for d in &report.diagnostics {
                println!(
                    "{}:{}: {}[{}] {}",
                    source.label, d.line, d.severity, d.rule, d.message
                );
            }
            println!(
                "{}: {} error(s), {} warning(s)",
                source.label,
                report.error_count(),
                report.warning_count()
            );
        }
    }

    if report.has_errors() {
        anyhow::bail!("{} has {} error(s)", source.label, report.error_count());
    }
    if deny_warnings && report.warning_count() > 0 {
        anyhow::bail!(
            "{} has {} warning(s) and --deny-warnings is set",
            source.label,
            report.warning_count()
        );
    }
    Ok(())
}

/// Print the effective preferences, optionally filtered
pub fn show(
    file: Option<&Path>,
    queries: &[String],
    section: Option<&str>,
    get: Option<&str>,
    output: OutputType,
) -> anyhow::Result<()> {
    let source = load_source(file)?;
    let mut prefs = effective(&parse_source(&source)?);

    // Handle --get mode: single preference retrieval with raw output
    if let Some(key) = get {
        let entry = prefs
            .iter()
            .find(|e| e.key == key)
            .ok_or_else(|| anyhow::anyhow!("Preference '{}' not found in {}", key, source.label))?;
        println!("{}", entry.value);
        return Ok(());
    }

    if let Some(name) = section {
        prefs = filter_section(&prefs, name);
    }
    if !queries.is_empty() {
        let patterns: Vec<&str> = queries.iter().map(String::as_str).collect();
        prefs = query_preferences(&prefs, &patterns).context("Failed to apply query")?;
    }

    print_entries(&prefs, output)
}

fn print_entries(prefs: &[PrefEntry], output: OutputType) -> anyhow::Result<()> {
    match output {
        OutputType::JsonObject => {
            let object: serde_json::Map<String, serde_json::Value> = prefs
                .iter()
                .map(|e| (e.key.clone(), e.value.to_json()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&object)?);
        }
        OutputType::JsonArray => println!("{}", serde_json::to_string_pretty(prefs)?),
        OutputType::Text => {
            for e in prefs {
                println!("{} = {}", e.key, userjs::format_value(&e.value));
            }
        }
    }
    Ok(())
}

/// Print the canonical form of a file
pub fn fmt(file: Option<&Path>, comments: bool, sections: bool, dedup: bool) -> anyhow::Result<()> {
    let source = load_source(file)?;
    let mut parsed = parse_source(&source)?;
    if dedup {
        parsed.entries = effective(&parsed);
    }
    let options = WriteOptions { comments, sections };
    print!("{}", write_prefs_file(&parsed, &options));
    Ok(())
}

/// List all available Firefox profiles
pub fn list_profiles(profiles_dir: Option<&Path>) -> anyhow::Result<()> {
    let profiles = list_profiles_impl(profiles_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to list profiles: {}. Make sure Firefox is installed or pass --profiles-dir.",
            e
        )
    })?;
    println!("{}", serde_json::to_string_pretty(&profiles)?);
    Ok(())
}

fn locate_profile(profile: &str, profiles_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    find_profile_path(profile, profiles_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to find profile '{}': {}.\nUse 'userjs profiles' to see available profiles.",
            profile,
            e
        )
    })
}

/// Install a user.js into a profile
pub fn install(
    profile: &str,
    profiles_dir: Option<&Path>,
    file: Option<&Path>,
    options: InstallOptions,
    force: bool,
) -> anyhow::Result<()> {
    let source = load_source(file)?;
    let parsed = parse_source(&source)?;

    let report = lint(&parsed, &LintConfig::default())?;
    if report.has_errors() && !force {
        for d in report
            .diagnostics
            .iter()
            .filter(|d| d.severity == userjs::Severity::Error)
        {
            eprintln!("{}:{}: {}", source.label, d.line, d.message);
        }
        anyhow::bail!(
            "Refusing to install {} with {} lint error(s); fix them or pass --force",
            source.label,
            report.error_count()
        );
    }

    let profile_path = locate_profile(profile, profiles_dir)?;
    let outcome = install_user_js(&profile_path, &source.content, &options)
        .with_context(|| format!("Failed to install into {}", profile_path.display()))?;

    let prefix = if options.dry_run { "[dry run] " } else { "" };
    match outcome {
        InstallOutcome::Created { path } => println!("{}Created {}", prefix, path.display()),
        InstallOutcome::Replaced { path, backup } => {
            println!("{}Replaced {}", prefix, path.display());
            if let Some(backup) = backup {
                println!("{}Previous file saved as {}", prefix, backup.display());
            }
        }
        InstallOutcome::Unchanged { path } => println!("{} is already up to date", path.display()),
    }
    if !options.dry_run {
        println!("Restart Firefox for the overrides to take effect.");
    }
    Ok(())
}

/// Compare a user.js with the live prefs.js of a profile
pub fn drift(
    profile: &str,
    profiles_dir: Option<&Path>,
    file: Option<&Path>,
    all: bool,
    output: ReportFormat,
) -> anyhow::Result<()> {
    let source = load_source(file)?;
    let overrides = parse_source(&source)?;

    let profile_path = locate_profile(profile, profiles_dir)?;
    let prefs_path = prefs_js_path(&profile_path);
    let live = parse_user_js_file(&prefs_path).with_context(|| {
        format!(
            "Failed to read prefs.js at {}. Has Firefox been started with this profile?",
            prefs_path.display()
        )
    })?;

    let report = detect_drift(&overrides.entries, &live.entries);

    match output {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => {
            for entry in &report.entries {
                if !all && entry.status != DriftStatus::Pending {
                    continue;
                }
                let live = entry
                    .live
                    .as_ref()
                    .map(userjs::format_value)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<8} {} = {} (live: {})",
                    format!("{:?}", entry.status).to_lowercase(),
                    entry.key,
                    userjs::format_value(&entry.expected),
                    live
                );
            }
            println!(
                "{} applied, {} pending until restart, {} not in prefs.js",
                report.count(DriftStatus::Applied),
                report.count(DriftStatus::Pending),
                report.count(DriftStatus::Absent)
            );
        }
    }
    Ok(())
}

/// Dispatch a parsed command line
pub fn run(command: cli::Commands) -> anyhow::Result<()> {
    use cli::Commands;

    match command {
        Commands::Check {
            file,
            deny_warnings,
            strict_types,
            override_sections,
            output,
        } => check(
            file.as_deref(),
            deny_warnings,
            strict_types,
            override_sections,
            output,
        ),
        Commands::Show {
            file,
            queries,
            section,
            get,
            output,
        } => show(
            file.as_deref(),
            &queries,
            section.as_deref(),
            get.as_deref(),
            output,
        ),
        Commands::Fmt {
            file,
            comments,
            sections,
            dedup,
        } => fmt(file.as_deref(), comments, sections, dedup),
        Commands::Profiles { profiles_dir } => list_profiles(profiles_dir.as_deref()),
        Commands::Install {
            profile,
            profiles_dir,
            file,
            no_backup,
            dry_run,
            force,
        } => install(
            &profile,
            profiles_dir.as_deref(),
            file.as_deref(),
            InstallOptions {
                backup: !no_backup,
                dry_run,
            },
            force,
        ),
        Commands::Drift {
            profile,
            profiles_dir,
            file,
            all,
            output,
        } => drift(
            &profile,
            profiles_dir.as_deref(),
            file.as_deref(),
            all,
            output,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn conflicting() -> PathBuf {
        Path::new("tests/fixtures/conflicting.js").to_path_buf()
    }

    fn profiles_root() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("profiles.ini"),
            "[Profile0]\nName=default\nIsRelative=1\nPath=Profiles/abcd.default\nDefault=1\n",
        )
        .unwrap();
        let profile = dir.path().join("Profiles/abcd.default");
        fs::create_dir_all(&profile).unwrap();
        (dir, profile)
    }

    #[test]
    fn test_check_fails_on_errors() {
        let result = check(
            Some(conflicting().as_path()),
            false,
            false,
            Vec::new(),
            ReportFormat::Text,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_check_bundled_passes_with_deny_warnings() {
        check(None, true, false, Vec::new(), ReportFormat::Json).unwrap();
    }

    #[test]
    fn test_deny_warnings_fails_on_redundant_duplicate() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("user.js");
        fs::write(
            &file,
            "user_pref(\"browser.ml.enable\", false);\nuser_pref(\"browser.ml.enable\", false);\n",
        )
        .unwrap();

        check(Some(file.as_path()), false, false, Vec::new(), ReportFormat::Text).unwrap();
        let err =
            check(Some(file.as_path()), true, false, Vec::new(), ReportFormat::Text).unwrap_err();
        assert!(err.to_string().contains("--deny-warnings"));
    }

    #[test]
    fn test_install_refuses_lint_errors() {
        let (root, profile) = profiles_root();
        let err = install(
            "default",
            Some(root.path()),
            Some(conflicting().as_path()),
            InstallOptions::default(),
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(!profile.join("user.js").exists());
    }

    #[test]
    fn test_install_with_force() {
        let (root, profile) = profiles_root();
        install(
            "default",
            Some(root.path()),
            Some(conflicting().as_path()),
            InstallOptions::default(),
            true,
        )
        .unwrap();
        assert_eq!(
            fs::read_to_string(profile.join("user.js")).unwrap(),
            fs::read_to_string(conflicting()).unwrap()
        );
    }

    #[test]
    fn test_install_dry_run_writes_nothing() {
        let (root, profile) = profiles_root();
        let options = InstallOptions {
            dry_run: true,
            ..InstallOptions::default()
        };
        install("default", Some(root.path()), None, options, false).unwrap();
        assert!(!profile.join("user.js").exists());
    }
}
