//! Install the bundled user.js into a Firefox profile
//!
//! Defaults to a dry run. Pass `--write` to actually install.
//!
//! Run with: cargo run --example install_profile [profile] [--write]

use std::env;
use userjs::{find_profile_path, install_user_js, InstallOptions, BUNDLED_USER_JS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let write = args.iter().any(|a| a == "--write");
    let profile = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(String::as_str)
        .unwrap_or("default");

    let profile_path = match find_profile_path(profile, None) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Could not find profile '{}': {}", profile, e);
            eprintln!("Set MOZ_PROFILES_DIR if Firefox keeps its profiles elsewhere.");
            return Ok(());
        }
    };
    println!("Profile: {}", profile_path.display());

    let options = InstallOptions {
        dry_run: !write,
        ..InstallOptions::default()
    };
    let outcome = install_user_js(&profile_path, BUNDLED_USER_JS, &options)?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if !write {
        println!("Dry run only; pass --write to install.");
    }
    Ok(())
}
