//! Lint the bundled user.js, or a file given on the command line
//!
//! Run with: cargo run --example lint_bundled [path/to/user.js]

use std::env;
use userjs::{lint, parse_user_js, LintConfig, BUNDLED_USER_JS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let content = match args.get(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => BUNDLED_USER_JS.to_string(),
    };

    let file = parse_user_js(&content)?;
    println!(
        "Parsed {} entries in {} sections",
        file.entries.len(),
        file.sections.len()
    );
    for section in &file.sections {
        let count = file
            .entries
            .iter()
            .filter(|e| e.section.as_deref() == Some(section.as_str()))
            .count();
        println!("  {:<60} {:>3}", section, count);
    }

    let report = lint(&file, &LintConfig::default())?;
    println!();
    for diagnostic in &report.diagnostics {
        println!("{}", diagnostic);
    }
    println!(
        "{} error(s), {} warning(s)",
        report.error_count(),
        report.warning_count()
    );
    Ok(())
}
