//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::{resolve_api_key, Settings, TvdbCredentials, API_KEY_ENV_VARS};
use console::style;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckStatus {
    fn icon(self) -> console::StyledObject<&'static str> {
        match self {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        }
    }
}

/// Outcome of one diagnostic.
#[derive(Debug)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            hint: None,
        }
    }

    fn ok(name: &'static str, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Ok, message)
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn print(&self) {
        println!(
            "  {} {} - {}",
            self.status.icon(),
            style(self.name).bold(),
            self.message
        );
        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("Movies Buddy Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Model").bold());
    let model_checks = vec![
        check_api_key(resolve_api_key().ok()),
        CheckResult::ok(
            "Endpoint",
            format!("{} ({})", settings.model.base_url, settings.model.name),
        ),
    ];
    for check in &model_checks {
        check.print();
    }
    checks.extend(model_checks);

    println!();

    println!("{}", style("TVDB").bold());
    let tvdb_check = check_tvdb_credentials(TvdbCredentials::from_env().is_ok(), settings);
    tvdb_check.print();
    checks.push(tvdb_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let count = |status| checks.iter().filter(|c| c.status == status).count();
    let errors = count(CheckStatus::Error);
    let warnings = count(CheckStatus::Warning);

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before running the agent.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Movies Buddy is ready to use.");
    }

    Ok(())
}

fn check_api_key(key: Option<String>) -> CheckResult {
    let name = "API key";
    match key {
        Some(key) => CheckResult::ok(name, format!("configured ({})", mask(&key))),
        None => CheckResult::new(name, CheckStatus::Error, "not set").with_hint(format!(
            "Set one of {} in your environment or .env",
            API_KEY_ENV_VARS[..2].join(", ")
        )),
    }
}

fn check_tvdb_credentials(present: bool, settings: &Settings) -> CheckResult {
    let name = "Credentials";
    if present {
        return CheckResult::ok(name, "TVDB_API_KEY and TVDB_PIN set");
    }
    // Only fatal when the agent actually launches the TVDB server.
    let hint = "Set TVDB_API_KEY and TVDB_PIN in your environment or .env";
    let result = if settings.agent.enable_tvdb_mcp {
        CheckResult::new(name, CheckStatus::Error, "missing")
    } else {
        CheckResult::new(name, CheckStatus::Warning, "missing (TVDB tool disabled)")
    };
    result.with_hint(hint)
}

fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", path.display().to_string())
    } else {
        CheckResult::new("Config file", CheckStatus::Warning, "using defaults")
            .with_hint("Create with: movies-buddy config init")
    }
}

/// Keep the first and last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
