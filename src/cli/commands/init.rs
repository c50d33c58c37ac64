use inquire::{Confirm, Password, PasswordDisplayMode, Select};

use crate::cli::i18n::texts;
use crate::cli::ui::{dim, highlight, info, success, warning};
use crate::config::{root_dir, ProvidersConfig};
use crate::error::AppError;
use crate::provider::{ProviderRecord, PRESETS};
use crate::services::launch::find_agent;
use crate::services::ProviderService;

fn check_environment() -> Result<(), AppError> {
    let root = root_dir()?;
    println!("{}", dim(&texts::init_root(&root.display().to_string())));

    match which::which("npm") {
        Ok(path) => println!("{}", success(&texts::init_npm_found(&path.display().to_string()))),
        Err(_) => println!("{}", warning(texts::init_npm_missing())),
    }
    match find_agent() {
        Ok(path) => println!("{}", success(&texts::init_agent_found(&path.display().to_string()))),
        Err(_) => println!(
            "{}",
            warning(&texts::init_agent_missing(&root.display().to_string()))
        ),
    }
    Ok(())
}

/// Guided first-time setup: environment check, pick a preset, enter its key.
pub fn execute() -> Result<(), AppError> {
    println!("{}", highlight(texts::init_title()));
    println!("{}", "═".repeat(60));
    check_environment()?;
    println!();

    let config = ProvidersConfig::load()?;
    let labels: Vec<String> = PRESETS
        .iter()
        .map(|p| {
            if ProviderService::is_configured(&config, p.name) {
                format!("{} ({}) ✓", p.display_name, p.name)
            } else {
                format!("{} ({})", p.display_name, p.name)
            }
        })
        .collect();
    let picked = Select::new(texts::init_select_preset(), labels.clone()).prompt()?;
    let preset = labels
        .iter()
        .position(|l| *l == picked)
        .and_then(|i| PRESETS.get(i))
        .ok_or_else(|| AppError::Message(format!("unknown selection '{picked}'")))?;

    if !preset.key_url.is_empty() {
        println!("{}", info(&texts::init_key_hint(preset.key_url)));
    }
    let key = Password::new(texts::init_api_key_prompt())
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    if key.trim().is_empty() {
        return Err(AppError::invalid(texts::key_required()));
    }

    let make_default = config.default.is_none()
        || Confirm::new(texts::init_set_default_prompt())
            .with_default(false)
            .prompt()?;

    let record = ProviderRecord::from_preset(preset, key.trim());
    let name = record.name.clone();
    ProvidersConfig::update(|cfg| {
        ProviderService::add(cfg, record, true)?;
        if make_default {
            ProviderService::set_default(cfg, &name)?;
        }
        Ok(())
    })?;

    println!("{}", success(&texts::provider_added(&name)));
    if make_default {
        println!("{}", success(&texts::default_set(&name)));
    }
    println!("\n{}", texts::init_done(&name));
    Ok(())
}
