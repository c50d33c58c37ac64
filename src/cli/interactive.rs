use inquire::{Password, PasswordDisplayMode, Select};

use crate::cli::commands::{provider, run as run_cmd, test};
use crate::cli::i18n::texts;
use crate::cli::ui::{error, highlight, success, warning};
use crate::config::ProvidersConfig;
use crate::error::AppError;
use crate::services::{ProviderService, ProviderSummary};

fn provider_label(s: &ProviderSummary) -> String {
    let status = if s.is_configured { "✓" } else { "✗" };
    let marker = if s.is_default { " ★" } else { "" };
    format!("{status} {} ({}){marker}", s.display_name, s.name)
}

/// `ccm list -i`: pick a provider, then act on it until the user leaves.
pub fn run() -> Result<(), AppError> {
    loop {
        let config = ProvidersConfig::load()?;
        let summaries = ProviderService::summaries(&config);
        if summaries.is_empty() {
            println!("{}", warning(texts::no_providers()));
            return Ok(());
        }

        let mut labels: Vec<String> = summaries.iter().map(provider_label).collect();
        labels.push(texts::action_exit().to_string());
        let picked = Select::new(texts::interactive_select_provider(), labels.clone())
            .with_page_size(12)
            .prompt()?;
        let Some(summary) = labels
            .iter()
            .position(|l| *l == picked)
            .and_then(|i| summaries.get(i))
        else {
            return Ok(());
        };

        provider_menu(&config, summary)?;
    }
}

fn provider_menu(config: &ProvidersConfig, summary: &ProviderSummary) -> Result<(), AppError> {
    let mut choices = Vec::new();
    if summary.is_configured {
        choices.push(texts::action_run());
        choices.push(texts::action_test());
    }
    choices.push(texts::action_set_key());
    if !summary.is_default {
        choices.push(texts::action_set_default());
    }
    if summary.has_record {
        choices.push(texts::action_remove());
    }
    choices.push(texts::action_back());

    println!("\n{}", highlight(&summary.display_name));
    let choice = Select::new(&texts::interactive_choose_action(&summary.name), choices).prompt()?;

    let name = summary.name.as_str();
    let outcome = if choice == texts::action_run() {
        run_cmd::launch(config, name, Vec::new())
    } else if choice == texts::action_test() {
        test::execute(name)
    } else if choice == texts::action_set_key() {
        set_key(name)
    } else if choice == texts::action_set_default() {
        provider::default(Some(name.to_string()))
    } else if choice == texts::action_remove() {
        provider::remove(name, false)
    } else {
        Ok(())
    };

    // 单个动作失败不退出菜单，只有取消才向上传递
    match outcome {
        Err(AppError::Cancelled) => Err(AppError::Cancelled),
        Err(e) => {
            println!("{}", error(&format!("{}: {e}", texts::error_prefix())));
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

fn set_key(name: &str) -> Result<(), AppError> {
    let key = Password::new(texts::init_api_key_prompt())
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    if key.trim().is_empty() {
        return Err(AppError::invalid(texts::key_required()));
    }

    ProvidersConfig::update(|cfg| {
        let mut record = ProviderService::lookup(cfg, name)
            .ok_or_else(|| AppError::ProviderNotFound(name.to_string()))?;
        record.api_key = key.trim().to_string();
        ProviderService::upsert(cfg, record)
    })?;
    println!("{}", success(&texts::provider_updated(name)));
    Ok(())
}
