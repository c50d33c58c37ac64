use inquire::Confirm;

use crate::cli::i18n::texts;
use crate::cli::ui::{create_table, dim, highlight, info, mask_secret, success, warning};
use crate::config::{provider_state_dir, remove_provider_state_dir, ProvidersConfig};
use crate::error::AppError;
use crate::services::{KeySource, ProviderPatch, ProviderService, ProviderSummary};

pub struct AddArgs {
    pub name: String,
    pub key: String,
    pub url: Option<String>,
    pub model: Option<String>,
    pub display_name: Option<String>,
    pub force: bool,
}

pub fn add(args: AddArgs) -> Result<(), AppError> {
    let record = ProviderService::build_record(
        &args.name,
        &args.key,
        args.url.as_deref(),
        args.model.as_deref(),
        args.display_name.as_deref(),
    )?;
    let name = record.name.clone();
    ProvidersConfig::update(|cfg| ProviderService::add(cfg, record, args.force))?;
    println!("{}", success(&texts::provider_added(&name)));
    Ok(())
}

pub fn edit(name: &str, patch: ProviderPatch) -> Result<(), AppError> {
    if patch.is_empty() {
        return Err(AppError::invalid(texts::nothing_to_update()));
    }
    let record = ProvidersConfig::update(|cfg| ProviderService::edit(cfg, name, patch))?;
    println!("{}", success(&texts::provider_updated(&record.name)));
    Ok(())
}

pub fn remove(name: &str, force: bool) -> Result<(), AppError> {
    let config = ProvidersConfig::load()?;
    if config.record(name).is_none() {
        return Err(AppError::NotConfigured(name.to_string()));
    }

    if !force {
        let confirmed = Confirm::new(&texts::confirm_remove(name))
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("{}", info(texts::cancelled()));
            return Ok(());
        }
    }

    ProvidersConfig::update(|cfg| ProviderService::remove(cfg, name))?;
    println!("{}", success(&texts::provider_removed(name)));
    let state_dir = provider_state_dir(name)?;
    if remove_provider_state_dir(name)? {
        println!("{}", dim(&texts::state_dir_removed(&state_dir.display().to_string())));
    }
    Ok(())
}

fn kind_label(summary: &ProviderSummary) -> String {
    match summary.category {
        Some(category) => category.as_str().to_string(),
        None => texts::kind_custom().to_string(),
    }
}

pub fn list() -> Result<(), AppError> {
    let config = ProvidersConfig::load()?;
    let summaries = ProviderService::summaries(&config);
    if summaries.is_empty() {
        println!("{}", info(texts::no_providers()));
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec![
        "",
        texts::header_name(),
        texts::header_display_name(),
        texts::header_type(),
        texts::header_model(),
        texts::header_status(),
    ]);

    for s in &summaries {
        let marker = if s.is_default { "★" } else { "" };
        let status = if s.is_configured {
            texts::status_configured()
        } else {
            texts::status_unconfigured()
        };
        table.add_row(vec![
            marker.to_string(),
            s.name.clone(),
            s.display_name.clone(),
            kind_label(s),
            s.model.clone(),
            status.to_string(),
        ]);
    }

    println!("{table}");
    let configured = summaries.iter().filter(|s| s.is_configured).count();
    println!(
        "\n{} {}",
        info("ℹ"),
        texts::providers_summary(configured, summaries.len())
    );
    match ProviderService::default_name(&config) {
        Some(name) => println!("{} {}", info("→"), texts::current_default(&highlight(&name))),
        None => println!("{} {}", info("→"), texts::no_default()),
    }
    Ok(())
}

pub fn show(name: &str) -> Result<(), AppError> {
    let config = ProvidersConfig::load()?;
    let summary = ProviderService::summary(&config, name)
        .ok_or_else(|| AppError::ProviderNotFound(name.to_string()))?;

    let title = if summary.is_default {
        format!("{} ★", summary.display_name)
    } else {
        summary.display_name.clone()
    };
    println!("{}", highlight(&title));
    println!("{}", "═".repeat(60));

    let env_var = ProviderService::env_var_name(&summary.name);
    let key = match summary.key_source {
        KeySource::Missing => warning(texts::key_missing()),
        KeySource::Config => {
            let secret = ProviderService::effective_credential(&config, name).unwrap_or_default();
            format!("{} ({})", mask_secret(&secret), texts::key_from_config())
        }
        KeySource::Env => {
            let secret = ProviderService::effective_credential(&config, name).unwrap_or_default();
            format!("{} ({})", mask_secret(&secret), texts::key_from_env(&env_var))
        }
    };

    let rows = [
        (texts::header_name(), summary.name.clone()),
        (texts::header_type(), kind_label(&summary)),
        (texts::header_url(), summary.base_url.clone()),
        (texts::header_model(), summary.model.clone()),
        (texts::header_api_key(), key),
    ];
    for (label, value) in rows {
        println!("  {:<14} {}", format!("{label}:"), value);
    }
    if !summary.key_url.is_empty() {
        println!("  {:<14} {}", format!("{}:", texts::header_key_url()), summary.key_url);
    }
    println!(
        "  {:<14} {}",
        format!("{}:", texts::header_state_dir()),
        provider_state_dir(&summary.name)?.display()
    );
    if !summary.is_configured {
        println!(
            "\n{}",
            warning(&texts::default_set_unconfigured(&summary.name, &env_var))
        );
    }
    Ok(())
}

pub fn default(name: Option<String>) -> Result<(), AppError> {
    let Some(name) = name else {
        let config = ProvidersConfig::load()?;
        match ProviderService::default_name(&config) {
            Some(current) => println!("{}", texts::current_default(&highlight(&current))),
            None => println!("{}", info(texts::no_default())),
        }
        return Ok(());
    };

    let configured = ProvidersConfig::update(|cfg| ProviderService::set_default(cfg, &name))?;
    println!("{}", success(&texts::default_set(&name)));
    if !configured {
        println!(
            "{}",
            warning(&texts::default_set_unconfigured(
                &name,
                &ProviderService::env_var_name(&name)
            ))
        );
    }
    Ok(())
}
