use inquire::Select;

use crate::cli::i18n::texts;
use crate::cli::ui::{dim, error, info, success, warning};
use crate::config::{bin_dir, ProvidersConfig};
use crate::error::AppError;
use crate::services::script::generate_scripts;
use crate::services::{LaunchPlan, ProviderService};

/// Replaces the process with `claude` on success.
pub fn launch(config: &ProvidersConfig, name: &str, args: Vec<String>) -> Result<(), AppError> {
    let plan = LaunchPlan::prepare(config, name, args)?;
    let record = ProviderService::lookup(config, name);
    let display = record
        .as_ref()
        .map(|r| r.display_label().to_string())
        .unwrap_or_else(|| name.to_string());
    let model = plan.env_value("ANTHROPIC_MODEL").unwrap_or_default();
    println!("{}", info(&texts::launching(name, &display, model)));
    plan.exec()
}

pub fn run(name: Option<String>, args: Vec<String>) -> Result<(), AppError> {
    let config = ProvidersConfig::load()?;
    let name = match name {
        Some(name) => name,
        None => ProviderService::default_name(&config)
            .ok_or_else(|| AppError::invalid(texts::no_default()))?,
    };
    launch(&config, &name, args)
}

pub fn switch() -> Result<(), AppError> {
    let config = ProvidersConfig::load()?;
    let choices: Vec<_> = ProviderService::summaries(&config)
        .into_iter()
        .filter(|s| s.is_configured)
        .collect();
    if choices.is_empty() {
        println!("{}", warning(texts::no_configured_providers()));
        return Ok(());
    }

    let labels: Vec<String> = choices
        .iter()
        .map(|s| {
            let marker = if s.is_default { texts::default_marker() } else { "" };
            format!("{} ({}){marker}", s.display_name, s.name)
        })
        .collect();
    let start = choices.iter().position(|s| s.is_default).unwrap_or(0);
    let picked = Select::new(texts::select_provider_prompt(), labels.clone())
        .with_starting_cursor(start)
        .prompt()?;
    let index = labels
        .iter()
        .position(|l| *l == picked)
        .ok_or_else(|| AppError::Message(format!("unknown selection '{picked}'")))?;

    launch(&config, &choices[index].name, Vec::new())
}

pub fn generate() -> Result<(), AppError> {
    let config = ProvidersConfig::load()?;
    let outcomes = generate_scripts(&config)?;
    if outcomes.is_empty() {
        println!("{}", warning(texts::no_scripts()));
        return Ok(());
    }

    for outcome in &outcomes {
        match &outcome.result {
            Ok(path) => println!("{}", success(&texts::script_written(&path.display().to_string()))),
            Err(e) => println!(
                "{}",
                error(&texts::script_failed(&outcome.provider, &e.to_string()))
            ),
        }
    }
    println!(
        "\n{}",
        dim(&texts::scripts_path_hint(&bin_dir()?.display().to_string()))
    );

    match outcomes.iter().find_map(|o| o.result.as_ref().err()) {
        Some(e) => Err(AppError::Message(e.to_string())),
        None => Ok(()),
    }
}
