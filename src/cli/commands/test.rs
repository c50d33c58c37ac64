use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::i18n::texts;
use crate::cli::ui::{error, success, warning};
use crate::config::ProvidersConfig;
use crate::error::AppError;
use crate::services::{ConnectionStatus, ProbeService, ProbeTarget, ProviderService};

fn create_runtime() -> Result<tokio::runtime::Runtime, AppError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Message(format!("Failed to create runtime: {e}")))
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Exits non-zero when the endpoint is unreachable.
pub fn execute(name: &str) -> Result<(), AppError> {
    let config = ProvidersConfig::load()?;
    let resolved = ProviderService::resolve(&config, name)?;
    let target = ProbeTarget::from(&resolved);

    let pb = spinner(texts::testing_connection(name, &resolved.base_url));
    let result = create_runtime()?.block_on(ProbeService::test_connection(target));
    pb.finish_and_clear();

    match result.status {
        ConnectionStatus::Ok => {
            let ms = result.latency.map(|d| d.as_millis()).unwrap_or(0);
            println!(
                "{}",
                success(&texts::test_ok(name, ms, result.http_status.unwrap_or(0)))
            );
            if result.hint.is_some() {
                println!("{}", warning(&format!("⚠ {}", texts::probe_credential_hint())));
            }
            Ok(())
        }
        _ => {
            let message = result.error.unwrap_or_default();
            println!("{}", error(&texts::test_failed(name, &message)));
            Err(AppError::Message(texts::test_failed_summary(name)))
        }
    }
}
