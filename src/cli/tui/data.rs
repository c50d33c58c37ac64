use std::time::Duration;

use crate::config::ProvidersConfig;
use crate::error::AppError;
use crate::provider::ProviderRecord;
use crate::services::{ConnectionResult, ConnectionStatus, ProviderService, ProviderSummary};

/// One row of the provider list. Connection fields are session-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry {
    pub summary: ProviderSummary,
    pub status: ConnectionStatus,
    pub latency: Option<Duration>,
    /// Error text, or the credential hint of a reachable endpoint.
    pub detail: Option<String>,
}

impl ProviderEntry {
    pub fn new(summary: ProviderSummary) -> Self {
        Self {
            summary,
            status: ConnectionStatus::Unknown,
            latency: None,
            detail: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.summary.name
    }

    pub fn display_name(&self) -> &str {
        &self.summary.display_name
    }

    pub fn matches(&self, query_lower: &str) -> bool {
        self.summary.name.to_lowercase().contains(query_lower)
            || self.summary.display_name.to_lowercase().contains(query_lower)
    }

    pub fn apply_result(&mut self, result: &ConnectionResult) {
        self.status = result.status;
        self.latency = result.latency;
        self.detail = result.error.clone().or_else(|| result.hint.clone());
    }
}

/// Snapshot of the persisted config the UI is built from.
#[derive(Debug, Clone, Default)]
pub struct UiData {
    pub config: ProvidersConfig,
}

impl UiData {
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            config: ProvidersConfig::load()?,
        })
    }

    /// Fresh item model; every status starts as `Unknown`.
    pub fn entries(&self) -> Vec<ProviderEntry> {
        ProviderService::summaries(&self.config)
            .into_iter()
            .map(ProviderEntry::new)
            .collect()
    }

    /// Saved record merged with preset defaults, used to seed the edit dialog.
    pub fn record_for_edit(&self, name: &str) -> Option<ProviderRecord> {
        ProviderService::lookup(&self.config, name)
    }

    pub fn default_name(&self) -> Option<&str> {
        self.config.default.as_deref().filter(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ConnectionResult;

    #[test]
    fn fresh_entries_start_unknown() {
        let data = UiData::default();
        let entries = data.entries();
        assert!(!entries.is_empty());
        assert!(entries
            .iter()
            .all(|e| e.status == ConnectionStatus::Unknown && e.latency.is_none()));
    }

    #[test]
    fn match_is_case_insensitive_on_name_and_label() {
        let data = UiData::default();
        let kimi = data
            .entries()
            .into_iter()
            .find(|e| e.name() == "kimi")
            .expect("kimi preset");
        assert!(kimi.matches("kim"));
        assert!(kimi.matches("月之暗面"));
        assert!(!kimi.matches("deep"));
    }

    #[test]
    fn error_result_keeps_message() {
        let data = UiData::default();
        let mut entry = data.entries().remove(0);
        entry.apply_result(&ConnectionResult::failed(entry.name().to_string(), "HTTP 500"));
        assert_eq!(entry.status, ConnectionStatus::Error);
        assert_eq!(entry.detail.as_deref(), Some("HTTP 500"));
    }
}
