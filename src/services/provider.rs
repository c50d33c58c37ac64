use regex::Regex;

use crate::config::ProvidersConfig;
use crate::error::AppError;
use crate::provider::{find_preset, ProviderCategory, ProviderRecord, PRESETS};

const ENV_KEY_PREFIX: &str = "CCM_API_KEY_";

/// Row shared by `ccm list` and the TUI: preset and user data merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSummary {
    pub name: String,
    pub display_name: String,
    /// `None` for custom providers.
    pub category: Option<ProviderCategory>,
    pub has_record: bool,
    pub is_configured: bool,
    pub is_default: bool,
    pub base_url: String,
    pub model: String,
    pub key_url: String,
    pub key_source: KeySource,
}

impl ProviderSummary {
    pub fn is_preset(&self) -> bool {
        self.category.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Config,
    Env,
    Missing,
}

/// Everything needed to talk to a provider; the credential is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub name: String,
    pub display_name: String,
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

/// Partial update for `ccm edit`.
#[derive(Debug, Clone, Default)]
pub struct ProviderPatch {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl ProviderPatch {
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.base_url.is_none() && self.model.is_none()
    }
}

pub struct ProviderService;

impl ProviderService {
    /// `CCM_API_KEY_<NAME>`, with anything outside `[A-Z0-9]` mapped to `_`.
    pub fn env_var_name(name: &str) -> String {
        let suffix: String = name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{ENV_KEY_PREFIX}{suffix}")
    }

    pub fn env_credential(name: &str) -> Option<String> {
        std::env::var(Self::env_var_name(name))
            .ok()
            .filter(|v| !v.trim().is_empty())
    }

    /// 优先使用配置文件中的 Key，环境变量仅作为兜底
    pub fn effective_credential(config: &ProvidersConfig, name: &str) -> Option<String> {
        Self::credential_with_source(config, name).0
    }

    fn credential_with_source(config: &ProvidersConfig, name: &str) -> (Option<String>, KeySource) {
        if let Some(record) = config.record(name) {
            if !record.api_key.trim().is_empty() {
                return (Some(record.api_key.clone()), KeySource::Config);
            }
        }
        match Self::env_credential(name) {
            Some(key) => (Some(key), KeySource::Env),
            None => (None, KeySource::Missing),
        }
    }

    pub fn is_configured(config: &ProvidersConfig, name: &str) -> bool {
        Self::effective_credential(config, name).is_some()
    }

    pub fn exists(config: &ProvidersConfig, name: &str) -> bool {
        config.record(name).is_some() || find_preset(name).is_some()
    }

    /// User record overlaid on the preset of the same name.
    pub fn lookup(config: &ProvidersConfig, name: &str) -> Option<ProviderRecord> {
        match (config.record(name), find_preset(name)) {
            (Some(record), _) => Some(record.clone().with_preset_defaults()),
            (None, Some(preset)) => Some(ProviderRecord::from_preset(preset, "")),
            (None, None) => None,
        }
    }

    /// Presets in registry order, then custom providers in file order.
    pub fn summaries(config: &ProvidersConfig) -> Vec<ProviderSummary> {
        let preset_names = PRESETS.iter().map(|p| p.name.to_string());
        let custom_names = config
            .providers
            .keys()
            .filter(|name| find_preset(name).is_none())
            .cloned();

        preset_names
            .chain(custom_names)
            .filter_map(|name| Self::summary(config, &name))
            .collect()
    }

    pub fn summary(config: &ProvidersConfig, name: &str) -> Option<ProviderSummary> {
        let record = Self::lookup(config, name)?;
        let (key, key_source) = Self::credential_with_source(config, name);
        Some(ProviderSummary {
            name: name.to_string(),
            display_name: record.display_label().to_string(),
            category: find_preset(name).map(|p| p.category),
            has_record: config.record(name).is_some(),
            is_configured: key.is_some(),
            is_default: config.is_default(name),
            base_url: record.base_url,
            model: record.model,
            key_url: record.key_url,
            key_source,
        })
    }

    pub fn resolve(config: &ProvidersConfig, name: &str) -> Result<ResolvedProvider, AppError> {
        let record = Self::lookup(config, name)
            .ok_or_else(|| AppError::ProviderNotFound(name.to_string()))?;
        let api_key = Self::effective_credential(config, name)
            .ok_or_else(|| AppError::NotConfigured(name.to_string()))?;
        if record.base_url.trim().is_empty() {
            return Err(AppError::invalid(format!(
                "provider '{name}' has no base URL"
            )));
        }
        Ok(ResolvedProvider {
            name: name.to_string(),
            display_name: record.display_label().to_string(),
            base_url: record.base_url,
            model: record.model,
            api_key,
        })
    }

    /// The configured default provider, if one is set.
    pub fn default_name(config: &ProvidersConfig) -> Option<String> {
        config.default.clone().filter(|d| !d.trim().is_empty())
    }

    pub fn validate_name(name: &str) -> Result<(), AppError> {
        let re = Regex::new(r"^[a-z0-9][a-z0-9_-]*$")
            .map_err(|e| AppError::Message(format!("invalid name pattern: {e}")))?;
        if re.is_match(name) {
            Ok(())
        } else {
            Err(AppError::invalid(format!(
                "invalid provider name '{name}': use lowercase letters, digits, '-' or '_'"
            )))
        }
    }

    pub fn validate_url(raw: &str) -> Result<(), AppError> {
        let parsed = url::Url::parse(raw.trim())
            .map_err(|e| AppError::invalid(format!("invalid URL '{raw}': {e}")))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(AppError::invalid(format!(
                "invalid URL '{raw}': unsupported scheme '{other}'"
            ))),
        }
    }

    /// Build the record `ccm add` would persist.
    pub fn build_record(
        name: &str,
        api_key: &str,
        base_url: Option<&str>,
        model: Option<&str>,
        display_name: Option<&str>,
    ) -> Result<ProviderRecord, AppError> {
        Self::validate_name(name)?;
        if api_key.trim().is_empty() {
            return Err(AppError::invalid("API key must not be empty"));
        }
        let base_url = base_url.map(str::trim).filter(|s| !s.is_empty());
        let model = model.map(str::trim).filter(|s| !s.is_empty());
        let display_name = display_name.map(str::trim).filter(|s| !s.is_empty());

        let mut record = match find_preset(name) {
            Some(preset) => ProviderRecord::from_preset(preset, api_key.trim()),
            None => {
                let (Some(url), Some(model)) = (base_url, model) else {
                    return Err(AppError::invalid(format!(
                        "custom provider '{name}' requires --url and --model"
                    )));
                };
                ProviderRecord {
                    name: name.to_string(),
                    display_name: name.to_string(),
                    api_key: api_key.trim().to_string(),
                    base_url: url.to_string(),
                    model: model.to_string(),
                    key_url: String::new(),
                }
            }
        };

        if let Some(url) = base_url {
            record.base_url = url.to_string();
        }
        if let Some(model) = model {
            record.model = model.to_string();
        }
        if let Some(display) = display_name {
            record.display_name = display.to_string();
        }
        Self::validate_url(&record.base_url)?;
        Ok(record)
    }

    pub fn add(
        config: &mut ProvidersConfig,
        record: ProviderRecord,
        force: bool,
    ) -> Result<(), AppError> {
        if config.providers.contains_key(&record.name) && !force {
            return Err(AppError::AlreadyExists(record.name));
        }
        log::debug!("saving provider '{}'", record.name);
        config.providers.insert(record.name.clone(), record);
        Ok(())
    }

    /// Insert or replace without the duplicate check (TUI edit dialog).
    pub fn upsert(config: &mut ProvidersConfig, record: ProviderRecord) -> Result<(), AppError> {
        if record.api_key.trim().is_empty() {
            return Err(AppError::invalid("API key must not be empty"));
        }
        Self::validate_url(&record.base_url)?;
        Self::add(config, record, true)
    }

    pub fn edit(
        config: &mut ProvidersConfig,
        name: &str,
        patch: ProviderPatch,
    ) -> Result<ProviderRecord, AppError> {
        if patch.is_empty() {
            return Err(AppError::invalid(
                "nothing to change: pass at least one of --key, --url, --model",
            ));
        }
        let record = config
            .providers
            .get_mut(name)
            .ok_or_else(|| AppError::NotConfigured(name.to_string()))?;

        if let Some(key) = patch.api_key {
            if key.trim().is_empty() {
                return Err(AppError::invalid("API key must not be empty"));
            }
            record.api_key = key.trim().to_string();
        }
        if let Some(url) = patch.base_url {
            Self::validate_url(&url)?;
            record.base_url = url.trim().to_string();
        }
        if let Some(model) = patch.model {
            record.model = model.trim().to_string();
        }
        Ok(record.clone())
    }

    /// Removes the saved record; clears `default` when it pointed here.
    pub fn remove(config: &mut ProvidersConfig, name: &str) -> Result<ProviderRecord, AppError> {
        let removed = config
            .providers
            .shift_remove(name)
            .ok_or_else(|| AppError::NotConfigured(name.to_string()))?;
        if config.is_default(name) {
            config.default = None;
        }
        Ok(removed)
    }

    /// Returns whether the new default is usable right away.
    pub fn set_default(config: &mut ProvidersConfig, name: &str) -> Result<bool, AppError> {
        if !Self::exists(config, name) {
            return Err(AppError::ProviderNotFound(name.to_string()));
        }
        config.default = Some(name.to_string());
        Ok(Self::is_configured(config, name))
    }
}
