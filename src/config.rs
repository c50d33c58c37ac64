use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::provider::ProviderRecord;

/// Overrides the `~/claude-model` root (used by tests and portable installs).
pub const HOME_ENV: &str = "CCM_HOME";

const CONFIG_FILE_NAME: &str = "providers.yaml";

/// 获取 ccm 根目录（默认 ~/claude-model）
pub fn root_dir() -> Result<PathBuf, AppError> {
    if let Ok(custom) = std::env::var(HOME_ENV) {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join("claude-model"))
        .ok_or(AppError::HomeDirNotFound)
}

pub fn config_dir() -> Result<PathBuf, AppError> {
    Ok(root_dir()?.join("configs"))
}

pub fn config_path() -> Result<PathBuf, AppError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Isolated agent state directory for one provider.
pub fn provider_state_dir(name: &str) -> Result<PathBuf, AppError> {
    Ok(config_dir()?.join(format!(".claude-{name}")))
}

/// Deletes the provider's isolated agent state. Returns whether anything was removed.
pub fn remove_provider_state_dir(name: &str) -> Result<bool, AppError> {
    if name.is_empty() || name.contains(['/', '\\']) {
        return Ok(false);
    }
    let dir = provider_state_dir(name)?;
    if !dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;
    Ok(true)
}

pub fn bin_dir() -> Result<PathBuf, AppError> {
    Ok(root_dir()?.join("bin"))
}

pub fn local_agent_path() -> Result<PathBuf, AppError> {
    Ok(root_dir()?
        .join("node_modules")
        .join(".bin")
        .join("claude"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub providers: IndexMap<String, ProviderRecord>,
}

impl ProvidersConfig {
    /// Missing file means an empty config; anything unreadable is an error.
    pub fn load() -> Result<Self, AppError> {
        let dir = config_dir()?;
        fs::create_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;

        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            log::debug!("config file {} not found, using empty config", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| AppError::io(&path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: ProvidersConfig =
            serde_yaml::from_str(&content).map_err(|source| AppError::YamlParse {
                path: path.display().to_string(),
                source,
            })?;

        // 旧版本文件可能缺少 name 字段，以 map 的 key 为准
        for (name, record) in config.providers.iter_mut() {
            if record.name != *name {
                record.name = name.clone();
            }
        }
        log::debug!(
            "loaded {} provider(s) from {}",
            config.providers.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<(), AppError> {
        let dir = config_dir()?;
        fs::create_dir_all(&dir).map_err(|e| AppError::io(&dir, e))?;

        let path = dir.join(CONFIG_FILE_NAME);
        let content =
            serde_yaml::to_string(self).map_err(|source| AppError::YamlSerialize { source })?;
        fs::write(&path, content).map_err(|e| AppError::io(&path, e))?;
        log::debug!("saved {} provider(s) to {}", self.providers.len(), path.display());
        Ok(())
    }

    /// Load, apply one mutation, and write back only if the mutation succeeded.
    pub fn update<T>(
        f: impl FnOnce(&mut ProvidersConfig) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut config = Self::load()?;
        let value = f(&mut config)?;
        config.save()?;
        Ok(value)
    }

    pub fn record(&self, name: &str) -> Option<&ProviderRecord> {
        self.providers.get(name)
    }

    pub fn is_default(&self, name: &str) -> bool {
        self.default.as_deref() == Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    struct HomeGuard {
        _dir: TempDir,
        prev: Option<String>,
    }

    impl HomeGuard {
        fn new() -> Self {
            let dir = TempDir::new().expect("temp dir");
            let prev = std::env::var(HOME_ENV).ok();
            std::env::set_var(HOME_ENV, dir.path());
            Self { _dir: dir, prev }
        }
    }

    impl Drop for HomeGuard {
        fn drop(&mut self) {
            match &self.prev {
                Some(v) => std::env::set_var(HOME_ENV, v),
                None => std::env::remove_var(HOME_ENV),
            }
        }
    }

    #[test]
    #[serial]
    fn missing_file_loads_empty_and_creates_dir() {
        let _home = HomeGuard::new();
        let config = ProvidersConfig::load().expect("load");
        assert_eq!(config, ProvidersConfig::default());
        assert!(config_dir().expect("dir").is_dir());
    }

    #[test]
    #[serial]
    fn save_then_load_round_trips() {
        let _home = HomeGuard::new();
        let mut config = ProvidersConfig::default();
        config.providers.insert(
            "alpha".into(),
            ProviderRecord {
                name: "alpha".into(),
                display_name: "Alpha 中文".into(),
                api_key: "sk-alpha".into(),
                base_url: "https://alpha.example.com/v1".into(),
                model: "alpha-large".into(),
                key_url: String::new(),
            },
        );
        config.default = Some("alpha".into());
        config.save().expect("save");

        let loaded = ProvidersConfig::load().expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    #[serial]
    fn corrupt_file_is_an_error() {
        let _home = HomeGuard::new();
        let path = config_path().expect("path");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, "providers: [not, a, map").expect("write");

        let err = ProvidersConfig::load().expect_err("corrupt file must fail");
        assert!(matches!(err, AppError::YamlParse { .. }));
    }

    #[test]
    #[serial]
    fn failed_update_does_not_write() {
        let _home = HomeGuard::new();
        let result: Result<(), AppError> = ProvidersConfig::update(|cfg| {
            cfg.default = Some("x".into());
            Err(AppError::invalid("nope"))
        });
        assert!(result.is_err());
        assert!(!config_path().expect("path").exists());
    }

    #[test]
    #[serial]
    fn map_key_wins_over_record_name() {
        let _home = HomeGuard::new();
        let path = config_path().expect("path");
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(
            &path,
            "providers:\n  kimi:\n    api_key: sk-k\n    base_url: https://api.moonshot.cn/v1\n    model: m\n",
        )
        .expect("write");

        let loaded = ProvidersConfig::load().expect("load");
        assert_eq!(loaded.record("kimi").map(|r| r.name.as_str()), Some("kimi"));
    }
}
