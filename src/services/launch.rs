use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::config::{local_agent_path, provider_state_dir, ProvidersConfig};
use crate::error::AppError;
use crate::services::provider::ProviderService;

pub const AGENT_BIN: &str = "claude";
pub const API_TIMEOUT_MS: &str = "300000";

/// Resolved `claude` invocation for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub provider: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub state_dir: PathBuf,
}

/// `~/claude-model/node_modules/.bin/claude` first, then `PATH`.
pub fn find_agent() -> Result<PathBuf, AppError> {
    let local = local_agent_path()?;
    if local.is_file() {
        return Ok(local);
    }
    which::which(AGENT_BIN).map_err(|_| AppError::AgentNotFound)
}

impl LaunchPlan {
    /// Fails with `NotConfigured` rather than launching with an empty key.
    pub fn prepare(
        config: &ProvidersConfig,
        name: &str,
        args: Vec<String>,
    ) -> Result<Self, AppError> {
        let resolved = ProviderService::resolve(config, name)?;
        let program = find_agent()?;

        let state_dir = provider_state_dir(&resolved.name)?;
        fs::create_dir_all(&state_dir).map_err(|e| AppError::io(&state_dir, e))?;

        let env = vec![
            ("ANTHROPIC_AUTH_TOKEN".to_string(), resolved.api_key),
            ("ANTHROPIC_BASE_URL".to_string(), resolved.base_url),
            ("ANTHROPIC_MODEL".to_string(), resolved.model),
            ("API_TIMEOUT_MS".to_string(), API_TIMEOUT_MS.to_string()),
            (
                "CLAUDE_CONFIG_DIR".to_string(),
                state_dir.display().to_string(),
            ),
        ];

        Ok(Self {
            provider: resolved.name,
            program,
            args,
            env,
            state_dir,
        })
    }

    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(AGENT_BIN);
        }
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }

    /// Replace the current process with `claude`. Only returns on failure.
    #[cfg(unix)]
    pub fn exec(self) -> Result<(), AppError> {
        use std::os::unix::process::CommandExt;

        log::debug!(
            "exec {} for provider '{}'",
            self.program.display(),
            self.provider
        );
        let err = self.command().exec();
        Err(AppError::IoContext {
            context: format!("failed to exec {}", self.program.display()),
            source: err,
        })
    }

    #[cfg(not(unix))]
    pub fn exec(self) -> Result<(), AppError> {
        log::debug!(
            "spawn {} for provider '{}'",
            self.program.display(),
            self.provider
        );
        let status = self
            .command()
            .status()
            .map_err(|e| AppError::IoContext {
                context: format!("failed to start {}", self.program.display()),
                source: e,
            })?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HOME_ENV;
    use crate::provider::ProviderRecord;
    use serial_test::serial;
    use tempfile::TempDir;

    struct HomeGuard {
        dir: TempDir,
        prev: Option<String>,
    }

    impl HomeGuard {
        fn new() -> Self {
            let dir = TempDir::new().expect("temp dir");
            let prev = std::env::var(HOME_ENV).ok();
            std::env::set_var(HOME_ENV, dir.path());
            Self { dir, prev }
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

    fn install_fake_agent(home: &HomeGuard) -> PathBuf {
        let bin = home.dir.path().join("node_modules").join(".bin");
        fs::create_dir_all(&bin).expect("mkdir");
        let path = bin.join(AGENT_BIN);
        fs::write(&path, "#!/bin/sh\n").expect("write");
        path
    }

    #[test]
    #[serial]
    fn plan_sets_provider_environment() {
        let home = HomeGuard::new();
        let agent = install_fake_agent(&home);

        let mut config = ProvidersConfig::default();
        config.providers.insert(
            "deepseek".into(),
            ProviderRecord {
                name: "deepseek".into(),
                api_key: "sk-ds".into(),
                ..Default::default()
            },
        );

        let plan = LaunchPlan::prepare(&config, "deepseek", vec!["--resume".into()])
            .expect("plan");
        assert_eq!(plan.program, agent);
        assert_eq!(plan.args, vec!["--resume".to_string()]);
        assert_eq!(plan.env_value("ANTHROPIC_AUTH_TOKEN"), Some("sk-ds"));
        assert_eq!(
            plan.env_value("ANTHROPIC_BASE_URL"),
            Some("https://api.deepseek.com")
        );
        assert_eq!(plan.env_value("ANTHROPIC_MODEL"), Some("deepseek-chat"));
        assert_eq!(plan.env_value("API_TIMEOUT_MS"), Some("300000"));
        assert!(plan.state_dir.ends_with(".claude-deepseek"));
        assert!(plan.state_dir.is_dir());
    }

    #[test]
    #[serial]
    fn unconfigured_provider_is_never_launched() {
        let home = HomeGuard::new();
        install_fake_agent(&home);
        let prev = std::env::var("CCM_API_KEY_GLM").ok();
        std::env::remove_var("CCM_API_KEY_GLM");

        let err = LaunchPlan::prepare(&ProvidersConfig::default(), "glm", Vec::new())
            .expect_err("must refuse");
        assert!(matches!(err, AppError::NotConfigured(_)));

        if let Some(v) = prev {
            std::env::set_var("CCM_API_KEY_GLM", v);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn agent_sees_its_bare_name_as_argv0() {
        let cat = PathBuf::from("/bin/cat");
        if !cat.is_file() {
            return;
        }
        let plan = LaunchPlan {
            provider: "kimi".into(),
            program: cat,
            args: vec!["/proc/self/cmdline".into()],
            env: Vec::new(),
            state_dir: PathBuf::new(),
        };
        let output = plan.command().output().expect("spawn");
        let argv: Vec<&[u8]> = output.stdout.split(|b| *b == 0).collect();
        assert_eq!(argv[0], AGENT_BIN.as_bytes());
        assert_eq!(argv[1], b"/proc/self/cmdline");
    }
}
