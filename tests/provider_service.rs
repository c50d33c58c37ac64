use std::fs;

use ccm_lib::{
    bin_dir, config_path, generate_scripts, local_agent_path, provider_state_dir,
    remove_provider_state_dir, AppError, KeySource, LaunchPlan, ProviderService,
    ProvidersConfig,
};

#[path = "support.rs"]
mod support;
use support::{ensure_test_home, lock_test_mutex, reset_test_fs, EnvGuard};

fn add_saved(name: &str, key: &str, url: Option<&str>, model: Option<&str>) {
    let record = ProviderService::build_record(name, key, url, model, None).expect("record");
    ProvidersConfig::update(|cfg| ProviderService::add(cfg, record, false)).expect("add");
}

fn install_fake_agent() {
    let agent = local_agent_path().expect("agent path");
    fs::create_dir_all(agent.parent().expect("parent")).expect("mkdir");
    fs::write(&agent, "#!/bin/sh\nexit 0\n").expect("write agent");
}

#[test]
fn added_provider_survives_reload_in_insertion_order() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();

    add_saved("zeta", "sk-z", Some("https://zeta.example.com/v1"), Some("z-1"));
    add_saved("alpha", "sk-a", Some("https://alpha.example.com"), Some("a-1"));
    add_saved("deepseek", "sk-d", None, None);

    let config = ProvidersConfig::load().expect("load");
    let keys: Vec<_> = config.providers.keys().cloned().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "deepseek"]);

    let summaries = ProviderService::summaries(&config);
    let customs: Vec<_> = summaries
        .iter()
        .filter(|s| !s.is_preset())
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(customs, vec!["zeta", "alpha"]);

    let deepseek = ProviderService::summary(&config, "deepseek").expect("deepseek");
    assert!(deepseek.is_configured);
    assert_eq!(deepseek.key_source, KeySource::Config);
    assert_eq!(deepseek.base_url, "https://api.deepseek.com");
}

#[test]
fn duplicate_add_without_force_leaves_file_untouched() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();

    add_saved("kimi", "sk-first", None, None);
    let before = fs::read_to_string(config_path().expect("path")).expect("read");

    let record = ProviderService::build_record("kimi", "sk-second", None, None, None)
        .expect("record");
    let err = ProvidersConfig::update(|cfg| ProviderService::add(cfg, record, false))
        .expect_err("duplicate must fail");
    assert!(matches!(err, AppError::AlreadyExists(ref n) if n == "kimi"));

    let after = fs::read_to_string(config_path().expect("path")).expect("read");
    assert_eq!(before, after);
}

#[test]
fn removing_the_default_clears_it_and_its_state() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();

    add_saved("glm", "sk-g", None, None);
    ProvidersConfig::update(|cfg| ProviderService::set_default(cfg, "glm")).expect("default");
    let state = provider_state_dir("glm").expect("state dir");
    fs::create_dir_all(state.join("projects")).expect("mkdir state");

    ProvidersConfig::update(|cfg| ProviderService::remove(cfg, "glm")).expect("remove");
    assert!(remove_provider_state_dir("glm").expect("remove state"));

    let config = ProvidersConfig::load().expect("load");
    assert!(config.default.is_none());
    assert!(config.record("glm").is_none());
    assert!(!state.exists());
    // 预设仍然可见，只是未配置
    let glm = ProviderService::summary(&config, "glm").expect("preset");
    assert!(!glm.is_configured);
}

#[test]
fn unconfigured_default_is_saved_but_reported() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();

    let configured =
        ProvidersConfig::update(|cfg| ProviderService::set_default(cfg, "qwen")).expect("set");
    assert!(!configured);
    let config = ProvidersConfig::load().expect("load");
    assert_eq!(ProviderService::default_name(&config).as_deref(), Some("qwen"));

    let err = ProvidersConfig::update(|cfg| ProviderService::set_default(cfg, "nope"))
        .expect_err("unknown provider");
    assert!(matches!(err, AppError::ProviderNotFound(_)));
}

#[test]
fn launch_refuses_unconfigured_provider() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();
    install_fake_agent();

    let config = ProvidersConfig::load().expect("load");
    let err = LaunchPlan::prepare(&config, "doubao", Vec::new()).expect_err("no key");
    assert!(matches!(err, AppError::NotConfigured(ref n) if n == "doubao"));
    assert!(!provider_state_dir("doubao").expect("dir").exists());
}

#[test]
fn env_credential_configures_a_preset_and_saved_key_wins() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();
    install_fake_agent();
    let _env = EnvGuard::set("CCM_API_KEY_SILICONFLOW", "sk-from-env");

    let config = ProvidersConfig::load().expect("load");
    let plan = LaunchPlan::prepare(&config, "siliconflow", vec!["--resume".into()])
        .expect("plan");
    assert_eq!(plan.env_value("ANTHROPIC_AUTH_TOKEN"), Some("sk-from-env"));
    assert_eq!(
        plan.env_value("ANTHROPIC_BASE_URL"),
        Some("https://api.siliconflow.cn/v1")
    );
    assert_eq!(plan.env_value("API_TIMEOUT_MS"), Some("300000"));
    assert_eq!(plan.args, vec!["--resume"]);
    assert!(plan.state_dir.is_dir());

    add_saved("siliconflow", "sk-saved", None, None);
    let config = ProvidersConfig::load().expect("load");
    let plan = LaunchPlan::prepare(&config, "siliconflow", Vec::new()).expect("plan");
    assert_eq!(plan.env_value("ANTHROPIC_AUTH_TOKEN"), Some("sk-saved"));
}

#[test]
fn scripts_are_generated_only_for_saved_keys() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();
    let _env = EnvGuard::set("CCM_API_KEY_QWEN", "sk-env-only");

    add_saved("wanjie", "sk-w", None, None);
    let config = ProvidersConfig::load().expect("load");
    let outcomes = generate_scripts(&config).expect("generate");

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].provider, "wanjie");
    let path = outcomes[0].result.as_ref().expect("written");
    let body = fs::read_to_string(path).expect("read script");
    assert!(body.starts_with("#!"));
    assert!(body.contains("ANTHROPIC_BASE_URL"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(path).expect("meta").permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn hand_edited_names_are_rejected_by_generate() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();

    let path = config_path().expect("path");
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(
        &path,
        concat!(
            "providers:\n",
            "  'evil$(touch pwned)':\n    api_key: sk-e\n    base_url: https://e.example.com\n    model: m\n",
            "  '../escape':\n    api_key: sk-x\n    base_url: https://x.example.com\n    model: m\n",
            "  kimi:\n    api_key: sk-k\n",
        ),
    )
    .expect("write config");

    let config = ProvidersConfig::load().expect("load");
    let outcomes = generate_scripts(&config).expect("generate");
    assert_eq!(outcomes.len(), 3);

    for outcome in &outcomes {
        if outcome.provider == "kimi" {
            assert!(outcome.result.is_ok());
        } else {
            assert!(matches!(outcome.result, Err(AppError::InvalidInput(_))));
        }
    }

    let bin = bin_dir().expect("bin");
    let written: Vec<String> = fs::read_dir(&bin)
        .expect("read bin")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written, vec!["claude-kimi".to_string()]);
    assert!(!bin.parent().expect("root").join("claude-escape").exists());
}
