use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};

use ccm_lib::HOME_ENV;

/// Points `CCM_HOME` at one temp dir for the whole test binary.
pub fn ensure_test_home() -> &'static Path {
    static HOME: OnceLock<PathBuf> = OnceLock::new();
    let home = HOME.get_or_init(|| {
        let base = std::env::temp_dir().join(format!("ccm-test-home-{}", std::process::id()));
        if base.exists() {
            let _ = std::fs::remove_dir_all(&base);
        }
        std::fs::create_dir_all(&base).expect("create test home");
        base
    });
    std::env::set_var(HOME_ENV, home);
    home.as_path()
}

/// Clears everything ccm writes under the test home.
pub fn reset_test_fs() {
    let home = ensure_test_home();
    for sub in ["configs", "bin", "node_modules"] {
        let path = home.join(sub);
        if path.exists() {
            let _ = std::fs::remove_dir_all(&path);
        }
    }
}

/// Tests share the home dir and process env, so they run one at a time.
pub fn lock_test_mutex() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sets an env var for the guard's lifetime.
pub struct EnvGuard {
    key: String,
    prev: Option<String>,
}

impl EnvGuard {
    pub fn set(key: &str, value: &str) -> Self {
        let prev = std::env::var(key).ok();
        std::env::set_var(key, value);
        Self {
            key: key.to_string(),
            prev,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => std::env::set_var(&self.key, v),
            None => std::env::remove_var(&self.key),
        }
    }
}
