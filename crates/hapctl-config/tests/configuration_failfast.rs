use std::ffi::{OsStr, OsString};
use std::fs;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use tempfile::TempDir;
use hapctl_config::Config;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct EnvOverride {
    key: &'static str,
    previous: Option<OsString>,
    guard: Option<MutexGuard<'static, ()>>,
}

impl EnvOverride {
    fn set_var(key: &'static str, value: &OsStr) -> Self {
        let guard = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::env::var_os(key);
        unsafe { std::env::set_var(key, value) };
        Self {
            key,
            previous,
            guard: Some(guard),
        }
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
        drop(self.guard.take());
    }
}

#[test]
fn malformed_socket_in_file_fails_loading() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("hapctl.toml");
    fs::write(&path, "stats_socket = \"http://localhost:80\"\n").expect("write config");

    let args = vec![
        OsString::from("hapctl"),
        OsString::from("--config-path"),
        path.into_os_string(),
    ];

    let error = Config::load_from_iter(args).expect_err("loading must fail");
    assert!(
        !error.to_string().is_empty(),
        "expected a descriptive configuration error"
    );
}

#[test]
fn malformed_toml_fails_loading() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner);
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("hapctl.toml");
    fs::write(&path, "read_only = = true\n").expect("write config");

    let args = vec![
        OsString::from("hapctl"),
        OsString::from("--config-path"),
        path.into_os_string(),
    ];

    assert!(Config::load_from_iter(args).is_err());
}

#[test]
fn malformed_socket_in_environment_fails_loading() {
    let _env = EnvOverride::set_var("HAPCTL_STATS_SOCKET", OsStr::new("ftp://example.com/x"));

    let error = Config::load_from_iter([OsString::from("hapctl")])
        .expect_err("loading must fail");
    assert!(!error.to_string().is_empty());
}
