use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_calando_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CALANDO_CONFIG_PATH", "/tmp/calando-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/calando-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("calando")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("calando")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
fade_step = 0.05
fade_tick_ms = 25
replay_window_secs = 5
quit_fade_out_ms = 123

[controls]
volume_step = 0.2

[ui]
header_text = "hello"
spectrum_rows = 12

[playlist]
extensions = ["mp3"]
recursive = false
include_hidden = false
follow_links = false
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CALANDO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("CALANDO__AUDIO__FADE_STEP");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.fade_step, 0.05);
    assert_eq!(s.audio.fade_tick_ms, 25);
    assert_eq!(s.audio.replay_window_secs, 5);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.controls.volume_step, 0.2);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.spectrum_rows, 12);
    assert_eq!(s.playlist.extensions, vec!["mp3".to_string()]);
    assert!(!s.playlist.recursive);
    assert!(!s.playlist.include_hidden);
    assert!(!s.playlist.follow_links);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[audio]\nfade_tick_ms = 40\n").unwrap();

    let _g1 = EnvGuard::set("CALANDO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("CALANDO__AUDIO__FADE_TICK_MS", "15");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.fade_tick_ms, 15);
}

#[test]
fn validate_rejects_bad_fade_and_volume_steps() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.fade_step = 0.0;
    assert!(s.validate().is_err());

    s.audio.fade_step = 0.1;
    s.audio.fade_tick_ms = 0;
    assert!(s.validate().is_err());

    s.audio.fade_tick_ms = 40;
    s.controls.volume_step = 1.5;
    assert!(s.validate().is_err());
}
