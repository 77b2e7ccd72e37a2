//! 配置加载集成测试（修改进程环境变量，需串行执行）

use proctable::commands::GlobalArgs;
use proctable::utils::config_paths::ConfigPaths;
use proctable::{OutputFormat, Settings};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

struct EnvGuard {
    key: String,
    original: Option<String>,
}

impl EnvGuard {
    fn set(key: &str, value: &str) -> Self {
        let original = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            original,
        }
    }

    fn remove(key: &str) -> Self {
        let original = env::var(key).ok();
        env::remove_var(key);
        Self {
            key: key.to_string(),
            original,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.original {
            Some(val) => env::set_var(&self.key, val),
            None => env::remove_var(&self.key),
        }
    }
}

#[test]
#[serial]
fn load_reads_config_file_under_home() {
    let home = TempDir::new().expect("temp dir");
    let _capacity = EnvGuard::remove("PROCTABLE_CAPACITY");
    let _log = EnvGuard::remove("PROCTABLE_LOG");

    let paths = ConfigPaths::with_home(home.path());
    paths.ensure_dirs().expect("dirs");
    fs::write(&paths.config_file, "capacity = 10\nformat = \"table\"\nstrict = true\n")
        .expect("config file");

    let settings = Settings::load(&GlobalArgs::default(), &paths).expect("settings");
    assert_eq!(settings.capacity, 10);
    assert_eq!(settings.format, OutputFormat::Table);
    assert!(settings.strict);
}

#[test]
#[serial]
fn environment_overrides_config_file() {
    let home = TempDir::new().expect("temp dir");
    let _capacity = EnvGuard::set("PROCTABLE_CAPACITY", "20");
    let _log = EnvGuard::set("PROCTABLE_LOG", "debug");

    let paths = ConfigPaths::with_home(home.path());
    paths.ensure_dirs().expect("dirs");
    fs::write(&paths.config_file, "capacity = 10\nlog_level = \"error\"\n").expect("config file");

    let settings = Settings::load(&GlobalArgs::default(), &paths).expect("settings");
    assert_eq!(settings.capacity, 20);
    assert_eq!(settings.log_level.as_deref(), Some("debug"));
}

#[test]
#[serial]
fn explicit_config_path_wins_over_default_location() {
    let home = TempDir::new().expect("temp dir");
    let _capacity = EnvGuard::remove("PROCTABLE_CAPACITY");

    let paths = ConfigPaths::with_home(home.path());
    let custom = home.path().join("custom.toml");
    fs::write(&custom, "capacity = 3\n").expect("config file");

    let args = GlobalArgs {
        config: Some(custom),
        ..GlobalArgs::default()
    };
    let settings = Settings::load(&args, &paths).expect("settings");
    assert_eq!(settings.capacity, 3);
}
