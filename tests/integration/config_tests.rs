use dupsweep::config::{Config, ConfigError};
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all DUPSWEEP_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("DUPSWEEP_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_load_defaults() {
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config.backup_dir_name, "Duplicates_Backup");
    assert_eq!(config.log.max_bytes, 5 * 1024 * 1024);
    assert_eq!(config.log.max_files, 5);
}

#[test]
fn test_config_load_from_env() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    std::env::set_var("DUPSWEEP_FOLLOW_SYMLINKS", "true");
    std::env::set_var("DUPSWEEP_BACKUP_DIR_NAME", "Older");
    // Use double underscore for nesting
    std::env::set_var("DUPSWEEP_LOG__MAX_FILES", "2");

    let config: Config = Config::figment(None)
        .merge(Env::prefixed("DUPSWEEP_").split("__"))
        .extract()
        .unwrap();

    assert!(config.follow_symlinks);
    assert_eq!(config.backup_dir_name, "Older");
    assert_eq!(config.log.max_files, 2);

    clear_env();
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
default_root = "/srv/inbox"
backup_dir_name = "Old Copies"
follow_symlinks = true
extensions = [".jpg", ".png"]

[log]
directory = "/var/log/dupsweep"
file_name = "sweep.log"
max_bytes = 1024
max_files = 3
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load(Some(&config_path)).unwrap();

    assert_eq!(
        config.default_root.as_deref(),
        Some(std::path::Path::new("/srv/inbox"))
    );
    assert_eq!(config.backup_dir_name, "Old Copies");
    assert!(config.follow_symlinks);
    assert_eq!(config.extensions, vec![".jpg", ".png"]);
    assert_eq!(config.log.file_name, "sweep.log");
    assert_eq!(config.log.max_bytes, 1024);
    assert_eq!(config.log.max_files, 3);
    assert_eq!(
        config.log_directory(),
        std::path::PathBuf::from("/var/log/dupsweep")
    );
}

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "backup_dir_name = \"FromFile\"\n").unwrap();

    std::env::set_var("DUPSWEEP_BACKUP_DIR_NAME", "FromEnv");
    let config = Config::load(Some(&config_path)).unwrap();
    clear_env();

    assert_eq!(config.backup_dir_name, "FromEnv");
}

#[test]
fn test_config_invalid_toml_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "this is = = not toml").unwrap();

    let result = Config::load(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_wrong_type_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[log]\nmax_bytes = \"lots\"\n").unwrap();

    assert!(Config::load(Some(&config_path)).is_err());
}

#[test]
fn test_config_failing_validation_is_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[log]\nmax_bytes = 0\n").unwrap();

    let result = Config::load(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
