use crate::config::DashboardConfig;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::OnceLock;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const VARS: [&str; 3] = ["DATA_DIR", "CAMPAIGN_ID_PREFIX", "RANKING_LIMIT"];

fn clear_vars() {
    for var in VARS {
        // SAFETY: callers hold ENV_LOCK
        unsafe { env::remove_var(var) };
    }
}

fn set_var(key: &str, value: &str) {
    // SAFETY: callers hold ENV_LOCK
    unsafe { env::set_var(key, value) };
}

#[test]
fn test_config_defaults_without_env() {
    let _guard = get_env_lock().lock().unwrap();
    clear_vars();

    let config = DashboardConfig::from_env().unwrap();
    assert_eq!(config, DashboardConfig::default());
}

#[test]
fn test_config_reads_env() {
    let _guard = get_env_lock().lock().unwrap();
    clear_vars();
    set_var("DATA_DIR", "/var/lib/infludash");
    set_var("CAMPAIGN_ID_PREFIX", " ACME-CAMP ");
    set_var("RANKING_LIMIT", "5");

    let config = DashboardConfig::from_env().unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/var/lib/infludash"));
    assert_eq!(config.campaign_id_prefix, "ACME-CAMP");
    assert_eq!(config.ranking_limit, 5);

    // Cleanup
    clear_vars();
}

#[test]
fn test_config_rejects_bad_ranking_limit() {
    let _guard = get_env_lock().lock().unwrap();
    clear_vars();

    set_var("RANKING_LIMIT", "ten");
    let err = DashboardConfig::from_env().unwrap_err();
    assert!(err.to_string().contains("RANKING_LIMIT"));

    set_var("RANKING_LIMIT", "0");
    assert!(DashboardConfig::from_env().is_err());

    // Cleanup
    clear_vars();
}
