use jar_config::{Config, ConfigError, ConfigManager};
use jar_domain::{JarCategory, RoundingPolicy};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert!(!cfg.currency.is_empty());
    assert!(!cfg.locale.is_empty());
    assert_eq!(cfg.rounding, RoundingPolicy::PerJar);
    assert!(cfg.validate().is_ok());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded.currency, "VND");
    assert!(manager.config_path().ends_with("config/config.json"));
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.currency = "USD".to_string();
    cfg.locale = "en-US".to_string();
    cfg.rounding = RoundingPolicy::LargestRemainder;
    cfg.display_order = vec![JarCategory::Savings];
    cfg.chart.gap_degree = 2.0;

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency, "USD");
    assert_eq!(loaded.locale, "en-US");
    assert_eq!(loaded.rounding, RoundingPolicy::LargestRemainder);
    assert_eq!(loaded.display_order().categories()[0], JarCategory::Savings);
    assert_eq!(loaded.chart.geometry().gap_degree, 2.0);
}

#[test]
fn partial_file_fills_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "locale": "en-US", "currency": "USD" }"#).expect("write");

    let loaded = ConfigManager::new(path).load().expect("load config");
    assert!(loaded.ui_color_enabled);
    assert_eq!(loaded.default_total_balance, 1_000_000);
    assert_eq!(loaded.chart.size, 120.0);
    assert_eq!(loaded.chart.background_color, "#eee");
}

#[test]
fn invalid_chart_settings_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"));

    let mut cfg = Config::default();
    cfg.chart.stroke_width = 500.0;

    let err = manager.save(&cfg).expect_err("invalid stroke width");
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "chart.stroke_width",
            ..
        }
    ));
    assert!(!manager.config_path().exists());
}

#[test]
fn export_root_defaults_under_base_dir() {
    let dir = tempdir().expect("tempdir");
    let mut cfg = Config::default();
    assert_eq!(
        cfg.resolve_default_export_root(dir.path()),
        dir.path().join("exports")
    );

    cfg.default_export_root = Some(dir.path().join("elsewhere"));
    assert_eq!(
        cfg.resolve_default_export_root(dir.path()),
        dir.path().join("elsewhere")
    );
}
