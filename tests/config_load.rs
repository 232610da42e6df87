// tests/config_load.rs
use news_stream_pipeline::config::{
    load_default, load_from, PipelineConfig, DEFAULT_SCHEDULE, ENV_CONFIG_PATH, ENV_METRICS_ADDR,
};
use std::{env, fs};

#[serial_test::serial]
#[test]
fn parse_toml_and_json_paths() {
    env::remove_var(ENV_METRICS_ADDR);
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("pipeline.toml");
    fs::write(
        &p_toml,
        r#"
schedule = "*/5 * * * * *"
run_on_startup = false
max_delivery_batch = 4
"#,
    )
    .unwrap();
    let cfg = load_from(&p_toml).unwrap();
    assert_eq!(cfg.schedule, "*/5 * * * * *");
    assert!(!cfg.run_on_startup);
    assert_eq!(cfg.max_delivery_batch, 4);
    assert_eq!(cfg.hub_name, "news");
    assert_eq!(cfg.trigger_schedule().unwrap().seconds().len(), 12);

    let p_json = dir.path().join("pipeline.json");
    fs::write(&p_json, r#"{"hub_name": "wire", "metrics_addr": "127.0.0.1:9100"}"#).unwrap();
    let cj = load_from(&p_json).unwrap();
    assert_eq!(cj.hub_name, "wire");
    assert_eq!(cj.metrics_addr.as_deref(), Some("127.0.0.1:9100"));
    assert_eq!(cj.schedule, DEFAULT_SCHEDULE);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_METRICS_ADDR);

    // 1) Nothing present -> defaults
    assert_eq!(load_default().unwrap(), PipelineConfig::default());

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("pipeline.toml"), r#"hub_name = "from-toml""#).unwrap();
    assert_eq!(load_default().unwrap().hub_name, "from-toml");

    // 3) Env path wins
    let p_env = tmp.path().join("override.json");
    fs::write(&p_env, r#"{"hub_name": "from-env"}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(load_default().unwrap().hub_name, "from-env");

    // 4) Env path to a missing file is an error
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml"));
    assert!(load_default().is_err());
    env::remove_var(ENV_CONFIG_PATH);

    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn metrics_addr_env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("pipeline.toml");
    fs::write(&p, r#"metrics_addr = "127.0.0.1:1""#).unwrap();

    env::set_var(ENV_METRICS_ADDR, "0.0.0.0:9200");
    let cfg = load_from(&p).unwrap();
    env::remove_var(ENV_METRICS_ADDR);

    assert_eq!(cfg.metrics_addr.as_deref(), Some("0.0.0.0:9200"));
}
