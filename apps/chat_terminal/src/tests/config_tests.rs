use super::{apply_env, apply_file, load_settings, normalize_server_url, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn adds_scheme_and_trailing_slash() {
    assert_eq!(
        normalize_server_url("localhost:5000").expect("normalize"),
        "http://localhost:5000/"
    );
    assert_eq!(
        normalize_server_url(" https://chat.example.com/bot ").expect("normalize"),
        "https://chat.example.com/bot/"
    );
}

#[test]
fn empty_server_url_falls_back_to_default() {
    assert_eq!(
        normalize_server_url("   ").expect("normalize"),
        Settings::default().server_url
    );
}

#[test]
fn rejects_non_http_scheme() {
    let err = normalize_server_url("ftp://files.example.com").expect_err("must fail");
    assert!(err.to_string().contains("unsupported scheme"), "{err}");
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "server_url = \"http://10.0.0.5:8080\"\nlog_filter = \"debug\"\n",
    )
    .expect("apply file");
    assert_eq!(settings.server_url, "http://10.0.0.5:8080");
    assert_eq!(settings.log_filter, "debug");
    assert_eq!(settings.rag_welcome, Settings::default().rag_welcome);
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "server_url = [1, 2").is_err());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("CHAT_SERVER_URL", "http://plain:1"),
        ("APP__SERVER_URL", "http://prefixed:2"),
        ("APP__RAG_WELCOME", "hi there"),
    ]);
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.server_url, "http://prefixed:2");
    assert_eq!(settings.rag_welcome, "hi there");
    assert_eq!(settings.log_filter, "warn");
}

#[test]
fn explicit_config_file_must_exist() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("chat_terminal_missing_{suffix}.toml"));

    let err = load_settings(Some(&missing)).expect_err("must fail");
    assert!(err.to_string().contains("failed to read config file"), "{err}");
}

#[test]
fn explicit_config_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("chat_terminal_config_{suffix}.toml"));
    fs::write(&path, "rag_welcome = \"Welcome to the handbook bot\"\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.rag_welcome, "Welcome to the handbook bot");
    assert!(settings.server_url.ends_with('/'));

    fs::remove_file(path).expect("cleanup");
}
