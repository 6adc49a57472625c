use std::collections::HashMap;

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_with(&dir.path().join("missing.toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
    assert!(settings.session_path.ends_with("news_view/session.json"));
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("news.toml");
    fs::write(
        &path,
        "api_url = \"http://127.0.0.1:5000/\"\nsession_path = \"/tmp/news-session.json\"\nstory_limit = 10\n",
    )
    .expect("write settings");

    let settings = load_settings_with(&path, env_from(&[]));

    assert_eq!(settings.api_url, "http://127.0.0.1:5000");
    assert_eq!(settings.session_path, PathBuf::from("/tmp/news-session.json"));
    assert_eq!(settings.story_limit, 10);
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("news.toml");
    fs::write(&path, "api_url = \"http://file.example\"\n").expect("write settings");

    let settings = load_settings_with(
        &path,
        env_from(&[
            ("NEWS_API_URL", "http://env.example"),
            ("APP__API_URL", "http://app.example"),
            ("NEWS_SESSION_PATH", "/var/tmp/s.json"),
            ("APP__STORY_LIMIT", "5"),
        ]),
    );

    assert_eq!(settings.api_url, "http://app.example");
    assert_eq!(settings.session_path, PathBuf::from("/var/tmp/s.json"));
    assert_eq!(settings.story_limit, 5);
}

#[test]
fn invalid_values_are_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("news.toml");
    fs::write(&path, "story_limit = \"lots\"\n").expect("write settings");

    let settings = load_settings_with(&path, env_from(&[("APP__STORY_LIMIT", "0")]));

    assert_eq!(settings.story_limit, DEFAULT_STORY_LIMIT);
}

#[test]
fn zero_story_limit_in_file_keeps_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("news.toml");
    fs::write(&path, "api_url = \"http://file.example\"\nstory_limit = 0\n")
        .expect("write settings");

    let settings = load_settings_with(&path, env_from(&[]));

    assert_eq!(settings.api_url, "http://file.example");
    assert_eq!(settings.story_limit, DEFAULT_STORY_LIMIT);
}

#[test]
fn normalizes_api_urls() {
    assert_eq!(normalize_api_url("  "), DEFAULT_API_URL);
    assert_eq!(
        normalize_api_url("news.example.com/"),
        "https://news.example.com"
    );
    assert_eq!(
        normalize_api_url("http://localhost:3000///"),
        "http://localhost:3000"
    );
}
