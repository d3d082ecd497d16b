use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Name of the rejected variable, if `result` is an `InvalidEnvVar` error.
fn invalid_var<T>(result: &Result<T, ConfigError>) -> Option<&str> {
    match result {
        Err(ConfigError::InvalidEnvVar { var, .. }) => Some(var.as_str()),
        _ => None,
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_rejects_unknown() {
    let result = parse_environment("staging");
    assert_eq!(
        invalid_var(&result),
        Some("TLVIEW_ENV"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.history_source, "location-history.json");
    assert_eq!(cfg.timezone, chrono_tz::Tz::UTC);
    assert_eq!(cfg.time_format, TimeFormat::TwentyFourHour);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "tlview/0.1 (timeline-viewer)");
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 1);
    assert!(cfg.google_maps_api_key.is_none());
    assert_eq!(cfg.places_base_url, "https://maps.googleapis.com");
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("TLVIEW_HISTORY_SOURCE", "https://example.com/history.json");
    map.insert("TLVIEW_TIMEZONE", "America/Los_Angeles");
    map.insert("TLVIEW_TIME_FORMAT", "12h");
    map.insert("TLVIEW_MAX_RETRIES", "0");
    map.insert("GOOGLE_MAPS_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.history_source, "https://example.com/history.json");
    assert_eq!(cfg.timezone, chrono_tz::America::Los_Angeles);
    assert_eq!(cfg.time_format, TimeFormat::TwelveHour);
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.google_maps_api_key.as_deref(), Some("secret-key"));
}

#[test]
fn build_app_config_fails_with_invalid_timezone() {
    let mut map = HashMap::new();
    map.insert("TLVIEW_TIMEZONE", "Mars/Olympus_Mons");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("TLVIEW_TIMEZONE"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_time_format() {
    let mut map = HashMap::new();
    map.insert("TLVIEW_TIME_FORMAT", "36h");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("TLVIEW_TIME_FORMAT"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("TLVIEW_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("TLVIEW_BIND_ADDR"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("TLVIEW_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("TLVIEW_REQUEST_TIMEOUT_SECS"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_blank_history_source() {
    let mut map = HashMap::new();
    map.insert("TLVIEW_HISTORY_SOURCE", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert_eq!(
        invalid_var(&result),
        Some("TLVIEW_HISTORY_SOURCE"),
        "got: {result:?}"
    );
}

#[test]
fn blank_api_key_is_treated_as_absent() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_MAPS_API_KEY", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.google_maps_api_key.is_none());
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_MAPS_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn time_format_parse() {
    assert_eq!(TimeFormat::parse("12H"), Some(TimeFormat::TwelveHour));
    assert_eq!(TimeFormat::parse("24h"), Some(TimeFormat::TwentyFourHour));
    assert_eq!(TimeFormat::parse("noon"), None);
}
