use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn defaults_with_only_read_token() {
    let cfg = AppConfig::from_lookup(lookup(&[("NEXT_PUBLIC_READ_ONLY", "ro-token")])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.auth_url, DEFAULT_AUTH_URL);
    assert_eq!(cfg.github_api_url, DEFAULT_GITHUB_API_URL);
    assert_eq!(cfg.cms_graphql_url, DEFAULT_CMS_GRAPHQL_URL);
    assert_eq!(cfg.cms_read_token, "ro-token");
    assert!(cfg.cms_write.is_none());
    assert_eq!(cfg.site_url, "http://127.0.0.1:3000");
    assert!(cfg.token_secret.is_none());
    assert_eq!(cfg.reveal_delay, Duration::from_millis(DEFAULT_REVEAL_DELAY_MS));
    assert_eq!(cfg.failure_policy, FailurePolicy::KeepLoading);
    assert_eq!(cfg.view_ttl, Duration::from_secs(DEFAULT_VIEW_TTL_SECS));
    assert_eq!(
        cfg.timeouts,
        HttpTimeouts { request_secs: DEFAULT_HTTP_TIMEOUT_SECS, connect_secs: DEFAULT_HTTP_CONNECT_TIMEOUT_SECS }
    );
}

#[test]
fn missing_read_token_errors() {
    let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("NEXT_PUBLIC_READ_ONLY")));
}

#[test]
fn blank_read_token_counts_as_missing() {
    let err = AppConfig::from_lookup(lookup(&[("NEXT_PUBLIC_READ_ONLY", "   ")])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(_)));
}

#[test]
fn parses_overrides() {
    let cfg = AppConfig::from_lookup(lookup(&[
        ("NEXT_PUBLIC_READ_ONLY", "ro"),
        ("PORT", "8080"),
        ("GITHUB_API_URL", "http://gh.test/"),
        ("REVEAL_DELAY_MS", "0"),
        ("FETCH_FAILURE_POLICY", "show-error"),
        ("USER_TOKEN_SECRET", "s3cret"),
        ("HTTP_TIMEOUT_SECS", "5"),
    ]))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.github_api_url, "http://gh.test");
    assert_eq!(cfg.site_url, "http://127.0.0.1:8080");
    assert_eq!(cfg.reveal_delay, Duration::ZERO);
    assert_eq!(cfg.failure_policy, FailurePolicy::ShowError);
    assert_eq!(cfg.token_secret.as_deref(), Some("s3cret"));
    assert_eq!(cfg.timeouts.request_secs, 5);
}

#[test]
fn cms_write_needs_token_and_model_id() {
    let only_token = AppConfig::from_lookup(lookup(&[
        ("NEXT_PUBLIC_READ_ONLY", "ro"),
        ("CMS_FULL_ACCESS_TOKEN", "full"),
    ]))
    .unwrap();
    assert!(only_token.cms_write.is_none());

    let both = AppConfig::from_lookup(lookup(&[
        ("NEXT_PUBLIC_READ_ONLY", "ro"),
        ("CMS_FULL_ACCESS_TOKEN", "full"),
        ("CMS_COMMUNITY_MODEL_ID", "972104"),
    ]))
    .unwrap();
    let write = both.cms_write.unwrap();
    assert_eq!(write.base_url, DEFAULT_CMS_MANAGEMENT_URL);
    assert_eq!(write.token, "full");
    assert_eq!(write.community_model_id, "972104");
}

#[test]
fn invalid_port_errors() {
    let err = AppConfig::from_lookup(lookup(&[("NEXT_PUBLIC_READ_ONLY", "ro"), ("PORT", "http")])).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("PORT"));
    assert!(msg.contains("http"));
}

#[test]
fn unknown_failure_policy_errors() {
    let err = AppConfig::from_lookup(lookup(&[
        ("NEXT_PUBLIC_READ_ONLY", "ro"),
        ("FETCH_FAILURE_POLICY", "retry"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "FETCH_FAILURE_POLICY", .. }));
}

#[test]
fn failure_policy_accepts_underscore_and_case() {
    assert_eq!(parse_failure_policy(Some("SHOW_ERROR")).unwrap(), FailurePolicy::ShowError);
    assert_eq!(parse_failure_policy(Some("Keep-Loading")).unwrap(), FailurePolicy::KeepLoading);
    assert_eq!(parse_failure_policy(None).unwrap(), FailurePolicy::KeepLoading);
}
