// Centralized integration suite for the validation engine; exercises schema
// resolution, the fallback cache lifecycle, and the end-to-end issue contract
// so changes surface in one place.
mod support;

use policyvet::{
    PathSegment, SchemaError, SchemaRepository, available_channels, validate_document,
    validate_payload,
};
use serde_json::{Value, json};
use std::fs;
use std::sync::Arc;
use std::thread;
use support::{empty_dirs, repository, shipped_repository, write_schema};
use tempfile::TempDir;

#[test]
fn shipped_release_schema_accepts_a_documented_profile() {
    let cache = TempDir::new().unwrap();
    let repo = shipped_repository(&cache);
    let schema = repo.load("release-144").unwrap();
    assert_eq!(schema.channel, "release-144");

    let document = json!({
        "BlockAboutConfig": true,
        "DisableAppUpdate": true,
        "DisableTelemetry": true,
        "HttpAllowlist": ["http://example.org"],
        "RequestedLocales": ["de", "en-US"],
        "SSLVersionMin": "tls1.2",
        "Extensions": {
            "Install": ["https://addons.mozilla.org/firefox/downloads/somefile.xpi"],
            "Uninstall": ["bad_addon_id@mozilla.org"],
            "Locked": ["addon_id@mozilla.org"]
        },
        "Cookies": {
            "Allow": ["https://example.org"],
            "Default": false
        }
    });

    let result = validate_document(&document, &schema);
    assert!(result.ok, "issues: {:?}", result.issues);
}

#[test]
fn shipped_schema_rejects_http_allowlist_violation() {
    let cache = TempDir::new().unwrap();
    let repo = shipped_repository(&cache);
    let schema = repo.load("release-144").unwrap();

    let result = validate_document(&json!({"HttpAllowlist": ["http://evil.example"]}), &schema);
    assert!(!result.ok);
    assert_eq!(result.issues.len(), 1);

    let issue = &result.issues[0];
    assert_eq!(issue.policy.as_deref(), Some("HttpAllowlist"));
    assert_eq!(
        issue.path,
        vec![
            PathSegment::from("policies"),
            PathSegment::from("HttpAllowlist"),
            PathSegment::from(0usize),
        ]
    );
    assert!(issue.message.contains("not allowed"));
}

#[test]
fn shipped_esr_schema_reports_release_only_policies_as_unknown() {
    let cache = TempDir::new().unwrap();
    let repo = shipped_repository(&cache);
    let schema = repo.load("esr-140").unwrap();

    // OverrideFirstRunPage ships only in the release schema.
    let result = validate_document(&json!({"OverrideFirstRunPage": "about:blank"}), &schema);
    assert_eq!(result.issues.len(), 1);
    assert!(
        result.issues[0]
            .message
            .contains("Unknown policy 'OverrideFirstRunPage'")
    );
}

#[test]
fn issue_contract_shape_matches_the_external_interface() {
    let cache = TempDir::new().unwrap();
    let repo = shipped_repository(&cache);
    let schema = repo.load("release-144").unwrap();

    let result = validate_document(&json!([1, 2, 3]), &schema);
    let encoded = serde_json::to_value(&result).unwrap();

    assert_eq!(encoded.get("ok"), Some(&json!(false)));
    let issues = encoded.get("issues").and_then(Value::as_array).unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].get("policy"), Some(&json!(null)));
    assert_eq!(issues[0].get("path"), Some(&json!([])));
    assert_eq!(
        issues[0].get("message"),
        Some(&json!("Expected object with policy mappings"))
    );
}

#[test]
fn fallback_stubs_are_cached_for_every_supported_channel() {
    let dirs = empty_dirs();
    let repo = repository(&dirs);

    for (channel, filename) in available_channels() {
        let schema = repo.load(channel).unwrap();
        assert_eq!(schema.source, "policyvet-fallback");
        let cached = dirs.cache.path().join(filename);
        assert!(cached.is_file(), "missing cached stub {}", cached.display());

        // The cached copy must itself be a loadable schema.
        let reloaded = SchemaRepository::new(dirs.schemas.path(), dirs.cache.path())
            .load(channel)
            .unwrap();
        assert_eq!(reloaded.channel, schema.channel);
        assert_eq!(reloaded.policies.len(), schema.policies.len());
    }
}

#[test]
fn corrupted_cache_files_fail_with_a_parse_error() {
    let dirs = empty_dirs();
    fs::write(
        dirs.cache.path().join("firefox-esr-140.json"),
        "{not json at all",
    )
    .unwrap();

    let err = repository(&dirs).load("esr-140").unwrap_err();
    assert!(matches!(err, SchemaError::Parse { .. }));
}

#[test]
fn payload_helper_selects_the_channel_and_validates_policies() {
    let cache = TempDir::new().unwrap();
    let repo = shipped_repository(&cache);

    let payload = json!({
        "channel": "esr-140",
        "name": "Test profile",
        "policies": {
            "DisableAppUpdate": true,
            "HttpAllowlist": ["http://example.org"]
        }
    });
    let result = validate_payload(&payload, &repo).unwrap();
    assert!(result.ok, "issues: {:?}", result.issues);

    let bad = json!({
        "channel": "esr-140",
        "policies": {
            "HttpAllowlist": ["http://evil.example"]
        }
    });
    let result = validate_payload(&bad, &repo).unwrap();
    assert!(!result.ok);
    assert!(result.issues[0].message.contains("not allowed"));
}

#[test]
fn payload_helper_defaults_the_channel_and_rejects_non_mapping_policies() {
    let cache = TempDir::new().unwrap();
    let repo = shipped_repository(&cache);

    // No channel: release-144 is assumed; empty policies are valid.
    let result = validate_payload(&json!({"name": "empty"}), &repo).unwrap();
    assert!(result.ok);

    let result = validate_payload(&json!({"policies": [1, 2, 3]}), &repo).unwrap();
    assert_eq!(result.issues.len(), 1);
    let issue = &result.issues[0];
    assert_eq!(issue.policy, None);
    assert_eq!(issue.path, vec![PathSegment::from("policies")]);
    assert_eq!(issue.message, "Expected object with policy mappings");
}

#[test]
fn payload_helper_propagates_unsupported_channels() {
    let cache = TempDir::new().unwrap();
    let repo = shipped_repository(&cache);

    let err = validate_payload(&json!({"channel": "beta-999", "policies": {}}), &repo)
        .unwrap_err();
    match err {
        SchemaError::UnsupportedChannel { channel, supported } => {
            assert_eq!(channel, "beta-999");
            assert!(supported.contains("release-144"));
        }
        other => panic!("expected UnsupportedChannel, got {other:?}"),
    }
}

#[test]
fn custom_schema_dir_overrides_the_shipped_files() {
    let dirs = empty_dirs();
    write_schema(
        dirs.schemas.path(),
        "firefox-release-144.json",
        &json!({
            "channel": "release-144",
            "version": "144.0",
            "source": "suite-fixture",
            "policies": {
                "DisableAppUpdate": {"id": "DisableAppUpdate", "type": "boolean"}
            }
        }),
    );

    let repo = repository(&dirs);
    let schema = repo.load("release-144").unwrap();
    assert_eq!(schema.source, "suite-fixture");

    // A policy present in the shipped files but not in this fixture is
    // unknown here.
    let result = validate_document(&json!({"HttpAllowlist": ["http://example.org"]}), &schema);
    assert!(
        result.issues[0]
            .message
            .contains("Unknown policy 'HttpAllowlist'")
    );
}

#[test]
fn concurrent_loads_share_one_schema_and_validate_in_parallel() {
    let cache = TempDir::new().unwrap();
    let repo = Arc::new(shipped_repository(&cache));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let repo = repo.clone();
            thread::spawn(move || {
                let schema = repo.load("release-144").unwrap();
                let document = json!({
                    "DisableAppUpdate": worker % 2 == 0,
                    "SSLVersionMin": "tls1.2"
                });
                let result = validate_document(&document, &schema);
                assert!(result.ok, "issues: {:?}", result.issues);
                schema
            })
        })
        .collect();

    let schemas: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("validation thread panicked"))
        .collect();
    for schema in &schemas[1..] {
        assert!(Arc::ptr_eq(&schemas[0], schema));
    }
}

#[test]
fn validation_results_are_deterministic_across_runs() {
    let cache = TempDir::new().unwrap();
    let repo = shipped_repository(&cache);
    let schema = repo.load("release-144").unwrap();

    let document = json!({
        "ZUnknownPolicy": 1,
        "HttpAllowlist": [42, "http://evil.example"],
        "Extensions": {"Foo": [], "Install": [7]},
        "SSLVersionMin": "ssl3"
    });

    let first = validate_document(&document, &schema);
    let second = validate_document(&document, &schema);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert!(first.issues.len() >= 5);
}
