// veilog-core/tests/engine_integration_tests.rs
//! End-to-end engine behavior over the public API: the three default
//! template forms, ciphertext recoverability, failure isolation and the
//! documented boundary cases.

use std::sync::Arc;

use veilog_core::{
    CipherStrategy, FieldConfig, FieldSpec, RedactionEngine, StrategyProvider, StrategyRegistry,
    VeilogError, XxteaStrategy,
};

const KEY: &str = "a$fHDF&G;lNFj%ea";

fn default_engine() -> RedactionEngine {
    RedactionEngine::new(FieldConfig::default_config()).unwrap()
}

#[test_log::test]
fn end_to_end_json_line_matches_the_legacy_ciphertext() {
    let engine = default_engine();
    let input = r#"{"mobile":"13979923451","status":"OK"}"#;
    let output = engine.redact(input);
    assert_eq!(output, r#"{"mobile":"jaCN0eYnS/gHDQrsyznQxg==","status":"OK"}"#);

    // Key holders can recover the value.
    let recovered = XxteaStrategy::new(KEY)
        .decrypt("jaCN0eYnS/gHDQrsyznQxg==")
        .unwrap();
    assert_eq!(recovered, "13979923451");
}

#[test]
fn default_template_matches_all_three_forms() {
    let engine = default_engine();

    for input in [
        "mobile:13900000000",
        "mobile=13900000000",
        r#"{"user":"u1","mobile":"13900000000","flag":true}"#,
    ] {
        let output = engine.redact(input);
        assert!(!output.contains("13900000000"), "leaked from {input:?}: {output}");
        assert!(output.contains("mobile"), "field token lost in {output}");
    }
}

#[test]
fn values_survive_round_trip_through_the_engine() {
    let engine = default_engine();
    let output = engine.redact("mobile:13979923451");
    let ciphertext = output.strip_prefix("mobile:").unwrap();
    assert_eq!(XxteaStrategy::new(KEY).decrypt(ciphertext).unwrap(), "13979923451");
}

#[test]
fn redact_is_idempotent_when_no_field_name_occurs() {
    let engine = default_engine();
    let message = "GET /health 200 in 3ms";
    assert_eq!(engine.redact(message), message);
}

#[test]
fn redaction_is_deterministic() {
    let engine = default_engine();
    let message = "mobile:13979923451,trace:abc";
    assert_eq!(engine.redact(message), engine.redact(message));
}

#[test]
fn empty_captured_value_is_preserved() {
    let engine = default_engine();
    // Policy: empty values are ciphered; both shipped strategies map empty
    // to empty, so the line is unchanged.
    assert_eq!(engine.redact("mobile:"), "mobile:");
}

#[test]
fn trailing_escape_runs_are_stripped_before_ciphering() {
    let engine = default_engine();
    // Escaped-JSON form as it appears inside a toString dump.
    let input = r#"payload={\"mobile\":\"13979923451\",\"ok\":1}"#;
    let output = engine.redact(input);
    assert!(!output.contains("13979923451"), "leaked: {output}");
    // The backslash-quote marker is echoed on both sides of the ciphertext.
    assert!(output.contains(r#"mobile\":\"jaCN0eYnS/gHDQrsyznQxg==\""#), "marker not echoed: {output}");
}

struct FailingStrategy;

impl CipherStrategy for FailingStrategy {
    fn encrypt(&self, _value: &str) -> veilog_core::errors::Result<String> {
        Err(VeilogError::Fatal("cipher unavailable".to_string()))
    }
    fn decrypt(&self, _value: &str) -> veilog_core::errors::Result<String> {
        Err(VeilogError::Fatal("cipher unavailable".to_string()))
    }
}

struct FailingProvider;

impl StrategyProvider for FailingProvider {
    fn type_name(&self) -> &'static str {
        "FAIL"
    }
    fn create(&self, _key: &str) -> Arc<dyn CipherStrategy> {
        Arc::new(FailingStrategy)
    }
}

#[test_log::test]
fn one_broken_field_does_not_poison_the_rest() {
    let mut registry = StrategyRegistry::builtin();
    registry.register(Box::new(FailingProvider));

    let mut config = FieldConfig::default();
    config.add_field(FieldSpec::new("email", "FAIL", ""));
    config.add_field(FieldSpec::new("mobile", "XXTEA", KEY));
    let engine = RedactionEngine::with_registry(config, &registry).unwrap();

    let output = engine.redact("email:a@b.c, mobile:13979923451, done");
    assert!(output.contains("[ENCRYPTION_ERROR for email: "), "no marker: {output}");
    assert!(!output.contains("a@b.c"), "broken field leaked: {output}");
    assert!(!output.contains("13979923451"), "good field leaked: {output}");
    assert!(output.contains("jaCN0eYnS/gHDQrsyznQxg=="), "good field not ciphered: {output}");
    assert!(output.ends_with(", done"));
}

#[test]
fn unknown_cipher_type_fails_engine_construction() {
    let mut config = FieldConfig::default_config();
    config.add_field(FieldSpec::new("email", "ROT13", ""));
    assert!(matches!(
        RedactionEngine::new(config),
        Err(VeilogError::UnknownCipherType(_))
    ));
}

#[test]
fn ad_hoc_field_set_redacts_without_touching_the_table() {
    let engine = default_engine();
    let ad_hoc = engine
        .ad_hoc_field("mobile", &[r"(%s\[)([^\]]*)".to_string()])
        .unwrap();

    let output = engine.redact_with("mobile[13979923451]", &[ad_hoc]);
    assert!(!output.contains("13979923451"));

    // The persistent table is unchanged: the bracket form is not part of
    // the default template and passes through `redact`.
    let untouched = engine.redact("mobile[13979923451]");
    assert!(untouched.contains("13979923451"));
}

#[test]
fn non_ascii_values_round_trip() {
    let settings_free = FieldConfig::default_config();
    let engine = RedactionEngine::new(settings_free).unwrap();
    let output = engine.redact("mobile:许文强139,next:x");
    assert!(!output.contains("许文强139"));
    let ciphertext = output
        .strip_prefix("mobile:")
        .and_then(|rest| rest.strip_suffix(",next:x"))
        .unwrap();
    assert_eq!(XxteaStrategy::new(KEY).decrypt(ciphertext).unwrap(), "许文强139");
}
