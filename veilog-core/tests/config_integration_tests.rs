// veilog-core/tests/config_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;

use veilog_core::config::{FieldConfig, Settings, DEFAULT_CIPHER_KEY, DEFAULT_PATTERN};

#[test]
fn load_settings_file_and_build_fields() -> Result<()> {
    let yaml = r#"
encrypt.fields: mobile,email
mobile.encrypt.type: XXTEA
mobile.encrypt.key: a$fHDF&G;lNFj%ea
email.encrypt.type: BASE64
email.patterns: (%s=)([^,}\s]+)
"#;
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml.as_bytes())?;

    let settings = Settings::load_from_file(file.path())?;
    let config = FieldConfig::from_settings(&settings);

    assert_eq!(config.fields.len(), 2);
    let mobile = config.get("mobile").unwrap();
    assert_eq!(mobile.cipher_type, "XXTEA");
    assert_eq!(mobile.cipher_key, "a$fHDF&G;lNFj%ea");
    assert_eq!(mobile.patterns, vec![DEFAULT_PATTERN.to_string()]);

    let email = config.get("email").unwrap();
    assert_eq!(email.cipher_type, "BASE64");
    assert_eq!(email.patterns, vec![r"(%s=)([^,}\s]+)".to_string()]);
    Ok(())
}

#[test]
fn load_or_default_uses_the_settings_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"encrypt.fields: card\ncard.encrypt.type: BASE64\n")?;

    let config = FieldConfig::load_or_default(Some(file.path()));
    assert_eq!(config.fields.len(), 1);
    assert_eq!(config.fields[0].name, "card");
    assert_eq!(config.fields[0].cipher_type, "BASE64");
    Ok(())
}

#[test]
fn missing_settings_file_falls_back_to_the_default_field() {
    let config = FieldConfig::load_or_default(Some(std::path::Path::new(
        "/definitely/not/here/field-redact.yaml",
    )));
    assert_eq!(config.fields.len(), 1);
    assert_eq!(config.fields[0].name, "mobile");
    assert_eq!(config.fields[0].cipher_key, DEFAULT_CIPHER_KEY);
}

#[test]
fn unparsable_settings_fall_back_to_the_default_field() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(b"encrypt.fields:\n  nested: structure\n")?;

    let config = FieldConfig::load_or_default(Some(file.path()));
    assert_eq!(config.fields.len(), 1);
    assert_eq!(config.fields[0].name, "mobile");
    Ok(())
}

#[test]
fn field_list_entries_are_trimmed() {
    let settings = Settings::from_pairs([("encrypt.fields", " mobile , email ,, ")]);
    let config = FieldConfig::from_settings(&settings);
    let names: Vec<&str> = config.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["mobile", "email"]);
}

#[test]
fn pattern_override_list_is_split_and_trimmed() {
    let settings = Settings::from_pairs([
        ("encrypt.fields", "mobile"),
        ("mobile.patterns", r"(%s:)(\d+) , (%s=)(\d+)"),
    ]);
    let config = FieldConfig::from_settings(&settings);
    assert_eq!(
        config.get("mobile").unwrap().patterns,
        vec![r"(%s:)(\d+)".to_string(), r"(%s=)(\d+)".to_string()]
    );
}
