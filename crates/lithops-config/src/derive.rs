//! Shared helpers for validation and derivation
//!
//! Units read typed values out of their section through these accessors so
//! that a wrongly typed value surfaces as [`Error::InvalidValue`] instead of
//! a panic deep inside a derivation.

use crate::document::Section;
use crate::{Error, Result};
use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

/// Prefix of every bucket name the platform derives.
pub const BUCKET_PREFIX: &str = "lithops";

const HASH_LEN: usize = 6;
const KEY_FRAGMENT_LEN: usize = 6;

/// Read a string value; absent is `Ok(None)`, wrong type is an error.
pub fn opt_str<'a>(section: &'a Section, backend: &str, key: &str) -> Result<Option<&'a str>> {
    match section.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(Error::invalid(
            backend,
            key,
            format!("expected a string, found {}", type_name(other)),
        )),
    }
}

/// Read a string value that must be present.
pub fn req_str<'a>(section: &'a Section, backend: &str, key: &str) -> Result<&'a str> {
    opt_str(section, backend, key)?.ok_or_else(|| Error::missing_key(backend, key))
}

/// Read a numeric value; absent is `Ok(None)`.
pub fn opt_f64(section: &Section, backend: &str, key: &str) -> Result<Option<f64>> {
    match section.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| Error::invalid(backend, key, "number out of range")),
        Some(other) => Err(Error::invalid(
            backend,
            key,
            format!("expected a number, found {}", type_name(other)),
        )),
    }
}

/// Read a non-negative integer value; absent is `Ok(None)`.
pub fn opt_u64(section: &Section, backend: &str, key: &str) -> Result<Option<u64>> {
    match section.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
            Error::invalid(backend, key, format!("expected a non-negative integer, found {n}"))
        }),
        Some(other) => Err(Error::invalid(
            backend,
            key,
            format!("expected an integer, found {}", type_name(other)),
        )),
    }
}

/// Check an integer value, when present, falls within `range`.
pub fn check_range(
    section: &Section,
    backend: &str,
    key: &str,
    range: std::ops::RangeInclusive<u64>,
) -> Result<()> {
    if let Some(value) = opt_u64(section, backend, key)? {
        if !range.contains(&value) {
            return Err(Error::invalid(
                backend,
                key,
                format!(
                    "{value} is outside the allowed range {}..={}",
                    range.start(),
                    range.end()
                ),
            ));
        }
    }
    Ok(())
}

/// Check a string value, when present, is one of `allowed`.
pub fn check_choice(section: &Section, backend: &str, key: &str, allowed: &[&str]) -> Result<()> {
    if let Some(value) = opt_str(section, backend, key)? {
        if !allowed.contains(&value) {
            return Err(Error::invalid(
                backend,
                key,
                format!("'{value}' is not one of {}", allowed.join(", ")),
            ));
        }
    }
    Ok(())
}

/// Check a numeric value, when present, is one of `allowed`.
pub fn check_number_choice(
    section: &Section,
    backend: &str,
    key: &str,
    allowed: &[f64],
) -> Result<()> {
    if let Some(value) = opt_f64(section, backend, key)? {
        if !allowed.iter().any(|a| (a - value).abs() < f64::EPSILON) {
            let allowed: Vec<String> = allowed.iter().map(f64::to_string).collect();
            return Err(Error::invalid(
                backend,
                key,
                format!("{value} is not one of {}", allowed.join(", ")),
            ));
        }
    }
    Ok(())
}

/// Check a URL value, when present, starts with `http://` or `https://`.
pub fn check_url(section: &Section, backend: &str, key: &str) -> Result<()> {
    if let Some(value) = opt_str(section, backend, key)? {
        if !(value.starts_with("http://") || value.starts_with("https://")) {
            return Err(Error::invalid(
                backend,
                key,
                format!("'{value}' must start with http:// or https://"),
            ));
        }
    }
    Ok(())
}

/// S3-style bucket names: 3 to 63 characters of lowercase letters, digits,
/// dots and dashes, starting and ending with a letter or digit.
static BUCKET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$").expect("Invalid bucket name regex")
});

/// Check a bucket name, when present, is valid for S3-style stores.
pub fn check_bucket_name(section: &Section, backend: &str, key: &str) -> Result<()> {
    if let Some(value) = opt_str(section, backend, key)? {
        if !BUCKET_REGEX.is_match(value) {
            return Err(Error::invalid(
                backend,
                key,
                format!("'{value}' is not a valid bucket name"),
            ));
        }
    }
    Ok(())
}

/// Insert `value` under `key` unless the key already holds a non-null value.
pub fn fill(section: &mut Section, key: &str, value: impl Into<Value>) {
    if is_absent(section, key) {
        section.insert(key.to_string(), value.into());
    }
}

/// Insert the value produced by `f` unless the key already holds a
/// non-null value.
pub fn fill_with<F>(section: &mut Section, key: &str, f: F) -> Result<()>
where
    F: FnOnce(&Section) -> Result<Value>,
{
    if is_absent(section, key) {
        let value = f(section)?;
        section.insert(key.to_string(), value);
    }
    Ok(())
}

/// Derive a stable, account-unique bucket name.
///
/// The name is `lithops-<hash6>-<keyfrag>` where `hash6` is the first six
/// hex characters of SHA-256 over `key`, `:` and `endpoint`, and `keyfrag`
/// is the first six ASCII alphanumerics of `key`, lower-cased. Identical
/// inputs always give identical names.
pub fn bucket_name(key: &str, endpoint: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.update(b":");
    hasher.update(endpoint.as_bytes());
    let hash = hex_prefix(&hasher.finalize(), HASH_LEN);

    let fragment: String = key
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(KEY_FRAGMENT_LEN)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if fragment.is_empty() {
        format!("{BUCKET_PREFIX}-{hash}")
    } else {
        format!("{BUCKET_PREFIX}-{hash}-{fragment}")
    }
}

/// Derive a stable bucket name without exposing any part of `seed`.
///
/// Used where the only stable account identifier is a secret (an API key,
/// a credentials path). The name is `lithops-<scope>-<hash6>` with `scope`
/// lower-cased and reduced to letters, digits and dashes.
pub fn scoped_bucket_name(scope: &str, seed: &str) -> String {
    let digest = Sha256::digest(seed.as_bytes());
    let hash = hex_prefix(&digest, HASH_LEN);
    let scope: String = scope
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let scope = scope.trim_matches('-');

    if scope.is_empty() {
        format!("{BUCKET_PREFIX}-{hash}")
    } else {
        format!("{BUCKET_PREFIX}-{scope}-{hash}")
    }
}

fn hex_prefix(bytes: &[u8], len: usize) -> String {
    bytes
        .iter()
        .flat_map(|b| [b >> 4, b & 0x0f])
        .take(len)
        .map(|nibble| char::from_digit(u32::from(nibble), 16).unwrap_or('0'))
        .collect()
}

/// Substitute `{region}` in an endpoint template.
pub fn regional_endpoint(template: &str, region: &str) -> String {
    template.replace("{region}", region)
}

/// Host part of a URL: scheme, credentials, port and path stripped.
pub fn url_host(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    host.split(':').next().unwrap_or(host)
}

/// `true` when the key is missing or explicitly `null`.
pub fn is_absent(section: &Section, key: &str) -> bool {
    matches!(section.get(key), None | Some(Value::Null))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn section(value: Value) -> Section {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test sections are objects"),
        }
    }

    #[test]
    fn bucket_name_is_deterministic() {
        let a = bucket_name("AKIAEXAMPLE", "https://s3.example.com");
        let b = bucket_name("AKIAEXAMPLE", "https://s3.example.com");
        assert_eq!(a, b);
        assert!(a.starts_with("lithops-"));
        assert!(a.ends_with("-akiaex"), "got: {a}");
        assert_eq!(a.len(), "lithops-".len() + 6 + "-akiaex".len());
    }

    #[test]
    fn bucket_name_depends_on_endpoint() {
        let a = bucket_name("AKIAEXAMPLE", "https://s3.example.com");
        let b = bucket_name("AKIAEXAMPLE", "https://s3.other.com");
        assert_ne!(a, b);
    }

    #[test]
    fn bucket_name_without_alphanumerics_drops_fragment() {
        let name = bucket_name("---", "http://x");
        assert_eq!(name.matches('-').count(), 1, "got: {name}");
    }

    #[test]
    fn scoped_bucket_name_hides_the_seed() {
        let name = scoped_bucket_name("us-east", "very-secret-api-key");
        assert!(name.starts_with("lithops-us-east-"), "got: {name}");
        assert!(!name.contains("very"));
        assert_eq!(name, scoped_bucket_name("us-east", "very-secret-api-key"));
    }

    #[test]
    fn scoped_bucket_name_sanitizes_scope() {
        let name = scoped_bucket_name("EU_West/1", "seed");
        assert!(name.starts_with("lithops-eu-west-1-"), "got: {name}");
    }

    #[rstest]
    #[case("https://s3.us-east.cloud-object-storage.appdomain.cloud", "s3.us-east.cloud-object-storage.appdomain.cloud")]
    #[case("http://user:pw@10.0.0.1:9000/path", "10.0.0.1")]
    #[case("us-south.functions.cloud.ibm.com", "us-south.functions.cloud.ibm.com")]
    fn url_host_strips_everything_but_the_host(#[case] url: &str, #[case] host: &str) {
        assert_eq!(url_host(url), host);
    }

    #[rstest]
    #[case(json!({"endpoint": "https://x"}), true)]
    #[case(json!({"endpoint": "http://x"}), true)]
    #[case(json!({"endpoint": "ftp://x"}), false)]
    #[case(json!({"endpoint": "s3.example.com"}), false)]
    #[case(json!({}), true)]
    fn check_url_cases(#[case] value: Value, #[case] ok: bool) {
        assert_eq!(check_url(&section(value), "minio", "endpoint").is_ok(), ok);
    }

    #[rstest]
    #[case("my-bucket", true)]
    #[case("lithops-abc123-akiaex", true)]
    #[case("My_Bucket", false)]
    #[case("ab", false)]
    #[case("-leading", false)]
    fn check_bucket_name_cases(#[case] name: &str, #[case] ok: bool) {
        let s = section(json!({ "storage_bucket": name }));
        assert_eq!(check_bucket_name(&s, "aws_s3", "storage_bucket").is_ok(), ok);
    }

    #[test]
    fn wrong_type_is_invalid_value() {
        let s = section(json!({"region": 5}));
        let err = req_str(&s, "aws_s3", "region").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref key, .. } if key == "region"));
    }

    #[test]
    fn check_range_rejects_out_of_range() {
        let s = section(json!({"runtime_memory": 64}));
        assert!(check_range(&s, "aws_lambda", "runtime_memory", 128..=10240).is_err());
        let s = section(json!({"runtime_memory": 2048}));
        assert!(check_range(&s, "aws_lambda", "runtime_memory", 128..=10240).is_ok());
    }

    #[test]
    fn fill_never_overrides() {
        let mut s = section(json!({"port": 7000}));
        fill(&mut s, "port", 6379);
        fill(&mut s, "db", 0);
        assert_eq!(s["port"], 7000);
        assert_eq!(s["db"], 0);
    }
}
