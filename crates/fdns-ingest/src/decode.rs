//! Per-line record decoding
//!
//! One dataset line in, one decision out: a normalized record ready for the
//! batch buffer, or a classified skip. Decoding never fails the pipeline; a
//! malformed line costs that line only.

use fdns_common::suffix;
use fdns_common::types::{DomainRecord, RawRecord};

/// Hostnames may carry a wildcard prefix; they resolve to their base domain.
const WILDCARD_PREFIX: &str = "*.";

/// Why a line produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The line is not valid JSON or lacks a required field
    InvalidJson(String),
    /// The hostname does not decompose into a registrable domain (bare
    /// suffix, IP literal, unlisted TLD)
    NoRegistrableDomain,
}

/// Outcome of decoding one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Record(DomainRecord),
    Skip(SkipReason),
}

/// Decode one dataset line into a [`DomainRecord`].
pub fn decode(line: &str) -> Decoded {
    let raw: RawRecord = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(err) => return Decoded::Skip(SkipReason::InvalidJson(err.to_string())),
    };

    let hostname = raw.name.strip_prefix(WILDCARD_PREFIX).unwrap_or(&raw.name);
    let parts = suffix::resolve(hostname);

    match parts.domain_without_suffix {
        Some(domain_without_suffix) if !domain_without_suffix.is_empty() => {
            Decoded::Record(DomainRecord {
                domain_without_suffix,
                public_suffix: parts.public_suffix.unwrap_or_default(),
                subdomain: parts.subdomain.unwrap_or_default(),
                record_type: raw.record_type,
                value: raw.value,
            })
        }
        _ => Decoded::Skip(SkipReason::NoRegistrableDomain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str) -> String {
        format!(r#"{{"name":"{name}","type":"a","value":"1.2.3.4"}}"#)
    }

    fn decode_record(name: &str) -> DomainRecord {
        match decode(&line(name)) {
            Decoded::Record(record) => record,
            other => panic!("expected record for {name:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_plain_hostname() {
        let record = decode_record("www.example.co.uk");
        assert_eq!(record.domain_without_suffix, "example");
        assert_eq!(record.public_suffix, "co.uk");
        assert_eq!(record.subdomain, "www");
        assert_eq!(record.record_type, "a");
        assert_eq!(record.value, "1.2.3.4");
    }

    #[test]
    fn test_wildcard_resolves_like_base_domain() {
        assert_eq!(
            decode_record("*.example.co.uk"),
            decode_record("example.co.uk")
        );
    }

    #[test]
    fn test_wildcard_with_subdomain() {
        let record = decode_record("*.foo.example.com");
        assert_eq!(record.domain_without_suffix, "example");
        assert_eq!(record.subdomain, "foo");
    }

    #[test]
    fn test_no_registrable_domain_is_dropped() {
        for name in ["bar", "com", "1.2.3.4"] {
            assert_eq!(
                decode(&line(name)),
                Decoded::Skip(SkipReason::NoRegistrableDomain),
                "{name}"
            );
        }
    }

    #[test]
    fn test_invalid_json_is_a_recoverable_skip() {
        assert!(matches!(
            decode("{not json"),
            Decoded::Skip(SkipReason::InvalidJson(_))
        ));
    }

    #[test]
    fn test_missing_required_field_is_a_recoverable_skip() {
        assert!(matches!(
            decode(r#"{"name":"www.example.com","type":"a"}"#),
            Decoded::Skip(SkipReason::InvalidJson(_))
        ));
    }

    #[test]
    fn test_empty_line_is_a_recoverable_skip() {
        assert!(matches!(
            decode(""),
            Decoded::Skip(SkipReason::InvalidJson(_))
        ));
    }
}
