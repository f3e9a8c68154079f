//! Record shapes moved through the ingestion pipeline

use serde::{Deserialize, Serialize};

/// One line of the forward-DNS dataset, as published.
///
/// Real dataset lines carry additional fields (e.g. `timestamp`); anything
/// beyond the three we persist is ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    /// Hostname the record was observed for, possibly wildcard-prefixed
    /// (`*.example.com`)
    pub name: String,

    /// DNS record type (`a`, `cname`, ...)
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record value (address, target hostname, ...)
    pub value: String,
}

/// The unit persisted to the store.
///
/// Serializes with the collection's established field names
/// (`domainWithoutSuffix`, `publicSuffix`, `subdomain`, `type`, `value`).
///
/// Invariant: `domain_without_suffix` is non-empty. Records whose hostname
/// does not decompose into a registrable domain are dropped before one of
/// these is ever built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRecord {
    /// Registrable name without its public suffix (`example` for
    /// `www.example.co.uk`)
    pub domain_without_suffix: String,

    /// Public suffix the name is registered under (`co.uk`); empty when the
    /// resolver yields none
    pub public_suffix: String,

    /// Labels left of the registrable domain (`www`); empty when the
    /// hostname is the registrable domain itself
    pub subdomain: String,

    /// DNS record type, carried through from the raw record
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record value, carried through from the raw record
    pub value: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_ignores_extra_fields() {
        let line = r#"{"timestamp":"1643328400","name":"foo.example.com","type":"a","value":"1.2.3.4"}"#;
        let raw: RawRecord = serde_json::from_str(line).unwrap();
        assert_eq!(raw.name, "foo.example.com");
        assert_eq!(raw.record_type, "a");
        assert_eq!(raw.value, "1.2.3.4");
    }

    #[test]
    fn test_raw_record_missing_field_is_an_error() {
        let line = r#"{"name":"foo.example.com","type":"a"}"#;
        assert!(serde_json::from_str::<RawRecord>(line).is_err());
    }

    #[test]
    fn test_domain_record_wire_field_names() {
        let record = DomainRecord {
            domain_without_suffix: "example".to_string(),
            public_suffix: "co.uk".to_string(),
            subdomain: "www".to_string(),
            record_type: "a".to_string(),
            value: "1.2.3.4".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["domainWithoutSuffix"], "example");
        assert_eq!(json["publicSuffix"], "co.uk");
        assert_eq!(json["subdomain"], "www");
        assert_eq!(json["type"], "a");
        assert_eq!(json["value"], "1.2.3.4");
    }
}
