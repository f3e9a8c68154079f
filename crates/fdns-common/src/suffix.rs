//! Registrable-domain decomposition
//!
//! Splits a hostname into its public suffix, the registrable name under that
//! suffix, and any remaining subdomain labels, using the compiled public
//! suffix list carried by the `psl` crate. Consumers treat this as a pure
//! function: hostname in, parts out, no failure channel.

use psl::{List, Psl};

/// Decomposed hostname parts.
///
/// All three fields are `None` when the hostname has no registrable domain:
/// bare public suffixes (`com`, `co.uk`), names whose final label is not on
/// the public suffix list (IP literals, made-up TLDs), and empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainParts {
    /// Registrable name without the suffix (`example` for `www.example.co.uk`)
    pub domain_without_suffix: Option<String>,
    /// Matched public suffix (`co.uk`)
    pub public_suffix: Option<String>,
    /// Labels left of the registrable domain (`www`), if any
    pub subdomain: Option<String>,
}

/// Decompose `hostname` into domain-suffix parts.
///
/// Input is normalized first: surrounding whitespace and a trailing root dot
/// are removed, and the name is lowercased. Only suffixes actually present
/// on the public suffix list count; an unlisted final label means the name
/// has no registrable domain and yields empty parts.
pub fn resolve(hostname: &str) -> DomainParts {
    let host = hostname.trim().trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        return DomainParts::default();
    }

    let Some(domain) = List.domain(host.as_bytes()) else {
        return DomainParts::default();
    };
    if !domain.suffix().is_known() {
        return DomainParts::default();
    }

    // psl operates on the byte slice of `host`, so both views are valid UTF-8.
    let (Ok(registrable), Ok(suffix)) = (
        std::str::from_utf8(domain.as_bytes()),
        std::str::from_utf8(domain.suffix().as_bytes()),
    ) else {
        return DomainParts::default();
    };

    let Some(without_suffix) = registrable
        .strip_suffix(suffix)
        .and_then(|s| s.strip_suffix('.'))
    else {
        return DomainParts::default();
    };

    let subdomain = host
        .strip_suffix(registrable)
        .and_then(|s| s.strip_suffix('.'))
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    DomainParts {
        domain_without_suffix: Some(without_suffix.to_string()),
        public_suffix: Some(suffix.to_string()),
        subdomain,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_subdomain() {
        let parts = resolve("www.example.co.uk");
        assert_eq!(parts.domain_without_suffix.as_deref(), Some("example"));
        assert_eq!(parts.public_suffix.as_deref(), Some("co.uk"));
        assert_eq!(parts.subdomain.as_deref(), Some("www"));
    }

    #[test]
    fn test_resolve_bare_registrable_domain() {
        let parts = resolve("example.com");
        assert_eq!(parts.domain_without_suffix.as_deref(), Some("example"));
        assert_eq!(parts.public_suffix.as_deref(), Some("com"));
        assert_eq!(parts.subdomain, None);
    }

    #[test]
    fn test_resolve_multi_label_subdomain() {
        let parts = resolve("a.b.example.com");
        assert_eq!(parts.domain_without_suffix.as_deref(), Some("example"));
        assert_eq!(parts.subdomain.as_deref(), Some("a.b"));
    }

    #[test]
    fn test_bare_suffixes_have_no_registrable_domain() {
        assert_eq!(resolve("com"), DomainParts::default());
        assert_eq!(resolve("co.uk"), DomainParts::default());
    }

    #[test]
    fn test_single_unlisted_label_is_rejected() {
        // "bar" is not a label under any listed suffix
        assert_eq!(resolve("bar"), DomainParts::default());
    }

    #[test]
    fn test_ip_literal_is_rejected() {
        assert_eq!(resolve("1.2.3.4"), DomainParts::default());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(resolve(""), DomainParts::default());
        assert_eq!(resolve("   "), DomainParts::default());
    }

    #[test]
    fn test_normalization() {
        // trailing root dot and mixed case
        let parts = resolve("WWW.Example.COM.");
        assert_eq!(parts.domain_without_suffix.as_deref(), Some("example"));
        assert_eq!(parts.subdomain.as_deref(), Some("www"));
    }
}
