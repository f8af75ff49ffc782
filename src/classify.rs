/* src/classify.rs */

//! Prefix-table classification of normalized addresses.
//!
//! Matching is purely textual: `is_private_ip("010.0.0.1")` is false even
//! though a lenient parser would read it as `10.0.0.1`. IPv4-mapped IPv6 text
//! such as `::ffff:8.8.8.8` starts with the `::` prefix, so it is private until
//! it is unwrapped. Always normalize with [`cleanup_ip`](crate::cleanup_ip)
//! first.

use crate::address::is_valid_ip;
use crate::error::{BestIpError, Result};

/// Reserved and private ranges that are never routable on the internet.
pub const PRIVATE_PREFIXES: &[&str] = &[
    // "this" network
    "0.",
    // RFC 1918
    "10.",
    "192.168.",
    "172.16.", "172.17.", "172.18.", "172.19.", "172.20.", "172.21.", "172.22.", "172.23.",
    "172.24.", "172.25.", "172.26.", "172.27.", "172.28.", "172.29.", "172.30.", "172.31.",
    // carrier-grade NAT
    "100.64.", "100.65.", "100.66.", "100.67.", "100.68.", "100.69.", "100.70.", "100.71.",
    "100.72.", "100.73.", "100.74.", "100.75.", "100.76.", "100.77.", "100.78.", "100.79.",
    "100.80.", "100.81.", "100.82.", "100.83.", "100.84.", "100.85.", "100.86.", "100.87.",
    "100.88.", "100.89.", "100.90.", "100.91.", "100.92.", "100.93.", "100.94.", "100.95.",
    "100.96.", "100.97.", "100.98.", "100.99.", "100.100.", "100.101.", "100.102.", "100.103.",
    "100.104.", "100.105.", "100.106.", "100.107.", "100.108.", "100.109.", "100.110.",
    "100.111.", "100.112.", "100.113.", "100.114.", "100.115.", "100.116.", "100.117.",
    "100.118.", "100.119.", "100.120.", "100.121.", "100.122.", "100.123.", "100.124.",
    "100.125.", "100.126.", "100.127.",
    // link-local
    "169.254.",
    // IETF protocol assignments
    "192.0.0.",
    // benchmarking
    "198.18.",
    "198.19.",
    // multicast
    "224.", "225.", "226.", "227.", "228.", "229.", "230.", "231.", "232.", "233.", "234.",
    "235.", "236.", "237.", "238.", "239.",
    // reserved
    "240.", "241.", "242.", "243.", "244.", "245.", "246.", "247.", "248.", "249.", "250.",
    "251.", "252.", "253.", "254.", "255.",
    // unspecified, unique local, link/site-local, multicast
    "::",
    "fc",
    "fd",
    "fe",
    "ff",
];

/// Addresses that refer to the local host.
pub const LOOPBACK_PREFIXES: &[&str] = &["127.", "::1"];

/// Documentation ranges (TEST-NET-1/2/3 and `2001:db8::/32`).
///
/// Not part of the default tables; opt in with
/// [`IpClassifier::with_documentation_ranges`].
pub const DOCUMENTATION_PREFIXES: &[&str] = &["192.0.2.", "198.51.100.", "203.0.113.", "2001:db8:"];

/// Trust tier of an address, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressClass {
    /// Routable on the public internet.
    Public,
    /// Reserved or private, but not loopback.
    Private,
    /// The local host.
    Loopback,
    /// Not a syntactically valid address.
    Invalid,
}

/// Static prefix tables used to classify normalized addresses.
///
/// The non-public set is the private table plus the loopback table, so a
/// loopback address is never reported as public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpClassifier {
    private: Vec<String>,
    loopback: Vec<String>,
}

impl Default for IpClassifier {
    fn default() -> Self {
        Self {
            private: owned(PRIVATE_PREFIXES),
            loopback: owned(LOOPBACK_PREFIXES),
        }
    }
}

impl IpClassifier {
    /// Create a classifier with the default tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the private (non-loopback, non-public) prefix table.
    pub fn with_private_prefixes<I, S>(mut self, prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.private = checked(prefixes)?;
        Ok(self)
    }

    /// Replace the loopback prefix table.
    pub fn with_loopback_prefixes<I, S>(mut self, prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loopback = checked(prefixes)?;
        Ok(self)
    }

    /// Treat the documentation ranges as non-public too.
    pub fn with_documentation_ranges(mut self) -> Self {
        for prefix in DOCUMENTATION_PREFIXES {
            if !self.private.iter().any(|p| p == prefix) {
                self.private.push((*prefix).to_string());
            }
        }
        self
    }

    /// True if `ip` starts with any non-public prefix.
    pub fn is_private_ip(&self, ip: &str) -> bool {
        starts_with_any(ip, &self.private) || starts_with_any(ip, &self.loopback)
    }

    /// Negation of [`is_private_ip`](Self::is_private_ip).
    pub fn is_public_ip(&self, ip: &str) -> bool {
        !self.is_private_ip(ip)
    }

    /// True if `ip` starts with any loopback prefix.
    pub fn is_loopback_ip(&self, ip: &str) -> bool {
        starts_with_any(ip, &self.loopback)
    }

    /// Place an address in its trust tier.
    ///
    /// Unlike the prefix tests above, this validates first, so text that is
    /// not an address is `Invalid` rather than `Public`.
    pub fn classify(&self, ip: &str) -> AddressClass {
        if !is_valid_ip(ip) {
            AddressClass::Invalid
        } else if self.is_loopback_ip(ip) {
            AddressClass::Loopback
        } else if self.is_private_ip(ip) {
            AddressClass::Private
        } else {
            AddressClass::Public
        }
    }
}

fn starts_with_any(ip: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| ip.starts_with(prefix.as_str()))
}

fn owned(prefixes: &[&str]) -> Vec<String> {
    prefixes.iter().map(|p| (*p).to_string()).collect()
}

fn checked<I, S>(prefixes: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    prefixes
        .into_iter()
        .map(|p| {
            let p = p.into();
            if p.is_empty() {
                Err(BestIpError::InvalidPrefix)
            } else {
                Ok(p)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_ranges() {
        let c = IpClassifier::default();
        for ip in [
            "10.0.0.1",
            "172.20.1.1",
            "192.168.1.1",
            "100.64.0.1",
            "169.254.1.1",
            "fd00::1",
            "fe80::1",
        ] {
            assert!(c.is_private_ip(ip), "{ip}");
            assert!(!c.is_public_ip(ip), "{ip}");
        }
    }

    #[test]
    fn test_public_ranges() {
        let c = IpClassifier::default();
        for ip in [
            "177.139.233.139",
            "8.8.8.8",
            "172.32.0.1",
            "100.128.0.1",
            "2606:4700::1",
            "203.0.113.5",
        ] {
            assert!(c.is_public_ip(ip), "{ip}");
        }
    }

    #[test]
    fn test_loopback_is_never_public() {
        let c = IpClassifier::default();
        assert!(c.is_loopback_ip("127.0.0.1"));
        assert!(c.is_loopback_ip("::1"));
        assert!(c.is_private_ip("127.0.0.1"));
        assert!(!c.is_public_ip("::1"));
        assert!(!c.is_loopback_ip("10.0.0.1"));
    }

    #[test]
    fn test_prefix_match_is_textual() {
        let c = IpClassifier::default();
        // Mapped text hits the `::` prefix until it is unwrapped.
        assert!(c.is_private_ip("::ffff:8.8.8.8"));
        assert!(c.is_public_ip(&crate::cleanup_ip("::ffff:8.8.8.8")));
        assert!(!c.is_private_ip("010.0.0.1"));
        // Prefix tests do not validate.
        assert!(c.is_public_ip("garbage"));
    }

    #[test]
    fn test_classify() {
        let c = IpClassifier::default();
        assert_eq!(c.classify("177.139.233.139"), AddressClass::Public);
        assert_eq!(c.classify("10.0.0.1"), AddressClass::Private);
        assert_eq!(c.classify("127.0.0.1"), AddressClass::Loopback);
        assert_eq!(c.classify("::1"), AddressClass::Loopback);
        assert_eq!(c.classify("garbage"), AddressClass::Invalid);
        assert_eq!(c.classify(""), AddressClass::Invalid);
    }

    #[test]
    fn test_documentation_ranges_opt_in() {
        let c = IpClassifier::default();
        assert!(c.is_public_ip("198.51.100.7"));

        let c = c.with_documentation_ranges();
        assert!(c.is_private_ip("198.51.100.7"));
        assert!(c.is_private_ip("2001:db8::1"));
        assert_eq!(c.clone().with_documentation_ranges(), c);
    }

    #[test]
    fn test_custom_tables() {
        let c = IpClassifier::new()
            .with_private_prefixes(["10."])
            .unwrap()
            .with_loopback_prefixes(vec!["127.0.0.1".to_string()])
            .unwrap();

        assert!(c.is_public_ip("192.168.1.1"));
        assert!(c.is_private_ip("10.1.1.1"));
        assert!(c.is_loopback_ip("127.0.0.1"));
        assert!(!c.is_loopback_ip("127.0.0.2"));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = IpClassifier::new().with_private_prefixes(["10.", ""]).unwrap_err();
        assert_eq!(err, BestIpError::InvalidPrefix);
        assert!(IpClassifier::new().with_loopback_prefixes([""]).is_err());
    }
}
