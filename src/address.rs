/* src/address.rs */

//! Normalization and syntactic validation of raw address strings.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Textual prefix of an IPv4-mapped IPv6 address in canonical form.
pub const IPV4_MAPPED_PREFIX: &str = "::ffff:";

/// Canonicalize a raw address string.
///
/// IPv4 comes back in dotted-decimal form, IPv6 in canonical colon-hex form
/// with the IPv4-mapped prefix stripped. Anything that parses as neither is
/// returned trimmed but otherwise untouched, so callers must re-validate.
///
/// ```rust
/// use best_ip::cleanup_ip;
///
/// assert_eq!(cleanup_ip(" ::ffff:192.168.1.1 "), "192.168.1.1");
/// assert_eq!(cleanup_ip("2001:DB8:0::1"), "2001:db8::1");
/// assert_eq!(cleanup_ip("unknown"), "unknown");
/// ```
pub fn cleanup_ip(ip: &str) -> String {
    let ip = ip.trim();

    if let Ok(v4) = ip.parse::<Ipv4Addr>() {
        return v4.to_string();
    }

    if let Ok(v6) = ip.parse::<Ipv6Addr>() {
        let canonical = v6.to_string();
        // The remainder is returned as-is, even when it is not dotted-quad.
        return match canonical.strip_prefix(IPV4_MAPPED_PREFIX) {
            Some(embedded) => embedded.to_string(),
            None => canonical,
        };
    }

    ip.to_string()
}

/// Strict dotted-quad check. Shorthand such as `127.1` is rejected.
pub fn is_valid_ipv4(ip: &str) -> bool {
    ip.parse::<Ipv4Addr>().is_ok()
}

/// Strict IPv6 check, accepting `::` compression and an embedded IPv4 tail.
pub fn is_valid_ipv6(ip: &str) -> bool {
    ip.parse::<Ipv6Addr>().is_ok()
}

/// Valid in either address family.
pub fn is_valid_ip(ip: &str) -> bool {
    is_valid_ipv4(ip) || is_valid_ipv6(ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_ipv4_is_idempotent() {
        let once = cleanup_ip("  177.139.233.139 ");
        assert_eq!(once, "177.139.233.139");
        assert_eq!(cleanup_ip(&once), once);
    }

    #[test]
    fn test_cleanup_ipv6_is_idempotent() {
        let once = cleanup_ip("2001:0DB8:0000:0000:0000:0000:0000:0001");
        assert_eq!(once, "2001:db8::1");
        assert_eq!(cleanup_ip(&once), once);
    }

    #[test]
    fn test_cleanup_unwraps_ipv4_mapped() {
        assert_eq!(cleanup_ip("::ffff:192.168.1.1"), "192.168.1.1");
        assert_eq!(cleanup_ip("::FFFF:c0a8:0101"), "192.168.1.1");
    }

    #[test]
    fn test_cleanup_passes_garbage_through() {
        assert_eq!(cleanup_ip(""), "");
        assert_eq!(cleanup_ip("   "), "");
        assert_eq!(cleanup_ip(" not-an-ip "), "not-an-ip");
        assert_eq!(cleanup_ip("1.2.3.4\0"), "1.2.3.4\0");
        assert_eq!(cleanup_ip("адрес"), "адрес");
    }

    #[test]
    fn test_normalized_ipv4_round_trips_through_validation() {
        for ip in ["0.0.0.0", "10.0.0.1", "203.0.113.5", "255.255.255.255"] {
            assert!(is_valid_ip(&cleanup_ip(ip)), "{ip}");
        }
    }

    #[test]
    fn test_ipv4_validation() {
        assert!(is_valid_ipv4("127.0.0.1"));
        assert!(!is_valid_ipv4("127.1"));
        assert!(!is_valid_ipv4("256.0.0.1"));
        assert!(!is_valid_ipv4(" 127.0.0.1"));
        assert!(!is_valid_ipv4("::1"));
        assert!(!is_valid_ipv4(""));
    }

    #[test]
    fn test_ipv6_validation() {
        assert!(is_valid_ipv6("::1"));
        assert!(is_valid_ipv6("2001:db8::1"));
        assert!(is_valid_ipv6("::ffff:10.0.0.1"));
        assert!(is_valid_ipv6("1:2:3:4:5:6:7:8"));
        assert!(!is_valid_ipv6("1::2::3"));
        assert!(!is_valid_ipv6("127.0.0.1"));
        assert!(!is_valid_ipv6("fe80::1%eth0"));
    }

    #[test]
    fn test_is_valid_ip_either_family() {
        assert!(is_valid_ip("10.0.0.1"));
        assert!(is_valid_ip("fd00::1"));
        assert!(!is_valid_ip("unknown"));
        assert!(!is_valid_ip("\0"));
    }
}
