/* src/selector.rs */

use std::net::IpAddr;

use crate::address::{cleanup_ip, is_valid_ip};
use crate::classify::{AddressClass, IpClassifier};
use crate::error::{BestIpError, Result};

/// Outcome of resolving a client address: the address, if any, and whether it
/// is routable on the public internet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BestIp {
    /// Normalized address.
    pub ip: Option<String>,
    /// True only for a public address.
    pub routable: bool,
}

impl BestIp {
    /// The "no address" result, `(None, false)`.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    pub fn is_routable(&self) -> bool {
        self.routable
    }

    /// Parse the resolved address into an `IpAddr`.
    pub fn ip_addr(&self) -> Result<IpAddr> {
        let ip = self.ip.as_deref().ok_or(BestIpError::NoValidIp)?;
        ip.parse().map_err(|_| BestIpError::InvalidIpFormat(ip.to_string()))
    }
}

/// Resolve a single raw address into `(address, routable)`.
///
/// ```rust
/// use best_ip::{get_ip_info, IpClassifier};
///
/// let classifier = IpClassifier::default();
/// let info = get_ip_info("::ffff:177.139.233.139", &classifier);
/// assert_eq!(info.ip(), Some("177.139.233.139"));
/// assert!(info.is_routable());
/// ```
pub fn get_ip_info(ip: &str, classifier: &IpClassifier) -> BestIp {
    let clean = cleanup_ip(ip);
    if !is_valid_ip(&clean) {
        return BestIp::none();
    }
    let routable = classifier.is_public_ip(&clean);
    BestIp {
        ip: Some(clean),
        routable,
    }
}

/// Choose between the currently held candidate and a newly seen one.
///
/// Precedence is Public > Private > Loopback > none. The newer (rightmost)
/// candidate wins unless it would drop a public address to a non-public one,
/// or a private address to loopback. Returns one of the two inputs as given.
pub fn get_best_ip<'a>(
    last_ip: Option<&'a str>,
    next_ip: &'a str,
    classifier: &IpClassifier,
) -> &'a str {
    let Some(last_ip) = last_ip.filter(|ip| !ip.is_empty()) else {
        return next_ip;
    };

    let last = classifier.classify(&cleanup_ip(last_ip));
    let next = classifier.classify(&cleanup_ip(next_ip));

    match (last, next) {
        (AddressClass::Public, next) if next != AddressClass::Public => last_ip,
        (AddressClass::Private, AddressClass::Loopback) => last_ip,
        _ => next_ip,
    }
}
