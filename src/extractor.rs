/* src/extractor.rs */

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::chain::get_ips_from_string;
use crate::classify::IpClassifier;
use crate::error::{BestIpError, Result};
use crate::selector::{BestIp, get_best_ip, get_ip_info};

/// Type alias for metadata maps keyed by CGI-style names (`HTTP_X_FORWARDED_FOR`).
pub type HeaderMap = HashMap<String, String>;

/// Metadata key for the socket peer address.
pub const REMOTE_ADDR: &str = "REMOTE_ADDR";

/// Metadata keys probed by default, highest priority first.
pub const DEFAULT_META_KEYS: &[&str] = &[
    "HTTP_X_FORWARDED_FOR",
    "X_FORWARDED_FOR",
    "HTTP_CLIENT_IP",
    "HTTP_X_REAL_IP",
    "HTTP_X_FORWARDED",
    "HTTP_X_CLUSTER_CLIENT_IP",
    "HTTP_FORWARDED_FOR",
    "HTTP_FORWARDED",
    "HTTP_VIA",
    REMOTE_ADDR,
];

/// Which end of a forwarded-for chain holds the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProxyOrder {
    /// `<client>, <proxy1>, <proxy2>`
    #[default]
    LeftMost,
    /// `<proxy2>, <proxy1>, <client>`
    RightMost,
}

impl FromStr for ProxyOrder {
    type Err = BestIpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "left-most" => Ok(Self::LeftMost),
            "right-most" => Ok(Self::RightMost),
            other => Err(BestIpError::InvalidProxyOrder(other.to_string())),
        }
    }
}

impl fmt::Display for ProxyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LeftMost => "left-most",
            Self::RightMost => "right-most",
        })
    }
}

/// Fetch a metadata value by `key`, falling back to the hyphenated variant.
///
/// Values are trimmed; an empty or missing value is `None`.
///
/// ```rust
/// use best_ip::get_request_meta;
///
/// let lookup = |key: &str| (key == "HTTP-X-REAL-IP").then(|| " 10.0.0.1 ".to_string());
/// assert_eq!(get_request_meta(&lookup, "HTTP_X_REAL_IP").as_deref(), Some("10.0.0.1"));
/// assert_eq!(get_request_meta(&lookup, "REMOTE_ADDR"), None);
/// ```
pub fn get_request_meta<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String> + ?Sized,
{
    let value = lookup(key)
        .or_else(|| lookup(&key.replace('_', "-")))
        .unwrap_or_default();
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Configuration for resolving the client address from request metadata.
#[derive(Debug, Clone)]
pub struct IpExtractor {
    /// Metadata keys to probe, in order of preference.
    pub keys: Vec<String>,
    /// Which end of a chain holds the client.
    pub proxy_order: ProxyOrder,
    /// Exact number of proxies expected in front of the service.
    pub proxy_count: Option<usize>,
    /// Address fragments of trusted proxies; empty trusts every chain.
    pub trusted_proxies: Vec<String>,
    /// Prefix tables used for classification.
    pub classifier: IpClassifier,
}

impl Default for IpExtractor {
    fn default() -> Self {
        Self {
            keys: DEFAULT_META_KEYS.iter().map(|k| (*k).to_string()).collect(),
            proxy_order: ProxyOrder::default(),
            proxy_count: None,
            trusted_proxies: Vec::new(),
            classifier: IpClassifier::default(),
        }
    }
}

impl IpExtractor {
    /// Create a new extractor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the metadata keys to probe.
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set which end of a chain holds the client.
    pub fn proxy_order(mut self, order: ProxyOrder) -> Self {
        self.proxy_order = order;
        self
    }

    /// Only accept chains that passed through exactly `count` proxies.
    pub fn proxy_count(mut self, count: usize) -> Self {
        self.proxy_count = Some(count);
        self
    }

    /// Only accept chains whose nearest hop matches a trusted proxy.
    pub fn trusted_proxies<I, S>(mut self, proxies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trusted_proxies = proxies.into_iter().map(Into::into).collect();
        self
    }

    /// Set the prefix tables.
    pub fn with_classifier(mut self, classifier: IpClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Resolve the best client address from metadata.
    ///
    /// Keys are folded in order. The first routable address ends the search;
    /// otherwise the best non-routable candidate seen is returned.
    pub fn extract<F>(&self, lookup: &F) -> BestIp
    where
        F: Fn(&str) -> Option<String> + ?Sized,
    {
        let mut best = BestIp::none();

        for key in &self.keys {
            let Some(value) = get_request_meta(lookup, key) else {
                continue;
            };

            let mut ips = get_ips_from_string(&value);
            let count = ips.len();
            if count == 0 {
                debug!(key = %key, value = %value, "Rejected malformed address chain");
                continue;
            }
            if !self.accepts_hop_count(count) {
                trace!(key = %key, count, "Skipping chain with unexpected proxy count");
                continue;
            }

            if self.proxy_order == ProxyOrder::RightMost && count > 1 {
                ips.reverse();
            }

            let (Some(client), Some(nearest)) = (ips.first(), ips.last()) else {
                continue;
            };

            if !self.trusted_proxies.is_empty() {
                if self.is_trusted(nearest) {
                    best = get_ip_info(client, &self.classifier);
                    if best.is_routable() {
                        debug!(key = %key, ip = ?best.ip, "Resolved client IP via trusted proxy");
                        return best;
                    }
                } else {
                    trace!(key = %key, proxy = %nearest, "Nearest hop is not a trusted proxy");
                }
            } else {
                let candidate = get_best_ip(best.ip.as_deref(), client, &self.classifier);
                best = get_ip_info(candidate, &self.classifier);
                if best.is_routable() {
                    debug!(key = %key, ip = ?best.ip, "Resolved routable client IP");
                    return best;
                }
            }
        }

        debug!(ip = ?best.ip, "No routable client IP found");
        best
    }

    /// [`extract`](Self::extract) over a map of metadata.
    pub fn extract_map(&self, meta: &HeaderMap) -> BestIp {
        self.extract(&|key: &str| meta.get(key).cloned())
    }

    fn accepts_hop_count(&self, count: usize) -> bool {
        match self.proxy_count {
            Some(0) if count > 1 => return false,
            Some(expected) if expected > 0 && expected != count - 1 => return false,
            _ => {}
        }
        // A trusted proxy implies at least one hop besides the client.
        self.trusted_proxies.is_empty() || count >= 2
    }

    fn is_trusted(&self, hop: &str) -> bool {
        self.trusted_proxies
            .iter()
            .any(|proxy| hop.contains(proxy.as_str()))
    }
}

/// Resolve the best client address with the default configuration.
///
/// # Arguments
///
/// * `lookup` - Returns the metadata value for a CGI-style key, if present
///
/// # Examples
///
/// ```rust
/// use best_ip::get_client_ip;
///
/// let lookup = |key: &str| match key {
///     "HTTP_X_FORWARDED_FOR" => Some("177.139.233.139, 198.84.193.157".to_string()),
///     "REMOTE_ADDR" => Some("127.0.0.1".to_string()),
///     _ => None,
/// };
///
/// let best = get_client_ip(&lookup);
/// assert_eq!(best.ip(), Some("177.139.233.139"));
/// assert!(best.is_routable());
/// ```
pub fn get_client_ip<F>(lookup: &F) -> BestIp
where
    F: Fn(&str) -> Option<String> + ?Sized,
{
    IpExtractor::default().extract(lookup)
}
