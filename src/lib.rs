/* src/lib.rs */
//! # Best IP
//!
//! Resolve the client IP address of a web request from its metadata,
//! untangling proxy chains down to a single "best" address and telling
//! whether that address is routable on the public internet.
//!
//! ## Features
//!
//! - Normalization of IPv4 and IPv6 text, unwrapping IPv4-mapped addresses
//! - Strict per-family validation
//! - Prefix-table classification into public, private and loopback space
//! - Forwarded-for chain parsing with left-most or right-most client order
//! - Proxy count and trusted proxy policies
//! - Framework-agnostic: metadata comes from an injected lookup function
//! - Optional Axum middleware and extractor integration via the `axum` feature
//!
//! ## Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use best_ip::{HeaderMap, IpExtractor};
//!
//! let mut meta = HeaderMap::new();
//! meta.insert("HTTP_X_FORWARDED_FOR".to_string(), "10.0.0.1".to_string());
//! meta.insert("REMOTE_ADDR".to_string(), "127.0.0.1".to_string());
//!
//! let best = IpExtractor::default().extract_map(&meta);
//! // Private beats loopback, but neither is routable.
//! assert_eq!(best.ip(), Some("10.0.0.1"));
//! assert!(!best.is_routable());
//! ```
//!
//! ### Building Blocks
//!
//! ```rust
//! use best_ip::{IpClassifier, cleanup_ip, get_best_ip, get_ips_from_string};
//!
//! let classifier = IpClassifier::default();
//! let chain = get_ips_from_string("177.139.233.139, 10.0.0.1");
//! assert_eq!(chain.len(), 2);
//!
//! let best = get_best_ip(chain.first(), "10.0.0.2", &classifier);
//! assert_eq!(cleanup_ip(best), "177.139.233.139");
//! ```

pub mod address;
pub mod chain;
pub mod classify;
pub mod error;
pub mod extractor;
pub mod selector;

#[cfg(feature = "axum")]
pub mod middleware;

pub use address::{cleanup_ip, is_valid_ip, is_valid_ipv4, is_valid_ipv6};
pub use chain::{CandidateChain, get_ips_from_string};
pub use classify::{AddressClass, IpClassifier};
pub use error::{BestIpError, Result};
pub use extractor::{
    DEFAULT_META_KEYS, HeaderMap, IpExtractor, ProxyOrder, REMOTE_ADDR, get_client_ip,
    get_request_meta,
};
pub use selector::{BestIp, get_best_ip, get_ip_info};

#[cfg(feature = "axum")]
pub use middleware::{BestIpLayer, BestIpService, ClientIp, header_lookup};

/// Re-export commonly used types
pub use std::net::IpAddr;
