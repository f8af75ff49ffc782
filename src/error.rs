/* src/error.rs */

use thiserror::Error;

/// Result type alias for operations that may fail with `BestIpError`.
pub type Result<T> = std::result::Result<T, BestIpError>;

/// Errors raised at the configuration and typed-conversion edges.
///
/// The string operations themselves never fail; these only surface when a
/// caller builds a configuration or asks for a typed `IpAddr`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BestIpError {
    /// Resolved value does not parse as an IP address.
    #[error("Invalid IP address format: {0}")]
    InvalidIpFormat(String),

    /// No valid IP address found in the request metadata.
    #[error("No valid IP address found")]
    NoValidIp,

    /// Unknown proxy order name.
    #[error("Invalid proxy order: {0} (expected \"left-most\" or \"right-most\")")]
    InvalidProxyOrder(String),

    /// An empty prefix would match every address.
    #[error("Empty address prefix in classification table")]
    InvalidPrefix,
}
