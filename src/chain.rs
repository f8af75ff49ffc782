/* src/chain.rs */

use crate::address::is_valid_ip;

/// Ordered proxy-hop candidates parsed from a single metadata value.
///
/// Either holds the whole chain or nothing: a chain whose first or last entry
/// is not a valid address is discarded entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateChain(Vec<String>);

impl CandidateChain {
    /// Number of candidates; zero for a rejected chain.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First candidate (the client, in left-most order).
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Last candidate (the nearest proxy, in left-most order).
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Flip between `client, proxy1, proxy2` and `proxy2, proxy1, client`.
    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for CandidateChain {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateChain {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Split a comma-separated header value into candidate addresses.
///
/// Tokens are trimmed and lower-cased, empty tokens dropped. Only the first
/// and last entries are validated; interior hops are kept as-is.
///
/// ```rust
/// use best_ip::get_ips_from_string;
///
/// let chain = get_ips_from_string("203.0.113.5, 10.0.0.1");
/// assert_eq!(chain.len(), 2);
/// assert!(get_ips_from_string("not-an-ip, 10.0.0.1").is_empty());
/// ```
pub fn get_ips_from_string(value: &str) -> CandidateChain {
    let ips: Vec<String> = value
        .split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    match (ips.first(), ips.last()) {
        (Some(first), Some(last)) if is_valid_ip(first) && is_valid_ip(last) => CandidateChain(ips),
        _ => CandidateChain::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_accepted() {
        let chain = get_ips_from_string("203.0.113.5, 10.0.0.1");
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.as_slice(), ["203.0.113.5", "10.0.0.1"]);
    }

    #[test]
    fn test_chain_rejected_on_bad_first() {
        let chain = get_ips_from_string("not-an-ip, 10.0.0.1");
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
    }

    #[test]
    fn test_chain_rejected_on_bad_last() {
        assert!(get_ips_from_string("10.0.0.1, unknown").is_empty());
    }

    #[test]
    fn test_interior_hops_not_validated() {
        let chain = get_ips_from_string("177.139.233.139, unknown, 10.0.0.1");
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.as_slice()[1], "unknown");
    }

    #[test]
    fn test_tokens_trimmed_lowercased_and_empties_dropped() {
        let chain = get_ips_from_string(" , 2001:DB8::1 ,, 10.0.0.1 ,");
        assert_eq!(chain.into_vec(), vec!["2001:db8::1", "10.0.0.1"]);
    }

    #[test]
    fn test_single_entry() {
        let chain = get_ips_from_string("  ::1 ");
        assert_eq!(chain.first(), Some("::1"));
        assert_eq!(chain.last(), Some("::1"));
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(get_ips_from_string("").is_empty());
        assert!(get_ips_from_string(" , ,").is_empty());
        assert!(get_ips_from_string("\0").is_empty());
    }

    #[test]
    fn test_reverse() {
        let mut chain = get_ips_from_string("1.1.1.1, 2.2.2.2, 3.3.3.3");
        chain.reverse();
        assert_eq!(chain.first(), Some("3.3.3.3"));
        assert_eq!(chain.iter().count(), 3);
    }
}
