//! Host deny-list applied to every extracted record.

use std::collections::HashSet;

/// Advertising, tracker and low-value hosts excluded by default.
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "doubleclick.net",
    "googleadservices.com",
    "googlesyndication.com",
    "ad.doubleclick.net",
    "adservice.google.com",
    "pinterest.com",
    "pinterest.fr",
    "facebook.com",
    "tiktok.com",
];

/// A normalized set of blocked hosts.
///
/// Entries and queried hosts are lowercased with a leading `www.` removed.
/// A host is blocked when it equals an entry or is a subdomain of one.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    hosts: HashSet<String>,
}

impl Blocklist {
    /// Build a deny-list from raw host names. Blank entries are skipped.
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = hosts
            .into_iter()
            .map(|h| normalize_host(h.as_ref()))
            .filter(|h| !h.is_empty())
            .collect();
        Self { hosts }
    }

    /// Returns `true` if `host` or one of its parent domains is listed.
    pub fn is_blocked(&self, host: &str) -> bool {
        if self.hosts.is_empty() {
            return false;
        }
        let host = normalize_host(host);
        if host.is_empty() {
            return false;
        }
        let mut candidate = host.as_str();
        loop {
            if self.hosts.contains(candidate) {
                return true;
            }
            match candidate.split_once('.') {
                Some((_, parent)) if parent.contains('.') => candidate = parent,
                _ => return false,
            }
        }
    }

    /// Number of distinct blocked hosts.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Whether the deny-list has no entries.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_owned(),
        None => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_host_is_blocked() {
        let list = Blocklist::new(["pinterest.com"]);
        assert!(list.is_blocked("pinterest.com"));
    }

    #[test]
    fn www_prefix_is_ignored_on_both_sides() {
        let list = Blocklist::new(["www.pinterest.com"]);
        assert!(list.is_blocked("pinterest.com"));
        assert!(list.is_blocked("www.pinterest.com"));
    }

    #[test]
    fn subdomain_is_blocked() {
        let list = Blocklist::new(["doubleclick.net"]);
        assert!(list.is_blocked("ad.doubleclick.net"));
        assert!(list.is_blocked("stats.g.doubleclick.net"));
    }

    #[test]
    fn lookalike_host_is_not_blocked() {
        let list = Blocklist::new(["doubleclick.net"]);
        assert!(!list.is_blocked("notdoubleclick.net"));
        assert!(!list.is_blocked("doubleclick.network"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let list = Blocklist::new(["Pinterest.COM"]);
        assert!(list.is_blocked("WWW.PINTEREST.com"));
    }

    #[test]
    fn tld_alone_never_matches() {
        let list = Blocklist::new(["com"]);
        assert!(!list.is_blocked("example.com"));
    }

    #[test]
    fn empty_host_not_blocked() {
        let list = Blocklist::new(DEFAULT_BLOCKLIST);
        assert!(!list.is_blocked(""));
    }

    #[test]
    fn blank_entries_skipped() {
        let list = Blocklist::new(["", "  ", "example.org"]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn default_list_blocks_ad_hosts() {
        let list = Blocklist::new(DEFAULT_BLOCKLIST);
        assert!(list.is_blocked("www.googleadservices.com"));
        assert!(!list.is_blocked("grafikart.fr"));
    }
}
