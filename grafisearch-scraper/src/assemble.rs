//! Result assembly: the accept step shared by every extractor.
//!
//! An [`Assembler`] lives for exactly one extraction pass. It owns the set
//! of URLs emitted so far, checks each [`Candidate`] against the deny-list,
//! trims its fields and derives `domain` and `site_name` before producing
//! the final [`SearchResult`].

use std::collections::HashSet;

use url::Url;

use crate::blocklist::Blocklist;
use crate::types::SearchResult;

/// Separator used when a description is composed from several fields.
pub const DESC_SEPARATOR: &str = " • ";

/// Raw, untrimmed fields lifted from one markup item.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub url: String,
    pub title: String,
    pub desc: String,
    /// Empty means "derive from the host".
    pub site_name: String,
    pub author: String,
}

/// Per-pass accept step: filtering, dedup and normalization.
#[derive(Debug)]
pub struct Assembler<'a> {
    blocklist: &'a Blocklist,
    seen: HashSet<String>,
}

impl<'a> Assembler<'a> {
    /// Start a new pass with an empty dedup set.
    pub fn new(blocklist: &'a Blocklist) -> Self {
        Self {
            blocklist,
            seen: HashSet::new(),
        }
    }

    /// Whether `url` was already emitted in this pass.
    pub fn has_seen(&self, url: &str) -> bool {
        self.seen.contains(url.trim())
    }

    /// Number of records accepted so far.
    pub fn accepted(&self) -> usize {
        self.seen.len()
    }

    /// Validate `candidate` and turn it into a record.
    ///
    /// Returns `None` when the URL or title is empty, the URL is relative
    /// or has no host, the host is blocked, or the URL was already emitted.
    /// The first occurrence of a URL wins.
    pub fn accept(&mut self, candidate: Candidate) -> Option<SearchResult> {
        let url = candidate.url.trim();
        let title = candidate.title.trim();
        if url.is_empty() || title.is_empty() || url.starts_with('/') {
            return None;
        }

        let host = host_of(url)?;
        if self.blocklist.is_blocked(&host) {
            tracing::trace!(host = %host, "blocked host skipped");
            return None;
        }
        if !self.seen.insert(url.to_owned()) {
            return None;
        }

        let site_name = match candidate.site_name.trim() {
            "" => site_name_from_host(&host),
            name => name.to_owned(),
        };

        Some(SearchResult {
            url: url.to_owned(),
            title: title.to_owned(),
            desc: candidate.desc.trim().to_owned(),
            domain: host,
            site_name,
            author: candidate.author.trim().to_owned(),
        })
    }
}

/// Host of an absolute URL, as reported by the URL parser.
///
/// Returns `None` if `url` does not parse or has an empty host.
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Some(host.to_owned()),
        _ => None,
    }
}

/// Display label for a host: the host without a leading `www.`.
pub fn site_name_from_host(host: &str) -> String {
    host.strip_prefix("www.").unwrap_or(host).to_owned()
}

/// Join the non-empty, trimmed `parts` with [`DESC_SEPARATOR`].
pub fn join_nonempty<'s, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'s str>,
{
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(DESC_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: &str, title: &str) -> Candidate {
        Candidate {
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_and_trims_fields() {
        let blocklist = Blocklist::default();
        let mut assembler = Assembler::new(&blocklist);
        let result = assembler
            .accept(Candidate {
                url: "  https://www.example.com/page ".into(),
                title: "\n Example Page \t".into(),
                desc: " A sample page ".into(),
                site_name: String::new(),
                author: " someone ".into(),
            })
            .expect("accepted");
        assert_eq!(result.url, "https://www.example.com/page");
        assert_eq!(result.title, "Example Page");
        assert_eq!(result.desc, "A sample page");
        assert_eq!(result.domain, "www.example.com");
        assert_eq!(result.site_name, "example.com");
        assert_eq!(result.author, "someone");
    }

    #[test]
    fn supplied_site_name_is_kept() {
        let blocklist = Blocklist::default();
        let mut assembler = Assembler::new(&blocklist);
        let result = assembler
            .accept(Candidate {
                site_name: "Grafikart".into(),
                ..candidate("https://grafikart.fr/", "Grafikart")
            })
            .expect("accepted");
        assert_eq!(result.site_name, "Grafikart");
    }

    #[test]
    fn duplicate_url_rejected_first_wins() {
        let blocklist = Blocklist::default();
        let mut assembler = Assembler::new(&blocklist);
        let first = assembler.accept(candidate("https://example.com/", "First"));
        let second = assembler.accept(candidate("https://example.com/", "Second"));
        assert_eq!(first.expect("first accepted").title, "First");
        assert!(second.is_none());
        assert_eq!(assembler.accepted(), 1);
    }

    #[test]
    fn relative_and_hostless_urls_rejected() {
        let blocklist = Blocklist::default();
        let mut assembler = Assembler::new(&blocklist);
        assert!(assembler.accept(candidate("/search?q=x", "Title")).is_none());
        assert!(assembler.accept(candidate("", "Title")).is_none());
        assert!(assembler.accept(candidate("#", "Title")).is_none());
        assert!(assembler.accept(candidate("mailto:someone@example.com", "Title")).is_none());
        assert_eq!(assembler.accepted(), 0);
    }

    #[test]
    fn blocked_host_rejected() {
        let blocklist = Blocklist::new(["pinterest.com"]);
        let mut assembler = Assembler::new(&blocklist);
        assert!(assembler
            .accept(candidate("https://www.pinterest.com/pin/1", "Pin"))
            .is_none());
    }

    #[test]
    fn blocked_url_does_not_consume_dedup_slot() {
        let blocklist = Blocklist::new(["example.com"]);
        let mut assembler = Assembler::new(&blocklist);
        assert!(assembler.accept(candidate("https://example.com/", "A")).is_none());
        assert!(!assembler.has_seen("https://example.com/"));
    }

    #[test]
    fn blank_title_rejected() {
        let blocklist = Blocklist::default();
        let mut assembler = Assembler::new(&blocklist);
        assert!(assembler.accept(candidate("https://example.com/", "  ")).is_none());
        assert!(!assembler.has_seen("https://example.com/"));
    }

    #[test]
    fn join_nonempty_skips_blanks() {
        assert_eq!(join_nonempty(["a", "", " b ", "  ", "c"]), "a • b • c");
        assert_eq!(join_nonempty(["", "only"]), "only");
        assert_eq!(join_nonempty(Vec::<&str>::new()), "");
    }

    #[test]
    fn site_name_strips_leading_www_only() {
        assert_eq!(site_name_from_host("www.example.com"), "example.com");
        assert_eq!(site_name_from_host("docs.www.example.com"), "docs.www.example.com");
    }
}
