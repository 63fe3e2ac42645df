use std::collections::HashSet;
use url::Url;

/// Set of URLs already claimed for fetching
///
/// A claim is an insert-if-absent on the set, so the check and the claim are
/// one step and a URL can be handed to the fetcher at most once per run.
#[derive(Debug, Default)]
pub struct Frontier {
    claimed: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL
    ///
    /// # Returns
    ///
    /// * `true` - The URL was unclaimed and now belongs to the caller
    /// * `false` - The URL had already been claimed
    pub fn try_claim(&mut self, url: &Url) -> bool {
        self.claimed.insert(url.as_str().to_owned())
    }

    pub fn is_claimed(&self, url: &Url) -> bool {
        self.claimed.contains(url.as_str())
    }

    /// Number of URLs claimed so far
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_first_claim_wins() {
        let mut frontier = Frontier::new();
        let u = url("https://example.com/a");

        assert!(frontier.try_claim(&u));
        assert!(!frontier.try_claim(&u));
        assert!(frontier.is_claimed(&u));
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_distinct_urls_claimed_independently() {
        let mut frontier = Frontier::new();

        assert!(frontier.try_claim(&url("https://example.com/a")));
        assert!(frontier.try_claim(&url("https://example.com/b")));
        assert!(frontier.try_claim(&url("https://example.com/a?x=1")));
        assert_eq!(frontier.len(), 3);
    }

    #[test]
    fn test_empty() {
        let frontier = Frontier::new();
        assert!(frontier.is_empty());
        assert!(!frontier.is_claimed(&url("https://example.com/")));
    }
}
