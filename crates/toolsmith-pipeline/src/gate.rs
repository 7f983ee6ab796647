//! Compliance gate
//!
//! Pure, deterministic screening of requested tool names against a deny-list
//! of known-infringing tool classes. Runs before any provider call so no
//! generation resources are spent on disallowed requests.

use serde::Serialize;

/// Built-in deny-list: media ripping/unlocking tools and license
/// circumvention. Matching is word-based, see [`ComplianceGate::check`].
const DENY_TERMS: &[&str] = &[
    "youtube downloader",
    "netflix ripper",
    "spotify downloader",
    "instagram downloader",
    "facebook video downloader",
    "tiktok downloader",
    "piracy",
    "crack",
    "keygen",
    "torrent",
    "drm removal",
    "license bypass",
];

/// Outcome of a compliance check
///
/// `reason` is populated exactly when the request is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub permitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Verdict {
    fn permitted() -> Self {
        Self {
            permitted: true,
            reason: None,
        }
    }

    fn blocked(reason: String) -> Self {
        Self {
            permitted: false,
            reason: Some(reason),
        }
    }
}

/// The gate itself; a fixed term list, injectable for policy changes
#[derive(Debug, Clone)]
pub struct ComplianceGate {
    terms: Vec<String>,
}

impl ComplianceGate {
    /// Gate with the built-in deny-list
    #[must_use]
    pub fn new() -> Self {
        Self::with_terms(DENY_TERMS.iter().map(|t| t.to_string()))
    }

    /// Gate with a custom deny-list
    ///
    /// The matching rule is fixed; the term list is the policy parameter.
    #[must_use]
    pub fn with_terms(terms: impl IntoIterator<Item = String>) -> Self {
        Self {
            terms: terms.into_iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Classify a requested name as permitted or blocked
    ///
    /// Case-insensitive; `_` and `-` are treated as spaces. An entry matches
    /// when every word of the entry occurs in the normalized text, so
    /// single-word entries are plain substring matches and multi-word entries
    /// tolerate interleaved words ("youtube video downloader" trips
    /// "youtube downloader").
    #[must_use]
    pub fn check(&self, requested: &str) -> Verdict {
        let normalized = requested.to_lowercase().replace(['_', '-'], " ");

        for term in &self.terms {
            if term.split_whitespace().all(|word| normalized.contains(word)) {
                return Verdict::blocked(format!(
                    "request matches restricted category \"{term}\"; tools built around \
                     copyrighted or access-protected content cannot be generated"
                ));
            }
        }

        Verdict::permitted()
    }
}

impl Default for ComplianceGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permits_ordinary_requests() {
        let gate = ComplianceGate::new();
        let verdict = gate.check("password generator");
        assert!(verdict.permitted);
        assert!(verdict.reason.is_none());
    }

    #[test]
    fn blocks_exact_terms() {
        let gate = ComplianceGate::new();
        for name in ["keygen factory", "TORRENT search", "movie piracy helper"] {
            let verdict = gate.check(name);
            assert!(!verdict.permitted, "{name} should be blocked");
            assert!(verdict.reason.is_some());
        }
    }

    #[test]
    fn multi_word_terms_match_with_interleaving() {
        let gate = ComplianceGate::new();
        assert!(!gate.check("youtube video downloader").permitted);
        assert!(!gate.check("YouTube_Downloader").permitted);
        // "downloader" alone is not restricted
        assert!(gate.check("podcast downloader").permitted);
    }

    #[test]
    fn custom_terms_replace_the_default_policy() {
        let gate = ComplianceGate::with_terms(vec!["widget".to_string()]);
        assert!(!gate.check("Widget Maker").permitted);
        assert!(gate.check("youtube video downloader").permitted);
    }

    #[test]
    fn check_is_deterministic() {
        let gate = ComplianceGate::new();
        assert_eq!(gate.check("crack detector"), gate.check("crack detector"));
    }
}
