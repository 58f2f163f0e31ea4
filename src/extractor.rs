//! Ticker symbol extraction
//!
//! Pulls the first ticker-like token out of free text: a run of 2-5
//! consecutive uppercase Latin letters bounded by non-letters, matched over
//! the upper-cased input. Always returns a value.

const MIN_SYMBOL_LEN: usize = 2;
const MAX_SYMBOL_LEN: usize = 5;

/// Symbol extractor with a configured fallback.
#[derive(Debug, Clone)]
pub struct SymbolExtractor {
    default_symbol: String,
}

impl SymbolExtractor {
    pub fn new(default_symbol: impl Into<String>) -> Self {
        Self {
            default_symbol: default_symbol.into(),
        }
    }

    /// Extract the first ticker-like token, or the default when none match.
    pub fn extract(&self, text: &str) -> String {
        extract_symbol(text).unwrap_or_else(|| self.default_symbol.clone())
    }

    pub fn default_symbol(&self) -> &str {
        &self.default_symbol
    }
}

impl Default for SymbolExtractor {
    fn default() -> Self {
        Self::new("AAPL")
    }
}

/// Scan the upper-cased input for the first bounded 2-5 letter run.
pub fn extract_symbol(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    let bytes = upper.as_bytes();

    let mut start = None;
    for (i, &b) in bytes.iter().enumerate() {
        if b.is_ascii_uppercase() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            let len = i - s;
            // Non-ASCII-letter byte ends the run; multibyte chars (Korean
            // text) land here too, which is the boundary we want.
            if (MIN_SYMBOL_LEN..=MAX_SYMBOL_LEN).contains(&len) {
                return Some(upper[s..i].to_string());
            }
        }
    }

    if let Some(s) = start {
        let len = bytes.len() - s;
        if (MIN_SYMBOL_LEN..=MAX_SYMBOL_LEN).contains(&len) {
            return Some(upper[s..].to_string());
        }
    }

    None
}

/// Check that a candidate (e.g. from the remote classifier) already has the
/// expected shape.
pub fn is_valid_symbol(candidate: &str) -> bool {
    (MIN_SYMBOL_LEN..=MAX_SYMBOL_LEN).contains(&candidate.len())
        && candidate.bytes().all(|b| b.is_ascii_uppercase())
}
