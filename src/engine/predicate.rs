//! Keyword evaluation: direct substring checks on extracted text, and FTS5 query construction.

use crate::KeywordPredicate;

impl KeywordPredicate {
    /// Case-insensitive test of `text` against the keywords.
    ///
    /// `all` requires every keyword; otherwise one is enough. `exact` without `all` requires the
    /// keywords, joined by single spaces, to appear as one phrase.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        if self.exact && !self.all {
            return text.contains(&self.lowered().join(" "));
        }
        if self.all {
            self.lowered().iter().all(|k| text.contains(k.as_str()))
        } else {
            self.lowered().iter().any(|k| text.contains(k.as_str()))
        }
    }

    /// Query string for the index store. See [`build_fts_query`].
    pub fn to_fts_query(&self) -> String {
        build_fts_query(self.keywords(), self.all, self.exact)
    }
}

/// Build one FTS5 MATCH expression from the keywords.
///
/// - exact + all: quote only keywords containing a space, then join with ` AND `
/// - exact: quote the whole space-joined phrase
/// - all: join with ` AND `
/// - otherwise: join with ` OR `
pub fn build_fts_query<S: AsRef<str>>(keywords: &[S], all: bool, exact: bool) -> String {
    let words: Vec<&str> = keywords.iter().map(|k| k.as_ref()).collect();
    match (exact, all) {
        (true, true) => words
            .iter()
            .map(|k| {
                if k.contains(' ') {
                    format!("\"{k}\"")
                } else {
                    (*k).to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" AND "),
        (true, false) => format!("\"{}\"", words.join(" ")),
        (false, true) => words.join(" AND "),
        (false, false) => words.join(" OR "),
    }
}
