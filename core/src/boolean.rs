//! Boolean retrieval: `+required -excluded optional` queries over posting
//! sets, with a content verification pass for required terms.

use std::collections::BTreeSet;
use std::fs;

use crate::analyzer;
use crate::engine::SearchEngine;
use crate::index::DocId;

/// A parsed boolean query. Terms are already analyzer-normalized.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BooleanQuery {
    pub required: Vec<String>,
    pub excluded: Vec<String>,
    pub optional: Vec<String>,
}

impl BooleanQuery {
    /// Split on whitespace; a leading `+` or `-` is a sigil only when the
    /// token carries more than the sigil itself. The remainder is run
    /// through the analyzer and the first resulting term is kept, so
    /// punctuation inside a token is normalized away.
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();

        for token in query.split_whitespace() {
            let (sigil, raw) = match token.as_bytes() {
                [b'+', ..] if token.len() > 1 => (Some(b'+'), &token[1..]),
                [b'-', ..] if token.len() > 1 => (Some(b'-'), &token[1..]),
                _ => (None, token),
            };

            let Some(term) = analyzer::tokenize(raw.as_bytes()).into_iter().next() else {
                continue;
            };

            match sigil {
                Some(b'+') => parsed.required.push(term),
                Some(b'-') => parsed.excluded.push(term),
                _ => parsed.optional.push(term),
            }
        }

        parsed
    }

    pub fn has_required(&self) -> bool {
        !self.required.is_empty()
    }

    pub fn has_optional(&self) -> bool {
        !self.optional.is_empty()
    }
}

impl SearchEngine {
    /// Parse and evaluate a boolean query. Results ascend by doc id.
    pub fn boolean_search(&self, query: &str) -> Vec<DocId> {
        self.execute_boolean(&BooleanQuery::parse(query))
    }

    pub fn execute_boolean(&self, query: &BooleanQuery) -> Vec<DocId> {
        let mut candidates: BTreeSet<DocId> = BTreeSet::new();

        if query.has_required() {
            for (pos, term) in query.required.iter().enumerate() {
                let term_docs = self.index().doc_ids_for(term);
                // A required term nobody contains empties the whole result.
                if term_docs.is_empty() {
                    return Vec::new();
                }
                if pos == 0 {
                    candidates = term_docs;
                } else {
                    candidates = &candidates & &term_docs;
                }
                if candidates.is_empty() {
                    return Vec::new();
                }
            }
        } else if query.has_optional() {
            for term in &query.optional {
                candidates.extend(self.index().doc_ids_for(term));
            }
        } else {
            return Vec::new();
        }

        if !query.excluded.is_empty() {
            let mut excluded: BTreeSet<DocId> = BTreeSet::new();
            for term in &query.excluded {
                excluded.extend(self.index().doc_ids_for(term));
            }
            candidates = &candidates - &excluded;
        }

        if query.has_required() {
            return candidates
                .into_iter()
                .filter(|&doc_id| self.verify_required_terms(doc_id, &query.required))
                .collect();
        }

        candidates.into_iter().collect()
    }

    /// Re-read the document from the corpus and confirm each required term
    /// occurs as a substring of the case-folded content. Guards against the
    /// index drifting from the files on disk; an unreadable or empty
    /// document fails the check.
    fn verify_required_terms(&self, doc_id: DocId, terms: &[String]) -> bool {
        let path = self.document_path(doc_id);
        let content = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(doc_id, path = %path.display(), %err, "cannot read file");
                return false;
            }
        };
        if content.is_empty() {
            return false;
        }

        let lowered = analyzer::to_lowercase(&content);
        terms.iter().all(|term| lowered.contains(term.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sigils_and_normalizes_terms() {
        let query = BooleanQuery::parse("+Cat -DOG bird");
        assert_eq!(query.required, ["cat"]);
        assert_eq!(query.excluded, ["dog"]);
        assert_eq!(query.optional, ["bird"]);
    }

    #[test]
    fn bare_sigils_are_not_terms() {
        let query = BooleanQuery::parse("+ - cat");
        assert!(query.required.is_empty());
        assert!(query.excluded.is_empty());
        assert_eq!(query.optional, ["cat"]);
    }

    #[test]
    fn punctuation_inside_tokens_keeps_first_term() {
        let query = BooleanQuery::parse("+cat,dog -bi:rd");
        assert_eq!(query.required, ["cat"]);
        assert_eq!(query.excluded, ["bi"]);
    }

    #[test]
    fn empty_query_parses_to_nothing() {
        assert_eq!(BooleanQuery::parse("   "), BooleanQuery::default());
    }
}
