//! Ranked retrieval with TF-IDF scoring.

use std::collections::BTreeMap;

use crate::analyzer;
use crate::engine::SearchEngine;
use crate::index::DocId;

/// One ranked result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub score: f64,
}

impl SearchEngine {
    /// Tokenize the query and return every document scoring at or above the
    /// configured minimum, best first. Ties go to the smaller doc id. The
    /// caller decides how many results to display.
    pub fn tfidf_search(&self, query: &str) -> Vec<ScoredDocument> {
        let terms = analyzer::tokenize(query.as_bytes());
        let scores = self.tfidf_scores(&terms);
        self.rank_documents(&scores)
    }

    /// Accumulate `tf * idf` per document over the query terms. A term
    /// absent from the index contributes nothing; repeating a term in the
    /// query weights it accordingly. Documents with a missing or zero
    /// length are skipped.
    fn tfidf_scores(&self, query_terms: &[String]) -> BTreeMap<DocId, f64> {
        let mut scores: BTreeMap<DocId, f64> = BTreeMap::new();
        let total_docs = self.total_docs();

        for term in query_terms {
            let postings = self.index().postings_for(term);
            if postings.is_empty() {
                continue;
            }

            let idf = (total_docs as f64 / postings.len() as f64).ln();

            for posting in postings {
                let Some(&doc_length) = self.index().doc_lengths.get(&posting.doc_id) else {
                    continue;
                };
                if doc_length == 0 {
                    continue;
                }

                let tf = posting.freq as f64 / doc_length as f64;
                *scores.entry(posting.doc_id).or_insert(0.0) += tf * idf;
            }
        }

        scores
    }

    fn rank_documents(&self, scores: &BTreeMap<DocId, f64>) -> Vec<ScoredDocument> {
        let mut results: Vec<ScoredDocument> = scores
            .iter()
            .filter(|(_, &score)| score >= self.config().min_tfidf_score)
            .map(|(&doc_id, &score)| ScoredDocument { doc_id, score })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });

        results
    }
}
