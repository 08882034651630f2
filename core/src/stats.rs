//! Per-term corpus statistics backing the Zipf's-law report.

use crate::engine::SearchEngine;

/// Document frequency and total occurrence count for one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermStatistics {
    pub term: String,
    pub total_frequency: u64,
    pub document_frequency: usize,
}

impl SearchEngine {
    /// Statistics for every indexed term, sorted by total frequency
    /// descending. Ties order by term so the report is deterministic.
    pub fn term_statistics(&self) -> Vec<TermStatistics> {
        let mut stats: Vec<TermStatistics> = self
            .index()
            .postings
            .keys()
            .map(|term| {
                let postings = self.index().postings_for(term);
                TermStatistics {
                    term: term.clone(),
                    total_frequency: postings.iter().map(|p| p.freq as u64).sum(),
                    document_frequency: postings.len(),
                }
            })
            .collect();

        stats.sort_by(|a, b| {
            b.total_frequency
                .cmp(&a.total_frequency)
                .then_with(|| a.term.cmp(&b.term))
        });

        stats
    }
}
