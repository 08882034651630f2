use std::collections::{BTreeSet, HashMap};

use crate::codec;

pub type DocId = u32;

/// One entry of a posting list: a document and how often the term occurs
/// in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub freq: u32,
}

/// The in-memory index: compressed posting lists per term plus the document
/// metadata needed for scoring and display.
///
/// Posting lists are kept compressed; lookups decode a fresh owned vector.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    /// term -> delta+VByte compressed posting list
    pub postings: HashMap<String, Vec<u8>>,
    /// doc id -> source filename (basename with extension)
    pub doc_names: HashMap<DocId, String>,
    /// doc id -> total token count, the TF denominator
    pub doc_lengths: HashMap<DocId, u32>,
    /// document count captured at build time, the IDF numerator
    pub total_docs: u32,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Decode the posting list for a term. An unknown term yields an empty
    /// list; a list that fails to decode is reported as empty too, so a
    /// damaged term behaves as "no results" instead of poisoning the query.
    pub fn postings_for(&self, term: &str) -> Vec<Posting> {
        let Some(data) = self.postings.get(term) else {
            return Vec::new();
        };
        match codec::decompress(data) {
            Ok(postings) => postings,
            Err(err) => {
                tracing::warn!(term, %err, "failed to decode posting list");
                Vec::new()
            }
        }
    }

    /// The set of documents containing a term, ordered by doc id.
    pub fn doc_ids_for(&self, term: &str) -> BTreeSet<DocId> {
        self.postings_for(term)
            .into_iter()
            .map(|p| p.doc_id)
            .collect()
    }
}
