//! The engine facade: owns the index, metadata, and configuration.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::{DocId, InvertedIndex};
use crate::indexer;
use crate::persist;

/// A single-threaded search engine over one corpus directory.
///
/// Mutation happens only in [`index_documents`](Self::index_documents) and
/// [`load_index`](Self::load_index); queries are read-only. Rebuilding
/// replaces the previous in-memory state wholesale.
pub struct SearchEngine {
    config: Config,
    lemmas: HashMap<String, String>,
    doc_urls: HashMap<DocId, String>,
    index: InvertedIndex,
}

impl SearchEngine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            lemmas: HashMap::new(),
            doc_urls: HashMap::new(),
            index: InvertedIndex::new(),
        }
    }

    /// Load the lemma dictionary and the URL table. The dictionary is
    /// required; missing URLs only degrade result display to filenames.
    ///
    /// The dictionary is held but not consulted by retrieval.
    pub fn initialize(&mut self) -> Result<()> {
        self.lemmas = persist::load_lemmas(&self.config.dict_path)?;
        tracing::info!(lemmas = self.lemmas.len(), "dictionary loaded");

        match persist::load_doc_urls(&self.config.index.urls()) {
            Ok(urls) => {
                tracing::info!(urls = urls.len(), "document urls loaded");
                self.doc_urls = urls;
            }
            Err(err) => {
                tracing::warn!(%err, "cannot load document urls, falling back to filenames");
            }
        }

        Ok(())
    }

    /// Scan the corpus directory and rebuild the index in memory.
    pub fn index_documents(&mut self) -> Result<()> {
        self.index = indexer::build_index(&self.config.data_dir)?;
        tracing::info!(
            documents = self.index.total_docs,
            terms = self.index.term_count(),
            "indexing completed"
        );
        Ok(())
    }

    pub fn save_index(&self) -> Result<()> {
        persist::save_index(&self.config.index, &self.index)
    }

    /// Load a previously persisted index, replacing the in-memory state.
    /// Any missing or malformed file surfaces as [`Error::LoadFailure`].
    pub fn load_index(&mut self) -> Result<()> {
        self.index = persist::load_index(&self.config.index)
            .map_err(|err| Error::LoadFailure(err.to_string()))?;
        tracing::info!(
            documents = self.index.total_docs,
            terms = self.index.term_count(),
            "index loaded"
        );
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn total_docs(&self) -> u32 {
        self.index.total_docs
    }

    pub fn term_count(&self) -> usize {
        self.index.term_count()
    }

    pub fn lemma_count(&self) -> usize {
        self.lemmas.len()
    }

    /// Display label for a document: its URL if known, else its filename,
    /// else a synthetic `[doc_<id>]` placeholder.
    pub fn document_label(&self, doc_id: DocId) -> String {
        if let Some(url) = self.doc_urls.get(&doc_id) {
            return url.clone();
        }
        if let Some(name) = self.index.doc_names.get(&doc_id) {
            return name.clone();
        }
        format!("[doc_{doc_id}]")
    }

    /// Path of the source file backing a document. Falls back to the
    /// `<id>.txt` convention when the name table has no entry.
    pub(crate) fn document_path(&self, doc_id: DocId) -> PathBuf {
        match self.index.doc_names.get(&doc_id) {
            Some(name) => self.config.data_dir.join(name),
            None => self.config.data_dir.join(format!("{doc_id}.txt")),
        }
    }
}
