//! Corpus scanning and index construction.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::analyzer;
use crate::codec;
use crate::error::Result;
use crate::index::{DocId, InvertedIndex, Posting};

/// Per-document accumulation produced by one pass over a corpus file.
struct DocumentStats {
    filename: String,
    word_count: u32,
    term_frequencies: HashMap<String, u32>,
}

/// Build an index from every regular `.txt` file directly inside `data_dir`.
///
/// Doc ids follow the platform's directory enumeration order, starting at 1.
/// A file that cannot be read is recorded as an empty document and indexing
/// continues.
pub fn build_index(data_dir: &Path) -> Result<InvertedIndex> {
    if !data_dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("corpus directory does not exist: {}", data_dir.display()),
        )
        .into());
    }

    let mut index = InvertedIndex::new();
    let mut temp_postings: HashMap<String, Vec<Posting>> = HashMap::new();
    let mut doc_id: DocId = 0;

    for entry in WalkDir::new(data_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }

        doc_id += 1;
        let stats = process_document(entry.path(), doc_id);

        index.doc_names.insert(doc_id, stats.filename);
        index.doc_lengths.insert(doc_id, stats.word_count);

        for (term, freq) in stats.term_frequencies {
            temp_postings
                .entry(term)
                .or_default()
                .push(Posting { doc_id, freq });
        }

        if doc_id % 100 == 0 {
            tracing::debug!(documents = doc_id, "indexing corpus");
        }
    }

    index.total_docs = doc_id;
    tracing::info!(
        documents = index.total_docs,
        terms = temp_postings.len(),
        "corpus scanned, compressing posting lists"
    );

    for (term, mut postings) in temp_postings {
        postings.sort_unstable_by_key(|p| p.doc_id);
        let compressed = codec::compress(&postings)?;
        index.postings.insert(term, compressed);
    }

    Ok(index)
}

/// Tokenize one corpus file into its stats record. An unreadable file yields
/// a zero-length document; its id stays assigned.
fn process_document(path: &Path, doc_id: DocId) -> DocumentStats {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let content = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(doc_id, path = %path.display(), %err, "cannot read file");
            return DocumentStats {
                filename,
                word_count: 0,
                term_frequencies: HashMap::new(),
            };
        }
    };

    let tokens = analyzer::tokenize(&content);
    let word_count = tokens.len() as u32;

    let mut term_frequencies: HashMap<String, u32> = HashMap::new();
    for token in tokens {
        *term_frequencies.entry(token).or_insert(0) += 1;
    }

    DocumentStats { filename, word_count, term_frequencies }
}
