//! Indexing and retrieval core for the sift text search engine.
//!
//! The pipeline: [`analyzer`] turns bytes into terms, [`indexer`] folds a
//! corpus directory into an [`InvertedIndex`] of [`codec`]-compressed
//! posting lists, [`persist`] writes and reloads it, and the query engines
//! in [`boolean`] and [`tfidf`] run against the loaded state through the
//! [`SearchEngine`] facade.

pub mod analyzer;
pub mod boolean;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod indexer;
pub mod persist;
pub mod stats;
pub mod tfidf;

pub use boolean::BooleanQuery;
pub use config::Config;
pub use engine::SearchEngine;
pub use error::{Error, Result};
pub use index::{DocId, InvertedIndex, Posting};
pub use stats::TermStatistics;
pub use tfidf::ScoredDocument;
