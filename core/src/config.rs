use std::path::{Path, PathBuf};

use crate::persist::IndexPaths;

/// Paths and thresholds for one engine instance.
pub struct Config {
    /// Directory of `.txt` corpus files.
    pub data_dir: PathBuf,
    /// Lemma dictionary file.
    pub dict_path: PathBuf,
    /// Where the index and metadata files live.
    pub index: IndexPaths,

    /// Minimum TF-IDF score a document needs to appear in results.
    pub min_tfidf_score: f64,
    /// Number of ranked results shown.
    pub top_k_results: usize,
    /// Number of rows in the Zipf report.
    pub zipf_top_terms: usize,
}

impl Config {
    /// Conventional layout: `<dir>/dataset_txt` holds the corpus,
    /// `<dir>/resources/lemmas.txt` the dictionary, and the index files are
    /// written into `<dir>` itself.
    pub fn from_config_dir<P: AsRef<Path>>(config_dir: P) -> Self {
        let config_dir = config_dir.as_ref();
        Self::from_parts(
            config_dir.join("dataset_txt"),
            config_dir.join("resources").join("lemmas.txt"),
            config_dir,
        )
    }

    /// Explicit corpus, dictionary, and index locations.
    pub fn from_parts<D, F, I>(data_dir: D, dict_path: F, index_dir: I) -> Self
    where
        D: Into<PathBuf>,
        F: Into<PathBuf>,
        I: AsRef<Path>,
    {
        Self {
            data_dir: data_dir.into(),
            dict_path: dict_path.into(),
            index: IndexPaths::new(index_dir),
            min_tfidf_score: 0.05,
            top_k_results: 10,
            zipf_top_terms: 15,
        }
    }
}
