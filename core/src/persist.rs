//! On-disk formats and their readers and writers.
//!
//! The inverted index is a binary concatenation of records, each
//! `u32 LE term length | term bytes | u32 LE data length | data bytes`,
//! with no header or trailer; end of file terminates the stream and a
//! record cut short mid-way is an error. Document metadata lives in plain
//! text files of `<docId> <value>` lines.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::analyzer;
use crate::error::{Error, Result};
use crate::index::{DocId, InvertedIndex};

/// Locations of the four index files under a common root directory.
pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn inverted_index(&self) -> PathBuf {
        self.root.join("inverted_index.bin")
    }
    pub fn doc_names(&self) -> PathBuf {
        self.root.join("doc_names.txt")
    }
    pub fn doc_lengths(&self) -> PathBuf {
        self.root.join("doc_lengths.txt")
    }
    pub fn urls(&self) -> PathBuf {
        self.root.join("urls.txt")
    }
}

pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    fs::create_dir_all(&paths.root)?;
    save_postings(&paths.inverted_index(), &index.postings)?;
    save_doc_lengths(&paths.doc_lengths(), &index.doc_lengths)?;
    save_doc_names(&paths.doc_names(), &index.doc_names)?;
    Ok(())
}

/// Load the binary postings file and both metadata files. The document count
/// is recovered from the lengths table.
pub fn load_index(paths: &IndexPaths) -> Result<InvertedIndex> {
    let postings = load_postings(&paths.inverted_index())?;
    let doc_lengths = load_doc_lengths(&paths.doc_lengths())?;
    let doc_names = load_doc_names(&paths.doc_names()).unwrap_or_else(|err| {
        tracing::warn!(%err, "cannot load document names");
        HashMap::new()
    });
    let total_docs = doc_lengths.len() as u32;
    Ok(InvertedIndex { postings, doc_names, doc_lengths, total_docs })
}

fn save_postings(path: &Path, postings: &HashMap<String, Vec<u8>>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (term, data) in postings {
        writer.write_all(&(term.len() as u32).to_le_bytes())?;
        writer.write_all(term.as_bytes())?;
        writer.write_all(&(data.len() as u32).to_le_bytes())?;
        writer.write_all(data)?;
    }
    writer.flush()?;
    Ok(())
}

fn load_postings(path: &Path) -> Result<HashMap<String, Vec<u8>>> {
    let data = fs::read(path)?;
    let mut postings = HashMap::new();
    let mut offset = 0;

    while offset < data.len() {
        let term_len = read_u32_le(&data, &mut offset)? as usize;
        let term_bytes = read_slice(&data, &mut offset, term_len)?;
        let term = std::str::from_utf8(term_bytes)
            .map_err(|_| Error::LoadFailure("term is not valid UTF-8".into()))?
            .to_owned();
        let data_len = read_u32_le(&data, &mut offset)? as usize;
        let posting_bytes = read_slice(&data, &mut offset, data_len)?.to_vec();
        postings.insert(term, posting_bytes);
    }

    Ok(postings)
}

fn read_u32_le(data: &[u8], offset: &mut usize) -> Result<u32> {
    let bytes = read_slice(data, offset, 4)?;
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    Ok(u32::from_le_bytes(buf))
}

fn read_slice<'a>(data: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8]> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| Error::Truncated("index record cut short".into()))?;
    let slice = &data[*offset..end];
    *offset = end;
    Ok(slice)
}

fn save_doc_lengths(path: &Path, doc_lengths: &HashMap<DocId, u32>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut ids: Vec<DocId> = doc_lengths.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        writeln!(writer, "{} {}", id, doc_lengths[&id])?;
    }
    writer.flush()?;
    Ok(())
}

/// Whitespace-delimited `<docId> <length>` pairs; reading stops at the first
/// token that does not parse.
pub fn load_doc_lengths(path: &Path) -> Result<HashMap<DocId, u32>> {
    let content = fs::read_to_string(path)?;
    let mut doc_lengths = HashMap::new();
    let mut tokens = content.split_whitespace();
    while let (Some(id), Some(len)) = (tokens.next(), tokens.next()) {
        match (id.parse::<DocId>(), len.parse::<u32>()) {
            (Ok(id), Ok(len)) => {
                doc_lengths.insert(id, len);
            }
            _ => {
                tracing::warn!(path = %path.display(), "malformed entry in lengths file");
                break;
            }
        }
    }
    Ok(doc_lengths)
}

fn save_doc_names(path: &Path, doc_names: &HashMap<DocId, String>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut ids: Vec<DocId> = doc_names.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        writeln!(writer, "{} {}", id, doc_names[&id])?;
    }
    writer.flush()?;
    Ok(())
}

/// Lines of `<docId> <value>` where the value is the remainder of the line
/// with leading whitespace trimmed; it may itself contain spaces. Malformed
/// lines are logged and skipped.
fn load_id_value_lines(path: &Path) -> Result<HashMap<DocId, String>> {
    let content = fs::read_to_string(path)?;
    let mut map = HashMap::new();

    for (line_no, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, char::is_whitespace);
        let id = parts.next().and_then(|tok| tok.parse::<DocId>().ok());
        let value = parts
            .next()
            .map(|rest| rest.trim_start_matches(|c| c == ' ' || c == '\t'));
        match (id, value) {
            (Some(id), Some(value)) if !value.is_empty() => {
                map.insert(id, value.to_owned());
            }
            _ => {
                tracing::warn!(
                    path = %path.display(),
                    line = line_no + 1,
                    "invalid line format"
                );
            }
        }
    }

    Ok(map)
}

pub fn load_doc_names(path: &Path) -> Result<HashMap<DocId, String>> {
    load_id_value_lines(path)
}

pub fn load_doc_urls(path: &Path) -> Result<HashMap<DocId, String>> {
    load_id_value_lines(path)
}

/// Load the lemma dictionary: whitespace-delimited key/value pairs, both
/// case-folded. An unreadable or empty dictionary fails initialization.
pub fn load_lemmas(path: &Path) -> Result<HashMap<String, String>> {
    let content =
        fs::read_to_string(path).map_err(|_| Error::MissingDictionary(path.to_path_buf()))?;

    let mut lemmas = HashMap::new();
    let mut tokens = content.split_whitespace();
    while let (Some(key), Some(value)) = (tokens.next(), tokens.next()) {
        lemmas.insert(
            analyzer::to_lowercase(key.as_bytes()),
            analyzer::to_lowercase(value.as_bytes()),
        );
    }

    if lemmas.is_empty() {
        return Err(Error::MissingDictionary(path.to_path_buf()));
    }
    Ok(lemmas)
}
