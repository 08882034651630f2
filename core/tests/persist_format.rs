use std::fs;

use sift_core::codec;
use sift_core::persist::{self, IndexPaths};
use sift_core::{Error, InvertedIndex, Posting};
use tempfile::tempdir;

fn single_term_index() -> InvertedIndex {
    let mut index = InvertedIndex::new();
    let compressed = codec::compress(&[Posting { doc_id: 1, freq: 2 }]).unwrap();
    index.postings.insert("alpha".into(), compressed);
    index.doc_names.insert(1, "first.txt".into());
    index.doc_lengths.insert(1, 2);
    index.total_docs = 1;
    index
}

#[test]
fn binary_records_are_little_endian_length_prefixed() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let index = single_term_index();
    persist::save_index(&paths, &index).unwrap();

    let bytes = fs::read(paths.inverted_index()).unwrap();
    let payload = &index.postings["alpha"];

    let mut expected = Vec::new();
    expected.extend_from_slice(&5u32.to_le_bytes());
    expected.extend_from_slice(b"alpha");
    expected.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    expected.extend_from_slice(payload);

    assert_eq!(bytes, expected);
}

#[test]
fn round_trip_restores_every_table() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    let index = single_term_index();
    persist::save_index(&paths, &index).unwrap();

    let loaded = persist::load_index(&paths).unwrap();
    assert_eq!(loaded.postings, index.postings);
    assert_eq!(loaded.doc_names, index.doc_names);
    assert_eq!(loaded.doc_lengths, index.doc_lengths);
    assert_eq!(loaded.total_docs, 1);
}

#[test]
fn truncated_trailing_record_fails_the_load() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    persist::save_index(&paths, &single_term_index()).unwrap();

    let path = paths.inverted_index();
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();

    assert!(matches!(
        persist::load_index(&paths),
        Err(Error::Truncated(_))
    ));
}

#[test]
fn missing_index_file_fails_the_load() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());
    assert!(persist::load_index(&paths).is_err());
}

#[test]
fn filenames_with_spaces_survive_the_text_format() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());

    let mut index = single_term_index();
    index
        .doc_names
        .insert(2, "notes from the meeting.txt".into());
    index.doc_lengths.insert(2, 7);
    index.total_docs = 2;
    persist::save_index(&paths, &index).unwrap();

    let loaded = persist::load_index(&paths).unwrap();
    assert_eq!(
        loaded.doc_names[&2].as_str(),
        "notes from the meeting.txt"
    );
}

#[test]
fn doc_lengths_accept_arbitrary_whitespace() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc_lengths.txt");
    fs::write(&path, "1 10\n2\t20\n\n3   30").unwrap();

    let lengths = persist::load_doc_lengths(&path).unwrap();
    assert_eq!(lengths.len(), 3);
    assert_eq!(lengths[&2], 20);
    assert_eq!(lengths[&3], 30);
}

#[test]
fn url_values_keep_inner_spaces_and_lose_leading_whitespace() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("urls.txt");
    fs::write(&path, "1 \t http://example.com/a b\nbad line\n2 http://example.com/c\n").unwrap();

    let urls = persist::load_doc_urls(&path).unwrap();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[&1], "http://example.com/a b");
    assert_eq!(urls[&2], "http://example.com/c");
}

#[test]
fn lemmas_are_case_folded_on_both_sides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lemmas.txt");
    fs::write(&path, "Running RUN\nЁлки Ёлка\n").unwrap();

    let lemmas = persist::load_lemmas(&path).unwrap();
    assert_eq!(lemmas["running"], "run");
    assert_eq!(lemmas["ёлки"], "ёлка");
}

#[test]
fn absent_or_empty_dictionary_is_missing() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("nope.txt");
    assert!(matches!(
        persist::load_lemmas(&missing),
        Err(Error::MissingDictionary(_))
    ));

    let empty = dir.path().join("empty.txt");
    fs::write(&empty, "").unwrap();
    assert!(matches!(
        persist::load_lemmas(&empty),
        Err(Error::MissingDictionary(_))
    ));
}

#[test]
fn validate_accepts_every_persisted_posting_list() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::new(dir.path());

    let mut index = InvertedIndex::new();
    for (term, postings) in [
        ("alpha", vec![Posting { doc_id: 1, freq: 1 }, Posting { doc_id: 3, freq: 2 }]),
        ("beta", vec![Posting { doc_id: 2, freq: 5 }]),
    ] {
        index
            .postings
            .insert(term.into(), codec::compress(&postings).unwrap());
    }
    index.doc_lengths.extend([(1, 3), (2, 5), (3, 2)]);
    index.total_docs = 3;
    persist::save_index(&paths, &index).unwrap();

    let loaded = persist::load_index(&paths).unwrap();
    for data in loaded.postings.values() {
        assert!(codec::validate(data));
    }
}
