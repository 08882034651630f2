//! Delta + VByte compression of posting lists.
//!
//! Doc ids in a posting list are stored as gaps from the previous id, which
//! keeps the numbers small; each number is then written as little-endian
//! 7-bit groups where the byte with the high bit set terminates the value.

use crate::error::{Error, Result};
use crate::index::{DocId, Posting};

/// Sanity bound on a reconstructed doc id during validation.
const MAX_DOC_ID: u64 = 1_000_000_000;

/// Append the VByte encoding of `value` to `out`. The final byte of each
/// number carries the high bit.
pub fn vbyte_encode(mut value: u32, out: &mut Vec<u8>) {
    while value >= 128 {
        out.push((value & 0x7F) as u8);
        value >>= 7;
    }
    out.push(value as u8 | 0x80);
}

/// Decode one VByte number starting at `*offset`, advancing the offset past
/// the bytes consumed.
pub fn vbyte_decode(data: &[u8], offset: &mut usize) -> Result<u32> {
    if *offset >= data.len() {
        return Err(Error::Truncated("offset out of range".into()));
    }

    let mut result: u64 = 0;
    let mut shift = 0u32;

    while *offset < data.len() {
        let byte = data[*offset];
        *offset += 1;
        result |= ((byte & 0x7F) as u64) << shift;

        if byte & 0x80 != 0 {
            return u32::try_from(result)
                .map_err(|_| Error::InvalidInput("number too large".into()));
        }

        shift += 7;
        if shift > 28 {
            return Err(Error::InvalidInput("number too large".into()));
        }
    }

    // Ran out of bytes without seeing a terminator.
    Err(Error::Truncated("offset out of range".into()))
}

/// Number of bytes `value` occupies in VByte form.
pub fn vbyte_size(value: u32) -> usize {
    if value == 0 {
        return 1;
    }
    let mut value = value;
    let mut size = 0;
    while value > 0 {
        size += 1;
        value >>= 7;
    }
    size
}

/// Compress a posting list sorted ascending by doc id.
///
/// Rejects descending doc ids and zero frequencies rather than silently
/// writing a list that cannot be reconstructed. An empty list compresses to
/// an empty byte sequence.
pub fn compress(postings: &[Posting]) -> Result<Vec<u8>> {
    if postings.is_empty() {
        return Ok(Vec::new());
    }

    let mut compressed = Vec::with_capacity(postings.len() * 3);
    let mut last_doc_id: DocId = 0;

    for posting in postings {
        if posting.doc_id < last_doc_id {
            return Err(Error::InvalidInput(
                "posting list must be sorted by doc id".into(),
            ));
        }
        if posting.freq == 0 {
            return Err(Error::InvalidInput("frequency must be positive".into()));
        }

        vbyte_encode(posting.doc_id - last_doc_id, &mut compressed);
        vbyte_encode(posting.freq, &mut compressed);
        last_doc_id = posting.doc_id;
    }

    Ok(compressed)
}

/// Decompress a posting list, reconstructing doc ids by running sum.
pub fn decompress(data: &[u8]) -> Result<Vec<Posting>> {
    let mut postings = Vec::new();
    let mut offset = 0;
    let mut last_doc_id: DocId = 0;

    while offset < data.len() {
        let delta = vbyte_decode(data, &mut offset)?;
        let freq = vbyte_decode(data, &mut offset)
            .map_err(|_| Error::Truncated("posting truncated mid-pair".into()))?;
        if freq == 0 {
            return Err(Error::InvalidInput("frequency must be positive".into()));
        }
        last_doc_id = last_doc_id
            .checked_add(delta)
            .ok_or_else(|| Error::InvalidInput("doc id overflow".into()))?;
        postings.push(Posting { doc_id: last_doc_id, freq });
    }

    Ok(postings)
}

/// Walk a compressed stream once and report whether it is well formed:
/// no truncation, positive frequencies, and doc ids within the sanity bound.
pub fn validate(data: &[u8]) -> bool {
    let mut offset = 0;
    let mut doc_id: u64 = 0;

    while offset < data.len() {
        let delta = match vbyte_decode(data, &mut offset) {
            Ok(v) => v,
            Err(_) => return false,
        };
        let freq = match vbyte_decode(data, &mut offset) {
            Ok(v) => v,
            Err(_) => return false,
        };
        if freq == 0 {
            return false;
        }
        doc_id += delta as u64;
        if doc_id > MAX_DOC_ID {
            return false;
        }
    }

    true
}

/// Exact size in bytes that [`compress`] would produce for a sorted list.
pub fn estimate_size(postings: &[Posting]) -> usize {
    let mut total = 0;
    let mut last_doc_id: DocId = 0;
    for posting in postings {
        total += vbyte_size(posting.doc_id.wrapping_sub(last_doc_id));
        total += vbyte_size(posting.freq);
        last_doc_id = posting.doc_id;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn posting(doc_id: DocId, freq: u32) -> Posting {
        Posting { doc_id, freq }
    }

    #[test]
    fn vbyte_roundtrip_with_exact_sizes() {
        let values = [0u32, 1, 127, 128, 129, 16_383, 16_384, 1_000_000, u32::MAX / 2];
        let mut buf = Vec::new();
        for &v in &values {
            vbyte_encode(v, &mut buf);
        }
        let mut offset = 0;
        for &expected in &values {
            let before = offset;
            assert_eq!(vbyte_decode(&buf, &mut offset).unwrap(), expected);
            assert_eq!(offset - before, vbyte_size(expected));
        }
        assert_eq!(offset, buf.len());
    }

    #[test]
    fn vbyte_size_group_boundaries() {
        assert_eq!(vbyte_size(0), 1);
        assert_eq!(vbyte_size(127), 1);
        assert_eq!(vbyte_size(128), 2);
        assert_eq!(vbyte_size(16_383), 2);
        assert_eq!(vbyte_size(16_384), 3);
    }

    #[test]
    fn vbyte_decode_past_end_is_truncated() {
        let mut offset = 0;
        assert!(matches!(
            vbyte_decode(&[], &mut offset),
            Err(Error::Truncated(_))
        ));
        // A continuation byte with no terminator after it.
        let mut offset = 0;
        assert!(matches!(
            vbyte_decode(&[0x01], &mut offset),
            Err(Error::Truncated(_))
        ));
    }

    #[test]
    fn vbyte_decode_rejects_oversized_numbers() {
        // Five continuation bytes push the shift past 28 bits.
        let mut offset = 0;
        assert!(matches!(
            vbyte_decode(&[0, 0, 0, 0, 0], &mut offset),
            Err(Error::InvalidInput(_))
        ));
        // Terminator whose payload overflows u32 at shift 28.
        let mut offset = 0;
        assert!(matches!(
            vbyte_decode(&[0, 0, 0, 0, 0xFF], &mut offset),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn postings_roundtrip() {
        let postings = vec![posting(1, 3), posting(2, 1), posting(50, 7), posting(1_000_050, 2)];
        let compressed = compress(&postings).unwrap();
        assert_eq!(compressed.len(), estimate_size(&postings));
        assert_eq!(decompress(&compressed).unwrap(), postings);
    }

    #[test]
    fn empty_list_roundtrips_to_empty_bytes() {
        let compressed = compress(&[]).unwrap();
        assert!(compressed.is_empty());
        assert!(decompress(&compressed).unwrap().is_empty());
        assert!(validate(&compressed));
    }

    #[test]
    fn compress_rejects_unsorted_input() {
        let postings = vec![posting(5, 1), posting(3, 1)];
        assert!(matches!(compress(&postings), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn compress_rejects_zero_frequency() {
        let postings = vec![posting(1, 0)];
        assert!(matches!(compress(&postings), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn decompress_detects_truncation_mid_pair() {
        let compressed = compress(&[posting(3, 9)]).unwrap();
        // Drop the frequency byte: the delta decodes but its partner is gone.
        let cut = &compressed[..compressed.len() - 1];
        assert!(matches!(decompress(cut), Err(Error::Truncated(_))));
    }

    #[test]
    fn decompress_rejects_zero_frequency() {
        let mut bytes = Vec::new();
        vbyte_encode(1, &mut bytes);
        vbyte_encode(0, &mut bytes);
        assert!(matches!(decompress(&bytes), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn large_delta_roundtrips() {
        let postings = vec![posting(1, 1), posting(1_000_001, 4)];
        let decoded = decompress(&compress(&postings).unwrap()).unwrap();
        assert_eq!(decoded, postings);
    }

    #[test]
    fn validate_accepts_good_streams_and_rejects_bad_ones() {
        let good = compress(&[posting(1, 2), posting(9, 1)]).unwrap();
        assert!(validate(&good));
        assert!(!validate(&good[..good.len() - 1]));

        let mut zero_freq = Vec::new();
        vbyte_encode(2, &mut zero_freq);
        vbyte_encode(0, &mut zero_freq);
        assert!(!validate(&zero_freq));

        let mut runaway = Vec::new();
        vbyte_encode(1_000_000_001, &mut runaway);
        vbyte_encode(1, &mut runaway);
        assert!(!validate(&runaway));
    }
}
