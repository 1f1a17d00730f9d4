//! Golden encodings of the shard format building blocks.

use codeshard_codec::{decode_deltas, encode_deltas, put_uvarint, read_uvarint};
use codeshard_core::case::split_case;
use codeshard_core::{ByteReader, CompoundSection, Section, ShardWriter, SimpleSection};
use codeshard_testkit::golden::*;

#[test]
fn varints_match_golden_vectors() {
    for vector in varint_vectors() {
        let mut buf = Vec::new();
        put_uvarint(&mut buf, vector.input);
        assert_hex(&buf, vector.expected_hex);
        assert_eq!(
            read_uvarint(&buf).unwrap(),
            (vector.input, buf.len()),
            "{}",
            vector.description
        );
    }
}

#[test]
fn deltas_match_golden_vectors() {
    for vector in delta_vectors() {
        let encoded = encode_deltas(vector.input).unwrap();
        assert_hex(&encoded, vector.expected_hex);
        assert_eq!(
            decode_deltas(&encoded).unwrap(),
            vector.input,
            "{}",
            vector.description
        );
    }
}

#[test]
fn simple_descriptors_match_golden_vectors() {
    for vector in simple_section_vectors() {
        let (offset, length) = vector.input;
        let mut w = ShardWriter::new(Vec::new());
        SimpleSection::new(offset, length).write(&mut w).unwrap();
        let bytes = w.into_inner().unwrap();
        assert_hex(&bytes, vector.expected_hex);

        let read = SimpleSection::read(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!((read.offset, read.length), vector.input, "{}", vector.description);
    }
}

#[test]
fn compound_payloads_match_golden_vectors() {
    for vector in compound_payload_vectors() {
        let mut w = ShardWriter::new(Vec::new());
        let mut section = CompoundSection::new();
        section.start(&w);
        for item in vector.input {
            section.add_item(&mut w, item.as_bytes()).unwrap();
        }
        section.end(&mut w).unwrap();

        assert_hex(&w.into_inner().unwrap(), vector.expected_hex);
        assert_eq!(section.item_count(), vector.input.len(), "{}", vector.description);
    }
}

#[test]
fn compound_descriptor_layout() {
    let mut w = ShardWriter::new(Vec::new());
    let mut section = CompoundSection::new();
    section.start(&w);
    for item in ["foo", "", "bar"] {
        section.add_item(&mut w, item.as_bytes()).unwrap();
    }
    section.end(&mut w).unwrap();

    let mut w = ShardWriter::new(Vec::new());
    section.write(&mut w).unwrap();
    assert_hex(
        &w.into_inner().unwrap(),
        "00000000 00000006 00000006 0000000c",
    );
    assert_eq!(section.absolute_index(), vec![0, 3, 3, 6]);
    assert_eq!(section.relative_index(), vec![0, 3, 3, 6]);
}

#[test]
fn case_bits_match_golden_vectors() {
    for vector in case_bits_vectors() {
        let (folded, bits) = split_case(vector.input.as_bytes());
        assert_eq!(folded, vector.input.to_ascii_lowercase().as_bytes());
        assert_hex(&bits, vector.expected_hex);
    }
}
