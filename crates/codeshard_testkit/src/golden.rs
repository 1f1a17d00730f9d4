//! Golden byte vectors for the shard format.
//!
//! Every vector pins down an exact on-disk encoding. A change that breaks
//! one of them changes the file format.

/// Encodes bytes as hexadecimal string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decodes hexadecimal string to bytes.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let hex = hex.replace([' ', '\n', '\r'], "");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex"))
        .collect()
}

/// Asserts that `actual` equals the hex-encoded `expected`.
#[track_caller]
pub fn assert_hex(actual: &[u8], expected: &str) {
    let expected_bytes = hex_decode(expected);
    if actual != expected_bytes {
        panic!(
            "Encoding mismatch:\n\
             Expected ({} bytes): {}\n\
             Actual ({} bytes): {}",
            expected_bytes.len(),
            hex_encode(&expected_bytes),
            actual.len(),
            hex_encode(actual)
        );
    }
}

/// A named encoding.
#[derive(Debug, Clone)]
pub struct GoldenVector<T> {
    /// Description of the test case
    pub description: &'static str,
    /// Input value
    pub input: T,
    /// Expected bytes (hex-encoded)
    pub expected_hex: &'static str,
}

/// Unsigned varint encodings.
#[must_use]
pub fn varint_vectors() -> Vec<GoldenVector<u64>> {
    vec![
        GoldenVector {
            description: "zero",
            input: 0,
            expected_hex: "00",
        },
        GoldenVector {
            description: "largest single byte",
            input: 127,
            expected_hex: "7f",
        },
        GoldenVector {
            description: "smallest two bytes",
            input: 128,
            expected_hex: "8001",
        },
        GoldenVector {
            description: "300",
            input: 300,
            expected_hex: "ac02",
        },
        GoldenVector {
            description: "u32 max",
            input: u64::from(u32::MAX),
            expected_hex: "ffffffff0f",
        },
        GoldenVector {
            description: "u64 max",
            input: u64::MAX,
            expected_hex: "ffffffffffffffffff01",
        },
    ]
}

/// Delta-coded offset lists.
#[must_use]
pub fn delta_vectors() -> Vec<GoldenVector<&'static [u32]>> {
    vec![
        GoldenVector {
            description: "empty list",
            input: &[],
            expected_hex: "00",
        },
        GoldenVector {
            description: "repeated and leading zero",
            input: &[0, 3, 3, 6],
            expected_hex: "04 00 03 00 03",
        },
        GoldenVector {
            description: "multi-byte gap",
            input: &[5, 205],
            expected_hex: "02 05 c801",
        },
    ]
}

/// Simple section descriptors as `(offset, length)`.
#[must_use]
pub fn simple_section_vectors() -> Vec<GoldenVector<(u32, u32)>> {
    vec![
        GoldenVector {
            description: "small section",
            input: (100, 20),
            expected_hex: "00000064 00000014",
        },
        GoldenVector {
            description: "empty section",
            input: (0, 0),
            expected_hex: "00000000 00000000",
        },
    ]
}

/// Compound section payloads: items followed by their offset table,
/// written at offset 0.
#[must_use]
pub fn compound_payload_vectors() -> Vec<GoldenVector<&'static [&'static str]>> {
    vec![
        GoldenVector {
            description: "three items with an empty one",
            input: &["foo", "", "bar"],
            expected_hex: "666f6f 626172 00000000 00000003 00000003",
        },
        GoldenVector {
            description: "no items",
            input: &[],
            expected_hex: "",
        },
    ]
}

/// Case bits of ASCII strings.
#[must_use]
pub fn case_bits_vectors() -> Vec<GoldenVector<&'static str>> {
    vec![
        GoldenVector {
            description: "lowercase",
            input: "foo",
            expected_hex: "00",
        },
        GoldenVector {
            description: "leading capital",
            input: "Foo",
            expected_hex: "01",
        },
        GoldenVector {
            description: "trailing capitals",
            input: "bAR",
            expected_hex: "06",
        },
        GoldenVector {
            description: "spills into a second byte",
            input: "ABCDEFGHI",
            expected_hex: "ff01",
        },
        GoldenVector {
            description: "empty",
            input: "",
            expected_hex: "",
        },
    ]
}
