//! Case folding with recoverable casing.
//!
//! Content is stored lowercased so that case-insensitive matching works on
//! the raw bytes. A parallel bitmask, one bit per byte, remembers which bytes
//! were ASCII uppercase letters so the original text can be restored. Bit
//! `i % 8` of mask byte `i / 8` belongs to content byte `i`.

use crate::error::{CoreError, CoreResult};

/// Lowercased bytes plus the case bits needed to restore them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchableString {
    /// Case-folded bytes.
    pub data: Vec<u8>,
    /// One bit per byte of `data`, set where the original was uppercase.
    pub case_bits: Vec<u8>,
}

impl SearchableString {
    /// Folds `original`.
    #[must_use]
    pub fn new(original: &[u8]) -> Self {
        let (data, case_bits) = split_case(original);
        Self { data, case_bits }
    }

    /// Restores the original bytes.
    ///
    /// # Errors
    ///
    /// See [`merge_case`].
    pub fn to_original(&self) -> CoreResult<Vec<u8>> {
        merge_case(&self.data, &self.case_bits)
    }
}

/// Number of mask bytes covering `len` content bytes.
#[must_use]
pub const fn case_bits_len(len: usize) -> usize {
    len.div_ceil(8)
}

/// Lowercases ASCII letters and records which ones were uppercase.
#[must_use]
pub fn split_case(original: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut folded = Vec::with_capacity(original.len());
    let mut bits = vec![0u8; case_bits_len(original.len())];

    for (i, &b) in original.iter().enumerate() {
        if b.is_ascii_uppercase() {
            bits[i / 8] |= 1 << (i % 8);
        }
        folded.push(b.to_ascii_lowercase());
    }
    (folded, bits)
}

/// Reapplies `case_bits` to `folded`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidFormat`] if the mask is too short for the
/// content.
pub fn merge_case(folded: &[u8], case_bits: &[u8]) -> CoreResult<Vec<u8>> {
    let needed = case_bits_len(folded.len());
    if case_bits.len() < needed {
        return Err(CoreError::invalid_format(format!(
            "case bits cover {} bytes, content has {}",
            case_bits.len() * 8,
            folded.len()
        )));
    }

    Ok(folded
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            if case_bits[i / 8] & (1 << (i % 8)) != 0 {
                b.to_ascii_uppercase()
            } else {
                b
            }
        })
        .collect())
}
