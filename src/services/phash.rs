//! Perceptual hash parsing and Hamming distance.
//!
//! Hashes arrive as hexadecimal strings of arbitrary width (the recognition
//! service emits 64-bit pHashes, but wider encodings are accepted). Each
//! nibble contributes four bits, so the bit width of a hash is four times its
//! digit count, leading zeros included.

use std::fmt;

/// A perceptual hash decoded from its hex form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerceptualHash {
    bytes: Vec<u8>,
    bit_width: u32,
}

impl PerceptualHash {
    /// Decode a hex hash. Surrounding whitespace is ignored.
    pub fn from_hex(hex_str: &str) -> Result<Self, MalformedHash> {
        let digits = hex_str.trim();
        if digits.is_empty() {
            return Err(MalformedHash::Empty);
        }

        // An odd digit count is left-padded to whole bytes; the declared
        // width still comes from the original digit count.
        let bytes = if digits.len() % 2 == 1 {
            hex::decode(format!("0{digits}"))
        } else {
            hex::decode(digits)
        }
        .map_err(|e| MalformedHash::InvalidHex {
            hash: digits.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            bytes,
            bit_width: (digits.len() * 4) as u32,
        })
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Number of differing bits between two hashes of the same width.
    pub fn distance(&self, other: &Self) -> Result<u32, MalformedHash> {
        if self.bit_width != other.bit_width {
            return Err(MalformedHash::WidthMismatch {
                left: self.bit_width,
                right: other.bit_width,
            });
        }

        Ok(self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum())
    }
}

impl fmt::Display for PerceptualHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = hex::encode(&self.bytes);
        // Undo the padding nibble added for odd-width hashes.
        let digits = (self.bit_width / 4) as usize;
        f.write_str(&encoded[encoded.len() - digits..])
    }
}

/// Hamming distance between two hex-encoded perceptual hashes.
pub fn hamming_distance(a: &str, b: &str) -> Result<u32, MalformedHash> {
    PerceptualHash::from_hex(a)?.distance(&PerceptualHash::from_hex(b)?)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedHash {
    #[error("Perceptual hash is empty")]
    Empty,

    #[error("Perceptual hash {hash:?} is not valid hexadecimal: {reason}")]
    InvalidHex { hash: String, reason: String },

    #[error("Perceptual hash widths differ: {left} bits vs {right} bits")]
    WidthMismatch { left: u32, right: u32 },
}
