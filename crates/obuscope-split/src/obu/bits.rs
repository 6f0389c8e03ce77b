//! Significant payload length in bits

use crate::error::{Result, SplitError};
use crate::types::ObuType;

/// Number of payload bits before `trailing_bits()`.
///
/// Zero bytes at the end of the payload are dropped, then the
/// `trailing_one_bit` and the zero bits below it are removed from the last
/// non-zero byte. An all-zero payload measures 0 bits. Tile groups, tile
/// lists and frames have no trailing bits and measure their full length.
pub fn obu_bit_length(payload: &[u8], obu_type: ObuType) -> Result<usize> {
    if !obu_type.has_trailing_bits() {
        return bits_in(payload.len());
    }

    let Some(last) = payload.iter().rposition(|&b| b != 0) else {
        return Ok(0);
    };

    let size = last + 1;
    let bits = bits_in(size)?;
    let trailing = payload[last].trailing_zeros() as usize + 1;

    Ok(bits - trailing)
}

fn bits_in(bytes: usize) -> Result<usize> {
    bytes
        .checked_mul(8)
        .ok_or(SplitError::RangeOverflow { bytes })
}
