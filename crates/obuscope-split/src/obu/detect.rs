//! Framing detection and start code scanning

use super::header::parse_obu_header;
use crate::types::{Framing, ObuType};

/// Three-byte start code preceding every OBU in start-code framing
pub const START_CODE: [u8; 3] = [0x00, 0x00, 0x01];

/// Check whether `data` begins with a start code followed by an OBU header.
///
/// A real start code is followed by a header byte whose
/// `obu_forbidden_bit` is clear; this tells it apart from a
/// length-delimited payload that happens to begin with 00 00 01.
pub fn is_start_code_format(data: &[u8]) -> bool {
    match data {
        [0x00, 0x00, 0x01, header, ..] => header & 0x80 == 0,
        _ => false,
    }
}

/// Classify the framing of a buffer from its first bytes
pub fn detect_framing(data: &[u8]) -> Framing {
    if is_start_code_format(data) {
        Framing::StartCode
    } else {
        Framing::LengthDelimited
    }
}

/// Check whether the buffer begins with a temporal delimiter OBU, in either framing
pub fn is_temporal_unit_start(data: &[u8]) -> bool {
    let obu = if is_start_code_format(data) {
        &data[START_CODE.len()..]
    } else {
        data
    };

    parse_obu_header(obu)
        .map(|header| header.obu_type == ObuType::TemporalDelimiter)
        .unwrap_or(false)
}

/// Index of the first zero byte in `data`, or `data.len()`.
///
/// Every start code or emulation prevention sequence begins with a zero
/// byte, so scanning can jump straight to candidates. Eight bytes are
/// tested at a time.
pub fn find_zero_candidate(data: &[u8]) -> usize {
    const LO: u64 = 0x0101_0101_0101_0101;
    const HI: u64 = 0x8080_8080_8080_8080;

    let mut chunks = data.chunks_exact(8);
    let mut offset = 0;

    for chunk in &mut chunks {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        let x = u64::from_ne_bytes(word);
        if x.wrapping_sub(LO) & !x & HI != 0 {
            break;
        }
        offset += 8;
    }

    data[offset..]
        .iter()
        .position(|&b| b == 0)
        .map_or(data.len(), |pos| offset + pos)
}
