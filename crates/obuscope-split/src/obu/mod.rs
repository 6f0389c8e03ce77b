//! AV1 OBU parsing
//!
//! This module provides the building blocks of the splitter:
//! - Framing detection (start-code vs length-delimited)
//! - OBU header decoding, including the leb128 `obu_size` field
//! - Single OBU extraction with emulation prevention removal
//! - Significant bit length of an OBU payload

mod bits;
mod detect;
mod extract;
mod header;

pub use bits::obu_bit_length;
pub use detect::{
    detect_framing, find_zero_candidate, is_start_code_format, is_temporal_unit_start, START_CODE,
};
pub use extract::{extract_unit, ExtractedUnit, Storage};
pub use header::{parse_obu_header, read_leb128, ObuHeader, MAX_HEADER_SIZE, MAX_LEB128_BYTES};
