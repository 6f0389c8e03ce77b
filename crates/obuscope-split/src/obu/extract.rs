//! Single OBU extraction with emulation prevention removal

use std::ops::Range;

use tracing::debug;

use super::detect::find_zero_candidate;
use super::header::{parse_obu_header, ObuHeader};
use crate::buffer::{GrowableBuffer, PADDING_SIZE};
use crate::error::Result;

/// Where the processed bytes of an extracted OBU live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Directly in the caller's input
    Input,
    /// In the de-escaping [`GrowableBuffer`]
    Buffer,
}

/// One OBU located in its source.
///
/// `escaped` and `payload` index into [`Storage`]; `raw` always indexes
/// the caller's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedUnit {
    pub header: ObuHeader,
    pub storage: Storage,
    /// Header plus payload after escape removal
    pub escaped: Range<usize>,
    /// Payload, clamped to the bytes actually available
    pub payload: Range<usize>,
    /// Input bytes this OBU occupies
    pub raw: Range<usize>,
}

impl ExtractedUnit {
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    /// Move input-relative ranges by `base` bytes
    pub(crate) fn offset_by(mut self, base: usize) -> Self {
        self.raw = shift(&self.raw, base);
        if self.storage == Storage::Input {
            self.escaped = shift(&self.escaped, base);
            self.payload = shift(&self.payload, base);
        }
        self
    }
}

fn shift(range: &Range<usize>, base: usize) -> Range<usize> {
    range.start + base..range.end + base
}

/// Extract the OBU at the start of `src`.
///
/// With `allow_escapes` set, `src` is scanned for the next start code
/// (which ends the OBU) and for `00 00 03` sequences; when any are found
/// the OBU is copied into `buffer` with the emulation prevention bytes
/// removed. Otherwise the OBU is referenced in place.
///
/// Declared sizes larger than the available bytes are clamped rather than
/// rejected. The returned `raw.end` is the number of `src` bytes consumed.
pub fn extract_unit(
    src: &[u8],
    buffer: &mut GrowableBuffer,
    allow_escapes: bool,
) -> Result<ExtractedUnit> {
    let (length, first_escape) = if allow_escapes {
        scan_markers(src)
    } else {
        (src.len(), None)
    };

    let unit = match first_escape {
        None => extract_in_place(&src[..length])?,
        Some(pos) => extract_unescaped(&src[..length], pos, buffer)?,
    };

    debug!(
        obu_type = %unit.header.obu_type,
        temporal_id = unit.header.temporal_id,
        spatial_id = unit.header.spatial_id,
        payload_size = unit.payload_size(),
        "extracted OBU"
    );

    Ok(unit)
}

/// Find where the OBU ends and where escape removal has to begin.
///
/// Returns the usable length (cut at the next `00 00 01`) and the position
/// of the first `00 00 03`, if one precedes it.
fn scan_markers(src: &[u8]) -> (usize, Option<usize>) {
    let mut length = src.len();
    let mut i = 0;

    while i < length {
        i += find_zero_candidate(&src[i..length]);
        if i + 2 < length && src[i + 1] == 0 {
            match src[i + 2] {
                0x01 => {
                    length = i;
                    break;
                }
                0x03 => break,
                _ => {}
            }
        }
        i += 1;
    }

    if i + 1 >= length {
        (length, None)
    } else {
        (length, Some(i))
    }
}

fn extract_in_place(src: &[u8]) -> Result<ExtractedUnit> {
    let header = parse_obu_header(src)?;
    let consumed = header.total_size().min(src.len());
    let payload_size = header.payload_size.min(src.len() - header.header_size);

    Ok(ExtractedUnit {
        header,
        storage: Storage::Input,
        escaped: 0..consumed,
        payload: header.header_size..header.header_size + payload_size,
        raw: 0..consumed,
    })
}

fn extract_unescaped(
    src: &[u8],
    first_escape: usize,
    buffer: &mut GrowableBuffer,
) -> Result<ExtractedUnit> {
    let length = src.len();
    buffer.reserve(length)?;

    let base = buffer.len();
    let dst = buffer.spare_mut();

    dst[..first_escape].copy_from_slice(&src[..first_escape]);
    let mut si = first_escape;
    let mut di = first_escape;
    let mut next_start_code = false;

    while si + 2 < length {
        if src[si + 2] > 3 {
            // none of src[si..=si + 2] can start a marker
            dst[di..di + 2].copy_from_slice(&src[si..si + 2]);
            si += 2;
            di += 2;
        } else if src[si] == 0 && src[si + 1] == 0 && src[si + 2] != 0 {
            if src[si + 2] == 3 {
                dst[di] = 0;
                dst[di + 1] = 0;
                di += 2;
                si += 3;
                continue;
            }
            next_start_code = true;
            break;
        }

        dst[di] = src[si];
        di += 1;
        si += 1;
    }

    if !next_start_code {
        let tail = length - si;
        dst[di..di + tail].copy_from_slice(&src[si..]);
        di += tail;
        si = length;
    }

    dst[di..di + PADDING_SIZE].fill(0);

    let header = parse_obu_header(&dst[..di])?;
    let payload_size = header.payload_size.min(di - header.header_size);
    buffer.commit(di);

    let payload_start = base + header.header_size;
    Ok(ExtractedUnit {
        header,
        storage: Storage::Buffer,
        escaped: base..base + di,
        payload: payload_start..payload_start + payload_size,
        raw: 0..si,
    })
}
