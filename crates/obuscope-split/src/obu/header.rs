//! OBU header decoding

use std::io::Cursor;

use bitstream_io::{BigEndian, BitRead, BitReader};
use bytes::Buf;

use crate::error::HeaderFault;
use crate::types::ObuType;

/// Header byte, extension byte and the longest allowed `obu_size` field
pub const MAX_HEADER_SIZE: usize = 2 + MAX_LEB128_BYTES;

/// Longest accepted leb128 encoding
pub const MAX_LEB128_BYTES: usize = 8;

/// Largest total OBU length that can be addressed
const MAX_OBU_LENGTH: usize = isize::MAX as usize;

/// A decoded OBU header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObuHeader {
    pub obu_type: ObuType,
    pub temporal_id: u8,
    pub spatial_id: u8,
    pub has_extension: bool,
    pub has_size_field: bool,
    /// Bytes taken by the header, size field included
    pub header_size: usize,
    /// Declared (or implied) payload size, not clamped to the buffer
    pub payload_size: usize,
}

impl ObuHeader {
    /// Header plus declared payload
    pub fn total_size(&self) -> usize {
        self.header_size + self.payload_size
    }
}

/// Parse the OBU header at the start of `data`.
///
/// Layout of the first byte, MSB first:
/// obu_forbidden_bit (1), obu_type (4), obu_extension_flag (1),
/// obu_has_size_field (1), obu_reserved_1bit (1).
/// The optional extension byte carries temporal_id (3) and spatial_id (2).
/// Without a size field the payload runs to the end of `data`.
pub fn parse_obu_header(data: &[u8]) -> Result<ObuHeader, HeaderFault> {
    if data.is_empty() {
        return Err(HeaderFault::Empty);
    }

    let mut reader = BitReader::endian(Cursor::new(data), BigEndian);

    let forbidden = reader.read_bit().map_err(|_| HeaderFault::Empty)?;
    if forbidden {
        return Err(HeaderFault::ForbiddenBit);
    }

    let obu_type = reader.read::<u8>(4).map_err(|_| HeaderFault::Empty)?;
    let has_extension = reader.read_bit().map_err(|_| HeaderFault::Empty)?;
    let has_size_field = reader.read_bit().map_err(|_| HeaderFault::Empty)?;
    // obu_reserved_1bit
    reader.skip(1).map_err(|_| HeaderFault::Empty)?;

    let (temporal_id, spatial_id) = if has_extension {
        let temporal_id = reader
            .read::<u8>(3)
            .map_err(|_| HeaderFault::MissingExtension)?;
        let spatial_id = reader
            .read::<u8>(2)
            .map_err(|_| HeaderFault::MissingExtension)?;
        (temporal_id, spatial_id)
    } else {
        (0, 0)
    };

    let mut header_size = 1 + usize::from(has_extension);

    let payload_size = if has_size_field {
        let (value, len) = read_leb128(&data[header_size..])?;
        header_size += len;
        usize::try_from(value).map_err(|_| HeaderFault::LengthOverflow)?
    } else {
        data.len() - header_size
    };

    if payload_size > MAX_OBU_LENGTH - header_size {
        return Err(HeaderFault::LengthOverflow);
    }

    Ok(ObuHeader {
        obu_type: ObuType::from(obu_type),
        temporal_id,
        spatial_id,
        has_extension,
        has_size_field,
        header_size,
        payload_size,
    })
}

/// Decode an unsigned leb128 value, returning it with its encoded length.
///
/// At most [`MAX_LEB128_BYTES`] bytes are read; a value whose eighth byte
/// still has the continuation bit set is rejected.
pub fn read_leb128(mut data: &[u8]) -> Result<(u64, usize), HeaderFault> {
    let available = data.remaining();
    let mut value = 0u64;

    for i in 0..MAX_LEB128_BYTES {
        if !data.has_remaining() {
            return Err(HeaderFault::TruncatedSize);
        }
        let byte = data.get_u8();
        value |= u64::from(byte & 0x7F) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok((value, available - data.remaining()));
        }
    }

    Err(HeaderFault::SizeTooLong)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_header() {
        // temporal delimiter with a zero size field
        let header = parse_obu_header(&[0x12, 0x00]).unwrap();
        assert_eq!(header.obu_type, ObuType::TemporalDelimiter);
        assert!(header.has_size_field);
        assert!(!header.has_extension);
        assert_eq!(header.header_size, 2);
        assert_eq!(header.payload_size, 0);
        assert_eq!(header.total_size(), 2);
    }

    #[test]
    fn test_parse_extension_header() {
        // sequence header, extension, size 3; temporal_id 5, spatial_id 2
        let data = [0x0E, 0b1011_0000, 0x03, 0xAA, 0xBB, 0xCC];
        let header = parse_obu_header(&data).unwrap();
        assert_eq!(header.obu_type, ObuType::SequenceHeader);
        assert_eq!(header.temporal_id, 5);
        assert_eq!(header.spatial_id, 2);
        assert_eq!(header.header_size, 3);
        assert_eq!(header.payload_size, 3);
    }

    #[test]
    fn test_parse_without_size_field() {
        // frame, no size field: payload runs to the end
        let header = parse_obu_header(&[0x30, 1, 2, 3, 4]).unwrap();
        assert_eq!(header.obu_type, ObuType::Frame);
        assert_eq!(header.header_size, 1);
        assert_eq!(header.payload_size, 4);

        let header = parse_obu_header(&[0x34, 0x20, 1, 2]).unwrap();
        assert_eq!(header.header_size, 2);
        assert_eq!(header.payload_size, 2);
        assert_eq!(header.temporal_id, 1);
    }

    #[test]
    fn test_reserved_bit_is_ignored() {
        let header = parse_obu_header(&[0x13, 0x00]).unwrap();
        assert_eq!(header.obu_type, ObuType::TemporalDelimiter);
    }

    #[test]
    fn test_multi_byte_size() {
        // 300 = 0b1_0010_1100 -> 0xAC 0x02
        let header = parse_obu_header(&[0x32, 0xAC, 0x02]).unwrap();
        assert_eq!(header.payload_size, 300);
        assert_eq!(header.header_size, 3);
    }

    #[test]
    fn test_header_faults() {
        assert_eq!(parse_obu_header(&[]), Err(HeaderFault::Empty));
        assert_eq!(parse_obu_header(&[0x92, 0x00]), Err(HeaderFault::ForbiddenBit));
        assert_eq!(parse_obu_header(&[0x16]), Err(HeaderFault::MissingExtension));
        assert_eq!(parse_obu_header(&[0x12]), Err(HeaderFault::TruncatedSize));
        assert_eq!(
            parse_obu_header(&[0x12, 0x80, 0x80]),
            Err(HeaderFault::TruncatedSize)
        );
        assert_eq!(
            parse_obu_header(&[0x12, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]),
            Err(HeaderFault::SizeTooLong)
        );
    }

    #[test]
    fn test_read_leb128() {
        assert_eq!(read_leb128(&[0x00]), Ok((0, 1)));
        assert_eq!(read_leb128(&[0x7F, 0xFF]), Ok((127, 1)));
        assert_eq!(read_leb128(&[0x80, 0x01]), Ok((128, 2)));
        assert_eq!(
            read_leb128(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]),
            Ok(((1u64 << 56) - 1, 8))
        );
    }
}
