//! Packet splitting
//!
//! [`PacketSplitter`] turns a packet into a sequence of OBUs. It owns the
//! de-escaping buffer and the descriptor list; both keep their capacity
//! between calls, so a long-lived splitter settles into a steady state
//! without reallocating.
//!
//! ```
//! use obuscope_split::{ObuType, PacketSplitter};
//!
//! // temporal delimiter, then a sequence header with a 2 byte payload
//! let packet = [0x12, 0x00, 0x0A, 0x02, 0xAB, 0x80];
//!
//! let mut splitter = PacketSplitter::new();
//! let units = splitter.split(&packet).unwrap();
//!
//! assert_eq!(units.len(), 2);
//! assert_eq!(units.get(1).unwrap().obu_type(), ObuType::SequenceHeader);
//! ```

use bytes::Buf;
use tracing::{debug_span, trace, warn};

use crate::buffer::GrowableBuffer;
use crate::error::Result;
use crate::obu::{
    extract_unit, is_start_code_format, obu_bit_length, ExtractedUnit, Storage, START_CODE,
};
use crate::types::{Framing, ObuType, SplitConfig, UnitInfo};

/// An extracted OBU with its measured bit length
#[derive(Debug, Clone)]
pub(crate) struct UnitDescriptor {
    unit: ExtractedUnit,
    bit_length: usize,
}

/// Splits packets into OBUs, owning everything the results borrow from
#[derive(Debug, Default)]
pub struct PacketSplitter {
    config: SplitConfig,
    buffer: GrowableBuffer,
    units: Vec<UnitDescriptor>,
}

impl PacketSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SplitConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split `input` into OBUs.
    ///
    /// The framing is decided once for the whole input. In start-code
    /// framing each OBU may be preceded by a start code and may contain
    /// emulation prevention bytes; in length-delimited framing OBUs are
    /// referenced in place.
    ///
    /// A malformed header aborts the call. An OBU whose bit length cannot
    /// be computed, or which measures zero bits without being a temporal
    /// delimiter or padding, is logged and left out.
    ///
    /// The returned view borrows both `input` and this splitter; the
    /// splitter can be reused once the view is dropped. After an error,
    /// [`len`](Self::len) still reports the OBUs collected before it.
    pub fn split<'a>(&'a mut self, input: &'a [u8]) -> Result<UnitSequence<'a>> {
        let _span = debug_span!("split", len = input.len()).entered();

        let framing = self.config.framing.resolve(input);
        trace!(%framing, "framing selected");

        self.buffer.prepare(input.len())?;
        self.units.clear();

        let mut rest = input;
        while rest.has_remaining() {
            if framing == Framing::StartCode && is_start_code_format(rest) {
                rest.advance(START_CODE.len());
            }

            let offset = input.len() - rest.remaining();
            let unit = extract_unit(rest, &mut self.buffer, framing.allows_escapes())?;
            rest.advance(unit.raw.end);
            let unit = unit.offset_by(offset);

            let obu_type = unit.header.obu_type;
            let payload = match unit.storage {
                Storage::Input => &input[unit.payload.clone()],
                Storage::Buffer => &self.buffer.as_slice()[unit.payload.clone()],
            };

            let bit_length = match obu_bit_length(payload, obu_type) {
                Ok(0) if !obu_type.may_be_empty() => {
                    warn!(%obu_type, offset, "OBU has no payload bits, skipping");
                    continue;
                }
                Ok(bits) => bits,
                Err(e) => {
                    warn!(%obu_type, offset, error = %e, "Invalid OBU, skipping");
                    continue;
                }
            };

            self.units.push(UnitDescriptor { unit, bit_length });
        }

        Ok(UnitSequence {
            framing,
            input,
            buffer: self.buffer.as_slice(),
            units: &self.units,
        })
    }

    /// OBUs collected by the last call to [`split`](Self::split)
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The de-escaping buffer
    pub fn buffer(&self) -> &GrowableBuffer {
        &self.buffer
    }

    /// Forget all OBUs and release the buffer
    pub fn reset(&mut self) {
        self.units.clear();
        self.buffer.release();
    }
}

/// OBUs of one packet, in input order
#[derive(Debug, Clone, Copy)]
pub struct UnitSequence<'a> {
    framing: Framing,
    input: &'a [u8],
    buffer: &'a [u8],
    units: &'a [UnitDescriptor],
}

impl<'a> UnitSequence<'a> {
    /// Framing used for this packet
    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Unit<'a>> {
        self.units.get(index).map(|desc| self.unit(desc))
    }

    pub fn iter(&self) -> impl Iterator<Item = Unit<'a>> + '_ {
        self.units.iter().map(|desc| self.unit(desc))
    }

    /// Owned summaries of every OBU
    pub fn infos(&self) -> Vec<UnitInfo> {
        self.iter().map(|unit| unit.info()).collect()
    }

    fn unit(&self, desc: &'a UnitDescriptor) -> Unit<'a> {
        Unit {
            desc,
            input: self.input,
            buffer: self.buffer,
        }
    }
}

/// A borrowed view of one OBU
#[derive(Debug, Clone, Copy)]
pub struct Unit<'a> {
    desc: &'a UnitDescriptor,
    input: &'a [u8],
    buffer: &'a [u8],
}

impl<'a> Unit<'a> {
    pub fn obu_type(&self) -> ObuType {
        self.desc.unit.header.obu_type
    }

    pub fn temporal_id(&self) -> u8 {
        self.desc.unit.header.temporal_id
    }

    pub fn spatial_id(&self) -> u8 {
        self.desc.unit.header.spatial_id
    }

    pub fn header_size(&self) -> usize {
        self.desc.unit.header.header_size
    }

    /// Payload after escape removal, without the header
    pub fn payload(&self) -> &'a [u8] {
        &self.storage()[self.desc.unit.payload.clone()]
    }

    pub fn payload_size(&self) -> usize {
        self.desc.unit.payload_size()
    }

    /// Payload bits before `trailing_bits()`
    pub fn bit_length(&self) -> usize {
        self.desc.bit_length
    }

    /// Header and payload after escape removal
    pub fn escaped(&self) -> &'a [u8] {
        &self.storage()[self.desc.unit.escaped.clone()]
    }

    pub fn escaped_size(&self) -> usize {
        self.desc.unit.escaped.len()
    }

    /// The OBU as it appears in the input
    pub fn raw(&self) -> &'a [u8] {
        &self.input[self.desc.unit.raw.clone()]
    }

    /// Input bytes consumed by this OBU
    pub fn raw_size(&self) -> usize {
        self.desc.unit.raw.len()
    }

    /// Position of the OBU in the input
    pub fn raw_offset(&self) -> usize {
        self.desc.unit.raw.start
    }

    /// Whether the OBU went through emulation prevention removal
    pub fn was_escaped(&self) -> bool {
        self.desc.unit.storage == Storage::Buffer
    }

    pub fn info(&self) -> UnitInfo {
        UnitInfo {
            offset: self.raw_offset(),
            obu_type: self.obu_type(),
            temporal_id: self.temporal_id(),
            spatial_id: self.spatial_id(),
            header_size: self.header_size(),
            payload_size: self.payload_size(),
            bit_length: self.bit_length(),
            raw_size: self.raw_size(),
            escaped_size: self.escaped_size(),
            escaped: self.was_escaped(),
        }
    }

    fn storage(&self) -> &'a [u8] {
        match self.desc.unit.storage {
            Storage::Input => self.input,
            Storage::Buffer => self.buffer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HeaderFault, SplitError};
    use crate::types::FramingMode;

    #[test]
    fn test_split_length_delimited() {
        let packet = [0x12, 0x00, 0x0A, 0x02, 0xAB, 0x80];
        let mut splitter = PacketSplitter::new();
        let units = splitter.split(&packet).unwrap();

        assert_eq!(units.framing(), Framing::LengthDelimited);
        assert_eq!(units.len(), 2);

        let td = units.get(0).unwrap();
        assert_eq!(td.obu_type(), ObuType::TemporalDelimiter);
        assert_eq!(td.bit_length(), 0);
        assert_eq!(td.raw_size(), 2);

        let sh = units.get(1).unwrap();
        assert_eq!(sh.payload(), &[0xAB, 0x80]);
        assert_eq!(sh.bit_length(), 8);
        assert_eq!(sh.raw_offset(), 2);
        assert!(!sh.was_escaped());
    }

    #[test]
    fn test_split_start_code() {
        let packet = [
            0x00, 0x00, 0x01, 0x10, // temporal delimiter
            0x00, 0x00, 0x01, 0x28, 0x00, 0x00, 0x03, 0x01, 0x80, // escaped metadata
        ];
        let mut splitter = PacketSplitter::new();
        let units = splitter.split(&packet).unwrap();

        assert_eq!(units.framing(), Framing::StartCode);
        assert_eq!(units.len(), 2);
        assert_eq!(units.get(0).unwrap().raw_offset(), 3);

        let md = units.get(1).unwrap();
        assert!(md.was_escaped());
        assert_eq!(md.raw_offset(), 7);
        assert_eq!(md.raw_size(), 6);
        assert_eq!(md.payload(), &[0x00, 0x00, 0x01, 0x80]);
        assert_eq!(md.escaped(), &[0x28, 0x00, 0x00, 0x01, 0x80]);
    }

    #[test]
    fn test_zero_length_payload_dropped() {
        // metadata with an all-zero payload, then a temporal delimiter
        let packet = [0x2A, 0x02, 0x00, 0x00, 0x12, 0x00];
        let mut splitter = PacketSplitter::new();
        let units = splitter.split(&packet).unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units.get(0).unwrap().obu_type(), ObuType::TemporalDelimiter);
    }

    #[test]
    fn test_invalid_header_aborts() {
        let packet = [0x12, 0x00, 0x92, 0x00];
        let mut splitter = PacketSplitter::new();
        let err = splitter.split(&packet).unwrap_err();

        assert_eq!(err, SplitError::InvalidHeader(HeaderFault::ForbiddenBit));
        assert_eq!(splitter.len(), 1);
    }

    #[test]
    fn test_forced_length_delimited_keeps_escapes() {
        let packet = [0x2A, 0x04, 0x00, 0x00, 0x03, 0x80];
        let mut splitter = PacketSplitter::with_config(SplitConfig {
            framing: FramingMode::LengthDelimited,
        });
        let units = splitter.split(&packet).unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units.get(0).unwrap().payload(), &[0x00, 0x00, 0x03, 0x80]);
    }

    #[test]
    fn test_empty_input() {
        let mut splitter = PacketSplitter::new();
        let units = splitter.split(&[]).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_reset_releases_buffer() {
        let mut splitter = PacketSplitter::new();
        splitter.split(&[0x12, 0x00]).unwrap();
        assert_eq!(splitter.len(), 1);

        splitter.reset();
        assert!(splitter.is_empty());
        assert_eq!(splitter.buffer().capacity(), 0);
    }
}
