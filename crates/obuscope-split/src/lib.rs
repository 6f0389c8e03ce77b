//! # obuscope-split
//!
//! AV1 OBU extraction for start-code and length-delimited bitstreams.
//!
//! A packet is split into a sequence of OBUs with known type, temporal
//! and spatial ids, payload, and significant bit length, regardless of
//! how the OBUs were delimited on the wire.
//!
//! ## Features
//!
//! - Framing detection: low overhead (length-delimited) or 0x000001 start codes
//! - Emulation prevention removal for start-code framing
//! - Tolerant decoding: truncated OBUs are clamped to the available bytes
//! - Buffer and descriptor reuse across packets
//!
//! ## Example
//!
//! ```
//! use obuscope_split::{Framing, PacketSplitter};
//!
//! let packet = [
//!     0x00, 0x00, 0x01, 0x10, // temporal delimiter
//!     0x00, 0x00, 0x01, 0x28, 0x00, 0x00, 0x03, 0x01, 0x80, // metadata
//! ];
//!
//! let mut splitter = PacketSplitter::new();
//! let units = splitter.split(&packet).unwrap();
//!
//! assert_eq!(units.framing(), Framing::StartCode);
//! for unit in units.iter() {
//!     println!(
//!         "{} at {}: {} payload bytes, {} bits",
//!         unit.obu_type(),
//!         unit.raw_offset(),
//!         unit.payload_size(),
//!         unit.bit_length()
//!     );
//! }
//! ```

pub mod buffer;
pub mod error;
pub mod obu;
pub mod split;
pub mod timing;
pub mod types;

pub use buffer::GrowableBuffer;
pub use error::{HeaderFault, Result, SplitError};
pub use obu::{detect_framing, is_start_code_format, is_temporal_unit_start};
pub use split::{PacketSplitter, Unit, UnitSequence};
pub use timing::framerate;
pub use types::*;

/// Split a packet and return owned summaries of its OBUs.
///
/// Convenience wrapper for one-off use; keep a [`PacketSplitter`] around
/// when splitting many packets.
pub fn split_packet(data: &[u8], config: SplitConfig) -> Result<(Framing, Vec<UnitInfo>)> {
    let mut splitter = PacketSplitter::with_config(config);
    let units = splitter.split(data)?;
    Ok((units.framing(), units.infos()))
}
