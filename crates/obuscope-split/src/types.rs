//! Core types shared by the extraction engine

use std::fmt;

/// AV1 OBU types (the 4-bit `obu_type` header field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum ObuType {
    SequenceHeader,
    TemporalDelimiter,
    FrameHeader,
    TileGroup,
    Metadata,
    Frame,
    RedundantFrameHeader,
    TileList,
    Padding,
    /// Values 0 and 9-14
    Reserved(u8),
}

impl From<u8> for ObuType {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            1 => ObuType::SequenceHeader,
            2 => ObuType::TemporalDelimiter,
            3 => ObuType::FrameHeader,
            4 => ObuType::TileGroup,
            5 => ObuType::Metadata,
            6 => ObuType::Frame,
            7 => ObuType::RedundantFrameHeader,
            8 => ObuType::TileList,
            15 => ObuType::Padding,
            v => ObuType::Reserved(v),
        }
    }
}

impl ObuType {
    /// The numeric `obu_type` value
    pub fn as_u8(self) -> u8 {
        match self {
            ObuType::SequenceHeader => 1,
            ObuType::TemporalDelimiter => 2,
            ObuType::FrameHeader => 3,
            ObuType::TileGroup => 4,
            ObuType::Metadata => 5,
            ObuType::Frame => 6,
            ObuType::RedundantFrameHeader => 7,
            ObuType::TileList => 8,
            ObuType::Padding => 15,
            ObuType::Reserved(v) => v,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ObuType::SequenceHeader => "sequence_header",
            ObuType::TemporalDelimiter => "temporal_delimiter",
            ObuType::FrameHeader => "frame_header",
            ObuType::TileGroup => "tile_group",
            ObuType::Metadata => "metadata",
            ObuType::Frame => "frame",
            ObuType::RedundantFrameHeader => "redundant_frame_header",
            ObuType::TileList => "tile_list",
            ObuType::Padding => "padding",
            ObuType::Reserved(_) => "reserved",
        }
    }

    /// Tile data and frames end byte-aligned without `trailing_bits()`
    pub fn has_trailing_bits(self) -> bool {
        !matches!(
            self,
            ObuType::TileGroup | ObuType::TileList | ObuType::Frame
        )
    }

    /// Types whose payload may legitimately be empty
    pub fn may_be_empty(self) -> bool {
        matches!(self, ObuType::TemporalDelimiter | ObuType::Padding)
    }
}

impl fmt::Display for ObuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObuType::Reserved(v) => write!(f, "reserved({})", v),
            other => f.write_str(other.name()),
        }
    }
}

/// Framing convention of a bitstream buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "kebab-case"))]
pub enum Framing {
    /// Low overhead bitstream format: each OBU carries its own size
    LengthDelimited,
    /// 0x000001 start code before every OBU, emulation prevention applied
    StartCode,
}

impl Framing {
    /// Whether emulation prevention bytes may be present and must be removed.
    ///
    /// Start-code framing always allows escapes, length-delimited framing
    /// never does.
    pub fn allows_escapes(self) -> bool {
        matches!(self, Framing::StartCode)
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Framing::LengthDelimited => write!(f, "length-delimited"),
            Framing::StartCode => write!(f, "start-code"),
        }
    }
}

/// How the splitter chooses the framing of its input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "kebab-case"))]
pub enum FramingMode {
    /// Inspect the first bytes of every input
    #[default]
    Auto,
    StartCode,
    LengthDelimited,
}

impl FramingMode {
    pub fn resolve(self, data: &[u8]) -> Framing {
        match self {
            FramingMode::Auto => crate::obu::detect_framing(data),
            FramingMode::StartCode => Framing::StartCode,
            FramingMode::LengthDelimited => Framing::LengthDelimited,
        }
    }
}

impl std::str::FromStr for FramingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(FramingMode::Auto),
            "start-code" | "startcode" | "annexb" => Ok(FramingMode::StartCode),
            "length-delimited" | "section5" | "low-overhead" => Ok(FramingMode::LengthDelimited),
            other => Err(format!("unknown framing mode: {}", other)),
        }
    }
}

/// Splitter configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitConfig {
    pub framing: FramingMode,
}

/// Owned summary of one extracted OBU
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct UnitInfo {
    /// Offset of the OBU in the caller's input (start code excluded)
    pub offset: usize,
    pub obu_type: ObuType,
    pub temporal_id: u8,
    pub spatial_id: u8,
    pub header_size: usize,
    pub payload_size: usize,
    /// Significant payload bits, trailing bits excluded
    pub bit_length: usize,
    /// Bytes consumed from the input
    pub raw_size: usize,
    /// Header plus payload after escape removal
    pub escaped_size: usize,
    /// Whether emulation prevention bytes had to be processed
    pub escaped: bool,
}

/// A reduced rational number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Rational {
    pub num: i32,
    pub den: i32,
}

impl Rational {
    pub fn as_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}
