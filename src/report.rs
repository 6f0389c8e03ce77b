//! Split results for display

use obuscope_split::{Framing, UnitInfo, UnitSequence};
use serde::Serialize;
use std::fmt::Write;

/// Everything printed for one input file
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub file: String,
    pub size: usize,
    pub framing: Framing,
    pub temporal_unit_start: bool,
    pub units: Vec<UnitReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    pub index: usize,
    pub type_name: &'static str,
    #[serde(flatten)]
    pub info: UnitInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl SplitReport {
    /// Build a report, dumping up to `hex_preview` payload bytes per OBU
    pub fn new(file: String, data: &[u8], units: &UnitSequence<'_>, hex_preview: usize) -> Self {
        let framing = units.framing();
        let units = units
            .iter()
            .enumerate()
            .map(|(index, unit)| {
                let preview = (hex_preview > 0).then(|| {
                    let payload = unit.payload();
                    hex::encode(&payload[..payload.len().min(hex_preview)])
                });

                UnitReport {
                    index,
                    type_name: unit.obu_type().name(),
                    info: unit.info(),
                    preview,
                }
            })
            .collect();

        Self {
            file,
            size: data.len(),
            framing,
            temporal_unit_start: obuscope_split::is_temporal_unit_start(data),
            units,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "File: {}", self.file);
        let _ = writeln!(out, "Size: {} bytes", self.size);
        let _ = writeln!(out, "Framing: {}", self.framing);
        let _ = writeln!(out, "Temporal unit start: {}", self.temporal_unit_start);
        let _ = writeln!(out, "\nOBUs: {}", self.units.len());

        for unit in &self.units {
            let info = &unit.info;
            let _ = write!(
                out,
                "  [{}] @{} {} tid={} sid={} header={} payload={} bits={} raw={}",
                unit.index,
                info.offset,
                info.obu_type,
                info.temporal_id,
                info.spatial_id,
                info.header_size,
                info.payload_size,
                info.bit_length,
                info.raw_size
            );
            if info.escaped {
                let _ = write!(out, " [escaped]");
            }
            let _ = writeln!(out);
            if let Some(ref preview) = unit.preview {
                let _ = writeln!(out, "      {}", preview);
            }
        }

        out
    }
}
