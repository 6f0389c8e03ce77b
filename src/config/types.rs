use obuscope_split::{FramingMode, SplitConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub split: SplitSettings,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SplitSettings {
    /// Framing of input files: auto, start-code or length-delimited
    #[serde(default)]
    pub framing: FramingMode,
}

impl SplitSettings {
    pub fn to_split_config(&self) -> SplitConfig {
        SplitConfig {
            framing: self.framing,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Payload bytes to dump per OBU (0 disables the preview)
    #[serde(default)]
    pub hex_preview: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// EnvFilter directive used when RUST_LOG is not set
    #[serde(default)]
    pub filter: Option<String>,
}
