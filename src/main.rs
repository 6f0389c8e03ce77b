mod cli;

use obuscope::{
    config::{self, OutputFormat},
    report::SplitReport,
};
use obuscope_split::{FramingMode, PacketSplitter};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn init_logging(verbose: bool, configured: Option<&str>) {
    // Respect RUST_LOG env var if set, then --verbose, then the config file
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if verbose {
            "obuscope=trace,obuscope_split=trace".to_string()
        } else if let Some(filter) = configured {
            filter.to_string()
        } else {
            "obuscope=info,obuscope_split=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Split {
            file,
            framing,
            json,
            hex,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            init_logging(cli.verbose, config.logging.filter.as_deref());

            if let Some(framing) = framing {
                config.split.framing = framing;
            }
            if json {
                config.output.format = OutputFormat::Json;
            }
            if let Some(hex) = hex {
                config.output.hex_preview = hex;
            }
            config::validate_config(&config)?;

            split_file(&file, &config)
        }
        Commands::Detect { file } => {
            init_logging(cli.verbose, None);
            detect_file(&file)
        }
        Commands::Validate {
            config: config_path,
        } => {
            init_logging(cli.verbose, None);
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("obuscope {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn read_input(file: &Path) -> Result<Vec<u8>> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    std::fs::read(file).with_context(|| format!("Failed to read {:?}", file))
}

fn split_file(file: &Path, config: &config::Config) -> Result<()> {
    let data = read_input(file)?;
    tracing::info!("Splitting {:?} ({} bytes)", file, data.len());

    let mut splitter = PacketSplitter::with_config(config.split.to_split_config());
    let units = splitter
        .split(&data)
        .with_context(|| format!("Failed to split {:?}", file))?;

    tracing::debug!("Found {} OBUs ({})", units.len(), units.framing());

    let report = SplitReport::new(
        file.display().to_string(),
        &data,
        &units,
        config.output.hex_preview,
    );

    match config.output.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", report.to_text()),
    }

    Ok(())
}

fn detect_file(file: &Path) -> Result<()> {
    let data = read_input(file)?;
    let framing = FramingMode::Auto.resolve(&data);

    println!("Framing: {}", framing);
    println!(
        "Temporal unit start: {}",
        obuscope_split::is_temporal_unit_start(&data)
    );

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(path)?;

    println!("Configuration is valid");
    println!("  Framing: {:?}", config.split.framing);
    println!("  Output: {:?}", config.output.format);
    if config.output.hex_preview > 0 {
        println!("  Hex preview: {} bytes", config.output.hex_preview);
    }
    if let Some(ref filter) = config.logging.filter {
        println!("  Log filter: {}", filter);
    }

    Ok(())
}
