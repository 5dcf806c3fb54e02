use clap::Parser;
use anyhow::Result;
use std::path::PathBuf;
use log::{debug, info};

/// Notification center console for DevBizOps dashboards
#[derive(Parser, Debug)]
#[command(name = "devbizops")]
#[command(about = "Drive a DevBizOps notification center from a script or stdin and watch notifications appear, collapse and expire")]
#[command(version)]
pub struct Args {
    /// Read commands from a script file instead of stdin
    #[arg(short = 's', long = "script", value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Configuration section name
    #[arg(long, value_name = "SECTION")]
    pub config_name: Option<String>,

    /// Write the effective configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub export_config: Option<PathBuf>,

    // ============ DISPLAY FLAGS ============

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Force coloured output even when stdout is not a terminal
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Print notifications and events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Show notification ids next to each entry
    #[arg(long = "show-ids")]
    pub show_ids: bool,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    debug!("Parsing command line arguments");
    let args = Args::parse();
    debug!("Parsed CLI arguments: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    debug!("Validating CLI argument combinations");

    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    match args.log_format.to_lowercase().as_str() {
        "text" | "json" => {},
        _ => return Err(anyhow::anyhow!(
            "Invalid log format '{}'. Valid options: text, json", args.log_format
        )),
    }

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {},
            _ => return Err(anyhow::anyhow!(
                "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace", level
            )),
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!(
            "--log-file-level requires --log-file to be specified"
        ));
    }

    if let Some(ref script) = args.script {
        if !script.is_file() {
            return Err(anyhow::anyhow!(
                "Script file does not exist: {}", script.display()
            ));
        }
    }

    info!("CLI arguments validated successfully");
    Ok(())
}

#[cfg(test)]
pub(crate) fn create_test_args() -> Args {
    Args {
        script: None,
        verbose: false,
        quiet: false,
        debug: false,
        log_format: "text".to_string(),
        log_file: None,
        log_file_level: None,
        config_file: None,
        config_name: None,
        export_config: None,
        no_color: false,
        color: false,
        json: false,
        show_ids: false,
    }
}
