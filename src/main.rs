use anyhow::Result;
use std::process;
use log::error;

use devbizops::{app, cli, logging};

fn main() {
    // Set up panic handler with better error reporting
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {:?}", panic_info);
        eprintln!("Panic: {:?}", panic_info);
        process::exit(101);
    }));

    if let Err(e) = run() {
        let error_msg = e.to_string();

        // Bad input files are user errors, not worth a log entry
        let is_user_error = error_msg.contains("Script file does not exist") ||
                           error_msg.contains("Failed to open script") ||
                           error_msg.contains("Conflicting log level flags");

        if is_user_error {
            eprintln!("{}", e);
        } else {
            error!("Application error: {:#}", e);
            eprintln!("Error: {:#}", e);
        }

        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::args::parse_args();

    cli::args::validate_args(&args)?;

    let config_manager = app::load_configuration(&args)?;

    let log_config = app::configure_logging(&args, &config_manager)?;
    logging::init_logger(log_config)?;

    // Handle configuration export command first (before creating runtime)
    if let Some(export_path) = &args.export_config {
        return app::initialization::handle_export_config(&config_manager, export_path);
    }

    // Single current_thread runtime for the whole session
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        app::run_session(&args, &config_manager).await
    })?;

    Ok(())
}
