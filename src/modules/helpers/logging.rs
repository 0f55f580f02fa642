use std::env;

use dotenvy::dotenv;
use fern::Dispatch;

/// # set up logging
/// configure the fern dispatcher from the LOGGING_LEVEL entry of the .env
/// file, defaulting to info when the variable is missing or unknown.
/// everything is written to program.log with a timestamp, target and level.
pub fn setup_logging() -> Result<(), fern::InitError> {
    dotenv().ok();

    let verbosity = env::var("LOGGING_LEVEL").unwrap_or_else(|_| "INFO".to_string());

    let mut base_config = fern::Dispatch::new();
    base_config = match verbosity.as_str() {
        "OFF" => base_config.level(log::LevelFilter::Off),
        "ERROR" => base_config.level(log::LevelFilter::Error),
        "WARN" => base_config.level(log::LevelFilter::Warn),
        "DEBUG" => base_config.level(log::LevelFilter::Debug),
        "TRACE" => base_config.level(log::LevelFilter::Trace),
        _ => {
            // default to info
            base_config.level(log::LevelFilter::Info)
        }
    };

    let file_logger_config = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(fern::log_file("program.log")?);

    base_config.chain(file_logger_config).apply()?;

    Ok(())
}
