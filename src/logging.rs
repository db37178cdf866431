// logging.rs — rotating debug log under ~/.mailsweep/logs.
//
// The sweep swallows most failures on purpose (fetch, parse, trash); the
// debug file is where those land, so it must always be on. stderr only
// carries warnings and up, keeping cron output quiet.

use anyhow::Context;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};

use crate::config;
use crate::paths;

pub fn init_logging() -> anyhow::Result<()> {
    let log_dir = paths::ensure_home_subdir(config::logging::LOG_DIR_REL)
        .context("cannot prepare log directory")?;

    Logger::try_with_str("debug")?
        .log_to_file(FileSpec::default().directory(log_dir).basename(config::logging::LOG_FILE_NAME))
        .rotate(
            Criterion::Size(config::logging::LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config::logging::LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .format(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    log::info!("{}", "=".repeat(60));
    log::info!("mailsweep {} starting", config::APP_VERSION);
    log::info!("{}", "=".repeat(60));

    Ok(())
}
