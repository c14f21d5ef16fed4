mod editor;

use std::process::ExitCode;

use sparse_engine::config::PlatformConfig;
use sparse_engine::logging::{init_logging, LoggingConfig};
use sparse_engine::runtime::Runtime;

use editor::Editor;

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match Runtime::run(PlatformConfig::default(), Editor::default()) {
        Ok(report) => {
            log::info!(
                "editor closed ({:?}) after {} frames",
                report.exit_reason,
                report.frames
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("startup failed: {err:#}");
            ExitCode::from(1)
        }
    }
}
