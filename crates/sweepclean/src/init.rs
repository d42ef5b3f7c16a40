//! Process-level setup.

/// Installs the `env_logger` backend for the `log` facade.
///
/// Safe to call more than once; later calls and calls after another logger
/// was installed are ignored. Returns true if this call installed the logger.
pub fn init_logging() -> bool {
    let installed = env_logger::try_init().is_ok();
    if installed {
        log::info!("sweepclean-rs logging initialized");
    }
    installed
}
