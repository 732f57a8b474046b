/// Logging setup shared by the driver binary and integration tests
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialise env_logger once; repeated calls are no-ops so tests can
/// call this freely
pub fn init_log(quiet: bool) {
  INIT.call_once(|| {
    let level = if quiet {
      log::LevelFilter::Error
    } else {
      log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
      .filter_level(level)
      .init();
  });
}
