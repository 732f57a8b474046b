pub mod error;
pub mod harness;
pub mod model;
pub mod platform;
pub mod port;
pub mod probe;
pub mod regmap;
pub mod safety;
pub mod soc_ctrl;
pub mod utils;

pub use error::{Error, FaultDomain, Result};
pub use harness::Harness;
pub use platform::PlatformConfig;
pub use port::MemPort;
pub use probe::Strategy;
pub use utils::log::init_log;
