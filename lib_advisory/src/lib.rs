// Re-export the `beep` function from the `actually_beep` crate
#[cfg(feature = "notify")]
pub use actually_beep::beep_with_hz_and_millis;

// Declare the modules, gated per folder like the Cargo features.
#[cfg(feature = "broadcast")]
pub mod broadcast;
#[cfg(feature = "extract")]
pub mod extract;
#[cfg(feature = "guard")]
pub mod guard;
#[cfg(feature = "loggers")]
pub mod loggers;
#[cfg(feature = "markets")]
pub mod markets;
#[cfg(feature = "models")]
pub mod models;
#[cfg(feature = "notify")]
pub mod notify;
#[cfg(feature = "performance")]
pub mod performance;
#[cfg(feature = "reconcile")]
pub mod reconcile;
#[cfg(feature = "retrieve")]
pub mod retrieve;
#[cfg(feature = "store")]
pub mod store;
#[cfg(feature = "utils")]
pub mod utils;

// Re-export the flat surface most binaries use.
#[cfg(feature = "loggers")]
pub use loggers::loggerlocal::*;
#[cfg(feature = "loggers")]
pub use loggers::logrecord::*;
#[cfg(feature = "models")]
pub use models::*;
#[cfg(feature = "utils")]
pub use utils::sys_info::*;
#[cfg(feature = "utils")]
pub use utils::time::*;
