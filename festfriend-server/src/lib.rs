//! FestFriend server: HTTP front end for the password-gated group registry
//! in `festfriend-protocol`.

pub mod config;
pub mod http;
pub mod logging;

pub use config::{Args, ServerConfig};
pub use http::{router, ApiError, AppState, GroupServer, RunningServer, ServerError};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version
pub fn get_version() -> &'static str {
    VERSION
}
