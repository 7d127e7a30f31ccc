//! Error types for the ATP protocol layer.

mod auth;
mod protocol;
mod provider;
mod tool;
mod transport;

pub use auth::*;
pub use protocol::*;
pub use provider::*;
pub use tool::*;
pub use transport::*;
