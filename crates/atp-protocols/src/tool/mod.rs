//! Tool protocol definitions.
//!
//! A tool is a named handler plus the public schema advertised to models.

mod call;
mod definition;
mod handler;

pub use call::*;
pub use definition::*;
pub use handler::*;
