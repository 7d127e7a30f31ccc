//! HTTP layer.

pub mod guard;
pub mod handlers;
pub mod routes;
