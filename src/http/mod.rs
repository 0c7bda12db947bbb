//! HTTP server module.
//!
//! Binds the configured address, serves the router and drains in-flight
//! requests on SIGTERM/SIGINT. TLS terminates at the load balancer, so the
//! service only speaks plain HTTP.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
pub use shutdown::shutdown_signal;
