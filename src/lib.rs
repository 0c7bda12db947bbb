//! Greeter: a key-value greeting service backed by DynamoDB.
//!
//! Serves `GET`/`POST /greeting/{key}` against a [`storage::GreetingStore`]
//! and a `/ping` health check.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
