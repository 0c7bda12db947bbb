//! Health check endpoint for the load balancer target group.
//!
//! Answers on any method and never touches the store, so a failing backend
//! does not take instances out of rotation.

use crate::config::MSG_HEALTH_CHECK;

/// Health check handler.
pub async fn ping() -> &'static str {
    MSG_HEALTH_CHECK
}
