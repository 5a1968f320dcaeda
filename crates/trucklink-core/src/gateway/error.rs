//! Gateway errors

use thiserror::Error;

/// Errors reported by a remote vehicle gateway
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Gateway unreachable: {0}")]
    Unreachable(String),

    #[error("Gateway request timed out")]
    Timeout,

    #[error("Vehicle rejected the request: {0}")]
    Rejected(String),

    #[error("Invalid response from gateway: {0}")]
    InvalidResponse(String),
}
