//! Token lifecycle management.

mod service;

pub use service::{AccessClaims, RefreshClaims, TokenError, TokenPair, TokenService};
