//! Shared utilities:
//!
//! - [`errors`]: application error type and HTTP mapping
//! - [`jwt`]: bearer token creation and verification
//! - [`pagination`]: list pagination parameters and metadata

pub mod errors;
pub mod jwt;
pub mod pagination;
