//! Configuration loaded from environment variables at startup.
//!
//! - [`cors`]: allowed CORS origins
//! - [`database`]: PostgreSQL connection pool
//! - [`jwt`]: bearer token secret and expiry
//! - [`throttle`]: daily request quotas for the enrollment endpoints

pub mod cors;
pub mod database;
pub mod jwt;
pub mod throttle;
