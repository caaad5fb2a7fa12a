//! HTTP API for Herald
//!
//! A thin axum surface over the campaign dispatcher: submit single or bulk
//! campaigns, list and inspect scheduled jobs, cancel by id, and test the
//! transport configuration. The campaign semantics live entirely in
//! `herald-campaign`; this crate only translates requests and errors.

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{HttpConfig, ServerError, serve};
