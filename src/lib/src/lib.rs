//! # libvantage
//!
//! Core of the Vantage synchronization server. Measurement clients register an
//! account, fetch the experiments an operator assigned to them and upload their
//! results and logs. This crate holds everything below the HTTP layer:
//!
//! - [`config`]: server configuration and the runtime-mutable settings handle
//! - [`model`]: accounts and credential hashing
//! - [`storage`]: the account store and the per-client data layout
//! - [`repositories`]: operations that span the account store and the layout
//! - [`view`]: JSON bodies returned by the server
//!
//! The HTTP routes themselves live in the `vantage-server` crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod repositories;
pub mod storage;
pub mod util;
pub mod view;
