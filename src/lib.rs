//! Headless admin client for the Smart HR backend.
//!
//! The library owns the state a browser front-end would keep: the persisted
//! session, the permission set, route guarding, paginated tables and forms.
//! The `smart-hr` binary drives the same controllers from the command line.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod notify;
pub mod permissions;
pub mod routing;
pub mod services;
pub mod session;
pub mod table;
pub mod types;

pub use error::ClientError;
