pub mod auth;
pub mod config;
pub mod master_data;
pub mod resource;
