pub mod client;
pub mod query;

pub use client::{unwrap_data, ApiClient, ByteStream};
pub use query::ListQuery;
