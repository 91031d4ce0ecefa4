//! Outbound HTTP access to the geoportal API.

pub mod client;
pub mod transport;

pub use client::HttpTransport;
pub use transport::{RawResponse, Transport};
