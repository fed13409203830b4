//! Shared HTTP plumbing for the service clients

mod client;

pub use client::{HttpClient, HttpClientBuilder};
