//! HTTP transport used by the GitHub client.

mod client;

pub use client::HttpClient;
