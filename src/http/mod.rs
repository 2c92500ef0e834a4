//! HTTP dispatch with session scoping and error classification.

mod client;

pub use client::HttpClient;
