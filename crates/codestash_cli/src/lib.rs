//! HTTP backend and output helpers for the `cstash` command-line client.

pub mod client;
pub mod output;

pub use client::HttpSnippetApi;
