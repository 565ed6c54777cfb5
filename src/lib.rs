//! Sandstone - minimal HTTP/1.x static file server
//!
//! Core library for request parsing and sandboxed file serving.

pub mod config;
pub mod http;
pub mod server;
