//! HTTP protocol implementation.
//!
//! This module implements a minimal HTTP/1.x server: one request per
//! connection, answered with either a canned greeting or a file from a
//! sandboxed document root.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: Drives one connection through read, process and write
//! - **`parser`**: Lenient request-line and header parser over a byte buffer
//! - **`request`**: Parsed request and the fixed header allowlist
//! - **`resolver`**: Maps request paths to files inside the document root
//! - **`mime`**: MIME type detection based on file extensions
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes responses and streams file bodies
//! - **`site`**: Shared per-server settings and request dispatch
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read until blank line, EOF or size limit
//!        └──────┬──────┘
//!               │ Head received          (oversized → 400, straight to Writing)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Greeting, or resolve path to a file
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Status line, headers, body
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sandstone::http::{connection::Connection, site::Site};
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let site = Arc::new(Site::greeting("Hello, World!"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let mut conn = Connection::new(socket, Arc::clone(&site));
//!         if let Err(e) = conn.run().await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod resolver;
pub mod response;
pub mod site;
pub mod writer;
