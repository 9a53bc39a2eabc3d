//! HTTP protocol implementation.
//!
//! Just enough HTTP/1.1 to serve static files: one request per connection,
//! only the request target is looked at, and the response is a status line,
//! a `Content-Type` header and the raw file bytes.
//!
//! # Architecture
//!
//! - **`connection`**: the per-connection state machine
//! - **`parser`**: pulls the request target out of the raw request bytes
//! - **`response`**: maps a request target to a file and a status
//! - **`writer`**: builds the header and streams the file to the client
//! - **`mime`**: MIME type detection based on file extensions
//! - **`site`**: the served directory and its limits
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One bounded read; nothing read → Closed
//!        └──────┬──────┘
//!               │ Request bytes
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse target, pick file and status
//!        └──────┬───────────┘
//!               │ Response chosen
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Header + chunked file body
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use webserv::http::{connection::Connection, site::Site};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:4001").await?;
//!     let site = Arc::new(Site::new("public"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let site = Arc::clone(&site);
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, site);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod response;
pub mod site;
pub mod writer;
