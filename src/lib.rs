//! webserv - minimal TLS-terminating static file server
//!
//! Accepts TLS connections, reads one request line per connection and
//! streams the requested file back.

pub mod config;
pub mod console;
pub mod error;
pub mod http;
pub mod server;
pub mod tls;
