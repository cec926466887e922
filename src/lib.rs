//! devserve
//!
//! Static file server for local development. Serves a directory tree over
//! HTTP/1.1 with correct MIME types (including `application/wasm`) and adds
//! `Access-Control-Allow-Origin: *` to every response.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
