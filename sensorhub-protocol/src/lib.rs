//! Telemetry wire format
//!
//! The network sink sends each reading as a single HTTP/1.1 POST over a
//! short-lived connection. This crate splits the configured telemetry
//! destination into host, port and path, and encodes the request into a
//! fixed buffer:
//! ```text
//! POST /<path> HTTP/1.1\r\n
//! Host: <host>[:<port>]\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: <n>\r\n
//! Connection: close\r\n
//! \r\n
//! <reading>
//! ```
//!
//! No response is parsed; delivery is best-effort.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod http;
pub mod url;

pub use http::{PostRequest, RequestError, MAX_REQUEST_SIZE};
pub use url::{Url, UrlError, DEFAULT_HTTP_PORT};
