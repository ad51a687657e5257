//! HTTP/1.1 POST encoding
//!
//! Requests are written into a caller buffer without allocation. The body
//! is sent verbatim with a synthesized `Content-Length`.

use core::fmt::{self, Write};

use heapless::Vec;

use crate::url::Url;

/// Maximum encoded request size (headers plus one reading)
pub const MAX_REQUEST_SIZE: usize = 512;

/// Errors that can occur while encoding a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Buffer too small for the encoded request
    BufferTooSmall,
}

/// A single best-effort POST of one text record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostRequest<'a> {
    url: Url<'a>,
    body: &'a str,
}

impl<'a> PostRequest<'a> {
    /// Create a request posting `body` to `url`
    pub fn new(url: Url<'a>, body: &'a str) -> Self {
        Self { url, body }
    }

    /// Destination of the request
    pub fn url(&self) -> &Url<'a> {
        &self.url
    }

    /// Encode this request into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, RequestError> {
        let mut cursor = Cursor { buf: buffer, pos: 0 };
        self.write_head(&mut cursor)
            .map_err(|_| RequestError::BufferTooSmall)?;
        cursor
            .write_str(self.body)
            .map_err(|_| RequestError::BufferTooSmall)?;
        Ok(cursor.pos)
    }

    /// Encode this request into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_REQUEST_SIZE>, RequestError> {
        let mut buffer = [0u8; MAX_REQUEST_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| RequestError::BufferTooSmall)?;
        Ok(vec)
    }

    fn write_head(&self, w: &mut impl Write) -> fmt::Result {
        write!(w, "POST /{} HTTP/1.1\r\n", self.url.path)?;
        if self.url.has_explicit_port() {
            write!(w, "Host: {}:{}\r\n", self.url.host, self.url.port)?;
        } else {
            write!(w, "Host: {}\r\n", self.url.host)?;
        }
        w.write_str("Content-Type: text/plain\r\n")?;
        write!(w, "Content-Length: {}\r\n", self.body.len())?;
        w.write_str("Connection: close\r\n\r\n")
    }
}

/// `fmt::Write` over a fixed byte buffer
struct Cursor<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl Write for Cursor<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.pos.checked_add(s.len()).ok_or(fmt::Error)?;
        let dst = self.buf.get_mut(self.pos..end).ok_or(fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.pos = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::DEFAULT_HTTP_PORT;
    use proptest::prelude::*;

    fn encode(dest: &str, body: &str) -> std::string::String {
        let url = Url::parse(dest, DEFAULT_HTTP_PORT).unwrap();
        let bytes = PostRequest::new(url, body).encode_to_vec().unwrap();
        std::string::String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_post_framing() {
        let req = encode("example.com/steps", "[STEP 3] LSM6DSL: ax=0.000 g\n");
        assert_eq!(
            req,
            "POST /steps HTTP/1.1\r\n\
             Host: example.com\r\n\
             Content-Type: text/plain\r\n\
             Content-Length: 29\r\n\
             Connection: close\r\n\
             \r\n\
             [STEP 3] LSM6DSL: ax=0.000 g\n"
        );
    }

    #[test]
    fn test_root_path_and_port() {
        let req = encode("10.0.0.2:8080", "x\n");
        assert!(req.starts_with("POST / HTTP/1.1\r\nHost: 10.0.0.2:8080\r\n"));
        assert!(req.ends_with("Content-Length: 2\r\nConnection: close\r\n\r\nx\n"));
    }

    #[test]
    fn test_buffer_too_small() {
        let url = Url::parse("example.com/steps", DEFAULT_HTTP_PORT).unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(
            PostRequest::new(url, "body").encode(&mut buf),
            Err(RequestError::BufferTooSmall)
        );
    }

    #[test]
    fn test_content_length_counts_bytes() {
        let req = encode("collector/env", "temp=23.4 \u{b0}C\n");
        let (head, body) = req.split_once("\r\n\r\n").unwrap();
        assert!(head.contains("Content-Length: 14\r\n"), "{}", head);
        assert_eq!(body, "temp=23.4 \u{b0}C\n");
    }

    proptest! {
        #[test]
        fn content_length_matches_body(body in "[ -~]{0,200}") {
            let req = encode("collector/env", &body);
            let (head, sent) = req.split_once("\r\n\r\n").unwrap();
            let expected = std::format!("Content-Length: {}\r\n", body.len());
            let head = std::format!("{}\r\n", head);
            prop_assert!(head.contains(&expected));
            prop_assert_eq!(sent, body.as_str());
        }
    }
}
