//! Telemetry destination parsing
//!
//! Destinations are written as `host[:port][/path]`, optionally prefixed
//! with `http://`. A destination without a `/` posts to the root path.

/// Port used when the destination does not name one
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Errors that can occur while splitting a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UrlError {
    /// Destination is empty
    Empty,
    /// Scheme other than plain http
    UnsupportedScheme,
    /// No host before the port or path
    MissingHost,
    /// Port is not a number in 1..=65535
    InvalidPort,
}

/// A split telemetry destination, borrowing from the original string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Url<'a> {
    /// Host name or address
    pub host: &'a str,
    /// TCP port
    pub port: u16,
    /// Request path without the leading `/`
    pub path: &'a str,
}

impl<'a> Url<'a> {
    /// Split `destination`, using `default_port` when none is given
    pub fn parse(destination: &'a str, default_port: u16) -> Result<Self, UrlError> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(UrlError::Empty);
        }

        let rest = match destination.split_once("://") {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("http") => rest,
            Some(_) => return Err(UrlError::UnsupportedScheme),
            None => destination,
        };

        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port: u16 = port.parse().map_err(|_| UrlError::InvalidPort)?;
                if port == 0 {
                    return Err(UrlError::InvalidPort);
                }
                (host, port)
            }
            None => (authority, default_port),
        };

        if host.is_empty() {
            return Err(UrlError::MissingHost);
        }

        Ok(Self { host, port, path })
    }

    /// Whether the port differs from the http default
    pub fn has_explicit_port(&self) -> bool {
        self.port != DEFAULT_HTTP_PORT
    }
}
