//! Best-effort telemetry POST
//!
//! One short-lived TCP connection per record. The request is written and
//! the connection closed without reading a response. Connect and send are
//! both bounded by timeouts so a dead collector cannot stall a worker.

use std::io::Write;
use std::net::{IpAddr, Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use sensorhub_core::traits::{NetworkSink, NetworkStage, SinkError};
use sensorhub_protocol::{PostRequest, Url, DEFAULT_HTTP_PORT};

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Default send timeout
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(2);

/// HTTP POST network sink
#[derive(Debug, Clone)]
pub struct HttpPoster {
    default_port: u16,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl HttpPoster {
    /// Create a poster
    pub fn new(default_port: u16, connect_timeout: Duration, io_timeout: Duration) -> Self {
        Self {
            default_port,
            connect_timeout,
            io_timeout,
        }
    }

    /// Socket addresses for a destination
    ///
    /// IP literals never reach the system resolver. Host names do, and the
    /// lookup is bounded only by the resolver's own timeout.
    fn resolve(url: &Url<'_>) -> Result<Vec<SocketAddr>, SinkError> {
        if let Ok(ip) = url.host.parse::<IpAddr>() {
            return Ok(vec![SocketAddr::new(ip, url.port)]);
        }
        let addrs: Vec<SocketAddr> = (url.host, url.port)
            .to_socket_addrs()
            .map_err(|e| {
                log::debug!("resolve {}: {}", url.host, e);
                SinkError::Network(NetworkStage::Resolve)
            })?
            .collect();
        if addrs.is_empty() {
            return Err(SinkError::Network(NetworkStage::Resolve));
        }
        Ok(addrs)
    }

    fn connect(&self, url: &Url<'_>) -> Result<TcpStream, SinkError> {
        for addr in Self::resolve(url)? {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => log::debug!("connect {}: {}", addr, e),
            }
        }
        Err(SinkError::Network(NetworkStage::Connect))
    }
}

impl Default for HttpPoster {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_PORT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_IO_TIMEOUT)
    }
}

impl NetworkSink for HttpPoster {
    fn post(&mut self, destination: &str, record: &str) -> Result<(), SinkError> {
        let url = Url::parse(destination, self.default_port).map_err(|e| {
            log::debug!("{}: {:?}", destination, e);
            SinkError::Network(NetworkStage::MalformedUrl)
        })?;
        let request = PostRequest::new(url, record)
            .encode_to_vec()
            .map_err(|_| SinkError::Network(NetworkStage::Send))?;

        let mut stream = self.connect(&url)?;
        let send = SinkError::Network(NetworkStage::Send);
        stream
            .set_write_timeout(Some(self.io_timeout))
            .map_err(|_| send)?;
        stream.write_all(&request).map_err(|e| {
            log::debug!("send to {}:{}: {}", url.host, url.port, e);
            send
        })?;
        // Response is not read; close either way
        let _ = stream.shutdown(Shutdown::Both);
        Ok(())
    }
}
