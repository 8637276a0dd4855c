//! Telnet transport over any async byte stream.

use bytes::BytesMut;
use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use super::config::TelnetConfig;
use super::negotiation::{NegotiationFilter, escape_iac};
use crate::error::{Result, TransportError};

const READ_CHUNK: usize = 4096;

/// Raw Telnet connection.
///
/// Reads hand back console data only; Telnet commands are stripped and any
/// option request is refused on the spot.
pub struct TelnetTransport<S = TcpStream> {
    stream: S,

    /// Incoming command filter, stateful across reads.
    filter: NegotiationFilter,

    /// Scratch buffer for socket reads.
    read_buf: BytesMut,
}

impl TelnetTransport<TcpStream> {
    /// Open a TCP connection to the configured host.
    pub async fn connect(config: &TelnetConfig) -> Result<Self> {
        debug!("Opening TCP connection to {}", config.socket_addr());

        let stream = tokio::time::timeout(
            config.connect_timeout,
            TcpStream::connect((config.host.as_str(), config.port)),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.connect_timeout))?
        .map_err(|source| TransportError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

        stream.set_nodelay(true).map_err(TransportError::Io)?;

        Ok(Self::new(stream))
    }
}

impl<S> TelnetTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already-connected stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            filter: NegotiationFilter::new(),
            read_buf: BytesMut::with_capacity(READ_CHUNK),
        }
    }

    /// Read the next piece of console data.
    ///
    /// Returns `None` once the remote end has closed the connection.
    pub async fn read_chunk(&mut self) -> Result<Option<BytesMut>> {
        loop {
            self.read_buf.clear();
            self.read_buf.reserve(READ_CHUNK);

            let n = self
                .stream
                .read_buf(&mut self.read_buf)
                .await
                .map_err(TransportError::Io)?;
            if n == 0 {
                trace!("transport: EOF");
                return Ok(None);
            }

            let mut data = BytesMut::with_capacity(n);
            let mut replies = BytesMut::new();
            self.filter.feed(&self.read_buf, &mut data, &mut replies);

            if !replies.is_empty() {
                trace!("transport: refusing {} bytes of option requests", replies.len());
                self.stream
                    .write_all(&replies)
                    .await
                    .map_err(TransportError::Io)?;
            }

            if !data.is_empty() {
                return Ok(Some(data));
            }
        }
    }

    /// Write raw bytes, escaping IAC.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let escaped = escape_iac(data);
        self.stream
            .write_all(&escaped)
            .await
            .map_err(TransportError::Io)?;
        self.stream.flush().await.map_err(TransportError::Io)?;
        Ok(())
    }

    /// Shut down the write half and release the stream.
    pub async fn close(mut self) -> Result<()> {
        match self.stream.shutdown().await {
            Ok(()) => Ok(()),
            // The device may already have hung up.
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(TransportError::Io(e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::negotiation::{DONT, IAC, WILL};
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_read_chunk_refuses_options() {
        let mock = Builder::new()
            .read(&[IAC, WILL, 1])
            .write(&[IAC, DONT, 1])
            .read(b"Username: ")
            .build();

        let mut transport = TelnetTransport::new(mock);
        let chunk = transport.read_chunk().await.unwrap().unwrap();
        assert_eq!(&chunk[..], b"Username: ");
        assert!(transport.read_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_escapes_iac() {
        let mock = Builder::new().write(&[b'a', IAC, IAC, b'\n']).build();
        let mut transport = TelnetTransport::new(mock);
        transport.write_all(&[b'a', IAC, b'\n']).await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut config = TelnetConfig::new("127.0.0.1");
        config.port = port;

        let err = TelnetTransport::connect(&config).await.err().unwrap();
        assert!(matches!(
            err,
            crate::Error::Transport(TransportError::ConnectionFailed { .. })
        ));
    }
}
