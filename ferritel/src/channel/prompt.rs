//! Prompt-driven channel over a Telnet transport.

use std::time::Duration;

use log::{debug, trace, warn};
use memchr::memrchr2;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::Instant;

use super::buffer::PatternBuffer;
use super::encoding::{decode_latin1, encode_latin1};
use super::patterns::{PromptKind, PromptSet};
use crate::error::{ChannelError, Result};
use crate::transport::{TelnetConfig, TelnetTransport};

/// Text read up to and including a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMatch {
    /// Which pattern ended the read.
    pub kind: PromptKind,

    /// Everything received since the previous prompt, Latin-1 decoded.
    pub text: String,
}

impl PromptMatch {
    /// The line holding the prompt, without trailing whitespace.
    pub fn last_line(&self) -> &str {
        last_line(&self.text)
    }
}

/// Last non-empty line of `text`, trimmed at the end.
pub(crate) fn last_line(text: &str) -> &str {
    let trimmed = text.trim_end();
    match memrchr2(b'\n', b'\r', trimmed.as_bytes()) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// Line-oriented channel that frames device replies by their prompts.
///
/// There is no message framing on the wire: a reply is complete when its
/// tail matches one of the expected prompt patterns.
pub struct PromptChannel<S = TcpStream> {
    transport: TelnetTransport<S>,

    /// Accumulated output since the last prompt.
    buffer: PatternBuffer,

    prompts: PromptSet,

    /// Default timeout for prompt reads.
    read_timeout: Duration,

    /// Log raw traffic at debug level instead of trace.
    debug: bool,
}

impl<S> PromptChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Create a channel over a connected transport.
    pub fn new(transport: TelnetTransport<S>, config: &TelnetConfig) -> Result<Self> {
        Ok(Self {
            transport,
            buffer: PatternBuffer::new(config.search_depth),
            prompts: PromptSet::new().map_err(ChannelError::InvalidPattern)?,
            read_timeout: config.read_timeout,
            debug: config.debug,
        })
    }

    /// Read until a prompt (or, with `expect_auth`, a login cue) ends the
    /// output, using the default timeout.
    pub async fn read_until_prompt(&mut self, expect_auth: bool) -> Result<PromptMatch> {
        let timeout = self.read_timeout;
        self.read_until_prompt_within(expect_auth, timeout).await
    }

    /// Read until a prompt ends the output or `timeout` elapses.
    pub async fn read_until_prompt_within(
        &mut self,
        expect_auth: bool,
        timeout: Duration,
    ) -> Result<PromptMatch> {
        let deadline = Instant::now() + timeout;

        loop {
            if let Some(kind) = self.prompts.find(self.buffer.tail(), expect_auth) {
                let text = decode_latin1(&self.buffer.take());
                trace!("channel: matched {:?}", kind);
                return Ok(PromptMatch { kind, text });
            }

            let chunk = match tokio::time::timeout_at(deadline, self.transport.read_chunk()).await
            {
                Ok(chunk) => chunk?,
                Err(_) => {
                    debug!(
                        "channel: no prompt after {:?}, buffer tail: {:?}",
                        timeout,
                        decode_latin1(self.buffer.tail())
                    );
                    return Err(ChannelError::PatternTimeout(timeout).into());
                }
            };

            match chunk {
                Some(data) => {
                    self.log_traffic("recv", &decode_latin1(&data));
                    self.buffer.extend(&data);
                }
                None => return Err(ChannelError::Closed.into()),
            }
        }
    }

    /// Send a line of input.
    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        self.log_traffic("send", line);
        self.write_line(line).await
    }

    /// Send a line of input without logging its contents.
    pub async fn send_secret_line(&mut self, line: &str) -> Result<()> {
        self.log_traffic("send", "********");
        self.write_line(line).await
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        let mut bytes = encode_latin1(line);
        bytes.push(b'\n');
        self.transport.write_all(&bytes).await
    }

    /// Drain everything until the device closes the connection.
    ///
    /// With a `limit`, whatever arrived before the limit is returned.
    pub async fn read_to_close(&mut self, limit: Option<Duration>) -> Result<String> {
        let deadline = limit.map(|limit| Instant::now() + limit);

        loop {
            let chunk = match deadline {
                Some(deadline) => {
                    match tokio::time::timeout_at(deadline, self.transport.read_chunk()).await {
                        Ok(chunk) => chunk?,
                        Err(_) => {
                            warn!("channel: connection still open after drain limit");
                            break;
                        }
                    }
                }
                None => self.transport.read_chunk().await?,
            };

            match chunk {
                Some(data) => {
                    self.log_traffic("recv", &decode_latin1(&data));
                    self.buffer.extend(&data);
                }
                None => break,
            }
        }

        Ok(decode_latin1(&self.buffer.take()))
    }

    /// Close the underlying transport.
    pub async fn close(self) -> Result<()> {
        self.transport.close().await
    }

    fn log_traffic(&self, direction: &str, text: &str) {
        if self.debug {
            debug!("{}: {:?}", direction, text);
        } else {
            trace!("{}: {:?}", direction, text);
        }
    }
}
