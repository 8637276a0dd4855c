//! Builder for opening device sessions.

use std::time::Duration;

use log::info;
use tokio::io::{AsyncRead, AsyncWrite};

use super::credentials::{CredentialPrompter, Credentials, NoPrompt};
use super::session::Session;
use crate::channel::PromptChannel;
use crate::error::Result;
use crate::transport::{TelnetConfig, TelnetTransport};

/// Builder for constructing a logged-in [`Session`].
///
/// # Example
///
/// ```rust,no_run
/// use ferritel::{Credentials, SessionBuilder};
///
/// # async fn example() -> Result<(), ferritel::Error> {
/// let credentials = Credentials::from_delimited(Some("admin"), Some("secret"), Some("enable"));
/// let mut session = SessionBuilder::new("192.168.1.1")
///     .credentials(credentials)
///     .connect()
///     .await?;
///
/// session.escalate().await?;
/// let facts = session.get_facts().await?;
/// println!("{} is a {}", facts.hostname, facts.model);
/// session.close().await?;
/// # Ok(())
/// # }
/// ```
pub struct SessionBuilder {
    config: TelnetConfig,
    credentials: Credentials,
    prompter: Box<dyn CredentialPrompter>,
}

impl SessionBuilder {
    /// Create a new session builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            config: TelnetConfig::new(host),
            credentials: Credentials::default(),
            prompter: Box::new(NoPrompt),
        }
    }

    /// Set the credential candidates.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the Telnet port (default: 23).
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the connection timeout (default: 4s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the timeout for each prompt read (default: 7s).
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    /// Set how far back from the end of the output prompts are searched.
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.config.search_depth = depth;
        self
    }

    /// Set the pause between batch commands (default: 300ms).
    pub fn batch_delay(mut self, delay: Duration) -> Self {
        self.config.batch_delay = delay;
        self
    }

    /// Bound the final read of a batch. Unbounded by default.
    pub fn batch_drain_timeout(mut self, timeout: Duration) -> Self {
        self.config.batch_drain_timeout = Some(timeout);
        self
    }

    /// Suppress connection status logging.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.config.quiet = quiet;
        self
    }

    /// Log all traffic at debug level.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Set the source for credentials the device asks for but were not given.
    pub fn prompter(mut self, prompter: impl CredentialPrompter + 'static) -> Self {
        self.prompter = Box::new(prompter);
        self
    }

    /// Get the configuration built so far.
    pub fn config(&self) -> &TelnetConfig {
        &self.config
    }

    /// Connect over TCP and log in.
    pub async fn connect(self) -> Result<Session> {
        self.credentials.validate()?;

        if !self.config.quiet {
            info!("Connecting to {}...", self.config.host);
        }

        let transport = TelnetTransport::connect(&self.config).await?;
        self.open(transport).await
    }

    /// Log in over an already-connected stream.
    pub async fn connect_stream<S>(self, stream: S) -> Result<Session<S>>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        self.credentials.validate()?;
        self.open(TelnetTransport::new(stream)).await
    }

    async fn open<S>(self, transport: TelnetTransport<S>) -> Result<Session<S>>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        let channel = PromptChannel::new(transport, &self.config)?;
        Session::open(channel, self.config, self.credentials, self.prompter).await
    }
}

impl std::fmt::Debug for SessionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBuilder")
            .field("config", &self.config)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
