//! NTRIP session state machine.

use std::io::{self, Read, Write};

use tracing::{debug, info, warn};

use super::auth::{AuthToken, make_auth_token};
use super::request::{build_request, position_report};
use crate::config::CasterConfig;
use crate::core::{Connector, RelayError, RelayResult, Transport, TransportCloser, USER_AGENT};

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No transport; initial state and the state after any transport error.
    #[default]
    Disconnected,
    /// Transport established, request not yet sent.
    Connected,
    /// Request written in full; the caster is assumed to be streaming.
    Authenticated,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Authenticated => "authenticated",
        };
        f.write_str(name)
    }
}

/// A client session with one NTRIP caster.
///
/// Owns the caster configuration, the live transport (if any) and the
/// cached authentication token. Only the relay loop drives a session; other
/// threads interact with its transport through [`NtripSession::closer`].
pub struct NtripSession<C: Connector> {
    config: CasterConfig,
    connector: C,
    stream: Option<C::Stream>,
    token: Option<AuthToken>,
    state: SessionState,
    user_agent: String,
}

impl<C: Connector> NtripSession<C> {
    /// Create a disconnected session.
    pub fn new(config: CasterConfig, connector: C) -> Self {
        Self {
            config,
            connector,
            stream: None,
            token: None,
            state: SessionState::Disconnected,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Override the user agent sent to the caster.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Caster configuration.
    pub fn config(&self) -> &CasterConfig {
        &self.config
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Open a transport to the caster.
    ///
    /// Any previous transport is dropped first. On failure the session stays
    /// [`SessionState::Disconnected`] and the caller decides when to retry.
    pub fn connect(&mut self) -> RelayResult<()> {
        self.disconnect();

        let (host, port) = (self.config.host.as_str(), self.config.port);
        match self.connector.connect(host, port) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.state = SessionState::Connected;
                info!(host, port, "connected to caster");
                Ok(())
            }
            Err(source) => {
                warn!(host, port, error = %source, "connection to caster failed");
                Err(RelayError::Connect {
                    host: host.to_string(),
                    port,
                    source,
                })
            }
        }
    }

    /// Send the stream request for the configured mountpoint.
    ///
    /// Success means the request was written in full. The caster's reply is
    /// not read; correction bytes are simply expected to follow.
    pub fn authenticate(&mut self) -> RelayResult<()> {
        if self.stream.is_none() {
            return Err(RelayError::NotConnected);
        }

        let request = self.request();
        debug!(
            mountpoint = %self.config.mountpoint,
            user_agent = %self.user_agent,
            "sending stream request (authorization redacted)"
        );

        self.write_fully("stream request", request.as_bytes())?;
        self.state = SessionState::Authenticated;
        info!(mountpoint = %self.config.mountpoint, "stream request sent");
        Ok(())
    }

    /// Build the stream request, computing the token on first use.
    pub fn request(&mut self) -> String {
        let token = match self.token.take() {
            Some(token) if !token.is_empty() => token,
            _ => make_auth_token(&self.config.username, &self.config.password),
        };
        let request = build_request(&self.config.mountpoint, &self.user_agent, &token);
        self.token = Some(token);
        request
    }

    /// Whether the transport is up.
    pub fn is_connected(&self) -> bool {
        self.state != SessionState::Disconnected
            && self.stream.as_ref().is_some_and(|stream| stream.is_alive())
    }

    /// Whether the session is authenticated and the transport is up.
    pub fn is_streaming(&self) -> bool {
        self.state == SessionState::Authenticated && self.is_connected()
    }

    /// Read whatever correction bytes are pending.
    ///
    /// Returns `Ok(0)` when nothing arrived within the transport's poll
    /// window. A closed or failed stream moves the session to
    /// [`SessionState::Disconnected`].
    pub fn read(&mut self, buf: &mut [u8]) -> RelayResult<usize> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(RelayError::NotConnected);
        };

        match stream.read(buf) {
            Ok(0) if !buf.is_empty() => {
                self.disconnect();
                Err(RelayError::Closed)
            }
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            }
            Err(e) => {
                self.disconnect();
                Err(RelayError::Read(e))
            }
        }
    }

    /// Send a position sentence to the caster, terminated by one CRLF.
    pub fn send_position(&mut self, sentence: &str) -> RelayResult<()> {
        let report = position_report(sentence);
        self.write_fully("position report", report.as_bytes())?;
        debug!(sentence, "position report sent");
        Ok(())
    }

    /// Handle that can close the current transport from another thread.
    pub fn closer(&self) -> Option<Box<dyn TransportCloser>> {
        let stream = self.stream.as_ref()?;
        match stream.closer() {
            Ok(closer) => Some(closer),
            Err(e) => {
                warn!(error = %e, "could not obtain transport closer");
                None
            }
        }
    }

    /// Drop the transport and return to [`SessionState::Disconnected`].
    pub fn disconnect(&mut self) {
        if self.stream.take().is_some() {
            debug!(previous = %self.state, "transport dropped");
        }
        self.state = SessionState::Disconnected;
    }

    /// Write all of `bytes`, treating any shortfall as a failed write.
    fn write_fully(&mut self, what: &'static str, bytes: &[u8]) -> RelayResult<()> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(RelayError::NotConnected);
        };

        let mut written = 0;
        let mut failure = None;
        while written < bytes.len() {
            match stream.write(&bytes[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        if written == bytes.len() {
            if let Err(e) = stream.flush() {
                failure = Some(e);
            }
        }

        if written < bytes.len() || failure.is_some() {
            warn!(what, written, expected = bytes.len(), "incomplete write to caster");
            self.disconnect();
            return Err(RelayError::Write {
                what,
                written,
                expected: bytes.len(),
                source: failure,
            });
        }
        Ok(())
    }
}

impl<C: Connector> std::fmt::Debug for NtripSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NtripSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("token", &self.token)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
