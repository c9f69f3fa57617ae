//! NTRIP client side of the relay.
//!
//! - **Authentication**: [`make_auth_token`] and [`AuthToken`] (HTTP Basic)
//! - **Wire format**: [`build_request`] and [`position_report`]
//! - **Session**: [`NtripSession`] with its [`SessionState`] machine
//! - **TCP**: [`TcpConnector`], the blocking std connector (`tcp` feature)
//!
//! ```text
//!  Disconnected ──connect()──▶ Connected ──authenticate()──▶ Authenticated
//!       ▲                          │                              │
//!       └──────────── transport error / disconnect() ─────────────┘
//! ```

mod auth;
mod request;
mod session;
#[cfg(feature = "tcp")]
mod tcp;

pub use auth::{AuthToken, make_auth_token};
pub use request::{build_request, position_report};
pub use session::{NtripSession, SessionState};
#[cfg(feature = "tcp")]
pub use tcp::{TcpCloser, TcpConnector, TcpTransport};
