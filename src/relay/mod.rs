//! The relay tasks.
//!
//! Each task is a plain struct with a single-step method (for tests and for
//! callers that schedule it themselves) and a blocking `run` loop meant for
//! its own thread:
//!
//! ```text
//!  serial ──▶ SerialIngest ──position──▶ SharedStatus ◀──connected── HealthMonitor
//!                                          │     ▲                        │
//!                                  position│     │bytes, connected        │close
//!                                          ▼     │                        ▼
//!  serial ◀──RTCM── RelayLoop ◀──────────── NtripSession ◀──────▶ caster
//! ```

mod health;
mod ingest;
mod lines;
mod relay_loop;

pub use health::HealthMonitor;
pub use ingest::SerialIngest;
pub use lines::LineAssembler;
pub use relay_loop::{RelayLoop, StepOutcome};
