//! Core types shared by every layer of the relay.
//!
//! Nothing in here performs I/O on its own; the transport seam is expressed
//! as traits so the session and relay loop can be driven by the std TCP
//! connector in production and by a scripted link in tests.

mod constants;
mod error;
mod signal;
mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use constants::*;
pub use error::*;
pub use signal::Signal;
pub use traits::*;
