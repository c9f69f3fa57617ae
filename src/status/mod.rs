//! Status shared between the relay tasks.
//!
//! [`SharedStatus`] is the only mutable state crossing threads. Every access
//! copies values in or out under one mutex; [`StatusSnapshot`] is the copy
//! handed to reporters.

mod quality;
mod shared;

pub use quality::FixQuality;
pub use shared::{SharedStatus, StatusSnapshot};
