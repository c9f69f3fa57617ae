//! Cross-thread flags.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A flag raised by one thread and observed by others.
///
/// Used level-triggered for shutdown ([`Signal::is_raised`]) and
/// edge-triggered for operator stop requests ([`Signal::take`]).
#[derive(Debug, Clone, Default)]
pub struct Signal(Arc<AtomicBool>);

impl Signal {
    /// Create a lowered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal.
    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the signal is raised.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Consume a raised signal, lowering it again.
    ///
    /// Returns `true` exactly once per [`Signal::raise`].
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}
