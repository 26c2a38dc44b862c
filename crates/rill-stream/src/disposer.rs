#![forbid(unsafe_code)]

//! Producer cleanup handles.

use std::fmt;

/// Cleanup returned by a producer.
///
/// `dispose` consumes the handle, so a disposer runs at most once. A disposer
/// that is dropped without being disposed does **not** run its cleanup; the
/// source machinery always disposes explicitly when a channel closes.
#[derive(Default)]
pub struct Disposer {
    cleanup: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("noop", &self.cleanup.is_none())
            .finish()
    }
}

impl Disposer {
    /// Wrap a cleanup closure.
    #[must_use]
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// A disposer with nothing to clean up.
    #[must_use]
    pub fn noop() -> Self {
        Self { cleanup: None }
    }

    /// Whether this disposer carries no cleanup.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.cleanup.is_none()
    }

    /// Run the cleanup.
    pub fn dispose(mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}
