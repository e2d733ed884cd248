//! Types shared by content node implementations.

use std::fmt;

use crate::error::Result;
use crate::progress::{ProgressSink, ProgressTick};
use crate::session::CancellationToken;

/// Context passed to every node while reading or writing.
pub struct NodeContext<'a> {
    /// Receiver for progress ticks.
    pub progress: &'a mut dyn ProgressSink,

    /// Cancellation signal for the running operation.
    pub token: &'a CancellationToken,
}

impl<'a> NodeContext<'a> {
    /// Create a node context.
    pub fn new(progress: &'a mut dyn ProgressSink, token: &'a CancellationToken) -> Self {
        Self { progress, token }
    }

    /// Report a progress tick.
    pub fn tick(&mut self, tick: ProgressTick) {
        self.progress.tick(tick);
    }

    /// Fail with `Cancelled` if a cancellation signal has been raised.
    pub fn check_cancelled(&self) -> Result<()> {
        self.token.check()
    }
}

impl fmt::Debug for NodeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeContext")
            .field("cancelled", &self.token.is_signalled())
            .finish()
    }
}
