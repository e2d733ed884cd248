//! Cancellation handles, outcome classification and the session facade.
//!
//! Each [`LessonSession`] owns its own [`CancellationToken`], so cancelling one
//! session never affects an operation running in another.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Fault, LessonError, Result};
use crate::progress::ProgressSink;
use crate::registry::{create_content_registry, ContentRegistry};
use crate::schema::{create_lesson_schema, Schema};
use crate::types::{CountSnapshot, Document};

/// Result classification of a load or save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    /// The operation never ran.
    #[default]
    Null,
    /// Full traversal completed without cancellation.
    Successful,
    /// Cancelled at the caller's request.
    Cancelled,
    /// Failed, or cancelled by something other than the caller.
    Error,
}

impl Outcome {
    /// Classify a finished traversal.
    ///
    /// A cancellation signal is reported as `Cancelled` only when the caller
    /// raised it; any other fault becomes `Error`.
    #[must_use]
    pub fn classify(result: &Result<()>, token: &CancellationToken) -> Self {
        match result {
            Ok(()) if !token.is_signalled() => Self::Successful,
            Ok(()) | Err(LessonError::Cancelled) => {
                if token.is_caller_initiated() {
                    Self::Cancelled
                } else {
                    Self::Error
                }
            }
            Err(_) => Self::Error,
        }
    }

    /// Whether the operation succeeded.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        *self == Self::Successful
    }
}

#[derive(Debug, Default)]
struct TokenState {
    signalled: AtomicBool,
    caller_initiated: AtomicBool,
}

/// Cooperative cancellation handle shared between an operation and its caller.
///
/// Cloning yields another handle onto the same signal.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    /// Create a token in the unsignalled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation on behalf of the caller.
    pub fn cancel(&self) {
        self.state.caller_initiated.store(true, Ordering::SeqCst);
        self.state.signalled.store(true, Ordering::SeqCst);
    }

    /// Signal cancellation on behalf of the host (shutdown, watchdog).
    ///
    /// The interrupted operation reports [`Outcome::Error`].
    pub fn abort(&self) {
        self.state.signalled.store(true, Ordering::SeqCst);
    }

    /// Clear any pending signal.
    pub fn reset(&self) {
        self.state.signalled.store(false, Ordering::SeqCst);
        self.state.caller_initiated.store(false, Ordering::SeqCst);
    }

    /// Whether any cancellation signal has been raised.
    #[must_use]
    pub fn is_signalled(&self) -> bool {
        self.state.signalled.load(Ordering::SeqCst)
    }

    /// Whether the signal came from [`cancel`](Self::cancel).
    #[must_use]
    pub fn is_caller_initiated(&self) -> bool {
        self.state.caller_initiated.load(Ordering::SeqCst)
    }

    /// Return `Err(LessonError::Cancelled)` once a signal has been raised.
    pub fn check(&self) -> Result<()> {
        if self.is_signalled() {
            Err(LessonError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Result of a load: the outcome, and the document only on success.
#[derive(Debug, Default)]
pub struct Loaded {
    pub outcome: Outcome,
    pub document: Option<Document>,
}

impl Loaded {
    pub(crate) fn from_result(result: Result<Document>, token: &CancellationToken) -> Self {
        match result {
            Ok(document) => {
                let outcome = Outcome::classify(&Ok(()), token);
                let document = outcome.is_successful().then_some(document);
                Self { outcome, document }
            }
            Err(err) => {
                log_fault(&err, "load");
                Self {
                    outcome: Outcome::classify(&Err(err), token),
                    document: None,
                }
            }
        }
    }
}

/// Log an operation-level fault at a level matching its classification.
pub(crate) fn log_fault(err: &LessonError, operation: &str) {
    match err.fault() {
        Fault::Cancellation => tracing::debug!(operation, "Operation cancelled"),
        _ => tracing::error!(error = %err, operation, "Operation failed"),
    }
}

/// Entry point for scanning, loading and saving lesson files.
///
/// A session holds the content registry, the schema derived from it, and the
/// cancellation token for whichever operation is currently in flight. Run at
/// most one operation per session at a time; clones share the token.
#[derive(Debug, Clone)]
pub struct LessonSession {
    registry: Arc<ContentRegistry>,
    schema: Arc<Schema>,
    token: CancellationToken,
}

impl LessonSession {
    /// Create a session with the standard content kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(create_content_registry())
    }

    /// Create a session with a custom content registry.
    #[must_use]
    pub fn with_registry(registry: ContentRegistry) -> Self {
        let schema = create_lesson_schema(&registry);
        Self {
            registry: Arc::new(registry),
            schema: Arc::new(schema),
            token: CancellationToken::new(),
        }
    }

    /// The content registry used by this session.
    #[must_use]
    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    /// The schema files are validated against.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// A handle that cancels this session's in-flight operation.
    #[must_use]
    pub fn cancel_handle(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancel the in-flight operation, if any.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Count sections, pages and items without loading content.
    ///
    /// Returns `Ok(None)` when cancelled or when the file cannot be scanned.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `path` does not name a file.
    pub fn scan(&self, path: &Path) -> Result<Option<CountSnapshot>> {
        self.begin(path)?;
        Ok(crate::scanner::scan(path, &self.schema, &self.token))
    }

    /// Load a document, reporting progress to `progress`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `path` does not name a file. Every other
    /// fault is reported through [`Loaded::outcome`].
    pub fn load(&self, path: &Path, progress: &mut dyn ProgressSink) -> Result<Loaded> {
        self.begin(path)?;
        Ok(self.run_load(path, progress))
    }

    /// Save a document, reporting progress to `progress`.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `path` does not name a file. Every other
    /// fault is reported through the returned [`Outcome`].
    pub fn save(
        &self,
        document: &Document,
        path: &Path,
        progress: &mut dyn ProgressSink,
    ) -> Result<Outcome> {
        self.begin(path)?;
        Ok(self.run_save(document, path, progress))
    }

    /// Validate `path` and clear the token for a new operation.
    ///
    /// Background operations call this on the spawning thread, so a
    /// `cancel()` issued right after spawning is never cleared by the worker.
    pub(crate) fn begin(&self, path: &Path) -> Result<()> {
        crate::config::validate_path(path)?;
        self.token.reset();
        Ok(())
    }

    /// Load without touching the token. Call [`begin`](Self::begin) first.
    pub(crate) fn run_load(&self, path: &Path, progress: &mut dyn ProgressSink) -> Loaded {
        crate::loader::load(path, &self.registry, &self.schema, progress, &self.token)
    }

    /// Save without touching the token. Call [`begin`](Self::begin) first.
    pub(crate) fn run_save(
        &self,
        document: &Document,
        path: &Path,
        progress: &mut dyn ProgressSink,
    ) -> Outcome {
        crate::saver::save(document, path, progress, &self.token)
    }
}

impl Default for LessonSession {
    fn default() -> Self {
        Self::new()
    }
}
