//! Lesson Format - Streaming persistence for hierarchical lesson documents.
//!
//! This crate reads and writes lesson documents (two tabs of sections, pages
//! and content items) to a custom XML format. Files are processed in a single
//! forward pass with cooperative cancellation and determinate progress
//! reporting, so arbitrarily large lessons never have to be held as XML in
//! memory.
//!
//! # Example
//!
//! ```
//! use lesson_format::progress::NoProgress;
//! use lesson_format::{Document, LessonSession, Outcome, Page, Section, TextItem, TickCounter};
//!
//! let mut doc = Document::new();
//! doc.materials.push_section(
//!     Section::new("Intro").with_page(Page::new().with_item(TextItem::new("Hello"))),
//! );
//!
//! let path = std::env::temp_dir().join("lesson-format-doc-example.lesson");
//! let session = LessonSession::new();
//!
//! let mut ticks = TickCounter::new();
//! assert_eq!(session.save(&doc, &path, &mut ticks)?, Outcome::Successful);
//!
//! // Size a progress indicator before loading.
//! let snapshot = session.scan(&path)?.unwrap();
//! assert_eq!(snapshot.total_ticks(), ticks.total());
//!
//! let loaded = session.load(&path, &mut NoProgress)?;
//! assert_eq!(loaded.outcome, Outcome::Successful);
//! assert_eq!(loaded.document, Some(doc));
//! # std::fs::remove_file(&path).ok();
//! # Ok::<(), lesson_format::LessonError>(())
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`config`]: Element names, format constants and argument validation
//! - [`types`]: Document model and count snapshots
//! - [`error`]: Error types, fault classification and Result alias
//! - [`schema`]: Declarative element rules checked while reading
//! - [`xml`]: Validating streaming reader and indented streaming writer
//! - [`registry`]: Content kind registry and per-node serialization contract
//! - [`scanner`]: Count-only pre-scan
//! - [`loader`]: Streaming document reader
//! - [`saver`]: Streaming document writer
//! - [`progress`]: Progress ticks and sinks
//! - [`session`]: Cancellation, outcome classification and the session facade
//! - [`background`]: Worker-thread load and save
//! - [`cli`]: Command-line interface

pub mod background;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod progress;
pub mod registry;
pub mod saver;
pub mod scanner;
pub mod schema;
pub mod session;
pub mod types;
pub mod xml;

// Re-export the session facade
pub use session::{CancellationToken, LessonSession, Loaded, Outcome};

// Re-export commonly used items
pub use error::{LessonError, Result};
pub use progress::{ProgressSink, ProgressTick, TickCounter};
pub use types::{
    Answer, AnswerId, ContentItem, CountSnapshot, Document, Page, Section, Tab, TabKind, TestItem,
    TextItem,
};
