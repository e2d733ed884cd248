//! Schema for lesson files.
//!
//! The schema is a declarative table of element rules: which children an
//! element may contain, whether it carries text, and which attributes it
//! requires. The streaming reader checks every event against it, which is the
//! single schema check a lesson file goes through.

mod config;
mod registry;
mod types;

pub use config::create_lesson_schema;
pub use registry::Schema;
pub use types::ElementRule;
