//! Streaming XML primitives for lesson files.

mod reader;
mod writer;

pub use reader::{LessonReader, StartTag, XmlEvent};
pub use writer::LessonWriter;
