//! Serializable node contract.

use std::io::{BufRead, Write};

use super::types::NodeContext;
use crate::error::{LessonError, Result};
use crate::schema::ElementRule;
use crate::xml::{LessonReader, LessonWriter, XmlEvent};

/// Read/write behavior every content kind implements.
///
/// Both directions are stream-coupled: `read_node` is called right after the
/// reader returned the node's own `Start` event and must return right after
/// the matching `End`; `write_node` must leave the writer at the depth it was
/// called at. Each call emits exactly one `Content` tick.
pub trait SerializableNode {
    /// Tag name of the element this node reads and writes.
    fn tag(&self) -> &'static str;

    /// Schema rules for this node's element and any elements nested in it.
    fn element_rules(&self) -> Vec<ElementRule>;

    /// Populate this node from the reader, consuming exactly its subtree.
    ///
    /// # Errors
    /// Any reader error; validation faults propagate to the caller.
    fn read_node<R: BufRead>(
        &mut self,
        reader: &mut LessonReader<'_, R>,
        context: &mut NodeContext<'_>,
    ) -> Result<()>;

    /// Write this node as exactly one balanced element.
    ///
    /// # Errors
    /// Any writer error.
    fn write_node<W: Write>(
        &self,
        writer: &mut LessonWriter<W>,
        context: &mut NodeContext<'_>,
    ) -> Result<()>;
}

/// Collect the text of the element whose `Start` was just read.
///
/// Concatenates every text event up to the matching `End`, which is consumed.
///
/// # Errors
/// `Validation` if a child element appears, or any reader error.
pub fn read_text_content<R: BufRead>(reader: &mut LessonReader<'_, R>) -> Result<String> {
    let mut text = String::new();
    loop {
        match reader.next_event()? {
            XmlEvent::Text(part) => text.push_str(&part),
            XmlEvent::End(_) => return Ok(text),
            XmlEvent::Start(start) => {
                return Err(LessonError::Validation {
                    element: start.name,
                    context: None,
                    reason: "text element cannot contain elements".to_string(),
                })
            }
            XmlEvent::Eof => {
                return Err(LessonError::UnexpectedEof(
                    reader.current_element().unwrap_or_default().to_string(),
                ))
            }
        }
    }
}
