//! Plain text content kind.
//!
//! ```xml
//! <TextItem>raw text payload</TextItem>
//! ```

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::progress::ProgressTick;
use crate::registry::node::{read_text_content, SerializableNode};
use crate::registry::types::NodeContext;
use crate::schema::ElementRule;
use crate::types::TextItem;
use crate::xml::{LessonReader, LessonWriter};

/// Element tag of [`TextItem`].
pub const TEXT_ITEM_ELEMENT: &str = "TextItem";

impl SerializableNode for TextItem {
    fn tag(&self) -> &'static str {
        TEXT_ITEM_ELEMENT
    }

    fn element_rules(&self) -> Vec<ElementRule> {
        vec![ElementRule::new(TEXT_ITEM_ELEMENT).with_text(true)]
    }

    fn read_node<R: BufRead>(
        &mut self,
        reader: &mut LessonReader<'_, R>,
        context: &mut NodeContext<'_>,
    ) -> Result<()> {
        context.tick(ProgressTick::Content);
        self.text = read_text_content(reader)?;
        Ok(())
    }

    fn write_node<W: Write>(
        &self,
        writer: &mut LessonWriter<W>,
        context: &mut NodeContext<'_>,
    ) -> Result<()> {
        context.tick(ProgressTick::Content);
        writer.text_element(TEXT_ITEM_ELEMENT, &[], &self.text)
    }
}
