//! Content kinds: the per-kind halves of the serialization contract.

mod test_item;
mod text_item;

pub use test_item::TEST_ITEM_ELEMENT;
pub use text_item::TEXT_ITEM_ELEMENT;

use std::io::{BufRead, Write};

use super::node::SerializableNode;
use super::types::NodeContext;
use crate::error::Result;
use crate::schema::ElementRule;
use crate::types::ContentItem;
use crate::xml::{LessonReader, LessonWriter};

impl SerializableNode for ContentItem {
    fn tag(&self) -> &'static str {
        match self {
            Self::Text(item) => item.tag(),
            Self::Test(item) => item.tag(),
        }
    }

    fn element_rules(&self) -> Vec<ElementRule> {
        match self {
            Self::Text(item) => item.element_rules(),
            Self::Test(item) => item.element_rules(),
        }
    }

    fn read_node<R: BufRead>(
        &mut self,
        reader: &mut LessonReader<'_, R>,
        context: &mut NodeContext<'_>,
    ) -> Result<()> {
        match self {
            Self::Text(item) => item.read_node(reader, context),
            Self::Test(item) => item.read_node(reader, context),
        }
    }

    fn write_node<W: Write>(
        &self,
        writer: &mut LessonWriter<W>,
        context: &mut NodeContext<'_>,
    ) -> Result<()> {
        match self {
            Self::Text(item) => item.write_node(writer, context),
            Self::Test(item) => item.write_node(writer, context),
        }
    }
}
