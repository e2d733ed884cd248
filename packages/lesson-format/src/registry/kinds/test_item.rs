//! Test question content kind.
//!
//! ```xml
//! <TestItem>
//!   <Question>2 + 2 = ?</Question>
//!   <Answer Id="0b6f…">4</Answer>
//!   <Answer Id="5c1e…">5</Answer>
//! </TestItem>
//! ```

use std::io::{BufRead, Write};

use tracing::warn;

use crate::config::{ANSWER_ELEMENT, ID_ATTRIBUTE, QUESTION_ELEMENT};
use crate::error::{LessonError, Result};
use crate::progress::ProgressTick;
use crate::registry::node::{read_text_content, SerializableNode};
use crate::registry::types::NodeContext;
use crate::schema::ElementRule;
use crate::types::{Answer, AnswerId, TestItem};
use crate::xml::{LessonReader, LessonWriter, StartTag, XmlEvent};

/// Element tag of [`TestItem`].
pub const TEST_ITEM_ELEMENT: &str = "TestItem";

impl SerializableNode for TestItem {
    fn tag(&self) -> &'static str {
        TEST_ITEM_ELEMENT
    }

    fn element_rules(&self) -> Vec<ElementRule> {
        vec![
            ElementRule::new(TEST_ITEM_ELEMENT).with_children([QUESTION_ELEMENT, ANSWER_ELEMENT]),
            ElementRule::new(QUESTION_ELEMENT).with_text(true),
            ElementRule::new(ANSWER_ELEMENT).with_text(true),
        ]
    }

    fn read_node<R: BufRead>(
        &mut self,
        reader: &mut LessonReader<'_, R>,
        context: &mut NodeContext<'_>,
    ) -> Result<()> {
        context.tick(ProgressTick::Content);

        let mut seen_question = false;
        loop {
            match reader.next_event()? {
                XmlEvent::Start(start) if start.name == QUESTION_ELEMENT => {
                    if seen_question {
                        warn!(tag = TEST_ITEM_ELEMENT, "Duplicate question, keeping the last one");
                    }
                    seen_question = true;
                    self.question = read_text_content(reader)?;
                }
                XmlEvent::Start(start) => {
                    let id = answer_id(&start);
                    let text = read_text_content(reader)?;
                    self.answers.push(Answer { id, text });
                }
                XmlEvent::End(_) => return Ok(()),
                XmlEvent::Text(_) => {
                    return Err(LessonError::Validation {
                        element: TEST_ITEM_ELEMENT.to_string(),
                        context: None,
                        reason: "unexpected text".to_string(),
                    });
                }
                XmlEvent::Eof => {
                    return Err(LessonError::UnexpectedEof(TEST_ITEM_ELEMENT.to_string()));
                }
            }
        }
    }

    fn write_node<W: Write>(
        &self,
        writer: &mut LessonWriter<W>,
        context: &mut NodeContext<'_>,
    ) -> Result<()> {
        context.tick(ProgressTick::Content);

        writer.start_element(TEST_ITEM_ELEMENT, &[])?;
        writer.text_element(QUESTION_ELEMENT, &[], &self.question)?;
        for answer in &self.answers {
            let id = answer.id.to_string();
            writer.text_element(ANSWER_ELEMENT, &[(ID_ATTRIBUTE, id.as_str())], &answer.text)?;
        }
        writer.end_element()
    }
}

/// Identity of an answer. A missing or malformed `Id` gets a fresh one.
fn answer_id(start: &StartTag) -> AnswerId {
    let Some(value) = start.attribute(ID_ATTRIBUTE) else {
        return AnswerId::new();
    };
    AnswerId::parse(value).unwrap_or_else(|| {
        warn!(id = value, tag = ANSWER_ELEMENT, "Malformed answer id, generating a new one");
        AnswerId::new()
    })
}
