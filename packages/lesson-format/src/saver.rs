//! Streaming document writer.
//!
//! Single forward pass, no temporary file: a save that is cancelled or fails
//! part-way leaves a truncated file at the target path.

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::config::{
    FORMAT_VERSION, LESSON_ELEMENT, PAGE_ELEMENT, SECTION_ELEMENT, TITLE_ATTRIBUTE,
    VERSION_ATTRIBUTE,
};
use crate::error::Result;
use crate::progress::{ProgressSink, ProgressTick};
use crate::registry::{NodeContext, SerializableNode};
use crate::session::{log_fault, CancellationToken, Outcome};
use crate::types::{Document, Section, Tab};
use crate::xml::LessonWriter;

/// Save a document to a lesson file.
///
/// # Arguments
/// * `document` - Document to write; never modified
/// * `path` - Target file, created or truncated
/// * `progress` - Receiver of progress ticks
/// * `token` - Cancellation signal, checked before every element
///
/// # Returns
/// The classified outcome of the save.
pub fn save(
    document: &Document,
    path: &Path,
    progress: &mut dyn ProgressSink,
    token: &CancellationToken,
) -> Outcome {
    debug!(path = %path.display(), items = document.item_count(), "Saving lesson");
    let result = LessonWriter::create(path).and_then(|mut writer| {
        let mut context = NodeContext::new(progress, token);
        let written = write_document(document, &mut writer, &mut context);
        // Flush what was written even when the walk stopped early.
        let flushed = writer.finish().map(drop);
        written.and(flushed)
    });

    if let Err(err) = &result {
        log_fault(err, "save");
    }
    let outcome = Outcome::classify(&result, token);
    debug!(?outcome, "Finished saving lesson");
    outcome
}

/// Write a whole document, declaration included.
pub(crate) fn write_document<W: Write>(
    document: &Document,
    writer: &mut LessonWriter<W>,
    context: &mut NodeContext<'_>,
) -> Result<()> {
    writer.write_declaration()?;
    writer.start_element(LESSON_ELEMENT, &[(VERSION_ATTRIBUTE, FORMAT_VERSION)])?;
    for tab in document.tabs() {
        write_tab(tab, writer, context)?;
    }
    writer.end_element()
}

fn write_tab<W: Write>(
    tab: &Tab,
    writer: &mut LessonWriter<W>,
    context: &mut NodeContext<'_>,
) -> Result<()> {
    context.check_cancelled()?;
    context.tick(ProgressTick::Tab);

    writer.start_element(tab.kind().element_name(), &[])?;
    for section in &tab.sections {
        write_section(section, writer, context)?;
    }
    writer.end_element()
}

fn write_section<W: Write>(
    section: &Section,
    writer: &mut LessonWriter<W>,
    context: &mut NodeContext<'_>,
) -> Result<()> {
    context.check_cancelled()?;
    context.tick(ProgressTick::Section);

    writer.start_element(SECTION_ELEMENT, &[(TITLE_ATTRIBUTE, section.title.as_str())])?;
    for page in &section.pages {
        context.check_cancelled()?;
        context.tick(ProgressTick::Page);

        writer.start_element(PAGE_ELEMENT, &[])?;
        for item in &page.items {
            context.check_cancelled()?;
            item.write_node(writer, context)?;
        }
        writer.end_element()?;
    }
    writer.end_element()
}
