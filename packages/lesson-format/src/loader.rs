//! Streaming document reader.
//!
//! Walks `Lesson → tab → Section → Page → item` in a single forward pass,
//! resolving every page child through the [`ContentRegistry`] and handing the
//! reader to the instantiated item. A validation fault inside a tab only
//! truncates that tab; see [`recover_tab`].

use std::io::BufRead;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::config::{LESSON_ELEMENT, PAGE_ELEMENT, SECTION_ELEMENT, TITLE_ATTRIBUTE};
use crate::error::{LessonError, Result};
use crate::progress::{ProgressSink, ProgressTick};
use crate::registry::{ContentRegistry, NodeContext, SerializableNode};
use crate::schema::Schema;
use crate::session::{CancellationToken, Loaded};
use crate::types::{Document, Page, Section, Tab, TabKind};
use crate::xml::{LessonReader, XmlEvent};

/// Load a lesson file into a new [`Document`].
///
/// # Arguments
/// * `path` - File to read
/// * `registry` - Content kinds recognised inside pages
/// * `schema` - Schema the file is validated against
/// * `progress` - Receiver of progress ticks
/// * `token` - Cancellation signal, checked before every element
///
/// # Returns
/// The outcome, and the document only when the outcome is successful.
pub fn load(
    path: &Path,
    registry: &ContentRegistry,
    schema: &Schema,
    progress: &mut dyn ProgressSink,
    token: &CancellationToken,
) -> Loaded {
    debug!(path = %path.display(), "Loading lesson");
    let result = LessonReader::open(path, schema).and_then(|mut reader| {
        let mut context = NodeContext::new(progress, token);
        read_document(&mut reader, registry, &mut context)
    });
    let loaded = Loaded::from_result(result, token);
    debug!(outcome = ?loaded.outcome, "Finished loading lesson");
    loaded
}

/// Read a whole document from an open reader.
pub(crate) fn read_document<R: BufRead>(
    reader: &mut LessonReader<'_, R>,
    registry: &ContentRegistry,
    context: &mut NodeContext<'_>,
) -> Result<Document> {
    open_lesson(reader)?;

    let mut document = Document::new();
    for kind in TabKind::ALL {
        context.check_cancelled()?;
        let tab_depth = enter_tab(reader, kind)?;
        context.tick(ProgressTick::Tab);

        let tab = document.tab_mut(kind);
        if let Err(err) = read_sections(reader, registry, tab, context) {
            recover_tab(err, reader, kind, tab_depth)?;
        }
    }

    close_lesson(reader)?;
    Ok(document)
}

fn read_sections<R: BufRead>(
    reader: &mut LessonReader<'_, R>,
    registry: &ContentRegistry,
    tab: &mut Tab,
    context: &mut NodeContext<'_>,
) -> Result<()> {
    loop {
        match reader.next_event()? {
            XmlEvent::Start(start) => {
                context.check_cancelled()?;
                context.tick(ProgressTick::Section);

                let title = start.attribute(TITLE_ATTRIBUTE).unwrap_or_default();
                let mut section = Section::new(title);
                read_pages(reader, registry, &mut section, context)?;
                finalize_section(&section);
                tab.sections.push(section);
            }
            XmlEvent::End(_) => return Ok(()),
            event => return Err(unexpected_event(event, tab.kind().element_name())),
        }
    }
}

fn read_pages<R: BufRead>(
    reader: &mut LessonReader<'_, R>,
    registry: &ContentRegistry,
    section: &mut Section,
    context: &mut NodeContext<'_>,
) -> Result<()> {
    loop {
        match reader.next_event()? {
            XmlEvent::Start(_) => {
                context.check_cancelled()?;
                context.tick(ProgressTick::Page);

                let mut page = Page::new();
                read_items(reader, registry, &mut page, context)?;
                section.pages.push(page);
            }
            XmlEvent::End(_) => return Ok(()),
            event => return Err(unexpected_event(event, SECTION_ELEMENT)),
        }
    }
}

fn read_items<R: BufRead>(
    reader: &mut LessonReader<'_, R>,
    registry: &ContentRegistry,
    page: &mut Page,
    context: &mut NodeContext<'_>,
) -> Result<()> {
    loop {
        match reader.next_event()? {
            XmlEvent::Start(start) => {
                context.check_cancelled()?;

                let mut item = registry.create(&start.name).ok_or_else(|| {
                    LessonError::UnknownContentKind {
                        tag_name: start.name.clone(),
                        context: Some(PAGE_ELEMENT.to_string()),
                    }
                })?;
                item.read_node(reader, context)?;
                page.items.push(item);
            }
            XmlEvent::End(_) => return Ok(()),
            event => return Err(unexpected_event(event, PAGE_ELEMENT)),
        }
    }
}

/// Post-read hook, called once a section and all its pages are complete.
fn finalize_section(section: &Section) {
    trace!(
        title = %section.title,
        pages = section.pages.len(),
        "Section loaded"
    );
}

/// Consume the root start tag.
pub(crate) fn open_lesson<R: BufRead>(reader: &mut LessonReader<'_, R>) -> Result<()> {
    match reader.next_event()? {
        XmlEvent::Start(start) if start.name == LESSON_ELEMENT => Ok(()),
        _ => Err(LessonError::MissingElement {
            element: LESSON_ELEMENT.to_string(),
            context: "document".to_string(),
        }),
    }
}

/// Consume the start tag of the tab expected next.
///
/// # Returns
/// The reader depth inside the tab, for [`recover_tab`].
pub(crate) fn enter_tab<R: BufRead>(
    reader: &mut LessonReader<'_, R>,
    kind: TabKind,
) -> Result<usize> {
    let expected = kind.element_name();
    match reader.next_event()? {
        XmlEvent::Start(start) if start.name == expected => Ok(reader.depth()),
        XmlEvent::Start(start) => Err(LessonError::UnexpectedElement {
            element: start.name,
            context: format!("<{LESSON_ELEMENT}>, expected <{expected}>"),
        }),
        _ => Err(LessonError::MissingElement {
            element: expected.to_string(),
            context: format!("<{LESSON_ELEMENT}>"),
        }),
    }
}

/// Consume the root end tag and check nothing follows it.
pub(crate) fn close_lesson<R: BufRead>(reader: &mut LessonReader<'_, R>) -> Result<()> {
    match reader.next_event()? {
        XmlEvent::End(_) => {}
        XmlEvent::Start(start) => {
            return Err(LessonError::UnexpectedElement {
                element: start.name,
                context: format!("<{LESSON_ELEMENT}>"),
            })
        }
        event => return Err(unexpected_event(event, LESSON_ELEMENT)),
    }
    match reader.next_event()? {
        XmlEvent::Eof => Ok(()),
        XmlEvent::Start(start) => Err(LessonError::UnexpectedElement {
            element: start.name,
            context: "document after root element".to_string(),
        }),
        event => Err(unexpected_event(event, LESSON_ELEMENT)),
    }
}

/// Apply the lenient policy to a fault raised inside a tab.
///
/// Validation faults are logged, the rest of the tab is skipped and the
/// caller continues with the next tab. Anything else is returned unchanged.
pub(crate) fn recover_tab<R: BufRead>(
    err: LessonError,
    reader: &mut LessonReader<'_, R>,
    kind: TabKind,
    tab_depth: usize,
) -> Result<()> {
    if !err.is_recoverable() {
        return Err(err);
    }
    warn!(error = %err, tab = %kind, "Schema violation, skipping rest of tab");
    reader.skip_to_end_of(tab_depth)
}

/// Fault for an event the schema should already have ruled out.
pub(crate) fn unexpected_event(event: XmlEvent, parent: &str) -> LessonError {
    match event {
        XmlEvent::Eof => LessonError::UnexpectedEof(parent.to_string()),
        other => LessonError::Validation {
            element: parent.to_string(),
            context: None,
            reason: format!("unexpected {other:?}"),
        },
    }
}
