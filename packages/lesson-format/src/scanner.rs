//! Count-only pre-scan of a lesson file.
//!
//! Follows the same walk and recovery rules as the loader, so the counts it
//! reports match what a load of the same file produces. Page children are
//! validated and skipped, never materialised.

use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::config::{PAGE_ELEMENT, SECTION_ELEMENT};
use crate::error::Result;
use crate::loader::{close_lesson, enter_tab, open_lesson, recover_tab, unexpected_event};
use crate::schema::Schema;
use crate::session::{log_fault, CancellationToken};
use crate::types::{CountSnapshot, TabKind};
use crate::xml::{LessonReader, XmlEvent};

/// Count sections, pages and page items of a lesson file.
///
/// # Returns
/// * `Some(snapshot)` when the walk completed
/// * `None` if cancellation was observed, or the file is missing, malformed
///   or structurally broken
pub fn scan(path: &Path, schema: &Schema, token: &CancellationToken) -> Option<CountSnapshot> {
    debug!(path = %path.display(), "Scanning lesson");
    let result = LessonReader::open(path, schema)
        .and_then(|mut reader| scan_document(&mut reader, token));

    match result {
        Ok(_) if token.is_signalled() => None,
        Ok(snapshot) => {
            debug!(
                sections = snapshot.total_sections(),
                items = snapshot.total_items(),
                "Finished scanning lesson"
            );
            Some(snapshot)
        }
        Err(err) => {
            log_fault(&err, "scan");
            None
        }
    }
}

/// Scan a whole document from an open reader.
pub(crate) fn scan_document<R: BufRead>(
    reader: &mut LessonReader<'_, R>,
    token: &CancellationToken,
) -> Result<CountSnapshot> {
    open_lesson(reader)?;

    let mut snapshot = CountSnapshot::default();
    for kind in TabKind::ALL {
        token.check()?;
        let tab_depth = enter_tab(reader, kind)?;

        let counts = snapshot.tab_mut(kind);
        if let Err(err) = scan_sections(reader, counts, token, kind) {
            recover_tab(err, reader, kind, tab_depth)?;
        }
    }

    close_lesson(reader)?;
    Ok(snapshot)
}

fn scan_sections<R: BufRead>(
    reader: &mut LessonReader<'_, R>,
    counts: &mut Vec<Vec<usize>>,
    token: &CancellationToken,
    kind: TabKind,
) -> Result<()> {
    loop {
        match reader.next_event()? {
            XmlEvent::Start(_) => {
                token.check()?;
                let pages = scan_pages(reader, token)?;
                counts.push(pages);
            }
            XmlEvent::End(_) => return Ok(()),
            event => return Err(unexpected_event(event, kind.element_name())),
        }
    }
}

fn scan_pages<R: BufRead>(
    reader: &mut LessonReader<'_, R>,
    token: &CancellationToken,
) -> Result<Vec<usize>> {
    let mut pages = Vec::new();
    loop {
        match reader.next_event()? {
            XmlEvent::Start(_) => {
                token.check()?;
                pages.push(count_items(reader, token)?);
            }
            XmlEvent::End(_) => return Ok(pages),
            event => return Err(unexpected_event(event, SECTION_ELEMENT)),
        }
    }
}

fn count_items<R: BufRead>(
    reader: &mut LessonReader<'_, R>,
    token: &CancellationToken,
) -> Result<usize> {
    let mut count = 0;
    loop {
        match reader.next_event()? {
            XmlEvent::Start(_) => {
                token.check()?;
                reader.skip_element()?;
                count += 1;
            }
            XmlEvent::End(_) => return Ok(count),
            event => return Err(unexpected_event(event, PAGE_ELEMENT)),
        }
    }
}
