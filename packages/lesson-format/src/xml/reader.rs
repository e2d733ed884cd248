//! Validating streaming reader over `quick-xml`.
//!
//! The reader yields a simplified, owned event stream and checks every event
//! against the [`Schema`] as it goes. It keeps its own stack of open elements,
//! so callers can skip a subtree or resynchronise to an ancestor's end tag
//! after a validation fault.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{LessonError, Result};
use crate::schema::Schema;

/// An opening tag with its decoded attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Element name.
    pub name: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
}

impl StartTag {
    /// Get an attribute value by name.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Event produced by [`LessonReader`].
///
/// Empty elements are reported as a `Start` immediately followed by an `End`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    Start(StartTag),
    End(String),
    Text(String),
    Eof,
}

/// Event read from the underlying parser, before schema checks.
enum RawEvent {
    Start(StartTag, bool),
    End(String),
    Text(String),
    Eof,
    Ignored,
}

/// Forward-only validating reader for lesson files.
pub struct LessonReader<'s, R: BufRead> {
    inner: Reader<R>,
    buf: Vec<u8>,
    schema: &'s Schema,
    open: Vec<String>,
    pending_end: bool,
}

impl<'s> LessonReader<'s, BufReader<File>> {
    /// Open a file for validated reading.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be opened.
    pub fn open(path: &Path, schema: &'s Schema) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file), schema))
    }
}

impl<'s, R: BufRead> LessonReader<'s, R> {
    /// Wrap any buffered source.
    pub fn from_reader(source: R, schema: &'s Schema) -> Self {
        let mut inner = Reader::from_reader(source);
        inner.config_mut().trim_text(false);
        Self {
            inner,
            buf: Vec::new(),
            schema,
            open: Vec::new(),
            pending_end: false,
        }
    }

    /// Number of currently open elements.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Name of the innermost open element.
    #[must_use]
    pub fn current_element(&self) -> Option<&str> {
        self.open.last().map(String::as_str)
    }

    /// Read the next event, validating it against the schema.
    ///
    /// Whitespace-only text inside element-only content is dropped. An
    /// element that fails validation is still entered, so the caller can
    /// recover with [`skip_to_end_of`](Self::skip_to_end_of).
    ///
    /// # Errors
    /// `Validation` or `MissingElement` on schema violations, `Xml`,
    /// `Encoding` or `UnexpectedEof` on malformed input.
    pub fn next_event(&mut self) -> Result<XmlEvent> {
        self.advance(true)
    }

    /// Consume the rest of the element whose `Start` was just returned,
    /// validating everything inside it.
    ///
    /// # Errors
    /// Any error [`next_event`](Self::next_event) can return.
    pub fn skip_element(&mut self) -> Result<()> {
        let depth = self.open.len();
        loop {
            match self.advance(true)? {
                XmlEvent::End(_) if self.open.len() < depth => return Ok(()),
                XmlEvent::Eof => return Err(self.unexpected_eof()),
                _ => {}
            }
        }
    }

    /// Consume events without validation until the element open at `depth`
    /// has been closed.
    ///
    /// `depth` is the value [`depth`](Self::depth) returned right after that
    /// element's `Start`. Used to resynchronise after a validation fault.
    ///
    /// # Errors
    /// `Xml`, `Encoding` or `UnexpectedEof` if the rest of the input is
    /// malformed.
    pub fn skip_to_end_of(&mut self, depth: usize) -> Result<()> {
        while self.open.len() >= depth {
            if let XmlEvent::Eof = self.advance(false)? {
                return Err(self.unexpected_eof());
            }
        }
        Ok(())
    }

    fn advance(&mut self, validate: bool) -> Result<XmlEvent> {
        loop {
            if self.pending_end {
                self.pending_end = false;
                let name = self.open.pop().unwrap_or_default();
                return Ok(XmlEvent::End(name));
            }

            match self.read_raw()? {
                RawEvent::Start(start, empty) => {
                    let parent = self.open.last().cloned();
                    self.open.push(start.name.clone());
                    self.pending_end = empty;
                    if validate {
                        self.schema.check_element(&start.name, parent.as_deref())?;
                        self.schema.check_attributes(
                            &start.name,
                            parent.as_deref(),
                            start.attributes.iter().map(|(k, _)| k.as_str()),
                        )?;
                    }
                    return Ok(XmlEvent::Start(start));
                }
                RawEvent::End(name) => {
                    self.open.pop();
                    return Ok(XmlEvent::End(name));
                }
                RawEvent::Text(text) => {
                    if let Some(event) = self.text_event(text, validate)? {
                        return Ok(event);
                    }
                }
                RawEvent::Eof => {
                    if !self.open.is_empty() {
                        return Err(self.unexpected_eof());
                    }
                    return Ok(XmlEvent::Eof);
                }
                RawEvent::Ignored => {}
            }
        }
    }

    fn text_event(&self, text: String, validate: bool) -> Result<Option<XmlEvent>> {
        let Some(parent) = self.open.last() else {
            if text.trim().is_empty() {
                return Ok(None);
            }
            return Err(LessonError::UnexpectedText {
                context: "document outside the root element".to_string(),
            });
        };
        let allows_text = self
            .schema
            .get_rule(parent)
            .is_some_and(|rule| rule.allows_text);
        if !allows_text && text.trim().is_empty() {
            return Ok(None);
        }
        if validate {
            self.schema.check_text(parent)?;
        }
        Ok(Some(XmlEvent::Text(text)))
    }

    fn read_raw(&mut self) -> Result<RawEvent> {
        let decoder = self.inner.decoder();
        self.buf.clear();
        let raw = match self.inner.read_event_into(&mut self.buf)? {
            Event::Start(e) => RawEvent::Start(owned_start(&e, decoder)?, false),
            Event::Empty(e) => RawEvent::Start(owned_start(&e, decoder)?, true),
            Event::End(e) => RawEvent::End(utf8(e.name().as_ref(), "element name")?.to_string()),
            Event::Text(t) => RawEvent::Text(utf8(&t, "text")?.to_string()),
            Event::CData(c) => RawEvent::Text(utf8(&c, "CDATA section")?.to_string()),
            Event::GeneralRef(r) => {
                let name = utf8(&r, "entity reference")?;
                let resolved = resolve_reference(name).ok_or_else(|| LessonError::Validation {
                    element: self.open.last().cloned().unwrap_or_default(),
                    context: None,
                    reason: format!("unknown entity '&{name};'"),
                })?;
                RawEvent::Text(resolved)
            }
            Event::Eof => RawEvent::Eof,
            _ => RawEvent::Ignored,
        };
        Ok(raw)
    }

    fn unexpected_eof(&self) -> LessonError {
        LessonError::UnexpectedEof(self.open.last().cloned().unwrap_or_default())
    }
}

fn owned_start(e: &BytesStart<'_>, decoder: quick_xml::encoding::Decoder) -> Result<StartTag> {
    let name = utf8(e.name().as_ref(), "element name")?.to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = utf8(attr.key.as_ref(), "attribute name")?.to_string();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|err| LessonError::Validation {
                element: name.clone(),
                context: None,
                reason: format!("bad value for attribute '{key}': {err}"),
            })?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(StartTag { name, attributes })
}

fn utf8<'a>(bytes: &'a [u8], what: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|_| LessonError::Encoding(what.to_string()))
}

/// Resolve a character or predefined entity reference (name without `&`/`;`).
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    quick_xml::escape::resolve_predefined_entity(name).map(str::to_string)
}
