//! Streaming XML writer over `quick-xml`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::INDENT_SIZE;
use crate::error::{LessonError, Result};

/// Indented writer that tracks open elements.
///
/// Every `start_element` must be balanced by an `end_element`; text-bearing
/// leaves go through [`text_element`](Self::text_element) so a payload never
/// picks up indentation whitespace.
///
/// Payloads are escaped so any XML 1.0 parser reads them back unchanged:
/// `\r` is always written as a character reference, and so are `\t` and `\n`
/// inside attribute values. Characters XML 1.0 cannot carry at all fail the
/// write with [`LessonError::InvalidCharacter`].
pub struct LessonWriter<W: Write> {
    inner: Writer<W>,
    open: Vec<String>,
}

impl LessonWriter<BufWriter<File>> {
    /// Create (or truncate) a file for writing.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> LessonWriter<W> {
    /// Wrap any sink.
    pub fn new(sink: W) -> Self {
        Self {
            inner: Writer::new_with_indent(sink, b' ', INDENT_SIZE),
            open: Vec::new(),
        }
    }

    /// Number of currently open elements.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Write the XML declaration.
    pub fn write_declaration(&mut self) -> Result<()> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    /// Open an element.
    pub fn start_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.inner
            .write_event(Event::Start(start_tag(name, attributes)?))?;
        self.open.push(name.to_string());
        Ok(())
    }

    /// Close the innermost open element.
    pub fn end_element(&mut self) -> Result<()> {
        if let Some(name) = self.open.pop() {
            self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Ok(())
    }

    /// Write a complete element whose only content is `text`.
    ///
    /// Empty text is written as an empty element.
    pub fn text_element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<()> {
        let start = start_tag(name, attributes)?;
        if text.is_empty() {
            self.inner.write_event(Event::Empty(start))?;
            return Ok(());
        }
        let escaped = escape(name, text, false)?;
        self.inner.write_event(Event::Start(start))?;
        self.inner
            .write_event(Event::Text(BytesText::from_escaped(escaped)))?;
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Flush and return the underlying sink.
    ///
    /// Elements still open (after a cancelled save) are left unclosed.
    pub fn finish(self) -> Result<W> {
        let mut sink = self.inner.into_inner();
        sink.flush()?;
        Ok(sink)
    }
}

fn start_tag<'a>(name: &'a str, attributes: &[(&str, &str)]) -> Result<BytesStart<'a>> {
    let mut start = BytesStart::new(name);
    for &(key, value) in attributes {
        let escaped = escape(name, value, true)?;
        start.push_attribute((key.as_bytes(), escaped.as_bytes()));
    }
    Ok(start)
}

/// Escape a text or attribute payload of `element`.
fn escape(element: &str, value: &str, in_attribute: bool) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\r' => out.push_str("&#13;"),
            '\t' if in_attribute => out.push_str("&#9;"),
            '\n' if in_attribute => out.push_str("&#10;"),
            c if !is_xml_char(c) => {
                return Err(LessonError::InvalidCharacter {
                    element: element.to_string(),
                    code: u32::from(c),
                })
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut LessonWriter<Vec<u8>>) -> Result<()>) -> String {
        let mut writer = LessonWriter::new(Vec::new());
        f(&mut writer).unwrap();
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_nested_elements_are_indented() {
        let xml = written(|w| {
            w.start_element("Lesson", &[])?;
            w.start_element("Materials", &[])?;
            w.end_element()?;
            w.end_element()
        });
        assert_eq!(xml, "<Lesson>\n  <Materials>\n  </Materials>\n</Lesson>");
    }

    #[test]
    fn test_text_element_stays_inline() {
        let xml = written(|w| {
            w.start_element("Page", &[])?;
            w.text_element("TextItem", &[], "a < b")?;
            w.end_element()
        });
        assert_eq!(xml, "<Page>\n  <TextItem>a &lt; b</TextItem>\n</Page>");
    }

    #[test]
    fn test_empty_text_is_empty_element() {
        let xml = written(|w| w.text_element("Answer", &[("Id", "1")], ""));
        assert_eq!(xml, "<Answer Id=\"1\"/>");
    }

    #[test]
    fn test_attribute_whitespace_is_escaped() {
        let xml = written(|w| w.text_element("Section", &[("Title", "a\tb\nc\r")], ""));
        assert_eq!(xml, "<Section Title=\"a&#9;b&#10;c&#13;\"/>");
    }

    #[test]
    fn test_text_keeps_newlines_and_escapes_carriage_returns() {
        let xml = written(|w| w.text_element("TextItem", &[], "]]> x\r\n\ty"));
        assert_eq!(xml, "<TextItem>]]&gt; x&#13;\n\ty</TextItem>");
    }

    #[test]
    fn test_non_xml_character_is_rejected() {
        let mut writer = LessonWriter::new(Vec::new());
        let err = writer
            .text_element("TextItem", &[], "bell \u{7}")
            .unwrap_err();
        assert!(matches!(
            err,
            LessonError::InvalidCharacter { ref element, code: 7 } if element == "TextItem"
        ));

        let err = writer
            .start_element("Section", &[("Title", "\u{FFFE}")])
            .unwrap_err();
        assert!(matches!(err, LessonError::InvalidCharacter { code: 0xFFFE, .. }));
        assert_eq!(writer.depth(), 0);
    }

    #[test]
    fn test_is_xml_char() {
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('é'));
        assert!(is_xml_char('\u{1F600}'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{1F}'));
        assert!(!is_xml_char('\u{FFFF}'));
    }

    #[test]
    fn test_depth_tracks_open_elements() {
        let mut writer = LessonWriter::new(Vec::new());
        writer.start_element("Lesson", &[]).unwrap();
        writer.start_element("Tests", &[]).unwrap();
        assert_eq!(writer.depth(), 2);
        writer.end_element().unwrap();
        assert_eq!(writer.depth(), 1);
    }
}
