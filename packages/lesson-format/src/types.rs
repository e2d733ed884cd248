//! Core data types for lesson documents.
//!
//! A [`Document`] always holds exactly two tabs, one per [`TabKind`]. Every
//! collection below it is ordered by authoring order, which a save followed
//! by a load preserves exactly.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{MATERIALS_ELEMENT, TESTS_ELEMENT};

/// The two kinds of top-level tabs in a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabKind {
    /// Learning material.
    Material,
    /// Tests for the material.
    Test,
}

impl TabKind {
    /// Tab kinds in the fixed order they appear in a file.
    pub const ALL: [TabKind; 2] = [TabKind::Material, TabKind::Test];

    /// Get the XML element name for this tab.
    #[must_use]
    pub fn element_name(&self) -> &'static str {
        match self {
            Self::Material => MATERIALS_ELEMENT,
            Self::Test => TESTS_ELEMENT,
        }
    }
}

impl fmt::Display for TabKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Material => write!(f, "Material"),
            Self::Test => write!(f, "Test"),
        }
    }
}

/// Root of a lesson: one material tab and one test tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The material tab.
    pub materials: Tab,
    /// The test tab.
    pub tests: Tab,
}

impl Document {
    /// Create an empty document with both tabs present.
    #[must_use]
    pub fn new() -> Self {
        Self {
            materials: Tab::new(TabKind::Material),
            tests: Tab::new(TabKind::Test),
        }
    }

    /// Get the tab of the given kind.
    #[must_use]
    pub fn tab(&self, kind: TabKind) -> &Tab {
        match kind {
            TabKind::Material => &self.materials,
            TabKind::Test => &self.tests,
        }
    }

    /// Get the tab of the given kind mutably.
    pub fn tab_mut(&mut self, kind: TabKind) -> &mut Tab {
        match kind {
            TabKind::Material => &mut self.materials,
            TabKind::Test => &mut self.tests,
        }
    }

    /// Tabs in file order.
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        [&self.materials, &self.tests].into_iter()
    }

    /// Total number of content items across both tabs.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.tabs().map(Tab::item_count).sum()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A top-level grouping of sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    kind: TabKind,
    /// Sections in authoring order.
    pub sections: Vec<Section>,
}

impl Tab {
    /// Create an empty tab.
    #[must_use]
    pub fn new(kind: TabKind) -> Self {
        Self {
            kind,
            sections: Vec::new(),
        }
    }

    /// The kind of this tab. Fixed at construction.
    #[must_use]
    pub fn kind(&self) -> TabKind {
        self.kind
    }

    /// Append a section and return it for further population.
    pub fn push_section(&mut self, section: Section) -> &mut Section {
        self.sections.push(section);
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    /// Number of content items in this tab.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.pages)
            .map(|p| p.items.len())
            .sum()
    }
}

/// A titled grouping of pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Section title.
    pub title: String,
    /// Pages in authoring order.
    pub pages: Vec<Page>,
}

impl Section {
    /// Create an empty section.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pages: Vec::new(),
        }
    }

    /// Add a page.
    #[must_use]
    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }
}

/// An ordered bucket of content items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Content items in authoring order.
    pub items: Vec<ContentItem>,
}

impl Page {
    /// Create an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content item.
    #[must_use]
    pub fn with_item(mut self, item: impl Into<ContentItem>) -> Self {
        self.items.push(item.into());
        self
    }
}

/// A single unit of content on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    /// A block of text.
    Text(TextItem),
    /// A test question with answers.
    Test(TestItem),
}

impl From<TextItem> for ContentItem {
    fn from(item: TextItem) -> Self {
        Self::Text(item)
    }
}

impl From<TestItem> for ContentItem {
    fn from(item: TestItem) -> Self {
        Self::Test(item)
    }
}

/// Plain text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextItem {
    /// Raw text payload.
    pub text: String,
}

impl TextItem {
    /// Create a text item.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A question with an ordered list of answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestItem {
    /// Question text.
    pub question: String,
    /// Answers in authoring order.
    pub answers: Vec<Answer>,
}

impl TestItem {
    /// Create a test item without answers.
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answers: Vec::new(),
        }
    }

    /// Add an answer with a fresh identity.
    #[must_use]
    pub fn with_answer(mut self, text: impl Into<String>) -> Self {
        self.answers.push(Answer::new(text));
        self
    }
}

/// Stable identity of an answer across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnswerId(Uuid);

impl AnswerId {
    /// Generate a new random identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identity from its persisted form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }
}

impl Default for AnswerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnswerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// One answer of a test item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Identity, persisted with the answer.
    pub id: AnswerId,
    /// Answer text.
    pub text: String,
}

impl Answer {
    /// Create an answer with a fresh identity.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: AnswerId::new(),
            text: text.into(),
        }
    }
}

/// Structural counts of a lesson file, without any content.
///
/// Each tab holds one entry per section; each entry lists the item count of
/// every page in that section. Used to size progress indicators before a
/// real load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSnapshot {
    /// Counts for the material tab.
    pub material: Vec<Vec<usize>>,
    /// Counts for the test tab.
    pub test: Vec<Vec<usize>>,
}

impl CountSnapshot {
    /// Derive the counts of an in-memory document.
    #[must_use]
    pub fn of(document: &Document) -> Self {
        let counts = |tab: &Tab| {
            tab.sections
                .iter()
                .map(|s| s.pages.iter().map(|p| p.items.len()).collect())
                .collect()
        };
        Self {
            material: counts(&document.materials),
            test: counts(&document.tests),
        }
    }

    /// Get the counts of one tab.
    #[must_use]
    pub fn tab(&self, kind: TabKind) -> &[Vec<usize>] {
        match kind {
            TabKind::Material => &self.material,
            TabKind::Test => &self.test,
        }
    }

    pub(crate) fn tab_mut(&mut self, kind: TabKind) -> &mut Vec<Vec<usize>> {
        match kind {
            TabKind::Material => &mut self.material,
            TabKind::Test => &mut self.test,
        }
    }

    /// Total number of sections.
    #[must_use]
    pub fn total_sections(&self) -> usize {
        self.material.len() + self.test.len()
    }

    /// Total number of pages.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.material.iter().chain(&self.test).map(Vec::len).sum()
    }

    /// Total number of content items.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.material.iter().chain(&self.test).flatten().sum()
    }

    /// Number of progress ticks a full load of the scanned file emits.
    #[must_use]
    pub fn total_ticks(&self) -> usize {
        TabKind::ALL.len() + self.total_sections() + self.total_pages() + self.total_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.materials.push_section(
            Section::new("Intro")
                .with_page(
                    Page::new()
                        .with_item(TextItem::new("a"))
                        .with_item(TextItem::new("b")),
                )
                .with_page(Page::new()),
        );
        doc.tests.push_section(
            Section::new("Quiz").with_page(
                Page::new().with_item(TestItem::new("2 + 2?").with_answer("4").with_answer("5")),
            ),
        );
        doc
    }

    #[test]
    fn test_tab_kind_element_names() {
        assert_eq!(TabKind::Material.element_name(), "Materials");
        assert_eq!(TabKind::Test.element_name(), "Tests");
    }

    #[test]
    fn test_document_has_both_tabs() {
        let doc = Document::new();
        let kinds: Vec<_> = doc.tabs().map(Tab::kind).collect();
        assert_eq!(kinds, vec![TabKind::Material, TabKind::Test]);
    }

    #[test]
    fn test_snapshot_of_document() {
        let snapshot = CountSnapshot::of(&sample_document());
        assert_eq!(snapshot.material, vec![vec![2, 0]]);
        assert_eq!(snapshot.test, vec![vec![1]]);
        assert_eq!(snapshot.total_sections(), 2);
        assert_eq!(snapshot.total_pages(), 3);
        assert_eq!(snapshot.total_items(), 3);
        assert_eq!(snapshot.total_ticks(), 2 + 2 + 3 + 3);
    }

    #[test]
    fn test_answer_id_roundtrips_through_display() {
        let id = AnswerId::new();
        assert_eq!(AnswerId::parse(&id.to_string()), Some(id));
        assert_eq!(AnswerId::parse("not-a-uuid"), None);
    }

    #[test]
    fn test_item_count() {
        assert_eq!(sample_document().item_count(), 3);
    }
}
