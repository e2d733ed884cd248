//! Types for the schema system.

/// Declarative rule for one element of the lesson format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRule {
    /// XML tag name.
    pub tag: String,

    /// Child element tags allowed inside this element.
    pub children: Vec<String>,

    /// Whether non-whitespace text may appear directly inside this element.
    pub allows_text: bool,

    /// Attributes that must be present on the element.
    pub required_attributes: Vec<String>,
}

impl ElementRule {
    /// Create a rule for an empty, text-free element.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: Vec::new(),
            allows_text: false,
            required_attributes: Vec::new(),
        }
    }

    /// Set the allowed children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// Allow or forbid text content.
    #[must_use]
    pub fn with_text(mut self, allows_text: bool) -> Self {
        self.allows_text = allows_text;
        self
    }

    /// Set the required attributes.
    #[must_use]
    pub fn with_required_attributes(
        mut self,
        attributes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.required_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether `tag` may appear as a child.
    #[must_use]
    pub fn allows_child(&self, tag: &str) -> bool {
        self.children.iter().any(|c| c == tag)
    }
}
