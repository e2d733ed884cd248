//! Content registry mapping tag names to factories.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::node::SerializableNode;
use crate::schema::ElementRule;
use crate::types::ContentItem;

/// Factory producing a fresh, empty content item of one kind.
pub type ContentFactory = fn() -> ContentItem;

/// Registry mapping content element tags to factories.
///
/// The set of kinds is closed: only registered tags are valid inside a page,
/// and the schema is derived from exactly this set.
pub struct ContentRegistry {
    factories: HashMap<&'static str, ContentFactory>,
}

impl ContentRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory under the tag of the item it produces.
    pub fn register(&mut self, factory: ContentFactory) {
        let tag = factory().tag();
        self.factories.insert(tag, factory);
    }

    /// Instantiate an empty item for a tag.
    ///
    /// Returns `None` if no kind is registered for the tag.
    #[must_use]
    pub fn create(&self, tag_name: &str) -> Option<ContentItem> {
        self.factories.get(tag_name).map(|factory| factory())
    }

    /// Return set of all registered tag names.
    #[must_use]
    pub fn registered_tags(&self) -> HashSet<&str> {
        self.factories.keys().copied().collect()
    }

    /// Schema rules contributed by every registered kind.
    #[must_use]
    pub fn element_rules(&self) -> Vec<ElementRule> {
        self.factories
            .values()
            .flat_map(|factory| factory().element_rules())
            .collect()
    }
}

impl Default for ContentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.factories.keys().collect();
        tags.sort();
        f.debug_struct("ContentRegistry").field("kinds", &tags).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextItem;

    #[test]
    fn test_registry_register_and_create() {
        let mut registry = ContentRegistry::new();
        registry.register(|| ContentItem::Text(TextItem::default()));

        assert!(registry.create("TestItem").is_none());
        assert!(matches!(
            registry.create("TextItem"),
            Some(ContentItem::Text(_))
        ));
        assert!(registry.create("VideoItem").is_none());
    }

    #[test]
    fn test_registry_tags_and_rules() {
        let mut registry = ContentRegistry::new();
        registry.register(|| ContentItem::Text(TextItem::default()));

        assert_eq!(registry.registered_tags(), HashSet::from(["TextItem"]));
        let rules = registry.element_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].tag, "TextItem");
    }
}
