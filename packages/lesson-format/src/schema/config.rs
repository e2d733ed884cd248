//! Schema configuration for lesson files.

use super::registry::Schema;
use super::types::ElementRule;
use crate::config::{
    LESSON_ELEMENT, MATERIALS_ELEMENT, PAGE_ELEMENT, SECTION_ELEMENT, TESTS_ELEMENT,
    TITLE_ATTRIBUTE,
};
use crate::registry::ContentRegistry;

/// Create the lesson schema for a set of registered content kinds.
///
/// ```text
/// Lesson
/// ├── Materials
/// │   └── Section (Title)
/// │       └── Page
/// │           └── <content kind>
/// └── Tests
///     └── Section (Title)
///         └── Page
///             └── <content kind>
/// ```
///
/// Rules for the content kinds themselves come from each kind.
#[must_use]
pub fn create_lesson_schema(registry: &ContentRegistry) -> Schema {
    let mut schema = Schema::new(LESSON_ELEMENT);

    schema.register(
        ElementRule::new(LESSON_ELEMENT).with_children([MATERIALS_ELEMENT, TESTS_ELEMENT]),
    );
    schema.register(ElementRule::new(MATERIALS_ELEMENT).with_children([SECTION_ELEMENT]));
    schema.register(ElementRule::new(TESTS_ELEMENT).with_children([SECTION_ELEMENT]));
    schema.register(
        ElementRule::new(SECTION_ELEMENT)
            .with_children([PAGE_ELEMENT])
            .with_required_attributes([TITLE_ATTRIBUTE]),
    );

    let mut content_tags: Vec<&str> = registry.registered_tags().into_iter().collect();
    content_tags.sort_unstable();
    schema.register(ElementRule::new(PAGE_ELEMENT).with_children(content_tags));

    for rule in registry.element_rules() {
        schema.register(rule);
    }

    schema
}
