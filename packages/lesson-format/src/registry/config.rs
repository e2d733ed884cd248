//! Registry configuration for the standard content kinds.

use super::core::ContentRegistry;
use crate::types::{ContentItem, TestItem, TextItem};

/// Create a content registry with every standard content kind.
#[must_use]
pub fn create_content_registry() -> ContentRegistry {
    let mut registry = ContentRegistry::new();

    registry.register(|| ContentItem::Text(TextItem::default()));
    registry.register(|| ContentItem::Test(TestItem::default()));

    registry
}
