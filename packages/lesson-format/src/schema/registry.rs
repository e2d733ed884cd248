//! Schema registry and validation checks.

use std::collections::HashMap;

use super::types::ElementRule;
use crate::error::{LessonError, Result};

/// Element rules of a lesson file, keyed by tag.
#[derive(Debug, Clone)]
pub struct Schema {
    root: String,
    rules: HashMap<String, ElementRule>,
}

impl Schema {
    /// Create a schema with the given root element and no rules.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            rules: HashMap::new(),
        }
    }

    /// Register an element rule, replacing any rule for the same tag.
    pub fn register(&mut self, rule: ElementRule) {
        self.rules.insert(rule.tag.clone(), rule);
    }

    /// The required root element.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Get the rule for a tag.
    #[must_use]
    pub fn get_rule(&self, tag: &str) -> Option<&ElementRule> {
        self.rules.get(tag)
    }

    /// Check that `tag` may open inside `parent` (`None` for the document root).
    ///
    /// # Errors
    /// `MissingElement` when the root is wrong, `Validation` otherwise.
    pub fn check_element(&self, tag: &str, parent: Option<&str>) -> Result<()> {
        let Some(parent) = parent else {
            if tag == self.root {
                return Ok(());
            }
            return Err(LessonError::MissingElement {
                element: self.root.clone(),
                context: "document".to_string(),
            });
        };

        let allowed = self
            .rules
            .get(parent)
            .is_some_and(|rule| rule.allows_child(tag));
        if !allowed {
            return Err(violation(tag, Some(parent), "element not allowed here"));
        }
        if !self.rules.contains_key(tag) {
            return Err(violation(tag, Some(parent), "element has no schema rule"));
        }
        Ok(())
    }

    /// Check that every required attribute of `tag` is present.
    ///
    /// # Errors
    /// `Validation` naming the first missing attribute.
    pub fn check_attributes<'a>(
        &self,
        tag: &str,
        parent: Option<&str>,
        present: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        let Some(rule) = self.rules.get(tag) else {
            return Ok(());
        };
        let present: Vec<&str> = present.into_iter().collect();
        match rule
            .required_attributes
            .iter()
            .find(|required| !present.contains(&required.as_str()))
        {
            Some(missing) => Err(violation(
                tag,
                parent,
                &format!("missing required attribute '{missing}'"),
            )),
            None => Ok(()),
        }
    }

    /// Check that non-whitespace text may appear directly inside `parent`.
    ///
    /// # Errors
    /// `Validation` when the element only has element content.
    pub fn check_text(&self, parent: &str) -> Result<()> {
        if self.rules.get(parent).is_some_and(|rule| rule.allows_text) {
            Ok(())
        } else {
            Err(violation(parent, None, "text not allowed in element content"))
        }
    }
}

fn violation(element: &str, context: Option<&str>, reason: &str) -> LessonError {
    LessonError::Validation {
        element: element.to_string(),
        context: context.map(str::to_string),
        reason: reason.to_string(),
    }
}
