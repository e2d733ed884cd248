//! Configuration constants and validation functions for lesson files.

use std::path::Path;

use crate::error::{LessonError, Result};

/// Root element of a lesson file.
pub const LESSON_ELEMENT: &str = "Lesson";

/// Element holding the material tab.
pub const MATERIALS_ELEMENT: &str = "Materials";

/// Element holding the test tab.
pub const TESTS_ELEMENT: &str = "Tests";

/// Section element inside a tab.
pub const SECTION_ELEMENT: &str = "Section";

/// Page element inside a section.
pub const PAGE_ELEMENT: &str = "Page";

/// Question element inside a test item.
pub const QUESTION_ELEMENT: &str = "Question";

/// Answer element inside a test item.
pub const ANSWER_ELEMENT: &str = "Answer";

/// Section title attribute.
pub const TITLE_ATTRIBUTE: &str = "Title";

/// Answer identity attribute.
pub const ID_ATTRIBUTE: &str = "Id";

/// Format version attribute on the root element.
pub const VERSION_ATTRIBUTE: &str = "Version";

/// Format version written by this crate.
pub const FORMAT_VERSION: &str = "1.0";

/// Indentation width (spaces) used when writing.
pub const INDENT_SIZE: usize = 2;

/// Template for the determinate progress bar in the CLI.
pub const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Validate a path argument for a public operation.
///
/// Only checks the path itself, never touches the filesystem, so it can fail
/// fast before any I/O starts.
///
/// # Returns
/// * `Ok(())` if the path names a file
/// * `Err(LessonError::InvalidArgument)` if it is empty or has no file name
///
/// # Examples
/// ```
/// use std::path::Path;
/// use lesson_format::config::validate_path;
///
/// assert!(validate_path(Path::new("lesson.lesson")).is_ok());
/// assert!(validate_path(Path::new("")).is_err());
/// assert!(validate_path(Path::new("..")).is_err());
/// ```
pub fn validate_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(LessonError::InvalidArgument("path is empty".to_string()));
    }
    if path.file_name().is_none() {
        return Err(LessonError::InvalidArgument(format!(
            "path does not name a file: {}",
            path.display()
        )));
    }
    Ok(())
}
