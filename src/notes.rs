//! Notes and the rules for admitting them
//!
//! Every title/content pair supplied from the outside passes through
//! [`validate`] before it is allowed near the storage.

use core::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// Maximum length of a (trimmed) title, in characters
pub const MAX_TITLE_LENGTH: usize = 256;

/// Maximum length of the content, in characters
pub const MAX_CONTENT_LENGTH: usize = 5000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Title and content that passed validation
///
/// Can only be constructed by [`validate`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteValues {
    title: String,
    content: Option<String>,
}

impl NoteValues {
    /// The trimmed title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The content, exactly as supplied
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

/// Reasons a title/content pair is refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is missing, empty or only whitespace
    TitleRequired,

    /// Trimmed title is longer than [`MAX_TITLE_LENGTH`]
    TitleTooLong,

    /// Content is longer than [`MAX_CONTENT_LENGTH`]
    ContentTooLong,
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::TitleRequired => write!(f, "title required"),
            ValidationError::TitleTooLong => write!(f, "title too long"),
            ValidationError::ContentTooLong => write!(f, "content too long"),
        }
    }
}

/// Validate a title and (optional) content
///
/// Rules are checked in order, the first failing rule wins:
/// - Title must be non-empty after trimming
/// - Trimmed title can be at most [`MAX_TITLE_LENGTH`] characters
/// - Content can be at most [`MAX_CONTENT_LENGTH`] characters
///
/// The title is trimmed, the content is left alone.
///
/// ```rust
/// let values = validate(Some("  Hello  "), None).unwrap();
/// assert_eq!(values.title(), "Hello");
/// ```
pub fn validate(title: Option<&str>, content: Option<&str>) -> Result<NoteValues, ValidationError> {
    let title = title.map(str::trim).unwrap_or_default();

    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong);
    }

    if let Some(content) = content {
        if content.chars().count() > MAX_CONTENT_LENGTH {
            return Err(ValidationError::ContentTooLong);
        }
    }

    Ok(NoteValues {
        title: title.to_string(),
        content: content.map(ToString::to_string),
    })
}
