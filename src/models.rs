//! Data models for the notes application.
//!
//! Users, notes, and the derived views (tag counts, search results) used by
//! the store and the HTML handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

// ============================================================================
// Notes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// Markdown source
    pub content: String,
    pub tags: Vec<String>,
    /// Last AI summary, verbatim (may contain `<think>` regions)
    #[serde(default)]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// First `max_chars` characters of the content, on a char boundary.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head.trim_end())
        } else {
            head
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Validated user input for creating or updating a note.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl NoteDraft {
    pub fn new(title: &str, content: &str, tags_raw: &str) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() || content.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Title and content are required".to_string(),
            ));
        }
        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            tags: parse_tags(tags_raw),
        })
    }
}

/// Split a comma-separated tag list: trimmed, blanks dropped, first
/// occurrence wins on duplicates.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

// ============================================================================
// Tags and Search
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub note: Note,
    pub matches: Vec<SearchMatch>,
}

#[derive(Debug, Clone)]
pub struct SearchMatch {
    /// 0 for a title match, otherwise the 1-based content line
    pub line_number: usize,
    pub line_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_with_content(content: &str) -> Note {
        Note {
            id: "n1".to_string(),
            owner_id: "u1".to_string(),
            title: "t".to_string(),
            content: content.to_string(),
            tags: vec!["rust".to_string()],
            summary: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(" rust, web ,, rust,notes "),
            vec!["rust", "web", "notes"]
        );
        assert!(parse_tags(" , ").is_empty());
    }

    #[test]
    fn test_draft_requires_title_and_content() {
        assert!(NoteDraft::new("  ", "body", "").is_err());
        assert!(NoteDraft::new("Title", "   ", "").is_err());
        let draft = NoteDraft::new(" Title ", "body", "a, b").unwrap();
        assert_eq!(draft.title, "Title");
        assert_eq!(draft.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_excerpt_is_char_safe() {
        let note = note_with_content("笔记内容很长很长");
        assert_eq!(note.excerpt(2), "笔记...");
        assert_eq!(note.excerpt(100), "笔记内容很长很长");
    }

    #[test]
    fn test_has_tag() {
        let note = note_with_content("x");
        assert!(note.has_tag("rust"));
        assert!(!note.has_tag("Rust"));
    }
}
