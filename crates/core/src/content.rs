//! Lesson content items.
//!
//! A lesson's `content` column is an ordered JSON array of tagged items.
//! The wire shape matches the stored documents: `type` discriminates the
//! variant, `value` carries the text body for text and question items, and
//! `order` is the sort key (ties broken by array position).

use serde::{Deserialize, Serialize};

/// Question-specific fields of a content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionItem {
    /// Stable identifier referenced by the correctness accumulator.
    pub id: String,
    /// The question text shown to the user.
    pub value: String,
    /// Canonical expected answer. Matching is trimmed and case-insensitive
    /// against this string, never against `options`.
    pub answer: String,
    /// Choices shown to the user (informational only).
    #[serde(default)]
    pub options: Vec<String>,
    /// Explanation shown with the feedback after any submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i32>,
}

/// One unit of lesson content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order: Option<i32>,
        value: String,
    },
    Image {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order: Option<i32>,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Question {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        order: Option<i32>,
        #[serde(flatten)]
        question: QuestionItem,
    },
}

impl ContentItem {
    /// The explicit sort key, if any. Items without one sort last.
    pub fn order(&self) -> Option<i32> {
        match self {
            ContentItem::Text { order, .. }
            | ContentItem::Image { order, .. }
            | ContentItem::Question { order, .. } => *order,
        }
    }

    pub fn is_question(&self) -> bool {
        matches!(self, ContentItem::Question { .. })
    }

    pub fn as_question(&self) -> Option<&QuestionItem> {
        match self {
            ContentItem::Question { question, .. } => Some(question),
            _ => None,
        }
    }

    /// Client-facing view of the item with the expected answer redacted.
    ///
    /// The explanation is also withheld; it is only revealed as part of the
    /// feedback after a submission.
    pub fn public_view(&self) -> ContentItemView {
        match self {
            ContentItem::Text { order, value } => ContentItemView::Text {
                order: *order,
                value: value.clone(),
            },
            ContentItem::Image {
                order,
                url,
                caption,
            } => ContentItemView::Image {
                order: *order,
                url: url.clone(),
                caption: caption.clone(),
            },
            ContentItem::Question { order, question } => ContentItemView::Question {
                order: *order,
                id: question.id.clone(),
                value: question.value.clone(),
                options: question.options.clone(),
                points: question.points,
            },
        }
    }
}

/// Validate a lesson content list before it is stored.
///
/// Question items must carry a non-empty id (unique within the lesson) and
/// a non-empty canonical answer; the evaluator and the correctness
/// accumulator key on both.
pub fn validate_items(items: &[ContentItem]) -> Result<(), crate::error::CoreError> {
    let mut seen_ids = std::collections::HashSet::new();
    for item in items {
        if let Some(question) = item.as_question() {
            if question.id.trim().is_empty() {
                return Err(crate::error::CoreError::Validation(
                    "Question items require a non-empty id".into(),
                ));
            }
            if question.answer.trim().is_empty() {
                return Err(crate::error::CoreError::Validation(format!(
                    "Question {} requires a non-empty answer",
                    question.id
                )));
            }
            if !seen_ids.insert(question.id.as_str()) {
                return Err(crate::error::CoreError::Validation(format!(
                    "Duplicate question id: {}",
                    question.id
                )));
            }
        }
    }
    Ok(())
}

/// Answer-redacted content item returned by the content endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItemView {
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        order: Option<i32>,
        value: String,
    },
    Image {
        #[serde(skip_serializing_if = "Option::is_none")]
        order: Option<i32>,
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Question {
        #[serde(skip_serializing_if = "Option::is_none")]
        order: Option<i32>,
        id: String,
        value: String,
        options: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        points: Option<i32>,
    },
}
