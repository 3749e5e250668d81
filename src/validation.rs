//! Caller-side input policy.
//!
//! The feed store accepts any text it is given. Front-ends run submissions
//! through this layer first: both fields trimmed, neither empty, and each
//! within its character limit.

use serde::Deserialize;
use tracing::warn;

use crate::datatypes::Mood;
use crate::error::ValidationError;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_CONTENT_CHARS: usize = 2_000;
pub const MAX_REPLY_CHARS: usize = 1_000;

/// Character limits, counted in `char`s rather than bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_title: usize,
    pub max_content: usize,
    pub max_reply: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_title: MAX_TITLE_CHARS,
            max_content: MAX_CONTENT_CHARS,
            max_reply: MAX_REPLY_CHARS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicDraft {
    pub title: String,
    pub content: String,
    pub mood: Mood,
}

impl Limits {
    pub fn validate_topic(
        &self,
        title: &str,
        content: &str,
        mood: Option<&str>,
    ) -> Result<TopicDraft, ValidationError> {
        Ok(TopicDraft {
            title: checked("title", title, self.max_title)?,
            content: checked("content", content, self.max_content)?,
            mood: parse_mood(mood)?,
        })
    }

    pub fn validate_reply(&self, content: &str) -> Result<String, ValidationError> {
        checked("reply", content, self.max_reply)
    }
}

/// Parses an optional mood; `None` or blank means the default topic mood.
pub fn parse_mood(mood: Option<&str>) -> Result<Mood, ValidationError> {
    match mood.map(str::trim) {
        None | Some("") => Ok(Mood::default()),
        Some(text) => text.parse().inspect_err(|err| warn!(%err, "rejected mood")),
    }
}

fn checked(field: &'static str, text: &str, max: usize) -> Result<String, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        warn!(field, "rejected empty input");
        return Err(ValidationError::EmptyField(field));
    }

    let len = text.chars().count();
    if len > max {
        warn!(field, len, max, "rejected over-length input");
        return Err(ValidationError::TooLong { field, len, max });
    }

    Ok(text.to_owned())
}
