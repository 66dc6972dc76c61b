use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const NO_FILE_SELECTED: &str = "No file selected.";
pub const UPLOADING: &str = "Uploading...";
pub const UPLOAD_FAILED: &str = "Upload failed.";
pub const ASK_FAILED: &str = "Error processing request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Author {
    User,
    Bot,
}

impl Author {
    pub fn label(&self) -> &'static str {
        match self {
            Author::User => "You",
            Author::Bot => "Bot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub author: Author,
    pub content: String,
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.author.label(), self.content)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadReply {
    /// Text to show in the upload status: a non-empty `message`, else a
    /// non-empty `error`.
    pub fn status_text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.as_deref().filter(|e| !e.is_empty()))
    }
}

#[derive(Debug, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}
