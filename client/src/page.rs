//! Page state shared between the controller and whatever renders it.
//!
//! Every mutation emits a [`PageEvent`] while the state lock is held, so the
//! event feed observes mutations in the order they were applied.

use crate::models::{Author, EntryId, TranscriptEntry};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Element ids of the markup version of the page.
pub mod element_id {
    pub const PDF_FILE: &str = "pdfFile";
    pub const UPLOAD_STATUS: &str = "uploadStatus";
    pub const UPLOAD_BUTTON: &str = "uploadBtn";
    pub const USER_INPUT: &str = "userInput";
    pub const CHAT_BOX: &str = "chatBox";
    pub const ASK_BUTTON: &str = "askBtn";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Upload,
    Ask,
}

impl Control {
    pub fn element_id(&self) -> &'static str {
        match self {
            Control::Upload => element_id::UPLOAD_BUTTON,
            Control::Ask => element_id::ASK_BUTTON,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    FileSelected(Option<PathBuf>),
    UploadStatusChanged(String),
    ControlToggled { control: Control, enabled: bool },
    QuestionInputChanged(String),
    EntryAppended(TranscriptEntry),
    EntryUpdated { id: EntryId, content: String },
    ScrolledToBottom,
}

#[derive(Debug)]
struct PageState {
    selected_file: Option<PathBuf>,
    upload_status: String,
    upload_enabled: bool,
    question_input: String,
    ask_enabled: bool,
    transcript: Vec<TranscriptEntry>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            selected_file: None,
            upload_status: String::new(),
            upload_enabled: true,
            question_input: String::new(),
            ask_enabled: true,
            transcript: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    state: Arc<Mutex<PageState>>,
    events: UnboundedSender<PageEvent>,
}

impl Page {
    pub fn new() -> (Self, UnboundedReceiver<PageEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let page = Self {
            state: Arc::new(Mutex::new(PageState::default())),
            events,
        };
        (page, receiver)
    }

    pub fn select_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.state();
        state.selected_file = Some(path.clone());
        self.emit(PageEvent::FileSelected(Some(path)));
    }

    pub fn clear_file_selection(&self) {
        let mut state = self.state();
        state.selected_file = None;
        self.emit(PageEvent::FileSelected(None));
    }

    pub fn selected_file(&self) -> Option<PathBuf> {
        self.state().selected_file.clone()
    }

    pub fn set_upload_status(&self, status: &str) {
        let mut state = self.state();
        state.upload_status = status.to_string();
        self.emit(PageEvent::UploadStatusChanged(status.to_string()));
    }

    pub fn upload_status(&self) -> String {
        self.state().upload_status.clone()
    }

    pub fn set_enabled(&self, control: Control, enabled: bool) {
        let mut state = self.state();
        match control {
            Control::Upload => state.upload_enabled = enabled,
            Control::Ask => state.ask_enabled = enabled,
        }
        self.emit(PageEvent::ControlToggled { control, enabled });
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        let state = self.state();
        match control {
            Control::Upload => state.upload_enabled,
            Control::Ask => state.ask_enabled,
        }
    }

    pub fn type_question(&self, text: &str) {
        let mut state = self.state();
        state.question_input = text.to_string();
        self.emit(PageEvent::QuestionInputChanged(text.to_string()));
    }

    pub fn clear_question(&self) {
        self.type_question("");
    }

    pub fn question_input(&self) -> String {
        self.state().question_input.clone()
    }

    pub fn append_entry(&self, author: Author, content: &str) -> EntryId {
        let entry = TranscriptEntry {
            id: EntryId::new(),
            author,
            content: content.to_string(),
        };
        let id = entry.id;

        let mut state = self.state();
        state.transcript.push(entry.clone());
        self.emit(PageEvent::EntryAppended(entry));
        id
    }

    /// Replaces the whole content of an entry. Unknown ids are ignored.
    pub fn replace_entry_content(&self, id: EntryId, content: &str) {
        let mut state = self.state();
        let Some(entry) = state.transcript.iter_mut().find(|e| e.id == id) else {
            log::warn!("No transcript entry {}", id);
            return;
        };
        entry.content = content.to_string();
        self.emit(PageEvent::EntryUpdated {
            id,
            content: content.to_string(),
        });
    }

    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.state().transcript.clone()
    }

    pub fn scroll_to_bottom(&self) {
        let _state = self.state();
        self.emit(PageEvent::ScrolledToBottom);
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: PageEvent) {
        // Nobody listening is fine: the state is still authoritative.
        let _ = self.events.send(event);
    }
}
