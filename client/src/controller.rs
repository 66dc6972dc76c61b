use crate::backend::Backend;
use crate::decoder::StreamDecoder;
use crate::error::BackendError;
use crate::models::*;
use crate::page::{Control, Page};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other(String),
}

/// Drives the page: the upload action, the ask action and the Enter-key
/// shortcut. Cloning is cheap and every clone drives the same page.
#[derive(Clone)]
pub struct PageController {
    page: Page,
    backend: Arc<dyn Backend>,
    scroll_delay: Duration,
}

impl PageController {
    pub fn new(page: Page, backend: Arc<dyn Backend>, scroll_delay: Duration) -> Self {
        Self {
            page,
            backend,
            scroll_delay,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// A click on the upload control. Ignored while the control is disabled.
    pub async fn click_upload(&self) {
        if !self.page.is_enabled(Control::Upload) {
            log::debug!("Upload control is disabled, ignoring click");
            return;
        }
        self.upload_pdf().await;
    }

    /// A click on the ask control. Ignored while the control is disabled.
    pub async fn click_ask(&self) {
        if !self.page.is_enabled(Control::Ask) {
            log::debug!("Ask control is disabled, ignoring click");
            return;
        }
        self.ask_question().await;
    }

    /// Key press inside the question input. Enter asks regardless of the
    /// ask control's state.
    pub async fn handle_key_press(&self, key: Key) {
        if key == Key::Enter {
            self.ask_question().await;
        }
    }

    pub async fn upload_pdf(&self) {
        let Some(file) = self.page.selected_file() else {
            self.page.set_upload_status(NO_FILE_SELECTED);
            return;
        };

        self.page.set_upload_status(UPLOADING);
        self.page.set_enabled(Control::Upload, false);

        let status = match self.backend.upload(&file).await {
            Ok(reply) => match reply.status_text() {
                Some(text) => text.to_string(),
                None => {
                    log::error!("Upload reply had neither message nor error");
                    UPLOAD_FAILED.to_string()
                }
            },
            Err(e) => {
                log::error!("Upload of {} failed: {}", file.display(), e);
                UPLOAD_FAILED.to_string()
            }
        };

        self.page.set_upload_status(&status);
        self.page.set_enabled(Control::Upload, true);
    }

    pub async fn ask_question(&self) {
        let question = self.page.question_input().trim().to_string();
        if question.is_empty() {
            return;
        }

        self.page.append_entry(Author::User, &question);
        let answer_entry = self.page.append_entry(Author::Bot, "");

        self.page.clear_question();
        self.page.set_enabled(Control::Ask, false);
        self.schedule_scroll();

        match self.stream_answer(&question, answer_entry).await {
            Ok(answer) => log::info!("Answer complete ({} chars)", answer.chars().count()),
            Err(e) => {
                log::error!("Ask failed: {}", e);
                self.page.replace_entry_content(answer_entry, ASK_FAILED);
            }
        }

        self.page.set_enabled(Control::Ask, true);
    }

    async fn stream_answer(&self, question: &str, entry: EntryId) -> Result<String, BackendError> {
        let mut chunks = self.backend.ask(question).await?;
        let mut decoder = StreamDecoder::new();
        let mut answer = String::new();

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            decoder.decode_into(&chunk, &mut answer);
            self.page.replace_entry_content(entry, &answer);
            self.schedule_scroll();
        }

        Ok(answer)
    }

    fn schedule_scroll(&self) {
        let page = self.page.clone();
        let delay = self.scroll_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            page.scroll_to_bottom();
        });
    }
}
