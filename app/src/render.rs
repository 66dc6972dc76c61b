use pdf_chat_client::{Author, EntryId, PageEvent};
use std::collections::HashMap;
use std::io::{self, Write};
use tokio::sync::mpsc::UnboundedReceiver;

/// Writes page events as terminal lines. A bot entry keeps its line open
/// while it streams so each update only prints the new suffix.
pub struct Renderer<W: Write> {
    out: W,
    shown: HashMap<EntryId, String>,
    open_line: Option<EntryId>,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: HashMap::new(),
            open_line: None,
        }
    }

    pub fn render(&mut self, event: &PageEvent) -> io::Result<()> {
        match event {
            PageEvent::UploadStatusChanged(status) => {
                self.close_line()?;
                writeln!(self.out, "[upload] {}", status)?;
            }
            PageEvent::EntryAppended(entry) => {
                self.close_line()?;
                match entry.author {
                    Author::User => writeln!(self.out, "{}", entry)?,
                    Author::Bot => {
                        write!(self.out, "{}", entry)?;
                        self.shown.insert(entry.id, entry.content.clone());
                        self.open_line = Some(entry.id);
                    }
                }
            }
            PageEvent::EntryUpdated { id, content } => {
                let previous = self.shown.get(id).map(String::as_str).unwrap_or_default();
                match content.strip_prefix(previous) {
                    Some(suffix) if self.open_line == Some(*id) => {
                        write!(self.out, "{}", suffix)?;
                    }
                    _ => {
                        self.close_line()?;
                        write!(self.out, "{}: {}", Author::Bot.label(), content)?;
                        self.open_line = Some(*id);
                    }
                }
                self.shown.insert(*id, content.clone());
            }
            PageEvent::FileSelected(_)
            | PageEvent::ControlToggled { .. }
            | PageEvent::QuestionInputChanged(_)
            | PageEvent::ScrolledToBottom => {}
        }
        self.out.flush()
    }

    pub fn finish(&mut self) -> io::Result<()> {
        self.close_line()?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn close_line(&mut self) -> io::Result<()> {
        if self.open_line.take().is_some() {
            writeln!(self.out)?;
        }
        Ok(())
    }
}

pub async fn render_events<W: Write>(
    mut events: UnboundedReceiver<PageEvent>,
    out: W,
) -> io::Result<W> {
    let mut renderer = Renderer::new(out);
    while let Some(event) = events.recv().await {
        renderer.render(&event)?;
    }
    renderer.finish()?;
    Ok(renderer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_chat_client::TranscriptEntry;
    use pretty_assertions::assert_eq;

    fn entry(author: Author, content: &str) -> TranscriptEntry {
        TranscriptEntry {
            id: EntryId::new(),
            author,
            content: content.to_string(),
        }
    }

    fn rendered(events: &[PageEvent]) -> String {
        let mut renderer = Renderer::new(Vec::new());
        for event in events {
            renderer.render(event).unwrap();
        }
        renderer.finish().unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn streamed_answer_is_printed_on_one_line() {
        let question = entry(Author::User, "X");
        let answer = entry(Author::Bot, "");
        let id = answer.id;

        let output = rendered(&[
            PageEvent::EntryAppended(question),
            PageEvent::EntryAppended(answer),
            PageEvent::ScrolledToBottom,
            PageEvent::EntryUpdated { id, content: "A".to_string() },
            PageEvent::EntryUpdated { id, content: "AB".to_string() },
            PageEvent::EntryUpdated { id, content: "ABC".to_string() },
        ]);

        assert_eq!(output, "You: X\nBot: ABC\n");
    }

    #[test]
    fn replaced_answer_is_reprinted() {
        let answer = entry(Author::Bot, "");
        let id = answer.id;

        let output = rendered(&[
            PageEvent::EntryAppended(answer),
            PageEvent::EntryUpdated { id, content: "partial".to_string() },
            PageEvent::EntryUpdated {
                id,
                content: "Error processing request.".to_string(),
            },
        ]);

        assert_eq!(output, "Bot: partial\nBot: Error processing request.\n");
    }

    #[test]
    fn status_lines_close_an_open_answer() {
        let answer = entry(Author::Bot, "");
        let id = answer.id;

        let output = rendered(&[
            PageEvent::EntryAppended(answer),
            PageEvent::EntryUpdated { id, content: "Hel".to_string() },
            PageEvent::UploadStatusChanged("Uploading...".to_string()),
            PageEvent::EntryUpdated { id, content: "Hello".to_string() },
        ]);

        assert_eq!(output, "Bot: Hel\n[upload] Uploading...\nBot: Hello\n");
    }

    #[tokio::test]
    async fn closing_the_feed_terminates_an_open_answer_line() {
        let (page, events) = pdf_chat_client::Page::new();
        page.append_entry(Author::User, "X");
        let answer = page.append_entry(Author::Bot, "");
        page.replace_entry_content(answer, "half an ans");
        drop(page);

        let out = render_events(events, Vec::new()).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "You: X\nBot: half an ans\n");
    }

    #[tokio::test]
    async fn render_events_stops_when_feed_closes() {
        let (page, events) = pdf_chat_client::Page::new();
        page.set_upload_status("No file selected.");
        drop(page);

        let out = render_events(events, Vec::new()).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[upload] No file selected.\n");
    }
}
