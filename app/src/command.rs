use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Select a file (or clear the selection) and click upload.
    Upload(Option<PathBuf>),
    /// Type the text into the question input and press Enter.
    Question(String),
    Quit,
}

pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();

    if trimmed == "/quit" {
        return Command::Quit;
    }

    if let Some(rest) = trimmed.strip_prefix("/upload") {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            let path = rest.trim();
            return if path.is_empty() {
                Command::Upload(None)
            } else {
                Command::Upload(Some(PathBuf::from(path)))
            };
        }
    }

    // Questions keep their raw text; trimming is the ask action's job.
    Command::Question(line.to_string())
}
