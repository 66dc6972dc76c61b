mod command;
mod render;

use anyhow::{Context, Result};
use command::Command;
use pdf_chat_client::{ClientConfig, HttpBackend, Key, Page, PageController};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let config = ClientConfig::from_env().context("invalid client configuration")?;
    let backend = HttpBackend::new(&config).context("could not build http backend")?;
    log::info!("Using backend at {}", config.base_url);

    let (page, events) = Page::new();
    let controller = PageController::new(page, Arc::new(backend), config.scroll_delay);
    let renderer = tokio::spawn(render::render_events(events, std::io::stdout()));

    println!(
        "Type a question and press Enter. `/upload <file.pdf>` uploads a document, `/quit` exits."
    );

    let mut in_flight = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match command::parse_line(&line) {
            Command::Quit => {
                in_flight.abort_all();
                break;
            }
            Command::Upload(file) => {
                match file {
                    Some(path) => controller.page().select_file(path),
                    None => controller.page().clear_file_selection(),
                }
                let controller = controller.clone();
                in_flight.spawn(async move { controller.click_upload().await });
            }
            Command::Question(text) => {
                controller.page().type_question(&text);
                let controller = controller.clone();
                in_flight.spawn(async move { controller.handle_key_press(Key::Enter).await });
            }
        }

        // Let the new task read the page before the next line is typed into it.
        tokio::task::yield_now().await;
    }

    while let Some(joined) = in_flight.join_next().await {
        match joined {
            Err(e) if !e.is_cancelled() => log::error!("Page task failed: {}", e),
            _ => {}
        }
    }

    // Reached on `/quit` too. The event feed closes once the last page handle
    // is gone, including the ones held by pending scroll tasks, and the
    // renderer then terminates any open answer line.
    drop(controller);
    renderer.await.context("renderer task panicked")??;
    Ok(())
}
