//! Interactive and one-shot drivers for the catalog controller.

use anyhow::Result;
use catalog_core::{CatalogController, DisplaySurface, ViewEvent};
use shared::domain::{SortSelection, HIGH_TO_LOW, LOW_TO_HIGH};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    View(ViewEvent),
    Help,
    Quit,
}

/// `:sort <value>`, `:help`, `:quit`/`:q`; any other line is a search.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed {
        ":q" | ":quit" => return Command::Quit,
        ":help" | ":h" => return Command::Help,
        _ => {}
    }
    if let Some(value) = trimmed.strip_prefix(":sort") {
        if value.is_empty() || value.starts_with(char::is_whitespace) {
            return Command::View(ViewEvent::SortChanged {
                selection: SortSelection::new(value.trim()),
            });
        }
    }
    Command::View(ViewEvent::Submit {
        query: line.to_string(),
    })
}

pub fn help_text() -> String {
    format!(
        "type a search term and press enter\n  :sort {LOW_TO_HIGH} | :sort {HIGH_TO_LOW}  reorder by price\n  :help  show this help\n  :quit  exit\n"
    )
}

/// Reads commands from `input` while applying fetch outcomes as they land.
/// At end of input, outstanding fetches are settled before returning.
pub async fn run_interactive<R>(
    controller: &mut CatalogController,
    surface: &mut dyn DisplaySurface,
    input: R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    controller.handle(ViewEvent::Load, surface);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Command::Quit => return Ok(()),
                    Command::Help => surface.show_notice(&help_text()),
                    Command::View(event) => {
                        controller.handle(event, surface);
                    }
                }
            }
            Some(outcome) = controller.next_outcome(), if controller.in_flight() > 0 => {
                let _ = controller.apply(outcome, surface);
            }
        }
    }

    controller.settle(surface).await;
    Ok(())
}

/// Runs a single search (or the initial listing when `query` is `None`) and
/// waits for it to land.
pub async fn run_once(
    controller: &mut CatalogController,
    query: Option<String>,
    surface: &mut dyn DisplaySurface,
) {
    let event = match query {
        Some(query) => ViewEvent::Submit { query },
        None => ViewEvent::Load,
    };
    controller.handle(event, surface);
    controller.settle(surface).await;
}
