//! Plain-text display surface for a terminal.

use std::io::{self, Write};

use catalog_core::{DisplaySurface, ProductCard};

pub struct TerminalSurface<W: Write> {
    out: W,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(error) = self.out.write_fmt(line).and_then(|()| self.out.flush()) {
            tracing::warn!(%error, "failed to write to terminal");
        }
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn clear(&mut self) {
        self.emit(format_args!("\n== products ==\n"));
    }

    fn append_card(&mut self, card: ProductCard) {
        let image = if card.image_src.is_empty() {
            "(no image)"
        } else {
            card.image_src.as_str()
        };
        self.emit(format_args!("{}  {}\n    {}\n", card.title, card.price, image));
    }

    fn show_notice(&mut self, text: &str) {
        self.emit(format_args!("{text}\n"));
    }

    fn set_validation_message(&mut self, text: &str) {
        if !text.is_empty() {
            self.emit(format_args!("! {text}\n"));
        }
    }
}
