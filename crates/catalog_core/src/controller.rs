//! Event wiring between user actions, catalog fetches and the display.
//!
//! The controller owns every piece of view state. Fetches run as spawned tasks
//! and report back over a channel; outcomes are applied in the order they
//! arrive, so the last response to land owns the display regardless of which
//! request was issued last.

use std::sync::Arc;

use shared::{
    domain::{Collection, SortSelection},
    error::{ErrorCode, ViewError},
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    config::ViewMode,
    fetcher::{CatalogSource, FetchError},
    render::{render_collection, DisplaySurface},
    validation::is_valid_input,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Load,
    Submit { query: String },
    SortChanged { selection: SortSelection },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    All,
    Search { query: String },
}

impl FetchRequest {
    pub fn failure_code(&self) -> ErrorCode {
        match self {
            Self::All => ErrorCode::LoadFailed,
            Self::Search { .. } => ErrorCode::SearchFailed,
        }
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    /// Issue order of the request, starting at 1.
    pub id: u64,
    pub request: FetchRequest,
    pub result: Result<Collection, FetchError>,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    current: Collection,
    selection: SortSelection,
    last_applied: Option<u64>,
}

impl CatalogState {
    pub fn new(selection: SortSelection) -> Self {
        Self {
            selection,
            ..Self::default()
        }
    }

    /// Most recently fetched collection, in server order.
    pub fn current(&self) -> &Collection {
        &self.current
    }

    pub fn selection(&self) -> &SortSelection {
        &self.selection
    }

    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }
}

pub struct CatalogController {
    source: Arc<dyn CatalogSource>,
    mode: ViewMode,
    state: CatalogState,
    loaded: bool,
    issued: u64,
    in_flight: usize,
    outcomes_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl CatalogController {
    pub fn new(source: Arc<dyn CatalogSource>, mode: ViewMode, selection: SortSelection) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            source,
            mode,
            state: CatalogState::new(selection),
            loaded: false,
            issued: 0,
            in_flight: 0,
            outcomes_tx,
            outcomes_rx,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Routes a user action. Returns the id of the fetch it started, if any.
    pub fn handle(&mut self, event: ViewEvent, surface: &mut dyn DisplaySurface) -> Option<u64> {
        match event {
            ViewEvent::Load => self.load(),
            ViewEvent::Submit { query } => self.submit(&query, surface).ok(),
            ViewEvent::SortChanged { selection } => {
                self.change_sort(selection, surface);
                None
            }
        }
    }

    /// Starts the full listing on first presentation only.
    pub fn load(&mut self) -> Option<u64> {
        if self.loaded {
            debug!("initial load already issued; ignoring");
            return None;
        }
        self.loaded = true;
        Some(self.start_fetch(FetchRequest::All))
    }

    pub fn submit(&mut self, raw: &str, surface: &mut dyn DisplaySurface) -> Result<u64, ViewError> {
        if !is_valid_input(raw) {
            let code = ErrorCode::InvalidSearchTerm;
            surface.set_validation_message(code.message());
            return Err(code.into());
        }
        surface.set_validation_message("");
        Ok(self.start_fetch(FetchRequest::Search {
            query: raw.to_string(),
        }))
    }

    /// Stores the selection and re-renders the held collection without a
    /// fetch. Returns whether anything was rendered.
    pub fn change_sort(&mut self, selection: SortSelection, surface: &mut dyn DisplaySurface) -> bool {
        if self.mode == ViewMode::Plain {
            debug!(%selection, "sort control is disabled in plain view");
            return false;
        }
        self.state.selection = selection;
        if self.state.current.is_empty() {
            return false;
        }
        render_collection(&self.state.current, Some(&self.state.selection), surface);
        true
    }

    fn start_fetch(&mut self, request: FetchRequest) -> u64 {
        self.issued += 1;
        self.in_flight += 1;
        let id = self.issued;
        let source = Arc::clone(&self.source);
        let tx = self.outcomes_tx.clone();
        debug!(id, ?request, "starting catalog fetch");
        tokio::spawn(async move {
            let result = match &request {
                FetchRequest::All => source.fetch_all().await,
                FetchRequest::Search { query } => source.fetch_by_query(query).await,
            };
            let _ = tx.send(FetchOutcome {
                id,
                request,
                result,
            });
        });
        id
    }

    /// Waits for the next fetch to finish. `None` when nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<FetchOutcome> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.outcomes_rx.recv().await?;
        self.in_flight -= 1;
        Some(outcome)
    }

    /// Puts a finished fetch on screen. Returns the number of cards rendered,
    /// or the notice shown in their place when the fetch failed.
    pub fn apply(
        &mut self,
        outcome: FetchOutcome,
        surface: &mut dyn DisplaySurface,
    ) -> Result<usize, ViewError> {
        let FetchOutcome {
            id,
            request,
            result,
        } = outcome;

        if let Some(last) = self.state.last_applied {
            if id < last {
                debug!(id, last, "applying response issued before the one on screen");
            }
        }
        self.state.last_applied = Some(id);

        match result {
            Ok(collection) => Ok(match self.mode {
                ViewMode::Sortable => {
                    self.state.current = collection;
                    render_collection(&self.state.current, Some(&self.state.selection), surface)
                }
                ViewMode::Plain => render_collection(&collection, None, surface),
            }),
            Err(error) => {
                let code = request.failure_code();
                warn!(id, %error, "catalog fetch failed");
                surface.clear();
                surface.show_notice(code.message());
                Err(code.into())
            }
        }
    }

    /// Applies every outstanding fetch as it completes.
    pub async fn settle(&mut self, surface: &mut dyn DisplaySurface) -> Vec<Result<usize, ViewError>> {
        let mut applied = Vec::new();
        while let Some(outcome) = self.next_outcome().await {
            applied.push(self.apply(outcome, surface));
        }
        applied
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
