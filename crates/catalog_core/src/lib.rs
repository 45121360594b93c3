//! Fetch, search, sort and render a remote product catalog.

pub mod config;
pub mod controller;
pub mod fetcher;
pub mod render;
pub mod validation;

pub use config::{load_settings, Settings, ViewMode};
pub use controller::{CatalogController, CatalogState, FetchOutcome, FetchRequest, ViewEvent};
pub use fetcher::{CatalogClient, CatalogEndpoints, CatalogSource, FetchError};
pub use render::{render_collection, DisplaySurface, ProductCard, RecordingSurface};
pub use validation::is_valid_input;
