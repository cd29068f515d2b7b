//! caper - movie and TV detail pages in the terminal
//!
//! Opens the detail page of a TMDB movie or show: poster, title, genres,
//! collapsible overview, cast, trailer with an episode grid, videos and
//! similar titles.
//!
//! # Modules
//!
//! - `models` - Route key, fetched record and similar-title types
//! - `api` - TMDB client behind the `ShowFetcher` trait
//! - `query` - Keyed request cache with loading/fetching/error flags
//! - `title` - Process-wide document title and its sync effect
//! - `app` - Application state, navigation and fetch plumbing
//! - `ui` - Detail page state machine and ratatui rendering
//! - `cli`, `commands`, `config`, `logging` - Binary support

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod query;
pub mod title;
pub mod ui;

// Re-export commonly used types
pub use models::{MediaType, RouteKey, ShowHeading, ShowId, ShowRecord, SimilarTitle};

pub use api::{ShowFetcher, TmdbClient, TmdbError};
pub use app::{App, FetchOutcome, FetchRequest};
pub use query::{QueryCache, QuerySnapshot};
pub use title::{DocumentTitle, TitleSync};
pub use ui::detail::{DetailPhase, DetailRender, DetailView, FetchStatus, OverviewState};
