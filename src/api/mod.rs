//! API clients for external services
//!
//! - TMDB: movie/TV detail records and similar titles

pub mod tmdb;

pub use tmdb::{TmdbClient, TmdbError};

use async_trait::async_trait;

use crate::models::{RouteKey, ShowRecord, SimilarTitle};

/// Remote source of detail-page data.
///
/// The query layer only talks to this trait; tests substitute stubs that
/// settle out of request order.
#[async_trait]
pub trait ShowFetcher: Send + Sync {
    /// Fetch the detail record for a route
    async fn show(&self, key: &RouteKey) -> Result<ShowRecord, TmdbError>;

    /// Fetch the titles listed in the similar-titles panel
    async fn similar(&self, key: &RouteKey) -> Result<Vec<SimilarTitle>, TmdbError>;
}
