//! App state and core application logic
//!
//! Owns the route being shown, the navigation history, the query caches and
//! the per-route view state. Fetches leave as [`FetchRequest`]s and come back
//! as [`FetchOutcome`]s, so all state changes happen on the event loop.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ShowFetcher, TmdbError};
use crate::models::{RouteKey, ShowId, ShowRecord, SimilarTitle};
use crate::query::{FetchTicket, QueryCache, DEFAULT_TTL};
use crate::title::{DocumentTitle, TitleSync};
use crate::ui::detail::{DetailPhase, DetailView, FetchStatus};
use crate::ui::reveal::Reveal;
use crate::ui::similar::SimilarPanel;

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    /// Move selection up
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// Fetch Plumbing
// =============================================================================

/// Request the event loop should send to the fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Show(FetchTicket),
    Similar(FetchTicket),
}

/// Result of a [`FetchRequest`], tagged with its ticket
#[derive(Debug)]
pub enum FetchOutcome {
    Show(FetchTicket, Result<ShowRecord, TmdbError>),
    Similar(FetchTicket, Result<Vec<SimilarTitle>, TmdbError>),
}

/// Run a request on the tokio runtime and send the outcome back
pub fn dispatch(
    fetcher: Arc<dyn ShowFetcher>,
    request: FetchRequest,
    tx: UnboundedSender<FetchOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = match request {
            FetchRequest::Show(ticket) => {
                let result = fetcher.show(&ticket.key).await;
                FetchOutcome::Show(ticket, result)
            }
            FetchRequest::Similar(ticket) => {
                let result = fetcher.similar(&ticket.key).await;
                FetchOutcome::Similar(ticket, result)
            }
        };
        if tx.send(outcome).is_err() {
            debug!("event loop closed, fetch outcome dropped");
        }
    })
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Whether the app is running
    pub running: bool,
    /// Previously shown routes
    nav_stack: Vec<RouteKey>,
    detail: DetailView,
    shows: QueryCache<ShowRecord>,
    similar: QueryCache<Vec<SimilarTitle>>,
    /// Selection in the similar titles panel
    pub similar_list: ListState,
    pub reveal: Reveal,
    title: TitleSync,
    pending: Vec<FetchRequest>,
    was_displaying: bool,
}

impl App {
    /// Open the detail page for `route`
    pub fn new(route: RouteKey, title: DocumentTitle) -> Self {
        Self::with_ttl(route, title, DEFAULT_TTL)
    }

    pub fn with_ttl(route: RouteKey, title: DocumentTitle, ttl: Duration) -> Self {
        let mut app = Self {
            running: true,
            nav_stack: Vec::new(),
            detail: DetailView::new(route),
            shows: QueryCache::new(ttl),
            similar: QueryCache::new(ttl),
            similar_list: ListState::default(),
            reveal: Reveal::new(),
            title: TitleSync::new(title),
            pending: Vec::new(),
            was_displaying: false,
        };
        app.subscribe();
        app
    }

    pub fn route(&self) -> &RouteKey {
        self.detail.route()
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    /// Number of routes to go back through
    pub fn history_len(&self) -> usize {
        self.nav_stack.len()
    }

    pub fn fetch_status(&self) -> FetchStatus<'_> {
        FetchStatus::from_snapshot(&self.shows.snapshot(self.detail.route()))
    }

    pub fn phase(&self) -> DetailPhase {
        self.detail.phase(&self.fetch_status())
    }

    /// Title currently held by the shared document title
    pub fn document_title(&self) -> String {
        self.title.document().get()
    }

    /// Error of the last failed record fetch for the current route
    pub fn fetch_error(&self) -> Option<&str> {
        self.shows.error(self.detail.route())
    }

    pub fn similar_panel(&self) -> SimilarPanel<'_> {
        let route = self.detail.route();
        SimilarPanel::new(
            &route.category,
            self.similar.snapshot(route),
            self.similar_list.selected,
        )
    }

    pub fn similar_titles(&self) -> &[SimilarTitle] {
        self.similar
            .snapshot(self.detail.route())
            .data
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn selected_similar(&self) -> Option<&SimilarTitle> {
        self.similar_titles().get(self.similar_list.selected)
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Show another route, pushing the current one to the history
    pub fn navigate(&mut self, route: RouteKey) {
        if &route == self.route() {
            return;
        }
        let current = self.route().clone();
        self.nav_stack.push(current);
        self.enter(route);
    }

    /// Go back to the previous route
    pub fn back(&mut self) -> bool {
        match self.nav_stack.pop() {
            Some(prev) => {
                self.enter(prev);
                true
            }
            None => false,
        }
    }

    fn enter(&mut self, route: RouteKey) {
        info!(route = %route, "navigate");
        self.detail.set_route(route);
        self.similar_list.reset();
        self.sync_similar_len();
        self.reveal.restart();
        self.was_displaying = false;
        self.subscribe();
    }

    /// Open the similar title under the cursor, same category as the page
    pub fn open_selected_similar(&mut self) -> bool {
        let Some(id) = self.selected_similar().map(|t| t.id) else {
            return false;
        };
        let route = RouteKey::new(self.route().category.clone(), ShowId::Numeric(id));
        self.navigate(route);
        true
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
        self.title.unmount();
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    fn subscribe(&mut self) {
        let key = self.detail.route().clone();
        if let Some(ticket) = self.shows.request(&key) {
            self.pending.push(FetchRequest::Show(ticket));
        }
        if let Some(ticket) = self.similar.request(&key) {
            self.pending.push(FetchRequest::Similar(ticket));
        }
    }

    /// Fetch the current route again in the background
    pub fn refetch(&mut self) {
        let key = self.detail.route().clone();
        debug!(route = %key, "refetch");
        if let Some(ticket) = self.shows.refetch(&key) {
            self.pending.push(FetchRequest::Show(ticket));
        }
        if let Some(ticket) = self.similar.refetch(&key) {
            self.pending.push(FetchRequest::Similar(ticket));
        }
    }

    /// Drain the requests queued since the last call
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn handle_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Show(ticket, result) => {
                if let Err(e) = &result {
                    warn!(route = %ticket.key, error = %e, "show fetch failed");
                }
                self.shows.settle(&ticket, result);
            }
            FetchOutcome::Similar(ticket, result) => {
                if let Err(e) = &result {
                    warn!(route = %ticket.key, error = %e, "similar fetch failed");
                }
                self.similar.settle(&ticket, result);
                self.sync_similar_len();
            }
        }
    }

    fn sync_similar_len(&mut self) {
        let len = self.similar_titles().len();
        self.similar_list.set_len(len);
    }

    // -------------------------------------------------------------------------
    // Per-frame Updates
    // -------------------------------------------------------------------------

    pub fn tick(&mut self) {
        self.reveal.tick();
    }

    /// Apply side effects that follow the current state: the document title
    /// and the reveal restart when a page first shows.
    pub fn sync_effects(&mut self) {
        let snapshot = self.shows.snapshot(self.detail.route());
        let title = snapshot.data.map(ShowRecord::display_title);
        self.title.sync(title, snapshot.is_loading);

        let status = FetchStatus::from_snapshot(&snapshot);
        let displaying = matches!(self.detail.phase(&status), DetailPhase::Displaying { .. });
        if displaying && !self.was_displaying {
            self.reveal.restart();
        }
        self.was_displaying = displaying;
    }

    pub fn toggle_overview(&mut self) -> bool {
        let status = FetchStatus::from_snapshot(&self.shows.snapshot(self.detail.route()));
        self.detail.toggle_overview(&status)
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            KeyCode::Char('m') | KeyCode::Char(' ') => self.toggle_overview(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.similar_list.up();
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.similar_list.down();
                true
            }
            KeyCode::Home => {
                self.similar_list.first();
                true
            }
            KeyCode::End => {
                self.similar_list.last();
                true
            }
            KeyCode::Enter => self.open_selected_similar(),
            KeyCode::Esc | KeyCode::Backspace => self.back(),
            KeyCode::Char('r') => {
                self.refetch();
                true
            }
            _ => false,
        }
    }
}
