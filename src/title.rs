//! Process-wide document title
//!
//! The detail page mirrors the shown title into the terminal window title and
//! restores [`DEFAULT_TITLE`] when it goes away. [`TitleSync`] re-runs the
//! effect only when its inputs change; every run tears down the previous one
//! before applying, and dropping the sync restores the default.

use std::io::stdout;
use std::sync::{Arc, Mutex, MutexGuard};

use crossterm::{execute, terminal::SetTitle};
use tracing::{trace, warn};

/// Title shown when no detail page is active
pub const DEFAULT_TITLE: &str = "Caper Movie";

/// Destination the title is mirrored to
pub trait TitleSink: Send {
    fn apply(&mut self, title: &str);
}

/// Writes the title to the terminal via an OSC escape sequence
#[derive(Debug, Default)]
pub struct TerminalTitle;

impl TitleSink for TerminalTitle {
    fn apply(&mut self, title: &str) {
        if let Err(e) = execute!(stdout(), SetTitle(title)) {
            warn!(error = %e, "failed to set terminal title");
        }
    }
}

struct TitleState {
    current: String,
    sink: Option<Box<dyn TitleSink>>,
}

/// Shared handle to the process-wide title
#[derive(Clone)]
pub struct DocumentTitle {
    inner: Arc<Mutex<TitleState>>,
}

impl std::fmt::Debug for DocumentTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentTitle")
            .field("current", &self.get())
            .finish()
    }
}

impl Default for DocumentTitle {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTitle {
    /// In-memory title, not mirrored anywhere
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(TitleState {
                current: DEFAULT_TITLE.to_string(),
                sink: None,
            })),
        }
    }

    /// Title mirrored to `sink` on every change
    pub fn with_sink(sink: impl TitleSink + 'static) -> Self {
        let title = Self::new();
        {
            let mut state = title.lock();
            let mut sink: Box<dyn TitleSink> = Box::new(sink);
            sink.apply(&state.current);
            state.sink = Some(sink);
        }
        title
    }

    fn lock(&self) -> MutexGuard<'_, TitleState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self) -> String {
        self.lock().current.clone()
    }

    pub fn set(&self, title: &str) {
        let mut state = self.lock();
        if state.current == title {
            return;
        }
        trace!(title, "document title");
        state.current = title.to_string();
        if let Some(sink) = state.sink.as_mut() {
            sink.apply(title);
        }
    }

    pub fn reset(&self) {
        self.set(DEFAULT_TITLE);
    }
}

/// Restores the default title when dropped
#[derive(Debug)]
pub struct TitleTeardown {
    document: DocumentTitle,
}

impl Drop for TitleTeardown {
    fn drop(&mut self) {
        self.document.reset();
    }
}

/// Keeps the document title in step with the page being shown
#[derive(Debug)]
pub struct TitleSync {
    document: DocumentTitle,
    deps: Option<(Option<String>, bool)>,
    teardown: Option<TitleTeardown>,
}

impl TitleSync {
    pub fn new(document: DocumentTitle) -> Self {
        Self {
            document,
            deps: None,
            teardown: None,
        }
    }

    /// Run the effect if `title` or `is_loading` changed since the last run.
    /// Returns whether it ran.
    pub fn sync(&mut self, title: Option<&str>, is_loading: bool) -> bool {
        let deps = (title.map(str::to_owned), is_loading);
        if self.deps.as_ref() == Some(&deps) {
            return false;
        }

        // Previous run's teardown goes first
        self.teardown = None;

        let applied = match title {
            Some(title) if !is_loading => title,
            _ => DEFAULT_TITLE,
        };
        self.document.set(applied);
        self.teardown = Some(TitleTeardown {
            document: self.document.clone(),
        });
        self.deps = Some(deps);
        true
    }

    /// Tear the effect down; the next `sync` runs unconditionally
    pub fn unmount(&mut self) {
        self.teardown = None;
        self.deps = None;
    }

    pub fn document(&self) -> &DocumentTitle {
        &self.document
    }
}
