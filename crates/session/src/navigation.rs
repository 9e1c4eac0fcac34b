//! Navigation contract.
//!
//! Two kinds of redirect exist: a client-side `push` used by the route guard,
//! and a full-page `hard_redirect` used when the session is found invalid in
//! the middle of a request.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Push(String),
    HardRedirect(String),
}

pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
    fn hard_redirect(&self, path: &str);
}

impl<N> Navigator for Arc<N>
where
    N: Navigator + ?Sized,
{
    fn push(&self, path: &str) {
        (**self).push(path)
    }

    fn hard_redirect(&self, path: &str) {
        (**self).hard_redirect(path)
    }
}

/// Navigator for headless hosts: records every navigation and logs it.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Navigation> {
        match self.history.lock() {
            Ok(h) => h.clone(),
            Err(_) => Vec::new(),
        }
    }

    pub fn hard_redirects(&self) -> Vec<String> {
        self.history()
            .into_iter()
            .filter_map(|n| match n {
                Navigation::HardRedirect(path) => Some(path),
                Navigation::Push(_) => None,
            })
            .collect()
    }

    pub fn pushes(&self) -> Vec<String> {
        self.history()
            .into_iter()
            .filter_map(|n| match n {
                Navigation::Push(path) => Some(path),
                Navigation::HardRedirect(_) => None,
            })
            .collect()
    }

    fn record(&self, navigation: Navigation) {
        if let Ok(mut h) = self.history.lock() {
            h.push(navigation);
        }
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, path: &str) {
        tracing::info!(path, "navigate");
        self.record(Navigation::Push(path.to_string()));
    }

    fn hard_redirect(&self, path: &str) {
        tracing::info!(path, "hard redirect");
        self.record(Navigation::HardRedirect(path.to_string()));
    }
}
