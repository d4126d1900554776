use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::shared::batch::{BatchStatus, LoadState};
use serde::Serialize;

/// Token identifying one refresh trigger. Later triggers get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Generation(pub u64);

/// Result of one refresh cycle, offered to the store for commit
#[derive(Debug, Clone)]
pub struct PageUpdate<V> {
    pub view: V,
    pub status: BatchStatus,
    pub failed_panels: Vec<String>,
    /// Blocking message, only when every request failed
    pub error: Option<String>,
}

/// What a page displays right now
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot<V> {
    #[serde(flatten)]
    pub state: LoadState,
    pub generation: Option<Generation>,
    pub view: V,
    pub error: Option<String>,
    pub failed_panels: Vec<String>,
}

#[derive(Debug)]
struct PageState<V> {
    latest: u64,
    mounted: bool,
    snapshot: PageSnapshot<V>,
}

/// Display state of one dashboard page.
///
/// Only the newest generation may commit, and nothing commits after
/// [`PageStore::unmount`]. Cloning shares the same state.
#[derive(Debug, Clone)]
pub struct PageStore<V> {
    inner: Arc<Mutex<PageState<V>>>,
}

impl<V: Clone + Default> Default for PageStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Default> PageStore<V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PageState {
                latest: 0,
                mounted: true,
                snapshot: PageSnapshot {
                    state: LoadState::Idle,
                    generation: None,
                    view: V::default(),
                    error: None,
                    failed_panels: Vec::new(),
                },
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new cycle: takes the next generation and enters `Loading`
    pub fn begin(&self) -> Generation {
        let mut state = self.lock();
        state.latest += 1;
        if state.mounted {
            state.snapshot.state = LoadState::Loading;
            state.snapshot.error = None;
        }
        Generation(state.latest)
    }

    /// Apply a cycle's result. Returns `false` and changes nothing when the
    /// generation has been superseded or the page is unmounted.
    pub fn commit(&self, generation: Generation, update: PageUpdate<V>) -> bool {
        let mut state = self.lock();
        if !state.mounted {
            tracing::debug!("Page unmounted, dropping result of generation {}", generation.0);
            return false;
        }
        if generation.0 != state.latest {
            tracing::debug!(
                "Discarding stale result of generation {} (latest is {})",
                generation.0,
                state.latest
            );
            return false;
        }

        state.snapshot = PageSnapshot {
            state: LoadState::from_status(update.status),
            generation: Some(generation),
            view: update.view,
            error: update.error,
            failed_panels: update.failed_panels,
        };
        true
    }

    pub fn unmount(&self) {
        self.lock().mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    pub fn snapshot(&self) -> PageSnapshot<V> {
        self.lock().snapshot.clone()
    }
}
