use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::shared::AppError;

/// Lifecycle of one screen-facing query: it starts loading, then lands on
/// a value or an error; a refetch re-enters loading.
#[derive(Debug, Clone, Default)]
pub enum QueryState<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(Arc<AppError>),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            QueryState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

struct Inner<T> {
    generation: u64,
    state: QueryState<T>,
}

/// Holds the state of one query across fetches and refetches.
///
/// Every `run` bumps a generation before awaiting its fetch and only
/// stores the outcome if no newer run started in the meantime, so a slow
/// response from an abandoned fetch cannot overwrite fresher state.
pub struct QueryCell<T> {
    inner: RwLock<Inner<T>>,
}

impl<T: Clone> Default for QueryCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> QueryCell<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                generation: 0,
                state: QueryState::Loading,
            }),
        }
    }

    pub async fn state(&self) -> QueryState<T> {
        self.inner.read().await.state.clone()
    }

    /// Runs one fetch cycle and returns its outcome. The stored state
    /// only reflects the outcome when this run is still the newest one.
    pub async fn run<F>(&self, fetch: F) -> QueryState<T>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        let generation = {
            let mut inner = self.inner.write().await;
            inner.generation += 1;
            inner.state = QueryState::Loading;
            inner.generation
        };

        let outcome = match fetch.await {
            Ok(value) => QueryState::Ready(value),
            Err(error) => {
                warn!(error = %error, "Query fetch failed");
                QueryState::Failed(Arc::new(error))
            }
        };

        let mut inner = self.inner.write().await;
        if inner.generation == generation {
            inner.state = outcome.clone();
        } else {
            debug!(
                stale_generation = generation,
                current_generation = inner.generation,
                "Discarding stale query outcome"
            );
        }

        outcome
    }
}
