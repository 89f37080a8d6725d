//! Lazily loaded route components.
//!
//! A [`LazyComponent`] wraps an async loader. The first successful load is
//! cached and shared by every clone; a failed load leaves the component
//! retryable so the next navigation calls the loader again.
//!
//! ```
//! use route_navigator::loader::{LazyComponent, LoadState};
//! use route_navigator::ComponentId;
//!
//! let lazy = LazyComponent::new(|| async { Ok(ComponentId::new("ProjectsPage")) });
//! assert_eq!(lazy.state(), LoadState::Pending);
//!
//! let id = pollster::block_on(lazy.load()).unwrap();
//! assert_eq!(id.as_str(), "ProjectsPage");
//! assert_eq!(lazy.state(), LoadState::Resolved(id));
//! ```

use crate::route::ComponentId;
use crate::trace_log;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Boxed future returned by a loader.
pub type LoadFuture = Pin<Box<dyn Future<Output = Result<ComponentId, String>> + Send>>;

type LoaderFn = dyn Fn() -> LoadFuture + Send + Sync;

/// Observable state of a lazy component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Not loaded yet, or a load is in flight.
    Pending,
    /// Loaded; the cached component.
    Resolved(ComponentId),
    /// The last load failed with this message. The next load retries.
    Failed(String),
}

/// A component produced on first use by an async loader.
#[derive(Clone)]
pub struct LazyComponent {
    loader: Arc<LoaderFn>,
    state: Arc<Mutex<LoadState>>,
    calls: Arc<AtomicUsize>,
}

impl LazyComponent {
    /// Wrap an async loader.
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ComponentId, String>> + Send + 'static,
    {
        Self {
            loader: Arc::new(move || Box::pin(loader()) as LoadFuture),
            state: Arc::new(Mutex::new(LoadState::Pending)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Current state.
    pub fn state(&self) -> LoadState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The cached component, if loaded.
    pub fn resolved(&self) -> Option<ComponentId> {
        match self.state() {
            LoadState::Resolved(id) => Some(id),
            _ => None,
        }
    }

    /// How many times the loader has been invoked.
    pub fn load_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Load the component, reusing a cached result.
    ///
    /// The state lock is never held across the loader's await point.
    pub async fn load(&self) -> Result<ComponentId, String> {
        if let Some(id) = self.resolved() {
            return Ok(id);
        }

        self.set_state(LoadState::Pending);
        self.calls.fetch_add(1, Ordering::SeqCst);
        let future = (self.loader)();
        let outcome = future.await;

        match &outcome {
            Ok(id) => {
                trace_log!("Lazy component resolved to '{}'", id);
                self.set_state(LoadState::Resolved(id.clone()));
            }
            Err(message) => {
                self.set_state(LoadState::Failed(message.clone()));
            }
        }
        outcome
    }

    fn set_state(&self, state: LoadState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

impl fmt::Debug for LazyComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyComponent")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn test_load_is_cached() {
        let lazy = LazyComponent::new(|| async { Ok(ComponentId::new("AboutPage")) });

        let first = pollster::block_on(lazy.load()).unwrap();
        let second = pollster::block_on(lazy.load()).unwrap();
        assert_eq!(first, second);
        assert_eq!(lazy.load_count(), 1);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let fail = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&fail);
        let lazy = LazyComponent::new(move || {
            let failing = flag.load(Ordering::SeqCst);
            async move {
                if failing {
                    Err("chunk missing".to_string())
                } else {
                    Ok(ComponentId::new("ContactPage"))
                }
            }
        });

        assert_eq!(
            pollster::block_on(lazy.load()),
            Err("chunk missing".to_string())
        );
        assert_eq!(lazy.state(), LoadState::Failed("chunk missing".into()));

        fail.store(false, Ordering::SeqCst);
        assert!(pollster::block_on(lazy.load()).is_ok());
        assert_eq!(lazy.load_count(), 2);
        assert_eq!(lazy.resolved(), Some(ComponentId::new("ContactPage")));
    }

    #[test]
    fn test_clones_share_state() {
        let lazy = LazyComponent::new(|| async { Ok(ComponentId::new("HomePage")) });
        let clone = lazy.clone();
        pollster::block_on(lazy.load()).unwrap();
        assert!(clone.resolved().is_some());
    }
}
