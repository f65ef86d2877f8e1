//! Cancellation-safe resource loading.
//!
//! A [`ResourceLoader`] tracks one logical fetch for a page. Each activation
//! gets its own [`CancellationToken`]; starting another activation, calling
//! [`ResourceLoader::cancel`] or dropping the loader cancels it. A completion
//! whose token is cancelled is discarded, so a slow response for an old key
//! can never overwrite the state of a newer one.
//!
//! The fetch itself is not aborted. The returned [`LoadTask`] still runs the
//! request to completion; only the state update is suppressed.

use crate::error::LoadFailure;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Message used when a page does not supply its own.
const DEFAULT_MISSING_KEY_MESSAGE: &str = "Id is missing";

/// Lifecycle of a single fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResourceState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(LoadFailure),
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadFailure> {
        match self {
            Self::Error(failure) => Some(failure),
            _ => None,
        }
    }
}

/// The work of one activation. Await it or hand it to `tokio::spawn`.
#[must_use = "a load does nothing until the task is awaited or spawned"]
pub struct LoadTask(Pin<Box<dyn Future<Output = ()> + Send + 'static>>);

impl LoadTask {
    fn new(fut: impl Future<Output = ()> + Send + 'static) -> Self {
        Self(Box::pin(fut))
    }

    /// A task with nothing left to do.
    pub fn ready() -> Self {
        Self::new(std::future::ready(()))
    }
}

impl Future for LoadTask {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.0.as_mut().poll(cx)
    }
}

impl fmt::Debug for LoadTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoadTask")
    }
}

struct Inner<K, T> {
    state: ResourceState<T>,
    /// Key of the latest activation; `None` before the first one.
    key: Option<Option<K>>,
    token: CancellationToken,
    activations: u64,
}

impl<K, T> Drop for Inner<K, T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

fn lock<K, T>(inner: &Mutex<Inner<K, T>>) -> MutexGuard<'_, Inner<K, T>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Loads a value for a dependency key and exposes its [`ResourceState`].
///
/// Owned by exactly one page. Spawned [`LoadTask`]s only hold a weak
/// reference, so dropping the loader tears everything down.
pub struct ResourceLoader<K, T> {
    inner: Arc<Mutex<Inner<K, T>>>,
    missing_key_message: String,
}

impl<K, T> ResourceLoader<K, T>
where
    K: Clone + PartialEq + fmt::Debug + Send + 'static,
    T: Send + 'static,
{
    pub fn new() -> Self {
        Self::with_missing_key_message(DEFAULT_MISSING_KEY_MESSAGE)
    }

    /// Loader whose missing-key error reads `message` (e.g. "Owner id is
    /// missing").
    pub fn with_missing_key_message(message: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: ResourceState::Idle,
                key: None,
                token: CancellationToken::new(),
                activations: 0,
            })),
            missing_key_message: message.into(),
        }
    }

    /// A copy of the current state.
    pub fn state(&self) -> ResourceState<T>
    where
        T: Clone,
    {
        lock(&self.inner).state.clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&ResourceState<T>) -> R) -> R {
        f(&lock(&self.inner).state)
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.inner).state.is_loading()
    }

    /// Key of the latest activation.
    pub fn key(&self) -> Option<K> {
        lock(&self.inner).key.clone().flatten()
    }

    /// Number of activations started so far, missing-key ones included.
    pub fn activations(&self) -> u64 {
        lock(&self.inner).activations
    }

    /// Activates for `key` unless the latest activation already used the
    /// same key, in which case the returned task does nothing.
    pub fn load<F, Fut, E>(&self, key: Option<K>, fetch: F) -> LoadTask
    where
        F: FnOnce(K) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<LoadFailure> + Send + 'static,
    {
        if lock(&self.inner).key.as_ref() == Some(&key) {
            debug!(?key, "key unchanged, keeping current state");
            return LoadTask::ready();
        }
        self.reload(key, fetch)
    }

    /// Activates for `key` unconditionally. This is the explicit re-trigger
    /// after a failure.
    pub fn reload<F, Fut, E>(&self, key: Option<K>, fetch: F) -> LoadTask
    where
        F: FnOnce(K) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: Into<LoadFailure> + Send + 'static,
    {
        let mut inner = lock(&self.inner);
        inner.token.cancel();
        inner.token = CancellationToken::new();
        inner.activations += 1;
        inner.key = Some(key.clone());

        let Some(key) = key else {
            info!(reason = %self.missing_key_message, "no key, skipping fetch");
            inner.state = ResourceState::Error(LoadFailure::missing_key(
                self.missing_key_message.clone(),
            ));
            return LoadTask::ready();
        };

        info!(?key, activation = inner.activations, "loading");
        inner.state = ResourceState::Loading;
        let token = inner.token.clone();
        drop(inner);

        let weak: Weak<Mutex<Inner<K, T>>> = Arc::downgrade(&self.inner);
        LoadTask::new(async move {
            let result = fetch(key.clone()).await;

            let Some(shared) = weak.upgrade() else {
                debug!(?key, "loader dropped, discarding result");
                return;
            };
            let mut inner = lock(&shared);
            if token.is_cancelled() {
                debug!(?key, "activation superseded, discarding result");
                return;
            }

            inner.state = match result {
                Ok(value) => ResourceState::Success(value),
                Err(err) => {
                    let failure: LoadFailure = err.into();
                    debug!(?key, error = %failure, "load failed");
                    ResourceState::Error(failure)
                }
            };
        })
    }

    /// Cancels the in-flight activation, if any. State is left as it is.
    pub fn cancel(&self) {
        lock(&self.inner).token.cancel();
    }

    /// Cancels any activation and returns to [`ResourceState::Idle`].
    pub fn reset(&self) {
        let mut inner = lock(&self.inner);
        inner.token.cancel();
        inner.token = CancellationToken::new();
        inner.key = None;
        inner.state = ResourceState::Idle;
    }
}

impl<K, T> Default for ResourceLoader<K, T>
where
    K: Clone + PartialEq + fmt::Debug + Send + 'static,
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> fmt::Debug for ResourceLoader<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLoader")
            .field("missing_key_message", &self.missing_key_message)
            .finish_non_exhaustive()
    }
}
