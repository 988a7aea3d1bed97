//! Process-wide observable store
//!
//! The store owns one state tree, a registry of named reducers and a list of
//! listeners. Every dispatch runs one reducer, shallow-merges the returned
//! partial tree into the state, publishes the new snapshot and synchronously
//! calls every listener that is subscribed at that moment.
//!
//! # Lifecycle
//!
//! 1. Construct once in the composition root with [`Store::new`]
//! 2. Register every slice with [`Store::register`] before anything dispatches
//! 3. Hand clones to consumers; clones share the same state
//!
//! Dispatching an action nobody registered is a wiring bug and panics.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};
use zoon::{Mutable, Signal};

pub mod merge;

pub use merge::Sparse;

/// State tree that accepts partial trees.
///
/// `merge` overwrites exactly the top-level keys present in the patch and
/// leaves every other key untouched.
pub trait ShallowMerge: Clone + Send + Sync + 'static {
    type Patch: Default + Send + 'static;

    fn merge(&mut self, patch: Self::Patch);
}

/// Name of an action together with the payload type its reducer expects.
pub struct ActionKey<P> {
    name: &'static str,
    payload: PhantomData<fn(P)>,
}

impl<P> ActionKey<P> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            payload: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<P> Clone for ActionKey<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for ActionKey<P> {}

impl<P> fmt::Debug for ActionKey<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActionKey").field(&self.name).finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("action `{0}` is not registered")]
    UnknownAction(&'static str),
    #[error("action `{action}` was dispatched with a payload that is not `{expected}`")]
    PayloadMismatch {
        action: &'static str,
        expected: &'static str,
    },
}

type ErasedReducer<S> = Arc<
    dyn Fn(&S, Box<dyn Any + Send>) -> Result<<S as ShallowMerge>::Patch, StoreError>
        + Send
        + Sync,
>;

type Listener<S> = Arc<dyn Fn(Arc<S>) + Send + Sync>;

/// Named reducers contributed by one slice.
pub struct ActionSet<S: ShallowMerge> {
    reducers: Vec<(&'static str, ErasedReducer<S>)>,
}

impl<S: ShallowMerge> ActionSet<S> {
    pub fn new() -> Self {
        Self {
            reducers: Vec::new(),
        }
    }

    /// Add a reducer. Reducers must be pure: they read the current snapshot
    /// and return the partial tree to merge, and must never dispatch.
    pub fn on<P, F>(mut self, key: ActionKey<P>, reducer: F) -> Self
    where
        P: Send + 'static,
        F: Fn(&S, P) -> S::Patch + Send + Sync + 'static,
    {
        let action = key.name();
        let erased: ErasedReducer<S> = Arc::new(move |state: &S, payload: Box<dyn Any + Send>| {
            let payload = payload
                .downcast::<P>()
                .map_err(|_| StoreError::PayloadMismatch {
                    action,
                    expected: std::any::type_name::<P>(),
                })?;
            Ok(reducer(state, *payload))
        });
        self.reducers.push((action, erased));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.reducers.iter().map(|(name, _)| *name)
    }
}

impl<S: ShallowMerge> Default for ActionSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

struct StoreInner<S: ShallowMerge> {
    state: Mutable<Arc<S>>,
    actions: RwLock<HashMap<&'static str, ErasedReducer<S>>>,
    listeners: Mutex<Vec<(u64, Listener<S>)>>,
    next_listener_id: AtomicU64,
    // Serializes read-reduce-write so concurrent dispatches never lose a patch.
    dispatch_lock: Mutex<()>,
}

pub struct Store<S: ShallowMerge> {
    inner: Arc<StoreInner<S>>,
}

impl<S: ShallowMerge> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ShallowMerge> Store<S> {
    pub fn new(initial_state: S) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutable::new(Arc::new(initial_state)),
                actions: RwLock::new(HashMap::new()),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                dispatch_lock: Mutex::new(()),
            }),
        }
    }

    /// Add a slice's actions and merge its initial state.
    ///
    /// Registering again accumulates: actions under new names are added, an
    /// action under an existing name replaces only that entry. The initial
    /// patch is shallow-merged, so a later slice claiming the same top-level
    /// key overwrites the earlier value.
    pub fn register(&self, actions: ActionSet<S>, initial_state: S::Patch) {
        {
            let mut registry = self
                .inner
                .actions
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            for (name, reducer) in actions.reducers {
                if registry.insert(name, reducer).is_some() {
                    log::debug!("action `{name}` re-registered");
                }
            }
        }

        let _guard = self
            .inner
            .dispatch_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next = S::clone(&self.inner.state.get_cloned());
        next.merge(initial_state);
        self.inner.state.set(Arc::new(next));
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.inner
            .actions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Run the reducer registered under `key` and fan the new snapshot out.
    ///
    /// # Panics
    ///
    /// When the action is not registered or was registered with a different
    /// payload type.
    #[track_caller]
    pub fn dispatch<P: Send + 'static>(&self, key: ActionKey<P>, payload: P) {
        if let Err(error) = self.try_dispatch(key, payload) {
            panic!("{error}");
        }
    }

    pub fn try_dispatch<P: Send + 'static>(
        &self,
        key: ActionKey<P>,
        payload: P,
    ) -> Result<(), StoreError> {
        let reducer = self
            .inner
            .actions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.name())
            .cloned()
            .ok_or(StoreError::UnknownAction(key.name()))?;

        {
            let _guard = self
                .inner
                .dispatch_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let current = self.inner.state.get_cloned();
            let patch = reducer(current.as_ref(), Box::new(payload))?;
            let mut next = S::clone(&current);
            next.merge(patch);
            self.inner.state.set(Arc::new(next));
        }

        log::debug!("dispatched {}", key.name());
        self.notify();
        Ok(())
    }

    // Listeners run outside every lock, so they may dispatch again. Every call
    // gets the latest snapshot, not the one this dispatch produced.
    fn notify(&self) {
        let listeners: Vec<Listener<S>> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(self.snapshot());
        }
    }

    /// Call `listener` with the new snapshot after every dispatch until the
    /// returned [`Subscription`] is dropped.
    pub fn subscribe(&self, listener: impl Fn(Arc<S>) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));

        let inner: Weak<StoreInner<S>> = Arc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner
                        .listeners
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .retain(|(listener_id, _)| *listener_id != id);
                }
            })),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn snapshot(&self) -> Arc<S> {
        self.inner.state.get_cloned()
    }

    /// Current snapshot plus a stable dispatcher, the accessor components use.
    pub fn use_store(&self) -> (Arc<S>, Dispatcher<S>) {
        (
            self.snapshot(),
            Dispatcher {
                store: self.clone(),
            },
        )
    }

    /// Snapshot signal for binding zoon elements to the whole tree.
    pub fn signal(&self) -> impl Signal<Item = Arc<S>> + use<S> {
        self.inner.state.signal_cloned()
    }
}

/// Dispatch-only handle handed out by [`Store::use_store`].
pub struct Dispatcher<S: ShallowMerge> {
    store: Store<S>,
}

impl<S: ShallowMerge> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: ShallowMerge> Dispatcher<S> {
    #[track_caller]
    pub fn dispatch<P: Send + 'static>(&self, key: ActionKey<P>, payload: P) {
        self.store.dispatch(key, payload);
    }
}

/// Listener registration; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
