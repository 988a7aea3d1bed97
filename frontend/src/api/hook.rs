//! Initial-load and live-subscription bridge for one entity slice
//!
//! A [`SyncHook`] moves through `Idle → InitialLoadInProgress → Live`, or to
//! `Error` once a load or subscription failure has been surfaced. Failures
//! become notification entries; nothing is retried.

use super::{ApiError, GraphqlClient, Page};
use crate::slices::notifications::report_errors;
use crate::slices::{EntitySlice, FleetStore};
use crate::store::Sparse;
use futures::future::{AbortHandle, BoxFuture, FutureExt, abortable};
use futures::StreamExt;
use serde_json::{Map, Value, json};
use std::marker::PhantomData;
use zoon::{Mutable, Signal, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookPhase {
    #[default]
    Idle,
    InitialLoadInProgress,
    Live,
    Error,
}

/// What the signed-in user may see through a hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessScope {
    /// The hook never leaves `Idle`.
    Denied,
    /// Only records owned by `owner`, via the api's owner filter field.
    Own { owner: String },
    All,
}

impl AccessScope {
    pub fn has_access(&self) -> bool {
        !matches!(self, AccessScope::Denied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// Each event carries one created or updated entity.
    Upsert,
    /// Each event carries one deleted entity; only its key is used.
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionSpec {
    pub operation: &'static str,
    pub topic: Topic,
}

/// Operations backing one slice.
pub struct EntityApi<L: EntitySlice> {
    /// Prefix of synthetic error notification ids, e.g. `carsApi`.
    pub api_name: &'static str,
    pub error_header: &'static str,
    pub list_query: &'static str,
    pub subscriptions: &'static [SubscriptionSpec],
    pub owner_field: Option<&'static str>,
    pub slice: PhantomData<fn() -> L>,
}

impl<L: EntitySlice> Clone for EntityApi<L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: EntitySlice> Copy for EntityApi<L> {}

pub struct SyncHook<C: GraphqlClient, L: EntitySlice> {
    client: C,
    store: FleetStore,
    api: EntityApi<L>,
    access: AccessScope,
    page_limit: u32,
    filters: Map<String, Value>,
    phase: Mutable<HookPhase>,
}

impl<C: GraphqlClient, L: EntitySlice> Clone for SyncHook<C, L> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            store: self.store.clone(),
            api: self.api,
            access: self.access.clone(),
            page_limit: self.page_limit,
            filters: self.filters.clone(),
            phase: self.phase.clone(),
        }
    }
}

impl<C: GraphqlClient, L: EntitySlice> SyncHook<C, L> {
    pub fn new(
        client: C,
        store: FleetStore,
        api: EntityApi<L>,
        access: AccessScope,
        page_limit: u32,
    ) -> Self {
        Self {
            client,
            store,
            api,
            access,
            page_limit,
            filters: Map::new(),
            phase: Mutable::new(HookPhase::Idle),
        }
    }

    /// Extra variable sent with the list query and every subscription,
    /// e.g. `eventId` for races.
    pub fn with_filter(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.insert(field.to_owned(), value.into());
        self
    }

    pub fn phase(&self) -> HookPhase {
        self.phase.get()
    }

    pub fn phase_signal(&self) -> impl Signal<Item = HookPhase> + use<C, L> {
        self.phase.signal()
    }

    fn scope_variables(&self) -> Map<String, Value> {
        let mut variables = self.filters.clone();
        if let (AccessScope::Own { owner }, Some(field)) = (&self.access, self.api.owner_field) {
            variables.insert(field.to_owned(), json!(owner));
        }
        variables
    }

    fn query_variables(&self, next_token: Option<&str>) -> Value {
        let mut variables = self.scope_variables();
        variables.insert("limit".to_owned(), json!(self.page_limit));
        if let Some(token) = next_token {
            variables.insert("nextToken".to_owned(), json!(token));
        }
        Value::Object(variables)
    }

    async fn fetch_page(
        &self,
        next_token: Option<&str>,
    ) -> Result<Page<Sparse<L::Entity>>, ApiError> {
        let operation = self.api.list_query;
        let response = self
            .client
            .query(operation, self.query_variables(next_token))
            .await?;
        serde_json::from_value(response).map_err(|source| ApiError::Decode { operation, source })
    }

    fn fail(&self, messages: &[String]) {
        report_errors(&self.store, self.api.api_name, self.api.error_header, messages);
        self.phase.set(HookPhase::Error);
    }

    /// Page through the list query until no continuation token is returned.
    ///
    /// Every page is dispatched as soon as it arrives; the first one clears
    /// the slice's loading flag while the rest keep streaming in.
    pub async fn initial_load(&self) {
        if !self.access.has_access() {
            return;
        }
        self.phase.set(HookPhase::InitialLoadInProgress);
        self.store.dispatch(L::IS_LOADING, true);

        let mut next_token: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let page = match self.fetch_page(next_token.as_deref()).await {
                Ok(page) => page,
                Err(error) => {
                    self.store.dispatch(L::IS_LOADING, false);
                    self.fail(&error.messages());
                    return;
                }
            };
            pages += 1;
            next_token = page.continuation().map(str::to_owned);
            log::debug!(
                "{} page {pages}: {} item(s)",
                self.api.list_query,
                page.items.len()
            );
            self.store.dispatch(L::ADD, page.items);
            if next_token.is_none() {
                break;
            }
        }

        log::info!("{} initial load finished after {pages} page(s)", self.api.api_name);
        let mut phase = self.phase.lock_mut();
        if *phase == HookPhase::InitialLoadInProgress {
            *phase = HookPhase::Live;
        }
    }

    /// Apply events from one subscription until it ends or reports an error.
    pub async fn follow(&self, subscription: SubscriptionSpec) {
        if !self.access.has_access() {
            return;
        }
        let mut events = self
            .client
            .subscribe(subscription.operation, Value::Object(self.scope_variables()));

        while let Some(event) = events.next().await {
            match event {
                Ok(payload) => self.apply(subscription, payload),
                Err(errors) => {
                    let messages: Vec<String> =
                        errors.into_iter().map(|error| error.message).collect();
                    self.fail(&messages);
                    return;
                }
            }
        }
        log::info!("{} closed", subscription.operation);
    }

    fn apply(&self, subscription: SubscriptionSpec, payload: Value) {
        let entity = match Sparse::<L::Entity>::from_value(payload) {
            Ok(entity) => entity,
            Err(error) => {
                log::warn!("dropping undecodable {} event: {error}", subscription.operation);
                return;
            }
        };
        match subscription.topic {
            Topic::Upsert => self.store.dispatch(L::UPDATE, entity),
            Topic::Delete => self.store.dispatch(L::DELETE, vec![entity.key().to_owned()]),
        }
    }

    /// Start the initial load and every subscription on `spawn`.
    ///
    /// The load runs to completion even if the returned handle is dropped;
    /// subscriptions end when it is.
    pub fn mount_with(&self, spawn: impl Fn(BoxFuture<'static, ()>)) -> MountedHook {
        if !self.access.has_access() {
            log::debug!("{} not mounted: access denied", self.api.api_name);
            return MountedHook::default();
        }

        let loader = self.clone();
        spawn(async move { loader.initial_load().await }.boxed());

        let mut subscriptions = Vec::with_capacity(self.api.subscriptions.len());
        for &subscription in self.api.subscriptions {
            let follower = self.clone();
            let (follow, handle) = abortable(async move { follower.follow(subscription).await });
            subscriptions.push(handle);
            spawn(
                async move {
                    let _ = follow.await;
                }
                .boxed(),
            );
        }
        MountedHook { subscriptions }
    }

    pub fn mount(&self) -> MountedHook {
        self.mount_with(|future| Task::start(future))
    }
}

/// Live subscriptions of a mounted hook; dropping it unsubscribes them all.
#[derive(Debug, Default)]
#[must_use = "dropping a MountedHook unsubscribes immediately"]
pub struct MountedHook {
    subscriptions: Vec<AbortHandle>,
}

impl MountedHook {
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl Drop for MountedHook {
    fn drop(&mut self) {
        for subscription in &self.subscriptions {
            subscription.abort();
        }
    }
}
