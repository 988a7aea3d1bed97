//! FleetApp - composition root wiring config, store, sync hooks and clock

use crate::api::domains::{ASSETS_API, CARS_API, EVENTS_API, FLEETS_API, MODELS_API, RACES_API};
use crate::api::hook::{AccessScope, EntityApi, MountedHook, SyncHook};
use crate::api::mutations::MutationRunner;
use crate::api::GraphqlClient;
use crate::logging;
use crate::race_clock::{RaceClock, RaceProps};
use crate::slices::{EntitySlice, FleetState, FleetStore, register_all};
use crate::store::Store;
use fleet_shared::{ConfigError, FleetConfig};
use futures::future::BoxFuture;
use log::LevelFilter;
use zoon::Task;

pub struct FleetApp {
    /// Process-wide store; clones share the same state.
    pub store: FleetStore,

    pub config: FleetConfig,
}

impl FleetApp {
    /// Install console logging, then build the app from `config`.
    pub fn bootstrap(config: FleetConfig) -> Result<Self, ConfigError> {
        logging::init(LevelFilter::Info);
        let app = Self::new(config)?;
        log::info!("fleet app v{} started", app.config.app.version);
        Ok(app)
    }

    /// Validate `config`, create the store and register every slice.
    pub fn new(config: FleetConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = Store::new(FleetState::default());
        register_all(&store);
        Ok(Self { store, config })
    }

    fn hook<C: GraphqlClient, L: EntitySlice>(
        &self,
        client: &C,
        api: EntityApi<L>,
        access: &AccessScope,
    ) -> SyncHook<C, L> {
        SyncHook::new(
            client.clone(),
            self.store.clone(),
            api,
            access.clone(),
            self.config.api.page_limit,
        )
    }

    /// Mount every domain hook on `spawn`; dropping the handles unsubscribes.
    pub fn mount_sync_with<C: GraphqlClient>(
        &self,
        client: C,
        access: &AccessScope,
        spawn: impl Fn(BoxFuture<'static, ()>),
    ) -> Vec<MountedHook> {
        vec![
            self.hook(&client, CARS_API, access).mount_with(&spawn),
            self.hook(&client, FLEETS_API, access).mount_with(&spawn),
            self.hook(&client, MODELS_API, access).mount_with(&spawn),
            self.hook(&client, ASSETS_API, access).mount_with(&spawn),
            self.hook(&client, RACES_API, access).mount_with(&spawn),
            self.hook(&client, EVENTS_API, access).mount_with(&spawn),
        ]
    }

    pub fn mount_sync<C: GraphqlClient>(&self, client: C, access: &AccessScope) -> Vec<MountedHook> {
        self.mount_sync_with(client, access, |future| Task::start(future))
    }

    pub fn mutations<C: GraphqlClient>(&self, client: C) -> MutationRunner<C> {
        MutationRunner::new(
            client,
            self.store.clone(),
            self.config.notifications.auto_dismiss_ms,
        )
    }

    pub fn race_clock(&self, props: RaceProps) -> RaceClock {
        RaceClock::start(props, self.config.race_clock.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{MockClient, eventually, spawn_on_tokio};
    use crate::slices::{cars, notifications};
    use fleet_shared::Car;
    use serde_json::json;

    #[test]
    fn new_registers_every_action() {
        let app = FleetApp::new(FleetConfig::default()).unwrap();
        assert!(app.store.is_registered(cars::ADD_CARS.name()));
        assert!(app.store.is_registered(notifications::DISMISS_NOTIFICATION.name()));
        assert!(app.store.snapshot().side_nav.is_open);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = FleetConfig::default();
        config.race_clock.tick_interval_ms = 0;
        assert!(matches!(
            FleetApp::new(config),
            Err(ConfigError::ZeroTickInterval)
        ));
    }

    #[tokio::test]
    async fn mount_sync_loads_every_domain_and_follows_updates() {
        let app = FleetApp::new(FleetConfig::default()).unwrap();
        let client = MockClient::default();
        client.push_page(
            "listCars",
            Ok(json!({ "items": [{ "InstanceId": "i-1", "ComputerName": "deepracer-1" }] })),
        );

        let hooks = app.mount_sync_with(client.clone(), &AccessScope::All, spawn_on_tokio);
        assert_eq!(hooks.len(), 6);
        let total: usize = hooks.iter().map(MountedHook::subscription_count).sum();
        eventually("every list query", || client.queries().len() == 6).await;
        eventually("every subscription", || client.open_subscriptions() == total).await;
        eventually("first car page", || app.store.snapshot().cars.len() == 1).await;

        let mut queried: Vec<_> = client.queries().into_iter().map(|(op, _)| op).collect();
        queried.sort_unstable();
        assert_eq!(
            queried,
            vec!["getAllFleets", "getAllModels", "getEvents", "getRaces", "listCars", "listUploadsToCar"]
        );
        assert_eq!(total, 17);

        client.emit(
            "onUpdatedCar",
            Ok(json!({ "InstanceId": "i-1", "PingStatus": "Online" })),
        );
        eventually("pushed status", || {
            app.store.snapshot().cars.get("i-1").is_some_and(Car::is_online)
        })
        .await;

        let state = app.store.snapshot();
        let car: &Car = state.cars.get("i-1").unwrap();
        assert_eq!(car.computer_name.as_deref(), Some("deepracer-1"));
        assert!(car.is_online());
        assert!(!state.cars.is_loading);
    }

    #[tokio::test]
    async fn denied_access_mounts_nothing() {
        let app = FleetApp::new(FleetConfig::default()).unwrap();
        let client = MockClient::default();

        let hooks = app.mount_sync_with(client.clone(), &AccessScope::Denied, |_| {
            panic!("nothing is spawned without access")
        });

        assert!(hooks.iter().all(|hook| hook.subscription_count() == 0));
        assert!(client.queries().is_empty());
        assert_eq!(client.open_subscriptions(), 0);
    }
}
