//! Domain slices of the global state tree
//!
//! Each slice owns one top-level key of [`FleetState`] and is mutated only
//! through the actions it registers. [`register_all`] is the single ordered
//! bootstrap step that wires every slice into a store before any consumer
//! dispatches.

use crate::store::{ShallowMerge, Store};
use fleet_shared::{Asset, Car, Event, Fleet, Model, Notification, Race};

pub mod assets;
pub mod cars;
pub mod entity;
pub mod events;
pub mod fleets;
pub mod models;
pub mod notifications;
pub mod panels;
pub mod races;

pub use entity::{EntitySlice, EntityState};
pub use panels::{HelpPanelState, SideNavState, SplitPanelState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetState {
    pub cars: EntityState<Car>,
    pub fleets: EntityState<Fleet>,
    pub models: EntityState<Model>,
    pub races: EntityState<Race>,
    pub assets: EntityState<Asset>,
    pub events: EntityState<Event>,
    pub notifications: EntityState<Notification>,
    pub side_nav: SideNavState,
    pub help_panel: HelpPanelState,
    pub split_panel: SplitPanelState,
}

/// Partial [`FleetState`]; present keys replace the whole subtree.
#[derive(Debug, Clone, Default)]
pub struct FleetStatePatch {
    pub cars: Option<EntityState<Car>>,
    pub fleets: Option<EntityState<Fleet>>,
    pub models: Option<EntityState<Model>>,
    pub races: Option<EntityState<Race>>,
    pub assets: Option<EntityState<Asset>>,
    pub events: Option<EntityState<Event>>,
    pub notifications: Option<EntityState<Notification>>,
    pub side_nav: Option<SideNavState>,
    pub help_panel: Option<HelpPanelState>,
    pub split_panel: Option<SplitPanelState>,
}

impl ShallowMerge for FleetState {
    type Patch = FleetStatePatch;

    fn merge(&mut self, patch: FleetStatePatch) {
        let FleetStatePatch {
            cars,
            fleets,
            models,
            races,
            assets,
            events,
            notifications,
            side_nav,
            help_panel,
            split_panel,
        } = patch;

        fn replace<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        replace(&mut self.cars, cars);
        replace(&mut self.fleets, fleets);
        replace(&mut self.models, models);
        replace(&mut self.races, races);
        replace(&mut self.assets, assets);
        replace(&mut self.events, events);
        replace(&mut self.notifications, notifications);
        replace(&mut self.side_nav, side_nav);
        replace(&mut self.help_panel, help_panel);
        replace(&mut self.split_panel, split_panel);
    }
}

pub type FleetStore = Store<FleetState>;

/// Register every slice, in a fixed order, with its initial state.
pub fn register_all(store: &FleetStore) {
    cars::register(store);
    fleets::register(store);
    models::register(store);
    races::register(store);
    assets::register(store);
    events::register(store);
    notifications::register(store);
    panels::register(store);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Sparse;
    use crate::slices::cars::{ADD_CARS, DELETE_CARS, UPDATE_CAR};
    use crate::slices::fleets::{ADD_FLEETS, UPDATE_FLEET};
    use std::collections::HashSet;

    fn store() -> FleetStore {
        let store = Store::new(FleetState::default());
        register_all(&store);
        store
    }

    fn car(id: &str) -> Car {
        Car::new(id)
    }

    #[test]
    fn sparse_updates_reconcile_into_one_record() {
        let store = store();
        store.dispatch(
            ADD_CARS,
            Sparse::all(vec![Car {
                ping_status: Some("Online".to_string()),
                ..car("i-1")
            }]),
        );
        store.dispatch(
            UPDATE_CAR,
            Car {
                ping_status: Some("Offline".to_string()),
                ..car("i-1")
            }
            .into(),
        );
        store.dispatch(
            UPDATE_CAR,
            Car {
                ip_address: Some("10.0.0.5".to_string()),
                ..car("i-1")
            }
            .into(),
        );

        let state = store.snapshot();
        assert_eq!(state.cars.len(), 1);
        assert_eq!(
            state.cars.get("i-1"),
            Some(&Car {
                ping_status: Some("Offline".to_string()),
                ip_address: Some("10.0.0.5".to_string()),
                ..car("i-1")
            })
        );
    }

    #[test]
    fn update_is_idempotent() {
        let store = store();
        store.dispatch(
            ADD_CARS,
            Sparse::all(vec![Car {
                computer_name: Some("car-01".to_string()),
                ..car("i-1")
            }]),
        );
        let patch = Car {
            ping_status: Some("Online".to_string()),
            ..car("i-1")
        };

        store.dispatch(UPDATE_CAR, patch.clone().into());
        let once = store.snapshot().cars.clone();
        store.dispatch(UPDATE_CAR, patch.into());
        assert_eq!(store.snapshot().cars, once);
    }

    #[test]
    fn update_for_unknown_key_inserts_full_record() {
        let store = store();
        let pushed = Car {
            ping_status: Some("Online".to_string()),
            fleet_name: Some("Default".to_string()),
            ..car("i-7")
        };
        store.dispatch(UPDATE_CAR, pushed.clone().into());
        assert_eq!(store.snapshot().cars.get("i-7"), Some(&pushed));
    }

    #[test]
    fn delete_is_idempotent() {
        let store = store();
        store.dispatch(ADD_CARS, Sparse::all(vec![car("i-1"), car("i-2")]));
        store.dispatch(DELETE_CARS, vec!["i-1".to_string()]);
        let after_first = store.snapshot().cars.clone();
        store.dispatch(DELETE_CARS, vec!["i-1".to_string(), "missing".to_string()]);

        assert_eq!(store.snapshot().cars, after_first);
        assert_eq!(after_first.len(), 1);
    }

    #[test]
    fn keys_stay_unique_across_mixed_actions() {
        let store = store();
        let ids = ["a", "b", "c", "a", "b", "d", "a"];
        for (step, id) in ids.iter().enumerate() {
            match step % 3 {
                0 => store.dispatch(ADD_CARS, Sparse::all(vec![car(id), car(id)])),
                1 => store.dispatch(UPDATE_CAR, car(id).into()),
                _ => store.dispatch(DELETE_CARS, vec![id.to_string()]),
            }
            store.dispatch(ADD_FLEETS, Sparse::all(vec![Fleet {
                fleet_id: id.to_string(),
                ..Default::default()
            }]));
            store.dispatch(UPDATE_FLEET, Fleet {
                fleet_id: id.to_string(),
                ..Default::default()
            }
            .into());
        }

        let state = store.snapshot();
        let car_keys: HashSet<_> = state.cars.iter().map(|c| c.instance_id.clone()).collect();
        assert_eq!(car_keys.len(), state.cars.len());
        let fleet_keys: HashSet<_> = state.fleets.iter().map(|f| f.fleet_id.clone()).collect();
        assert_eq!(fleet_keys.len(), state.fleets.len());
    }

    #[test]
    fn add_clears_loading_but_update_does_not() {
        let store = store();
        store.dispatch(cars::CARS_IS_LOADING, true);
        store.dispatch(UPDATE_CAR, car("i-1").into());
        assert!(store.snapshot().cars.is_loading);

        store.dispatch(ADD_CARS, Sparse::all(vec![car("i-2")]));
        assert!(!store.snapshot().cars.is_loading);
    }

    #[test]
    fn slices_do_not_touch_each_other() {
        let store = store();
        store.dispatch(ADD_CARS, Sparse::all(vec![car("i-1")]));
        store.dispatch(panels::SIDE_NAV_IS_OPEN, false);

        let state = store.snapshot();
        assert!(state.fleets.is_empty());
        assert_eq!(state.cars.len(), 1);
        assert!(!state.side_nav.is_open);
    }
}
