use super::entity::{EntitySlice, EntityState, entity_actions, initial_patch};
use super::{FleetState, FleetStatePatch, FleetStore};
use crate::store::ActionKey;
use crate::store::merge::Sparse;
use fleet_shared::Car;

pub const ADD_CARS: ActionKey<Vec<Sparse<Car>>> = ActionKey::new("ADD_CARS");
pub const UPDATE_CAR: ActionKey<Sparse<Car>> = ActionKey::new("UPDATE_CAR");
pub const DELETE_CARS: ActionKey<Vec<String>> = ActionKey::new("DELETE_CARS");
pub const CARS_IS_LOADING: ActionKey<bool> = ActionKey::new("CARS_IS_LOADING");

/// Cars and timers keyed by `InstanceId`.
pub struct Cars;

impl EntitySlice for Cars {
    type Entity = Car;

    const ADD: ActionKey<Vec<Sparse<Car>>> = ADD_CARS;
    const UPDATE: ActionKey<Sparse<Car>> = UPDATE_CAR;
    const DELETE: ActionKey<Vec<String>> = DELETE_CARS;
    const IS_LOADING: ActionKey<bool> = CARS_IS_LOADING;

    fn slice(state: &FleetState) -> &EntityState<Car> {
        &state.cars
    }

    fn patch(slice: EntityState<Car>) -> FleetStatePatch {
        FleetStatePatch {
            cars: Some(slice),
            ..Default::default()
        }
    }
}

pub fn register(store: &FleetStore) {
    store.register(entity_actions::<Cars>(), initial_patch::<Cars>());
}

pub fn online_cars(state: &FleetState) -> impl Iterator<Item = &Car> {
    state.cars.iter().filter(|car| car.is_online())
}

pub fn cars_in_fleet<'a>(state: &'a FleetState, fleet_id: &'a str) -> impl Iterator<Item = &'a Car> {
    state
        .cars
        .iter()
        .filter(move |car| car.fleet_id.as_deref() == Some(fleet_id))
}
