use super::entity::{EntitySlice, EntityState, entity_actions, initial_patch};
use super::{FleetState, FleetStatePatch, FleetStore};
use crate::store::ActionKey;
use crate::store::merge::Sparse;
use fleet_shared::Race;

pub const ADD_RACES: ActionKey<Vec<Sparse<Race>>> = ActionKey::new("ADD_RACES");
pub const UPDATE_RACE: ActionKey<Sparse<Race>> = ActionKey::new("UPDATE_RACE");
pub const DELETE_RACES: ActionKey<Vec<String>> = ActionKey::new("DELETE_RACES");
pub const RACES_IS_LOADING: ActionKey<bool> = ActionKey::new("RACES_IS_LOADING");

pub struct Races;

impl EntitySlice for Races {
    type Entity = Race;

    const ADD: ActionKey<Vec<Sparse<Race>>> = ADD_RACES;
    const UPDATE: ActionKey<Sparse<Race>> = UPDATE_RACE;
    const DELETE: ActionKey<Vec<String>> = DELETE_RACES;
    const IS_LOADING: ActionKey<bool> = RACES_IS_LOADING;

    fn slice(state: &FleetState) -> &EntityState<Race> {
        &state.races
    }

    fn patch(slice: EntityState<Race>) -> FleetStatePatch {
        FleetStatePatch {
            races: Some(slice),
            ..Default::default()
        }
    }
}

pub fn register(store: &FleetStore) {
    store.register(entity_actions::<Races>(), initial_patch::<Races>());
}

pub fn races_for_event<'a>(state: &'a FleetState, event_id: &'a str) -> impl Iterator<Item = &'a Race> {
    state
        .races
        .iter()
        .filter(move |race| race.event_id.as_deref() == Some(event_id))
}
