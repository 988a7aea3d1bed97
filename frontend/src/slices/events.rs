use super::entity::{EntitySlice, EntityState, entity_actions, initial_patch};
use super::{FleetState, FleetStatePatch, FleetStore};
use crate::store::ActionKey;
use crate::store::merge::Sparse;
use fleet_shared::Event;

pub const ADD_EVENTS: ActionKey<Vec<Sparse<Event>>> = ActionKey::new("ADD_EVENTS");
pub const UPDATE_EVENT: ActionKey<Sparse<Event>> = ActionKey::new("UPDATE_EVENT");
pub const DELETE_EVENTS: ActionKey<Vec<String>> = ActionKey::new("DELETE_EVENTS");
pub const EVENTS_IS_LOADING: ActionKey<bool> = ActionKey::new("EVENTS_IS_LOADING");

pub struct Events;

impl EntitySlice for Events {
    type Entity = Event;

    const ADD: ActionKey<Vec<Sparse<Event>>> = ADD_EVENTS;
    const UPDATE: ActionKey<Sparse<Event>> = UPDATE_EVENT;
    const DELETE: ActionKey<Vec<String>> = DELETE_EVENTS;
    const IS_LOADING: ActionKey<bool> = EVENTS_IS_LOADING;

    fn slice(state: &FleetState) -> &EntityState<Event> {
        &state.events
    }

    fn patch(slice: EntityState<Event>) -> FleetStatePatch {
        FleetStatePatch {
            events: Some(slice),
            ..Default::default()
        }
    }
}

pub fn register(store: &FleetStore) {
    store.register(entity_actions::<Events>(), initial_patch::<Events>());
}

/// Rolling-average window configured for an event, if any.
pub fn average_laps_window(state: &FleetState, event_id: &str) -> Option<usize> {
    state
        .events
        .get(event_id)
        .and_then(|event| event.race_config.as_ref())
        .and_then(|config| config.average_laps_window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use fleet_shared::RaceConfig;

    #[test]
    fn race_config_patch_merges_nested_fields() {
        let store = Store::new(FleetState::default());
        register(&store);
        store.dispatch(
            ADD_EVENTS,
            Sparse::all(vec![Event {
                event_id: "e-1".to_string(),
                event_name: Some("Summit".to_string()),
                race_config: Some(RaceConfig {
                    race_time_in_min: Some(3),
                    average_laps_window: Some(3),
                    ..Default::default()
                }),
                ..Default::default()
            }]),
        );
        store.dispatch(
            UPDATE_EVENT,
            Event {
                event_id: "e-1".to_string(),
                race_config: Some(RaceConfig {
                    race_time_in_min: Some(4),
                    ..Default::default()
                }),
                ..Default::default()
            }
            .into(),
        );

        let state = store.snapshot();
        let config = state.events.get("e-1").unwrap().race_config.clone().unwrap();
        assert_eq!(config.race_time_in_min, Some(4));
        assert_eq!(average_laps_window(&state, "e-1"), Some(3));
    }
}
