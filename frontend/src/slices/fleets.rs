use super::entity::{EntitySlice, EntityState, entity_actions, initial_patch};
use super::{FleetState, FleetStatePatch, FleetStore};
use crate::store::ActionKey;
use crate::store::merge::Sparse;
use fleet_shared::Fleet;

pub const ADD_FLEETS: ActionKey<Vec<Sparse<Fleet>>> = ActionKey::new("ADD_FLEETS");
pub const UPDATE_FLEET: ActionKey<Sparse<Fleet>> = ActionKey::new("UPDATE_FLEET");
pub const DELETE_FLEETS: ActionKey<Vec<String>> = ActionKey::new("DELETE_FLEETS");
pub const FLEETS_IS_LOADING: ActionKey<bool> = ActionKey::new("FLEETS_IS_LOADING");

pub struct Fleets;

impl EntitySlice for Fleets {
    type Entity = Fleet;

    const ADD: ActionKey<Vec<Sparse<Fleet>>> = ADD_FLEETS;
    const UPDATE: ActionKey<Sparse<Fleet>> = UPDATE_FLEET;
    const DELETE: ActionKey<Vec<String>> = DELETE_FLEETS;
    const IS_LOADING: ActionKey<bool> = FLEETS_IS_LOADING;

    fn slice(state: &FleetState) -> &EntityState<Fleet> {
        &state.fleets
    }

    fn patch(slice: EntityState<Fleet>) -> FleetStatePatch {
        FleetStatePatch {
            fleets: Some(slice),
            ..Default::default()
        }
    }
}

pub fn register(store: &FleetStore) {
    store.register(entity_actions::<Fleets>(), initial_patch::<Fleets>());
}

/// Fleet whose `carIds` lists the given instance.
pub fn fleet_of_car<'a>(state: &'a FleetState, instance_id: &str) -> Option<&'a Fleet> {
    state.fleets.iter().find(|fleet| {
        fleet
            .car_ids
            .as_ref()
            .is_some_and(|ids| ids.iter().any(|id| id == instance_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn fleet_of_car_follows_car_ids_updates() {
        let store = Store::new(FleetState::default());
        register(&store);
        store.dispatch(
            ADD_FLEETS,
            Sparse::all(vec![
                Fleet {
                    fleet_id: "f-1".to_string(),
                    car_ids: Some(vec!["i-1".to_string()]),
                    ..Default::default()
                },
                Fleet {
                    fleet_id: "f-2".to_string(),
                    ..Default::default()
                },
            ]),
        );
        let state = store.snapshot();
        assert_eq!(fleet_of_car(&state, "i-1").map(|f| f.fleet_id.as_str()), Some("f-1"));
        assert!(fleet_of_car(&state, "i-9").is_none());

        store.dispatch(
            UPDATE_FLEET,
            Sparse::from_value(serde_json::json!({ "fleetId": "f-1", "carIds": [] })).unwrap(),
        );
        store.dispatch(
            UPDATE_FLEET,
            Fleet {
                fleet_id: "f-2".to_string(),
                car_ids: Some(vec!["i-1".to_string()]),
                ..Default::default()
            }
            .into(),
        );
        let state = store.snapshot();
        assert_eq!(fleet_of_car(&state, "i-1").map(|f| f.fleet_id.as_str()), Some("f-2"));
    }
}
