use super::entity::{EntitySlice, EntityState, entity_actions, initial_patch};
use super::{FleetState, FleetStatePatch, FleetStore};
use crate::store::ActionKey;
use crate::store::merge::Sparse;
use fleet_shared::Model;

pub const ADD_MODELS: ActionKey<Vec<Sparse<Model>>> = ActionKey::new("ADD_MODELS");
pub const UPDATE_MODEL: ActionKey<Sparse<Model>> = ActionKey::new("UPDATE_MODEL");
pub const DELETE_MODELS: ActionKey<Vec<String>> = ActionKey::new("DELETE_MODELS");
pub const MODELS_IS_LOADING: ActionKey<bool> = ActionKey::new("MODELS_IS_LOADING");

pub struct Models;

impl EntitySlice for Models {
    type Entity = Model;

    const ADD: ActionKey<Vec<Sparse<Model>>> = ADD_MODELS;
    const UPDATE: ActionKey<Sparse<Model>> = UPDATE_MODEL;
    const DELETE: ActionKey<Vec<String>> = DELETE_MODELS;
    const IS_LOADING: ActionKey<bool> = MODELS_IS_LOADING;

    fn slice(state: &FleetState) -> &EntityState<Model> {
        &state.models
    }

    fn patch(slice: EntityState<Model>) -> FleetStatePatch {
        FleetStatePatch {
            models: Some(slice),
            ..Default::default()
        }
    }
}

pub fn register(store: &FleetStore) {
    store.register(entity_actions::<Models>(), initial_patch::<Models>());
}

pub fn models_owned_by<'a>(state: &'a FleetState, sub: &'a str) -> impl Iterator<Item = &'a Model> {
    state
        .models
        .iter()
        .filter(move |model| model.sub.as_deref() == Some(sub))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn model(model_id: &str, sub: &str) -> Model {
        Model {
            model_id: model_id.to_string(),
            sub: Some(sub.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn models_owned_by_filters_on_sub() {
        let store = Store::new(FleetState::default());
        register(&store);
        store.dispatch(
            ADD_MODELS,
            Sparse::all(vec![model("m-1", "user-1"), model("m-2", "user-2"), model("m-3", "user-1")]),
        );
        store.dispatch(DELETE_MODELS, vec!["m-3".to_string()]);

        let state = store.snapshot();
        let owned: Vec<_> = models_owned_by(&state, "user-1").map(|m| m.model_id.as_str()).collect();
        assert_eq!(owned, vec!["m-1"]);
        assert_eq!(models_owned_by(&state, "nobody").count(), 0);
    }
}
