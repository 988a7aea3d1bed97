use super::entity::{EntitySlice, EntityState, entity_actions, initial_patch};
use super::{FleetState, FleetStatePatch, FleetStore};
use crate::store::ActionKey;
use crate::store::merge::Sparse;
use fleet_shared::Asset;

pub const ADD_ASSETS: ActionKey<Vec<Sparse<Asset>>> = ActionKey::new("ADD_ASSETS");
pub const UPDATE_ASSET: ActionKey<Sparse<Asset>> = ActionKey::new("UPDATE_ASSET");
pub const DELETE_ASSETS: ActionKey<Vec<String>> = ActionKey::new("DELETE_ASSETS");
pub const ASSETS_IS_LOADING: ActionKey<bool> = ActionKey::new("ASSETS_IS_LOADING");

/// Model uploads to cars, keyed by `assetId`.
pub struct Assets;

impl EntitySlice for Assets {
    type Entity = Asset;

    const ADD: ActionKey<Vec<Sparse<Asset>>> = ADD_ASSETS;
    const UPDATE: ActionKey<Sparse<Asset>> = UPDATE_ASSET;
    const DELETE: ActionKey<Vec<String>> = DELETE_ASSETS;
    const IS_LOADING: ActionKey<bool> = ASSETS_IS_LOADING;

    fn slice(state: &FleetState) -> &EntityState<Asset> {
        &state.assets
    }

    fn patch(slice: EntityState<Asset>) -> FleetStatePatch {
        FleetStatePatch {
            assets: Some(slice),
            ..Default::default()
        }
    }
}

pub fn register(store: &FleetStore) {
    store.register(entity_actions::<Assets>(), initial_patch::<Assets>());
}

pub fn uploads_to_car<'a>(state: &'a FleetState, instance_id: &'a str) -> impl Iterator<Item = &'a Asset> {
    state
        .assets
        .iter()
        .filter(move |asset| asset.car_instance_id.as_deref() == Some(instance_id))
}
