//! Generic merge-or-insert slice shared by every entity domain.

use super::{FleetState, FleetStatePatch};
use crate::store::merge::{Sparse, merge_entity};
use crate::store::{ActionKey, ActionSet};
use fleet_shared::Entity;
use indexmap::IndexMap;

/// Items keyed by their entity key plus the initial-load flag.
///
/// The map makes duplicate keys impossible and keeps the relative order of
/// surviving items across inserts and removals.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<E: Entity> {
    pub items: IndexMap<String, E>,
    pub is_loading: bool,
}

impl<E: Entity> Default for EntityState<E> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
            is_loading: false,
        }
    }
}

impl<E: Entity> EntityState<E> {
    /// Merge into the entity with the same key, or append as a full record.
    pub fn upsert(&mut self, incoming: impl Into<Sparse<E>>) {
        let incoming = incoming.into();
        match self.items.get_mut(incoming.key()) {
            Some(existing) => *existing = merge_entity(existing, incoming),
            None => {
                let entity = incoming.into_entity();
                self.items.insert(entity.key().to_owned(), entity);
            }
        }
    }

    /// Remove by key; keys that are not present are ignored.
    pub fn remove<K: AsRef<str>>(&mut self, keys: impl IntoIterator<Item = K>) {
        for key in keys {
            self.items.shift_remove(key.as_ref());
        }
    }

    pub fn get(&self, key: &str) -> Option<&E> {
        self.items.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One entity-bearing subtree of [`FleetState`] and its four actions.
pub trait EntitySlice: Send + Sync + 'static {
    type Entity: Entity;

    /// `ADD_<ENTITY>S`: merge-or-insert a page of items, clears `is_loading`.
    const ADD: ActionKey<Vec<Sparse<Self::Entity>>>;
    /// `UPDATE_<ENTITY>`: merge-or-insert one pushed item.
    const UPDATE: ActionKey<Sparse<Self::Entity>>;
    /// `DELETE_<ENTITY>S`: remove by key.
    const DELETE: ActionKey<Vec<String>>;
    const IS_LOADING: ActionKey<bool>;

    fn slice(state: &FleetState) -> &EntityState<Self::Entity>;

    fn patch(slice: EntityState<Self::Entity>) -> FleetStatePatch;
}

pub fn entity_actions<L: EntitySlice>() -> ActionSet<FleetState> {
    ActionSet::new()
        .on(L::ADD, |state: &FleetState, items: Vec<Sparse<L::Entity>>| {
            let mut slice = L::slice(state).clone();
            for item in items {
                slice.upsert(item);
            }
            slice.is_loading = false;
            L::patch(slice)
        })
        .on(L::UPDATE, |state: &FleetState, item: Sparse<L::Entity>| {
            let mut slice = L::slice(state).clone();
            slice.upsert(item);
            L::patch(slice)
        })
        .on(L::DELETE, |state: &FleetState, keys: Vec<String>| {
            let mut slice = L::slice(state).clone();
            slice.remove(keys);
            L::patch(slice)
        })
        .on(L::IS_LOADING, |state: &FleetState, is_loading: bool| {
            let mut slice = L::slice(state).clone();
            slice.is_loading = is_loading;
            L::patch(slice)
        })
}

pub fn initial_patch<L: EntitySlice>() -> FleetStatePatch {
    L::patch(EntityState::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_shared::Fleet;

    fn fleet(id: &str, name: Option<&str>) -> Fleet {
        Fleet {
            fleet_id: id.to_string(),
            fleet_name: name.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn upsert_appends_unknown_and_merges_known() {
        let mut state: EntityState<Fleet> = EntityState::default();
        state.upsert(fleet("a", Some("Alpha")));
        state.upsert(fleet("b", Some("Beta")));
        state.upsert(Fleet {
            car_ids: Some(vec!["i-1".to_string()]),
            ..fleet("a", None)
        });

        let keys: Vec<_> = state.items.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        let alpha = state.get("a").unwrap();
        assert_eq!(alpha.fleet_name.as_deref(), Some("Alpha"));
        assert_eq!(alpha.car_ids.as_deref(), Some(&["i-1".to_string()][..]));
    }

    #[test]
    fn remove_keeps_relative_order_and_ignores_absent_keys() {
        let mut state: EntityState<Fleet> = EntityState::default();
        for id in ["a", "b", "c"] {
            state.upsert(fleet(id, None));
        }
        state.remove(["b", "zzz"]);
        let keys: Vec<_> = state.iter().map(|f| f.fleet_id.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
