//! Field-by-field reconciliation of sparse entity patches.
//!
//! Pushed records carry only the fields that changed. Present fields replace
//! (or, for nested objects, merge into) the stored ones, `null` clears them
//! and absent fields are kept.

use fleet_shared::Entity;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Merge `incoming` into `target`.
///
/// Object fields recurse when both sides are objects. Scalars, arrays and
/// object-versus-scalar pairs are replaced wholesale. Fields missing from
/// `incoming` are kept.
pub fn deep_merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (field, value) in incoming {
                match existing.get_mut(&field) {
                    Some(slot @ Value::Object(_)) if value.is_object() => deep_merge(slot, value),
                    Some(slot) => *slot = value,
                    None => {
                        existing.insert(field, value);
                    }
                }
            }
        }
        (target, incoming) => *target = incoming,
    }
}

/// Entity as it arrived on the wire.
///
/// Keeps the decoded entity together with the fields that were actually
/// sent, so an explicit `null` clears a field while an absent one leaves it
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Sparse<E> {
    entity: E,
    fields: Value,
}

impl<E: Entity> Sparse<E> {
    pub fn from_value(fields: Value) -> Result<Self, serde_json::Error> {
        let entity = E::deserialize(&fields)?;
        Ok(Self { entity, fields })
    }

    /// Wrap fully-known entities; their `None` fields count as absent.
    pub fn all(entities: impl IntoIterator<Item = E>) -> Vec<Self> {
        entities.into_iter().map(Self::from).collect()
    }

    pub fn key(&self) -> &str {
        self.entity.key()
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn into_entity(self) -> E {
        self.entity
    }
}

impl<E: Entity> From<E> for Sparse<E> {
    fn from(entity: E) -> Self {
        let fields = serde_json::to_value(&entity).unwrap_or(Value::Null);
        Self { entity, fields }
    }
}

impl<'de, E: Entity> Deserialize<'de> for Sparse<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Value::deserialize(deserializer)?;
        Self::from_value(fields).map_err(D::Error::custom)
    }
}

/// Merge a sparse patch into a known entity of the same key.
pub fn merge_entity<E: Entity>(existing: &E, incoming: Sparse<E>) -> E {
    let (Ok(mut merged), Value::Object(_)) = (serde_json::to_value(existing), &incoming.fields)
    else {
        return incoming.entity;
    };
    deep_merge(&mut merged, incoming.fields);
    match serde_json::from_value(merged) {
        Ok(entity) => entity,
        Err(error) => {
            log::warn!(
                "merge of {}={} produced an undecodable record, keeping the patch: {error}",
                E::KEY_FIELD,
                incoming.entity.key()
            );
            incoming.entity
        }
    }
}
