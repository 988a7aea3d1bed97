//! Dismissible, id-keyed notifications shown by the banner.

use super::entity::EntityState;
use super::{FleetState, FleetStatePatch, FleetStore};
use crate::store::{ActionKey, ActionSet};
use fleet_shared::Notification;

/// Merge-or-insert by `id`, so a start/success/error triplet sharing one id
/// occupies a single banner entry.
pub const ADD_NOTIFICATION: ActionKey<Notification> = ActionKey::new("ADD_NOTIFICATION");
/// Remove exactly the entry with this id.
pub const DISMISS_NOTIFICATION: ActionKey<String> = ActionKey::new("DISMISS_NOTIFICATION");

fn patch(notifications: EntityState<Notification>) -> FleetStatePatch {
    FleetStatePatch {
        notifications: Some(notifications),
        ..Default::default()
    }
}

pub fn register(store: &FleetStore) {
    let actions = ActionSet::new()
        .on(ADD_NOTIFICATION, |state: &FleetState, notification: Notification| {
            let mut notifications = state.notifications.clone();
            notifications.upsert(notification);
            patch(notifications)
        })
        .on(DISMISS_NOTIFICATION, |state: &FleetState, id: String| {
            let mut notifications = state.notifications.clone();
            notifications.remove([id]);
            patch(notifications)
        });
    store.register(actions, patch(EntityState::default()));
}

/// Synthetic id for the `index`-th error surfaced by one API.
pub fn error_id(api_name: &str, index: usize) -> String {
    format!("{api_name}Error{index}")
}

/// Surface each message as its own error entry tagged `<api_name>Error<index>`.
pub fn report_errors(store: &FleetStore, api_name: &str, header: &str, messages: &[String]) {
    for (index, message) in messages.iter().enumerate() {
        log::error!("{api_name}: {message}");
        store.dispatch(
            ADD_NOTIFICATION,
            Notification::error(error_id(api_name, index), header, message.as_str()),
        );
    }
}
