//! Fire-and-forget commands
//!
//! A mutation only starts an operation on the backend. The runner shows an
//! in-progress notification, replaces it with a success entry under the same
//! id when the call returns, or swaps it for one error entry per server error.

use super::GraphqlClient;
use crate::slices::FleetStore;
use crate::slices::notifications::{ADD_NOTIFICATION, DISMISS_NOTIFICATION, report_errors};
use fleet_shared::Notification;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub struct MutationRequest {
    pub operation: &'static str,
    pub variables: Value,
    /// Shared by the start/success entries; error entries derive from it.
    pub notification_id: String,
    pub started: String,
    pub succeeded: String,
    pub failed: String,
}

impl MutationRequest {
    pub fn new(operation: &'static str, target: &str, variables: Value) -> Self {
        Self {
            operation,
            variables,
            notification_id: format!("{operation}-{target}"),
            started: format!("{operation} started for {target}"),
            succeeded: format!("{operation} succeeded for {target}"),
            failed: format!("{operation} failed for {target}"),
        }
    }
}

#[derive(Clone)]
pub struct MutationRunner<C: GraphqlClient> {
    client: C,
    store: FleetStore,
    auto_dismiss_ms: u64,
}

impl<C: GraphqlClient> MutationRunner<C> {
    pub fn new(client: C, store: FleetStore, auto_dismiss_ms: u64) -> Self {
        Self {
            client,
            store,
            auto_dismiss_ms,
        }
    }

    /// Run one mutation and report its outcome through notifications only.
    pub async fn run(&self, request: MutationRequest) -> Option<Value> {
        let MutationRequest {
            operation,
            variables,
            notification_id,
            started,
            succeeded,
            failed,
        } = request;

        self.store.dispatch(
            ADD_NOTIFICATION,
            Notification::in_progress(notification_id.as_str(), started),
        );

        match self.client.mutate(operation, variables).await {
            Ok(response) => {
                log::info!("{operation} accepted");
                self.store.dispatch(
                    ADD_NOTIFICATION,
                    Notification::success(notification_id, succeeded, self.auto_dismiss_ms),
                );
                Some(response)
            }
            Err(error) => {
                self.store.dispatch(DISMISS_NOTIFICATION, notification_id.clone());
                report_errors(&self.store, &notification_id, &failed, &error.messages());
                None
            }
        }
    }

    pub async fn restart_car_service(&self, instance_ids: &[String]) -> Option<Value> {
        self.run(MutationRequest::new(
            "carRestartService",
            &instance_ids.join(","),
            json!({ "resourceIds": instance_ids }),
        ))
        .await
    }

    pub async fn emergency_stop(&self, instance_ids: &[String]) -> Option<Value> {
        self.run(MutationRequest::new(
            "carEmergencyStop",
            &instance_ids.join(","),
            json!({ "resourceIds": instance_ids }),
        ))
        .await
    }

    pub async fn delete_all_models_on_cars(&self, instance_ids: &[String]) -> Option<Value> {
        self.run(MutationRequest::new(
            "carDeleteAllModels",
            &instance_ids.join(","),
            json!({ "resourceIds": instance_ids }),
        ))
        .await
    }

    pub async fn set_taillight_color(&self, instance_id: &str, color: &str) -> Option<Value> {
        self.run(MutationRequest::new(
            "carSetTaillightColor",
            instance_id,
            json!({ "resourceIds": [instance_id], "selectedColor": color }),
        ))
        .await
    }

    pub async fn move_cars_to_fleet(
        &self,
        instance_ids: &[String],
        fleet_id: &str,
        fleet_name: &str,
    ) -> Option<Value> {
        self.run(MutationRequest::new(
            "carsUpdateFleet",
            fleet_id,
            json!({
                "resourceIds": instance_ids,
                "fleetId": fleet_id,
                "fleetName": fleet_name,
            }),
        ))
        .await
    }

    pub async fn delete_models(&self, model_ids: &[String]) -> Option<Value> {
        self.run(MutationRequest::new(
            "deleteModels",
            &model_ids.join(","),
            json!({ "modelIds": model_ids }),
        ))
        .await
    }
}
