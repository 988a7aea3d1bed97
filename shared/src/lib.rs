use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod config;

pub use config::{ConfigError, FleetConfig};

// ===== ENTITY CONTRACT =====

/// A record owned by one slice of the client state tree.
///
/// Every non-key field is optional and skipped when absent, so a value of the
/// type can stand for either a complete record or a sparse patch pushed by a
/// subscription (a ping-status change carries only status and timestamp).
pub trait Entity:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Wire name of the key field, e.g. `InstanceId` or `fleetId`.
    const KEY_FIELD: &'static str;

    fn key(&self) -> &str;
}

macro_rules! keyed_by {
    ($entity:ty, $field:ident, $wire:literal) => {
        impl Entity for $entity {
            const KEY_FIELD: &'static str = $wire;

            fn key(&self) -> &str {
                &self.$field
            }
        }
    };
}

// ===== CARS & FLEETS =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Car {
    pub instance_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ping_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging_capable: Option<bool>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    #[serde(rename = "fleetId", default, skip_serializing_if = "Option::is_none")]
    pub fleet_id: Option<String>,
    #[serde(rename = "fleetName", default, skip_serializing_if = "Option::is_none")]
    pub fleet_name: Option<String>,
}

keyed_by!(Car, instance_id, "InstanceId");

impl Car {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            ..Default::default()
        }
    }

    pub fn is_online(&self) -> bool {
        self.ping_status.as_deref() == Some("Online")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Fleet {
    pub fleet_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

keyed_by!(Fleet, fleet_id, "fleetId");

// ===== MODELS & UPLOADS =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileMetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_date_time: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_space_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_algorithm: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub model_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modelname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_meta_data: Option<FileMetaData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_meta_data: Option<ModelMetaData>,
}

keyed_by!(Model, model_id, "modelId");

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_indicator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A model upload to a car.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub asset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modelname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UploadStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_start_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_time: Option<String>,
}

keyed_by!(Asset, asset_id, "assetId");

// ===== EVENTS & RACES =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RaceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_time_in_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_resets_per_lap: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_laps_window: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_runs_per_racer: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_of_event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_config: Option<RaceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

keyed_by!(Event, event_id, "eventId");

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lap {
    pub lap_id: u32,
    /// Lap time in milliseconds.
    pub time: u64,
    #[serde(default)]
    pub resets: u32,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aut_timer_connected: Option<bool>,
}

/// Mean lap time over a window of consecutive valid laps.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AverageLap {
    pub start_lap_id: u32,
    pub end_lap_id: u32,
    pub avg_time: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub race_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laps: Option<Vec<Lap>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_laps: Option<Vec<AverageLap>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

keyed_by!(Race, race_id, "raceId");

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RaceStatus {
    #[default]
    NoRace,
    ReadyToStart,
    InProgress,
    Paused,
    Finished,
}

// ===== NOTIFICATIONS =====

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationType {
    Success,
    #[default]
    Error,
    Info,
    Warning,
    InProgress,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub notification_type: Option<NotificationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dismissible: Option<bool>,
    /// 0 keeps the notification until dismissed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_dismiss_ms: Option<u64>,
}

keyed_by!(Notification, id, "id");

impl Notification {
    pub fn error(id: impl Into<String>, header: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: Some(header.into()),
            content: Some(content.into()),
            notification_type: Some(NotificationType::Error),
            loading: Some(false),
            dismissible: Some(true),
            auto_dismiss_ms: Some(0),
        }
    }

    pub fn in_progress(id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            header: Some(header.into()),
            content: None,
            notification_type: Some(NotificationType::InProgress),
            loading: Some(true),
            dismissible: Some(false),
            auto_dismiss_ms: Some(0),
        }
    }

    pub fn success(
        id: impl Into<String>,
        header: impl Into<String>,
        auto_dismiss_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            header: Some(header.into()),
            content: None,
            notification_type: Some(NotificationType::Success),
            loading: Some(false),
            dismissible: Some(true),
            auto_dismiss_ms: Some(auto_dismiss_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_car_patch_serializes_only_present_fields() {
        let patch = Car {
            ping_status: Some("Offline".to_string()),
            ..Car::new("i-1")
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "InstanceId": "i-1", "PingStatus": "Offline" })
        );
    }

    #[test]
    fn wire_field_names_follow_backend_casing() {
        let fleet: Fleet = serde_json::from_value(serde_json::json!({
            "fleetId": "f-1",
            "fleetName": "Default",
            "carIds": ["i-1", "i-2"]
        }))
        .unwrap();
        assert_eq!(fleet.key(), "f-1");
        assert_eq!(fleet.car_ids.as_deref().map(<[String]>::len), Some(2));

        let car: Car = serde_json::from_value(serde_json::json!({
            "InstanceId": "i-9",
            "fleetName": "Default",
            "Type": "timer"
        }))
        .unwrap();
        assert_eq!(car.fleet_name.as_deref(), Some("Default"));
        assert_eq!(car.car_type.as_deref(), Some("timer"));
    }

    #[test]
    fn race_status_uses_screaming_case() {
        let status: RaceStatus = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(status, RaceStatus::InProgress);
    }

    #[test]
    fn key_fields_match_wire_names() {
        assert_eq!(Car::KEY_FIELD, "InstanceId");
        assert_eq!(Model::KEY_FIELD, "modelId");
        assert_eq!(Notification::KEY_FIELD, "id");
    }
}
