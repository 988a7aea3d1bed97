use serde::{Deserialize, Serialize};

// ===== CONFIG TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FleetConfig {
    pub app: AppSection,
    pub api: ApiSection,
    pub race_clock: RaceClockSection,
    pub notifications: NotificationsSection,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unsupported config version {found}, expected {expected}")]
    UnsupportedVersion {
        found: String,
        expected: &'static str,
    },
    #[error("race_clock.tick_interval_ms must be greater than zero")]
    ZeroTickInterval,
}

impl FleetConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.app.is_supported_version() {
            return Err(ConfigError::UnsupportedVersion {
                found: self.app.version.clone(),
                expected: AppSection::CURRENT_VERSION,
            });
        }
        if self.race_clock.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(())
    }
}

// Version lets a stored config be rejected once its format changes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSection {
    pub version: String,
}

impl AppSection {
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    pub fn is_supported_version(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ApiSection {
    /// `limit` variable sent with every paged list query.
    pub page_limit: u32,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self { page_limit: 50 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RaceClockSection {
    pub tick_interval_ms: u32,
}

impl Default for RaceClockSection {
    fn default() -> Self {
        // ~30 updates per second
        Self {
            tick_interval_ms: 33,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NotificationsSection {
    pub auto_dismiss_ms: u64,
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self {
            auto_dismiss_ms: 5000,
        }
    }
}
