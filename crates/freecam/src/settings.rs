//! Freecam configuration.
//!
//! Strongly typed sections, each one struct with its defaults in a `Default`
//! impl. The settings file is TOML; every section and every field is
//! optional and falls back to its default:
//!
//! ```toml
//! [session]
//! default_speed = 5
//! default_show_player = true
//!
//! [camera]
//! mode = "custom"      # or "fly"
//! height_offset = 2.5
//!
//! [world]
//! interaction_mode = "adventure"
//! disable_on_damage = false
//!
//! [logging]
//! level = "info"       # unset: info in debug builds, warn in release builds
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::camera::CameraMode;
use crate::controller::ControllerConfig;
use crate::error::SettingsError;
use crate::host::InteractionMode;
use crate::session::SessionDefaults;
use crate::speed::{DEFAULT_SPEED, Speed};

/// A section of the settings file.
pub trait Settings: Default + Serialize + DeserializeOwned {
    const SECTION: &'static str;
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct Session {
    /// Clamped to 1–10.
    pub default_speed: i64,
    pub default_show_player: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            default_speed: DEFAULT_SPEED as i64,
            default_show_player: true,
        }
    }
}
impl Settings for Session {
    const SECTION: &'static str = "session";
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct Camera {
    pub mode: CameraMode,
    pub height_offset: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            mode: CameraMode::Custom,
            height_offset: 2.5,
        }
    }
}
impl Settings for Camera {
    const SECTION: &'static str = "camera";
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct World {
    pub interaction_mode: InteractionMode,
    pub disable_on_damage: bool,
}

impl Settings for World {
    const SECTION: &'static str = "world";
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(default)]
pub struct Logging {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Settings for Logging {
    const SECTION: &'static str = "logging";
}

/// Parsed settings file. Sections are deserialized on demand.
#[derive(Debug, Clone, Default)]
pub struct SettingsFile {
    table: toml::Table,
}

impl SettingsFile {
    /// Reads `path`. A missing file is treated as empty.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let table = toml::from_str::<toml::Table>(text)?;
        Ok(Self { table })
    }

    /// Deserializes one section, or its default if the section is absent.
    pub fn section<T: Settings>(&self) -> Result<T, SettingsError> {
        match self.table.get(T::SECTION) {
            Some(value) => value
                .clone()
                .try_into::<T>()
                .map_err(|source| SettingsError::Section {
                    section: T::SECTION,
                    source,
                }),
            None => Ok(T::default()),
        }
    }
}

/// All freecam settings.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct FreecamSettings {
    pub session: Session,
    pub camera: Camera,
    pub world: World,
    pub logging: Logging,
}

impl FreecamSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        Self::from_file(&SettingsFile::load(path)?)
    }

    pub fn from_file(file: &SettingsFile) -> Result<Self, SettingsError> {
        Ok(Self {
            session: file.section()?,
            camera: file.section()?,
            world: file.section()?,
            logging: file.section()?,
        })
    }

    /// Effective settings as TOML, for `--print-config`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn session_defaults(&self) -> SessionDefaults {
        SessionDefaults {
            speed: Speed::new(self.session.default_speed),
            show_player: self.session.default_show_player,
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            camera_mode: self.camera.mode,
            height_offset: self.camera.height_offset,
            interaction_mode: self.world.interaction_mode,
            disable_on_damage: self.world.disable_on_damage,
        }
    }
}
