//! Server-side freecam sessions.
//!
//! A player can detach their camera from their avatar, fly it around the
//! world and reattach it later, with the avatar put back exactly where it was.
//!
//! This crate holds the session state machine and the camera packet builder:
//! - [`speed`]: the 1–10 speed dial and its movement multipliers
//! - [`session`]: concurrent per-player session store
//! - [`camera`] / [`protocol`]: camera settings payload and outbound packets
//! - [`controller`]: enable/disable/update transitions
//! - [`command`]: `/freecam` argument parsing
//! - [`guard`]: block break/damage veto while freecam is active
//! - [`settings`]: TOML configuration
//!
//! The world and the network are reached through the [`host`] traits, so the
//! core runs the same inside a dedicated server, an embedded server or a test.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use freecam::{ControllerConfig, SessionController, SessionStore};
//! # fn demo(host: impl freecam::AvatarHost, sink: impl freecam::PacketSink, player: freecam::PlayerId) {
//! let store = Arc::new(SessionStore::new());
//! let controller = SessionController::new(store, host, sink, ControllerConfig::default());
//! let outcome = controller.execute(player, "/freecam --speed 7").unwrap();
//! println!("{}", outcome.outcome);
//! # }
//! ```

#[cfg(feature = "bevy")]
pub mod bevy;

pub mod camera;
pub mod command;
pub mod controller;
pub mod error;
pub mod guard;
pub mod host;
pub mod pose;
pub mod protocol;
pub mod session;
pub mod settings;
pub mod speed;

pub use camera::{CameraMode, ServerCameraSettings};
pub use command::{ToggleRequest, parse_args};
pub use controller::{ControllerConfig, Outcome, SessionController, ToggleOutcome};
pub use error::{CommandError, PoseUnavailable, ProtocolError, SettingsError, TransportError, ValidationError};
pub use guard::{Verdict, WorldAction, WorldInteractionGuard};
pub use host::{AvatarHost, InteractionMode, PacketSink};
pub use pose::{PlayerId, Pose, Position, Rotation};
pub use protocol::CameraPacket;
pub use session::{Session, SessionDefaults, SessionHandle, SessionStore};
pub use settings::FreecamSettings;
pub use speed::Speed;
