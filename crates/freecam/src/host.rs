//! Collaborators the freecam core drives: the avatar in the world and the
//! reliable ordered channel to the player's client.
//!
//! Both are called while the player's session is locked. Implementations must
//! not call back into the controller for the same player.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{PoseUnavailable, TransportError};
use crate::pose::{PlayerId, Pose};
use crate::protocol::CameraPacket;

/// Avatar interaction modes the host can switch a player into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InteractionMode {
    /// No block breaking or placing.
    #[default]
    Adventure,
    Survival,
    Creative,
}

/// Access to the player's avatar.
pub trait AvatarHost {
    /// Live transform of the avatar.
    fn current_pose(&self, player: PlayerId) -> Result<Pose, PoseUnavailable>;

    /// Moves the avatar (used to restore it on disable).
    fn set_avatar_pose(&self, player: PlayerId, pose: Pose);

    /// Idempotent mode switch.
    fn set_interaction_mode(&self, player: PlayerId, mode: InteractionMode);
}

/// Reliable ordered delivery to a player's client.
pub trait PacketSink {
    fn send_packet(&self, player: PlayerId, packet: &CameraPacket) -> Result<(), TransportError>;

    /// Whether the client accepts the custom server camera packet.
    fn supports_server_camera(&self, _player: PlayerId) -> bool {
        true
    }
}

impl<T: AvatarHost + ?Sized> AvatarHost for Arc<T> {
    fn current_pose(&self, player: PlayerId) -> Result<Pose, PoseUnavailable> {
        (**self).current_pose(player)
    }

    fn set_avatar_pose(&self, player: PlayerId, pose: Pose) {
        (**self).set_avatar_pose(player, pose)
    }

    fn set_interaction_mode(&self, player: PlayerId, mode: InteractionMode) {
        (**self).set_interaction_mode(player, mode)
    }
}

impl<T: PacketSink + ?Sized> PacketSink for Arc<T> {
    fn send_packet(&self, player: PlayerId, packet: &CameraPacket) -> Result<(), TransportError> {
        (**self).send_packet(player, packet)
    }

    fn supports_server_camera(&self, player: PlayerId) -> bool {
        (**self).supports_server_camera(player)
    }
}
