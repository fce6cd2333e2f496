//! Outbound camera packets.
//!
//! Two packet families exist on the client: the custom server camera, which
//! carries a full [`ServerCameraSettings`] payload, and the coarse built-in
//! fly camera toggle. The custom camera is the regular path, the fly camera
//! is the fallback for clients that cannot take the custom payload.
//!
//! Packets are encoded with bincode (standard config). Encoding is
//! deterministic, so equal packets always give equal bytes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::camera::{CameraMode, ServerCameraSettings};
use crate::error::ProtocolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientCameraView {
    FirstPerson,
    ThirdPerson,
    Custom,
}

/// Attaches (`is_locked = true`) or releases the server-driven camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetServerCamera {
    pub view: ClientCameraView,
    pub is_locked: bool,
    pub settings: Option<ServerCameraSettings>,
}

/// Enters or leaves the client's built-in fly camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFlyCameraMode {
    pub entering: bool,
}

/// Every packet the freecam core can send to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CameraPacket {
    SetServerCamera(SetServerCamera),
    SetFlyCameraMode(SetFlyCameraMode),
}

impl CameraPacket {
    /// Activation packet for the custom camera.
    pub fn activate_custom(settings: ServerCameraSettings) -> Self {
        CameraPacket::SetServerCamera(SetServerCamera {
            view: ClientCameraView::Custom,
            is_locked: true,
            settings: Some(settings),
        })
    }

    /// Activation packet for the fly camera fallback.
    pub fn activate_fly() -> Self {
        CameraPacket::SetFlyCameraMode(SetFlyCameraMode { entering: true })
    }

    /// Packet that reverts the given camera mode.
    pub fn deactivate(mode: CameraMode) -> Self {
        match mode {
            CameraMode::Custom => CameraPacket::SetServerCamera(SetServerCamera {
                view: ClientCameraView::Custom,
                is_locked: false,
                settings: None,
            }),
            CameraMode::Fly => CameraPacket::SetFlyCameraMode(SetFlyCameraMode { entering: false }),
        }
    }

    /// `true` if the packet detaches the camera.
    pub fn is_activation(&self) -> bool {
        match self {
            CameraPacket::SetServerCamera(p) => p.is_locked,
            CameraPacket::SetFlyCameraMode(p) => p.entering,
        }
    }

    /// Camera mode this packet belongs to.
    pub fn mode(&self) -> CameraMode {
        match self {
            CameraPacket::SetServerCamera(_) => CameraMode::Custom,
            CameraPacket::SetFlyCameraMode(_) => CameraMode::Fly,
        }
    }

    /// Custom camera payload, if any.
    pub fn settings(&self) -> Option<&ServerCameraSettings> {
        match self {
            CameraPacket::SetServerCamera(p) => p.settings.as_ref(),
            CameraPacket::SetFlyCameraMode(_) => None,
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CameraPacket::SetServerCamera(_) => "SetServerCamera",
            CameraPacket::SetFlyCameraMode(_) => "SetFlyCameraMode",
        }
    }

    pub fn encode(&self) -> Result<Bytes, ProtocolError> {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())?;
        Ok(Bytes::from(bytes))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let (packet, _len) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(packet)
    }
}
