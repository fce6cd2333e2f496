//! Custom camera settings payload and its builder.
//!
//! The field layout of [`ServerCameraSettings`] is fixed by the client
//! protocol. [`build`] is pure: the same pose, speed and visibility always
//! give the same payload, and therefore the same encoded bytes.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::pose::{Pose, Position};
use crate::speed::Speed;

/// Which activation packet drives the detached camera.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CameraMode {
    /// Full custom server camera with speed-dependent multipliers.
    #[default]
    Custom,
    /// Built-in fly camera toggle. No speed or visibility control.
    Fly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector2f {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3f {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Camera orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Direction {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseInputTargetType {
    Any,
    Block,
    Entity,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseInputType {
    LookAtTarget,
    LookAtTargetBlock,
    LookAtTargetEntity,
    LookAtPlane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementForceRotationType {
    AttachedToHead,
    CameraRotation,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttachedToType {
    LocalPlayer,
    EntityId,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionDistanceOffsetType {
    DistanceOffset,
    DistanceOffsetRaycast,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionType {
    AttachedToPlusOffset,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationType {
    AttachedToPlusOffset,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanMoveType {
    AttachedToLocalPlayer,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyMovementType {
    CharacterController,
    Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyLookType {
    LocalPlayerLookOrientation,
    Rotation,
}

/// Settings payload of the custom server camera packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerCameraSettings {
    pub position_lerp_speed: f32,
    pub rotation_lerp_speed: f32,
    pub speed_modifier: f32,
    pub allow_pitch_controls: bool,
    pub display_cursor: bool,
    pub display_reticle: bool,
    pub mouse_input_target_type: MouseInputTargetType,
    pub send_mouse_motion: bool,
    pub skip_character_physics: bool,
    pub is_first_person: bool,
    pub movement_force_rotation_type: MovementForceRotationType,
    pub movement_force_rotation: Direction,
    pub attached_to_type: AttachedToType,
    pub attached_to_entity_id: i32,
    pub eye_offset: bool,
    pub position_distance_offset_type: PositionDistanceOffsetType,
    pub position_offset: Position,
    pub rotation_offset: Direction,
    pub position_type: PositionType,
    pub rotation_type: RotationType,
    pub position: Position,
    pub rotation: Direction,
    pub can_move_type: CanMoveType,
    pub apply_movement_type: ApplyMovementType,
    /// `(horizontal, vertical, horizontal)`
    pub movement_multiplier: Vector3f,
    pub apply_look_type: ApplyLookType,
    pub look_multiplier: Vector2f,
    pub mouse_input_type: MouseInputType,
    pub plane_normal: Vector3f,
}

/// Builds the freecam camera settings.
///
/// The camera is not attached to any entity. Position and rotation are
/// custom and driven live by client input, movement is always allowed and
/// character physics are skipped. `show_player` selects a third-person view,
/// hiding the player gives a first-person view.
pub fn build(pose: Pose, speed: Speed, show_player: bool) -> ServerCameraSettings {
    let multipliers = speed.multipliers();

    ServerCameraSettings {
        position_lerp_speed: 1.0,
        rotation_lerp_speed: 1.0,
        speed_modifier: 1.0,
        allow_pitch_controls: true,
        display_cursor: false,
        display_reticle: false,
        mouse_input_target_type: MouseInputTargetType::Any,
        send_mouse_motion: true,
        skip_character_physics: true,
        is_first_person: !show_player,
        movement_force_rotation_type: MovementForceRotationType::CameraRotation,
        movement_force_rotation: Direction::ZERO,

        attached_to_type: AttachedToType::None,
        attached_to_entity_id: 0,
        eye_offset: true,
        position_distance_offset_type: PositionDistanceOffsetType::DistanceOffset,
        position_offset: Position::new(0.0, 0.0, 0.0),
        rotation_offset: Direction::ZERO,

        position_type: PositionType::Custom,
        rotation_type: RotationType::Custom,
        position: pose.position,
        rotation: Direction::new(pose.rotation.yaw, pose.rotation.pitch, 0.0),

        can_move_type: CanMoveType::Always,
        apply_movement_type: ApplyMovementType::Position,
        movement_multiplier: Vector3f::new(
            multipliers.horizontal,
            multipliers.vertical,
            multipliers.horizontal,
        ),

        apply_look_type: ApplyLookType::Rotation,
        look_multiplier: Vector2f { x: 1.0, y: 1.0 },
        mouse_input_type: MouseInputType::LookAtTarget,
        plane_normal: Vector3f::new(0.0, 1.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Rotation;

    fn sample_pose() -> Pose {
        Pose::new(Position::new(12.5, 80.0, -4.25), Rotation::new(135.0, -20.0))
    }

    #[test]
    fn test_fixed_fields() {
        let s = build(sample_pose(), Speed::default(), true);
        assert_eq!(s.position_lerp_speed, 1.0);
        assert_eq!(s.rotation_lerp_speed, 1.0);
        assert_eq!(s.attached_to_type, AttachedToType::None);
        assert_eq!(s.can_move_type, CanMoveType::Always);
        assert!(s.skip_character_physics);
        assert!(!s.display_cursor);
        assert!(!s.display_reticle);
        assert_eq!(s.position_type, PositionType::Custom);
        assert_eq!(s.rotation_type, RotationType::Custom);
    }

    #[test]
    fn test_first_person_is_complement_of_show_player() {
        assert!(!build(sample_pose(), Speed::default(), true).is_first_person);
        assert!(build(sample_pose(), Speed::default(), false).is_first_person);
    }

    #[test]
    fn test_pose_is_copied() {
        let s = build(sample_pose(), Speed::default(), true);
        assert_eq!(s.position, Position::new(12.5, 80.0, -4.25));
        assert_eq!(s.rotation, Direction::new(135.0, -20.0, 0.0));
    }

    #[test]
    fn test_multipliers_applied_per_axis() {
        let s = build(sample_pose(), Speed::new(8), true);
        assert_eq!(s.movement_multiplier.x, 8.0);
        assert_eq!(s.movement_multiplier.z, 8.0);
        assert!((s.movement_multiplier.y - 1.36).abs() < 1e-6);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = build(sample_pose(), Speed::new(3), false);
        let b = build(sample_pose(), Speed::new(3), false);
        assert_eq!(a, b);
    }

    #[test]
    fn test_camera_mode_parses_case_insensitive() {
        assert_eq!("Fly".parse::<CameraMode>().unwrap(), CameraMode::Fly);
        assert_eq!("custom".parse::<CameraMode>().unwrap(), CameraMode::Custom);
        assert_eq!(CameraMode::Fly.to_string(), "fly");
    }
}
