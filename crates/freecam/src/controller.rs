//! The freecam state machine.
//!
//! One command invocation drives one transition:
//!
//! | state    | preferences given | result |
//! |----------|-------------------|--------|
//! | disabled | no                | enable |
//! | disabled | yes               | store preferences, then enable with them |
//! | enabled  | no                | disable and restore the avatar |
//! | enabled  | yes               | store preferences only, applied on the next enable |
//!
//! The player's session lock is held for the whole transition, so a command
//! and a world event for the same player never interleave. Other players are
//! not blocked.

use std::sync::Arc;

use app::LOG_FREECAM;
use strum::Display;

use crate::camera::{self, CameraMode};
use crate::command::{self, ToggleRequest};
use crate::error::{CommandError, TransportError};
use crate::guard::WorldInteractionGuard;
use crate::host::{AvatarHost, InteractionMode, PacketSink};
use crate::pose::{PlayerId, Pose};
use crate::protocol::CameraPacket;
use crate::session::{Session, SessionStore, lock_session};

pub const MSG_ENABLED: &str = "Freecam enabled! Fly freely with WASD. Use /freecam again to disable.";
pub const MSG_DISABLED: &str = "Freecam disabled. Camera returned to player.";

/// Tunables of the controller, usually taken from the settings file.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Preferred activation packet. `Fly` forces the fallback for everyone.
    pub camera_mode: CameraMode,
    /// Camera start height above the avatar position.
    pub height_offset: f64,
    /// Mode the avatar is switched to while detached.
    pub interaction_mode: InteractionMode,
    /// Force a disable when the avatar takes damage.
    pub disable_on_damage: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            camera_mode: CameraMode::Custom,
            height_offset: 2.5,
            interaction_mode: InteractionMode::Adventure,
            disable_on_damage: false,
        }
    }
}

/// What a successful command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    Enabled,
    Disabled,
    /// Preferences stored while enabled. Nothing was sent.
    PreferenceUpdated,
}

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub outcome: Outcome,
    /// The camera packet could not be delivered. State was updated anyway.
    pub warning: Option<TransportError>,
    /// Lines to show the player.
    pub feedback: Vec<String>,
}

impl ToggleOutcome {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            warning: None,
            feedback: Vec::new(),
        }
    }
}

pub struct SessionController<H, S> {
    store: Arc<SessionStore>,
    host: H,
    sink: S,
    config: ControllerConfig,
}

impl<H: AvatarHost, S: PacketSink> SessionController<H, S> {
    pub fn new(store: Arc<SessionStore>, host: H, sink: S, config: ControllerConfig) -> Self {
        Self {
            store,
            host,
            sink,
            config,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Guard sharing this controller's store.
    pub fn guard(&self) -> WorldInteractionGuard {
        WorldInteractionGuard::new(Arc::clone(&self.store))
    }

    pub fn is_active(&self, player: PlayerId) -> bool {
        self.store.is_enabled(player)
    }

    /// Parses raw `/freecam` arguments and runs the toggle.
    pub fn execute(&self, player: PlayerId, args: &str) -> Result<ToggleOutcome, CommandError> {
        let request = command::parse_args(args)?;
        self.toggle(player, request)
    }

    /// Runs one freecam command for `player`.
    pub fn toggle(
        &self,
        player: PlayerId,
        request: ToggleRequest,
    ) -> Result<ToggleOutcome, CommandError> {
        let handle = self.store.get_or_create(player);
        let mut session = lock_session(&handle);

        if session.is_enabled() {
            if request.has_preferences() {
                let mut result = ToggleOutcome::new(Outcome::PreferenceUpdated);
                apply_preferences(&mut session, request, true, &mut result.feedback);
                tracing::debug!(
                    target: LOG_FREECAM,
                    "Deferred preference update for {}: speed {}, show player {}",
                    player,
                    session.speed(),
                    session.show_player()
                );
                return Ok(result);
            }

            let mut result = ToggleOutcome::new(Outcome::Disabled);
            result.warning = self.disable_locked(player, &mut session);
            result.feedback.push(MSG_DISABLED.to_string());
            return Ok(result);
        }

        // Read the transform before touching the session: a failed read
        // leaves everything as it was, preferences included.
        let pose = self.host.current_pose(player).map_err(|err| {
            tracing::error!(target: LOG_FREECAM, "Cannot enable freecam: {}", err);
            CommandError::from(err)
        })?;

        let mut result = ToggleOutcome::new(Outcome::Enabled);
        apply_preferences(&mut session, request, false, &mut result.feedback);
        result.warning = self.enable_locked(player, &mut session, pose);
        result.feedback.push(MSG_ENABLED.to_string());
        Ok(result)
    }

    /// Forces the disabled state. No-op for unknown or already disabled players.
    pub fn disable(&self, player: PlayerId) -> ToggleOutcome {
        let mut result = ToggleOutcome::new(Outcome::Disabled);
        let Some(handle) = self.store.get(player) else {
            tracing::debug!(target: LOG_FREECAM, "Disable for unknown player {}", player);
            return result;
        };

        let mut session = lock_session(&handle);
        if session.is_enabled() {
            result.warning = self.disable_locked(player, &mut session);
            result.feedback.push(MSG_DISABLED.to_string());
        }
        result
    }

    /// Hook for avatar damage. Disables freecam when configured to.
    pub fn on_avatar_damaged(&self, player: PlayerId) -> Option<ToggleOutcome> {
        if !self.config.disable_on_damage || !self.is_active(player) {
            return None;
        }
        tracing::info!(target: LOG_FREECAM, "{} took damage, leaving freecam", player);
        Some(self.disable(player))
    }

    /// Connection lifecycle hook. Drops the player's session.
    pub fn on_disconnect(&self, player: PlayerId) {
        match self.store.remove(player) {
            Some(session) if session.is_enabled() => {
                tracing::info!(
                    target: LOG_FREECAM,
                    "{} disconnected while in freecam, session dropped",
                    player
                );
            }
            Some(_) => {
                tracing::debug!(target: LOG_FREECAM, "Session of {} dropped", player);
            }
            None => {}
        }
    }

    /// Packet family to use for this player.
    fn camera_mode_for(&self, player: PlayerId) -> CameraMode {
        match self.config.camera_mode {
            CameraMode::Fly => CameraMode::Fly,
            CameraMode::Custom if self.sink.supports_server_camera(player) => CameraMode::Custom,
            CameraMode::Custom => {
                tracing::debug!(
                    target: LOG_FREECAM,
                    "Client of {} lacks the server camera, using fly camera",
                    player
                );
                CameraMode::Fly
            }
        }
    }

    fn enable_locked(
        &self,
        player: PlayerId,
        session: &mut Session,
        pose: Pose,
    ) -> Option<TransportError> {
        let mode = self.camera_mode_for(player);
        session.enable(pose, mode);
        self.host
            .set_interaction_mode(player, self.config.interaction_mode);

        let packet = match mode {
            CameraMode::Custom => CameraPacket::activate_custom(camera::build(
                pose.raised(self.config.height_offset),
                session.speed(),
                session.show_player(),
            )),
            CameraMode::Fly => CameraPacket::activate_fly(),
        };

        tracing::info!(
            target: LOG_FREECAM,
            "Freecam enabled for {} ({} camera, speed {}) at {}",
            player,
            mode,
            session.speed(),
            pose
        );
        self.send(player, &packet)
    }

    fn disable_locked(&self, player: PlayerId, session: &mut Session) -> Option<TransportError> {
        let (pose, mode) = session.disable()?;
        let warning = self.send(player, &CameraPacket::deactivate(mode));
        self.host.set_avatar_pose(player, pose);
        tracing::info!(
            target: LOG_FREECAM,
            "Freecam disabled for {}, avatar restored to {}",
            player,
            pose
        );
        warning
    }

    fn send(&self, player: PlayerId, packet: &CameraPacket) -> Option<TransportError> {
        match self.sink.send_packet(player, packet) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(
                    target: LOG_FREECAM,
                    "{} to {} failed: {}",
                    packet.kind(),
                    player,
                    err
                );
                Some(err)
            }
        }
    }
}

/// Stores the requested preferences and records feedback lines.
fn apply_preferences(
    session: &mut Session,
    request: ToggleRequest,
    deferred: bool,
    feedback: &mut Vec<String>,
) {
    let suffix = if deferred { " Will apply on next toggle." } else { "" };

    if let Some(speed) = request.speed {
        session.set_speed(speed);
        feedback.push(format!("Freecam speed set to {}.{}", session.speed(), suffix));
    }
    if let Some(show_player) = request.show_player {
        session.set_show_player(show_player);
        feedback.push(format!(
            "Show player set to {}.{}",
            if show_player { "enabled" } else { "disabled" },
            suffix
        ));
    }
}
