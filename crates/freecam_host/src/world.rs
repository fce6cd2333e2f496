//! In-memory world the console host drives the freecam core against.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use app::{LOG_HOST, LOG_PROTOCOL};
use bytes::Bytes;
use freecam::{
    AvatarHost, CameraPacket, InteractionMode, PacketSink, PlayerId, Pose, PoseUnavailable,
    TransportError,
};

/// One connected player.
#[derive(Debug, Clone)]
pub struct Avatar {
    pub name: String,
    pub pose: Pose,
    pub mode: InteractionMode,
    /// Client cannot take the custom server camera.
    pub legacy_client: bool,
    /// Every outbound packet to this client fails.
    pub drop_packets: bool,
    /// Encoded packets delivered to this client, oldest first.
    pub inbox: Vec<Bytes>,
}

impl Avatar {
    fn new(name: &str, pose: Pose) -> Self {
        Self {
            name: name.to_string(),
            pose,
            mode: InteractionMode::Survival,
            legacy_client: false,
            drop_packets: false,
            inbox: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    avatars: HashMap<PlayerId, Avatar>,
    names: HashMap<String, PlayerId>,
}

#[derive(Debug, Default)]
pub struct SimWorld {
    inner: Mutex<Inner>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a player. Returns `None` if the name is taken.
    pub fn join(&self, name: &str, pose: Pose) -> Option<PlayerId> {
        let mut inner = self.lock();
        if inner.names.contains_key(name) {
            return None;
        }
        let id = PlayerId::random();
        inner.names.insert(name.to_string(), id);
        inner.avatars.insert(id, Avatar::new(name, pose));
        tracing::info!(target: LOG_HOST, "{} joined as {} at {}", name, id, pose);
        Some(id)
    }

    pub fn leave(&self, name: &str) -> Option<PlayerId> {
        let mut inner = self.lock();
        let id = inner.names.remove(name)?;
        inner.avatars.remove(&id);
        tracing::info!(target: LOG_HOST, "{} left", name);
        Some(id)
    }

    pub fn id_of(&self, name: &str) -> Option<PlayerId> {
        self.lock().names.get(name).copied()
    }

    pub fn avatar(&self, id: PlayerId) -> Option<Avatar> {
        self.lock().avatars.get(&id).cloned()
    }

    /// Ids of all players, sorted by name.
    pub fn players(&self) -> Vec<(String, PlayerId)> {
        let mut players: Vec<_> = self
            .lock()
            .names
            .iter()
            .map(|(name, id)| (name.clone(), *id))
            .collect();
        players.sort();
        players
    }

    /// Applies `f` to a player's avatar. `false` for unknown players.
    pub fn update(&self, id: PlayerId, f: impl FnOnce(&mut Avatar)) -> bool {
        match self.lock().avatars.get_mut(&id) {
            Some(avatar) => {
                f(avatar);
                true
            }
            None => false,
        }
    }
}

impl AvatarHost for SimWorld {
    fn current_pose(&self, player: PlayerId) -> Result<Pose, PoseUnavailable> {
        self.lock()
            .avatars
            .get(&player)
            .map(|avatar| avatar.pose)
            .ok_or_else(|| PoseUnavailable::new(player, "player is not in the world"))
    }

    fn set_avatar_pose(&self, player: PlayerId, pose: Pose) {
        self.update(player, |avatar| avatar.pose = pose);
    }

    fn set_interaction_mode(&self, player: PlayerId, mode: InteractionMode) {
        self.update(player, |avatar| avatar.mode = mode);
    }
}

impl PacketSink for SimWorld {
    fn send_packet(&self, player: PlayerId, packet: &CameraPacket) -> Result<(), TransportError> {
        let bytes = packet.encode()?;

        let mut inner = self.lock();
        let avatar = inner
            .avatars
            .get_mut(&player)
            .ok_or(TransportError::Disconnected(player))?;
        if avatar.drop_packets {
            return Err(TransportError::Send(format!(
                "{} dropped by simulated network",
                packet.kind()
            )));
        }

        tracing::debug!(
            target: LOG_PROTOCOL,
            "{} -> {} ({} bytes)",
            packet.kind(),
            avatar.name,
            bytes.len()
        );
        avatar.inbox.push(bytes);
        Ok(())
    }

    fn supports_server_camera(&self, player: PlayerId) -> bool {
        self.lock()
            .avatars
            .get(&player)
            .is_none_or(|avatar| !avatar.legacy_client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freecam::{CameraMode, Position, Rotation};

    fn spawn() -> Pose {
        Pose::new(Position::new(0.0, 64.0, 0.0), Rotation::default())
    }

    #[test]
    fn test_join_rejects_duplicate_names() {
        let world = SimWorld::new();
        let id = world.join("alice", spawn()).unwrap();
        assert!(world.join("alice", spawn()).is_none());
        assert_eq!(world.id_of("alice"), Some(id));
        assert_eq!(world.leave("alice"), Some(id));
        assert!(world.current_pose(id).is_err());
    }

    #[test]
    fn test_packets_are_encoded_into_inbox() {
        let world = SimWorld::new();
        let id = world.join("bob", spawn()).unwrap();

        world.send_packet(id, &CameraPacket::activate_fly()).unwrap();

        let inbox = world.avatar(id).unwrap().inbox;
        assert_eq!(inbox.len(), 1);
        assert_eq!(
            CameraPacket::decode(&inbox[0]).unwrap(),
            CameraPacket::activate_fly()
        );
    }

    #[test]
    fn test_send_failures() {
        let world = SimWorld::new();
        let id = world.join("carol", spawn()).unwrap();
        world.update(id, |avatar| avatar.drop_packets = true);

        let packet = CameraPacket::deactivate(CameraMode::Custom);
        assert!(matches!(
            world.send_packet(id, &packet),
            Err(TransportError::Send(_))
        ));
        assert!(world.avatar(id).unwrap().inbox.is_empty());

        let stranger = PlayerId::random();
        assert_eq!(
            world.send_packet(stranger, &packet),
            Err(TransportError::Disconnected(stranger))
        );
    }

    #[test]
    fn test_legacy_client_flag() {
        let world = SimWorld::new();
        let id = world.join("dave", spawn()).unwrap();
        assert!(world.supports_server_camera(id));
        world.update(id, |avatar| avatar.legacy_client = true);
        assert!(!world.supports_server_camera(id));
    }
}
