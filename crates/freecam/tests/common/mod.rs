//! In-memory world used by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use freecam::{
    AvatarHost, CameraPacket, ControllerConfig, InteractionMode, PacketSink, PlayerId,
    PoseUnavailable, Pose, Position, Rotation, SessionController, SessionStore, TransportError,
};

#[derive(Default)]
struct Inner {
    poses: HashMap<PlayerId, Pose>,
    unreadable: HashSet<PlayerId>,
    modes: HashMap<PlayerId, InteractionMode>,
    packets: Vec<(PlayerId, CameraPacket)>,
    legacy_clients: HashSet<PlayerId>,
    failing_sends: bool,
}

#[derive(Default)]
pub struct MockWorld {
    inner: Mutex<Inner>,
}

impl MockWorld {
    pub fn place(&self, player: PlayerId, pose: Pose) {
        self.inner.lock().unwrap().poses.insert(player, pose);
    }

    pub fn pose_of(&self, player: PlayerId) -> Option<Pose> {
        self.inner.lock().unwrap().poses.get(&player).copied()
    }

    pub fn make_unreadable(&self, player: PlayerId) {
        self.inner.lock().unwrap().unreadable.insert(player);
    }

    pub fn mode_of(&self, player: PlayerId) -> Option<InteractionMode> {
        self.inner.lock().unwrap().modes.get(&player).copied()
    }

    pub fn mark_legacy(&self, player: PlayerId) {
        self.inner.lock().unwrap().legacy_clients.insert(player);
    }

    pub fn fail_sends(&self, fail: bool) {
        self.inner.lock().unwrap().failing_sends = fail;
    }

    pub fn packets_for(&self, player: PlayerId) -> Vec<CameraPacket> {
        self.inner
            .lock()
            .unwrap()
            .packets
            .iter()
            .filter(|(to, _)| *to == player)
            .map(|(_, packet)| packet.clone())
            .collect()
    }

    pub fn last_packet(&self, player: PlayerId) -> Option<CameraPacket> {
        self.packets_for(player).pop()
    }

    pub fn packet_count(&self) -> usize {
        self.inner.lock().unwrap().packets.len()
    }
}

impl AvatarHost for MockWorld {
    fn current_pose(&self, player: PlayerId) -> Result<Pose, PoseUnavailable> {
        let inner = self.inner.lock().unwrap();
        if inner.unreadable.contains(&player) {
            return Err(PoseUnavailable::new(player, "entity not loaded"));
        }
        inner
            .poses
            .get(&player)
            .copied()
            .ok_or_else(|| PoseUnavailable::new(player, "no avatar"))
    }

    fn set_avatar_pose(&self, player: PlayerId, pose: Pose) {
        self.place(player, pose);
    }

    fn set_interaction_mode(&self, player: PlayerId, mode: InteractionMode) {
        self.inner.lock().unwrap().modes.insert(player, mode);
    }
}

impl PacketSink for MockWorld {
    fn send_packet(&self, player: PlayerId, packet: &CameraPacket) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        // Encode even when sends fail, like a real transport would.
        packet.encode()?;
        if inner.failing_sends {
            return Err(TransportError::Send("connection reset".into()));
        }
        inner.packets.push((player, packet.clone()));
        Ok(())
    }

    fn supports_server_camera(&self, player: PlayerId) -> bool {
        !self.inner.lock().unwrap().legacy_clients.contains(&player)
    }
}

pub type Controller = SessionController<Arc<MockWorld>, Arc<MockWorld>>;

pub fn controller(config: ControllerConfig) -> (Controller, Arc<MockWorld>) {
    let world = Arc::new(MockWorld::default());
    let store = Arc::new(SessionStore::new());
    let controller = SessionController::new(store, Arc::clone(&world), Arc::clone(&world), config);
    (controller, world)
}

pub fn pose(x: f64, y: f64, z: f64, yaw: f32, pitch: f32) -> Pose {
    Pose::new(Position::new(x, y, z), Rotation::new(yaw, pitch))
}
