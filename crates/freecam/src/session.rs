//! Per-player freecam sessions.
//!
//! The store maps a [`PlayerId`] to one [`Session`] record. Every record sits
//! behind its own mutex, so a read-modify-write on one player never blocks
//! another player. The outer map lock is only held to look up, insert or
//! remove a handle and never while a record is locked by the caller.
//!
//! Records are created lazily by [`SessionStore::get_or_create`]. Lookups that
//! only read (`get`, `snapshot`, `is_enabled`) never insert.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use app::LOG_FREECAM;

use crate::camera::CameraMode;
use crate::pose::{PlayerId, Pose};
use crate::speed::Speed;

/// Shared, individually locked session record.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Locks a session record.
///
/// Records are plain data and every writer leaves them in a complete state,
/// so a poisoned lock is recovered instead of propagated.
pub fn lock_session(handle: &SessionHandle) -> MutexGuard<'_, Session> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Preferences a fresh session starts with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionDefaults {
    pub speed: Speed,
    pub show_player: bool,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            speed: Speed::default(),
            show_player: true,
        }
    }
}

/// Freecam state of a single player.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    enabled: bool,
    original_pose: Pose,
    speed: Speed,
    show_player: bool,
    camera_mode: CameraMode,
}

impl Session {
    pub fn new(defaults: SessionDefaults) -> Self {
        Self {
            enabled: false,
            original_pose: Pose::default(),
            speed: defaults.speed,
            show_player: defaults.show_player,
            camera_mode: CameraMode::Custom,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Pose captured when freecam was last enabled. Only meaningful while enabled.
    pub fn original_pose(&self) -> Pose {
        self.original_pose
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn show_player(&self) -> bool {
        self.show_player
    }

    /// Camera protocol used by the current (or last) activation.
    pub fn camera_mode(&self) -> CameraMode {
        self.camera_mode
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Overwrites the stored pose. Never merged with an older capture.
    pub fn capture_pose(&mut self, pose: Pose) {
        self.original_pose = pose;
    }

    pub fn set_speed(&mut self, raw: i64) {
        self.speed = Speed::new(raw);
    }

    pub fn set_show_player(&mut self, show_player: bool) {
        self.show_player = show_player;
    }

    /// Enters the enabled state with a freshly captured pose.
    pub fn enable(&mut self, pose: Pose, mode: CameraMode) {
        self.capture_pose(pose);
        self.camera_mode = mode;
        self.enabled = true;
    }

    /// Leaves the enabled state.
    ///
    /// Returns the pose to restore and the camera mode to revert, or `None`
    /// when the session was not enabled.
    pub fn disable(&mut self) -> Option<(Pose, CameraMode)> {
        if !self.enabled {
            return None;
        }
        self.enabled = false;
        Some((self.original_pose, self.camera_mode))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionDefaults::default())
    }
}

/// Concurrent registry of freecam sessions.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<PlayerId, SessionHandle>>,
    defaults: SessionDefaults,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: SessionDefaults) -> Self {
        Self {
            sessions: RwLock::default(),
            defaults,
        }
    }

    pub fn defaults(&self) -> SessionDefaults {
        self.defaults
    }

    /// Returns the player's session, inserting a default one if needed.
    pub fn get_or_create(&self, id: PlayerId) -> SessionHandle {
        if let Some(handle) = self.get(id) {
            return handle;
        }

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(id)
            .or_insert_with(|| {
                tracing::debug!(target: LOG_FREECAM, "Creating freecam session for {}", id);
                Arc::new(Mutex::new(Session::new(self.defaults)))
            })
            .clone()
    }

    /// Returns the player's session without creating one.
    pub fn get(&self, id: PlayerId) -> Option<SessionHandle> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Copy of the player's session, if one exists.
    pub fn snapshot(&self, id: PlayerId) -> Option<Session> {
        self.get(id).map(|handle| lock_session(&handle).clone())
    }

    /// `false` for unknown players.
    pub fn is_enabled(&self, id: PlayerId) -> bool {
        self.get(id)
            .is_some_and(|handle| lock_session(&handle).is_enabled())
    }

    pub fn set_enabled(&self, id: PlayerId, enabled: bool) {
        self.update(id, |session| session.set_enabled(enabled));
    }

    /// Stores a speed, clamped to the valid range.
    pub fn set_speed(&self, id: PlayerId, raw: i64) {
        self.update(id, |session| session.set_speed(raw));
    }

    pub fn set_show_player(&self, id: PlayerId, show_player: bool) {
        self.update(id, |session| session.set_show_player(show_player));
    }

    pub fn capture_pose(&self, id: PlayerId, pose: Pose) {
        self.update(id, |session| session.capture_pose(pose));
    }

    /// Drops the player's session. Idempotent.
    pub fn remove(&self, id: PlayerId) -> Option<Session> {
        let handle = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)?;
        let session = lock_session(&handle).clone();
        Some(session)
    }

    /// Number of tracked players.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of players with freecam currently enabled.
    pub fn active_count(&self) -> usize {
        let handles: Vec<SessionHandle> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        handles
            .iter()
            .filter(|handle| lock_session(handle).is_enabled())
            .count()
    }

    fn update(&self, id: PlayerId, f: impl FnOnce(&mut Session)) {
        let handle = self.get_or_create(id);
        let mut session = lock_session(&handle);
        f(&mut session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Position, Rotation};

    fn pose(x: f64) -> Pose {
        Pose::new(Position::new(x, 70.0, -x), Rotation::new(45.0, 10.0))
    }

    #[test]
    fn test_lookups_do_not_insert() {
        let store = SessionStore::new();
        let id = PlayerId::random();

        assert!(!store.is_enabled(id));
        assert!(store.get(id).is_none());
        assert!(store.snapshot(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_or_create_returns_same_record() {
        let store = SessionStore::new();
        let id = PlayerId::random();

        let a = store.get_or_create(id);
        let b = store.get_or_create(id);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);

        let session = store.snapshot(id).expect("session");
        assert!(!session.is_enabled());
        assert_eq!(session.speed().get(), 5);
        assert!(session.show_player());
    }

    #[test]
    fn test_set_speed_clamps() {
        let store = SessionStore::new();
        let id = PlayerId::random();

        store.set_speed(id, 42);
        assert_eq!(store.snapshot(id).unwrap().speed().get(), 10);
        store.set_speed(id, -1);
        assert_eq!(store.snapshot(id).unwrap().speed().get(), 1);
    }

    #[test]
    fn test_capture_pose_overwrites() {
        let store = SessionStore::new();
        let id = PlayerId::random();

        store.capture_pose(id, pose(1.0));
        store.capture_pose(id, pose(2.0));
        assert_eq!(store.snapshot(id).unwrap().original_pose(), pose(2.0));
    }

    #[test]
    fn test_enable_disable_cycle() {
        let mut session = Session::default();
        assert_eq!(session.disable(), None);

        session.enable(pose(3.0), CameraMode::Fly);
        assert!(session.is_enabled());
        assert_eq!(session.disable(), Some((pose(3.0), CameraMode::Fly)));
        assert!(!session.is_enabled());
        assert_eq!(session.disable(), None);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = SessionStore::new();
        let id = PlayerId::random();

        store.set_enabled(id, true);
        assert!(store.is_enabled(id));
        assert!(store.remove(id).is_some_and(|s| s.is_enabled()));
        assert!(store.remove(id).is_none());
        assert!(!store.is_enabled(id));
    }

    #[test]
    fn test_custom_defaults() {
        let store = SessionStore::with_defaults(SessionDefaults {
            speed: Speed::new(3),
            show_player: false,
        });
        let id = PlayerId::random();
        store.get_or_create(id);
        let session = store.snapshot(id).expect("session");
        assert_eq!(session.speed().get(), 3);
        assert!(!session.show_player());
    }

    #[test]
    fn test_active_count() {
        let store = SessionStore::new();
        let a = PlayerId::random();
        let b = PlayerId::random();

        store.set_enabled(a, true);
        store.get_or_create(b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.active_count(), 1);
    }

    #[test]
    fn test_concurrent_players_do_not_interfere() {
        let store = Arc::new(SessionStore::new());
        let ids: Vec<PlayerId> = (0..8).map(|_| PlayerId::random()).collect();

        let threads: Vec<_> = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.set_speed(id, i as i64 + 1);
                        store.set_enabled(id, true);
                        store.set_enabled(id, false);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().expect("thread");
        }

        assert_eq!(store.len(), ids.len());
        for (i, id) in ids.iter().enumerate() {
            let session = store.snapshot(*id).unwrap();
            assert_eq!(session.speed().get(), i as i32 + 1);
            assert!(!session.is_enabled());
        }
    }
}
