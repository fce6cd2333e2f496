//! Vetoes destructive world interaction while a player is in freecam.

use std::sync::Arc;

use app::LOG_FREECAM;
use strum::Display;

use crate::pose::PlayerId;
use crate::session::SessionStore;

/// World-mutation events the guard is consulted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum WorldAction {
    BreakBlock,
    DamageBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Cancel,
}

impl Verdict {
    pub fn is_cancelled(self) -> bool {
        self == Verdict::Cancel
    }
}

/// Read-only view on the session store used by world event handlers.
#[derive(Debug, Clone)]
pub struct WorldInteractionGuard {
    store: Arc<SessionStore>,
}

impl WorldInteractionGuard {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    pub fn is_active(&self, player: PlayerId) -> bool {
        self.store.is_enabled(player)
    }

    pub fn check(&self, player: PlayerId, action: WorldAction) -> Verdict {
        if self.is_active(player) {
            tracing::debug!(target: LOG_FREECAM, "Cancelled {} by {} (freecam active)", action, player);
            Verdict::Cancel
        } else {
            Verdict::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_unknown_and_inactive_players() {
        let store = Arc::new(SessionStore::new());
        let guard = WorldInteractionGuard::new(Arc::clone(&store));
        let id = PlayerId::random();

        assert_eq!(guard.check(id, WorldAction::BreakBlock), Verdict::Allow);
        store.get_or_create(id);
        assert_eq!(guard.check(id, WorldAction::DamageBlock), Verdict::Allow);
        // Checking never creates sessions.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_cancels_both_actions_while_active() {
        let store = Arc::new(SessionStore::new());
        let guard = WorldInteractionGuard::new(Arc::clone(&store));
        let id = PlayerId::random();
        store.set_enabled(id, true);

        assert!(guard.check(id, WorldAction::BreakBlock).is_cancelled());
        assert!(guard.check(id, WorldAction::DamageBlock).is_cancelled());
        assert!(guard.is_active(id));

        store.set_enabled(id, false);
        assert!(!guard.check(id, WorldAction::BreakBlock).is_cancelled());
    }
}
